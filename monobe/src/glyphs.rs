//! Compiles model outlines into [glyf](https://learn.microsoft.com/en-us/typography/opentype/spec/glyf)
//! and [loca](https://learn.microsoft.com/en-us/typography/opentype/spec/loca).

use kurbo::{cubics_to_quadratic_splines, BezPath, CubicBez, PathEl, Point};
use log::trace;
use monoir::ir::GlyphTable;
use write_fonts::tables::{
    glyf::{Bbox, GlyfLocaBuilder, Glyf, SimpleGlyph},
    loca::{Loca, LocaFormat},
};

use crate::error::Error;

/// How far, in font units, a quadratic may stray from the cubic it replaces.
const QUADRATIC_ACCURACY: f64 = 1.0;

/// Rewrite every cubic segment of `path` as one or more quadratics.
///
/// Paths without cubics come back unchanged.
pub(crate) fn cubics_to_quadratics(gid: u16, path: &BezPath) -> Result<BezPath, Error> {
    if !path.elements().iter().any(|el| matches!(el, PathEl::CurveTo(..))) {
        return Ok(path.clone());
    }
    trace!("Convert glyph {gid} to quadratic");

    let mut quadratic = BezPath::new();
    let mut subpath_start = Point::ZERO;
    let mut prev_end = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::CurveTo(p1, p2, p3) => {
                let cubic = CubicBez::new(prev_end, p1, p2, p3);
                let Some(splines) = cubics_to_quadratic_splines(&[cubic], QUADRATIC_ACCURACY)
                else {
                    return Err(Error::QuadraticConversion { gid });
                };
                for spline in splines.iter() {
                    spline
                        .to_quads()
                        .for_each(|quad| quadratic.quad_to(quad.p1, quad.p2));
                }
            }
            other => quadratic.push(other),
        }
        prev_end = match *el {
            PathEl::MoveTo(p) => {
                subpath_start = p;
                p
            }
            PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => p,
            PathEl::ClosePath => subpath_start,
        };
    }
    Ok(quadratic)
}

/// The largest simple glyph, for maxp.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GlyphLimits {
    pub max_points: u16,
    pub max_contours: u16,
}

impl GlyphLimits {
    fn update(&mut self, glyph: &SimpleGlyph) {
        let points: usize = glyph.contours.iter().map(|c| c.len()).sum();
        self.max_points = self
            .max_points
            .max(points.try_into().unwrap_or(u16::MAX));
        self.max_contours = self
            .max_contours
            .max(glyph.contours.len().try_into().unwrap_or(u16::MAX));
    }
}

pub(crate) struct CompiledGlyphs {
    pub glyf: Glyf,
    pub loca: Loca,
    pub loca_format: LocaFormat,
    /// Union of every non-empty glyph's bounds, None if all glyphs are empty
    pub bbox: Option<Bbox>,
    pub limits: GlyphLimits,
    /// x_min of each glyph by glyph id, None for glyphs without contours
    pub x_mins: Vec<Option<i16>>,
}

/// Compile every glyph, in glyph id order, as a simple TrueType glyph.
///
/// Empty slots become empty glyphs so ids stay put.
pub(crate) fn compile_glyphs(glyphs: &GlyphTable) -> Result<CompiledGlyphs, Error> {
    let mut builder = GlyfLocaBuilder::new();
    let mut bbox: Option<Bbox> = None;
    let mut limits = GlyphLimits::default();
    let mut x_mins = Vec::with_capacity(glyphs.len());
    for (gid, glyph) in glyphs.slots().enumerate() {
        let gid: u16 = gid.try_into().map_err(|_| Error::OutOfBounds {
            what: "glyph id".into(),
            value: format!("{gid}"),
        })?;
        let simple = match glyph {
            Some(glyph) if !glyph.outline.elements().is_empty() => {
                let path = cubics_to_quadratics(gid, &glyph.outline)?;
                SimpleGlyph::from_bezpath(&path)
                    .map_err(|problem| Error::MalformedPath { gid, problem })?
            }
            _ => SimpleGlyph::default(),
        };
        if !simple.contours.is_empty() {
            bbox = Some(match bbox {
                Some(bbox) => bbox.union(simple.bbox),
                None => simple.bbox,
            });
            limits.update(&simple);
            x_mins.push(Some(simple.bbox.x_min));
        } else {
            x_mins.push(None);
        }
        builder
            .add_glyph(&simple)
            .map_err(|e| Error::GlyphCompile {
                gid,
                reason: format!("{e:?}"),
            })?;
    }
    let (glyf, loca, loca_format) = builder.build();
    Ok(CompiledGlyphs {
        glyf,
        loca,
        loca_format,
        bbox,
        limits,
        x_mins,
    })
}

#[cfg(test)]
mod tests {
    use kurbo::{ParamCurve, Shape};
    use monoir::ir::Glyph;
    use pretty_assertions::assert_eq;

    use super::*;

    fn circle() -> BezPath {
        kurbo::Circle::new((300.0, 300.0), 200.0).to_path(0.1)
    }

    fn triangle() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((100.0, 0.0));
        path.line_to((300.0, 500.0));
        path.line_to((500.0, 0.0));
        path.close_path();
        path
    }

    fn contours(path: &BezPath) -> usize {
        path.elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count()
    }

    #[test]
    fn quadratic_paths_pass_through() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((100.0, 0.0));
        path.quad_to((100.0, 100.0), (0.0, 100.0));
        path.close_path();
        assert_eq!(path, cubics_to_quadratics(0, &path).unwrap());
    }

    #[test]
    fn cubics_become_quadratics() {
        let circle = circle();
        let quadratic = cubics_to_quadratics(3, &circle).unwrap();
        assert!(!quadratic
            .elements()
            .iter()
            .any(|el| matches!(el, PathEl::CurveTo(..))));
        assert_eq!(contours(&circle), contours(&quadratic));
        // every on-curve point stays near the circle
        for seg in quadratic.segments() {
            let end = seg.end();
            let radius = (end - Point::new(300.0, 300.0)).hypot();
            assert!((radius - 200.0).abs() < 1.5, "{end:?}");
        }
    }

    #[test]
    fn compile_tracks_bounds_and_limits() {
        let mut square = BezPath::new();
        square.move_to((50.0, -10.0));
        square.line_to((550.0, -10.0));
        square.line_to((550.0, 490.0));
        square.line_to((50.0, 490.0));
        square.close_path();
        let mut two_contours = triangle();
        two_contours.extend(circle().elements().iter().copied());
        let glyphs = GlyphTable::new(vec![
            Some(Glyph::new(BezPath::new(), 600.0, 0.0)),
            Some(Glyph::new(square, 600.0, 50.0)),
            None,
            Some(Glyph::new(triangle(), 600.0, 100.0)),
            Some(Glyph::new(two_contours, 600.0, 100.0)),
        ]);

        let compiled = compile_glyphs(&glyphs).unwrap();
        let bbox = compiled.bbox.unwrap();
        assert_eq!((50, -10, 550), (bbox.x_min, bbox.y_min, bbox.x_max));
        assert!(bbox.y_max >= 500);
        assert_eq!(2, compiled.limits.max_contours);
        assert!(compiled.limits.max_points > 4);
        assert_eq!(
            vec![None, Some(50), None, Some(100), Some(100)],
            compiled.x_mins
        );
    }

    #[test]
    fn empty_table_has_no_bounds() {
        let glyphs = GlyphTable::new(vec![Some(Glyph::default()), None]);
        let compiled = compile_glyphs(&glyphs).unwrap();
        assert_eq!(None, compiled.bbox);
        assert_eq!(GlyphLimits::default(), compiled.limits);
    }
}
