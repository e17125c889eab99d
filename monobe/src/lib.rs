//! Binary side of the pipeline.
//!
//! [`load::load_font`] reads an OpenType binary into the [`monoir`] table
//! model and [`compile::compile_font`] writes the model back out.

pub mod compile;
pub mod error;
mod glyphs;
mod gsub;
pub mod load;
pub mod name;
#[cfg(any(test, feature = "testing"))]
pub mod test_util;
