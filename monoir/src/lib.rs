//! Table model and stylistic transformations for monospace fonts.
//!
//! A [`ir::Font`] is loaded once, mutated in place by the passes in
//! [`swap`], [`metrics`] and [`calt`], and then handed to the backend
//! for compilation.

pub mod calt;
pub mod error;
pub mod gsub;
pub mod ir;
pub mod metrics;
pub mod swap;
#[cfg(test)]
mod test_util;
