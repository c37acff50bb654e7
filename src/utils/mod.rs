//! Shared helpers for rendering.

pub mod date;
pub mod minify;
