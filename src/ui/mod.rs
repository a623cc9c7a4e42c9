//! Terminal presentation: color palettes and text rendering.

pub mod render;
pub mod theme;
