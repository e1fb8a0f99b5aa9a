//! Terminal-facing UI: the rendering contract and its terminal implementation.

pub mod render;
mod renderer;
pub mod settings;

pub use render::{RenderSink, Renderer};
