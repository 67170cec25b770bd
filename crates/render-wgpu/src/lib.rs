//! wgpu render backend for glyphometer.
//!
//! Draws one line-list glyph per digit slot into a small off-screen canvas,
//! then composites the canvas onto the window with nearest filtering.
//!
//! # Invariants
//! - Renderer never mutates the digit sequence.
//! - All GPU objects are created once, at construction.
//! - Shader programs arrive already compiled and linked.

mod gpu;
mod program;

pub use gpu::{CanvasSize, WgpuRenderer};
pub use program::{GpuProgram, RenderError};
