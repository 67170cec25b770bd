//! Rendering Adapter: renderer-agnostic glyph data and interface.
//!
//! # Invariants
//! - Renderers never mutate the digit sequence.
//! - Shape geometry is built once and never changes.
//! - A digit outside the shape range is drawn as the nearest valid shape.

mod layout;
mod programs;
mod renderer;
mod shapes;

pub use layout::SlotLayout;
pub use programs::{DEFAULT_SHADER_DIR, ProgramSources};
pub use renderer::{DebugTextRenderer, GlyphRenderer, RenderView};
pub use shapes::{ShapeGeometry, ShapeSet};

pub fn crate_info() -> &'static str {
    "glyphometer-render v0.1.0"
}
