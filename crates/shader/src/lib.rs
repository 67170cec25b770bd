//! Shader program builder.
//!
//! Loads a vertex and a fragment stage from GLSL source files, compiles each
//! stage, links them into a [`LinkedProgram`], or returns every diagnostic
//! collected along the way.
//!
//! # Invariants
//! - An unreadable file fails the build before any compilation runs.
//! - Every failure carries non-empty diagnostic text naming the file involved.
//! - Nothing built for a failed program outlives the call.

mod builder;
mod compile;
mod error;
mod link;

pub use builder::{ShaderProgramBuilder, make_shader_program};
pub use compile::{CompiledShader, Stage};
pub use error::{BuildError, CompileFailure};
pub use link::{InterfaceSlot, LinkedProgram};

pub fn crate_info() -> &'static str {
    "glyphometer-shader v0.1.0"
}
