use std::path::{Path, PathBuf};

/// Directory searched for shader sources when none is configured.
pub const DEFAULT_SHADER_DIR: &str = "shaders";

/// Vertex and fragment source paths of one named program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSources {
    pub name: &'static str,
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ProgramSources {
    fn named(dir: &Path, name: &'static str) -> Self {
        Self {
            name,
            vertex: dir.join(format!("{name}.vert")),
            fragment: dir.join(format!("{name}.frag")),
        }
    }

    /// Glyph edges drawn into the canvas.
    pub fn line(dir: impl AsRef<Path>) -> Self {
        Self::named(dir.as_ref(), "line")
    }

    /// Canvas composited onto the window.
    pub fn blit(dir: impl AsRef<Path>) -> Self {
        Self::named(dir.as_ref(), "blit")
    }

    /// Every program the renderer needs, in build order.
    pub fn all(dir: impl AsRef<Path>) -> [Self; 2] {
        let dir = dir.as_ref();
        [Self::line(dir), Self::blit(dir)]
    }
}
