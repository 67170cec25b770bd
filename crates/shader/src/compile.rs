use crate::error::CompileFailure;
use naga::front::glsl;
use naga::valid::{ModuleInfo, Validator};
use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline stage a source file is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub fn naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// A single stage that parsed and validated.
#[derive(Debug)]
pub struct CompiledShader {
    stage: Stage,
    path: PathBuf,
    module: naga::Module,
    info: ModuleInfo,
}

impl CompiledShader {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    /// Name of this stage's entry point, if the module declares one.
    pub fn entry_point(&self) -> Option<&str> {
        let stage = self.stage.naga();
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.stage == stage)
            .map(|ep| ep.name.as_str())
    }
}

/// Read a shader source file for the compiler.
///
/// Bytes after an embedded NUL are dropped. Bytes that are not UTF-8 become
/// U+FFFD; only a failure to open or read the file is an error.
pub(crate) fn load_source(path: &Path) -> std::io::Result<String> {
    let mut bytes = std::fs::read(path)?;
    if let Some(end) = bytes.iter().position(|&b| b == 0) {
        bytes.truncate(end);
    }
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Parse `source` as GLSL for `stage` and validate the result.
pub(crate) fn compile_stage(
    validator: &mut Validator,
    stage: Stage,
    path: &Path,
    source: &str,
) -> Result<CompiledShader, CompileFailure> {
    let failure = |log: String| CompileFailure {
        stage,
        path: path.to_path_buf(),
        log,
    };

    let mut frontend = glsl::Frontend::default();
    let module = frontend
        .parse(&glsl::Options::from(stage.naga()), source)
        .map_err(|errors| failure(errors.emit_to_string(source)))?;

    let info = validator
        .validate(&module)
        .map_err(|err| failure(err.emit_to_string(source)))?;

    tracing::debug!(%stage, path = %path.display(), "compiled shader stage");
    Ok(CompiledShader {
        stage,
        path: path.to_path_buf(),
        module,
        info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use naga::valid::{Capabilities, ValidationFlags};

    fn validator() -> Validator {
        Validator::new(ValidationFlags::all(), Capabilities::all())
    }

    const FRAGMENT: &str = "#version 450
layout(location = 0) out vec4 out_color;
void main() {
    out_color = vec4(1.0, 0.0, 0.0, 1.0);
}
";

    #[test]
    fn compiles_valid_fragment() {
        let shader =
            compile_stage(&mut validator(), Stage::Fragment, Path::new("red.frag"), FRAGMENT)
                .unwrap();
        assert_eq!(shader.stage(), Stage::Fragment);
        assert_eq!(shader.entry_point(), Some("main"));
        assert_eq!(shader.path(), Path::new("red.frag"));
    }

    #[test]
    fn syntax_error_is_reported_verbatim() {
        let source = "#version 450\nvoid main() { gl_Position = vec4(1.0 }\n";
        let failure =
            compile_stage(&mut validator(), Stage::Vertex, Path::new("broken.vert"), source)
                .unwrap_err();
        assert_eq!(failure.stage, Stage::Vertex);
        assert!(!failure.log.is_empty());
        assert!(failure.to_string().contains("broken.vert"));
    }

    #[test]
    fn load_source_stops_at_nul() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nul.frag");
        std::fs::write(&path, "void main() {}\0garbage").unwrap();
        assert_eq!(load_source(&path).unwrap(), "void main() {}");
    }

    #[test]
    fn load_source_accepts_non_utf8_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.frag");
        std::fs::write(&path, b"// caf\xe9\nvoid main() {}\n").unwrap();
        let text = load_source(&path).unwrap();
        assert!(text.starts_with("// caf\u{fffd}\n"), "{text:?}");
        assert!(text.ends_with("void main() {}\n"));
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::Vertex.to_string(), "vertex");
        assert_eq!(Stage::Fragment.to_string(), "fragment");
    }
}
