use crate::compile::{Stage, compile_stage, load_source};
use crate::error::BuildError;
use crate::link::{LinkedProgram, link};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use std::path::Path;

/// Builds a [`LinkedProgram`] from a vertex and a fragment source file.
#[derive(Debug, Clone)]
pub struct ShaderProgramBuilder {
    label: Option<String>,
    capabilities: Capabilities,
}

impl Default for ShaderProgramBuilder {
    fn default() -> Self {
        Self {
            label: None,
            capabilities: Capabilities::all(),
        }
    }
}

impl ShaderProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used for the program in logs and GPU object labels.
    /// Defaults to the vertex file stem.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Restrict the IR features stages may use.
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Load, compile and link the two stages.
    ///
    /// Both files are read before anything is compiled, so an unreadable file
    /// fails without compiler output. Both stages are compiled even when the
    /// first is rejected; only rejected stages are reported.
    pub fn build(
        &self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<LinkedProgram, BuildError> {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();

        let vertex_source = read(vertex_path)?;
        let fragment_source = read(fragment_path)?;

        let mut validator = Validator::new(ValidationFlags::all(), self.capabilities);
        let vertex = compile_stage(&mut validator, Stage::Vertex, vertex_path, &vertex_source);
        let fragment = compile_stage(
            &mut validator,
            Stage::Fragment,
            fragment_path,
            &fragment_source,
        );

        let (vertex, fragment) = match (vertex, fragment) {
            (Ok(vertex), Ok(fragment)) => (vertex, fragment),
            (vertex, fragment) => {
                let failures: Vec<_> = [vertex.err(), fragment.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                for failure in &failures {
                    tracing::warn!(
                        stage = %failure.stage,
                        path = %failure.path.display(),
                        "shader stage rejected"
                    );
                }
                return Err(BuildError::Compile { failures });
            }
        };

        let label = self.label.clone().unwrap_or_else(|| {
            vertex_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "program".to_owned())
        });

        let program = link(label, vertex, fragment).map_err(|log| BuildError::Link {
            vertex: vertex_path.to_path_buf(),
            fragment: fragment_path.to_path_buf(),
            log,
        })?;

        tracing::info!(
            program = program.label(),
            vertex = %vertex_path.display(),
            fragment = %fragment_path.display(),
            "built shader program"
        );
        Ok(program)
    }
}

/// Load, compile and link a program with default settings.
///
/// Callers in this workspace treat an `Err` as fatal and print its text.
pub fn make_shader_program(
    vertex_path: impl AsRef<Path>,
    fragment_path: impl AsRef<Path>,
) -> Result<LinkedProgram, BuildError> {
    ShaderProgramBuilder::new().build(vertex_path, fragment_path)
}

fn read(path: &Path) -> Result<String, BuildError> {
    load_source(path).map_err(|source| {
        tracing::warn!(path = %path.display(), "shader source unreadable: {source}");
        BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
