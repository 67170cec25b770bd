use crate::compile::Stage;
use std::fmt;
use std::path::PathBuf;

/// One stage rejected by the compiler.
#[derive(Debug, Clone)]
pub struct CompileFailure {
    pub stage: Stage,
    pub path: PathBuf,
    /// Compiler output, verbatim.
    pub log: String,
}

impl fmt::Display for CompileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "errors with {} shader file '{}'",
            self.stage,
            self.path.display()
        )?;
        f.write_str(self.log.trim_end())
    }
}

/// Errors from building a shader program.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("file '{}' couldn't be opened: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}", join_failures(.failures))]
    Compile { failures: Vec<CompileFailure> },
    #[error(
        "error when linking shader program ('{}', '{}'):\n{log}",
        vertex.display(),
        fragment.display()
    )]
    Link {
        vertex: PathBuf,
        fragment: PathBuf,
        log: String,
    },
}

impl BuildError {
    /// Stages reported as the failure cause. Empty for I/O and link errors.
    pub fn failed_stages(&self) -> Vec<Stage> {
        match self {
            Self::Compile { failures } => failures.iter().map(|f| f.stage).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_failures(failures: &[CompileFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
