//! ProcessSpawner port - runs an external program to completion

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised before the child produced an exit status
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Captured result of a finished child process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// `None` when the child was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Last non-empty line of stderr, used as the short diagnostic.
    pub fn diagnostic(&self) -> Option<&str> {
        self.stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

/// Abstract process launcher; blocks until the child exits
pub trait ProcessSpawner {
    fn run(&self, program: &Path, args: &[String]) -> Result<ProcessOutput, SpawnError>;
}

impl<T: ProcessSpawner + ?Sized> ProcessSpawner for &T {
    fn run(&self, program: &Path, args: &[String]) -> Result<ProcessOutput, SpawnError> {
        (**self).run(program, args)
    }
}
