//! OS process spawner
//!
//! Runs the child to completion with stdin closed and both output streams
//! captured.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::domain::ports::{ProcessOutput, ProcessSpawner, SpawnError};

#[derive(Debug, Clone, Default)]
pub struct CommandSpawner {
    current_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl CommandSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Extra environment variable for every child
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl ProcessSpawner for CommandSpawner {
    fn run(&self, program: &Path, args: &[String]) -> Result<ProcessOutput, SpawnError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        tracing::debug!(program = %program.display(), args = args.len(), "spawning process");
        let output = cmd.output().map_err(|source| SpawnError::Launch {
            program: program.to_path_buf(),
            source,
        })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_launch_error() {
        let spawner = CommandSpawner::new();
        let err = spawner
            .run(Path::new("/definitely/not/here/rigcascade-worker"), &[])
            .unwrap_err();
        assert!(err.to_string().contains("rigcascade-worker"));
    }

    #[cfg(unix)]
    #[test]
    fn captures_exit_code_and_stderr() {
        let spawner = CommandSpawner::new().with_env("RIGCASCADE_TEST_MSG", "boom");
        let output = spawner
            .run(
                Path::new("/bin/sh"),
                &[
                    "-c".to_string(),
                    "echo out; echo \"$RIGCASCADE_TEST_MSG\" >&2; exit 3".to_string(),
                ],
            )
            .unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.diagnostic(), Some("boom"));
        assert!(!output.success());
    }
}
