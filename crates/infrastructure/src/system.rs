//! File system and process execution collaborators
//!
//! Metadata services never touch `std::fs` or `std::process` directly; they go
//! through these traits so that the host primitives can be swapped out.

use crate::error::{Error, Result};
use std::io;
use std::path::Path;
use std::process::Command;

/// Read access to the host file system.
pub trait FileSystem: Send + Sync {
    /// Read a whole file.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Read a whole file as UTF-8.
    fn read_file_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Whether something exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by the real host.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    /// Create a host file system handle
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn read_file_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Runs external commands to completion.
pub trait CmdRunner: Send + Sync {
    /// Run `program` with `args` and capture its output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Command`] if the program cannot be started or exits
    /// with a non-zero status.
    fn run_command(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// [`CmdRunner`] that spawns host processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsCmdRunner;

impl OsCmdRunner {
    /// Create a host command runner
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CmdRunner for OsCmdRunner {
    fn run_command(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let command_line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");

        tracing::debug!(command = %command_line, "Running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::Command {
                command: command_line.clone(),
                message: format!("failed to execute: {e}"),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::Command {
                command: command_line,
                message: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_file_system_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file");
        std::fs::write(&path, "contents").unwrap();

        let fs = OsFileSystem::new();
        assert!(fs.file_exists(&path));
        assert_eq!(fs.read_file_string(&path).unwrap(), "contents");
        assert_eq!(fs.read_file(&path).unwrap(), b"contents");
        assert!(!fs.file_exists(&dir.path().join("missing")));
    }

    #[test]
    fn test_os_cmd_runner_captures_stdout() {
        let output = OsCmdRunner::new().run_command("echo", &["hello"]).unwrap();
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_os_cmd_runner_failure() {
        let err = OsCmdRunner::new()
            .run_command("sh", &["-c", "echo boom >&2; exit 3"])
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sh -c"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_os_cmd_runner_missing_program() {
        let err = OsCmdRunner::new()
            .run_command("definitely-not-a-real-program-1234", &[])
            .unwrap_err();
        assert!(matches!(err, Error::Command { .. }));
    }
}
