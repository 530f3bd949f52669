//! Seams to the outside world: subprocesses and the file system.
//!
//! Everything the rewrite engine does to a repository goes through
//! [`ProcessRunner`] and [`FileSystem`], so the engine can be driven against
//! scripted fakes in tests and against the real `git` binary in production.
//!
//! # Public API
//! - [`ProcessRunner`]: `run` (capture stdout) and `run_interactive` (hand over the terminal)
//! - [`FileSystem`]: read, write, remove and existence checks
//! - [`SystemProcessRunner`], [`OsFileSystem`]: the production implementations

use crate::core::error::{GitLoomError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub trait ProcessRunner {
    /// Run `argv` to completion and return its stdout.
    ///
    /// A non-zero exit is reported as [`GitLoomError::CommandFailed`] with stderr.
    fn run(&self, argv: &[String]) -> Result<String>;

    /// Run `argv` with extra environment, leaving stdin and stdout on the terminal.
    fn run_interactive(&self, argv: &[String], env: &[(String, String)]) -> Result<()>;
}

pub trait FileSystem {
    /// Read a file, `None` if it does not exist
    fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>>;
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;
    /// Remove a file or directory tree; missing paths are not an error
    fn remove(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

/// Runs commands in a repository's working directory
pub struct SystemProcessRunner {
    workdir: PathBuf,
}

impl SystemProcessRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn command(&self, argv: &[String]) -> Result<Command> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| GitLoomError::command_failed("", "empty command line"))?;
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.workdir);
        Ok(cmd)
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, argv: &[String]) -> Result<String> {
        let command_line = argv.join(" ");
        log::debug!("Running: {command_line}");

        let output = self
            .command(argv)?
            .output()
            .map_err(|e| GitLoomError::command_failed(&command_line, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::debug!("'{command_line}' exited with {}", output.status);
            return Err(GitLoomError::command_failed(command_line, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_interactive(&self, argv: &[String], env: &[(String, String)]) -> Result<()> {
        let command_line = argv.join(" ");
        log::debug!("Running interactively: {command_line}");

        let mut cmd = self.command(argv)?;
        cmd.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());

        let output = cmd
            .spawn()
            .and_then(|child| child.wait_with_output())
            .map_err(|e| GitLoomError::command_failed(&command_line, e.to_string()))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(GitLoomError::command_failed(command_line, stderr.trim()));
        }
        if !stderr.trim().is_empty() {
            log::debug!("{}", stderr.trim());
        }
        Ok(())
    }
}

/// File system access rooted at a directory; relative paths resolve against it
pub struct OsFileSystem {
    root: PathBuf,
}

impl OsFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl FileSystem for OsFileSystem {
    fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(self.resolve(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let path = self.resolve(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let path = self.resolve(path);
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }
}

/// Build an argv vector from string slices
pub fn argv<S: AsRef<str>>(parts: &[S]) -> Vec<String> {
    parts.iter().map(|p| p.as_ref().to_string()).collect()
}
