//! Scripted fakes for [`ProcessRunner`] and [`FileSystem`].
//!
//! Both fakes are cheap handles over shared state, so a test can keep a clone
//! for assertions after moving the other into the code under test.

use crate::core::{
    error::{GitLoomError, Result},
    process::{FileSystem, ProcessRunner},
};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub command: String,
    pub env: Vec<(String, String)>,
    pub interactive: bool,
}

impl RecordedCall {
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type Hook = Box<dyn Fn()>;

#[derive(Default)]
struct RunnerState {
    calls: Vec<RecordedCall>,
    // prefix -> queued outcomes; Ok(stdout) or Err(stderr)
    responses: Vec<(String, VecDeque<std::result::Result<String, String>>)>,
    hooks: Vec<(String, Hook)>,
}

#[derive(Clone, Default)]
pub struct ScriptedRunner {
    state: Rc<RefCell<RunnerState>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, prefix: &str, outcome: std::result::Result<String, String>) {
        let mut state = self.state.borrow_mut();
        match state.responses.iter_mut().find(|(p, _)| p == prefix) {
            Some((_, queue)) => queue.push_back(outcome),
            None => state
                .responses
                .push((prefix.to_string(), VecDeque::from([outcome]))),
        }
    }

    /// Queue stdout for the next command starting with `prefix`
    pub fn respond(&self, prefix: &str, stdout: &str) {
        self.push(prefix, Ok(stdout.to_string()));
    }

    /// Queue a failure for the next command starting with `prefix`
    pub fn fail(&self, prefix: &str, stderr: &str) {
        self.push(prefix, Err(stderr.to_string()));
    }

    /// Run `hook` every time a command starting with `prefix` succeeds
    pub fn on_success(&self, prefix: &str, hook: impl Fn() + 'static) {
        self.state
            .borrow_mut()
            .hooks
            .push((prefix.to_string(), Box::new(hook)));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.borrow().calls.clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    fn dispatch(&self, argv: &[String], env: &[(String, String)], interactive: bool) -> Result<String> {
        let command = argv.join(" ");
        let outcome = {
            let mut state = self.state.borrow_mut();
            state.calls.push(RecordedCall {
                command: command.clone(),
                env: env.to_vec(),
                interactive,
            });
            state
                .responses
                .iter_mut()
                .find(|(prefix, queue)| command.starts_with(prefix.as_str()) && !queue.is_empty())
                .and_then(|(_, queue)| queue.pop_front())
                .unwrap_or_else(|| Ok(String::new()))
        };

        match outcome {
            Ok(stdout) => {
                let state = self.state.borrow();
                for (prefix, hook) in &state.hooks {
                    if command.starts_with(prefix.as_str()) {
                        hook();
                    }
                }
                Ok(stdout)
            }
            Err(stderr) => Err(GitLoomError::command_failed(command, stderr)),
        }
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, argv: &[String]) -> Result<String> {
        self.dispatch(argv, &[], false)
    }

    fn run_interactive(&self, argv: &[String], env: &[(String, String)]) -> Result<()> {
        self.dispatch(argv, env, true).map(|_| ())
    }
}

#[derive(Default)]
struct FsState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    removed: Vec<PathBuf>,
}

#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    state: Rc<RefCell<FsState>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, contents: &str) {
        self.state
            .borrow_mut()
            .files
            .insert(path.into(), contents.as_bytes().to_vec());
    }

    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        self.state.borrow_mut().dirs.insert(path.into());
    }

    pub fn remove_dir(&self, path: impl AsRef<Path>) {
        self.state.borrow_mut().dirs.remove(path.as_ref());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state
            .borrow()
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.state.borrow().removed.clone()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        Ok(self.state.borrow().files.get(path).cloned())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.state
            .borrow_mut()
            .files
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.files.remove(path);
        state.dirs.remove(path);
        state.removed.push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.borrow();
        state.files.contains_key(path) || state.dirs.contains(path)
    }
}
