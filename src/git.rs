//! Version-control bridge.
//!
//! Every git operation is a [`GitCommand`] rendered to an argument vector and
//! executed through a [`ProcessRunner`]; no command ever goes through a shell,
//! so titles and paths cannot inject anything.

use crate::constants::INITIAL_COMMIT_MESSAGE;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executes an external program and returns its standard output.
pub trait ProcessRunner {
    /// Runs `program` with `args` inside `cwd`.
    ///
    /// # Errors
    /// * `Error::IoError` if the program could not be started
    /// * `Error::GitCommandError` if it exited with a non-zero status
    fn run(&self, program: &str, args: &[OsString], cwd: &Path) -> Result<String>;
}

/// Runner backed by `std::process::Command`. Blocks until the child exits.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString], cwd: &Path) -> Result<String> {
        let output = Command::new(program).args(args).current_dir(cwd).output()?;

        if !output.status.success() {
            return Err(Error::GitCommandError {
                command: render_command_line(program, args),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn render_command_line(program: &str, args: &[OsString]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// A single git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    Version,
    ConfigList,
    Init,
    AddAll,
    Commit { message: String },
    CloneBare { source: PathBuf, target: PathBuf },
    RemoteAdd { name: String, url: PathBuf },
    PushUpstream { remote: String },
}

impl GitCommand {
    /// Argument vector passed to the git binary.
    pub fn args(&self) -> Vec<OsString> {
        match self {
            GitCommand::Version => vec!["--version".into()],
            GitCommand::ConfigList => vec!["config".into(), "--list".into()],
            GitCommand::Init => vec!["init".into()],
            GitCommand::AddAll => vec!["add".into(), "-A".into()],
            GitCommand::Commit { message } => vec!["commit".into(), "-m".into(), message.into()],
            GitCommand::CloneBare { source, target } => vec![
                "clone".into(),
                "--bare".into(),
                source.as_os_str().to_owned(),
                target.as_os_str().to_owned(),
            ],
            GitCommand::RemoteAdd { name, url } => {
                vec!["remote".into(), "add".into(), name.into(), url.as_os_str().to_owned()]
            }
            GitCommand::PushUpstream { remote } => {
                vec!["push".into(), "-u".into(), remote.into(), "HEAD".into()]
            }
        }
    }
}

/// Parses `git config --list` output into a map.
///
/// Each line is split on its first `=` only, so values may contain `=`.
/// Lines without `=` map to an empty value.
pub fn parse_git_config(raw_config: &str) -> IndexMap<String, String> {
    raw_config
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (line.to_string(), String::new()),
        })
        .collect()
}

/// Git operations used by the scaffolder.
pub struct Git<'a> {
    runner: &'a dyn ProcessRunner,
}

impl<'a> Git<'a> {
    /// Creates a new Git bridge on top of `runner`.
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self { runner }
    }

    fn run(&self, command: GitCommand, cwd: &Path) -> Result<String> {
        let args = command.args();
        debug!("Running {} in {}", render_command_line("git", &args), cwd.display());
        self.runner.run("git", &args, cwd)
    }

    /// Checks that git is installed and that a user identity is configured.
    ///
    /// # Errors
    /// * `Error::GitNotFound` if git cannot be started or reports no version
    /// * `Error::GitIdentityMissing` if `user.name` or `user.email` is unset
    pub fn check(&self, cwd: &Path) -> Result<()> {
        let version = match self.run(GitCommand::Version, cwd) {
            Ok(version) => version,
            Err(Error::IoError(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::GitNotFound)
            }
            Err(e) => return Err(e),
        };
        if !version.contains("version") {
            return Err(Error::GitNotFound);
        }

        let raw_config = self.run(GitCommand::ConfigList, cwd)?;
        let config = parse_git_config(&raw_config);
        if !config.contains_key("user.name") || !config.contains_key("user.email") {
            return Err(Error::GitIdentityMissing);
        }
        Ok(())
    }

    /// Initializes a repository in `path`, stages everything and commits.
    pub fn initial_commit(&self, path: &Path) -> Result<()> {
        self.run(GitCommand::Init, path)?;
        self.run(GitCommand::AddAll, path)?;
        self.run(
            GitCommand::Commit {
                message: INITIAL_COMMIT_MESSAGE.to_string(),
            },
            path,
        )?;
        Ok(())
    }

    /// Creates `remote_root/{name}.git` as a bare clone of the repository at
    /// `path`, adds it as `origin` and pushes the current branch to it.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path of the bare repository
    pub fn create_bare_mirror(&self, path: &Path, remote_root: &Path) -> Result<PathBuf> {
        let name = path
            .file_name()
            .ok_or_else(|| {
                Error::ValidationError(format!("'{}' has no directory name", path.display()))
            })?;
        let mut bare_name = name.to_os_string();
        bare_name.push(".git");
        let bare_path = remote_root.join(bare_name);

        self.run(
            GitCommand::CloneBare {
                source: path.join(".git"),
                target: bare_path.clone(),
            },
            remote_root,
        )?;
        self.run(
            GitCommand::RemoteAdd {
                name: "origin".to_string(),
                url: bare_path.clone(),
            },
            path,
        )?;
        self.run(
            GitCommand::PushUpstream {
                remote: "origin".to_string(),
            },
            path,
        )?;

        Ok(bare_path)
    }
}
