//! External command execution.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::{GitError, GitResult};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Creates a command line for the given program with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Executes external commands on behalf of the deployment tooling.
///
/// Both methods treat a non-zero exit status as a fatal error. Callers never
/// retry; the error is surfaced to whoever started the operation.
pub trait CommandRunner {
    /// Runs a command to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or exits non-zero.
    fn run(&self, command: &CommandLine) -> GitResult<()>;

    /// Runs a command and returns its standard output as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or exits non-zero.
    fn capture(&self, command: &CommandLine) -> GitResult<String>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    working_dir: Option<PathBuf>,
}

impl SystemRunner {
    /// Creates a runner that executes in the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes commands in the given directory instead.
    #[must_use]
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn command(&self, command: &CommandLine) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.arguments());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> GitResult<()> {
        debug!(%command, "running command");

        let output = self
            .command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(GitError::CommandFailed {
                command: command.to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn capture(&self, command: &CommandLine) -> GitResult<String> {
        debug!(%command, "capturing command output");

        let output = self
            .command(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: command.to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A runner that replays canned output and records every invocation.
///
/// Commands are matched on their rendered form (`program arg1 arg2`).
/// `run` succeeds unless the command was registered with
/// [`ScriptedRunner::fail`]; `capture` fails for unregistered commands so
/// tests notice unexpected calls.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outputs: std::collections::HashMap<String, String>,
    failures: std::collections::HashSet<String>,
    calls: std::cell::RefCell<Vec<String>>,
}

#[cfg(any(test, feature = "test-support"))]
impl ScriptedRunner {
    /// Creates an empty runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the output `capture` returns for `command`.
    #[must_use]
    pub fn output(mut self, command: &str, stdout: &str) -> Self {
        self.outputs.insert(command.to_string(), stdout.to_string());
        self
    }

    /// Makes `command` exit non-zero.
    #[must_use]
    pub fn fail(mut self, command: &str) -> Self {
        self.failures.insert(command.to_string());
        self
    }

    /// Returns every command executed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Returns whether `command` was executed.
    pub fn was_called(&self, command: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == command)
    }

    fn record(&self, command: &CommandLine) -> GitResult<String> {
        let rendered = command.to_string();
        self.calls.borrow_mut().push(rendered.clone());
        if self.failures.contains(&rendered) {
            return Err(GitError::CommandFailed {
                command: rendered,
                status: Some(1),
                stderr: "scripted failure".to_string(),
            });
        }
        Ok(rendered)
    }
}

#[cfg(any(test, feature = "test-support"))]
impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandLine) -> GitResult<()> {
        self.record(command).map(|_| ())
    }

    fn capture(&self, command: &CommandLine) -> GitResult<String> {
        let rendered = self.record(command)?;
        self.outputs
            .get(&rendered)
            .cloned()
            .ok_or_else(|| GitError::CommandFailed {
                command: rendered,
                status: Some(127),
                stderr: "no scripted output".to_string(),
            })
    }
}
