//! Handing the process over to the API server.

use crate::error::{GateError, Result};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::Command;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ServerCommand {
    /// First item is the program, the rest are passed through untouched.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program = args
            .next()
            .ok_or_else(|| GateError::ConfigError("No server command given".to_string()))?;
        Ok(Self {
            program,
            args: args.collect(),
        })
    }

    /// Trailing command-line arguments win; `fallback` (from `SERVER_COMMAND`) is used
    /// only when there are none.
    pub fn resolve(cli_args: Vec<OsString>, fallback: Option<Vec<String>>) -> Result<Self> {
        if !cli_args.is_empty() {
            return Self::from_args(cli_args);
        }
        match fallback {
            Some(args) => Self::from_args(args),
            None => Err(GateError::ConfigError(
                "No server command: pass one after `--` or set SERVER_COMMAND".to_string(),
            )),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    fn handoff_error(&self, source: std::io::Error) -> GateError {
        GateError::HandoffError {
            program: self.program.to_string_lossy().into_owned(),
            source,
        }
    }

    /// Replaces the current process image with the server.
    ///
    /// Only returns if the exec itself failed.
    #[cfg(unix)]
    pub fn exec(self) -> GateError {
        use std::os::unix::process::CommandExt;

        tracing::info!(command = %self, "🚀 Handing off to server");
        let source = self.command().exec();
        self.handoff_error(source)
    }

    /// No exec on this platform: run the server as a child and mirror its exit code.
    #[cfg(not(unix))]
    pub fn exec(self) -> GateError {
        tracing::info!(command = %self, "🚀 Starting server");
        match self.command().status() {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(source) => self.handoff_error(source),
        }
    }
}

impl fmt::Display for ServerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
