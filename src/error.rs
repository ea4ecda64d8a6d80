//! Error types for the interpreter.
//!
//! Every variant is surfaced to the user in the same way: [`ERROR_MESSAGE`] on
//! standard error. The `Display` text of a [`ShellError`] only reaches the log.

use std::io::{self, Write};

/// The single message the user sees for any failure.
pub const ERROR_MESSAGE: &str = "An error has occurred\n";

/// Misuse of the `>` operator on an external command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RedirectionError {
    #[error("more than one redirection operator")]
    Multiple,

    #[error("missing redirection target")]
    MissingTarget,

    #[error("too many redirection targets")]
    TooManyTargets,

    #[error("missing command before redirection")]
    MissingCommand,
}

/// Errors produced while executing a single line.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("{command}: usage: {usage}")]
    Usage {
        command: &'static str,
        usage: &'static str,
    },

    #[error("environment variable {0} is not set")]
    UnsetVariable(String),

    #[error("cd: {path}: {source}")]
    ChangeDir {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("redirection error: {0}")]
    Redirection(#[from] RedirectionError),

    #[error("{0}: command not found")]
    NotFound(String),

    #[error("cannot prepare redirection to {0}")]
    ChildSetup(String),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for child {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Logs the details of `err` and writes the fixed message to `stderr`.
pub fn report(err: &dyn std::error::Error, stderr: &mut dyn Write) {
    log::debug!("{err}");
    // Nothing sensible is left to do if stderr itself is gone.
    let _ = stderr.write_all(ERROR_MESSAGE.as_bytes());
    let _ = stderr.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_writes_fixed_message_only() {
        let mut out = Vec::new();
        let err = ShellError::NotFound("frobnicate".into());
        report(&err, &mut out);
        assert_eq!(String::from_utf8(out).unwrap(), ERROR_MESSAGE);
    }

    #[test]
    fn display_keeps_details_for_the_log() {
        let e = ShellError::Usage {
            command: "cd",
            usage: "cd <dir>",
        };
        assert_eq!(format!("{e}"), "cd: usage: cd <dir>");

        let e = ShellError::from(RedirectionError::TooManyTargets);
        assert_eq!(
            format!("{e}"),
            "redirection error: too many redirection targets"
        );
    }
}
