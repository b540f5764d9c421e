//! Unified error types for the ferrosh shell.
//!
//! Command handlers and the plugin host use [`FerroResult<T>`], an alias for
//! `anyhow::Result<T>`, so failures can carry context and still be classified
//! by downcast at the dispatch boundary.
//!
//! ## Usage Examples
//!
//! Creating errors:
//! ```ignore
//! anyhow::bail!("Plugin '{}' failed to load", name);
//! ```
//!
//! Adding context:
//! ```ignore
//! fs::remove_file(&path).context("Failed to remove file")?;
//! ```
//!
//! Escaping with a specific exit code:
//! ```ignore
//! return Err(ExitCodeError::new(ExitCode::OutOfRange).into());
//! ```

use std::fmt;

/// Result type alias using anyhow::Error.
pub type FerroResult<T> = anyhow::Result<T>;

/// Exit codes reported by command dispatch.
///
/// `CommandNotFound` (404) is reserved for a name the registry does not know;
/// everything else describes how a found command finished.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    ImproperUsage = 2,
    IssueInPath = 127,
    FatalError = 130,
    OutOfRange = 255,
    OtherError = 400,
    CommandNotFound = 404,
}

impl ExitCode {
    /// Numeric code as reported to the REPL.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Escape hatch for handlers that need to report a specific [`ExitCode`].
///
/// Dispatch looks for this type in a failed handler's error chain and uses
/// its code instead of the generic `Error` (1).
#[derive(thiserror::Error, Debug)]
#[error("command exited with code {code}")]
pub struct ExitCodeError {
    code: ExitCode,
}

impl ExitCodeError {
    pub fn new(code: ExitCode) -> Self {
        Self { code }
    }

    pub fn code(&self) -> ExitCode {
        self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_enumeration() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::Error.code(), 1);
        assert_eq!(ExitCode::ImproperUsage.code(), 2);
        assert_eq!(ExitCode::IssueInPath.code(), 127);
        assert_eq!(ExitCode::FatalError.code(), 130);
        assert_eq!(ExitCode::OutOfRange.code(), 255);
        assert_eq!(ExitCode::OtherError.code(), 400);
        assert_eq!(ExitCode::CommandNotFound.code(), 404);
    }

    #[test]
    fn exit_code_error_survives_an_anyhow_chain() {
        let err: anyhow::Error = ExitCodeError::new(ExitCode::OutOfRange).into();
        let found = err
            .chain()
            .find_map(|e| e.downcast_ref::<ExitCodeError>())
            .expect("exit code error in chain");
        assert_eq!(found.code(), ExitCode::OutOfRange);
    }
}
