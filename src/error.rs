//! Error types for backup operations.

use thiserror::Error;

/// Result type alias using [`BackupError`].
pub type Result<T> = std::result::Result<T, BackupError>;

/// Errors that can occur during a backup run.
///
/// The first three variants carry the message reported by the `bw` CLI
/// (from its JSON response envelope when parseable, raw output text
/// otherwise). Each variant maps to a distinct process exit code via
/// [`BackupError::exit_code`] so scripted callers can tell failure
/// modes apart.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Authentication or unlock failed.
    #[error("login failed: {message}")]
    Login {
        /// Message reported by the CLI.
        message: String,
    },

    /// Enumerating vault items failed.
    #[error("listing vault items failed: {message}")]
    List {
        /// Message reported by the CLI.
        message: String,
    },

    /// Vault export or attachment download failed.
    #[error("transfer failed: {message}")]
    Transfer {
        /// Message reported by the CLI.
        message: String,
    },

    /// A token-requiring operation was called before unlock.
    #[error("not authenticated: vault session has no token")]
    NotAuthenticated,

    /// Required CLI tool is not installed.
    #[error("required CLI not installed: {0}")]
    CliNotInstalled(String),

    /// Command execution failed outside the response-envelope protocol.
    #[error("command execution failed: {0}")]
    CommandFailed(String),

    /// Archive creation failed.
    #[error("archive error: {0}")]
    Archive(#[from] sevenz_rust2::Error),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BackupError {
    /// Creates a login error from a CLI message.
    pub fn login(message: impl Into<String>) -> Self {
        Self::Login {
            message: message.into(),
        }
    }

    /// Creates a list error from a CLI message.
    pub fn list(message: impl Into<String>) -> Self {
        Self::List {
            message: message.into(),
        }
    }

    /// Creates a transfer error from a CLI message.
    pub fn transfer(message: impl Into<String>) -> Self {
        Self::Transfer {
            message: message.into(),
        }
    }

    /// Process exit code for this error kind.
    ///
    /// Never returns zero: a failed run must be distinguishable from a
    /// successful one by exit status alone.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Login { .. } | Self::NotAuthenticated => 2,
            Self::List { .. } => 3,
            Self::Transfer { .. } => 4,
            Self::CliNotInstalled(_) => 5,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackupError::login("Invalid master password.");
        assert_eq!(err.to_string(), "login failed: Invalid master password.");
    }

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = [
            BackupError::login("x"),
            BackupError::list("x"),
            BackupError::transfer("x"),
            BackupError::CliNotInstalled("bw".to_string()),
            BackupError::CommandFailed("x".to_string()),
        ];

        let codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|&c| c != 0));
        assert_eq!(codes, vec![2, 3, 4, 5, 1]);
    }

    #[test]
    fn test_not_authenticated_maps_to_login_code() {
        assert_eq!(BackupError::NotAuthenticated.exit_code(), 2);
        assert_eq!(BackupError::login("x").exit_code(), 2);
    }
}
