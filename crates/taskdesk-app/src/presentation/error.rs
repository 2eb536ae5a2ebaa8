use taskdesk_domain::shared::{ErrorCode, ErrorSeverity};
use taskdesk_domain::DomainError;

/// Failure of a CLI command, carrying the domain error code for display
/// and the process exit status.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct CliError {
    /// Numeric error code (1xxx-6xxx range)
    pub code: u16,
    pub message: String,
    pub severity: ErrorSeverity,
    /// Whether running the same command again may succeed
    pub recoverable: bool,
}

impl CliError {
    pub fn from_code(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: error_code.code(),
            message: message.into(),
            severity: error_code.severity(),
            recoverable: error_code.is_recoverable(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::InfrastructureError, message)
    }

    pub fn not_signed_in() -> Self {
        Self::from_code(ErrorCode::Unauthorized, "Not signed in")
    }

    /// Follow-up the user can act on, if any.
    pub fn hint(&self) -> Option<&'static str> {
        if self.code == ErrorCode::Unauthorized.code() {
            Some("Run `taskdesk login --employee-id <id>` to sign in again.")
        } else if self.code == ErrorCode::InvalidCredentials.code() {
            Some("Check your employee ID and password.")
        } else if self.recoverable {
            Some("The portal may be waking up; try again in a moment.")
        } else {
            None
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity {
            ErrorSeverity::Info => 2,
            ErrorSeverity::Warning => 3,
            ErrorSeverity::Error | ErrorSeverity::Critical => 1,
        }
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        Self {
            code: err.code().code(),
            message: err.message().to_string(),
            severity: err.severity(),
            recoverable: err.is_recoverable(),
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(err) => Self::infrastructure(format!("{:#}", err)),
        }
    }
}
