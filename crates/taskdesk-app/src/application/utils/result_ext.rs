use taskdesk_domain::DomainError;

/// Shorthand for lifting I/O and plumbing failures into the domain taxonomy
pub trait ResultExt<T, E> {
    /// Convert error to DomainError::Infrastructure
    /// Usage: `config.save_session(&session).to_infra_err()?`
    fn to_infra_err(self) -> Result<T, DomainError>;

    /// Same as [`ResultExt::to_infra_err`] with a leading context line.
    fn to_infra_err_with(self, context: &str) -> Result<T, DomainError>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn to_infra_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(e.to_string()))
    }

    fn to_infra_err_with(self, context: &str) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(format!("{}: {}", context, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_infra_err() {
        let result: Result<i32, &str> = Err("disk full");
        match result.to_infra_err() {
            Err(DomainError::Infrastructure(msg)) => assert_eq!(msg, "disk full"),
            other => panic!("Expected Infrastructure error, got {:?}", other),
        }
    }

    #[test]
    fn test_to_infra_err_with_context() {
        let result: Result<(), String> = Err("permission denied".to_string());
        match result.to_infra_err_with("Failed to write session") {
            Err(DomainError::Infrastructure(msg)) => {
                assert_eq!(msg, "Failed to write session: permission denied")
            }
            other => panic!("Expected Infrastructure error, got {:?}", other),
        }
    }

    #[test]
    fn test_ok_passes_through() {
        let result: Result<i32, &str> = Ok(3);
        assert_eq!(result.to_infra_err().unwrap(), 3);
    }
}
