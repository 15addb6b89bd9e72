use std::result::Result as StdResult;

use fintrack_config::ConfigError;
use fintrack_core::CoreError;
use fintrack_domain::ValidationError;
use thiserror::Error;

/// Unified error type for the store, import/export and configuration layers.
#[derive(Error, Debug)]
pub enum FinanceError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = StdResult<T, FinanceError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        FinanceError::Storage(err.to_string())
    }
}

impl From<ValidationError> for FinanceError {
    fn from(err: ValidationError) -> Self {
        FinanceError::Core(CoreError::Validation(err))
    }
}

impl From<ConfigError> for FinanceError {
    fn from(err: ConfigError) -> Self {
        FinanceError::Config(err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Finance(FinanceError::Core(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Finance(err.into())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Finance(err.into())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Command(format!("prompt failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_surface_through_core() {
        let err: FinanceError = ValidationError::MissingCategory.into();
        assert!(matches!(
            err,
            FinanceError::Core(CoreError::Validation(ValidationError::MissingCategory))
        ));
        assert_eq!(err.to_string(), "Validation failed: category is required");
    }

    #[test]
    fn cli_errors_wrap_io() {
        let err: CliError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert_eq!(err.to_string(), "Persistence error: boom");
    }

    #[test]
    fn prompt_failures_become_command_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let err: CliError = dialoguer::Error::IO(io).into();
        assert!(matches!(err, CliError::Command(ref msg) if msg.starts_with("prompt failed")));
    }
}
