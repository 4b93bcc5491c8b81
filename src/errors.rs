use std::fmt;

use reqwest::StatusCode;

/// Field-scoped validation messages collected before anything is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub fields: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .fields
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode {entity}: {message}")]
    Decode { entity: &'static str, message: String },

    #[error("invalid {entity} from server: {message}")]
    Schema { entity: &'static str, message: String },

    #[error("payment failed: {0}")]
    Payment(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("not signed in")]
    NotSignedIn,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

impl AppError {
    /// Text suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors.to_string(),
            AppError::Api { message, .. } if !message.is_empty() => message.clone(),
            AppError::Payment(message) | AppError::Auth(message) => message.clone(),
            AppError::NotSignedIn => "Please sign in to continue.".to_string(),
            AppError::NotFound(what) => format!("{what} was not found."),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_surfaces_verbatim() {
        let err = AppError::Api {
            status: StatusCode::CONFLICT,
            message: "Court already booked".to_string(),
        };
        assert_eq!(err.user_message(), "Court already booked");
    }

    #[test]
    fn test_empty_server_message_falls_back() {
        let err = AppError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::new(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_field_errors_lookup() {
        let mut errors = FieldErrors::new();
        errors.push("date", "Date cannot be in the past");
        errors.push("slots", "Pick between 1 and 8 slots");
        assert_eq!(errors.get("slots"), Some("Pick between 1 and 8 slots"));
        assert!(errors.get("form").is_none());
        assert!(errors.into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
