use thiserror::Error;

/// The only message users ever see for a failed catalog call.
pub const USER_FACING_MESSAGE: &str = "Something bad happened; please try again later.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProductError {
    /// No response was received (connection, TLS, timeout).
    #[error("An error occurred: {0}")]
    Network(String),

    /// The catalog answered with a non-2xx status.
    #[error("Backend returned code {status}, body was: {body}")]
    Backend { status: u16, body: String },

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid catalog configuration: {0}")]
    Config(String),

    /// Collapsed form of every remote failure, safe to show to users.
    #[error("{}", USER_FACING_MESSAGE)]
    Unavailable,
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Whether the error already carries a message fit for the user surface
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ProductError::Unavailable | ProductError::Validation(_))
    }
}

impl From<reqwest::Error> for ProductError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProductError::Decode(err.to_string())
        } else if err.is_builder() {
            ProductError::Config(err.to_string())
        } else {
            ProductError::Network(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ProductError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProductError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message() {
        assert_eq!(ProductError::Unavailable.to_string(), USER_FACING_MESSAGE);
    }

    #[test]
    fn test_backend_message_keeps_detail() {
        let err = ProductError::Backend {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned code 503, body was: maintenance"
        );
        assert!(!err.is_user_facing());
    }

    #[test]
    fn test_user_facing_variants() {
        assert!(ProductError::Unavailable.is_user_facing());
        assert!(ProductError::Validation("name".into()).is_user_facing());
        assert!(!ProductError::Network("reset".into()).is_user_facing());
    }
}
