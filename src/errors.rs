use crate::core::order_status::OrderStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("No price registered for product {product_id} in {year}")]
    PriceNotFound { product_id: i64, year: i32 },

    #[error("Cannot move order from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] built from any message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for an [`Error::InvalidArgument`] built from any message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether the caller can fix this by changing its input, as opposed to a storage fault.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::PriceNotFound { .. }
                | Self::InvalidStatusTransition { .. }
                | Self::Validation { .. }
        )
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_reports_both_states() {
        let err = Error::InvalidStatusTransition {
            from: OrderStatus::Placed,
            to: OrderStatus::Paid,
        };
        assert_eq!(err.to_string(), "Cannot move order from PLACED to PAID");
        assert!(err.is_user_correctable());
    }

    #[test]
    fn test_storage_errors_are_not_user_correctable() {
        let err = Error::from(sea_orm::DbErr::Custom("disk full".to_string()));
        assert!(!err.is_user_correctable());
        assert!(!Error::invalid_argument("missing harvest date").is_user_correctable());
    }
}
