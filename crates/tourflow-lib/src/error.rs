use thiserror::Error;

/// Convenient result alias for the tourflow library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a booking submission omits one or more required fields.
    #[error("missing required fields: {}", .required.join(", "))]
    MissingFields { required: Vec<&'static str> },

    /// Raised when a query parameter could not be parsed as an integer.
    #[error("invalid value for parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a caller mistake rather than a store failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::MissingFields { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_every_field() {
        let err = Error::MissingFields {
            required: vec!["tourId", "name", "email", "phone"],
        };
        let message = err.to_string();
        assert!(message.contains("tourId, name, email, phone"));
        assert!(err.is_validation());
    }

    #[test]
    fn invalid_parameter_names_the_parameter() {
        let err = Error::InvalidParameter {
            name: "priceMin",
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("priceMin"));
        assert!(err.to_string().contains("abc"));
        assert!(!err.is_validation());
    }
}
