use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Error types for the service operations.
///
/// Every variant is produced before the operation's transaction commits, so
/// a failed call never leaves a partial write behind.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A field-level rule was violated (range, required, malformed).
    #[error("Invalid {entity}.{field}: {message}")]
    Validation {
        entity: &'static str,
        field: String,
        message: String,
    },

    /// A uniqueness constraint was violated.
    #[error("{entity} with {field} '{value}' already exists")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A referenced record does not exist or was soft-deleted.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The requested status change is not allowed from the current status.
    #[error("{entity} cannot move from '{from}' to '{to}'")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn validation(
        entity: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let err = ServiceError::Validation {
            entity,
            field: field.into(),
            message: message.into(),
        };
        warn!(%err, "Validation failed");
        err
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        let err = ServiceError::NotFound {
            entity,
            id: id.to_string(),
        };
        warn!(%err, "Referenced record missing");
        err
    }

    pub fn invalid_transition(
        entity: &'static str,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let err = ServiceError::InvalidTransition {
            entity,
            from: from.into(),
            to: to.into(),
        };
        warn!(%err, "Status change rejected");
        err
    }

    /// Reports the first failing field (alphabetically) of a `validator` run.
    pub fn from_validation_errors(entity: &'static str, errors: &ValidationErrors) -> Self {
        let mut failures: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| {
                let message = field_errors
                    .first()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .unwrap_or_default();
                (field.to_string(), message)
            })
            .collect();
        failures.sort();

        match failures.into_iter().next() {
            Some((field, message)) => ServiceError::validation(entity, field, message),
            None => ServiceError::validation(entity, "unknown", errors.to_string()),
        }
    }

    /// Maps a failed write, turning unique-index violations into `Conflict`.
    ///
    /// `unique` lists the entity's unique fields with the values that were
    /// written; the field named in the database message is reported, or the
    /// first one if the message names none.
    pub fn from_write(entity: &'static str, err: DbErr, unique: &[(&'static str, String)]) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                let (field, value) = unique
                    .iter()
                    .find(|(field, _)| message.contains(field))
                    .or_else(|| unique.first())
                    .map(|(field, value)| (*field, value.clone()))
                    .unwrap_or(("unknown", String::new()));
                let err = ServiceError::Conflict {
                    entity,
                    field,
                    value,
                };
                warn!(%err, %message, "Unique constraint violated");
                err
            }
            _ => {
                error!(?err, "Failed to write {}", entity);
                ServiceError::Database(err)
            }
        }
    }
}

/// Type alias for Result with ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;
