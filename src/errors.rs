use sea_orm::error::DbErr;
use thiserror::Error;

/// Service-level error type shared by the query layer and the report
/// service. Callers get exactly two observable failure classes: invalid
/// input (detected before any data access) and computation/storage failure.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Convenience constructor matching the call sites in the query layer.
    pub fn db_error(error: DbErr) -> Self {
        ServiceError::DatabaseError(error)
    }

    /// True for errors the caller caused (bad parameters), false for
    /// computation or storage failures. Transport layers map this to
    /// their 4xx/5xx split.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidInput(_) | ServiceError::ValidationError(_)
        )
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_distinguished_from_storage_failure() {
        assert!(ServiceError::InvalidInput("bad company id".into()).is_invalid_input());
        assert!(!ServiceError::DatabaseError(DbErr::Custom("down".into())).is_invalid_input());
        assert!(!ServiceError::InternalError("oops".into()).is_invalid_input());
    }
}
