use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored row could not be turned into a domain value.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

fn constraint_label(kind: &DatabaseErrorKind) -> Option<&'static str> {
    match kind {
        DatabaseErrorKind::UniqueViolation => Some("Unique"),
        DatabaseErrorKind::ForeignKeyViolation => Some("Foreign key"),
        DatabaseErrorKind::NotNullViolation => Some("Not null"),
        DatabaseErrorKind::CheckViolation => Some("Check"),
        _ => None,
    }
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,

            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match constraint_label(&kind) {
                    Some(label) => RepositoryError::ConstraintViolation(format!(
                        "{label} constraint violation: {message}"
                    )),
                    None => RepositoryError::DatabaseError(message),
                }
            }

            DieselError::DeserializationError(e) => {
                RepositoryError::CorruptRecord(format!("Deserialization error: {e}"))
            }

            DieselError::SerializationError(e) => {
                RepositoryError::DatabaseError(format!("Serialization error: {e}"))
            }

            DieselError::QueryBuilderError(e) => {
                RepositoryError::DatabaseError(format!("Query builder error: {e}"))
            }

            DieselError::RollbackTransaction
            | DieselError::AlreadyInTransaction
            | DieselError::NotInTransaction
            | DieselError::BrokenTransactionManager => {
                RepositoryError::DatabaseError(format!("Transaction error: {err}"))
            }

            _ => RepositoryError::Unexpected(format!("Unexpected diesel error: {err}")),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        RepositoryError::ConnectionError(format!("Connection error: {err}"))
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        RepositoryError::ConnectionError(format!("Connection error: {err}"))
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        RepositoryError::CorruptRecord(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_not_found() {
        assert!(matches!(
            RepositoryError::from(DieselError::NotFound),
            RepositoryError::NotFound
        ));
    }

    #[test]
    fn type_constraint_is_a_corrupt_record() {
        let err = RepositoryError::from(TypeConstraintError::EmptyString);
        assert!(matches!(err, RepositoryError::CorruptRecord(msg) if msg == "value cannot be empty"));
    }

    #[test]
    fn transaction_errors_are_database_errors() {
        assert!(matches!(
            RepositoryError::from(DieselError::RollbackTransaction),
            RepositoryError::DatabaseError(_)
        ));
    }
}
