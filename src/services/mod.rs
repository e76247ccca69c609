//! Business operations of the catalog, generic over the repository traits.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::{FieldErrors, FormError, flatten_errors};
pub use crate::forms::NON_FIELD_ERRORS;
use crate::repository::errors::RepositoryError;

pub mod catalog;
pub mod client_requests;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("resource not found")]
    NotFound,

    /// Not raised while the API is open; kept so the envelope covers it.
    #[error("permission denied")]
    PermissionDenied,

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Validation error carrying a single field message.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation(BTreeMap::from([(field.into(), message.into())]))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(errors) => ServiceError::Validation(flatten_errors(&errors)),
            FormError::TypeConstraint(err) => err.into(),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::field(NON_FIELD_ERRORS, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use validator::{ValidationError, ValidationErrors};

    use super::*;

    #[test]
    fn repository_not_found_becomes_not_found() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConnectionError("down".into())),
            ServiceError::Repository(_)
        ));
    }

    #[test]
    fn form_errors_are_flattened() {
        let mut errors = ValidationErrors::new();
        errors.add("mensaje", ValidationError::new("blank").with_message("vacío".into()));

        let ServiceError::Validation(fields) = ServiceError::from(FormError::from(errors)) else {
            panic!("expected validation error");
        };
        assert_eq!(fields["mensaje"], "vacío");
    }

    #[test]
    fn type_constraints_are_non_field_errors() {
        let ServiceError::Validation(fields) =
            ServiceError::from(FormError::from(TypeConstraintError::EmptyString))
        else {
            panic!("expected validation error");
        };
        assert_eq!(fields[NON_FIELD_ERRORS], "value cannot be empty");
    }
}
