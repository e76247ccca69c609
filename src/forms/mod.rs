//! JSON payloads accepted by the catalog API.
//!
//! Each payload first runs its `validator` field rules, then adds
//! object-level checks (blank text, required fields) into the same
//! [`ValidationErrors`] so every failing field is reported at once.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::domain::types::TypeConstraintError;

pub mod client_request;
pub mod service;

/// Field name to the single message surfaced for it.
pub type FieldErrors = BTreeMap<String, String>;

pub const REQUIRED_MESSAGE: &str = "Este campo es requerido.";

/// Key used when an error is not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

pub(crate) const STRING_MESSAGE: &str = "No es una cadena válida.";
pub(crate) const INTEGER_MESSAGE: &str = "Se requiere un número entero válido.";
pub(crate) const DECIMAL_MESSAGE: &str = "Se requiere un número decimal válido.";
pub(crate) const BOOLEAN_MESSAGE: &str = "Se requiere un valor booleano válido.";
const OBJECT_EXPECTED_MESSAGE: &str = "Datos inválidos. Se esperaba un objeto JSON.";

/// Field name and message for a value of the wrong JSON type.
pub type TypeMismatch = (&'static str, &'static str);

#[derive(Debug, Error)]
/// Errors that can occur when processing a payload.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    TypeConstraint(#[from] TypeConstraintError),
}

/// Whether a payload replaces a record or patches it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Create and PUT: required fields must be present.
    Full,
    /// PATCH: only provided fields are checked.
    Partial,
}

/// Pulls typed fields out of a JSON body one at a time.
///
/// A field holding the wrong JSON type is recorded as a [`TypeMismatch`] and
/// read as absent, so the rest of the body is still validated.
pub(crate) struct JsonFields {
    map: Map<String, Value>,
    mismatches: Vec<TypeMismatch>,
}

impl JsonFields {
    pub(crate) fn new(body: Value) -> Self {
        match body {
            Value::Object(map) => Self {
                map,
                mismatches: Vec::new(),
            },
            _ => Self {
                map: Map::new(),
                mismatches: vec![(NON_FIELD_ERRORS, OBJECT_EXPECTED_MESSAGE)],
            },
        }
    }

    /// `null` and missing fields both read as `None`.
    pub(crate) fn take<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        message: &'static str,
    ) -> Option<T> {
        match self.map.remove(field)? {
            Value::Null => None,
            value => match serde_json::from_value(value) {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    self.mismatches.push((field, message));
                    None
                }
            },
        }
    }

    pub(crate) fn into_mismatches(self) -> Vec<TypeMismatch> {
        self.mismatches
    }
}

/// Adds the type errors last so they win over a "required" message on the
/// same field.
pub(crate) fn record_mismatches(errors: &mut ValidationErrors, mismatches: &[TypeMismatch]) {
    for (field, message) in mismatches {
        errors.add(*field, error_with_message("invalid", *message));
    }
}

/// Collapses `validator` errors into one message per field.
///
/// When several validators reported on a field the last one wins.
pub fn flatten_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .errors()
        .iter()
        .filter_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => list.last().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map_or_else(|| err.code.to_string(), |m| m.to_string());
                (field.to_string(), message)
            }),
            _ => None,
        })
        .collect()
}

pub(crate) fn error_with_message(
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Records a "required" error for `field` when `present` is false.
pub(crate) fn require(errors: &mut ValidationErrors, field: &'static str, present: bool) {
    if !present {
        errors.add(field, error_with_message("required", REQUIRED_MESSAGE));
    }
}

/// Records `message` for `field` when the provided text is blank.
pub(crate) fn reject_blank(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    message: &'static str,
) {
    if value.is_some_and(|v| v.trim().is_empty()) {
        errors.add(field, error_with_message("blank", message));
    }
}

/// Unwraps a field that a full write requires.
pub(crate) fn take<T>(value: Option<T>, field: &'static str) -> Result<T, FormError> {
    value.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        require(&mut errors, field, false);
        FormError::Validation(errors)
    })
}

pub(crate) fn into_result(errors: ValidationErrors) -> Result<(), FormError> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(FormError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_keeps_last_message_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("precio_mxn", error_with_message("first", "primero"));
        errors.add("precio_mxn", error_with_message("second", "segundo"));
        errors.add("nombre", ValidationError::new("length"));

        let flat = flatten_errors(&errors);
        assert_eq!(flat.get("precio_mxn").map(String::as_str), Some("segundo"));
        // Falls back to the code when no message was attached.
        assert_eq!(flat.get("nombre").map(String::as_str), Some("length"));
    }

    #[test]
    fn require_and_blank_checks() {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "nombre", false);
        require(&mut errors, "categoria", true);
        reject_blank(&mut errors, "mensaje", Some("   "), "vacío");
        reject_blank(&mut errors, "descripcion", None, "vacía");

        let flat = flatten_errors(&errors);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat["nombre"], REQUIRED_MESSAGE);
        assert_eq!(flat["mensaje"], "vacío");
        assert!(into_result(errors).is_err());
        assert!(into_result(ValidationErrors::new()).is_ok());
    }

    #[test]
    fn json_fields_record_wrong_types() {
        let mut fields = JsonFields::new(serde_json::json!({
            "nivel_prioridad": "alto",
            "nombre": "Web",
            "activo": null
        }));

        assert_eq!(fields.take::<i32>("nivel_prioridad", INTEGER_MESSAGE), None);
        assert_eq!(fields.take::<String>("nombre", STRING_MESSAGE).as_deref(), Some("Web"));
        assert_eq!(fields.take::<bool>("activo", BOOLEAN_MESSAGE), None);
        assert_eq!(fields.take::<bool>("missing", BOOLEAN_MESSAGE), None);
        assert_eq!(
            fields.into_mismatches(),
            vec![("nivel_prioridad", INTEGER_MESSAGE)]
        );
    }

    #[test]
    fn non_object_body_is_a_non_field_error() {
        let mut fields = JsonFields::new(serde_json::json!([1, 2]));
        assert_eq!(fields.take::<String>("nombre", STRING_MESSAGE), None);

        let mut errors = ValidationErrors::new();
        require(&mut errors, "nombre", false);
        record_mismatches(&mut errors, &fields.into_mismatches());
        let flat = flatten_errors(&errors);
        assert_eq!(flat[NON_FIELD_ERRORS], OBJECT_EXPECTED_MESSAGE);
        assert_eq!(flat["nombre"], REQUIRED_MESSAGE);
    }
}
