//! Uniform JSON error envelope for every failed request.
//!
//! ```json
//! {"error": true, "status_code": 404, "message": "Recurso no encontrado",
//!  "details": {"detail": "El recurso solicitado no existe"}}
//! ```

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::services::ServiceError;

const NOT_FOUND_DETAIL: &str = "El recurso solicitado no existe";
const PERMISSION_DETAIL: &str = "No tienes permiso para realizar esta acción";
const INTERNAL_DETAIL: &str = "Ha ocurrido un error inesperado. Por favor, intenta más tarde.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Field errors, or `{"detail": ...}` for bodies that could not be parsed.
    #[error("validation error: {0}")]
    Validation(Value),

    #[error("not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    /// Details are logged, never sent to the client.
    #[error("internal server error")]
    Internal,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: bool,
    pub status_code: u16,
    pub message: &'static str,
    pub details: Value,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::Validation(json!({ "detail": detail.into() }))
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let (message, details) = match self {
            ApiError::Validation(details) => ("Error de validación", details.clone()),
            ApiError::NotFound => ("Recurso no encontrado", json!({ "detail": NOT_FOUND_DETAIL })),
            ApiError::PermissionDenied => {
                ("Permiso denegado", json!({ "detail": PERMISSION_DETAIL }))
            }
            ApiError::Internal => (
                "Error interno del servidor",
                json!({ "detail": INTERNAL_DETAIL }),
            ),
        };

        ErrorEnvelope {
            error: true,
            status_code: self.status_code().as_u16(),
            message,
            details,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.envelope())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(fields) => ApiError::Validation(json!(fields)),
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::PermissionDenied => ApiError::PermissionDenied,
            ServiceError::Repository(err) => {
                log::error!("Repository failure: {err}");
                ApiError::Internal
            }
            ServiceError::Internal(msg) => {
                log::error!("Internal failure: {msg}");
                ApiError::Internal
            }
        }
    }
}

/// Bodies that are not readable JSON. Mistyped fields inside a valid body are
/// reported per field by the forms.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Unreadable JSON body on {}: {err}", req.path());
    ApiError::bad_request(json_error_detail(&err)).into()
}

fn json_error_detail(err: &JsonPayloadError) -> &'static str {
    match err {
        JsonPayloadError::Deserialize(_) => "JSON mal formado.",
        JsonPayloadError::ContentType => "El cuerpo debe enviarse como application/json.",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "El cuerpo de la petición es demasiado grande."
        }
        _ => "No se pudo leer el cuerpo de la petición.",
    }
}

/// Path segments that do not parse (e.g. `/services/abc`) name no resource.
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Unparsable path {}: {err}", req.path());
    ApiError::NotFound.into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::bad_request(err.to_string()).into()
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    ApiError::NotFound.error_response()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use actix_web::body::to_bytes;

    use super::*;
    use crate::repository::errors::RepositoryError;

    async fn body_json(err: ApiError) -> (StatusCode, Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn validation_envelope_carries_fields() {
        let fields = BTreeMap::from([(
            "precio_mxn".to_string(),
            "El precio no puede ser negativo.".to_string(),
        )]);
        let (status, body) = body_json(ServiceError::Validation(fields).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "error": true,
                "status_code": 400,
                "message": "Error de validación",
                "details": {"precio_mxn": "El precio no puede ser negativo."}
            })
        );
    }

    #[actix_web::test]
    async fn not_found_and_permission_envelopes() {
        let (status, body) = body_json(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Recurso no encontrado");
        assert_eq!(body["details"]["detail"], NOT_FOUND_DETAIL);

        let (status, body) = body_json(ServiceError::PermissionDenied.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["status_code"], 403);
        assert_eq!(body["message"], "Permiso denegado");
    }

    #[test]
    fn json_errors_use_fixed_messages() {
        let syntax = serde_json::from_str::<Value>("{\"nombre\": ").unwrap_err();
        assert_eq!(
            json_error_detail(&JsonPayloadError::Deserialize(syntax)),
            "JSON mal formado."
        );
        assert_eq!(
            json_error_detail(&JsonPayloadError::ContentType),
            "El cuerpo debe enviarse como application/json."
        );
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let err: ApiError =
            ServiceError::Repository(RepositoryError::DatabaseError("disk I/O error".into())).into();
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error interno del servidor");
        assert_eq!(body["details"]["detail"], INTERNAL_DETAIL);
        assert!(!body.to_string().contains("disk"));
    }
}
