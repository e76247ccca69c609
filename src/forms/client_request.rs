use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::client_request::{NewClientRequest, RequestStatus, UpdateClientRequest};
use crate::domain::types::{ClientName, EmailAddress, RequestMessage, ServiceId};
use crate::forms::{
    FormError, JsonFields, STRING_MESSAGE, TypeMismatch, WriteMode, error_with_message,
    into_result, record_mismatches, reject_blank, require, take,
};

const SERVICE_REFERENCE_MESSAGE: &str =
    "Tipo incorrecto. Se esperaba un valor de clave primaria.";

fn validate_status(value: &str) -> Result<(), ValidationError> {
    RequestStatus::from_str(value).map(|_| ()).map_err(|_| {
        error_with_message("invalid_choice", format!("\"{value}\" no es una elección válida."))
    })
}

/// Message reported when `servicio` does not point at an existing service.
pub fn unknown_service_message(id: i32) -> String {
    format!("Clave primaria \"{id}\" inválida - objeto no existe.")
}

/// Body of the client request write endpoints, top-level and nested.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ClientRequestPayload {
    /// Owning service. Replaced by the path id on the nested endpoint.
    pub servicio: Option<i32>,
    #[validate(length(max = 120, message = "Asegúrese de que este campo no tenga más de 120 caracteres."))]
    pub cliente_nombre: Option<String>,
    #[validate(
        length(max = 254, message = "Asegúrese de que este campo no tenga más de 254 caracteres."),
        email(message = "El email proporcionado no es válido.")
    )]
    pub cliente_email: Option<String>,
    pub mensaje: Option<String>,
    #[validate(custom(function = "validate_status"))]
    pub estatus: Option<String>,
    /// Fields that arrived with the wrong JSON type.
    #[serde(skip)]
    pub type_errors: Vec<TypeMismatch>,
}

impl ClientRequestPayload {
    /// Reads a request body field by field. Wrong types end up in
    /// `type_errors` instead of failing the whole body.
    pub fn from_json(body: Value) -> Self {
        let mut fields = JsonFields::new(body);
        Self {
            servicio: fields.take("servicio", SERVICE_REFERENCE_MESSAGE),
            cliente_nombre: fields.take("cliente_nombre", STRING_MESSAGE),
            cliente_email: fields.take("cliente_email", STRING_MESSAGE),
            mensaje: fields.take("mensaje", STRING_MESSAGE),
            estatus: fields.take("estatus", STRING_MESSAGE),
            type_errors: fields.into_mismatches(),
        }
    }

    /// Runs field validators, then the object-level checks for `mode`.
    ///
    /// Whether `servicio` exists is checked by the caller, which owns the
    /// repository.
    pub fn collect_errors(&self, mode: WriteMode) -> ValidationErrors {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        reject_blank(
            &mut errors,
            "cliente_nombre",
            self.cliente_nombre.as_deref(),
            "El nombre del cliente no puede estar vacío.",
        );
        reject_blank(
            &mut errors,
            "mensaje",
            self.mensaje.as_deref(),
            "El mensaje no puede estar vacío.",
        );

        if mode == WriteMode::Full {
            require(&mut errors, "servicio", self.servicio.is_some());
            require(&mut errors, "cliente_nombre", self.cliente_nombre.is_some());
            require(&mut errors, "cliente_email", self.cliente_email.is_some());
            require(&mut errors, "mensaje", self.mensaje.is_some());
        }
        record_mismatches(&mut errors, &self.type_errors);

        errors
    }

    pub fn validate_for(&self, mode: WriteMode) -> Result<(), FormError> {
        into_result(self.collect_errors(mode))
    }

    /// Converts a validated payload into a new request. Status defaults to
    /// `nuevo` when omitted.
    pub fn into_new_request(self) -> Result<NewClientRequest, FormError> {
        let service_id = ServiceId::new(take(self.servicio, "servicio")?)?;
        let client_name = ClientName::new(take(self.cliente_nombre, "cliente_nombre")?)?;
        let client_email = EmailAddress::new(take(self.cliente_email, "cliente_email")?)?;
        let message = RequestMessage::new(take(self.mensaje, "mensaje")?)?;

        let mut request = NewClientRequest::new(service_id, client_name, client_email, message);
        if let Some(status) = self.estatus.as_deref() {
            request = request.with_status(RequestStatus::from_str(status)?);
        }
        Ok(request)
    }

    pub fn into_update(self) -> Result<UpdateClientRequest, FormError> {
        Ok(UpdateClientRequest {
            service_id: self.servicio.map(ServiceId::new).transpose()?,
            client_name: self.cliente_nombre.map(ClientName::new).transpose()?,
            client_email: self.cliente_email.map(EmailAddress::new).transpose()?,
            message: self.mensaje.map(RequestMessage::new).transpose()?,
            status: self
                .estatus
                .as_deref()
                .map(RequestStatus::from_str)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{REQUIRED_MESSAGE, flatten_errors};

    fn payload(json: serde_json::Value) -> ClientRequestPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn converts_with_default_status() {
        let request = payload(serde_json::json!({
            "servicio": 1,
            "cliente_nombre": "Ana López",
            "cliente_email": "ana@example.com",
            "mensaje": "Quiero una cotización"
        }))
        .into_new_request()
        .unwrap();

        assert_eq!(request.service_id.get(), 1);
        assert_eq!(request.status, RequestStatus::New);
    }

    #[test]
    fn blank_message_and_name_are_rejected() {
        let errors = flatten_errors(
            &payload(serde_json::json!({
                "servicio": 1,
                "cliente_nombre": "  ",
                "cliente_email": "ana@example.com",
                "mensaje": "   "
            }))
            .collect_errors(WriteMode::Full),
        );

        assert_eq!(errors.len(), 2);
        assert_eq!(errors["mensaje"], "El mensaje no puede estar vacío.");
        assert_eq!(errors["cliente_nombre"], "El nombre del cliente no puede estar vacío.");
    }

    #[test]
    fn unknown_status_and_bad_email() {
        let errors = flatten_errors(
            &payload(serde_json::json!({
                "estatus": "archivado",
                "cliente_email": "no-es-email"
            }))
            .collect_errors(WriteMode::Partial),
        );

        assert_eq!(errors["estatus"], "\"archivado\" no es una elección válida.");
        assert_eq!(errors["cliente_email"], "El email proporcionado no es válido.");
    }

    #[test]
    fn partial_update_accepts_status_alias() {
        let update = payload(serde_json::json!({ "estatus": "in_progress" }))
            .into_update()
            .unwrap();
        assert_eq!(update.status, Some(RequestStatus::InProgress));
        assert!(update.message.is_none());
    }

    #[test]
    fn mistyped_service_is_a_field_error() {
        let form = ClientRequestPayload::from_json(serde_json::json!({
            "servicio": "uno",
            "cliente_nombre": "Ana",
            "cliente_email": "correo",
            "mensaje": "Hola"
        }));
        let errors = flatten_errors(&form.collect_errors(WriteMode::Full));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors["servicio"], SERVICE_REFERENCE_MESSAGE);
        assert_eq!(errors["cliente_email"], "El email proporcionado no es válido.");
    }

    #[test]
    fn full_mode_requires_service() {
        let errors = flatten_errors(&ClientRequestPayload::default().collect_errors(WriteMode::Full));
        assert_eq!(errors.len(), 4);
        assert_eq!(errors["servicio"], REQUIRED_MESSAGE);
        assert_eq!(
            unknown_service_message(999),
            "Clave primaria \"999\" inválida - objeto no existe."
        );
    }
}
