//! Diesel models for client requests.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client_request::{
    ClientRequest as DomainClientRequest, NewClientRequest as DomainNewClientRequest,
    UpdateClientRequest as DomainUpdateClientRequest,
};
use crate::domain::types::{
    ClientName, ClientRequestId, EmailAddress, RequestMessage, ServiceId, ServiceName,
    TypeConstraintError,
};
use crate::models::service::Service;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Service, foreign_key = servicio_id))]
#[diesel(table_name = crate::schema::solicitudes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClientRequest {
    pub id: i32,
    pub servicio_id: i32,
    pub cliente_nombre: String,
    pub cliente_email: String,
    pub mensaje: String,
    pub estatus: String,
    pub fecha_creacion: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::solicitudes)]
pub struct NewClientRequest<'a> {
    pub servicio_id: i32,
    pub cliente_nombre: &'a str,
    pub cliente_email: &'a str,
    pub mensaje: &'a str,
    pub estatus: &'a str,
    pub fecha_creacion: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::solicitudes)]
pub struct UpdateClientRequest<'a> {
    pub servicio_id: Option<i32>,
    pub cliente_nombre: Option<&'a str>,
    pub cliente_email: Option<&'a str>,
    pub mensaje: Option<&'a str>,
    pub estatus: Option<&'a str>,
}

impl ClientRequest {
    /// Converts the row into the domain entity using the owning service name.
    pub fn into_domain(self, service_name: String) -> Result<DomainClientRequest, TypeConstraintError> {
        Ok(DomainClientRequest {
            id: ClientRequestId::new(self.id)?,
            service_id: ServiceId::new(self.servicio_id)?,
            service_name: ServiceName::new(service_name)?,
            client_name: ClientName::new(self.cliente_nombre)?,
            client_email: EmailAddress::new(self.cliente_email)?,
            message: RequestMessage::new(self.mensaje)?,
            status: self.estatus.parse()?,
            created_at: self.fecha_creacion,
        })
    }
}

impl<'a> NewClientRequest<'a> {
    pub fn from_domain(request: &'a DomainNewClientRequest, now: NaiveDateTime) -> Self {
        Self {
            servicio_id: request.service_id.get(),
            cliente_nombre: request.client_name.as_str(),
            cliente_email: request.client_email.as_str(),
            mensaje: request.message.as_str(),
            estatus: request.status.as_str(),
            fecha_creacion: now,
        }
    }
}

impl<'a> From<&'a DomainUpdateClientRequest> for UpdateClientRequest<'a> {
    fn from(updates: &'a DomainUpdateClientRequest) -> Self {
        Self {
            servicio_id: updates.service_id.map(ServiceId::get),
            cliente_nombre: updates.client_name.as_ref().map(|n| n.as_str()),
            cliente_email: updates.client_email.as_ref().map(|e| e.as_str()),
            mensaje: updates.message.as_ref().map(|m| m.as_str()),
            estatus: updates.status.map(|s| s.as_str()),
        }
    }
}

impl UpdateClientRequest<'_> {
    /// Diesel refuses to run an update without any column to set.
    pub fn is_empty(&self) -> bool {
        self.servicio_id.is_none()
            && self.cliente_nombre.is_none()
            && self.cliente_email.is_none()
            && self.mensaje.is_none()
            && self.estatus.is_none()
    }
}
