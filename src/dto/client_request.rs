//! Wire representation of client requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::client_request::{ClientRequest, RequestStatus};

/// Query parameters accepted by `GET /requests`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ClientRequestListParams {
    pub estatus: Option<String>,
    pub servicio: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Full request record, including the owning service and its name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientRequestView {
    pub id: i32,
    pub servicio: i32,
    pub servicio_nombre: String,
    pub cliente_nombre: String,
    pub cliente_email: String,
    pub mensaje: String,
    pub estatus: RequestStatus,
    pub fecha_creacion: DateTime<Utc>,
}

/// Request record listed under `/services/{id}/requests`, where the service
/// is already implied by the path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NestedClientRequestView {
    pub id: i32,
    pub cliente_nombre: String,
    pub cliente_email: String,
    pub mensaje: String,
    pub estatus: RequestStatus,
    pub fecha_creacion: DateTime<Utc>,
}

impl From<ClientRequest> for ClientRequestView {
    fn from(request: ClientRequest) -> Self {
        Self {
            id: request.id.get(),
            servicio: request.service_id.get(),
            servicio_nombre: request.service_name.into_inner(),
            cliente_nombre: request.client_name.into_inner(),
            cliente_email: request.client_email.into_inner(),
            mensaje: request.message.into_inner(),
            estatus: request.status,
            fecha_creacion: request.created_at.and_utc(),
        }
    }
}

impl From<ClientRequest> for NestedClientRequestView {
    fn from(request: ClientRequest) -> Self {
        Self {
            id: request.id.get(),
            cliente_nombre: request.client_name.into_inner(),
            cliente_email: request.client_email.into_inner(),
            mensaje: request.message.into_inner(),
            estatus: request.status,
            fecha_creacion: request.created_at.and_utc(),
        }
    }
}
