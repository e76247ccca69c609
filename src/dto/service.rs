//! Wire representation of catalog services and their list filters.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::service::{Category, Service};

/// Query parameters accepted by `GET /services`.
///
/// Values are kept as raw strings; the service layer decides which ones are
/// lenient and which ones reject bad input.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServiceListParams {
    pub categoria: Option<String>,
    pub activo: Option<String>,
    pub min_precio: Option<String>,
    pub max_precio: Option<String>,
    pub search: Option<String>,
    pub ordenar_por: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Full service record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceView {
    pub id: i32,
    pub nombre: String,
    pub categoria: Category,
    pub descripcion: String,
    pub precio_mxn: Decimal,
    pub activo: bool,
    pub nivel_prioridad: i32,
    pub fecha_publicacion: NaiveDate,
    pub ultima_actualizacion: DateTime<Utc>,
    pub responsable_email: String,
    pub tiempo_estimado_dias: i32,
}

impl From<Service> for ServiceView {
    fn from(service: Service) -> Self {
        Self {
            id: service.id.get(),
            nombre: service.name.into_inner(),
            categoria: service.category,
            descripcion: service.description.into_inner(),
            precio_mxn: service.price.as_decimal(),
            activo: service.active,
            nivel_prioridad: service.priority.get(),
            fecha_publicacion: service.published_on,
            ultima_actualizacion: service.updated_at.and_utc(),
            responsable_email: service.owner_email.into_inner(),
            tiempo_estimado_dias: service.lead_time_days.get(),
        }
    }
}
