//! Diesel models for catalog services.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::service::{
    NewService as DomainNewService, Service as DomainService,
    UpdateService as DomainUpdateService,
};
use crate::domain::types::{
    EmailAddress, LeadTimeDays, Price, Priority, ServiceDescription, ServiceId, ServiceName,
    TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::servicios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::service::Service`].
pub struct Service {
    pub id: i32,
    pub nombre: String,
    pub categoria: String,
    pub descripcion: String,
    pub precio_centavos: i64,
    pub activo: bool,
    pub nivel_prioridad: i32,
    pub fecha_publicacion: NaiveDate,
    pub ultima_actualizacion: NaiveDateTime,
    pub responsable_email: String,
    pub tiempo_estimado_dias: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::servicios)]
/// Insertable form of [`Service`].
pub struct NewService<'a> {
    pub nombre: &'a str,
    pub categoria: &'a str,
    pub descripcion: &'a str,
    pub precio_centavos: i64,
    pub activo: bool,
    pub nivel_prioridad: i32,
    pub fecha_publicacion: NaiveDate,
    pub ultima_actualizacion: NaiveDateTime,
    pub responsable_email: &'a str,
    pub tiempo_estimado_dias: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::servicios)]
/// Data used when updating a [`Service`] record. `None` columns are left untouched.
pub struct UpdateService<'a> {
    pub nombre: Option<&'a str>,
    pub categoria: Option<&'a str>,
    pub descripcion: Option<&'a str>,
    pub precio_centavos: Option<i64>,
    pub activo: Option<bool>,
    pub nivel_prioridad: Option<i32>,
    pub ultima_actualizacion: NaiveDateTime,
    pub responsable_email: Option<&'a str>,
    pub tiempo_estimado_dias: Option<i32>,
}

impl TryFrom<Service> for DomainService {
    type Error = TypeConstraintError;

    fn try_from(service: Service) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ServiceId::try_from(service.id)?,
            name: ServiceName::new(service.nombre)?,
            category: service.categoria.parse()?,
            description: ServiceDescription::new(service.descripcion)?,
            price: Price::from_cents(service.precio_centavos)?,
            active: service.activo,
            priority: Priority::new(service.nivel_prioridad)?,
            published_on: service.fecha_publicacion,
            updated_at: service.ultima_actualizacion,
            owner_email: EmailAddress::new(service.responsable_email)?,
            lead_time_days: LeadTimeDays::new(service.tiempo_estimado_dias)?,
        })
    }
}

impl<'a> NewService<'a> {
    /// Builds the insertable row stamping both the publication date and the
    /// last-update timestamp from `now`.
    pub fn from_domain(service: &'a DomainNewService, now: NaiveDateTime) -> Self {
        Self {
            nombre: service.name.as_str(),
            categoria: service.category.as_str(),
            descripcion: service.description.as_str(),
            precio_centavos: service.price.cents(),
            activo: service.active,
            nivel_prioridad: service.priority.get(),
            fecha_publicacion: now.date(),
            ultima_actualizacion: now,
            responsable_email: service.owner_email.as_str(),
            tiempo_estimado_dias: service.lead_time_days.get(),
        }
    }
}

impl<'a> UpdateService<'a> {
    pub fn from_domain(updates: &'a DomainUpdateService, now: NaiveDateTime) -> Self {
        Self {
            nombre: updates.name.as_ref().map(|n| n.as_str()),
            categoria: updates.category.map(|c| c.as_str()),
            descripcion: updates.description.as_ref().map(|d| d.as_str()),
            precio_centavos: updates.price.map(Price::cents),
            activo: updates.active,
            nivel_prioridad: updates.priority.map(Priority::get),
            ultima_actualizacion: now,
            responsable_email: updates.owner_email.as_ref().map(|e| e.as_str()),
            tiempo_estimado_dias: updates.lead_time_days.map(LeadTimeDays::get),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::service::Category;

    fn sample_domain_new() -> DomainNewService {
        DomainNewService::new(
            ServiceName::new("Desarrollo Web").unwrap(),
            Category::Mobile,
            ServiceDescription::new("Aplicaciones web modernas").unwrap(),
            Price::from_cents(5_000_000).unwrap(),
            EmailAddress::new("dev@example.com").unwrap(),
        )
    }

    #[test]
    fn from_domain_new_stamps_dates() {
        let domain = sample_domain_new();
        let now = Utc::now().naive_utc();
        let new = NewService::from_domain(&domain, now);
        assert_eq!(new.nombre, "Desarrollo Web");
        assert_eq!(new.categoria, "Móvil");
        assert_eq!(new.precio_centavos, 5_000_000);
        assert!(new.activo);
        assert_eq!(new.nivel_prioridad, 3);
        assert_eq!(new.tiempo_estimado_dias, 7);
        assert_eq!(new.fecha_publicacion, now.date());
        assert_eq!(new.ultima_actualizacion, now);
    }

    #[test]
    fn from_domain_update_keeps_absent_columns_empty() {
        let updates = DomainUpdateService {
            active: Some(false),
            ..DomainUpdateService::default()
        };
        let now = Utc::now().naive_utc();
        let changeset = UpdateService::from_domain(&updates, now);
        assert_eq!(changeset.activo, Some(false));
        assert!(changeset.nombre.is_none());
        assert!(changeset.precio_centavos.is_none());
        assert_eq!(changeset.ultima_actualizacion, now);
    }

    #[test]
    fn service_into_domain() {
        let now = Utc::now().naive_utc();
        let row = Service {
            id: 4,
            nombre: "Auditoría".to_string(),
            categoria: "Seguridad".to_string(),
            descripcion: "Revisión completa".to_string(),
            precio_centavos: 6_500_000,
            activo: false,
            nivel_prioridad: 5,
            fecha_publicacion: now.date(),
            ultima_actualizacion: now,
            responsable_email: "sec@example.com".to_string(),
            tiempo_estimado_dias: 20,
        };
        let domain = DomainService::try_from(row).unwrap();
        assert_eq!(domain.id.get(), 4);
        assert_eq!(domain.category, Category::Security);
        assert_eq!(domain.price.to_string(), "65000.00");
        assert!(!domain.active);
        assert_eq!(domain.priority.get(), 5);
    }

    #[test]
    fn corrupt_row_is_rejected() {
        let now = Utc::now().naive_utc();
        let row = Service {
            id: 1,
            nombre: "X".to_string(),
            categoria: "Desconocida".to_string(),
            descripcion: "Y".to_string(),
            precio_centavos: 1,
            activo: true,
            nivel_prioridad: 3,
            fecha_publicacion: now.date(),
            ultima_actualizacion: now,
            responsable_email: "x@example.com".to_string(),
            tiempo_estimado_dias: 1,
        };
        assert!(DomainService::try_from(row).is_err());
    }
}
