use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::unicode_lower;
use crate::domain::service::{NewService, Service, ServiceOrdering, UpdateService};
use crate::domain::types::ServiceId;
use crate::models::service::{
    NewService as DbNewService, Service as DbService, UpdateService as DbUpdateService,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, ServiceListQuery, ServiceReader, ServiceWriter, contains_pattern,
};

impl ServiceReader for DieselRepository {
    fn get_service_by_id(&self, id: ServiceId) -> RepositoryResult<Option<Service>> {
        use crate::schema::servicios;

        let mut conn = self.conn()?;
        let service = servicios::table
            .find(id.get())
            .first::<DbService>(&mut conn)
            .optional()?;

        service
            .map(Service::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_services(&self, query: ServiceListQuery) -> RepositoryResult<(usize, Vec<Service>)> {
        use crate::schema::servicios;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = servicios::table.into_boxed::<Sqlite>();

            if let Some(category) = query.category {
                items = items.filter(servicios::categoria.eq(category.as_str()));
            }
            if let Some(active) = query.active {
                items = items.filter(servicios::activo.eq(active));
            }
            if let Some(min) = query.min_price_cents {
                items = items.filter(servicios::precio_centavos.ge(min));
            }
            if let Some(max) = query.max_price_cents {
                items = items.filter(servicios::precio_centavos.le(max));
            }
            if let Some(term) = &query.search {
                let pattern = contains_pattern(&term.to_lowercase());
                items = items.filter(
                    unicode_lower(servicios::nombre)
                        .like(pattern.clone())
                        .escape('\\')
                        .or(unicode_lower(servicios::descripcion)
                            .like(pattern)
                            .escape('\\')),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = match query.ordering {
            Some(ServiceOrdering::PriceAsc) => {
                query_builder().order((servicios::precio_centavos.asc(), servicios::id.asc()))
            }
            Some(ServiceOrdering::PriceDesc) => {
                query_builder().order((servicios::precio_centavos.desc(), servicios::id.asc()))
            }
            Some(ServiceOrdering::PublishedAsc) => {
                query_builder().order((servicios::fecha_publicacion.asc(), servicios::id.asc()))
            }
            Some(ServiceOrdering::PublishedDesc) => {
                query_builder().order((servicios::fecha_publicacion.desc(), servicios::id.asc()))
            }
            None => query_builder().order((
                servicios::fecha_publicacion.desc(),
                servicios::nombre.asc(),
                servicios::id.asc(),
            )),
        };

        if let Some(pagination) = &query.pagination {
            let Some(offset) = pagination.offset() else {
                return Ok((total, Vec::new()));
            };
            items = items.offset(offset).limit(pagination.limit());
        }

        let services = items
            .load::<DbService>(&mut conn)?
            .into_iter()
            .map(Service::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, services))
    }
}

impl ServiceWriter for DieselRepository {
    fn create_service(&self, new_service: &NewService) -> RepositoryResult<Service> {
        use crate::schema::servicios;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let insertable = DbNewService::from_domain(new_service, now);

        let created = diesel::insert_into(servicios::table)
            .values(&insertable)
            .get_result::<DbService>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_service(&self, id: ServiceId, updates: &UpdateService) -> RepositoryResult<Service> {
        use crate::schema::servicios;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let changeset = DbUpdateService::from_domain(updates, now);

        let updated = diesel::update(servicios::table.find(id.get()))
            .set(&changeset)
            .get_result::<DbService>(&mut conn)?;

        Ok(updated.try_into()?)
    }

    fn deactivate_service(&self, id: ServiceId) -> RepositoryResult<Service> {
        use crate::schema::servicios;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let updated = diesel::update(servicios::table.find(id.get()))
            .set((
                servicios::activo.eq(false),
                servicios::ultima_actualizacion.eq(now),
            ))
            .get_result::<DbService>(&mut conn)?;

        Ok(updated.try_into()?)
    }
}
