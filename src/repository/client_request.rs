use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::client_request::{ClientRequest, NewClientRequest, UpdateClientRequest};
use crate::domain::types::ClientRequestId;
use crate::models::client_request::{
    ClientRequest as DbClientRequest, NewClientRequest as DbNewClientRequest,
    UpdateClientRequest as DbUpdateClientRequest,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ClientRequestListQuery, ClientRequestReader, ClientRequestWriter, DieselRepository,
};

/// Loads the names of the services owning `rows` and builds domain values.
fn attach_service_names(
    conn: &mut SqliteConnection,
    rows: Vec<DbClientRequest>,
) -> RepositoryResult<Vec<ClientRequest>> {
    use crate::schema::servicios;

    let mut service_ids: Vec<i32> = rows.iter().map(|r| r.servicio_id).collect();
    service_ids.sort_unstable();
    service_ids.dedup();

    let names: HashMap<i32, String> = servicios::table
        .filter(servicios::id.eq_any(service_ids))
        .select((servicios::id, servicios::nombre))
        .load::<(i32, String)>(conn)?
        .into_iter()
        .collect();

    rows.into_iter()
        .map(|row| -> RepositoryResult<ClientRequest> {
            let name = names.get(&row.servicio_id).cloned().ok_or_else(|| {
                RepositoryError::CorruptRecord(format!(
                    "request {} references missing service {}",
                    row.id, row.servicio_id
                ))
            })?;
            Ok(row.into_domain(name)?)
        })
        .collect()
}

fn load_one(conn: &mut SqliteConnection, row: DbClientRequest) -> RepositoryResult<ClientRequest> {
    attach_service_names(conn, vec![row])?
        .pop()
        .ok_or(RepositoryError::NotFound)
}

impl ClientRequestReader for DieselRepository {
    fn get_client_request_by_id(
        &self,
        id: ClientRequestId,
    ) -> RepositoryResult<Option<ClientRequest>> {
        use crate::schema::solicitudes;

        let mut conn = self.conn()?;
        let row = solicitudes::table
            .find(id.get())
            .first::<DbClientRequest>(&mut conn)
            .optional()?;

        row.map(|row| load_one(&mut conn, row)).transpose()
    }

    fn list_client_requests(
        &self,
        query: ClientRequestListQuery,
    ) -> RepositoryResult<(usize, Vec<ClientRequest>)> {
        use crate::schema::solicitudes;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = solicitudes::table.into_boxed::<Sqlite>();

            if let Some(status) = query.status {
                items = items.filter(solicitudes::estatus.eq(status.as_str()));
            }
            if let Some(service_id) = query.service_id {
                items = items.filter(solicitudes::servicio_id.eq(service_id.get()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder()
            .order((solicitudes::fecha_creacion.desc(), solicitudes::id.desc()));

        if let Some(pagination) = &query.pagination {
            let Some(offset) = pagination.offset() else {
                return Ok((total, Vec::new()));
            };
            items = items.offset(offset).limit(pagination.limit());
        }

        let rows = items.load::<DbClientRequest>(&mut conn)?;
        let requests = attach_service_names(&mut conn, rows)?;

        Ok((total, requests))
    }
}

impl ClientRequestWriter for DieselRepository {
    fn create_client_request(
        &self,
        request: &NewClientRequest,
    ) -> RepositoryResult<ClientRequest> {
        use crate::schema::solicitudes;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let insertable = DbNewClientRequest::from_domain(request, now);

        let created = diesel::insert_into(solicitudes::table)
            .values(&insertable)
            .get_result::<DbClientRequest>(&mut conn)?;

        load_one(&mut conn, created)
    }

    fn update_client_request(
        &self,
        id: ClientRequestId,
        updates: &UpdateClientRequest,
    ) -> RepositoryResult<ClientRequest> {
        use crate::schema::solicitudes;

        let mut conn = self.conn()?;
        let changeset: DbUpdateClientRequest = updates.into();

        let row = if changeset.is_empty() {
            solicitudes::table
                .find(id.get())
                .first::<DbClientRequest>(&mut conn)?
        } else {
            diesel::update(solicitudes::table.find(id.get()))
                .set(&changeset)
                .get_result::<DbClientRequest>(&mut conn)?
        };

        load_one(&mut conn, row)
    }

    fn delete_client_request(&self, id: ClientRequestId) -> RepositoryResult<()> {
        use crate::schema::solicitudes;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(solicitudes::table.find(id.get())).execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
