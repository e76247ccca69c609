use crate::db::{DbConnection, DbPool};
use crate::domain::client_request::{
    ClientRequest, NewClientRequest, RequestStatus, UpdateClientRequest,
};
use crate::domain::service::{Category, NewService, Service, ServiceOrdering, UpdateService};
use crate::domain::types::{ClientRequestId, ServiceId};
use crate::pagination::PageRequest;
use crate::repository::errors::RepositoryResult;

pub mod client_request;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod service;

/// Filter-and-order pipeline for the service catalog.
///
/// Filters are applied in a fixed order: equality (`category`, `active`),
/// range (`min_price_cents`, `max_price_cents`), `search`, then `ordering`.
/// All filters combine with logical AND; `search` matches name OR
/// description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceListQuery {
    pub category: Option<Category>,
    pub active: Option<bool>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub search: Option<String>,
    /// Overrides the default (publication date desc, name asc) ordering.
    pub ordering: Option<ServiceOrdering>,
    pub pagination: Option<PageRequest>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientRequestListQuery {
    pub status: Option<RequestStatus>,
    pub service_id: Option<ServiceId>,
    pub pagination: Option<PageRequest>,
}

impl ServiceListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn min_price_cents(mut self, cents: i64) -> Self {
        self.min_price_cents = Some(cents);
        self
    }

    pub fn max_price_cents(mut self, cents: i64) -> Self {
        self.max_price_cents = Some(cents);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn ordering(mut self, ordering: ServiceOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn paginate(mut self, request: PageRequest) -> Self {
        self.pagination = Some(request);
        self
    }
}

impl ClientRequestListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn service(mut self, service_id: ServiceId) -> Self {
        self.service_id = Some(service_id);
        self
    }

    pub fn paginate(mut self, request: PageRequest) -> Self {
        self.pagination = Some(request);
        self
    }
}

pub trait ServiceReader {
    fn get_service_by_id(&self, id: ServiceId) -> RepositoryResult<Option<Service>>;
    fn list_services(&self, query: ServiceListQuery) -> RepositoryResult<(usize, Vec<Service>)>;
}

pub trait ServiceWriter {
    fn create_service(&self, new_service: &NewService) -> RepositoryResult<Service>;
    fn update_service(&self, id: ServiceId, updates: &UpdateService) -> RepositoryResult<Service>;
    /// Soft-delete: flags the service inactive and refreshes its timestamp.
    fn deactivate_service(&self, id: ServiceId) -> RepositoryResult<Service>;
}

pub trait ClientRequestReader {
    fn get_client_request_by_id(
        &self,
        id: ClientRequestId,
    ) -> RepositoryResult<Option<ClientRequest>>;
    fn list_client_requests(
        &self,
        query: ClientRequestListQuery,
    ) -> RepositoryResult<(usize, Vec<ClientRequest>)>;
}

pub trait ClientRequestWriter {
    fn create_client_request(&self, request: &NewClientRequest)
    -> RepositoryResult<ClientRequest>;
    fn update_client_request(
        &self,
        id: ClientRequestId,
        updates: &UpdateClientRequest,
    ) -> RepositoryResult<ClientRequest>;
    fn delete_client_request(&self, id: ClientRequestId) -> RepositoryResult<()>;
}

/// Diesel-backed repository implementing every reader and writer trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(crate::db::get_connection(&self.pool)?)
    }
}

/// Builds a `LIKE` pattern matching `term` anywhere, escaping wildcards with `\`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
