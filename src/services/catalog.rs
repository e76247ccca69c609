//! Service catalog operations: listing, CRUD, soft delete and the nested
//! request collection.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::domain::client_request::ClientRequest;
use crate::domain::service::{Category, Service, ServiceOrdering};
use crate::domain::types::ServiceId;
use crate::dto::service::ServiceListParams;
use crate::forms::WriteMode;
use crate::forms::client_request::ClientRequestPayload;
use crate::forms::service::ServicePayload;
use crate::pagination::{PageRequest, PageSettings, Paginated};
use crate::repository::{
    ClientRequestListQuery, ClientRequestReader, ClientRequestWriter, ServiceListQuery,
    ServiceReader, ServiceWriter,
};
use crate::services::client_requests::create_validated_request;
use crate::services::{ServiceError, ServiceResult};

/// Message returned after a successful soft delete.
pub const DEACTIVATED_MESSAGE: &str = "Servicio desactivado correctamente";

/// Message for a choice filter value outside the closed set.
pub(crate) fn invalid_choice_message(value: &str) -> String {
    format!("Seleccione una opción válida. {value} no es una de las opciones disponibles.")
}

/// Trims a raw query value, treating blank values as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `activo` is true only for `true`, `1` or `yes` in any case.
fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value).ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .and_then(Decimal::from_f64)
    })
}

/// Converts a price bound into cents, rounding with `round` so that the
/// bound stays inclusive. Unparsable input yields `None`.
fn price_bound_cents(value: &str, round: fn(&Decimal) -> Decimal) -> Option<i64> {
    let cents = round(&parse_decimal(value)?.checked_mul(Decimal::ONE_HUNDRED)?);
    Some(cents.to_i64().unwrap_or(if cents.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Turns raw query parameters into a [`ServiceListQuery`].
///
/// Numeric parameters are lenient: values that do not parse are ignored. An
/// unknown `categoria` is rejected since the set is closed. Unknown
/// `ordenar_por` values keep the default ordering.
pub fn build_service_query(
    params: &ServiceListParams,
    settings: PageSettings,
) -> ServiceResult<ServiceListQuery> {
    let mut query = ServiceListQuery::new();

    if let Some(raw) = non_blank(params.categoria.as_deref()) {
        let category = Category::from_str(raw)
            .map_err(|_| ServiceError::field("categoria", invalid_choice_message(raw)))?;
        query = query.category(category);
    }
    if let Some(raw) = params.activo.as_deref() {
        query = query.active(parse_flag(raw.trim()));
    }
    if let Some(cents) =
        non_blank(params.min_precio.as_deref()).and_then(|v| price_bound_cents(v, Decimal::ceil))
    {
        query = query.min_price_cents(cents);
    }
    if let Some(cents) =
        non_blank(params.max_precio.as_deref()).and_then(|v| price_bound_cents(v, Decimal::floor))
    {
        query = query.max_price_cents(cents);
    }
    if let Some(term) = non_blank(params.search.as_deref()) {
        query = query.search(term);
    }
    if let Some(ordering) =
        non_blank(params.ordenar_por.as_deref()).and_then(ServiceOrdering::parse)
    {
        query = query.ordering(ordering);
    }

    Ok(query.paginate(PageRequest::from_params(
        params.page.as_deref(),
        params.page_size.as_deref(),
        settings,
    )))
}

/// Returns one page of the filtered catalog. An empty page is not an error.
pub fn list_services<R>(
    repo: &R,
    params: &ServiceListParams,
    settings: PageSettings,
) -> ServiceResult<Paginated<Service>>
where
    R: ServiceReader + ?Sized,
{
    let query = build_service_query(params, settings)?;
    let page = query.pagination.unwrap_or(PageRequest::from_params(None, None, settings));

    let (total, services) = repo.list_services(query).map_err(|err| {
        log::error!("Failed to list services: {err}");
        err
    })?;

    Ok(Paginated::new(services, total, page))
}

/// Fetches a service, mapping absent or non-positive ids to `NotFound`.
pub fn get_service<R>(repo: &R, id: i32) -> ServiceResult<Service>
where
    R: ServiceReader + ?Sized,
{
    let id = ServiceId::new(id).map_err(|_| ServiceError::NotFound)?;
    repo.get_service_by_id(id)?.ok_or(ServiceError::NotFound)
}

pub fn create_service<R>(repo: &R, payload: ServicePayload) -> ServiceResult<Service>
where
    R: ServiceWriter + ?Sized,
{
    payload.validate_for(WriteMode::Full)?;
    let new_service = payload.into_new_service()?;

    let service = repo.create_service(&new_service).map_err(|err| {
        log::error!("Failed to create service: {err}");
        err
    })?;
    log::info!("Created service {} ({})", service.id, service.name);

    Ok(service)
}

/// Applies a full (`PUT`) or partial (`PATCH`) update.
///
/// The record is looked up first so a missing service is reported as
/// `NotFound` before the body is validated.
pub fn update_service<R>(
    repo: &R,
    id: i32,
    payload: ServicePayload,
    mode: WriteMode,
) -> ServiceResult<Service>
where
    R: ServiceReader + ServiceWriter + ?Sized,
{
    let existing = get_service(repo, id)?;

    payload.validate_for(mode)?;
    let updates = payload.into_update()?;

    repo.update_service(existing.id, &updates).map_err(|err| {
        log::error!("Failed to update service {}: {err}", existing.id);
        ServiceError::from(err)
    })
}

/// Soft-deletes a service. Deactivating an inactive service succeeds.
pub fn deactivate_service<R>(repo: &R, id: i32) -> ServiceResult<Service>
where
    R: ServiceReader + ServiceWriter + ?Sized,
{
    let existing = get_service(repo, id)?;

    let service = repo.deactivate_service(existing.id).map_err(|err| {
        log::error!("Failed to deactivate service {}: {err}", existing.id);
        err
    })?;
    log::info!("Deactivated service {}", service.id);

    Ok(service)
}

/// Lists every request of a service, newest first, without pagination.
pub fn list_service_requests<R>(repo: &R, id: i32) -> ServiceResult<Vec<ClientRequest>>
where
    R: ServiceReader + ClientRequestReader + ?Sized,
{
    let service = get_service(repo, id)?;

    let (_total, requests) =
        repo.list_client_requests(ClientRequestListQuery::new().service(service.id))?;

    Ok(requests)
}

/// Creates a request under a service. The path id always wins over any
/// `servicio` sent in the body. Inactive services still accept requests.
pub fn create_service_request<R>(
    repo: &R,
    id: i32,
    mut payload: ClientRequestPayload,
) -> ServiceResult<ClientRequest>
where
    R: ServiceReader + ClientRequestWriter + ?Sized,
{
    let service = get_service(repo, id)?;
    payload.servicio = Some(service.id.get());
    payload.type_errors.retain(|(field, _)| *field != "servicio");

    create_validated_request(repo, payload)
}
