//! Operations on the top-level client request collection.

use std::str::FromStr;

use validator::ValidationErrors;

use crate::domain::client_request::{ClientRequest, RequestStatus};
use crate::domain::types::{ClientRequestId, ServiceId};
use crate::dto::client_request::ClientRequestListParams;
use crate::forms::client_request::{ClientRequestPayload, unknown_service_message};
use crate::forms::{WriteMode, error_with_message, into_result};
use crate::pagination::{PageRequest, PageSettings, Paginated};
use crate::repository::{
    ClientRequestListQuery, ClientRequestReader, ClientRequestWriter, ServiceReader,
};
use crate::services::catalog::{invalid_choice_message, non_blank};
use crate::services::{ServiceError, ServiceResult};

/// Adds a `servicio` error when the payload names a service that does not
/// exist. Skipped if the field already failed validation.
fn check_service_reference<R>(
    repo: &R,
    payload: &ClientRequestPayload,
    errors: &mut ValidationErrors,
) -> ServiceResult<()>
where
    R: ServiceReader + ?Sized,
{
    let Some(raw_id) = payload.servicio else {
        return Ok(());
    };
    if errors.field_errors().contains_key("servicio") {
        return Ok(());
    }

    let exists = match ServiceId::new(raw_id) {
        Ok(id) => repo.get_service_by_id(id)?.is_some(),
        Err(_) => false,
    };
    if !exists {
        errors.add(
            "servicio",
            error_with_message("does_not_exist", unknown_service_message(raw_id)),
        );
    }
    Ok(())
}

fn validate_payload<R>(
    repo: &R,
    payload: &ClientRequestPayload,
    mode: WriteMode,
) -> ServiceResult<()>
where
    R: ServiceReader + ?Sized,
{
    let mut errors = payload.collect_errors(mode);
    check_service_reference(repo, payload, &mut errors)?;
    into_result(errors)?;
    Ok(())
}

/// Validates a full payload, including the service reference, and stores it.
pub(crate) fn create_validated_request<R>(
    repo: &R,
    payload: ClientRequestPayload,
) -> ServiceResult<ClientRequest>
where
    R: ServiceReader + ClientRequestWriter + ?Sized,
{
    validate_payload(repo, &payload, WriteMode::Full)?;
    let new_request = payload.into_new_request()?;

    let request = repo.create_client_request(&new_request).map_err(|err| {
        log::error!("Failed to create client request: {err}");
        err
    })?;
    log::info!(
        "Created client request {} for service {}",
        request.id,
        request.service_id
    );

    Ok(request)
}

/// Turns raw query parameters into a [`ClientRequestListQuery`].
///
/// An unknown `estatus` or a non-numeric `servicio` is rejected. Returns
/// `None` when `servicio` is an integer no service can carry (zero or
/// negative), so the listing is empty.
pub fn build_request_query(
    params: &ClientRequestListParams,
    settings: PageSettings,
) -> ServiceResult<Option<ClientRequestListQuery>> {
    let mut query = ClientRequestListQuery::new().paginate(PageRequest::from_params(
        params.page.as_deref(),
        params.page_size.as_deref(),
        settings,
    ));

    if let Some(raw) = non_blank(params.estatus.as_deref()) {
        let status = RequestStatus::from_str(raw)
            .map_err(|_| ServiceError::field("estatus", invalid_choice_message(raw)))?;
        query = query.status(status);
    }
    if let Some(raw) = non_blank(params.servicio.as_deref()) {
        let id = raw
            .parse::<i32>()
            .map_err(|_| ServiceError::field("servicio", invalid_choice_message(raw)))?;
        match ServiceId::new(id) {
            Ok(service_id) => query = query.service(service_id),
            Err(_) => return Ok(None),
        }
    }

    Ok(Some(query))
}

/// Returns one page of requests, newest first.
pub fn list_client_requests<R>(
    repo: &R,
    params: &ClientRequestListParams,
    settings: PageSettings,
) -> ServiceResult<Paginated<ClientRequest>>
where
    R: ClientRequestReader + ?Sized,
{
    let page = PageRequest::from_params(
        params.page.as_deref(),
        params.page_size.as_deref(),
        settings,
    );
    let Some(query) = build_request_query(params, settings)? else {
        return Ok(Paginated::new(Vec::new(), 0, page));
    };

    let (total, requests) = repo.list_client_requests(query).map_err(|err| {
        log::error!("Failed to list client requests: {err}");
        err
    })?;

    Ok(Paginated::new(requests, total, page))
}

pub fn get_client_request<R>(repo: &R, id: i32) -> ServiceResult<ClientRequest>
where
    R: ClientRequestReader + ?Sized,
{
    let id = ClientRequestId::new(id).map_err(|_| ServiceError::NotFound)?;
    repo.get_client_request_by_id(id)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a request from `POST /requests`; `servicio` is required and must
/// exist.
pub fn create_client_request<R>(
    repo: &R,
    payload: ClientRequestPayload,
) -> ServiceResult<ClientRequest>
where
    R: ServiceReader + ClientRequestWriter + ?Sized,
{
    create_validated_request(repo, payload)
}

/// Applies a full (`PUT`) or partial (`PATCH`) update. Any status may be set
/// at any time.
pub fn update_client_request<R>(
    repo: &R,
    id: i32,
    payload: ClientRequestPayload,
    mode: WriteMode,
) -> ServiceResult<ClientRequest>
where
    R: ServiceReader + ClientRequestReader + ClientRequestWriter + ?Sized,
{
    let existing = get_client_request(repo, id)?;

    validate_payload(repo, &payload, mode)?;
    let updates = payload.into_update()?;

    repo.update_client_request(existing.id, &updates)
        .map_err(|err| {
            log::error!("Failed to update client request {}: {err}", existing.id);
            ServiceError::from(err)
        })
}

/// Permanently removes a request.
pub fn delete_client_request<R>(repo: &R, id: i32) -> ServiceResult<()>
where
    R: ClientRequestReader + ClientRequestWriter + ?Sized,
{
    let existing = get_client_request(repo, id)?;

    repo.delete_client_request(existing.id)?;
    log::info!("Deleted client request {}", existing.id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::types::{ClientName, EmailAddress, RequestMessage, ServiceName};
    use crate::forms::REQUIRED_MESSAGE;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn sample_request(id: i32, service_id: i32) -> ClientRequest {
        ClientRequest {
            id: ClientRequestId::new(id).unwrap(),
            service_id: ServiceId::new(service_id).unwrap(),
            service_name: ServiceName::new("Migración Cloud").unwrap(),
            client_name: ClientName::new("Ana").unwrap(),
            client_email: EmailAddress::new("ana@example.com").unwrap(),
            message: RequestMessage::new("Necesito migrar").unwrap(),
            status: RequestStatus::New,
            created_at: NaiveDate::from_ymd_opt(2025, 4, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    fn payload(json: serde_json::Value) -> ClientRequestPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn query_parses_status_and_service() {
        let params = ClientRequestListParams {
            estatus: Some("en_proceso".into()),
            servicio: Some("4".into()),
            ..Default::default()
        };
        let query = build_request_query(&params, PageSettings::default())
            .unwrap()
            .unwrap();
        assert_eq!(query.status, Some(RequestStatus::InProgress));
        assert_eq!(query.service_id, ServiceId::new(4).ok());
    }

    #[test]
    fn unknown_filters_are_rejected() {
        for params in [
            ClientRequestListParams {
                estatus: Some("archivado".into()),
                ..Default::default()
            },
            ClientRequestListParams {
                servicio: Some("abc".into()),
                ..Default::default()
            },
        ] {
            assert!(matches!(
                build_request_query(&params, PageSettings::default()),
                Err(ServiceError::Validation(_))
            ));
        }
    }

    #[test]
    fn non_positive_service_filter_matches_nothing() {
        let mut repo = MockRepository::new();
        repo.expect_list_client_requests().times(0);

        for raw in ["0", "-5"] {
            let params = ClientRequestListParams {
                servicio: Some(raw.into()),
                ..Default::default()
            };
            let page = list_client_requests(&repo, &params, PageSettings::default()).unwrap();
            assert_eq!(page.count, 0);
            assert_eq!(page.pages, 0);
            assert!(page.results.is_empty());
        }
    }

    #[test]
    fn create_reports_missing_service_with_other_errors() {
        let mut repo = MockRepository::new();
        repo.expect_get_service_by_id()
            .with(eq(ServiceId::new(999).unwrap()))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create_client_request().times(0);

        let result = create_client_request(
            &repo,
            payload(serde_json::json!({
                "servicio": 999,
                "cliente_nombre": "Ana",
                "cliente_email": "ana@example.com",
                "mensaje": "  "
            })),
        );

        let Err(ServiceError::Validation(fields)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["servicio"], unknown_service_message(999));
        assert_eq!(fields["mensaje"], "El mensaje no puede estar vacío.");
    }

    #[test]
    fn create_requires_service() {
        let mut repo = MockRepository::new();
        repo.expect_get_service_by_id().times(0);
        repo.expect_create_client_request().times(0);

        let result = create_client_request(
            &repo,
            payload(serde_json::json!({
                "cliente_nombre": "Ana",
                "cliente_email": "ana@example.com",
                "mensaje": "Hola"
            })),
        );
        let Err(ServiceError::Validation(fields)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(fields["servicio"], REQUIRED_MESSAGE);
    }

    #[test]
    fn update_changes_status_only() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_request_by_id()
            .returning(|id| Ok(Some(sample_request(id.get(), 1))));
        repo.expect_get_service_by_id().times(0);
        repo.expect_update_client_request()
            .withf(|_, updates| {
                updates.status == Some(RequestStatus::Closed) && updates.message.is_none()
            })
            .times(1)
            .returning(|id, updates| {
                let mut request = sample_request(id.get(), 1);
                request.status = updates.status.unwrap_or_default();
                Ok(request)
            });

        let updated = update_client_request(
            &repo,
            3,
            payload(serde_json::json!({ "estatus": "cerrado" })),
            WriteMode::Partial,
        )
        .unwrap();
        assert_eq!(updated.status, RequestStatus::Closed);
    }

    #[test]
    fn delete_missing_request_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_request_by_id().returning(|_| Ok(None));
        repo.expect_delete_client_request().times(0);

        assert!(matches!(
            delete_client_request(&repo, 11),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn delete_existing_request() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_request_by_id()
            .returning(|id| Ok(Some(sample_request(id.get(), 1))));
        repo.expect_delete_client_request()
            .with(eq(ClientRequestId::new(6).unwrap()))
            .times(1)
            .returning(|_| Ok(()));

        delete_client_request(&repo, 6).unwrap();
    }

    #[test]
    fn list_paginates_results() {
        let mut repo = MockRepository::new();
        repo.expect_list_client_requests()
            .returning(|_| Ok((1, vec![sample_request(1, 2)])));

        let page =
            list_client_requests(&repo, &ClientRequestListParams::default(), PageSettings::default())
                .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.pages, 1);
        assert_eq!(page.results[0].service_id.get(), 2);
    }

    #[test]
    fn repository_errors_propagate() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_request_by_id()
            .returning(|_| Err(RepositoryError::DatabaseError("locked".into())));

        assert!(matches!(
            get_client_request(&repo, 1),
            Err(ServiceError::Repository(_))
        ));
    }
}
