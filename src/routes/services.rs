use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde_json::Value;

use crate::dto::MessageResponse;
use crate::dto::client_request::{ClientRequestView, NestedClientRequestView};
use crate::dto::service::{ServiceListParams, ServiceView};
use crate::errors::ApiError;
use crate::forms::WriteMode;
use crate::forms::client_request::ClientRequestPayload;
use crate::forms::service::ServicePayload;
use crate::pagination::PageSettings;
use crate::repository::DieselRepository;
use crate::services::catalog;

#[get("/services")]
pub async fn list_services(
    params: web::Query<ServiceListParams>,
    repo: web::Data<DieselRepository>,
    settings: web::Data<PageSettings>,
) -> Result<HttpResponse, ApiError> {
    let page = catalog::list_services(repo.get_ref(), &params, *settings.get_ref())?;
    Ok(HttpResponse::Ok().json(page.map(ServiceView::from)))
}

#[post("/services")]
pub async fn create_service(
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let payload = ServicePayload::from_json(body);
    let service = catalog::create_service(repo.get_ref(), payload)?;
    Ok(HttpResponse::Created().json(ServiceView::from(service)))
}

#[get("/services/{id}")]
pub async fn get_service(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ApiError> {
    let service = catalog::get_service(repo.get_ref(), id.into_inner())?;
    Ok(HttpResponse::Ok().json(ServiceView::from(service)))
}

#[put("/services/{id}")]
pub async fn replace_service(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let payload = ServicePayload::from_json(body);
    let service =
        catalog::update_service(repo.get_ref(), id.into_inner(), payload, WriteMode::Full)?;
    Ok(HttpResponse::Ok().json(ServiceView::from(service)))
}

#[patch("/services/{id}")]
pub async fn patch_service(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let payload = ServicePayload::from_json(body);
    let service =
        catalog::update_service(repo.get_ref(), id.into_inner(), payload, WriteMode::Partial)?;
    Ok(HttpResponse::Ok().json(ServiceView::from(service)))
}

/// Soft delete: the service stays in the catalog as inactive.
#[delete("/services/{id}")]
pub async fn delete_service(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ApiError> {
    catalog::deactivate_service(repo.get_ref(), id.into_inner())?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(catalog::DEACTIVATED_MESSAGE)))
}

#[get("/services/{id}/requests")]
pub async fn list_service_requests(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ApiError> {
    let requests = catalog::list_service_requests(repo.get_ref(), id.into_inner())?;
    let views: Vec<NestedClientRequestView> = requests.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(views))
}

#[post("/services/{id}/requests")]
pub async fn create_service_request(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let payload = ClientRequestPayload::from_json(body);
    let request = catalog::create_service_request(repo.get_ref(), id.into_inner(), payload)?;
    Ok(HttpResponse::Created().json(ClientRequestView::from(request)))
}
