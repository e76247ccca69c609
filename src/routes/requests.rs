use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde_json::Value;

use crate::dto::client_request::{ClientRequestListParams, ClientRequestView};
use crate::errors::ApiError;
use crate::forms::WriteMode;
use crate::forms::client_request::ClientRequestPayload;
use crate::pagination::PageSettings;
use crate::repository::DieselRepository;
use crate::services::client_requests;

#[get("/requests")]
pub async fn list_requests(
    params: web::Query<ClientRequestListParams>,
    repo: web::Data<DieselRepository>,
    settings: web::Data<PageSettings>,
) -> Result<HttpResponse, ApiError> {
    let page =
        client_requests::list_client_requests(repo.get_ref(), &params, *settings.get_ref())?;
    Ok(HttpResponse::Ok().json(page.map(ClientRequestView::from)))
}

#[post("/requests")]
pub async fn create_request(
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let payload = ClientRequestPayload::from_json(body);
    let request = client_requests::create_client_request(repo.get_ref(), payload)?;
    Ok(HttpResponse::Created().json(ClientRequestView::from(request)))
}

#[get("/requests/{id}")]
pub async fn get_request(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ApiError> {
    let request = client_requests::get_client_request(repo.get_ref(), id.into_inner())?;
    Ok(HttpResponse::Ok().json(ClientRequestView::from(request)))
}

#[put("/requests/{id}")]
pub async fn replace_request(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let payload = ClientRequestPayload::from_json(body);
    let request = client_requests::update_client_request(
        repo.get_ref(),
        id.into_inner(),
        payload,
        WriteMode::Full,
    )?;
    Ok(HttpResponse::Ok().json(ClientRequestView::from(request)))
}

#[patch("/requests/{id}")]
pub async fn patch_request(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let payload = ClientRequestPayload::from_json(body);
    let request = client_requests::update_client_request(
        repo.get_ref(),
        id.into_inner(),
        payload,
        WriteMode::Partial,
    )?;
    Ok(HttpResponse::Ok().json(ClientRequestView::from(request)))
}

/// Hard delete. Answers 204 with an empty body, unlike the service delete
/// which keeps the record and returns a message.
#[delete("/requests/{id}")]
pub async fn delete_request(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ApiError> {
    client_requests::delete_client_request(repo.get_ref(), id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
