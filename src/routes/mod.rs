//! HTTP handlers of the catalog API.

use actix_web::web;

use crate::errors::{json_error_handler, not_found, path_error_handler, query_error_handler};

pub mod main;
pub mod requests;
pub mod services;

/// Registers every route together with the extractor error handlers that
/// render failures in the error envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(main::health)
        .service(services::list_services)
        .service(services::create_service)
        .service(services::get_service)
        .service(services::replace_service)
        .service(services::patch_service)
        .service(services::delete_service)
        .service(services::list_service_requests)
        .service(services::create_service_request)
        .service(requests::list_requests)
        .service(requests::create_request)
        .service(requests::get_request)
        .service(requests::replace_request)
        .service(requests::patch_request)
        .service(requests::delete_request)
        .default_service(web::to(not_found));
}
