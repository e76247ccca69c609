//! Domain aggregates exposed by the catalog service layer.

pub mod client_request;
pub mod service;
pub mod types;
