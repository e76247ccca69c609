//! Database models shared across the catalog repository.

pub mod client_request;
#[cfg(feature = "server")]
pub mod config;
pub mod service;
