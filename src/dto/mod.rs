//! DTOs that bridge services with the JSON API.

use serde::{Deserialize, Serialize};

pub mod client_request;
pub mod service;

/// Plain acknowledgement body, e.g. after a soft delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
