use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientName, ClientRequestId, EmailAddress, RequestMessage, ServiceId, ServiceName,
    TypeConstraintError,
};

/// Status label of a client request.
///
/// Any value may be set at any time; the API does not enforce transitions.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    #[default]
    #[serde(rename = "nuevo", alias = "new")]
    New,
    #[serde(rename = "en_proceso", alias = "in_progress")]
    InProgress,
    #[serde(rename = "cerrado", alias = "closed")]
    Closed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::New,
        RequestStatus::InProgress,
        RequestStatus::Closed,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "nuevo",
            RequestStatus::InProgress => "en_proceso",
            RequestStatus::Closed => "cerrado",
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nuevo" | "new" => Ok(RequestStatus::New),
            "en_proceso" | "in_progress" => Ok(RequestStatus::InProgress),
            "cerrado" | "closed" => Ok(RequestStatus::Closed),
            other => Err(TypeConstraintError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientRequest {
    pub id: ClientRequestId,
    pub service_id: ServiceId,
    /// Name of the owning service, resolved when the request is loaded.
    pub service_name: ServiceName,
    pub client_name: ClientName,
    pub client_email: EmailAddress,
    pub message: RequestMessage,
    pub status: RequestStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewClientRequest {
    pub service_id: ServiceId,
    pub client_name: ClientName,
    pub client_email: EmailAddress,
    pub message: RequestMessage,
    pub status: RequestStatus,
}

impl NewClientRequest {
    #[must_use]
    pub fn new(
        service_id: ServiceId,
        client_name: ClientName,
        client_email: EmailAddress,
        message: RequestMessage,
    ) -> Self {
        Self {
            service_id,
            client_name,
            client_email,
            message,
            status: RequestStatus::default(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateClientRequest {
    pub service_id: Option<ServiceId>,
    pub client_name: Option<ClientName>,
    pub client_email: Option<EmailAddress>,
    pub message: Option<RequestMessage>,
    pub status: Option<RequestStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_new() {
        assert_eq!(RequestStatus::default(), RequestStatus::New);
    }

    #[test]
    fn status_parses_wire_values_and_aliases() {
        for status in RequestStatus::ALL {
            assert_eq!(status.as_str().parse::<RequestStatus>(), Ok(status));
        }
        assert_eq!("in_progress".parse::<RequestStatus>(), Ok(RequestStatus::InProgress));
        let parsed: RequestStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(parsed, RequestStatus::Closed);
        assert!("archivado".parse::<RequestStatus>().is_err());
    }
}
