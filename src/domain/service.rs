use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    EmailAddress, LeadTimeDays, Price, Priority, ServiceDescription, ServiceId, ServiceName,
    TypeConstraintError,
};

/// Closed set of catalog categories.
///
/// Wire and storage values keep the catalog's Spanish labels; the English
/// names are accepted as aliases on input.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Web")]
    Web,
    #[serde(rename = "Móvil", alias = "Mobile", alias = "Movil")]
    Mobile,
    #[serde(rename = "Cloud")]
    Cloud,
    #[serde(rename = "Data")]
    Data,
    #[serde(rename = "Seguridad", alias = "Security")]
    Security,
    #[serde(rename = "Consultoría", alias = "Consulting", alias = "Consultoria")]
    Consulting,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Web,
        Category::Mobile,
        Category::Cloud,
        Category::Data,
        Category::Security,
        Category::Consulting,
    ];

    /// Value stored in the database and exposed over the API.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Web => "Web",
            Category::Mobile => "Móvil",
            Category::Cloud => "Cloud",
            Category::Data => "Data",
            Category::Security => "Seguridad",
            Category::Consulting => "Consultoría",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Web" => Ok(Category::Web),
            "Móvil" | "Movil" | "Mobile" => Ok(Category::Mobile),
            "Cloud" => Ok(Category::Cloud),
            "Data" => Ok(Category::Data),
            "Seguridad" | "Security" => Ok(Category::Security),
            "Consultoría" | "Consultoria" | "Consulting" => Ok(Category::Consulting),
            other => Err(TypeConstraintError::UnknownCategory(other.to_string())),
        }
    }
}

/// Explicit re-ordering directive accepted by the catalog listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceOrdering {
    PriceAsc,
    PriceDesc,
    PublishedAsc,
    PublishedDesc,
}

impl ServiceOrdering {
    /// Parses the `ordenar_por` query value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "precio_asc" => Some(ServiceOrdering::PriceAsc),
            "precio_desc" => Some(ServiceOrdering::PriceDesc),
            "fecha_asc" => Some(ServiceOrdering::PublishedAsc),
            "fecha_desc" => Some(ServiceOrdering::PublishedDesc),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: ServiceId,
    pub name: ServiceName,
    pub category: Category,
    pub description: ServiceDescription,
    pub price: Price,
    pub active: bool,
    pub priority: Priority,
    /// Set once at creation.
    pub published_on: NaiveDate,
    /// Refreshed on every mutation, including soft-delete.
    pub updated_at: NaiveDateTime,
    pub owner_email: EmailAddress,
    pub lead_time_days: LeadTimeDays,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewService {
    pub name: ServiceName,
    pub category: Category,
    pub description: ServiceDescription,
    pub price: Price,
    pub active: bool,
    pub priority: Priority,
    pub owner_email: EmailAddress,
    pub lead_time_days: LeadTimeDays,
}

impl NewService {
    /// Creates an active service with default priority and lead time.
    #[must_use]
    pub fn new(
        name: ServiceName,
        category: Category,
        description: ServiceDescription,
        price: Price,
        owner_email: EmailAddress,
    ) -> Self {
        Self {
            name,
            category,
            description,
            price,
            active: true,
            priority: Priority::default(),
            owner_email,
            lead_time_days: LeadTimeDays::default(),
        }
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_lead_time(mut self, lead_time_days: LeadTimeDays) -> Self {
        self.lead_time_days = lead_time_days;
        self
    }
}

/// Partial set of changes applied to a [`Service`].
///
/// The publication date is intentionally absent: it cannot be changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateService {
    pub name: Option<ServiceName>,
    pub category: Option<Category>,
    pub description: Option<ServiceDescription>,
    pub price: Option<Price>,
    pub active: Option<bool>,
    pub priority: Option<Priority>,
    pub owner_email: Option<EmailAddress>,
    pub lead_time_days: Option<LeadTimeDays>,
}
