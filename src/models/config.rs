//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::pagination::PageSettings;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Items per page when the client does not ask for a size.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upper bound for a client-supplied `page_size`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    100
}

impl ServerConfig {
    pub fn page_settings(&self) -> PageSettings {
        PageSettings::new(self.page_size, self.max_page_size)
    }
}
