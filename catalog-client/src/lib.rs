//! HTTP client for the lessoncraft catalog API.

mod client;
mod config;

pub use client::HttpCatalogClient;
pub use config::ClientConfig;
pub use config::DEFAULT_BASE_URL;
