//! Service settings: TOML file with serde defaults, environment override for
//! the database URL.
//!
//! Entrypoints:
//! - Parse from a TOML string: [`Settings::from_toml_str`]
//! - Read from a file path (missing file yields defaults): [`Settings::load`]

use std::{num::NonZeroU32, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

use crate::ingest::IngestOptions;

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// SQLite database path. `DATABASE_URL` in the environment wins over this.
    pub database_url: String,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Upstream source settings.
    pub source: SourceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "pokedex.db".to_string(),
            server: ServerSettings::default(),
            source: SourceSettings::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    /// Listen port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

/// Upstream source settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    /// Base URL of the catalog API.
    pub base_url: String,
    /// Listing page size per request.
    pub page_size: u32,
    /// Listing pages to walk per run; 1 keeps a run inside one page.
    pub max_pages: u32,
    /// Minimum delay between successive listing-page fetches, in ms.
    pub page_delay_ms: u64,
    /// Concurrent detail+species fetch chains.
    pub fetch_concurrency: usize,
    /// Upstream request budget per second.
    pub requests_per_second: u32,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: pokeapi_client::pokeapi::DEFAULT_BASE_URL.to_string(),
            page_size: 20,
            max_pages: 1,
            page_delay_ms: 500,
            fetch_concurrency: 4,
            requests_per_second: 5,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse settings TOML")
    }

    /// Read settings from a TOML file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Database URL with the `DATABASE_URL` environment override applied.
    pub fn database_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.database_url.clone())
    }

    /// Ingestion options derived from the source settings.
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            page_size: self.source.page_size,
            max_pages: self.source.max_pages,
            page_delay: Duration::from_millis(self.source.page_delay_ms),
            fetch_concurrency: self.source.fetch_concurrency,
        }
    }

    /// Upstream request budget as a non-zero rate.
    pub fn requests_per_second(&self) -> anyhow::Result<NonZeroU32> {
        NonZeroU32::new(self.source.requests_per_second)
            .context("source.requests_per_second must be greater than zero")
    }
}
