use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    errors::SourceError,
    models::{GenerationDetail, PokemonDetail, SpeciesDetail, SummaryPage},
    source::CatalogSource,
};

/// Public base URL of the hosted catalog API.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// The hosted API fair-use ceiling; stay well under it.
const DEFAULT_REQUESTS_PER_SECOND: NonZeroU32 = nonzero!(5u32);

/// HTTP implementation of [`CatalogSource`].
///
/// Every request waits on a direct rate limiter first, so a burst of per-item
/// detail fetches cannot exceed the configured requests-per-second.
pub struct PokeApiClient {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl PokeApiClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_REQUESTS_PER_SECOND)
    }

    /// Creates a client against a custom base URL, e.g. a local stub server.
    pub fn with_base_url(base_url: impl Into<String>, requests_per_second: NonZeroU32) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            limiter: RateLimiter::direct(Quota::per_second(requests_per_second)),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        self.limiter.until_ready().await;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(SourceError::Api(error_msg));
        }

        Ok(response.json::<T>().await?)
    }
}

impl Default for PokeApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<SummaryPage, SourceError> {
        let url = format!("{}/pokemon?offset={offset}&limit={limit}", self.base_url);
        self.get_json(&url).await
    }

    async fn fetch_detail(&self, url: &str) -> Result<PokemonDetail, SourceError> {
        self.get_json(url).await
    }

    async fn fetch_species(&self, url: &str) -> Result<SpeciesDetail, SourceError> {
        self.get_json(url).await
    }

    async fn fetch_generation(&self, url: &str) -> Result<GenerationDetail, SourceError> {
        self.get_json(url).await
    }
}
