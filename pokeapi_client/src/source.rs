//! Source abstraction for the upstream catalog.
//!
//! [`CatalogSource`] is the unified interface the ingestion side talks to.
//! The real implementation is [`crate::pokeapi::PokeApiClient`]; tests swap in
//! in-memory fakes through `dyn CatalogSource`.

use async_trait::async_trait;

use crate::{
    errors::SourceError,
    models::{CreatureRecord, GenerationDetail, PokemonDetail, SpeciesDetail, SummaryPage},
};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches one listing page of creature summaries.
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<SummaryPage, SourceError>;

    /// Fetches the detail payload behind a listing entry URL.
    async fn fetch_detail(&self, url: &str) -> Result<PokemonDetail, SourceError>;

    /// Fetches the species payload referenced by a detail payload.
    async fn fetch_species(&self, url: &str) -> Result<SpeciesDetail, SourceError>;

    /// Fetches the generation payload behind a generation reference URL.
    async fn fetch_generation(&self, url: &str) -> Result<GenerationDetail, SourceError>;

    /// Fetches detail + species for one listing entry and merges them.
    async fn fetch_record(&self, detail_url: &str) -> Result<CreatureRecord, SourceError> {
        let detail = self.fetch_detail(detail_url).await?;
        let species = self.fetch_species(&detail.species.url).await?;
        Ok(CreatureRecord::merge(detail, species))
    }
}
