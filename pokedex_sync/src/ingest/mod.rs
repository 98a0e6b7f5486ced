//! Ingestion orchestrator.
//!
//! ## What this does
//! - Fetches a listing page of creature summaries from the upstream catalog.
//! - For each entry, fetches the detail and species payloads (pipelined with
//!   a small bounded concurrency) and merges them into one record.
//! - Resolves sub-entities through the natural-key resolver, samples the
//!   candidate move list down to four BEFORE resolving it, and persists the
//!   aggregate.
//!
//! ## Transactions & consistency
//! Each creature aggregate (row + association rows) commits inside a single
//! `immediate_transaction`; sub-entity rows created by the resolver stay
//! persisted regardless, since they are shared across creatures and never
//! deleted by this path.
//!
//! ## Failure semantics
//! A failure of the listing fetch itself aborts the run. Any per-item
//! failure — fetch, payload shape, database — is logged, counted in the
//! report, and the batch continues with the next entry.
//!
//! ## Throttling
//! `max_pages` defaults to 1: the next-page cursor is deliberately not
//! followed further, which keeps a run small against the upstream rate
//! limit. When more pages are requested, a fixed delay is slept between
//! successive listing fetches; per-request pacing inside the client adds a
//! second layer.

use std::time::Duration;

use diesel::{Connection, SqliteConnection};
use futures::stream::{self, StreamExt};
use pokeapi_client::errors::SourceError;
use pokeapi_client::models::CreatureRecord;
use pokeapi_client::source::CatalogSource;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    catalog::{repo, resolve, sampling},
    error::{CatalogError, CatalogResult},
    models::pokedex::NewPokemon,
};

/// Tuning knobs for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Listing page size.
    pub page_size: u32,
    /// Listing pages to walk before stopping.
    pub max_pages: u32,
    /// Minimum delay between successive listing-page fetches.
    pub page_delay: Duration,
    /// How many detail+species fetch chains may be in flight at once.
    pub fetch_concurrency: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            page_size: 20,
            max_pages: 1,
            page_delay: Duration::from_millis(500),
            fetch_concurrency: 4,
        }
    }
}

/// Outcome of one ingestion run.
#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    /// Creatures fetched, resolved and persisted.
    pub succeeded: usize,
    /// Creatures skipped after a fetch or persist failure.
    pub failed: usize,
    /// One message per failed creature.
    pub errors: Vec<String>,
}

/// Runs one ingestion pass against `source`, persisting into `conn`.
pub async fn ingest(
    source: &dyn CatalogSource,
    conn: &mut SqliteConnection,
    options: &IngestOptions,
) -> CatalogResult<IngestReport> {
    let mut report = IngestReport::default();
    let mut offset = 0u32;

    for page_index in 0..options.max_pages {
        if page_index > 0 {
            tokio::time::sleep(options.page_delay).await;
        }

        // Listing failure is fatal; per-item failures below are not.
        let page = source.fetch_page(offset, options.page_size).await?;
        let entries = page.results;

        let fetched: Vec<(String, Result<CreatureRecord, SourceError>)> =
            stream::iter(entries.into_iter())
                .map(|entry| async move {
                    let record = source.fetch_record(&entry.url).await;
                    (entry.name, record)
                })
                .buffered(options.fetch_concurrency.max(1))
                .collect()
                .await;

        for (name, outcome) in fetched {
            let persisted = match outcome {
                Ok(record) => persist_record(conn, source, &record).await,
                Err(err) => Err(err.into()),
            };
            match persisted {
                Ok(()) => report.succeeded += 1,
                Err(err) => {
                    warn!(creature = %name, error = %err, "skipping creature");
                    report.failed += 1;
                    report.errors.push(format!("{name}: {err}"));
                }
            }
        }

        offset += options.page_size;
        if page.next.is_none() {
            break;
        }
    }

    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "ingestion run finished"
    );
    Ok(report)
}

/// Resolves sub-entities for one merged record and commits the aggregate.
async fn persist_record(
    conn: &mut SqliteConnection,
    source: &dyn CatalogSource,
    record: &CreatureRecord,
) -> CatalogResult<()> {
    let generation = match &record.generation {
        Some(reference) => Some(resolve::resolve_generation(conn, source, reference).await?),
        None => None,
    };
    let types = resolve::resolve_types(conn, &record.type_names)?;

    // Sample first: moves that lose the draw never become rows.
    let sampled = {
        let mut rng = rand::rng();
        sampling::select_moves(&record.move_names, &mut rng)
    };
    let moves = resolve::resolve_moves(conn, &sampled)?;

    let images = serde_json::to_string(&record.images)
        .map_err(|e| CatalogError::Validation(format!("unserializable image map: {e}")))?;

    let row = NewPokemon {
        id: record.id,
        name: &record.name,
        images: &images,
        is_legendary: record.is_legendary,
        generation_id: generation.as_ref().map(|g| g.id),
        pre_evolution_id: None,
    };
    let type_ids: Vec<i32> = types.iter().map(|t| t.id).collect();
    let move_ids: Vec<i32> = moves.iter().map(|m| m.id).collect();

    conn.immediate_transaction::<_, CatalogError, _>(|conn| {
        repo::upsert_pokemon(conn, &row)?;
        repo::replace_type_links(conn, record.id, &type_ids)?;
        repo::replace_move_links(conn, record.id, &move_ids)?;
        Ok(())
    })
}
