//! Natural-key upsert resolution for shared sub-entities.
//!
//! ## What this does
//! - Looks up Type/Move/Generation rows by their unique name and creates the
//!   ones that do not exist yet, so association building always has a
//!   persisted row to point at.
//! - Deduplicates repeated names within one call while preserving first
//!   occurrence order; the same name never yields two rows.
//!
//! ## Races
//! Lookup-then-insert is not atomic across connections; the UNIQUE
//! constraint on `name` is the actual guarantee. A `UniqueViolation` raised
//! by the insert means another writer created the row in between, so the
//! lookup is retried instead of surfacing the error.
//!
//! ## Generations
//! A generation name that is absent locally needs one secondary upstream
//! fetch to learn its id and region before the row can be constructed. That
//! fetch failure propagates to the caller; the creature referencing it is
//! then counted as failed, not silently skipped.

use std::collections::HashSet;

use diesel::SqliteConnection;
use diesel::result::{DatabaseErrorKind, Error as DieselError, QueryResult};
use pokeapi_client::{models::NamedRef, source::CatalogSource};
use tracing::debug;

use crate::{
    catalog::repo,
    error::{CatalogError, CatalogResult},
    models::pokedex::{NewPokeGeneration, PokeGeneration, PokeMove, PokeType},
};

/// Resolves every distinct type name to a persisted row, creating absent ones.
pub fn resolve_types(conn: &mut SqliteConnection, names: &[String]) -> CatalogResult<Vec<PokeType>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for raw in names {
        let name = raw.trim();
        if name.is_empty() || !seen.insert(name.to_string()) {
            continue;
        }
        out.push(resolve_one(
            conn,
            name,
            repo::find_type_by_name,
            repo::insert_type,
        )?);
    }
    Ok(out)
}

/// Resolves every distinct move name to a persisted row, creating absent ones.
pub fn resolve_moves(conn: &mut SqliteConnection, names: &[String]) -> CatalogResult<Vec<PokeMove>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for raw in names {
        let name = raw.trim();
        if name.is_empty() || !seen.insert(name.to_string()) {
            continue;
        }
        out.push(resolve_one(
            conn,
            name,
            repo::find_move_by_name,
            repo::insert_move,
        )?);
    }
    Ok(out)
}

/// Resolves a generation reference to a persisted row.
///
/// When the name is not present locally, performs exactly one secondary
/// fetch against `reference.url` to obtain the upstream id and region.
pub async fn resolve_generation(
    conn: &mut SqliteConnection,
    source: &dyn CatalogSource,
    reference: &NamedRef,
) -> CatalogResult<PokeGeneration> {
    if let Some(existing) = repo::find_generation_by_name(conn, &reference.name)? {
        return Ok(existing);
    }

    let fetched = source.fetch_generation(&reference.url).await?;
    let row = NewPokeGeneration {
        id: fetched.id,
        name: &reference.name,
        region: &fetched.main_region.name,
    };

    match repo::insert_generation(conn, &row) {
        Ok(created) => {
            debug!(name = %created.name, region = %created.region, "created generation");
            Ok(created)
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            repo::find_generation_by_name(conn, &reference.name)?
                .ok_or_else(|| CatalogError::Conflict(format!("generation {}", reference.name)))
        }
        Err(e) => Err(e.into()),
    }
}

fn resolve_one<T, F, I>(
    conn: &mut SqliteConnection,
    name: &str,
    find: F,
    insert: I,
) -> CatalogResult<T>
where
    F: Fn(&mut SqliteConnection, &str) -> QueryResult<Option<T>>,
    I: Fn(&mut SqliteConnection, &str) -> QueryResult<T>,
{
    if let Some(existing) = find(conn, name)? {
        return Ok(existing);
    }

    match insert(conn, name) {
        Ok(created) => Ok(created),
        // Lost the insert race; the row exists now.
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => find(conn, name)?
            .ok_or_else(|| CatalogError::Conflict(name.to_string())),
        Err(e) => Err(e.into()),
    }
}
