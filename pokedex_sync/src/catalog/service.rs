//! Catalog query/command service.
//!
//! The operations the route layer calls: filtered reads, create/update/delete
//! with partial-field semantics, and the administrative list/delete surface
//! for the shared sub-entity collections. Everything runs against a caller
//! supplied connection; multi-statement writes go through
//! `immediate_transaction` so either the whole command commits or none of it.

use diesel::SqliteConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    catalog::{repo, resolve},
    error::{CatalogError, CatalogResult},
    models::pokedex::{NewPokemon, PokeGeneration, PokeMove, PokeType, Pokemon, PokemonChanges},
};

/// A creature with its associations loaded, as the route layer returns it.
#[derive(Debug, Serialize)]
pub struct PokemonView {
    /// Upstream-assigned identifier.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Sprite-slot map.
    pub images: Value,
    /// Legendary flag.
    pub is_legendary: bool,
    /// Optional self-reference to the pre-evolution creature.
    pub pre_evolution_id: Option<i32>,
    /// The generation this creature belongs to, when known.
    pub generation: Option<PokeGeneration>,
    /// Associated type rows.
    pub types: Vec<PokeType>,
    /// Associated move rows (at most four).
    pub moves: Vec<PokeMove>,
}

/// A `{ "name": ... }` element in create/update type lists.
#[derive(Debug, Deserialize)]
pub struct NamedEntry {
    /// Sub-entity name.
    pub name: String,
}

/// Creation payload; `id`, `name`, `types` and `images` are required.
#[derive(Debug, Deserialize)]
pub struct CreatePokemon {
    /// Upstream-assigned identifier.
    pub id: Option<i32>,
    /// Display name.
    pub name: Option<String>,
    /// Type list; resolved by name, created lazily.
    pub types: Option<Vec<NamedEntry>>,
    /// Sprite-slot map.
    pub images: Option<Value>,
    /// Legendary flag, defaults to false.
    pub is_legendary: Option<bool>,
    /// Optional generation reference by id.
    pub generation_id: Option<i32>,
    /// Optional pre-evolution reference by id.
    pub pre_evolution_id: Option<i32>,
}

/// Partial update payload; absent fields leave stored values unchanged.
/// A provided type list always replaces the existing set.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePokemon {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement type list.
    pub types: Option<Vec<NamedEntry>>,
    /// Replacement sprite-slot map.
    pub images: Option<Value>,
    /// Replacement legendary flag.
    pub is_legendary: Option<bool>,
    /// Replacement generation reference.
    pub generation_id: Option<i32>,
    /// Replacement pre-evolution reference.
    pub pre_evolution_id: Option<i32>,
}

fn load_view(conn: &mut SqliteConnection, row: Pokemon) -> CatalogResult<PokemonView> {
    let types = repo::types_of(conn, row.id)?;
    let moves = repo::moves_of(conn, row.id)?;
    let generation = match row.generation_id {
        Some(generation_id) => repo::find_generation(conn, generation_id)?,
        None => None,
    };
    let images = serde_json::from_str(&row.images).unwrap_or(Value::Null);

    Ok(PokemonView {
        id: row.id,
        name: row.name,
        images,
        is_legendary: row.is_legendary,
        pre_evolution_id: row.pre_evolution_id,
        generation,
        types,
        moves,
    })
}

fn load_views(conn: &mut SqliteConnection, rows: Vec<Pokemon>) -> CatalogResult<Vec<PokemonView>> {
    rows.into_iter().map(|row| load_view(conn, row)).collect()
}

/// Finds one creature by exact id or case-insensitive substring name.
///
/// One of the two filters must be given; id wins when both are.
pub fn find_pokemon(
    conn: &mut SqliteConnection,
    id: Option<i32>,
    name: Option<&str>,
) -> CatalogResult<PokemonView> {
    let row = match (id, name) {
        (None, None) => {
            return Err(CatalogError::Validation(
                "Either Pokemon ID or name must be provided.".into(),
            ));
        }
        (Some(id), _) => repo::find_pokemon(conn, id)?,
        (None, Some(fragment)) => repo::first_pokemon_by_name(conn, fragment)?,
    };

    let row = row.ok_or_else(|| CatalogError::NotFound("Pokemon not found".into()))?;
    load_view(conn, row)
}

/// Finds creatures by type id or type name; one of the two must be given.
pub fn find_by_type(
    conn: &mut SqliteConnection,
    type_id: Option<i32>,
    type_name: Option<&str>,
) -> CatalogResult<Vec<PokemonView>> {
    let rows = match (type_id, type_name) {
        (None, None) => {
            return Err(CatalogError::Validation(
                "Either type ID or name must be provided.".into(),
            ));
        }
        (Some(type_id), _) => repo::pokemon_by_type_id(conn, type_id)?,
        (None, Some(fragment)) => repo::pokemon_by_type_name(conn, fragment)?,
    };

    if rows.is_empty() {
        return Err(CatalogError::NotFound("Pokémon not found".into()));
    }
    load_views(conn, rows)
}

/// Finds creatures by generation name or region.
///
/// The two filters are mutually exclusive; giving both is a bad request.
pub fn find_by_generation(
    conn: &mut SqliteConnection,
    name: Option<&str>,
    region: Option<&str>,
) -> CatalogResult<Vec<PokemonView>> {
    let rows = match (name, region) {
        (Some(_), Some(_)) => {
            return Err(CatalogError::Validation(
                "Generation name and region filters are mutually exclusive.".into(),
            ));
        }
        (None, None) => {
            return Err(CatalogError::Validation(
                "Either generation name or region must be provided.".into(),
            ));
        }
        (Some(fragment), None) => repo::pokemon_by_generation_name(conn, fragment)?,
        (None, Some(fragment)) => repo::pokemon_by_generation_region(conn, fragment)?,
    };

    if rows.is_empty() {
        return Err(CatalogError::NotFound("Pokémon not found".into()));
    }
    load_views(conn, rows)
}

/// Lists every creature flagged legendary; an empty catalog yields an empty list.
pub fn list_legendary(conn: &mut SqliteConnection) -> CatalogResult<Vec<PokemonView>> {
    let rows = repo::legendary_pokemon(conn)?;
    load_views(conn, rows)
}

/// Creates a creature from an explicit payload.
///
/// The type list goes through the same natural-key resolver the ingestion
/// path uses, so referencing a type name twice or referencing one that does
/// not exist yet is fine. An id already present is rejected; ingestion is
/// the only upsert path.
pub fn create_pokemon(
    conn: &mut SqliteConnection,
    input: CreatePokemon,
) -> CatalogResult<PokemonView> {
    let (Some(id), Some(name), Some(types_data), Some(images)) = (
        input.id,
        input.name.as_deref(),
        input.types.as_ref(),
        input.images.as_ref(),
    ) else {
        return Err(CatalogError::Validation(
            "Incomplete data provided for creating Pokémon.".into(),
        ));
    };
    if name.trim().is_empty() || types_data.is_empty() {
        return Err(CatalogError::Validation(
            "Incomplete data provided for creating Pokémon.".into(),
        ));
    }

    if repo::find_pokemon(conn, id)?.is_some() {
        return Err(CatalogError::Validation(format!(
            "Pokémon with id {id} already exists"
        )));
    }
    if let Some(generation_id) = input.generation_id
        && repo::find_generation(conn, generation_id)?.is_none()
    {
        return Err(CatalogError::Validation(format!(
            "Generation with id {generation_id} does not exist"
        )));
    }
    if let Some(pre_evolution_id) = input.pre_evolution_id
        && repo::find_pokemon(conn, pre_evolution_id)?.is_none()
    {
        return Err(CatalogError::Validation(format!(
            "Pre-evolution with id {pre_evolution_id} does not exist"
        )));
    }

    let images_text = images.to_string();
    let type_names: Vec<String> = types_data.iter().map(|t| t.name.clone()).collect();

    conn.immediate_transaction::<_, CatalogError, _>(|conn| {
        let resolved = resolve::resolve_types(conn, &type_names)?;
        repo::insert_pokemon(
            conn,
            &NewPokemon {
                id,
                name,
                images: &images_text,
                is_legendary: input.is_legendary.unwrap_or(false),
                generation_id: input.generation_id,
                pre_evolution_id: input.pre_evolution_id,
            },
        )?;
        let type_ids: Vec<i32> = resolved.iter().map(|t| t.id).collect();
        repo::replace_type_links(conn, id, &type_ids)?;
        Ok(())
    })?;

    let row = repo::find_pokemon(conn, id)?
        .ok_or_else(|| CatalogError::Conflict(format!("pokemon {id}")))?;
    load_view(conn, row)
}

/// Applies a partial update to a creature.
///
/// Absent fields leave the stored values unchanged; a provided type list
/// replaces the association set wholesale. An empty patch is accepted and
/// returns the current row untouched.
pub fn update_pokemon(
    conn: &mut SqliteConnection,
    id: i32,
    patch: UpdatePokemon,
) -> CatalogResult<PokemonView> {
    if let Some(generation_id) = patch.generation_id
        && repo::find_generation(conn, generation_id)?.is_none()
    {
        return Err(CatalogError::Validation(format!(
            "Generation with id {generation_id} does not exist"
        )));
    }
    if let Some(pre_evolution_id) = patch.pre_evolution_id {
        if pre_evolution_id == id {
            return Err(CatalogError::Validation(
                "A Pokémon cannot be its own pre-evolution.".into(),
            ));
        }
        if repo::find_pokemon(conn, pre_evolution_id)?.is_none() {
            return Err(CatalogError::Validation(format!(
                "Pre-evolution with id {pre_evolution_id} does not exist"
            )));
        }
    }

    conn.immediate_transaction::<_, CatalogError, _>(|conn| {
        let existing = repo::find_pokemon(conn, id)?
            .ok_or_else(|| CatalogError::NotFound(format!("Pokémon with id {id} not found")))?;

        let changes = PokemonChanges {
            name: patch.name.as_deref(),
            images: patch.images.as_ref().map(|v| v.to_string()),
            is_legendary: patch.is_legendary,
            generation_id: patch.generation_id,
            pre_evolution_id: patch.pre_evolution_id,
        };
        if !changes.is_empty() {
            diesel::update(&existing).set(changes).execute(conn)?;
        }

        if let Some(types_data) = &patch.types {
            let type_names: Vec<String> = types_data.iter().map(|t| t.name.clone()).collect();
            let resolved = resolve::resolve_types(conn, &type_names)?;
            let type_ids: Vec<i32> = resolved.iter().map(|t| t.id).collect();
            repo::replace_type_links(conn, id, &type_ids)?;
        }
        Ok(())
    })?;

    let row = repo::find_pokemon(conn, id)?
        .ok_or_else(|| CatalogError::NotFound(format!("Pokémon with id {id} not found")))?;
    load_view(conn, row)
}

/// Deletes a creature, detaching its association rows; sub-entities survive.
pub fn delete_pokemon(conn: &mut SqliteConnection, id: i32) -> CatalogResult<()> {
    conn.immediate_transaction::<_, CatalogError, _>(|conn| {
        if repo::find_pokemon(conn, id)?.is_none() {
            return Err(CatalogError::NotFound(format!(
                "Pokémon with id {id} not found"
            )));
        }
        repo::delete_links(conn, id)?;
        repo::clear_pre_evolution_refs(conn, id)?;
        repo::delete_pokemon_row(conn, id)?;
        Ok(())
    })
}

/// Lists type rows, optionally filtered by exact id or substring name.
pub fn find_types(
    conn: &mut SqliteConnection,
    id: Option<i32>,
    name: Option<&str>,
) -> CatalogResult<Vec<PokeType>> {
    let rows = match (id, name) {
        (None, None) => repo::list_types(conn)?,
        (Some(id), _) => repo::find_type(conn, id)?.into_iter().collect(),
        (None, Some(fragment)) => repo::types_by_name_like(conn, fragment)?,
    };

    if rows.is_empty() && (id.is_some() || name.is_some()) {
        return Err(CatalogError::NotFound("Type not found".into()));
    }
    Ok(rows)
}

/// Creates a type by name, reusing an existing row with that name.
pub fn create_type(conn: &mut SqliteConnection, name: &str) -> CatalogResult<PokeType> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation("Type name must be provided.".into()));
    }

    let names = [trimmed.to_string()];
    conn.immediate_transaction::<_, CatalogError, _>(|conn| {
        resolve::resolve_types(conn, &names)?
            .pop()
            .ok_or_else(|| CatalogError::Conflict(format!("type {trimmed}")))
    })
}

/// Administrative delete of a type row, detaching it from every creature.
pub fn delete_type(conn: &mut SqliteConnection, id: i32) -> CatalogResult<()> {
    conn.immediate_transaction::<_, CatalogError, _>(|conn| {
        if repo::find_type(conn, id)?.is_none() {
            return Err(CatalogError::NotFound(format!(
                "Type with id {id} not found"
            )));
        }
        repo::detach_type(conn, id)?;
        repo::delete_type_row(conn, id)?;
        Ok(())
    })
}

/// Lists every generation row.
pub fn list_generations(conn: &mut SqliteConnection) -> CatalogResult<Vec<PokeGeneration>> {
    Ok(repo::list_generations(conn)?)
}

/// Administrative delete of a generation row; creatures fall back to no
/// generation rather than disappearing.
pub fn delete_generation(conn: &mut SqliteConnection, id: i32) -> CatalogResult<()> {
    conn.immediate_transaction::<_, CatalogError, _>(|conn| {
        if repo::find_generation(conn, id)?.is_none() {
            return Err(CatalogError::NotFound(format!(
                "Generation with id {id} not found"
            )));
        }
        repo::detach_generation(conn, id)?;
        repo::delete_generation_row(conn, id)?;
        Ok(())
    })
}
