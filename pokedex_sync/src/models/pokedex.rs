//! Row types for the catalog tables.
//!
//! These mirror the tables in [`crate::schema`] for Diesel's
//! Queryable/Insertable APIs:
//! - [`crate::schema::pokemon`] — the aggregate creature row
//! - [`crate::schema::types`], [`crate::schema::moves`],
//!   [`crate::schema::generations`] — shared sub-entity rows, unique by name
//! - [`crate::schema::pokemon_types`], [`crate::schema::pokemon_moves`] —
//!   association rows
//!
//! Sub-entity ids for types and moves come from the SQLite rowid; creature
//! and generation ids are assigned by the upstream catalog and inserted
//! verbatim.

use diesel::prelude::*;
use serde::Serialize;

// ----------------------- pokemon ------------------------

/// A creature row in [`crate::schema::pokemon`].
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::pokemon, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Pokemon {
    /// Upstream-assigned identifier (primary key, not locally generated).
    pub id: i32,
    /// Display name, e.g. "bulbasaur".
    pub name: String,
    /// Sprite-slot map serialized as a JSON object.
    pub images: String,
    /// Legendary flag from the species payload.
    pub is_legendary: bool,
    /// Optional FK to [`PokeGeneration::id`].
    pub generation_id: Option<i32>,
    /// Optional self-reference to the creature this one evolves from.
    pub pre_evolution_id: Option<i32>,
}

/// Insertable form of [`Pokemon`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::pokemon)]
pub struct NewPokemon<'a> {
    /// Upstream-assigned identifier.
    pub id: i32,
    /// Display name.
    pub name: &'a str,
    /// Sprite-slot map serialized as a JSON object.
    pub images: &'a str,
    /// Legendary flag.
    pub is_legendary: bool,
    /// Optional FK to [`PokeGeneration::id`].
    pub generation_id: Option<i32>,
    /// Optional self-reference to the pre-evolution creature.
    pub pre_evolution_id: Option<i32>,
}

/// Partial changeset for creature updates.
///
/// `None` fields are skipped, which is exactly the PUT semantics: absent
/// fields leave the stored values unchanged.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::pokemon)]
pub struct PokemonChanges<'a> {
    /// Replacement display name.
    pub name: Option<&'a str>,
    /// Replacement serialized sprite-slot map.
    pub images: Option<String>,
    /// Replacement legendary flag.
    pub is_legendary: Option<bool>,
    /// Replacement generation FK.
    pub generation_id: Option<i32>,
    /// Replacement pre-evolution self-reference.
    pub pre_evolution_id: Option<i32>,
}

impl PokemonChanges<'_> {
    /// True when no column would be written; Diesel rejects empty changesets,
    /// so callers skip the UPDATE statement entirely in that case.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.images.is_none()
            && self.is_legendary.is_none()
            && self.generation_id.is_none()
            && self.pre_evolution_id.is_none()
    }
}

// ----------------------- types --------------------------

/// A type row in [`crate::schema::types`]; `name` is the natural key.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::types, check_for_backend(diesel::sqlite::Sqlite))]
pub struct PokeType {
    /// Rowid-assigned identifier.
    pub id: i32,
    /// Unique type name, e.g. "grass".
    pub name: String,
}

/// Insertable form of [`PokeType`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::types)]
pub struct NewPokeType<'a> {
    /// Unique type name.
    pub name: &'a str,
}

// ----------------------- moves --------------------------

/// A move row in [`crate::schema::moves`]; `name` is the natural key.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::moves, check_for_backend(diesel::sqlite::Sqlite))]
pub struct PokeMove {
    /// Rowid-assigned identifier.
    pub id: i32,
    /// Unique move name, e.g. "razor-wind".
    pub name: String,
}

/// Insertable form of [`PokeMove`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::moves)]
pub struct NewPokeMove<'a> {
    /// Unique move name.
    pub name: &'a str,
}

// ----------------------- generations --------------------

/// A generation row in [`crate::schema::generations`]; `name` is the natural
/// key, `id` is upstream-assigned.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::generations, check_for_backend(diesel::sqlite::Sqlite))]
pub struct PokeGeneration {
    /// Upstream-assigned identifier.
    pub id: i32,
    /// Unique generation name, e.g. "generation-i".
    pub name: String,
    /// Main region name, e.g. "kanto".
    pub region: String,
}

/// Insertable form of [`PokeGeneration`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::generations)]
pub struct NewPokeGeneration<'a> {
    /// Upstream-assigned identifier.
    pub id: i32,
    /// Unique generation name.
    pub name: &'a str,
    /// Main region name.
    pub region: &'a str,
}

// ----------------------- associations -------------------

/// Insertable creature-to-type association row.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::pokemon_types)]
pub struct NewPokemonType {
    /// FK to [`Pokemon::id`].
    pub pokemon_id: i32,
    /// FK to [`PokeType::id`].
    pub type_id: i32,
}

/// Insertable creature-to-move association row.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::pokemon_moves)]
pub struct NewPokemonMove {
    /// FK to [`Pokemon::id`].
    pub pokemon_id: i32,
    /// FK to [`PokeMove::id`].
    pub move_id: i32,
}
