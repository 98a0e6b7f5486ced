//! Row-level statements.

use diesel::prelude::*;
use diesel::{SqliteConnection, insert_into};

use crate::models::pokedex::{
    NewPokeGeneration, NewPokeMove, NewPokeType, NewPokemon, NewPokemonMove, NewPokemonType,
    PokeGeneration, PokeMove, PokeType, Pokemon,
};
use crate::schema::{generations, moves, pokemon, pokemon_moves as pm, pokemon_types as pt, types};

// ----------------------- types --------------------------

/// Exact-match lookup of a type row by id.
pub fn find_type(conn: &mut SqliteConnection, id_: i32) -> QueryResult<Option<PokeType>> {
    types::table
        .find(id_)
        .select(PokeType::as_select())
        .first(conn)
        .optional()
}

/// Exact-match lookup of a type row by its natural key.
pub fn find_type_by_name(conn: &mut SqliteConnection, name_: &str) -> QueryResult<Option<PokeType>> {
    types::table
        .filter(types::name.eq(name_))
        .select(PokeType::as_select())
        .first(conn)
        .optional()
}

/// Substring lookup of type rows by name.
pub fn types_by_name_like(conn: &mut SqliteConnection, fragment: &str) -> QueryResult<Vec<PokeType>> {
    types::table
        .filter(types::name.like(format!("%{fragment}%")))
        .select(PokeType::as_select())
        .load(conn)
}

/// Insert a type row, returning it.
pub fn insert_type(conn: &mut SqliteConnection, name_: &str) -> QueryResult<PokeType> {
    insert_into(types::table)
        .values(&NewPokeType { name: name_ })
        .returning(PokeType::as_returning())
        .get_result(conn)
}

/// All type rows.
pub fn list_types(conn: &mut SqliteConnection) -> QueryResult<Vec<PokeType>> {
    types::table.select(PokeType::as_select()).load(conn)
}

/// Remove every creature association pointing at a type.
pub fn detach_type(conn: &mut SqliteConnection, type_id_: i32) -> QueryResult<usize> {
    diesel::delete(pt::table.filter(pt::type_id.eq(type_id_))).execute(conn)
}

/// Delete a type row.
pub fn delete_type_row(conn: &mut SqliteConnection, id_: i32) -> QueryResult<usize> {
    diesel::delete(types::table.find(id_)).execute(conn)
}

// ----------------------- moves --------------------------

/// Exact-match lookup of a move row by its natural key.
pub fn find_move_by_name(conn: &mut SqliteConnection, name_: &str) -> QueryResult<Option<PokeMove>> {
    moves::table
        .filter(moves::name.eq(name_))
        .select(PokeMove::as_select())
        .first(conn)
        .optional()
}

/// Insert a move row, returning it.
pub fn insert_move(conn: &mut SqliteConnection, name_: &str) -> QueryResult<PokeMove> {
    insert_into(moves::table)
        .values(&NewPokeMove { name: name_ })
        .returning(PokeMove::as_returning())
        .get_result(conn)
}

// ----------------------- generations --------------------

/// Exact-match lookup of a generation row by id.
pub fn find_generation(conn: &mut SqliteConnection, id_: i32) -> QueryResult<Option<PokeGeneration>> {
    generations::table
        .find(id_)
        .select(PokeGeneration::as_select())
        .first(conn)
        .optional()
}

/// Exact-match lookup of a generation row by its natural key.
pub fn find_generation_by_name(
    conn: &mut SqliteConnection,
    name_: &str,
) -> QueryResult<Option<PokeGeneration>> {
    generations::table
        .filter(generations::name.eq(name_))
        .select(PokeGeneration::as_select())
        .first(conn)
        .optional()
}

/// Insert a generation row, returning it.
pub fn insert_generation(
    conn: &mut SqliteConnection,
    row: &NewPokeGeneration<'_>,
) -> QueryResult<PokeGeneration> {
    insert_into(generations::table)
        .values(row)
        .returning(PokeGeneration::as_returning())
        .get_result(conn)
}

/// All generation rows.
pub fn list_generations(conn: &mut SqliteConnection) -> QueryResult<Vec<PokeGeneration>> {
    generations::table
        .select(PokeGeneration::as_select())
        .load(conn)
}

/// Null out every creature reference to a generation.
pub fn detach_generation(conn: &mut SqliteConnection, generation_id_: i32) -> QueryResult<usize> {
    diesel::update(pokemon::table.filter(pokemon::generation_id.eq(generation_id_)))
        .set(pokemon::generation_id.eq(None::<i32>))
        .execute(conn)
}

/// Delete a generation row.
pub fn delete_generation_row(conn: &mut SqliteConnection, id_: i32) -> QueryResult<usize> {
    diesel::delete(generations::table.find(id_)).execute(conn)
}

// ----------------------- pokemon ------------------------

/// Exact-match lookup of a creature row by upstream id.
pub fn find_pokemon(conn: &mut SqliteConnection, id_: i32) -> QueryResult<Option<Pokemon>> {
    pokemon::table
        .find(id_)
        .select(Pokemon::as_select())
        .first(conn)
        .optional()
}

/// First creature whose name contains the fragment.
pub fn first_pokemon_by_name(
    conn: &mut SqliteConnection,
    fragment: &str,
) -> QueryResult<Option<Pokemon>> {
    pokemon::table
        .filter(pokemon::name.like(format!("%{fragment}%")))
        .select(Pokemon::as_select())
        .first(conn)
        .optional()
}

/// Creatures associated with a type id.
pub fn pokemon_by_type_id(conn: &mut SqliteConnection, type_id_: i32) -> QueryResult<Vec<Pokemon>> {
    pokemon::table
        .inner_join(pt::table)
        .filter(pt::type_id.eq(type_id_))
        .select(Pokemon::as_select())
        .load(conn)
}

/// Creatures associated with any type whose name contains the fragment.
pub fn pokemon_by_type_name(
    conn: &mut SqliteConnection,
    fragment: &str,
) -> QueryResult<Vec<Pokemon>> {
    pokemon::table
        .inner_join(pt::table.inner_join(types::table))
        .filter(types::name.like(format!("%{fragment}%")))
        .select(Pokemon::as_select())
        .distinct()
        .load(conn)
}

/// Creatures whose generation name contains the fragment.
pub fn pokemon_by_generation_name(
    conn: &mut SqliteConnection,
    fragment: &str,
) -> QueryResult<Vec<Pokemon>> {
    pokemon::table
        .inner_join(generations::table)
        .filter(generations::name.like(format!("%{fragment}%")))
        .select(Pokemon::as_select())
        .load(conn)
}

/// Creatures whose generation region contains the fragment.
pub fn pokemon_by_generation_region(
    conn: &mut SqliteConnection,
    fragment: &str,
) -> QueryResult<Vec<Pokemon>> {
    pokemon::table
        .inner_join(generations::table)
        .filter(generations::region.like(format!("%{fragment}%")))
        .select(Pokemon::as_select())
        .load(conn)
}

/// All creatures flagged legendary.
pub fn legendary_pokemon(conn: &mut SqliteConnection) -> QueryResult<Vec<Pokemon>> {
    pokemon::table
        .filter(pokemon::is_legendary.eq(true))
        .select(Pokemon::as_select())
        .load(conn)
}

/// Plain insert of a creature row; fails on a duplicate id.
pub fn insert_pokemon(conn: &mut SqliteConnection, row: &NewPokemon<'_>) -> QueryResult<usize> {
    insert_into(pokemon::table).values(row).execute(conn)
}

/// Insert a creature row, or refresh the sourced columns when the upstream
/// id already exists. `pre_evolution_id` is owned by the command service and
/// is left untouched on conflict.
pub fn upsert_pokemon(conn: &mut SqliteConnection, row: &NewPokemon<'_>) -> QueryResult<usize> {
    insert_into(pokemon::table)
        .values(row)
        .on_conflict(pokemon::id)
        .do_update()
        .set((
            pokemon::name.eq(row.name),
            pokemon::images.eq(row.images),
            pokemon::is_legendary.eq(row.is_legendary),
            pokemon::generation_id.eq(row.generation_id),
        ))
        .execute(conn)
}

/// Delete a creature row.
pub fn delete_pokemon_row(conn: &mut SqliteConnection, id_: i32) -> QueryResult<usize> {
    diesel::delete(pokemon::table.find(id_)).execute(conn)
}

// ----------------------- associations -------------------

/// Type rows associated with a creature.
pub fn types_of(conn: &mut SqliteConnection, pokemon_id_: i32) -> QueryResult<Vec<PokeType>> {
    pt::table
        .inner_join(types::table)
        .filter(pt::pokemon_id.eq(pokemon_id_))
        .select(PokeType::as_select())
        .load(conn)
}

/// Move rows associated with a creature.
pub fn moves_of(conn: &mut SqliteConnection, pokemon_id_: i32) -> QueryResult<Vec<PokeMove>> {
    pm::table
        .inner_join(moves::table)
        .filter(pm::pokemon_id.eq(pokemon_id_))
        .select(PokeMove::as_select())
        .load(conn)
}

/// Replace the full type association set of a creature.
pub fn replace_type_links(
    conn: &mut SqliteConnection,
    pokemon_id_: i32,
    type_ids: &[i32],
) -> QueryResult<()> {
    diesel::delete(pt::table.filter(pt::pokemon_id.eq(pokemon_id_))).execute(conn)?;
    let rows: Vec<NewPokemonType> = type_ids
        .iter()
        .map(|&type_id| NewPokemonType {
            pokemon_id: pokemon_id_,
            type_id,
        })
        .collect();
    insert_into(pt::table).values(&rows).execute(conn)?;
    Ok(())
}

/// Replace the full move association set of a creature.
pub fn replace_move_links(
    conn: &mut SqliteConnection,
    pokemon_id_: i32,
    move_ids: &[i32],
) -> QueryResult<()> {
    diesel::delete(pm::table.filter(pm::pokemon_id.eq(pokemon_id_))).execute(conn)?;
    let rows: Vec<NewPokemonMove> = move_ids
        .iter()
        .map(|&move_id| NewPokemonMove {
            pokemon_id: pokemon_id_,
            move_id,
        })
        .collect();
    insert_into(pm::table).values(&rows).execute(conn)?;
    Ok(())
}

/// Drop every association row of a creature; the sub-entities survive.
pub fn delete_links(conn: &mut SqliteConnection, pokemon_id_: i32) -> QueryResult<()> {
    diesel::delete(pt::table.filter(pt::pokemon_id.eq(pokemon_id_))).execute(conn)?;
    diesel::delete(pm::table.filter(pm::pokemon_id.eq(pokemon_id_))).execute(conn)?;
    Ok(())
}

/// Null out pre-evolution references pointing at a creature about to go away.
pub fn clear_pre_evolution_refs(conn: &mut SqliteConnection, id_: i32) -> QueryResult<usize> {
    diesel::update(pokemon::table.filter(pokemon::pre_evolution_id.eq(id_)))
        .set(pokemon::pre_evolution_id.eq(None::<i32>))
        .execute(conn)
}
