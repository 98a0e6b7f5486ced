//! Diesel models mapping to the database schema.

pub mod pokedex;
