//! Relational Pokémon catalog: SQLite store, natural-key upsert
//! reconciliation against the upstream catalog API, and the HTTP surface
//! serving the result.

#![deny(missing_docs)]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
#[allow(missing_docs)]
pub mod schema;
pub mod server;
