//! Client for the upstream Pokémon catalog REST API.
//!
//! The [`source::CatalogSource`] trait is the seam consumed by the ingestion
//! side; [`pokeapi::PokeApiClient`] is the real HTTP implementation.

pub mod errors;
pub mod models;
pub mod pokeapi;
pub mod source;
