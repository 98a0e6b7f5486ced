//! Wire types for the upstream catalog API.
//!
//! The upstream splits one creature across two resources: the detail payload
//! (types, moves, sprites) and the species payload (legendary flag,
//! generation). [`CreatureRecord::merge`] joins them into the single record
//! the ingestion side consumes.

use indexmap::IndexMap;
use serde::Deserialize;

/// A `{name, url}` reference to another upstream resource.
#[derive(Deserialize, Debug, Clone)]
pub struct NamedRef {
    pub name: String,
    pub url: String,
}

/// One page of the listing endpoint.
#[derive(Deserialize, Debug)]
pub struct SummaryPage {
    pub results: Vec<NamedRef>,
    /// URL of the next page, `null` on the last one.
    pub next: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub entry: NamedRef,
}

#[derive(Deserialize, Debug)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub entry: NamedRef,
}

#[derive(Deserialize, Debug)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub back_default: Option<String>,
}

/// The per-creature detail payload.
#[derive(Deserialize, Debug)]
pub struct PokemonDetail {
    pub id: i32,
    pub name: String,
    pub types: Vec<TypeSlot>,
    pub moves: Vec<MoveSlot>,
    pub sprites: Sprites,
    pub species: NamedRef,
}

/// The species payload referenced by [`PokemonDetail::species`].
#[derive(Deserialize, Debug)]
pub struct SpeciesDetail {
    pub is_legendary: bool,
    pub generation: Option<NamedRef>,
}

/// The generation payload, fetched lazily when a generation name is first seen.
#[derive(Deserialize, Debug)]
pub struct GenerationDetail {
    pub id: i32,
    pub main_region: NamedRef,
}

/// One creature as the ingestion side sees it: detail and species payloads
/// merged, association references reduced to plain names.
#[derive(Debug, Clone)]
pub struct CreatureRecord {
    /// Upstream-assigned identifier.
    pub id: i32,
    pub name: String,
    /// Sprite slot -> URL, in the slot order the API presents them.
    pub images: IndexMap<String, Option<String>>,
    pub type_names: Vec<String>,
    /// Every candidate move; the caller decides how many to keep.
    pub move_names: Vec<String>,
    pub is_legendary: bool,
    /// Generation reference (name + lookup URL) when the species has one.
    pub generation: Option<NamedRef>,
}

impl CreatureRecord {
    /// Merges a detail payload and its species payload into one record.
    pub fn merge(detail: PokemonDetail, species: SpeciesDetail) -> Self {
        let mut images = IndexMap::new();
        images.insert("front_default".to_string(), detail.sprites.front_default);
        images.insert("back_default".to_string(), detail.sprites.back_default);

        CreatureRecord {
            id: detail.id,
            name: detail.name,
            images,
            type_names: detail.types.into_iter().map(|slot| slot.entry.name).collect(),
            move_names: detail.moves.into_iter().map(|slot| slot.entry.name).collect(),
            is_legendary: species.is_legendary,
            generation: species.generation,
        }
    }
}
