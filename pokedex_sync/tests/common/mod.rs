#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use diesel::SqliteConnection;
use diesel::prelude::*;
use pokeapi_client::errors::SourceError;
use pokeapi_client::models::{GenerationDetail, PokemonDetail, SpeciesDetail, SummaryPage};
use pokeapi_client::source::CatalogSource;
use pokedex_sync::db::{connection, migrate};
use tempfile::TempDir;

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn count(conn: &mut SqliteConnection, table: &str) -> i64 {
    #[derive(QueryableByName)]
    struct CountRow {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        n: i64,
    }

    let row: CountRow = diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {table}"))
        .get_result(conn)
        .unwrap();
    row.n
}

/// In-memory upstream serving canned JSON payloads keyed by URL.
#[derive(Default)]
pub struct FakeSource {
    listing: Option<String>,
    payloads: HashMap<String, String>,
    generation_fetches: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, json: &str) -> Self {
        self.listing = Some(json.to_string());
        self
    }

    pub fn with_payload(mut self, url: &str, json: &str) -> Self {
        self.payloads.insert(url.to_string(), json.to_string());
        self
    }

    pub fn generation_fetch_count(&self) -> usize {
        self.generation_fetches.load(Ordering::SeqCst)
    }

    fn get(&self, url: &str) -> Result<&str, SourceError> {
        self.payloads
            .get(url)
            .map(String::as_str)
            .ok_or_else(|| SourceError::Api(format!("no payload for {url}")))
    }
}

fn decode<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, SourceError> {
    serde_json::from_str(json).map_err(|e| SourceError::Api(format!("bad fixture payload: {e}")))
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn fetch_page(&self, _offset: u32, _limit: u32) -> Result<SummaryPage, SourceError> {
        match &self.listing {
            Some(json) => decode(json),
            None => Err(SourceError::Api("listing unavailable".to_string())),
        }
    }

    async fn fetch_detail(&self, url: &str) -> Result<PokemonDetail, SourceError> {
        decode(self.get(url)?)
    }

    async fn fetch_species(&self, url: &str) -> Result<SpeciesDetail, SourceError> {
        decode(self.get(url)?)
    }

    async fn fetch_generation(&self, url: &str) -> Result<GenerationDetail, SourceError> {
        self.generation_fetches.fetch_add(1, Ordering::SeqCst);
        decode(self.get(url)?)
    }
}

// ---- fixture payload builders ----

pub fn listing_json(entries: &[(&str, &str)], next: Option<&str>) -> String {
    let results: Vec<_> = entries
        .iter()
        .map(|(name, url)| serde_json::json!({"name": name, "url": url}))
        .collect();
    serde_json::json!({"results": results, "next": next}).to_string()
}

pub fn detail_json(id: i32, name: &str, types: &[&str], moves: &[&str]) -> String {
    let types: Vec<_> = types
        .iter()
        .map(|t| {
            serde_json::json!({
                "slot": 1,
                "type": {"name": t, "url": format!("https://fixture/type/{t}/")}
            })
        })
        .collect();
    let moves: Vec<_> = moves
        .iter()
        .map(|m| {
            serde_json::json!({
                "move": {"name": m, "url": format!("https://fixture/move/{m}/")}
            })
        })
        .collect();

    serde_json::json!({
        "id": id,
        "name": name,
        "types": types,
        "moves": moves,
        "sprites": {
            "front_default": format!("https://fixture/sprites/{id}-front.png"),
            "back_default": format!("https://fixture/sprites/{id}-back.png")
        },
        "species": {"name": name, "url": format!("https://fixture/species/{id}/")}
    })
    .to_string()
}

pub fn species_json(legendary: bool, generation: Option<(&str, &str)>) -> String {
    let generation = match generation {
        Some((name, url)) => serde_json::json!({"name": name, "url": url}),
        None => serde_json::Value::Null,
    };
    serde_json::json!({"is_legendary": legendary, "generation": generation}).to_string()
}

pub fn generation_json(id: i32, region: &str) -> String {
    serde_json::json!({
        "id": id,
        "main_region": {"name": region, "url": format!("https://fixture/region/{id}/")}
    })
    .to_string()
}
