//! HTTP surface.
//!
//! Thin route handlers over [`crate::catalog::service`]. Responses are JSON;
//! error bodies carry a `detail` message field and map the domain taxonomy to
//! statuses: validation -> 400, not-found -> 404, conflict -> 409, anything
//! else -> 500.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    catalog::service::{self, CreatePokemon, NamedEntry, PokemonView, UpdatePokemon},
    error::CatalogError,
    models::pokedex::{PokeGeneration, PokeType},
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The store connection, serialized behind a lock.
    pub db: Arc<Mutex<SqliteConnection>>,
}

impl AppState {
    /// Wraps a connection for the router.
    pub fn new(conn: SqliteConnection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

type ApiError = (StatusCode, Json<Detail>);

#[derive(Serialize)]
struct Detail {
    detail: String,
}

fn into_api_error(err: CatalogError) -> ApiError {
    let status = match &err {
        CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Conflict(_) => StatusCode::CONFLICT,
        CatalogError::Upstream(_) | CatalogError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(Detail {
            detail: err.to_string(),
        }),
    )
}

/// Builds the application router, everything nested under `/api/v1`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/pokemon", get(get_pokemon).post(create_pokemon))
        .route("/pokemon/type", get(get_pokemon_by_type))
        .route("/pokemon/generation", get(get_pokemon_by_generation))
        .route("/pokemon/legendary", get(get_legendary))
        .route(
            "/pokemon/{pokemon_id}",
            put(update_pokemon).delete(delete_pokemon),
        )
        .route("/types", get(get_types).post(create_type))
        .route("/types/{type_id}", delete(delete_type))
        .route("/generations", get(get_generations))
        .route("/generations/{generation_id}", delete(delete_generation))
        .with_state(state);

    Router::new().nest("/api/v1", api)
}

/// Binds the listener and serves until the process is stopped.
pub async fn run(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!(port, "serving catalog API");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Deserialize)]
struct PokemonQuery {
    id: Option<i32>,
    name: Option<String>,
}

async fn get_pokemon(
    State(state): State<AppState>,
    Query(q): Query<PokemonQuery>,
) -> Result<Json<PokemonView>, ApiError> {
    let mut conn = state.db.lock().await;
    service::find_pokemon(&mut conn, q.id, q.name.as_deref())
        .map(Json)
        .map_err(into_api_error)
}

#[derive(Deserialize)]
struct TypeFilterQuery {
    type_id: Option<i32>,
    type_name: Option<String>,
}

async fn get_pokemon_by_type(
    State(state): State<AppState>,
    Query(q): Query<TypeFilterQuery>,
) -> Result<Json<Vec<PokemonView>>, ApiError> {
    let mut conn = state.db.lock().await;
    service::find_by_type(&mut conn, q.type_id, q.type_name.as_deref())
        .map(Json)
        .map_err(into_api_error)
}

#[derive(Deserialize)]
struct GenerationFilterQuery {
    name: Option<String>,
    region: Option<String>,
}

async fn get_pokemon_by_generation(
    State(state): State<AppState>,
    Query(q): Query<GenerationFilterQuery>,
) -> Result<Json<Vec<PokemonView>>, ApiError> {
    let mut conn = state.db.lock().await;
    service::find_by_generation(&mut conn, q.name.as_deref(), q.region.as_deref())
        .map(Json)
        .map_err(into_api_error)
}

async fn get_legendary(
    State(state): State<AppState>,
) -> Result<Json<Vec<PokemonView>>, ApiError> {
    let mut conn = state.db.lock().await;
    service::list_legendary(&mut conn)
        .map(Json)
        .map_err(into_api_error)
}

async fn create_pokemon(
    State(state): State<AppState>,
    Json(payload): Json<CreatePokemon>,
) -> Result<(StatusCode, Json<PokemonView>), ApiError> {
    let mut conn = state.db.lock().await;
    service::create_pokemon(&mut conn, payload)
        .map(|view| (StatusCode::CREATED, Json(view)))
        .map_err(into_api_error)
}

async fn update_pokemon(
    State(state): State<AppState>,
    Path(pokemon_id): Path<i32>,
    Json(patch): Json<UpdatePokemon>,
) -> Result<Json<PokemonView>, ApiError> {
    let mut conn = state.db.lock().await;
    service::update_pokemon(&mut conn, pokemon_id, patch)
        .map(Json)
        .map_err(into_api_error)
}

async fn delete_pokemon(
    State(state): State<AppState>,
    Path(pokemon_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.db.lock().await;
    service::delete_pokemon(&mut conn, pokemon_id)
        .map(|()| {
            Json(json!({
                "message": format!("Pokémon with id {pokemon_id} has been deleted")
            }))
        })
        .map_err(into_api_error)
}

#[derive(Deserialize)]
struct TypesQuery {
    id: Option<i32>,
    name: Option<String>,
}

async fn get_types(
    State(state): State<AppState>,
    Query(q): Query<TypesQuery>,
) -> Result<Json<Vec<PokeType>>, ApiError> {
    let mut conn = state.db.lock().await;
    service::find_types(&mut conn, q.id, q.name.as_deref())
        .map(Json)
        .map_err(into_api_error)
}

async fn create_type(
    State(state): State<AppState>,
    Json(payload): Json<NamedEntry>,
) -> Result<(StatusCode, Json<PokeType>), ApiError> {
    let mut conn = state.db.lock().await;
    service::create_type(&mut conn, &payload.name)
        .map(|row| (StatusCode::CREATED, Json(row)))
        .map_err(into_api_error)
}

async fn delete_type(
    State(state): State<AppState>,
    Path(type_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.db.lock().await;
    service::delete_type(&mut conn, type_id)
        .map(|()| {
            Json(json!({
                "message": format!("Type with id {type_id} has been deleted")
            }))
        })
        .map_err(into_api_error)
}

async fn get_generations(
    State(state): State<AppState>,
) -> Result<Json<Vec<PokeGeneration>>, ApiError> {
    let mut conn = state.db.lock().await;
    service::list_generations(&mut conn)
        .map(Json)
        .map_err(into_api_error)
}

async fn delete_generation(
    State(state): State<AppState>,
    Path(generation_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.db.lock().await;
    service::delete_generation(&mut conn, generation_id)
        .map(|()| {
            Json(json!({
                "message": format!("Generation with id {generation_id} has been deleted")
            }))
        })
        .map_err(into_api_error)
}
