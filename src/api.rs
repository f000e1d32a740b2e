//! HTTP API layer.
//!
//! Thin glue between HTTP and the record store: routes translate into one
//! store call each, and every response uses the fixed envelope
//! `{success, data, message}`. Both recoverable store errors (validation
//! failure and lookup miss) map to HTTP 400 with the error's message in the
//! envelope; that no-distinction-from-404 behavior is part of the contract.
//! Anything else is unexpected and maps to a generic 500.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::PokedexError;
use crate::store::{parse_page_param, CsvStore, PokemonParams, DEFAULT_PAGE, DEFAULT_PER_PAGE};

/// The fixed response envelope wrapping every reply.
#[derive(Debug, Serialize)]
pub struct Envelope {
    /// True iff the operation succeeded.
    pub success: bool,
    /// The record, list of records, or `[]` on failure.
    pub data: serde_json::Value,
    /// Empty on success, the error message on failure.
    pub message: String,
}

/// Message for errors the client cannot act on.
const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error happened.";

/// Pagination query params, kept as raw strings so non-numeric values can
/// coerce to the defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
    per_page: Option<String>,
}

/// Request body for create and update: the params nest under a `pokemon`
/// key.
#[derive(Debug, Deserialize)]
struct PokemonBody {
    pokemon: PokemonParams,
}

/// Builds the application router over a shared store.
pub fn router(store: Arc<CsvStore>) -> Router {
    Router::new()
        .route("/pokemons", get(list).post(create))
        .route(
            "/pokemons/:name",
            get(show).put(update).patch(update).delete(destroy),
        )
        .with_state(store)
}

/// Wraps a store result in the response envelope with the matching status.
fn respond<T: Serialize>(result: Result<T, PokedexError>) -> (StatusCode, Json<Envelope>) {
    match result {
        Ok(data) => (
            StatusCode::OK,
            Json(Envelope {
                success: true,
                data: json!(data),
                message: String::new(),
            }),
        ),
        Err(err) if err.is_client_error() => (
            StatusCode::BAD_REQUEST,
            Json(Envelope {
                success: false,
                data: json!([]),
                message: err.to_string(),
            }),
        ),
        Err(err) => {
            tracing::error!(error = %err, "Unexpected store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Envelope {
                    success: false,
                    data: json!([]),
                    message: UNEXPECTED_ERROR_MESSAGE.to_string(),
                }),
            )
        }
    }
}

/// `GET /pokemons` -- always returns paged results.
async fn list(
    State(store): State<Arc<CsvStore>>,
    Query(query): Query<PageQuery>,
) -> (StatusCode, Json<Envelope>) {
    let page = parse_page_param(query.page.as_deref(), DEFAULT_PAGE);
    let per_page = parse_page_param(query.per_page.as_deref(), DEFAULT_PER_PAGE);
    respond(store.page(page, per_page))
}

/// `GET /pokemons/:name`
async fn show(
    State(store): State<Arc<CsvStore>>,
    Path(name): Path<String>,
) -> (StatusCode, Json<Envelope>) {
    respond(store.find_by_name(&name))
}

/// `POST /pokemons`
async fn create(
    State(store): State<Arc<CsvStore>>,
    Json(body): Json<PokemonBody>,
) -> (StatusCode, Json<Envelope>) {
    respond(store.create(&body.pokemon))
}

/// `PUT /pokemons/:name` and `PATCH /pokemons/:name` -- a `name` key in the
/// body is ignored, the key is immutable.
async fn update(
    State(store): State<Arc<CsvStore>>,
    Path(name): Path<String>,
    Json(body): Json<PokemonBody>,
) -> (StatusCode, Json<Envelope>) {
    respond(store.update(&name, &body.pokemon))
}

/// `DELETE /pokemons/:name` -- fetches first so a missing name reports as
/// not found, then returns the destroyed record's data.
async fn destroy(
    State(store): State<Arc<CsvStore>>,
    Path(name): Path<String>,
) -> (StatusCode, Json<Envelope>) {
    let result = store
        .find_by_name(&name)
        .and_then(|record| store.destroy(&name).map(|()| record));
    respond(result)
}
