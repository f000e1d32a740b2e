//! Pokedex API
//!
//! A minimal CRUD HTTP API backed by a flat CSV file acting as the record
//! store for a single entity type. The store handles all interaction with
//! the backing file (linear-scan lookups, pagination, append-on-create, and
//! rewrite-to-temp-then-atomic-rename on update/destroy); the API layer is
//! thin glue wrapping store results in a fixed `{success, data, message}`
//! envelope.

pub mod api;
pub mod cli;
pub mod error;
pub mod store;

pub use error::PokedexError;
pub use store::{CsvStore, Pokemon, PokemonParams, StoreConfig};
