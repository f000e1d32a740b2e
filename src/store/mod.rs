//! The file-backed record store.
//!
//! Owns all interaction with the on-disk CSV file: parsing rows into typed
//! [`Pokemon`] records, serializing them back, validating incoming params,
//! and the create/find/page/update/destroy operations with their
//! copy-then-atomic-rename write path.

mod csv_store;
mod params;
mod record;

pub use csv_store::{parse_page_param, CsvStore, StoreConfig, DEFAULT_PAGE, DEFAULT_PER_PAGE};
pub use params::PokemonParams;
pub use record::{Pokemon, CSV_HEADERS};
