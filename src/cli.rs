//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros. The
//! `Args` struct carries the backing-file paths and the listen address; use
//! the `validate()` method after parsing to check the argument values.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::PokedexError;
use crate::store::StoreConfig;

/// Command-line arguments for the pokedex API server.
///
/// # Example
///
/// ```rust,ignore
/// use clap::Parser;
/// use pokedex_api::cli::Args;
///
/// let args = Args::parse();
/// args.validate()?;
/// ```
#[derive(Parser, Debug)]
#[command(name = "pokedex-api")]
#[command(about = "CRUD HTTP API over a flat CSV file of pokemon records")]
#[command(version)]
pub struct Args {
    /// Path to the backing CSV file (must exist, with header row)
    #[arg(long)]
    pub file: PathBuf,

    /// Temp file used during rewrites (default: <stem>_tmp.<ext> beside the primary)
    #[arg(long)]
    pub tmp_file: Option<PathBuf>,

    /// Socket address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,
}

impl Args {
    /// Validates the argument values after parsing.
    ///
    /// # Errors
    ///
    /// Returns [`PokedexError::InvalidArgument`] when the backing file does
    /// not exist; the store never creates it.
    pub fn validate(&self) -> Result<(), PokedexError> {
        if !self.file.is_file() {
            return Err(PokedexError::InvalidArgument(format!(
                "backing file '{}' does not exist",
                self.file.display()
            )));
        }
        Ok(())
    }

    /// Store path configuration derived from the arguments.
    pub fn store_config(&self) -> StoreConfig {
        match &self.tmp_file {
            Some(tmp) => StoreConfig::with_tmp_path(&self.file, tmp),
            None => StoreConfig::new(&self.file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_minimal() {
        let args = Args::parse_from(["pokedex-api", "--file", "db.csv"]);
        assert_eq!(args.file, PathBuf::from("db.csv"));
        assert_eq!(args.tmp_file, None);
        assert_eq!(args.listen, "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn test_args_parse_full() {
        let args = Args::parse_from([
            "pokedex-api",
            "--file",
            "db.csv",
            "--tmp-file",
            "scratch.csv",
            "--listen",
            "0.0.0.0:8080",
        ]);
        assert_eq!(args.tmp_file, Some(PathBuf::from("scratch.csv")));
        assert_eq!(args.listen, "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_validate_rejects_missing_file() {
        let args = Args::parse_from(["pokedex-api", "--file", "/nonexistent/db.csv"]);
        let err = args.validate().unwrap_err();
        assert!(matches!(err, PokedexError::InvalidArgument(_)));
    }

    #[test]
    fn test_store_config_uses_explicit_tmp_path() {
        let args = Args::parse_from([
            "pokedex-api",
            "--file",
            "db.csv",
            "--tmp-file",
            "scratch.csv",
        ]);
        let config = args.store_config();
        assert_eq!(config.tmp_path, PathBuf::from("scratch.csv"));
    }

    #[test]
    fn test_store_config_derives_default_tmp_path() {
        let args = Args::parse_from(["pokedex-api", "--file", "db.csv"]);
        let config = args.store_config();
        assert_eq!(config.tmp_path, PathBuf::from("db_tmp.csv"));
    }
}
