//! Pokemon record type and its CSV column mapping.
//!
//! Defines [`Pokemon`], the typed form of one row of the backing file, along
//! with parsing from a [`csv::StringRecord`] and serialization back to the
//! fixed column order. The column names are the historical ones from the
//! dataset (`#`, `Name`, `Type 1`, ...), which is why the struct field names
//! and the CSV headers differ.

use serde::{Deserialize, Serialize};

use crate::error::PokedexError;

/// The backing file's header row, in column order.
///
/// These are the dataset's historical column names. New files must carry
/// exactly this header; the store never migrates or rewrites it.
pub const CSV_HEADERS: [&str; 13] = [
    "#",
    "Name",
    "Type 1",
    "Type 2",
    "Total",
    "HP",
    "Attack",
    "Defense",
    "Sp. Atk",
    "Sp. Def",
    "Speed",
    "Generation",
    "Legendary",
];

/// Zero-based index of the `Name` column, the primary key.
pub const NAME_COLUMN: usize = 1;

/// A single pokemon record, keyed by its unique `name`.
///
/// This struct represents one row of the backing CSV file in typed form.
/// It is the shape returned by every store operation and serialized into
/// API response bodies.
///
/// # Fields
///
/// * `number` - Pokedex number; *not* unique (mega evolutions share it)
/// * `name` - Unique primary key, immutable after creation
/// * `type1` - Primary type, required
/// * `type2` - Secondary type; `None` when the CSV cell is empty
/// * `total`..`generation` - Integer stats
/// * `legendary` - Stored as the literal `True`/`False` in the CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Pokedex number. Multiple records can share a number
    /// (e.g. Venusaur and VenusaurMega Venusaur are both 3),
    /// which is why `name` is the key instead.
    pub number: i64,
    /// Unique name, the primary key.
    pub name: String,
    /// Primary type.
    pub type1: String,
    /// Secondary type, absent for single-type pokemon.
    pub type2: Option<String>,
    /// Sum of all stats.
    pub total: i64,
    /// Hit points.
    pub hp: i64,
    /// Attack stat.
    pub attack: i64,
    /// Defense stat.
    pub defense: i64,
    /// Special attack stat.
    pub sp_atk: i64,
    /// Special defense stat.
    pub sp_def: i64,
    /// Speed stat.
    pub speed: i64,
    /// Generation the pokemon was introduced in.
    pub generation: i64,
    /// Legendary flag; defaults to false when absent at creation.
    pub legendary: bool,
}

impl Pokemon {
    /// Parses a CSV data row into a typed record.
    ///
    /// The row is expected to follow the fixed column order of
    /// [`CSV_HEADERS`]. `Legendary` is true only for the exact literal
    /// `"True"` (case-sensitive); anything else, including `"true"`, parses
    /// to false. An empty `Type 2` cell becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PokedexError::MalformedRow`] when the field count is wrong
    /// or a numeric column does not parse; the store treats that as a fatal
    /// condition, since it assumes a well-formed backing file.
    pub fn from_csv(record: &csv::StringRecord) -> Result<Self, PokedexError> {
        if record.len() != CSV_HEADERS.len() {
            return Err(PokedexError::MalformedRow(format!(
                "expected {} fields but got {}",
                CSV_HEADERS.len(),
                record.len()
            )));
        }

        let type2 = match record.get(3) {
            Some("") | None => None,
            Some(value) => Some(value.to_string()),
        };

        Ok(Pokemon {
            number: parse_stat(record, 0, "number")?,
            name: record.get(NAME_COLUMN).unwrap_or_default().to_string(),
            type1: record.get(2).unwrap_or_default().to_string(),
            type2,
            total: parse_stat(record, 4, "total")?,
            hp: parse_stat(record, 5, "hp")?,
            attack: parse_stat(record, 6, "attack")?,
            defense: parse_stat(record, 7, "defense")?,
            sp_atk: parse_stat(record, 8, "sp_atk")?,
            sp_def: parse_stat(record, 9, "sp_def")?,
            speed: parse_stat(record, 10, "speed")?,
            generation: parse_stat(record, 11, "generation")?,
            legendary: record.get(12) == Some("True"),
        })
    }

    /// Serializes the record into CSV fields in the fixed column order.
    ///
    /// `legendary` is rendered as the literal `"True"`/`"False"` because the
    /// rest of the file is written in that format; an absent `type2` becomes
    /// an empty cell.
    pub fn csv_fields(&self) -> [String; 13] {
        [
            self.number.to_string(),
            self.name.clone(),
            self.type1.clone(),
            self.type2.clone().unwrap_or_default(),
            self.total.to_string(),
            self.hp.to_string(),
            self.attack.to_string(),
            self.defense.to_string(),
            self.sp_atk.to_string(),
            self.sp_def.to_string(),
            self.speed.to_string(),
            self.generation.to_string(),
            if self.legendary { "True" } else { "False" }.to_string(),
        ]
    }
}

/// Parses one integer stat column, reporting the struct field name on failure.
fn parse_stat(record: &csv::StringRecord, index: usize, field: &str) -> Result<i64, PokedexError> {
    let raw = record.get(index).unwrap_or_default();
    raw.trim().parse::<i64>().map_err(|e| {
        PokedexError::MalformedRow(format!("{} value '{}' is not an integer: {}", field, raw, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur_row() -> csv::StringRecord {
        csv::StringRecord::from(vec![
            "1", "Bulbasaur", "Grass", "Poison", "318", "45", "49", "49", "65", "65", "45", "1",
            "False",
        ])
    }

    #[test]
    fn test_from_csv_parses_all_fields() {
        let pokemon = Pokemon::from_csv(&bulbasaur_row()).unwrap();
        assert_eq!(pokemon.number, 1);
        assert_eq!(pokemon.name, "Bulbasaur");
        assert_eq!(pokemon.type1, "Grass");
        assert_eq!(pokemon.type2.as_deref(), Some("Poison"));
        assert_eq!(pokemon.total, 318);
        assert_eq!(pokemon.hp, 45);
        assert_eq!(pokemon.generation, 1);
        assert!(!pokemon.legendary);
    }

    #[test]
    fn test_from_csv_empty_type2_is_none() {
        let record = csv::StringRecord::from(vec![
            "4", "Charmander", "Fire", "", "309", "39", "52", "43", "60", "50", "65", "1", "False",
        ]);
        let pokemon = Pokemon::from_csv(&record).unwrap();
        assert_eq!(pokemon.type2, None);
    }

    #[test]
    fn test_from_csv_legendary_is_case_sensitive() {
        let mut fields: Vec<String> = bulbasaur_row().iter().map(String::from).collect();
        fields[12] = "true".to_string();
        let record = csv::StringRecord::from(fields);
        // only the exact literal "True" parses to true
        assert!(!Pokemon::from_csv(&record).unwrap().legendary);

        let mut fields: Vec<String> = bulbasaur_row().iter().map(String::from).collect();
        fields[12] = "True".to_string();
        let record = csv::StringRecord::from(fields);
        assert!(Pokemon::from_csv(&record).unwrap().legendary);
    }

    #[test]
    fn test_from_csv_wrong_field_count() {
        let record = csv::StringRecord::from(vec!["1", "Bulbasaur"]);
        let err = Pokemon::from_csv(&record).unwrap_err();
        assert!(matches!(err, PokedexError::MalformedRow(_)));
    }

    #[test]
    fn test_from_csv_non_numeric_stat() {
        let mut fields: Vec<String> = bulbasaur_row().iter().map(String::from).collect();
        fields[5] = "lots".to_string();
        let record = csv::StringRecord::from(fields);
        let err = Pokemon::from_csv(&record).unwrap_err();
        assert!(err.to_string().contains("hp"));
    }

    #[test]
    fn test_csv_fields_round_trip() {
        let pokemon = Pokemon::from_csv(&bulbasaur_row()).unwrap();
        let fields = pokemon.csv_fields();
        let record = csv::StringRecord::from(fields.to_vec());
        assert_eq!(Pokemon::from_csv(&record).unwrap(), pokemon);
    }

    #[test]
    fn test_csv_fields_renders_capitalized_booleans() {
        let mut pokemon = Pokemon::from_csv(&bulbasaur_row()).unwrap();
        assert_eq!(pokemon.csv_fields()[12], "False");
        pokemon.legendary = true;
        assert_eq!(pokemon.csv_fields()[12], "True");
    }

    #[test]
    fn test_csv_fields_none_type2_is_empty_cell() {
        let mut pokemon = Pokemon::from_csv(&bulbasaur_row()).unwrap();
        pokemon.type2 = None;
        assert_eq!(pokemon.csv_fields()[3], "");
    }
}
