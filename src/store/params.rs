//! Incoming request params, field allow-lists, and validation.
//!
//! Request bodies arrive as loosely typed JSON: a field can be missing, null,
//! a string, a number, or a boolean, and validation has to tell those apart
//! (a blank field and a non-numeric field produce different error messages).
//! [`PokemonParams`] keeps the raw JSON values, [`Draft`] is an allow-listed
//! merge of params onto a (possibly existing) record, and
//! [`Draft::validate`] accumulates every field error instead of stopping at
//! the first.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::Pokemon;

/// Fields that must be present and non-blank, in validation order.
pub const REQUIRED_FIELDS: [&str; 11] = [
    "number", "name", "type1", "total", "hp", "attack", "defense", "sp_atk", "sp_def", "speed",
    "generation",
];

/// Fields that must hold an integer, in validation order.
pub const NUMERIC_FIELDS: [&str; 9] = [
    "number", "total", "hp", "attack", "defense", "sp_atk", "sp_def", "speed", "generation",
];

/// Fields accepted from params on create: every field, including the key.
pub const CREATE_PERMITTED: [&str; 13] = [
    "number",
    "name",
    "type1",
    "type2",
    "total",
    "hp",
    "attack",
    "defense",
    "sp_atk",
    "sp_def",
    "speed",
    "generation",
    "legendary",
];

/// Fields accepted from params on update. `name` is deliberately absent:
/// the key is immutable, so a `name` key in the body is ignored.
pub const UPDATE_PERMITTED: [&str; 12] = [
    "number",
    "type1",
    "type2",
    "total",
    "hp",
    "attack",
    "defense",
    "sp_atk",
    "sp_def",
    "speed",
    "generation",
    "legendary",
];

/// Raw request params for a pokemon, keyed by field name.
///
/// A thin wrapper over a JSON object that preserves the distinction between
/// a missing key and an explicit `null` value: a missing key leaves the
/// target field untouched on update, while `null` blanks it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PokemonParams(serde_json::Map<String, Value>);

impl PokemonParams {
    /// Returns the raw value for a field, or `None` when the key is absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field value. Mostly useful for building params in tests.
    pub fn insert(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }
}

/// One loosely typed field value, before validation.
///
/// Mirrors what JSON can carry for a field. `Blank`-ness and numeric-ness
/// are judged on this representation: only [`FieldValue::Int`] counts as a
/// number (a string like `"45"` does not), and `false` counts as blank so
/// that the optional `legendary` flag can be explicitly cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// No value given (or explicit null).
    Absent,
    /// A string value; may still be blank if empty or whitespace-only.
    Text(String),
    /// An integer value.
    Int(i64),
    /// A boolean value.
    Flag(bool),
}

impl FieldValue {
    /// True for absent values, empty/whitespace-only strings, and `false`.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Flag(b) => !b,
            FieldValue::Int(_) => false,
        }
    }

    /// True only for integer values; strings never coerce.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Int(_))
    }

    /// The string content, for text values only.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The integer content, for numeric values only.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Renders the value as a CSV cell, `None` for blank values.
    fn as_cell(&self) -> Option<String> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Text(s) if s.trim().is_empty() => None,
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Int(n) => Some(n.to_string()),
            FieldValue::Flag(b) => Some(b.to_string()),
        }
    }

    /// Truthiness for the `legendary` flag: blank is false, any other
    /// present value is true unless it is an explicit boolean.
    fn truthy(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            other => !other.is_blank(),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Absent,
            Value::Bool(b) => FieldValue::Flag(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                // non-integer numbers fail the numeric check downstream
                None => FieldValue::Text(n.to_string()),
            },
            Value::String(s) => FieldValue::Text(s.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

/// An allow-listed, not-yet-validated pokemon record.
///
/// A draft is built either from scratch (create) or from an existing record
/// (update) and then has permitted param fields merged onto it. Validation
/// runs against the draft; only a draft that validated cleanly converts into
/// a [`Pokemon`].
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    number: FieldValue,
    name: FieldValue,
    type1: FieldValue,
    type2: FieldValue,
    total: FieldValue,
    hp: FieldValue,
    attack: FieldValue,
    defense: FieldValue,
    sp_atk: FieldValue,
    sp_def: FieldValue,
    speed: FieldValue,
    generation: FieldValue,
    legendary: FieldValue,
}

impl Draft {
    /// An empty draft with every field absent.
    fn empty() -> Self {
        Draft {
            number: FieldValue::Absent,
            name: FieldValue::Absent,
            type1: FieldValue::Absent,
            type2: FieldValue::Absent,
            total: FieldValue::Absent,
            hp: FieldValue::Absent,
            attack: FieldValue::Absent,
            defense: FieldValue::Absent,
            sp_atk: FieldValue::Absent,
            sp_def: FieldValue::Absent,
            speed: FieldValue::Absent,
            generation: FieldValue::Absent,
            legendary: FieldValue::Absent,
        }
    }

    /// Builds a create draft from params via the create allow-list.
    pub fn from_params(params: &PokemonParams) -> Self {
        let mut draft = Draft::empty();
        draft.apply(params, &CREATE_PERMITTED);
        draft
    }

    /// Builds an update draft carrying the current values of an existing
    /// record. Merge changes on top with [`Draft::apply`].
    pub fn from_record(record: &Pokemon) -> Self {
        Draft {
            number: FieldValue::Int(record.number),
            name: FieldValue::Text(record.name.clone()),
            type1: FieldValue::Text(record.type1.clone()),
            type2: match &record.type2 {
                Some(t) => FieldValue::Text(t.clone()),
                None => FieldValue::Absent,
            },
            total: FieldValue::Int(record.total),
            hp: FieldValue::Int(record.hp),
            attack: FieldValue::Int(record.attack),
            defense: FieldValue::Int(record.defense),
            sp_atk: FieldValue::Int(record.sp_atk),
            sp_def: FieldValue::Int(record.sp_def),
            speed: FieldValue::Int(record.speed),
            generation: FieldValue::Int(record.generation),
            legendary: FieldValue::Flag(record.legendary),
        }
    }

    /// Merges params onto the draft, honoring the given allow-list.
    ///
    /// Param keys outside the allow-list are silently ignored; keys the
    /// allow-list names but the params omit leave the field untouched.
    pub fn apply(&mut self, params: &PokemonParams, permitted: &[&str]) {
        for field in permitted {
            if let Some(value) = params.get(field) {
                if let Some(slot) = self.field_mut(field) {
                    *slot = FieldValue::from(value);
                }
            }
        }
    }

    /// The draft's name, when it holds a text value.
    pub fn name(&self) -> Option<&str> {
        self.name.as_str()
    }

    /// Runs the field checks and accumulates every error, in order:
    /// presence of the required fields, then numeric type of the stat
    /// fields. No check short-circuits, so one blank stat field yields both
    /// a blank error and a number error, and several bad fields all report.
    ///
    /// Uniqueness of `name` is a store concern (it needs a file scan) and is
    /// appended by the store on create.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for field in &REQUIRED_FIELDS {
            if self.field(field).is_blank() {
                errors.push(format!("{} can not be blank", field));
            }
        }

        for field in &NUMERIC_FIELDS {
            if !self.field(field).is_numeric() {
                errors.push(format!("{} must be a number", field));
            }
        }

        errors
    }

    /// Converts a validated draft into a typed record.
    ///
    /// # Errors
    ///
    /// Returns the accumulated validation errors when the draft is invalid.
    pub fn into_record(self) -> Result<Pokemon, Vec<String>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        // validate() guarantees the required fields are present and the
        // stat fields are integers; the fallbacks below are unreachable.
        Ok(Pokemon {
            number: self.number.as_int().unwrap_or_default(),
            name: self.name.as_str().unwrap_or_default().to_string(),
            type1: self.type1.as_str().unwrap_or_default().to_string(),
            type2: self.type2.as_cell(),
            total: self.total.as_int().unwrap_or_default(),
            hp: self.hp.as_int().unwrap_or_default(),
            attack: self.attack.as_int().unwrap_or_default(),
            defense: self.defense.as_int().unwrap_or_default(),
            sp_atk: self.sp_atk.as_int().unwrap_or_default(),
            sp_def: self.sp_def.as_int().unwrap_or_default(),
            speed: self.speed.as_int().unwrap_or_default(),
            generation: self.generation.as_int().unwrap_or_default(),
            legendary: self.legendary.truthy(),
        })
    }

    fn field(&self, name: &str) -> &FieldValue {
        match name {
            "number" => &self.number,
            "name" => &self.name,
            "type1" => &self.type1,
            "type2" => &self.type2,
            "total" => &self.total,
            "hp" => &self.hp,
            "attack" => &self.attack,
            "defense" => &self.defense,
            "sp_atk" => &self.sp_atk,
            "sp_def" => &self.sp_def,
            "speed" => &self.speed,
            "generation" => &self.generation,
            "legendary" => &self.legendary,
            _ => &FieldValue::Absent,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        match name {
            "number" => Some(&mut self.number),
            "name" => Some(&mut self.name),
            "type1" => Some(&mut self.type1),
            "type2" => Some(&mut self.type2),
            "total" => Some(&mut self.total),
            "hp" => Some(&mut self.hp),
            "attack" => Some(&mut self.attack),
            "defense" => Some(&mut self.defense),
            "sp_atk" => Some(&mut self.sp_atk),
            "sp_def" => Some(&mut self.sp_def),
            "speed" => Some(&mut self.speed),
            "generation" => Some(&mut self.generation),
            "legendary" => Some(&mut self.legendary),
            _ => None,
        }
    }
}
