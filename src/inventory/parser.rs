//! Parsing of `systemctl list-units` output.
//!
//! The structured (JSON) mode is not available on every systemd version, so
//! a listing is either [`Listing::Structured`] or [`Listing::Tabular`], and
//! both are normalized by [`Listing::into_units`].

use serde::de::Error as _;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::DaemonError;
use crate::executor::systemctl::TABULAR_PREFIX_COLUMNS;

use super::record::ActiveState;

/// Field spellings, in priority order, across systemd output versions.
const NAME_KEYS: &[&str] = &["unit", "name", "UNIT", "id", "Id"];
const ACTIVE_KEYS: &[&str] = &["activeState", "ActiveState", "active", "state"];
const DESCRIPTION_KEYS: &[&str] = &["description", "Description"];

/// Container fields that may hold the unit collection.
const COLLECTION_KEYS: &[&str] = &["units", "data"];

/// Status glyphs systemctl prints in front of failed or changed units.
const BULLETS: &[&str] = &["●", "*", "○"];

/// A parsed listing, tagged by output mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Structured(Vec<Value>),
    Tabular(Vec<TabularRow>),
}

/// One line of tabular output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularRow {
    pub name: String,
    pub description: String,
    pub line: String,
}

/// A unit taken from a listing, before per-unit state queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedUnit {
    pub name: String,
    /// Present when the listing itself carried the active state.
    pub active_state: Option<ActiveState>,
    pub description: String,
    pub raw_detail: String,
}

impl Listing {
    /// Normalize into listed units, in listing order. Malformed entries
    /// are skipped.
    pub fn into_units(self) -> Vec<ListedUnit> {
        match self {
            Listing::Structured(entries) => entries.iter().filter_map(structured_unit).collect(),
            Listing::Tabular(rows) => rows
                .into_iter()
                .map(|row| ListedUnit {
                    name: row.name,
                    active_state: None,
                    description: row.description,
                    raw_detail: row.line,
                })
                .collect(),
        }
    }
}

/// Parse structured output into its entry collection.
///
/// Accepts a top-level array, or an object exposing a `units` / `data`
/// array. Any other object is taken as a single entry.
pub fn parse_structured(stdout: &str) -> Result<Vec<Value>, DaemonError> {
    let data: Value = serde_json::from_str(stdout.trim())?;
    match data {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut object) => {
            for key in COLLECTION_KEYS {
                if let Some(Value::Array(entries)) = object.remove(*key) {
                    return Ok(entries);
                }
            }
            Ok(vec![Value::Object(object)])
        }
        other => Err(DaemonError::Serialization(serde_json::Error::custom(
            format!("expected a unit collection, got {}", type_name(&other)),
        ))),
    }
}

/// Parse tabular output. Every non-empty line yields a row.
pub fn parse_tabular(stdout: &str) -> Vec<TabularRow> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let tokens: Vec<&str> = line
                .split_whitespace()
                .skip_while(|t| BULLETS.contains(t))
                .collect();
            let name = tokens.first()?;
            let description = if tokens.len() > TABULAR_PREFIX_COLUMNS {
                tokens[TABULAR_PREFIX_COLUMNS..].join(" ")
            } else {
                String::new()
            };
            Some(TabularRow {
                name: name.to_string(),
                description,
                line: line.to_string(),
            })
        })
        .collect()
}

fn structured_unit(entry: &Value) -> Option<ListedUnit> {
    let Some(object) = entry.as_object() else {
        debug!(entry = %entry, "Skipping non-object listing entry");
        return None;
    };

    let Some(name) = first_str(object, NAME_KEYS).filter(|n| !n.contains(char::is_whitespace))
    else {
        debug!(entry = %entry, "Skipping listing entry without a usable name");
        return None;
    };

    Some(ListedUnit {
        name: name.to_string(),
        active_state: Some(
            first_str(object, ACTIVE_KEYS)
                .map(ActiveState::parse)
                .unwrap_or_default(),
        ),
        description: first_str(object, DESCRIPTION_KEYS)
            .unwrap_or_default()
            .to_string(),
        raw_detail: entry.to_string(),
    })
}

/// First non-empty string value among `keys`.
fn first_str<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
