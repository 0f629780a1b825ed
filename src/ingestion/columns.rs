//! Header synonym resolution.
//!
//! Bank exports spell the same column many ways (`Reserve Price:`, `RESERVE PRICE`,
//! `reserveprice`). A [`SynonymTable`] maps every known spelling to one canonical field, and
//! [`resolve_columns`] turns a header row into a [`ColumnIndexMap`].

use std::collections::HashMap;

use serde::Serialize;

use crate::schema::FieldSpec;
use crate::types::{Cell, ColumnIndexMap};

/// What to do when two header cells resolve to the same canonical field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateHeaderPolicy {
    /// The later column wins.
    #[default]
    LastWins,
    /// The earlier column wins; later duplicates are ignored.
    FirstWins,
}

/// Two header cells that resolved to the same field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderConflict {
    pub field: String,
    pub kept_column: usize,
    pub ignored_column: usize,
}

/// Static many-to-one lookup from header spelling to canonical field name.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: HashMap<String, &'static str>,
}

impl SynonymTable {
    /// Build a table from the schema's fields and extra `(spelling, field)` pairs.
    ///
    /// Every field's own name is registered as a spelling of itself.
    pub fn new(fields: &[FieldSpec], synonyms: &[(&str, &'static str)]) -> Self {
        let mut entries = HashMap::with_capacity(fields.len() + synonyms.len());
        for field in fields {
            entries.insert(header_key(field.name), field.name);
        }
        for (spelling, field) in synonyms {
            entries.insert(header_key(spelling), *field);
        }
        Self { entries }
    }

    /// Canonical field for a raw header, if known.
    pub fn lookup(&self, raw_header: &str) -> Option<&'static str> {
        let key = header_key(raw_header);
        if key.is_empty() {
            return None;
        }
        self.entries.get(&key).copied()
    }

    /// Number of known spellings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no spellings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(normalized spelling, field)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Lower-cased, trimmed header text.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Lookup key of a header: the normalized text with whitespace and punctuation removed.
pub fn header_key(raw: &str) -> String {
    normalize_header(raw)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Full outcome of resolving one header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnResolution {
    pub columns: ColumnIndexMap,
    /// Non-empty header cells that matched no known spelling, as written.
    pub unmapped: Vec<String>,
    pub conflicts: Vec<HeaderConflict>,
}

/// Map a header row onto canonical fields. Later duplicate columns overwrite earlier ones.
pub fn resolve_columns(header_row: &[Cell], table: &SynonymTable) -> ColumnIndexMap {
    resolve_columns_with(header_row, table, DuplicateHeaderPolicy::LastWins).columns
}

/// Map a header row onto canonical fields, keeping track of unknown and duplicate headers.
pub fn resolve_columns_with(
    header_row: &[Cell],
    table: &SynonymTable,
    policy: DuplicateHeaderPolicy,
) -> ColumnResolution {
    let mut out = ColumnResolution::default();

    for (idx, cell) in header_row.iter().enumerate() {
        let raw = cell.to_text();
        let Some(field) = table.lookup(&raw) else {
            if !raw.trim().is_empty() {
                out.unmapped.push(raw.trim().to_string());
            }
            continue;
        };

        match (out.columns.get(field), policy) {
            (None, _) => {
                out.columns.insert(field, idx);
            }
            (Some(previous), DuplicateHeaderPolicy::LastWins) => {
                out.columns.insert(field, idx);
                out.conflicts.push(HeaderConflict {
                    field: field.to_string(),
                    kept_column: idx,
                    ignored_column: previous,
                });
            }
            (Some(previous), DuplicateHeaderPolicy::FirstWins) => {
                out.conflicts.push(HeaderConflict {
                    field: field.to_string(),
                    kept_column: previous,
                    ignored_column: idx,
                });
            }
        }
    }

    out
}
