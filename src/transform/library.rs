//! Per-library records from the `pies` array.
//!
//! Tdarr sends each library as a positional array:
//!
//! ```text
//! [ name, id, files, transcodes, space_saved, health_checks,
//!   transcode_status[], health_check_status[], codecs[], containers[], qualities[], ... ]
//! ```
//!
//! [`LibraryRecord::from_value`] maps those positions onto named fields once;
//! nothing downstream indexes into the raw array. Positions past the known
//! breakdowns are ignored.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::scalar::number;
use super::tables::{BreakdownKind, SUMMARY_FIELDS};
use super::Emitter;

const NAME_POS: usize = 0;
const ID_POS: usize = 1;
const SUMMARY_START: usize = 2;
const BREAKDOWN_START: usize = SUMMARY_START + SUMMARY_FIELDS.len();

const LIBRARY_NAME_TAG: &str = "library_name";
const LIBRARY_ID_TAG: &str = "library_id";

/// Why a library record was rejected as a whole.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("library record is not an array")]
    NotAnArray,

    #[error("library record has no string {0}")]
    MissingIdentity(&'static str),
}

/// One library from the `pies` array.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryRecord {
    pub name: String,
    pub id: String,
    /// Values for [`SUMMARY_FIELDS`], `None` where missing or non-numeric.
    pub summary: [Option<f64>; 4],
    /// Breakdowns present in the record, in [`BreakdownKind::ALL`] order.
    pub breakdowns: Vec<Breakdown>,
}

/// Counts split by a secondary dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub kind: BreakdownKind,
    pub entries: Vec<BreakdownEntry>,
}

/// A `{name, value}` entry of a breakdown. Entries keep their position, as
/// transcode statuses are identified by it.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownEntry {
    pub name: String,
    pub value: Option<f64>,
}

impl LibraryRecord {
    /// Decode a positional library record.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let fields = value.as_array().ok_or(RecordError::NotAnArray)?;

        let name = string_at(fields, NAME_POS).ok_or(RecordError::MissingIdentity("name"))?;
        let id = string_at(fields, ID_POS).ok_or(RecordError::MissingIdentity("id"))?;

        let mut summary: [Option<f64>; 4] = [None; 4];
        for (i, slot) in summary.iter_mut().enumerate() {
            *slot = match fields.get(SUMMARY_START + i) {
                Some(Value::Number(n)) => number(n).ok(),
                _ => None,
            };
        }

        let breakdowns = BreakdownKind::ALL
            .iter()
            .zip(fields.iter().skip(BREAKDOWN_START))
            .map(|(kind, value)| Breakdown::from_value(*kind, value, &name))
            .collect();

        Ok(LibraryRecord {
            name,
            id,
            summary,
            breakdowns,
        })
    }

    fn emit(&self, out: &mut Emitter<'_>) {
        for (field, value) in SUMMARY_FIELDS.iter().zip(&self.summary) {
            match value {
                Some(v) => {
                    let tags = self.tags(out, field);
                    out.emit(tags, *v);
                }
                None => warn!(library = %self.name, field, "Skipping non-numeric summary"),
            }
        }

        for breakdown in &self.breakdowns {
            let kind = breakdown.kind;
            for (index, entry) in breakdown.entries.iter().enumerate() {
                let Some(value) = entry.value else {
                    warn!(library = %self.name, breakdown = kind.field_name(), index, "Skipping entry without numeric value");
                    continue;
                };
                let label = kind.entry_label(index, &entry.name);
                let tags = self
                    .tags(out, kind.field_name())
                    .with(kind.tag_key(), label);
                out.emit(tags, value);
            }
        }
    }

    fn tags(&self, out: &Emitter<'_>, statistic: &str) -> tdarr_types::TagSet {
        out.tags(statistic)
            .with(LIBRARY_NAME_TAG, self.name.as_str())
            .with(LIBRARY_ID_TAG, self.id.as_str())
    }
}

impl Breakdown {
    fn from_value(kind: BreakdownKind, value: &Value, library: &str) -> Self {
        let entries = match value {
            Value::Array(items) => items.iter().map(BreakdownEntry::from_value).collect(),
            _ => {
                warn!(library, breakdown = kind.field_name(), "Breakdown is not a list");
                Vec::new()
            }
        };
        Breakdown { kind, entries }
    }
}

impl BreakdownEntry {
    fn from_value(value: &Value) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let value = match value.get("value") {
            Some(Value::Number(n)) => number(n).ok(),
            _ => None,
        };
        BreakdownEntry { name, value }
    }
}

/// Decode the `pies` value and emit points for every library.
pub(super) fn decode_pies(value: &Value, out: &mut Emitter<'_>) {
    let Some(records) = value.as_array() else {
        warn!("Skipping pies: not a list");
        return;
    };

    for (index, record) in records.iter().enumerate() {
        match LibraryRecord::from_value(record) {
            Ok(record) => record.emit(out),
            Err(e) => warn!(index, error = %e, "Skipping library record"),
        }
    }
}

fn string_at(fields: &[Value], pos: usize) -> Option<String> {
    fields.get(pos).and_then(Value::as_str).map(str::to_string)
}
