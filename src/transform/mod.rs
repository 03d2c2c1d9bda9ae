//! Statistics document to measurement points.
//!
//! [`transform`] walks the document's keys in order and dispatches on key
//! name: `pies`, `streamStats` and `languages` get nested decoding, `_id`
//! supplies the identifier tag, and everything else is a scalar. A key whose
//! value cannot be decoded is logged and skipped; it never aborts the run.
//!
//! Every point carries an identifier tag whose key is the document's `_id`
//! value and whose value names the statistic.

mod library;
mod nested;
mod scalar;
pub mod tables;

use serde_json::Value;
use tracing::warn;

use tdarr_adapters::StatisticsDocument;
use tdarr_types::{MeasurementPoint, TagSet, MEASUREMENT, STATISTICS_DOC_ID};

pub use library::{Breakdown, BreakdownEntry, LibraryRecord, RecordError};
pub use scalar::{coerce_numeric_string, decode_scalar_value, DecodeError};
pub use tables::BreakdownKind;

use tables::{ID_KEY, LANGUAGES_KEY, PIES_KEY, STREAM_STATS_KEY};

/// Transform a statistics document into an ordered list of points.
///
/// Pure and deterministic: points follow the document's key order, and
/// within `pies` the record, position and entry order.
pub fn transform(document: &StatisticsDocument) -> Vec<MeasurementPoint> {
    let mut emitter = Emitter::new(identifier(document));

    for (key, value) in document {
        match key.as_str() {
            ID_KEY => {}
            PIES_KEY => library::decode_pies(value, &mut emitter),
            STREAM_STATS_KEY => nested::decode_stream_stats(value, &mut emitter),
            LANGUAGES_KEY => nested::decode_languages(value, &mut emitter),
            _ => scalar::decode_scalar(key, value, &mut emitter),
        }
    }

    emitter.into_points()
}

/// The tag key shared by every point.
fn identifier(document: &StatisticsDocument) -> &str {
    match document.get(ID_KEY).and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id,
        _ => {
            warn!(
                fallback = STATISTICS_DOC_ID,
                "Statistics document has no usable _id"
            );
            STATISTICS_DOC_ID
        }
    }
}

/// Collects points that share one identifier tag.
pub(crate) struct Emitter<'a> {
    identifier: &'a str,
    points: Vec<MeasurementPoint>,
}

impl<'a> Emitter<'a> {
    fn new(identifier: &'a str) -> Self {
        Self {
            identifier,
            points: Vec::new(),
        }
    }

    /// Start a tag set with the identifier tag.
    pub(crate) fn tags(&self, statistic: &str) -> TagSet {
        TagSet::new().with(self.identifier, statistic)
    }

    pub(crate) fn emit(&mut self, tags: TagSet, value: f64) {
        match MeasurementPoint::new(MEASUREMENT, tags, value) {
            Ok(point) => self.points.push(point),
            Err(e) => warn!(error = %e, "Dropping point"),
        }
    }

    fn into_points(self) -> Vec<MeasurementPoint> {
        self.points
    }
}
