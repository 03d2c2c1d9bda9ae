//! Measurement points - the atomic output unit written to the store.

use thiserror::Error;

use crate::{TagSet, FIELD};

/// Errors raised while constructing a point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointError {
    /// The numeric payload was NaN or infinite.
    #[error("Point value must be finite, got {0}")]
    NonFiniteValue(f64),

    /// The builder was finished without a value.
    #[error("Point has no value")]
    MissingValue,
}

/// A single `(measurement, tag-set, field, value)` tuple.
///
/// The value is always a finite `f64`; construction through
/// [`MeasurementPoint::new`] or the builder rejects anything else.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementPoint {
    /// Logical table the point belongs to.
    pub measurement: String,

    /// Dimensions used for filtering and grouping.
    pub tags: TagSet,

    /// Name of the single numeric field.
    pub field: String,

    /// The numeric payload.
    pub value: f64,

    /// Nanoseconds since the Unix epoch. When `None`, the store assigns
    /// the write time.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub timestamp_ns: Option<i64>,
}

impl MeasurementPoint {
    /// Create a point under the default [`FIELD`] name.
    pub fn new(
        measurement: impl Into<String>,
        tags: TagSet,
        value: f64,
    ) -> Result<Self, PointError> {
        if !value.is_finite() {
            return Err(PointError::NonFiniteValue(value));
        }
        Ok(Self {
            measurement: measurement.into(),
            tags,
            field: FIELD.to_string(),
            value,
            timestamp_ns: None,
        })
    }

    /// Create a builder for a point in the given measurement.
    pub fn builder(measurement: impl Into<String>) -> MeasurementPointBuilder {
        MeasurementPointBuilder::new(measurement)
    }

    /// Look up a tag value on this point.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key)
    }
}

/// Builder for `MeasurementPoint`.
#[derive(Debug)]
pub struct MeasurementPointBuilder {
    measurement: String,
    tags: TagSet,
    field: String,
    value: Option<f64>,
    timestamp_ns: Option<i64>,
}

impl MeasurementPointBuilder {
    /// Create a new builder.
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: TagSet::new(),
            field: FIELD.to_string(),
            value: None,
            timestamp_ns: None,
        }
    }

    /// Add a tag.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    /// Replace the whole tag set.
    pub fn tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    /// Override the field name (default: `value`).
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Set the numeric payload.
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Set an explicit timestamp in nanoseconds since the Unix epoch.
    pub fn timestamp_ns(mut self, ts: i64) -> Self {
        self.timestamp_ns = Some(ts);
        self
    }

    /// Build the point.
    pub fn build(self) -> Result<MeasurementPoint, PointError> {
        let value = self.value.ok_or(PointError::MissingValue)?;
        if !value.is_finite() {
            return Err(PointError::NonFiniteValue(value));
        }
        Ok(MeasurementPoint {
            measurement: self.measurement,
            tags: self.tags,
            field: self.field,
            value,
            timestamp_ns: self.timestamp_ns,
        })
    }
}
