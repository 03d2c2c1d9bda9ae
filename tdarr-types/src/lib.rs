//! # tdarr-types
//!
//! Measurement point types for republishing Tdarr statistics into a
//! time-series store. A [`MeasurementPoint`] is one
//! `(measurement, tag-set, field, value)` tuple; it renders itself as an
//! InfluxDB line protocol record.
//!
//! ## Features
//!
//! - `serde`: Serialize/deserialize points and tag sets via serde
//!
//! ## Example
//!
//! ```rust
//! use tdarr_types::{MeasurementPoint, MEASUREMENT};
//!
//! let point = MeasurementPoint::builder(MEASUREMENT)
//!     .tag("statistics", "totalFileCount")
//!     .value(1234.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     point.to_line_protocol(),
//!     "tdarr,statistics=totalFileCount value=1234"
//! );
//! ```

mod line;
mod point;
mod tags;

pub use line::{escape_measurement, escape_tag};
pub use point::{MeasurementPoint, MeasurementPointBuilder, PointError};
pub use tags::TagSet;

/// Measurement (table) name used for every point from this source.
pub const MEASUREMENT: &str = "tdarr";

/// Field name holding the numeric payload of every point.
pub const FIELD: &str = "value";

/// Document id of the statistics record in Tdarr's `StatisticsJSONDB`
/// collection. The document carries the same value in its `_id` key.
pub const STATISTICS_DOC_ID: &str = "statistics";
