//! # tdarr-influx
//!
//! Polls a Tdarr server's statistics endpoint and republishes the data as
//! InfluxDB v2 time-series points.
//!
//! ## Architecture
//!
//! A run is a single synchronous pass over one document:
//!
//! ```text
//! ┌──────────────┐   document   ┌─────────────┐   points   ┌─────────────┐
//! │ TdarrAdapter │─────────────▶│  transform  │───────────▶│ InfluxSink  │
//! │  (fetch)     │              │   (core)    │            │  (write)    │
//! └──────────────┘              └─────────────┘            └─────────────┘
//! ```
//!
//! - **[`config`]**: INI settings with `[Tdarr]` and `[Influx]` sections
//! - **[`transform`]**: Turns the nested statistics document into a flat,
//!   ordered list of [`MeasurementPoint`]s
//! - **[`pipeline`]**: Wires fetch, transform and write together for one run
//!
//! ## Usage
//!
//! ```bash
//! # Fetch, transform and write
//! tdarr-influx --config tdarr_influxdb.conf
//!
//! # Inspect the points a saved response would produce
//! tdarr-influx --input statistics.json --dry-run
//! ```
//!
//! ### As a library
//!
//! ```
//! use serde_json::json;
//! use tdarr_influx::transform::transform;
//!
//! let document = json!({
//!     "_id": "statistics",
//!     "languages": { "English": { "count": 7 } }
//! });
//!
//! let points = transform(document.as_object().unwrap());
//! assert_eq!(points.len(), 1);
//! assert_eq!(points[0].tag("language"), Some("English"));
//! assert_eq!(points[0].value, 7.0);
//! ```

pub mod config;
pub mod duration;
pub mod pipeline;
pub mod transform;

pub use config::{InfluxSettings, Settings, SettingsError, TdarrSettings};
pub use pipeline::{run, RunOptions, RunSummary};
pub use tdarr_adapters::StatisticsDocument;
pub use tdarr_types::{MeasurementPoint, TagSet};
