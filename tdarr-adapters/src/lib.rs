//! # tdarr-adapters
//!
//! HTTP adapters on either side of the statistics pipeline.
//!
//! ## Supported Systems
//!
//! - **Tdarr** (`tdarr` feature) - Fetches the statistics document from the
//!   Tdarr server's `cruddb` API
//! - **InfluxDB v2** (`influx` feature) - Writes measurement points through the
//!   `/api/v2/write` endpoint using line protocol
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "tdarr", feature = "influx"))]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use tdarr_adapters::influx::InfluxSink;
//! use tdarr_adapters::tdarr::TdarrAdapter;
//!
//! let adapter = TdarrAdapter::builder()
//!     .endpoint("http://localhost:8265")
//!     .build()?;
//!
//! let document = adapter.collect().await?;
//! println!("Fetched {} statistics keys", document.len());
//!
//! let sink = InfluxSink::builder()
//!     .endpoint("http://localhost:8086")
//!     .token("my-token")
//!     .org("home")
//!     .bucket("tdarr")
//!     .build()?;
//! sink.health().await?;
//! # Ok(())
//! # }
//! # fn main() {}
//! ```

pub mod error;

#[cfg(feature = "tdarr")]
pub mod tdarr;

#[cfg(feature = "influx")]
pub mod influx;

#[cfg(all(test, any(feature = "tdarr", feature = "influx")))]
mod test_server;

pub use error::AdapterError;

// Re-export types for convenience
pub use tdarr_types::{MeasurementPoint, TagSet};

/// The raw statistics document: a JSON object whose keys keep document order.
pub type StatisticsDocument = serde_json::Map<String, serde_json::Value>;
