//! InfluxDB v2 sink using the HTTP write API.
//!
//! Points are rendered as line protocol and written one request per point,
//! in order. The first failed write stops the batch.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tdarr_adapters::influx::InfluxSink;
//! use tdarr_types::{MeasurementPoint, MEASUREMENT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sink = InfluxSink::builder()
//!         .endpoint("http://localhost:8086")
//!         .token("my-token")
//!         .org("home")
//!         .bucket("tdarr")
//!         .build()?;
//!
//!     let point = MeasurementPoint::builder(MEASUREMENT)
//!         .tag("statistics", "totalFileCount")
//!         .value(1234.0)
//!         .build()?;
//!
//!     sink.write(&point).await?;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use tdarr_types::MeasurementPoint;

use crate::AdapterError;

/// InfluxDB v2 sink for measurement points.
#[derive(Debug, Clone)]
pub struct InfluxSink {
    client: Client,
    endpoint: String,
    token: String,
    org: String,
    bucket: String,
}

/// Failure part-way through [`InfluxSink::write_all`].
#[derive(Debug, Error)]
#[error("write failed after {written} points: {error}")]
pub struct PartialWrite {
    /// Points written successfully before the failure.
    pub written: usize,
    /// The error that stopped the batch.
    #[source]
    pub error: AdapterError,
}

impl InfluxSink {
    /// Create a new builder for configuring the sink.
    pub fn builder() -> InfluxSinkBuilder {
        InfluxSinkBuilder::default()
    }

    /// Target bucket.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Target organization.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Check that the server is reachable and ready.
    pub async fn health(&self) -> Result<(), AdapterError> {
        let url = format!("{}/health", self.base());
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AdapterError::Connection(format!(
                "health check returned status {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Write a single point.
    pub async fn write(&self, point: &MeasurementPoint) -> Result<(), AdapterError> {
        let line = point.to_line_protocol();
        tracing::debug!(line = %line, "Writing point");

        let response = self
            .client
            .post(self.write_url())
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.token))
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(line)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AdapterError::Auth(format!(
                "write rejected with status {}",
                status
            )));
        }

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AdapterError::Http(format!(
                "write returned status {}: {}",
                status,
                detail.trim()
            )));
        }

        Ok(())
    }

    /// Write points one at a time, preserving order.
    ///
    /// Returns the number of points written. Stops at the first failure.
    pub async fn write_all(&self, points: &[MeasurementPoint]) -> Result<usize, PartialWrite> {
        for (written, point) in points.iter().enumerate() {
            if let Err(error) = self.write(point).await {
                return Err(PartialWrite { written, error });
            }
        }
        Ok(points.len())
    }

    fn base(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    fn write_url(&self) -> String {
        format!("{}/api/v2/write", self.base())
    }
}

/// Builder for InfluxSink.
#[derive(Debug, Default)]
pub struct InfluxSinkBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    org: Option<String>,
    bucket: Option<String>,
    timeout: Option<Duration>,
}

impl InfluxSinkBuilder {
    /// Set the server endpoint (e.g., "http://localhost:8086").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the organization.
    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// Set the bucket.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the sink. Org and bucket are required.
    pub fn build(self) -> Result<InfluxSink, AdapterError> {
        let org = self
            .org
            .ok_or_else(|| AdapterError::Config("missing org".to_string()))?;
        let bucket = self
            .bucket
            .ok_or_else(|| AdapterError::Config("missing bucket".to_string()))?;
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Config(e.to_string()))?;

        Ok(InfluxSink {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:8086".to_string()),
            token: self.token.unwrap_or_default(),
            org,
            bucket,
        })
    }
}
