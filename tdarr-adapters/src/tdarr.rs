//! Tdarr adapter using the `cruddb` HTTP API.
//!
//! Tdarr keeps its server-wide statistics as a single document in the
//! `StatisticsJSONDB` collection. This adapter asks for that collection with
//! `mode = getAll` and returns the first document of the response array.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tdarr_adapters::tdarr::TdarrAdapter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = TdarrAdapter::builder()
//!         .endpoint("http://tdarr.local:8265")
//!         .build()?;
//!
//!     let document = adapter.collect().await?;
//!     for (key, value) in &document {
//!         println!("{key}: {value}");
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use tdarr_types::STATISTICS_DOC_ID;

use crate::{AdapterError, StatisticsDocument};

const STATISTICS_COLLECTION: &str = "StatisticsJSONDB";

/// Tdarr adapter for fetching the statistics document.
#[derive(Debug, Clone)]
pub struct TdarrAdapter {
    client: Client,
    endpoint: String,
}

impl TdarrAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> TdarrAdapterBuilder {
        TdarrAdapterBuilder::default()
    }

    /// The base URL of the Tdarr server.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the statistics document.
    pub async fn collect(&self) -> Result<StatisticsDocument, AdapterError> {
        let url = self.cruddb_url();

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&CrudRequest::statistics())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdapterError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        parse_statistics_response(&body)
    }

    fn cruddb_url(&self) -> String {
        format!("{}/api/v2/cruddb", self.endpoint.trim_end_matches('/'))
    }
}

/// Builder for TdarrAdapter.
#[derive(Debug, Default)]
pub struct TdarrAdapterBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl TdarrAdapterBuilder {
    /// Set the server endpoint (e.g., "http://localhost:8265").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<TdarrAdapter, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Config(e.to_string()))?;

        Ok(TdarrAdapter {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:8265".to_string()),
        })
    }
}

/// Request body for the `cruddb` endpoint.
#[derive(Debug, Serialize)]
struct CrudRequest {
    data: CrudData,
}

#[derive(Debug, Serialize)]
struct CrudData {
    collection: &'static str,
    mode: &'static str,
    #[serde(rename = "docID")]
    doc_id: &'static str,
}

impl CrudRequest {
    fn statistics() -> Self {
        Self {
            data: CrudData {
                collection: STATISTICS_COLLECTION,
                mode: "getAll",
                doc_id: STATISTICS_DOC_ID,
            },
        }
    }
}

/// Decode a `cruddb` response body and pick out the statistics document.
///
/// The response is a JSON array; only element 0 is used and it must be an
/// object.
pub fn parse_statistics_response(body: &[u8]) -> Result<StatisticsDocument, AdapterError> {
    let documents: Vec<Value> =
        serde_json::from_slice(body).map_err(|e| AdapterError::Parse(e.to_string()))?;

    match documents.into_iter().next() {
        Some(Value::Object(document)) => Ok(document),
        Some(other) => Err(AdapterError::Parse(format!(
            "expected statistics object, got {}",
            json_kind(&other)
        ))),
        None => Err(AdapterError::EmptyResponse),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
