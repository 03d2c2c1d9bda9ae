//! One collection run: fetch, transform, write.
//!
//! A fetch failure aborts the run before anything is transformed, and a
//! failed connection check or write aborts the rest of the batch.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use tdarr_adapters::influx::InfluxSink;
use tdarr_adapters::tdarr::{parse_statistics_response, TdarrAdapter};
use tdarr_adapters::StatisticsDocument;
use tdarr_types::MeasurementPoint;

use crate::config::Settings;
use crate::transform::transform;

/// How a run gets its input and where its output goes.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Read a saved cruddb response instead of querying Tdarr.
    pub input: Option<PathBuf>,
    /// Print line protocol instead of writing to InfluxDB.
    pub dry_run: bool,
    /// Timeout for each HTTP request.
    pub timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input: None,
            dry_run: false,
            timeout: Duration::from_secs(10),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Points produced by the transform.
    pub points: usize,
    /// Points written to InfluxDB (or printed, for a dry run).
    pub written: usize,
}

/// Execute one run. Dry-run output goes to `out`.
pub async fn run<W: Write>(
    settings: &Settings,
    options: &RunOptions,
    out: &mut W,
) -> Result<RunSummary> {
    let started = Instant::now();

    let document = match &options.input {
        Some(path) => load_document(path)?,
        None => fetch_document(settings, options.timeout).await?,
    };
    debug!(keys = document.len(), "Loaded statistics document");

    let points = transform(&document);
    info!(points = points.len(), "Transformed statistics");

    let written = if options.dry_run {
        print_points(&points, out)?
    } else {
        write_points(settings, options.timeout, &points).await?
    };

    info!(
        written,
        elapsed = ?started.elapsed(),
        "Run complete"
    );

    Ok(RunSummary {
        points: points.len(),
        written,
    })
}

async fn fetch_document(settings: &Settings, timeout: Duration) -> Result<StatisticsDocument> {
    let endpoint = settings.tdarr.base_url();
    let adapter = TdarrAdapter::builder()
        .endpoint(endpoint.as_str())
        .timeout(timeout)
        .build()?;

    info!(endpoint = %endpoint, "Fetching Tdarr statistics");
    adapter
        .collect()
        .await
        .with_context(|| format!("Failed to fetch statistics from {}", endpoint))
}

/// Read a saved response: either the cruddb array or a bare document object.
pub fn load_document(path: &Path) -> Result<StatisticsDocument> {
    let body = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let parsed: Value = serde_json::from_slice(&body)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    match parsed {
        Value::Object(document) => Ok(document),
        _ => parse_statistics_response(&body)
            .with_context(|| format!("No statistics document in {}", path.display())),
    }
}

async fn write_points(
    settings: &Settings,
    timeout: Duration,
    points: &[MeasurementPoint],
) -> Result<usize> {
    let influx = &settings.influx;
    let sink = InfluxSink::builder()
        .endpoint(influx.base_url())
        .token(influx.token.as_str())
        .org(influx.org.as_str())
        .bucket(influx.bucket.as_str())
        .timeout(timeout)
        .build()?;

    sink.health()
        .await
        .with_context(|| format!("InfluxDB at {} is not available", influx.base_url()))?;

    info!(
        bucket = sink.bucket(),
        org = sink.org(),
        points = points.len(),
        "Writing points"
    );
    let written = sink
        .write_all(points)
        .await
        .context("Failed to write points to InfluxDB")?;
    Ok(written)
}

fn print_points<W: Write>(points: &[MeasurementPoint], out: &mut W) -> Result<usize> {
    for point in points {
        writeln!(out, "{}", point.to_line_protocol())?;
    }
    out.flush()?;
    Ok(points.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InfluxSettings, TdarrSettings};
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = include_str!("../tests/fixtures/statistics.json");

    fn settings(tdarr_port: u16) -> Settings {
        Settings {
            tdarr: TdarrSettings {
                proto: "http".to_string(),
                hostname: "127.0.0.1".to_string(),
                port: tdarr_port,
            },
            influx: InfluxSettings {
                proto: "http".to_string(),
                hostname: "127.0.0.1".to_string(),
                port: 1,
                bucket: "tdarr".to_string(),
                org: "home".to_string(),
                token: "token".to_string(),
            },
        }
    }

    fn input_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_load_document_array() {
        let file = input_file(FIXTURE);
        let document = load_document(file.path()).unwrap();
        assert_eq!(document["_id"], "statistics");
    }

    #[test]
    fn test_load_document_bare_object() {
        let file = input_file(r#"{"_id":"statistics","DBQueue":1}"#);
        let document = load_document(file.path()).unwrap();
        assert_eq!(document.len(), 2);
    }

    #[test]
    fn test_load_document_errors() {
        let err = load_document(Path::new("/nonexistent/statistics.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));

        let file = input_file("[]");
        assert!(load_document(file.path()).is_err());

        let file = input_file("not json");
        let err = load_document(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[tokio::test]
    async fn test_dry_run_prints_line_protocol() {
        let file = input_file(FIXTURE);
        let options = RunOptions {
            input: Some(file.path().to_path_buf()),
            dry_run: true,
            ..Default::default()
        };

        let mut out = Vec::new();
        let summary = run(&settings(1), &options, &mut out).await.unwrap();

        assert_eq!(summary, RunSummary { points: 55, written: 55 });

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 55);
        assert_eq!(lines[0], "tdarr,statistics=totalFileCount value=1520");
        assert_eq!(
            lines[16],
            "tdarr,statistics=FileCount,library_name=All,library_id=all value=1520"
        );
        assert!(output.contains(
            "tdarr,statistics=Transcode_Status,library_name=All,library_id=all,Status=Success value=329"
        ));
        assert!(output.contains("library_name=TV\\ Shows"));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_run() {
        // Nothing listens on port 1
        let options = RunOptions {
            dry_run: true,
            timeout: Duration::from_secs(2),
            ..Default::default()
        };

        let mut out = Vec::new();
        let err = run(&settings(1), &options, &mut out).await.unwrap_err();

        assert!(err.to_string().contains("Failed to fetch statistics"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_influx_aborts_run() {
        let file = input_file(FIXTURE);
        let options = RunOptions {
            input: Some(file.path().to_path_buf()),
            timeout: Duration::from_secs(2),
            ..Default::default()
        };

        let mut out = Vec::new();
        let err = run(&settings(1), &options, &mut out).await.unwrap_err();
        assert!(err.to_string().contains("InfluxDB at http://127.0.0.1:1"));
    }
}
