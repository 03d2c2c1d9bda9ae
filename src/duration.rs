//! `--timeout` parsing.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use regex::Regex;

static TIMEOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*(ms|s|m)?$").unwrap());

/// Parse an HTTP timeout such as "10s", "2.5s", "500ms", "1m" or a bare
/// number of seconds.
///
/// A zero timeout would fail every request, so it is rejected.
pub fn parse_timeout(s: &str) -> Result<Duration> {
    let s = s.trim();
    let Some(caps) = TIMEOUT.captures(s) else {
        bail!("Expected a number with an optional ms, s or m unit: {}", s);
    };

    let amount: f64 = caps[1].parse().with_context(|| format!("Bad number in {}", s))?;
    let secs = match caps.get(2).map(|m| m.as_str()) {
        Some("ms") => amount / 1_000.0,
        Some("m") => amount * 60.0,
        _ => amount,
    };

    let timeout = Duration::try_from_secs_f64(secs)
        .with_context(|| format!("Timeout out of range: {}", s))?;
    if timeout.is_zero() {
        bail!("Timeout must be greater than zero: {}", s);
    }
    Ok(timeout)
}
