//! Keyed sub-objects: `streamStats` and `languages`.

use serde_json::Value;
use tracing::warn;

use super::scalar::number;
use super::tables::{LANGUAGES_KEY, STREAM_STATS_KEY};
use super::Emitter;

/// `{statistic: {range: number}}`, one point per (statistic, range).
pub(super) fn decode_stream_stats(value: &Value, out: &mut Emitter<'_>) {
    let Some(stats) = value.as_object() else {
        warn!("Skipping streamStats: not an object");
        return;
    };

    for (statistic, ranges) in stats {
        let Some(ranges) = ranges.as_object() else {
            warn!(statistic = %statistic, "Skipping stream statistic: not an object");
            continue;
        };

        for (range, value) in ranges {
            let Some(v) = numeric(value) else {
                warn!(statistic = %statistic, range = %range, "Skipping non-numeric stream statistic");
                continue;
            };
            let tags = out
                .tags(STREAM_STATS_KEY)
                .with("statistic", statistic.as_str())
                .with("range", range.as_str());
            out.emit(tags, v);
        }
    }
}

/// `{language: {count: number, ...}}`, one point per language.
pub(super) fn decode_languages(value: &Value, out: &mut Emitter<'_>) {
    let Some(languages) = value.as_object() else {
        warn!("Skipping languages: not an object");
        return;
    };

    for (language, info) in languages {
        let Some(count) = info.get("count").and_then(numeric) else {
            warn!(language = %language, "Skipping language without numeric count");
            continue;
        };
        let tags = out
            .tags(LANGUAGES_KEY)
            .with("language", language.as_str());
        out.emit(tags, count);
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => number(n).ok(),
        _ => None,
    }
}
