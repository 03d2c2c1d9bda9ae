//! InfluxDB line protocol rendering.
//!
//! A point renders as
//! `measurement[,tag_key=tag_value...] field=value[ timestamp]`.
//! Tags with an empty key or value are dropped since the store rejects them.

use crate::MeasurementPoint;

impl MeasurementPoint {
    /// Render this point as a single line protocol record (no trailing newline).
    pub fn to_line_protocol(&self) -> String {
        let mut line = escape_measurement(&self.measurement);

        for (key, value) in self.tags.iter() {
            if key.is_empty() || value.is_empty() {
                continue;
            }
            line.push(',');
            line.push_str(&escape_tag(key));
            line.push('=');
            line.push_str(&escape_tag(value));
        }

        line.push(' ');
        line.push_str(&escape_tag(&self.field));
        line.push('=');
        line.push_str(&format!("{}", self.value));

        if let Some(ts) = self.timestamp_ns {
            line.push(' ');
            line.push_str(&ts.to_string());
        }

        line
    }
}

/// Escape a measurement name. Commas and spaces must be escaped.
pub fn escape_measurement(s: &str) -> String {
    escape(s, &[',', ' '])
}

/// Escape a tag key, tag value or field key.
/// Commas, equals signs and spaces must be escaped.
pub fn escape_tag(s: &str) -> String {
    escape(s, &[',', '=', ' '])
}

/// Backslashes and control whitespace are escaped everywhere, since a raw
/// newline ends the record and a trailing backslash swallows the separator.
fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
