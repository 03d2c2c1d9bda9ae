//! Fixed lookup tables and key names of the Tdarr statistics document.

/// Key whose value tags every point (never emitted itself).
pub const ID_KEY: &str = "_id";

/// Per-library breakdowns.
pub const PIES_KEY: &str = "pies";

/// Stream statistics, keyed by statistic then range.
pub const STREAM_STATS_KEY: &str = "streamStats";

/// Language counts.
pub const LANGUAGES_KEY: &str = "languages";

/// Database load flag; a string rather than a number.
pub const LOAD_STATUS_KEY: &str = "DBLoadStatus";

/// `DBLoadStatus` value that maps to [`LOAD_STATUS_STABLE`].
pub const LOAD_STATUS_STABLE_TEXT: &str = "Stable";
pub const LOAD_STATUS_STABLE: f64 = 0.0;
/// Any other load status: not stable or unknown.
pub const LOAD_STATUS_UNKNOWN: f64 = 9999.0;

/// Table names for `table<N>Count`, indexed by N.
pub const TABLES: [&str; 7] = [
    "Hold",
    "Transcode_Queue",
    "Transcode_Success",
    "Transcode_Error",
    "Health_Check_Queue",
    "Health_Check_Healthy",
    "Health_Check_Error",
];

/// Numeric summary fields of a library record, in positional order.
pub const SUMMARY_FIELDS: [&str; 4] = ["FileCount", "Transcodes", "Space_Saved", "Num_of_Health_Checks"];

/// Names for the Transcode_Status breakdown entries, indexed by entry position.
pub const TRANSCODE_STATUSES: [&str; 6] = [
    "Not_Required",
    "Queued",
    "Success",
    "Hold",
    "Error",
    "Ignored",
];

/// Keyed breakdowns of a library record, in positional order after the
/// summary fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownKind {
    TranscodeStatus,
    HealthCheckStatus,
    Codec,
    Container,
    Quality,
}

impl BreakdownKind {
    /// All kinds in record order.
    pub const ALL: [BreakdownKind; 5] = [
        BreakdownKind::TranscodeStatus,
        BreakdownKind::HealthCheckStatus,
        BreakdownKind::Codec,
        BreakdownKind::Container,
        BreakdownKind::Quality,
    ];

    /// Tag value identifying the breakdown.
    pub fn field_name(self) -> &'static str {
        match self {
            BreakdownKind::TranscodeStatus => "Transcode_Status",
            BreakdownKind::HealthCheckStatus => "Health_Check_Status",
            BreakdownKind::Codec => "Count_by_Codec",
            BreakdownKind::Container => "Count_by_Container",
            BreakdownKind::Quality => "Count_by_Quality",
        }
    }

    /// Tag key for the per-entry dimension.
    pub fn tag_key(self) -> &'static str {
        match self {
            BreakdownKind::TranscodeStatus | BreakdownKind::HealthCheckStatus => "Status",
            BreakdownKind::Codec => "Codec",
            BreakdownKind::Container => "Container",
            BreakdownKind::Quality => "Quality",
        }
    }

    /// Tag value for the entry at `index` named `name`.
    ///
    /// Transcode statuses are identified by position; the entry names Tdarr
    /// sends are display strings. The label may be empty, in which case the
    /// tag is left off when the point is written.
    pub fn entry_label(self, index: usize, name: &str) -> String {
        if self == BreakdownKind::TranscodeStatus {
            if let Some(status) = TRANSCODE_STATUSES.get(index) {
                return (*status).to_string();
            }
        }
        underscore_whitespace(name)
    }
}

/// Replace every whitespace character with `_`.
pub fn underscore_whitespace(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_status_by_position() {
        let kind = BreakdownKind::TranscodeStatus;
        assert_eq!(kind.entry_label(0, "x"), "Not_Required");
        assert_eq!(kind.entry_label(0, ""), "Not_Required");
        assert_eq!(kind.entry_label(5, "y"), "Ignored");
        // Past the known statuses the entry name is used
        assert_eq!(kind.entry_label(6, "New state"), "New_state");
        assert_eq!(kind.entry_label(7, ""), "");
    }

    #[test]
    fn test_other_breakdowns_use_name() {
        assert_eq!(BreakdownKind::Quality.entry_label(0, "4K UHD"), "4K_UHD");
        assert_eq!(
            BreakdownKind::HealthCheckStatus.entry_label(0, "Success"),
            "Success"
        );
        assert_eq!(BreakdownKind::Codec.entry_label(0, ""), "");
    }

    #[test]
    fn test_tag_keys() {
        let keys: Vec<_> = BreakdownKind::ALL.iter().map(|k| k.tag_key()).collect();
        assert_eq!(keys, vec!["Status", "Status", "Codec", "Container", "Quality"]);
    }

    #[test]
    fn test_underscore_whitespace() {
        assert_eq!(underscore_whitespace("Not required"), "Not_required");
        assert_eq!(underscore_whitespace("a\tb\nc"), "a_b_c");
        assert_eq!(underscore_whitespace("hevc"), "hevc");
    }
}
