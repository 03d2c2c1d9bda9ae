//! Run settings.
//!
//! Settings come from an INI file with two sections, layered with
//! environment overrides:
//!
//! ```ini
//! [Tdarr]
//! proto = http
//! hostname = 192.168.1.20
//! port = 8265
//!
//! [Influx]
//! proto = http
//! hostname = 192.168.1.30
//! port = 8086
//! bucket = tdarr
//! org = home
//! token = my-influx-token
//! ```
//!
//! Any key can be overridden with `TDARR_INFLUX_<SECTION>__<KEY>`, for
//! example `TDARR_INFLUX_INFLUX__TOKEN`. Section and key names are matched
//! case-insensitively.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use config::{Config, Environment, File, FileFormat, Source};
use thiserror::Error;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TDARR_INFLUX";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The config file could not be read or parsed.
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    /// A whole section is absent.
    #[error("Missing [{0}] section")]
    MissingSection(&'static str),

    /// A required key is absent from its section.
    #[error("Missing key '{key}' in [{section}]")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    /// A port is not a valid TCP port number.
    #[error("Invalid port '{value}' in [{section}]")]
    InvalidPort { section: &'static str, value: String },
}

/// Complete settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tdarr: TdarrSettings,
    pub influx: InfluxSettings,
}

/// Location of the Tdarr server.
#[derive(Debug, Clone, PartialEq)]
pub struct TdarrSettings {
    pub proto: String,
    pub hostname: String,
    pub port: u16,
}

/// Location and credentials of the InfluxDB v2 server.
#[derive(Clone, PartialEq)]
pub struct InfluxSettings {
    pub proto: String,
    pub hostname: String,
    pub port: u16,
    pub bucket: String,
    pub org: String,
    pub token: String,
}

impl Settings {
    /// Load settings from an INI file plus environment overrides.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        Self::load_with(path, environment())
    }

    fn load_with(path: &Path, env: Environment) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini))
            .add_source(env)
            .build()?;

        Self::from_config(&config)
    }

    fn from_config(config: &Config) -> Result<Self, SettingsError> {
        let sections = normalize(config)?;

        let tdarr = Section::find(&sections, "Tdarr")?;
        let influx = Section::find(&sections, "Influx")?;

        Ok(Settings {
            tdarr: TdarrSettings {
                proto: tdarr.optional("proto").unwrap_or_else(|| "http".to_string()),
                hostname: tdarr.required("hostname")?,
                port: tdarr.port()?,
            },
            influx: InfluxSettings {
                proto: influx.optional("proto").unwrap_or_else(|| "http".to_string()),
                hostname: influx.required("hostname")?,
                port: influx.port()?,
                bucket: influx.required("bucket")?,
                org: influx.required("org")?,
                token: influx.required("token")?,
            },
        })
    }
}

impl TdarrSettings {
    /// `proto://hostname:port`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.proto, self.hostname, self.port)
    }
}

impl InfluxSettings {
    /// `proto://hostname:port`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.proto, self.hostname, self.port)
    }
}

impl fmt::Debug for InfluxSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfluxSettings")
            .field("proto", &self.proto)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("bucket", &self.bucket)
            .field("org", &self.org)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Fold every table in the config into lowercase section/key names.
///
/// Raw keys are visited in sorted order, so a lowercase key (as produced by
/// the environment source) is applied after a capitalized one from the file.
fn normalize(config: &Config) -> Result<Sections, SettingsError> {
    let raw: BTreeMap<String, config::Value> = config.collect()?.into_iter().collect();

    let mut sections = Sections::new();
    for (name, value) in raw {
        let Ok(table) = value.into_table() else {
            continue;
        };
        let section = sections.entry(name.to_lowercase()).or_default();
        let entries: BTreeMap<String, config::Value> = table.into_iter().collect();
        for (key, value) in entries {
            section.insert(key.to_lowercase(), value.into_string()?);
        }
    }
    Ok(sections)
}

struct Section<'a> {
    name: &'static str,
    values: &'a BTreeMap<String, String>,
}

impl<'a> Section<'a> {
    fn find(sections: &'a Sections, name: &'static str) -> Result<Self, SettingsError> {
        sections
            .get(&name.to_lowercase())
            .map(|values| Section { name, values })
            .ok_or(SettingsError::MissingSection(name))
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, SettingsError> {
        self.optional(key).ok_or(SettingsError::MissingKey {
            section: self.name,
            key,
        })
    }

    fn port(&self) -> Result<u16, SettingsError> {
        let value = self.required("port")?;
        value.parse().map_err(|_| SettingsError::InvalidPort {
            section: self.name,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_ini() -> &'static str {
        "[Tdarr]\n\
         proto = http\n\
         hostname = 192.168.1.20\n\
         port = 8265\n\
         \n\
         [Influx]\n\
         proto = https\n\
         hostname = influx.local\n\
         port = 8086\n\
         bucket = tdarr\n\
         org = home\n\
         token = secret\n"
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_load_ini() {
        let file = write_config(sample_ini());
        let settings = Settings::load(file.path()).unwrap();

        assert_eq!(settings.tdarr.hostname, "192.168.1.20");
        assert_eq!(settings.tdarr.port, 8265);
        assert_eq!(settings.tdarr.base_url(), "http://192.168.1.20:8265");

        assert_eq!(settings.influx.base_url(), "https://influx.local:8086");
        assert_eq!(settings.influx.bucket, "tdarr");
        assert_eq!(settings.influx.org, "home");
        assert_eq!(settings.influx.token, "secret");
    }

    #[test]
    fn test_proto_defaults_to_http() {
        let file = write_config(
            "[Tdarr]\nhostname = tdarr\nport = 8265\n\
             [Influx]\nhostname = influx\nport = 8086\nbucket = b\norg = o\ntoken = t\n",
        );
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.tdarr.proto, "http");
        assert_eq!(settings.influx.proto, "http");
    }

    #[test]
    fn test_missing_section() {
        let file = write_config("[Tdarr]\nhostname = tdarr\nport = 8265\n");
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::MissingSection("Influx")));
    }

    #[test]
    fn test_missing_key() {
        let file = write_config(
            "[Tdarr]\nhostname = tdarr\nport = 8265\n\
             [Influx]\nhostname = influx\nport = 8086\nbucket = b\norg = o\n",
        );
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::MissingKey {
                section: "Influx",
                key: "token"
            }
        ));
    }

    #[test]
    fn test_invalid_port() {
        let file = write_config(
            "[Tdarr]\nhostname = tdarr\nport = eighty\n\
             [Influx]\nhostname = influx\nport = 8086\nbucket = b\norg = o\ntoken = t\n",
        );
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidPort { section: "Tdarr", .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/tdarr_influxdb.conf")).unwrap_err();
        assert!(matches!(err, SettingsError::Load(_)));
    }

    fn load_with_vars(file: &NamedTempFile, vars: &[(&str, &str)]) -> Settings {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::load_with(file.path(), environment().source(Some(vars))).unwrap()
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config(sample_ini());
        let settings = load_with_vars(
            &file,
            &[
                ("TDARR_INFLUX_INFLUX__TOKEN", "from-env"),
                ("TDARR_INFLUX_TDARR__PORT", "9000"),
                ("UNRELATED_INFLUX__TOKEN", "ignored"),
            ],
        );

        assert_eq!(settings.influx.token, "from-env");
        assert_eq!(settings.tdarr.port, 9000);
        // Untouched keys still come from the capitalised file sections
        assert_eq!(settings.influx.org, "home");
        assert_eq!(settings.tdarr.hostname, "192.168.1.20");
    }

    #[test]
    fn test_env_fills_missing_key() {
        let file = write_config(
            "[Tdarr]\nhostname = tdarr\nport = 8265\n\
             [Influx]\nhostname = influx\nport = 8086\nbucket = b\norg = o\n",
        );
        let settings = load_with_vars(&file, &[("TDARR_INFLUX_INFLUX__TOKEN", "t")]);
        assert_eq!(settings.influx.token, "t");
    }

    #[test]
    fn test_debug_redacts_token() {
        let file = write_config(sample_ini());
        let settings = Settings::load(file.path()).unwrap();
        let debug = format!("{:?}", settings.influx);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
