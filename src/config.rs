use crate::error::ConfigError;
use crate::limit::Limit;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{fs, io::ErrorKind, path::Path};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Web UI login settings (`[login]`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Login {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Upload caps in MB/s keyed by registrable domain (`[upload_limit]`).
///
/// Keys are lowercased on load, so they can be compared directly with the
/// output of [`top_domain`](crate::top_domain). Keys that only differ in case
/// collapse into one entry holding the smallest cap.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, f64>")]
pub struct LimitTable(BTreeMap<String, f64>);

impl From<BTreeMap<String, f64>> for LimitTable {
    fn from(raw: BTreeMap<String, f64>) -> Self {
        let mut table = BTreeMap::new();
        for (domain, mb) in raw {
            table
                .entry(normalize(&domain))
                .and_modify(|cap: &mut f64| *cap = cap.min(mb))
                .or_insert(mb);
        }
        LimitTable(table)
    }
}

fn normalize(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_lowercase()
}

impl LimitTable {
    /// Configured cap for `domain`, if any
    pub fn get(&self, domain: &str) -> Option<Limit> {
        self.0.get(domain).copied().map(Limit::new)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.0.contains_key(domain)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Limit)> {
        self.0.iter().map(|(d, mb)| (d.as_str(), Limit::new(*mb)))
    }

    fn validate(&self) -> Result<(), String> {
        for (domain, limit) in self.iter() {
            if domain.is_empty() {
                return Err("empty domain in [upload_limit]".to_string());
            }
            if !limit.megabytes().is_finite() || limit.bytes() < 1 {
                return Err(format!(
                    "upload limit for `{}` must be a positive number of MB/s, got {}",
                    domain,
                    limit.megabytes()
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub login: Login,
    #[serde(default)]
    pub upload_limit: LimitTable,
}

impl Config {
    /// Load configuration from a file.
    ///
    /// The file is read as UTF-8 and falls back to GBK when it is not valid
    /// UTF-8.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.to_owned()),
            _ => ConfigError::Io(path.to_owned(), e),
        })?;

        let text = decode(&contents).ok_or_else(|| ConfigError::Encoding(path.to_owned()))?;
        let config: Config =
            toml::from_str(&text).map_err(|e| ConfigError::Decode(path.to_owned(), e))?;
        config
            .validate()
            .map_err(|reason| ConfigError::Invalid(path.to_owned(), reason))?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.login.port == 0 {
            return Err("port must be between 1 and 65535".to_string());
        }
        self.upload_limit.validate()
    }
}

fn decode(bytes: &[u8]) -> Option<String> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Some(s.to_string());
    }
    debug!("Configuration is not valid UTF-8, retrying as GBK");
    let (text, _, had_errors) = encoding_rs::GBK.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}
