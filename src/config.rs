//! Configuration for logging, corpus seeds and the reasoner.
//!
//! Every section has defaults, so an empty document is a valid configuration:
//!
//! ```yaml
//! logger:
//!   enable: true
//!   level: debug
//!   format: json
//! corpus:
//!   seeds:
//!     - data/zoology.yaml
//! reasoner:
//!   cache:
//!     max_capacity: 4096
//!   connectivity:
//!     traverse_instance_of: false
//! ```

use std::{
    fmt::{self, Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logger: LoggerSettings,
    pub corpus: CorpusSettings,
    pub reasoner: ReasonerSettings,
}

impl Settings {
    /// Parses settings from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads settings from a YAML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Installs a global tracing subscriber when true.
    pub enable: bool,
    /// Minimum level for this crate's events.
    pub level: LogLevel,
    /// Output layout.
    pub format: LogFormat,
    /// Full `EnvFilter` directive replacing the level based default.
    pub override_filter: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            enable: false,
            level: LogLevel::Info,
            format: LogFormat::Compact,
            override_filter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Where the fact corpus comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    /// Seed files merged in order. The built-in zoology corpus is used when empty.
    pub seeds: Vec<PathBuf>,
}

/// Reasoner tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerSettings {
    pub cache: CacheSettings,
    pub connectivity: ConnectivitySettings,
}

/// Closure cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of cached closure roots.
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

/// Edge families included in the undirected connectivity index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivitySettings {
    pub traverse_has_property: bool,
    pub traverse_instance_of: bool,
    pub traverse_closures: bool,
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self {
            traverse_has_property: true,
            traverse_instance_of: true,
            traverse_closures: true,
        }
    }
}
