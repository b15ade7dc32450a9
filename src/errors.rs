//! Crate-level error type.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::ontology::{OntologyError, QueryError};

#[derive(Debug, Error)]
pub enum Error {
    /// The corpus failed validation.
    #[error(transparent)]
    InconsistentCorpus(#[from] OntologyError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("cannot read seed file `{}`", .path.display())]
    SeedIo { path: PathBuf, source: io::Error },

    #[error("cannot read configuration file `{}`", .path.display())]
    ConfigIo { path: PathBuf, source: io::Error },

    /// The seed file extension is not one of `yaml`, `yml`, `json` or `toml`.
    #[error("unsupported seed format for `{}`", .path.display())]
    UnsupportedSeedFormat { path: PathBuf },

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("invalid log filter `{directive}`")]
    LogFilter {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
