//! Serialized form of a fact corpus and the loaders that produce it.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::value_objects::Token;
use crate::{Error, Result};

const ZOOLOGY: &str = include_str!("zoology.yaml");

/// Raw facts supplied by a corpus loader.
///
/// Relation facts are `[source, target]` pairs. Aliases are grouped by the
/// canonical token they resolve to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Corpus {
    pub classes: BTreeSet<Token>,
    pub is_a: Vec<(Token, Token)>,
    pub part_of: Vec<(Token, Token)>,
    pub has_property: Vec<(Token, Token)>,
    pub instance_of: Vec<(Token, Token)>,
    pub aliases: BTreeMap<Token, Vec<String>>,
}

impl Corpus {
    /// Parses a corpus from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a corpus from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a corpus from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a corpus file, picking the format from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = CorpusFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| Error::SeedIo {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?format, "corpus_seed_read");
        match format {
            CorpusFormat::Yaml => Self::from_yaml_str(&text),
            CorpusFormat::Json => Self::from_json_str(&text),
            CorpusFormat::Toml => Self::from_toml_str(&text),
        }
    }

    /// Returns the zoology corpus shipped with the crate.
    pub fn zoology() -> Result<Self> {
        Self::from_yaml_str(ZOOLOGY)
    }

    /// Appends every fact and alias of `other`.
    pub fn merge(&mut self, other: Self) {
        self.classes.extend(other.classes);
        self.is_a.extend(other.is_a);
        self.part_of.extend(other.part_of);
        self.has_property.extend(other.has_property);
        self.instance_of.extend(other.instance_of);
        for (token, names) in other.aliases {
            self.aliases.entry(token).or_default().extend(names);
        }
    }
}

/// File formats accepted for corpus seeds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CorpusFormat {
    Yaml,
    Json,
    Toml,
}

impl CorpusFormat {
    /// Detects the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(Error::UnsupportedSeedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Contract for collaborators that supply the fact corpus at startup.
pub trait CorpusSource {
    /// Produces the full corpus to be validated and indexed.
    fn load(&self) -> Result<Corpus>;
}

/// Loads the embedded zoology corpus.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinCorpus;

impl CorpusSource for BuiltinCorpus {
    fn load(&self) -> Result<Corpus> {
        Corpus::zoology()
    }
}

/// Loads and merges a list of seed files in order.
#[derive(Clone, Debug, Default)]
pub struct SeedFiles {
    paths: Vec<PathBuf>,
}

impl SeedFiles {
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl CorpusSource for SeedFiles {
    fn load(&self) -> Result<Corpus> {
        let mut corpus = Corpus::default();
        for path in &self.paths {
            corpus.merge(Corpus::from_path(path)?);
        }
        Ok(corpus)
    }
}
