use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Value object holding the canonical identifier of a class or an instance.
///
/// Tokens are compared by value. The text is shared, so cloning a token never
/// copies the identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token {
    value: Arc<str>,
}

impl Token {
    /// Validates and constructs a new [`Token`].
    ///
    /// Canonical identifiers must be non-empty and carry no surrounding
    /// whitespace, so that a token read from a corpus and a token typed by a
    /// caller compare equal.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TokenError> {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(TokenError::Empty);
        }
        if value.trim() != value {
            return Err(TokenError::Whitespace {
                value: value.to_owned(),
            });
        }
        Ok(Self {
            value: Arc::from(value),
        })
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Token {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Token {
    type Error = TokenError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::new(text).map_err(serde::de::Error::custom)
    }
}

/// Errors produced when validating a [`Token`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The identifier was an empty string.
    #[error("canonical token must not be empty")]
    Empty,
    /// The identifier had leading or trailing whitespace.
    #[error("canonical token `{value}` has surrounding whitespace")]
    Whitespace { value: String },
}
