use std::collections::BTreeMap;

use tracing::debug;

use super::entities::{FactStore, OntologyError, QueryError};
use super::value_objects::Token;

/// Maps display names in any language to canonical tokens.
///
/// Every class and instance of the store resolves to itself, so callers may
/// pass either a raw name or a canonical token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasResolver {
    table: BTreeMap<String, Token>,
}

impl AliasResolver {
    /// Builds the alias table, rejecting names that point to unknown tokens or
    /// to more than one token.
    pub fn build(
        store: &FactStore,
        aliases: &BTreeMap<Token, Vec<String>>,
    ) -> Result<Self, OntologyError> {
        let mut resolver = Self::default();

        for token in store.classes().chain(store.instances()) {
            resolver.table.insert(token.as_str().to_owned(), token.clone());
        }

        for (token, names) in aliases {
            let Ok(target) = store.entity(token.as_str()) else {
                return Err(OntologyError::DanglingAlias {
                    token: token.clone(),
                });
            };
            for name in names {
                resolver.insert(name, target)?;
            }
        }

        debug!(aliases = resolver.table.len(), "alias_table_built");
        Ok(resolver)
    }

    fn insert(&mut self, name: &str, target: &Token) -> Result<(), OntologyError> {
        let key = name.trim();
        if key.is_empty() {
            return Err(OntologyError::BlankAlias {
                token: target.clone(),
            });
        }
        match self.table.get(key) {
            Some(existing) if existing != target => Err(OntologyError::AliasConflict {
                name: key.to_owned(),
                first: existing.clone(),
                second: target.clone(),
            }),
            Some(_) => Ok(()),
            None => {
                self.table.insert(key.to_owned(), target.clone());
                Ok(())
            }
        }
    }

    /// Resolves a name to its canonical token. Surrounding whitespace is ignored.
    pub fn resolve(&self, name: &str) -> Result<Token, QueryError> {
        self.table
            .get(name.trim())
            .cloned()
            .ok_or_else(|| QueryError::UnknownAlias {
                names: vec![name.to_owned()],
            })
    }

    /// Resolves two names, reporting every name that failed.
    pub fn resolve_pair(&self, first: &str, second: &str) -> Result<(Token, Token), QueryError> {
        match (self.resolve(first), self.resolve(second)) {
            (Ok(first), Ok(second)) => Ok((first, second)),
            (first, second) => {
                let names = [first, second]
                    .into_iter()
                    .filter_map(Result::err)
                    .flat_map(|err| match err {
                        QueryError::UnknownAlias { names } => names,
                        _ => Vec::new(),
                    })
                    .collect();
                Err(QueryError::UnknownAlias { names })
            }
        }
    }

    /// Returns the names that resolve to `token`, excluding the token itself.
    #[must_use]
    pub fn aliases_of(&self, token: &Token) -> Vec<&str> {
        self.table
            .iter()
            .filter(|(name, target)| *target == token && name.as_str() != token.as_str())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Number of resolvable names, self-aliases included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
