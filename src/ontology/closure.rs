use std::{
    collections::{BTreeSet, VecDeque},
    sync::Arc,
};

use tracing::trace;

use super::entities::{Direction, FactStore, QueryError, Relation};
use super::value_objects::Token;
use crate::config::CacheSettings;

/// Shared, immutable closure result.
pub type Closure = Arc<BTreeSet<Token>>;

type ClosureKey = (Relation, Direction, Token);

/// Computes transitive closures of the store's relations.
///
/// Each closure is a breadth-first fixpoint from one root and is cached per
/// `(relation, direction, root)`. The store never changes, so a cached entry
/// stays valid for the lifetime of the engine.
pub struct ClosureEngine {
    store: Arc<FactStore>,
    #[cfg(feature = "cache_inmem")]
    cache: moka::sync::Cache<ClosureKey, Closure>,
}

impl ClosureEngine {
    #[must_use]
    pub fn new(store: Arc<FactStore>, settings: &CacheSettings) -> Self {
        #[cfg(not(feature = "cache_inmem"))]
        let _ = settings;
        Self {
            store,
            #[cfg(feature = "cache_inmem")]
            cache: moka::sync::Cache::new(settings.max_capacity),
        }
    }

    /// Returns the closure of `root`, which must be part of the store.
    #[must_use]
    pub fn closure(&self, relation: Relation, direction: Direction, root: &Token) -> Closure {
        let key = (relation, direction, root.clone());

        #[cfg(feature = "cache_inmem")]
        {
            self.cache.get_with(key, || self.expand(relation, direction, root))
        }
        #[cfg(not(feature = "cache_inmem"))]
        {
            let _ = key;
            self.expand(relation, direction, root)
        }
    }

    fn expand(&self, relation: Relation, direction: Direction, root: &Token) -> Closure {
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<&Token> = self
            .store
            .neighbors(relation, direction, root)
            .iter()
            .collect();

        while let Some(current) = queue.pop_front() {
            if visited.insert(current.clone()) {
                queue.extend(self.store.neighbors(relation, direction, current));
            }
        }

        trace!(%relation, ?direction, %root, size = visited.len(), "closure_computed");
        Arc::new(visited)
    }

    /// Transitive closure of `root` along `relation`, following facts forward.
    pub fn transitive_closure(
        &self,
        relation: Relation,
        root: &str,
    ) -> Result<Closure, QueryError> {
        let root = self.store.entity(root)?;
        Ok(self.closure(relation, Direction::Forward, root))
    }

    /// Same as [`Self::transitive_closure`] with the relation given by name.
    pub fn transitive_closure_by_name(
        &self,
        relation: &str,
        root: &str,
    ) -> Result<Closure, QueryError> {
        self.transitive_closure(relation.parse()?, root)
    }

    /// Checks whether `ancestor` is reachable from `node` in one or more steps.
    ///
    /// The relation is not reflexive: a node is its own ancestor only when the
    /// relation contains a cycle through it.
    pub fn is_ancestor(
        &self,
        relation: Relation,
        node: &str,
        ancestor: &str,
    ) -> Result<bool, QueryError> {
        let ancestor = self.store.entity(ancestor)?;
        Ok(self.transitive_closure(relation, node)?.contains(ancestor))
    }

    /// Same as [`Self::is_ancestor`] with the relation given by name.
    pub fn is_ancestor_by_name(
        &self,
        relation: &str,
        node: &str,
        ancestor: &str,
    ) -> Result<bool, QueryError> {
        self.is_ancestor(relation.parse::<Relation>()?, node, ancestor)
    }

    /// Superclasses of `class`, transitively.
    #[must_use]
    pub fn ancestors(&self, class: &Token) -> Closure {
        self.closure(Relation::IsA, Direction::Forward, class)
    }

    /// Subclasses of `class`, transitively.
    #[must_use]
    pub fn descendants(&self, class: &Token) -> Closure {
        self.closure(Relation::IsA, Direction::Backward, class)
    }

    #[must_use]
    pub fn store(&self) -> &FactStore {
        &self.store
    }
}
