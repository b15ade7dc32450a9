use serde::Serialize;

use super::connectivity::PathStep;
use super::entities::{FactStore, Relation};
use super::value_objects::Token;

/// Counters describing a loaded ontology.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OntologySummary {
    /// Number of declared classes.
    pub class_count: usize,
    /// Number of instances.
    pub instance_count: usize,
    pub is_a_count: usize,
    pub part_of_count: usize,
    pub has_property_count: usize,
    pub instance_of_count: usize,
    /// Alias names, excluding the self-alias of every canonical token.
    pub alias_count: usize,
}

impl OntologySummary {
    #[must_use]
    pub fn new(store: &FactStore, alias_count: usize) -> Self {
        Self {
            class_count: store.class_count(),
            instance_count: store.instance_count(),
            is_a_count: store.fact_count(Relation::IsA),
            part_of_count: store.fact_count(Relation::PartOf),
            has_property_count: store.fact_count(Relation::HasProperty),
            instance_of_count: store.fact_count(Relation::InstanceOf),
            alias_count,
        }
    }
}

/// Quality report for the subtree of the `is_a` hierarchy under one root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CorpusProfile {
    pub root: Token,
    /// Classes in the subtree, the root included.
    pub class_count: usize,
    /// Levels of the subtree, the root alone counting as one.
    pub depth: usize,
    /// Leaf classes of the subtree with fewer direct instances than requested.
    pub underpopulated: Vec<Token>,
}

/// Reasoning operations over a loaded ontology.
///
/// Entity arguments are canonical tokens, except for [`Self::resolve`] and
/// [`Self::connected_names`], which take display names.
pub trait ReasoningQuery {
    /// Error type reported for unknown names or tokens.
    type Error;

    /// Maps a display name to its canonical token.
    fn resolve(&self, name: &str) -> Result<Token, Self::Error>;

    /// `child` is a strict subclass of `ancestor`.
    fn is_a_transitive(&self, child: &str, ancestor: &str) -> Result<bool, Self::Error>;

    /// `part` is transitively a part of `whole`.
    fn part_of_transitive(&self, part: &str, whole: &str) -> Result<bool, Self::Error>;

    /// A direct `part_of(part, whole)` fact exists.
    fn has_part(&self, whole: &str, part: &str) -> Result<bool, Self::Error>;

    /// `whole` transitively has `part`.
    fn has_part_transitive(&self, whole: &str, part: &str) -> Result<bool, Self::Error>;

    /// Both tokens lie in the same component of the undirected relation graph.
    fn connected(&self, from: &str, to: &str) -> Result<bool, Self::Error>;

    /// Resolves both names and checks [`Self::connected`].
    fn connected_names(&self, from: &str, to: &str) -> Result<bool, Self::Error>;

    /// Superclasses of `class`, sorted.
    fn ancestors(&self, class: &str) -> Result<Vec<Token>, Self::Error>;

    /// Subclasses of `class`, sorted.
    fn descendants(&self, class: &str) -> Result<Vec<Token>, Self::Error>;

    /// Shortest path between two tokens, or `None` when they are not connected.
    fn path(&self, from: &str, to: &str) -> Result<Option<Vec<PathStep>>, Self::Error>;
}
