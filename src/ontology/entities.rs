use std::collections::{btree_set, BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::corpus::Corpus;
use super::value_objects::Token;

static EMPTY: BTreeSet<Token> = BTreeSet::new();

/// Kinds of facts held by the [`FactStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// `child is_a parent`, class to superclass.
    IsA,
    /// `part part_of whole`, class to class.
    PartOf,
    /// `subject has_property property`.
    HasProperty,
    /// `instance instance_of class`.
    InstanceOf,
}

impl Relation {
    /// Every relation kind, in declaration order.
    pub const ALL: [Self; 4] = [Self::IsA, Self::PartOf, Self::HasProperty, Self::InstanceOf];

    /// Returns the name used in corpus files and relation lookups.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsA => "is_a",
            Self::PartOf => "part_of",
            Self::HasProperty => "has_property",
            Self::InstanceOf => "instance_of",
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|relation| relation.as_str() == s.trim())
            .ok_or_else(|| QueryError::UnknownRelation { name: s.to_owned() })
    }
}

/// Orientation used when walking a directed relation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// From the source of a fact to its target.
    Forward,
    /// From the target of a fact back to its source.
    Backward,
}

/// Successor and predecessor tables for a single relation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RelationIndex {
    successors: BTreeMap<Token, BTreeSet<Token>>,
    predecessors: BTreeMap<Token, BTreeSet<Token>>,
    len: usize,
}

impl RelationIndex {
    fn insert(&mut self, source: &Token, target: &Token) {
        let added = self
            .successors
            .entry(source.clone())
            .or_default()
            .insert(target.clone());
        if added {
            self.predecessors
                .entry(target.clone())
                .or_default()
                .insert(source.clone());
            self.len += 1;
        }
    }

    fn successors_of(&self, token: &Token) -> &BTreeSet<Token> {
        self.successors.get(token).unwrap_or(&EMPTY)
    }

    fn predecessors_of(&self, token: &Token) -> &BTreeSet<Token> {
        self.predecessors.get(token).unwrap_or(&EMPTY)
    }
}

/// Immutable, indexed tables of every fact in a loaded corpus.
///
/// The store is built once by [`FactStore::from_corpus`], which rejects
/// inconsistent input, and exposes no mutation afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactStore {
    classes: BTreeSet<Token>,
    instances: BTreeMap<Token, Token>,
    is_a: RelationIndex,
    part_of: RelationIndex,
    has_property: RelationIndex,
    instance_of: RelationIndex,
}

impl FactStore {
    /// Validates a corpus and builds the relation indexes.
    pub fn from_corpus(corpus: &Corpus) -> Result<Self, OntologyError> {
        let mut store = Self {
            classes: corpus.classes.clone(),
            instances: BTreeMap::new(),
            is_a: RelationIndex::default(),
            part_of: RelationIndex::default(),
            has_property: RelationIndex::default(),
            instance_of: RelationIndex::default(),
        };

        for (instance, class) in &corpus.instance_of {
            if store.classes.contains(instance) {
                return Err(OntologyError::ClassInstanceOverlap {
                    token: instance.clone(),
                });
            }
            if !store.classes.contains(class) {
                return Err(OntologyError::DanglingReference {
                    relation: Relation::InstanceOf,
                    token: class.clone(),
                });
            }
            match store.instances.get(instance) {
                Some(existing) if existing != class => {
                    return Err(OntologyError::MultipleClasses {
                        instance: instance.clone(),
                        first: existing.clone(),
                        second: class.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    store.instances.insert(instance.clone(), class.clone());
                    store.instance_of.insert(instance, class);
                }
            }
        }

        for (child, parent) in &corpus.is_a {
            store.require_class(Relation::IsA, child)?;
            store.require_class(Relation::IsA, parent)?;
            store.is_a.insert(child, parent);
        }

        for (part, whole) in &corpus.part_of {
            store.require_class(Relation::PartOf, part)?;
            store.require_class(Relation::PartOf, whole)?;
            store.part_of.insert(part, whole);
        }

        for (subject, property) in &corpus.has_property {
            store.require_entity(Relation::HasProperty, subject)?;
            store.require_entity(Relation::HasProperty, property)?;
            store.has_property.insert(subject, property);
        }

        if let Some(cycle) = find_cycle(&store.is_a) {
            return Err(OntologyError::IsACycle { cycle });
        }

        debug!(
            classes = store.classes.len(),
            instances = store.instances.len(),
            is_a = store.is_a.len,
            part_of = store.part_of.len,
            has_property = store.has_property.len,
            "fact_store_indexed"
        );

        Ok(store)
    }

    fn require_class(&self, relation: Relation, token: &Token) -> Result<(), OntologyError> {
        if self.classes.contains(token) {
            Ok(())
        } else {
            Err(OntologyError::DanglingReference {
                relation,
                token: token.clone(),
            })
        }
    }

    fn require_entity(&self, relation: Relation, token: &Token) -> Result<(), OntologyError> {
        if self.contains(token.as_str()) {
            Ok(())
        } else {
            Err(OntologyError::DanglingReference {
                relation,
                token: token.clone(),
            })
        }
    }

    fn index(&self, relation: Relation) -> &RelationIndex {
        match relation {
            Relation::IsA => &self.is_a,
            Relation::PartOf => &self.part_of,
            Relation::HasProperty => &self.has_property,
            Relation::InstanceOf => &self.instance_of,
        }
    }

    /// Returns the direct targets of facts `(token, _)` of the given relation.
    #[must_use]
    pub fn successors(&self, relation: Relation, token: &Token) -> &BTreeSet<Token> {
        self.index(relation).successors_of(token)
    }

    /// Returns the direct sources of facts `(_, token)` of the given relation.
    #[must_use]
    pub fn predecessors(&self, relation: Relation, token: &Token) -> &BTreeSet<Token> {
        self.index(relation).predecessors_of(token)
    }

    /// Returns successors or predecessors depending on `direction`.
    #[must_use]
    pub fn neighbors(
        &self,
        relation: Relation,
        direction: Direction,
        token: &Token,
    ) -> &BTreeSet<Token> {
        match direction {
            Direction::Forward => self.successors(relation, token),
            Direction::Backward => self.predecessors(relation, token),
        }
    }

    /// Checks whether a direct fact `(source, target)` exists.
    #[must_use]
    pub fn holds(&self, relation: Relation, source: &Token, target: &Token) -> bool {
        self.successors(relation, source).contains(target)
    }

    /// Iterates over every fact of a relation in lexical order.
    pub fn facts(&self, relation: Relation) -> impl Iterator<Item = (&Token, &Token)> + '_ {
        self.index(relation)
            .successors
            .iter()
            .flat_map(|(source, targets)| targets.iter().map(move |target| (source, target)))
    }

    /// Returns the number of distinct facts stored for a relation.
    #[must_use]
    pub fn fact_count(&self, relation: Relation) -> usize {
        self.index(relation).len
    }

    #[must_use]
    pub fn is_class(&self, token: &str) -> bool {
        self.classes.contains(token)
    }

    #[must_use]
    pub fn is_instance(&self, token: &str) -> bool {
        self.instances.contains_key(token)
    }

    /// Checks whether the token names a class or an instance.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.is_class(token) || self.is_instance(token)
    }

    /// Looks up the stored token for a canonical identifier.
    pub fn entity(&self, token: &str) -> Result<&Token, QueryError> {
        self.classes
            .get(token)
            .or_else(|| self.instances.get_key_value(token).map(|(key, _)| key))
            .ok_or_else(|| QueryError::UnknownEntity {
                token: token.to_owned(),
            })
    }

    /// Returns the direct class of an instance.
    #[must_use]
    pub fn class_of(&self, instance: &str) -> Option<&Token> {
        self.instances.get(instance)
    }

    /// Returns the direct instances of a class.
    #[must_use]
    pub fn instances_of(&self, class: &Token) -> &BTreeSet<Token> {
        self.predecessors(Relation::InstanceOf, class)
    }

    pub fn classes(&self) -> btree_set::Iter<'_, Token> {
        self.classes.iter()
    }

    pub fn instances(&self) -> impl Iterator<Item = &Token> + '_ {
        self.instances.keys()
    }

    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

/// Depth-first search for a cycle, returning its path with the first node repeated.
fn find_cycle(index: &RelationIndex) -> Option<Vec<Token>> {
    #[derive(Copy, Clone, PartialEq, Eq)]
    enum Mark {
        Active,
        Done,
    }

    let mut marks: BTreeMap<&Token, Mark> = BTreeMap::new();

    for root in index.successors.keys() {
        if marks.contains_key(root) {
            continue;
        }
        marks.insert(root, Mark::Active);
        let mut path: Vec<&Token> = vec![root];
        let mut stack = vec![index.successors_of(root).iter()];

        loop {
            let Some(children) = stack.last_mut() else {
                break;
            };
            match children.next() {
                Some(child) => match marks.get(child).copied() {
                    Some(Mark::Active) => {
                        let start = path.iter().position(|node| *node == child).unwrap_or(0);
                        let mut cycle: Vec<Token> =
                            path[start..].iter().map(|node| (*node).clone()).collect();
                        cycle.push(child.clone());
                        return Some(cycle);
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(child, Mark::Active);
                        path.push(child);
                        stack.push(index.successors_of(child).iter());
                    }
                },
                None => {
                    stack.pop();
                    if let Some(finished) = path.pop() {
                        marks.insert(finished, Mark::Done);
                    }
                }
            }
        }
    }

    None
}

fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn quote_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load-time errors describing an inconsistent corpus.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OntologyError {
    /// The `is_a` facts contain a cycle.
    #[error("inconsistent ontology: cycle in IsA ({})", join_tokens(.cycle))]
    IsACycle { cycle: Vec<Token> },
    /// A fact referenced a token that is not declared where the relation requires it.
    #[error("inconsistent ontology: `{relation}` fact references undeclared `{token}`")]
    DanglingReference { relation: Relation, token: Token },
    /// An instance was assigned to two different classes.
    #[error("inconsistent ontology: instance `{instance}` belongs to both `{first}` and `{second}`")]
    MultipleClasses {
        instance: Token,
        first: Token,
        second: Token,
    },
    /// A token was declared both as a class and as an instance.
    #[error("inconsistent ontology: `{token}` is declared as a class and as an instance")]
    ClassInstanceOverlap { token: Token },
    /// An alias targets a token that is neither a class nor an instance.
    #[error("inconsistent ontology: alias table references unknown `{token}`")]
    DanglingAlias { token: Token },
    /// An alias name was blank after trimming.
    #[error("inconsistent ontology: blank alias declared for `{token}`")]
    BlankAlias { token: Token },
    /// The same alias name was claimed by two tokens.
    #[error("inconsistent ontology: alias `{name}` maps to both `{first}` and `{second}`")]
    AliasConflict {
        name: String,
        first: Token,
        second: Token,
    },
}

/// Errors reported by queries against a loaded ontology.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// One or more names did not resolve through the alias table.
    #[error("unknown alias: {}", quote_names(.names))]
    UnknownAlias { names: Vec<String> },
    /// A canonical token is not part of the fact store.
    #[error("unknown entity `{token}`")]
    UnknownEntity { token: String },
    /// A relation name did not match any relation kind.
    #[error("unknown relation `{name}`")]
    UnknownRelation { name: String },
}
