//! Ontology fact store and the reasoners built on top of it.
//!
//! A [`Corpus`] is validated into an immutable [`FactStore`]. The closure
//! engine, the part-whole reasoner and the connectivity index derive
//! relations from it, and [`Reasoner`] exposes them through
//! [`ReasoningQuery`] with display names resolved by the [`AliasResolver`].

pub mod aliases;
pub mod closure;
pub mod connectivity;
pub mod corpus;
pub mod entities;
pub mod part_whole;
pub mod repositories;
pub mod service;
pub mod value_objects;

pub use aliases::AliasResolver;
pub use closure::{Closure, ClosureEngine};
pub use connectivity::{ConnectivityIndex, EdgeKind, PathStep};
pub use corpus::{BuiltinCorpus, Corpus, CorpusFormat, CorpusSource, SeedFiles};
pub use entities::{Direction, FactStore, OntologyError, QueryError, Relation};
pub use part_whole::PartWholeReasoner;
pub use repositories::{CorpusProfile, OntologySummary, ReasoningQuery};
pub use service::Reasoner;
pub use value_objects::{Token, TokenError};
