use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt::{self, Display, Formatter},
};

use serde::Serialize;
use tracing::debug;

use super::closure::ClosureEngine;
use super::entities::{Direction, FactStore, Relation};
use super::part_whole::PartWholeReasoner;
use super::value_objects::Token;
use crate::config::ConnectivitySettings;

/// Edge families of the undirected connectivity index.
///
/// The declaration order is the preference order when two families link the
/// same pair: direct facts win over derived ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    IsA,
    PartOf,
    HasProperty,
    InstanceOf,
    IsATransitive,
    PartOfTransitive,
    HasPartTransitive,
}

impl EdgeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsA => "is_a",
            Self::PartOf => "part_of",
            Self::HasProperty => "has_property",
            Self::InstanceOf => "instance_of",
            Self::IsATransitive => "is_a_transitive",
            Self::PartOfTransitive => "part_of_transitive",
            Self::HasPartTransitive => "has_part_transitive",
        }
    }
}

impl From<Relation> for EdgeKind {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::IsA => Self::IsA,
            Relation::PartOf => Self::PartOf,
            Relation::HasProperty => Self::HasProperty,
            Relation::InstanceOf => Self::InstanceOf,
        }
    }
}

impl Display for EdgeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Link {
    kind: EdgeKind,
    direction: Direction,
}

/// One hop of a connectivity path.
///
/// `direction` tells whether the underlying fact reads `from -> to`
/// ([`Direction::Forward`]) or `to -> from` ([`Direction::Backward`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathStep {
    pub from: Token,
    pub relation: EdgeKind,
    pub to: Token,
    pub direction: Direction,
}

impl Display for PathStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Forward => write!(f, "{} -[{}]-> {}", self.from, self.relation, self.to),
            Direction::Backward => write!(f, "{} <-[{}]- {}", self.from, self.relation, self.to),
        }
    }
}

/// Static undirected adjacency over every entity of the store.
#[derive(Clone, Debug, Default)]
pub struct ConnectivityIndex {
    adjacency: BTreeMap<Token, BTreeMap<Token, Link>>,
    edges: usize,
}

impl ConnectivityIndex {
    /// Builds the index in one pass over direct facts and derived closures.
    #[must_use]
    pub fn build(
        store: &FactStore,
        closures: &ClosureEngine,
        part_whole: &PartWholeReasoner,
        settings: &ConnectivitySettings,
    ) -> Self {
        let mut index = Self::default();
        for token in store.classes().chain(store.instances()) {
            index.adjacency.entry(token.clone()).or_default();
        }

        for relation in Relation::ALL {
            let included = match relation {
                Relation::IsA | Relation::PartOf => true,
                Relation::HasProperty => settings.traverse_has_property,
                Relation::InstanceOf => settings.traverse_instance_of,
            };
            if !included {
                continue;
            }
            for (source, target) in store.facts(relation) {
                index.link(source, target, relation.into());
            }
        }

        if settings.traverse_closures {
            for class in store.classes() {
                for ancestor in closures.ancestors(class).iter() {
                    index.link(class, ancestor, EdgeKind::IsATransitive);
                }
            }

            let roots: Vec<&Token> = if settings.traverse_instance_of {
                store.classes().chain(store.instances()).collect()
            } else {
                store.classes().collect()
            };
            for root in roots {
                for whole in part_whole.wholes_of(root) {
                    index.link(root, &whole, EdgeKind::PartOfTransitive);
                }
                for part in part_whole.parts_of(root) {
                    index.link(root, &part, EdgeKind::HasPartTransitive);
                }
            }
        }

        debug!(
            nodes = index.adjacency.len(),
            edges = index.edges,
            "connectivity_index_built"
        );
        index
    }

    fn link(&mut self, source: &Token, target: &Token, kind: EdgeKind) {
        if source == target {
            return;
        }
        let forward = Link {
            kind,
            direction: Direction::Forward,
        };
        let backward = Link {
            kind,
            direction: Direction::Backward,
        };
        if self.insert(source, target, forward) {
            self.edges += 1;
        }
        self.insert(target, source, backward);
    }

    /// Inserts a half-edge, keeping the preferred kind. Returns true for a new pair.
    fn insert(&mut self, from: &Token, to: &Token, link: Link) -> bool {
        let neighbors = self.adjacency.entry(from.clone()).or_default();
        match neighbors.get(to).map(|existing| existing.kind) {
            Some(kind) => {
                if link.kind < kind {
                    neighbors.insert(to.clone(), link);
                }
                false
            }
            None => {
                neighbors.insert(to.clone(), link);
                true
            }
        }
    }

    /// Neighbours of `token` across every included edge family.
    pub fn neighbors<'a>(&'a self, token: &Token) -> impl Iterator<Item = &'a Token> + 'a {
        self.adjacency
            .get(token)
            .into_iter()
            .flat_map(BTreeMap::keys)
    }

    /// Depth-first reachability. Every node is connected to itself.
    #[must_use]
    pub fn connected(&self, from: &Token, to: &Token) -> bool {
        if from == to {
            return true;
        }
        let mut visited: BTreeSet<&Token> = BTreeSet::from([from]);
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            for next in self.neighbors(current) {
                if next == to {
                    return true;
                }
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Breadth-first shortest path. An empty path connects a node to itself.
    #[must_use]
    pub fn path(&self, from: &Token, to: &Token) -> Option<Vec<PathStep>> {
        if from == to {
            return Some(Vec::new());
        }
        let mut previous: BTreeMap<&Token, (&Token, Link)> = BTreeMap::new();
        let mut visited: BTreeSet<&Token> = BTreeSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            let Some(neighbors) = self.adjacency.get(current) else {
                continue;
            };
            for (next, link) in neighbors {
                if !visited.insert(next) {
                    continue;
                }
                previous.insert(next, (current, *link));
                if next == to {
                    return Some(Self::unwind(&previous, from, next));
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn unwind(
        previous: &BTreeMap<&Token, (&Token, Link)>,
        from: &Token,
        to: &Token,
    ) -> Vec<PathStep> {
        let mut steps = Vec::new();
        let mut cursor = to;
        while cursor != from {
            let Some((prior, link)) = previous.get(cursor) else {
                break;
            };
            steps.push(PathStep {
                from: (*prior).clone(),
                relation: link.kind,
                to: cursor.clone(),
                direction: link.direction,
            });
            cursor = *prior;
        }
        steps.reverse();
        steps
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct undirected pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges
    }
}
