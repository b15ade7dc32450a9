use std::{
    collections::{BTreeSet, VecDeque},
    sync::Arc,
};

use super::closure::ClosureEngine;
use super::entities::{Direction, FactStore, Relation};
use super::value_objects::Token;

/// Derives part-whole relations from direct `part_of` facts and the subclass
/// closure.
///
/// A token's *lineage* is the token, its superclasses and, for an instance,
/// its class with that class's superclasses. Starting from the lineage of the
/// query root, direct `part_of` edges are followed (forward to reach wholes,
/// backward to reach parts). Every node reached that way is chained from in
/// turn through its own lineage, and the final answer also contains every
/// subclass of a node reached.
///
/// This realises the four rules of both relations:
///
/// * direct facts;
/// * chaining through an intermediate part (or whole);
/// * inheritance on the far side: a part of a class is a part of each of its
///   subclasses;
/// * inheritance on the near side: a subclass of a part is a part wherever the
///   general part is.
pub struct PartWholeReasoner {
    store: Arc<FactStore>,
    closures: Arc<ClosureEngine>,
}

impl PartWholeReasoner {
    #[must_use]
    pub fn new(store: Arc<FactStore>, closures: Arc<ClosureEngine>) -> Self {
        Self { store, closures }
    }

    fn lineage(&self, token: &Token) -> BTreeSet<Token> {
        let mut lineage = BTreeSet::from([token.clone()]);
        lineage.extend(self.closures.ancestors(token).iter().cloned());
        if let Some(class) = self.store.class_of(token.as_str()) {
            lineage.insert(class.clone());
            lineage.extend(self.closures.ancestors(class).iter().cloned());
        }
        lineage
    }

    fn derive(&self, root: &Token, direction: Direction) -> BTreeSet<Token> {
        let mut reached = BTreeSet::new();
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<Token> = self.lineage(root).into_iter().collect();

        while let Some(node) = queue.pop_front() {
            if !visited.insert(node.clone()) {
                continue;
            }
            for next in self.store.neighbors(Relation::PartOf, direction, &node) {
                if reached.insert(next.clone()) {
                    queue.extend(self.lineage(next));
                }
            }
        }

        let mut derived = reached.clone();
        for token in &reached {
            derived.extend(self.closures.descendants(token).iter().cloned());
        }
        derived
    }

    /// Every whole that `part` is transitively a part of.
    #[must_use]
    pub fn wholes_of(&self, part: &Token) -> BTreeSet<Token> {
        self.derive(part, Direction::Forward)
    }

    /// Every part that `whole` transitively has.
    #[must_use]
    pub fn parts_of(&self, whole: &Token) -> BTreeSet<Token> {
        self.derive(whole, Direction::Backward)
    }

    fn contains_lifted(&self, set: &BTreeSet<Token>, token: &Token) -> bool {
        set.contains(token)
            || self
                .store
                .class_of(token.as_str())
                .is_some_and(|class| set.contains(class))
    }

    /// `part_of_transitive(part, whole)`.
    #[must_use]
    pub fn part_of_transitive(&self, part: &Token, whole: &Token) -> bool {
        self.contains_lifted(&self.wholes_of(part), whole)
    }

    /// `has_part(whole, part)`, the exact inverse of a direct `part_of` fact.
    #[must_use]
    pub fn has_part(&self, whole: &Token, part: &Token) -> bool {
        self.store.holds(Relation::PartOf, part, whole)
    }

    /// `has_part_transitive(whole, part)`.
    #[must_use]
    pub fn has_part_transitive(&self, whole: &Token, part: &Token) -> bool {
        self.contains_lifted(&self.parts_of(whole), part)
    }
}
