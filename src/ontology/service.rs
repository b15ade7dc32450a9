use std::{collections::BTreeMap, sync::Arc};

use tracing::{debug, info};

use super::{
    aliases::AliasResolver,
    closure::ClosureEngine,
    connectivity::{ConnectivityIndex, PathStep},
    corpus::{Corpus, CorpusSource},
    entities::{FactStore, OntologyError, QueryError, Relation},
    part_whole::PartWholeReasoner,
    repositories::{CorpusProfile, OntologySummary, ReasoningQuery},
    value_objects::Token,
};
use crate::config::ReasonerSettings;

/// Read-only query facade over a validated ontology.
///
/// Every component is built at load time and shared behind an [`Arc`], so a
/// `Reasoner` is cheap to clone and safe to query from many threads.
#[derive(Clone)]
pub struct Reasoner {
    store: Arc<FactStore>,
    aliases: Arc<AliasResolver>,
    closures: Arc<ClosureEngine>,
    part_whole: Arc<PartWholeReasoner>,
    connectivity: Arc<ConnectivityIndex>,
}

impl Reasoner {
    /// Validates `corpus` and builds every index.
    pub fn load(corpus: &Corpus, settings: &ReasonerSettings) -> Result<Self, OntologyError> {
        let store = Arc::new(FactStore::from_corpus(corpus)?);
        let aliases = Arc::new(AliasResolver::build(&store, &corpus.aliases)?);
        let closures = Arc::new(ClosureEngine::new(Arc::clone(&store), &settings.cache));
        let part_whole = Arc::new(PartWholeReasoner::new(
            Arc::clone(&store),
            Arc::clone(&closures),
        ));
        let connectivity = Arc::new(ConnectivityIndex::build(
            &store,
            &closures,
            &part_whole,
            &settings.connectivity,
        ));

        info!(
            classes = store.class_count(),
            instances = store.instance_count(),
            aliases = aliases.len(),
            edges = connectivity.edge_count(),
            "ontology_loaded"
        );

        Ok(Self {
            store,
            aliases,
            closures,
            part_whole,
            connectivity,
        })
    }

    /// Loads the corpus from `source` and builds the reasoner.
    pub fn from_source(
        source: &dyn CorpusSource,
        settings: &ReasonerSettings,
    ) -> crate::Result<Self> {
        let corpus = source.load()?;
        Ok(Self::load(&corpus, settings)?)
    }

    #[must_use]
    pub fn store(&self) -> &FactStore {
        &self.store
    }

    #[must_use]
    pub fn aliases(&self) -> &AliasResolver {
        &self.aliases
    }

    #[must_use]
    pub fn connectivity(&self) -> &ConnectivityIndex {
        &self.connectivity
    }

    fn entity(&self, token: &str) -> Result<&Token, QueryError> {
        self.store.entity(token)
    }

    /// Checks reachability along a relation given by name, one or more steps.
    pub fn is_ancestor(
        &self,
        relation: &str,
        node: &str,
        ancestor: &str,
    ) -> Result<bool, QueryError> {
        self.closures.is_ancestor_by_name(relation, node, ancestor)
    }

    /// Resolves both names and returns the shortest path between them.
    pub fn path_names(&self, from: &str, to: &str) -> Result<Option<Vec<PathStep>>, QueryError> {
        let (from, to) = self.aliases.resolve_pair(from, to)?;
        Ok(self.connectivity.path(&from, &to))
    }

    /// Transitive closure along a relation given by name, sorted.
    pub fn transitive_closure(&self, relation: &str, root: &str) -> Result<Vec<Token>, QueryError> {
        let closure = self.closures.transitive_closure_by_name(relation, root)?;
        Ok(closure.iter().cloned().collect())
    }

    /// Direct class of an instance, `None` for classes.
    pub fn class_of(&self, token: &str) -> Result<Option<Token>, QueryError> {
        let token = self.entity(token)?;
        Ok(self.store.class_of(token.as_str()).cloned())
    }

    /// Direct instances of a class, sorted.
    pub fn instances_of(&self, class: &str) -> Result<Vec<Token>, QueryError> {
        let class = self.entity(class)?;
        Ok(self.store.instances_of(class).iter().cloned().collect())
    }

    /// Every whole `part` is transitively a part of, sorted.
    pub fn wholes_of(&self, part: &str) -> Result<Vec<Token>, QueryError> {
        let part = self.entity(part)?;
        Ok(self.part_whole.wholes_of(part).into_iter().collect())
    }

    /// Every part `whole` transitively has, sorted.
    pub fn parts_of(&self, whole: &str) -> Result<Vec<Token>, QueryError> {
        let whole = self.entity(whole)?;
        Ok(self.part_whole.parts_of(whole).into_iter().collect())
    }

    /// Number of levels of the `is_a` tree under `root`, the root alone being
    /// one level. Instances have no subtree and report zero.
    pub fn hierarchy_depth(&self, root: &str) -> Result<usize, QueryError> {
        let root = self.entity(root)?;
        if !self.store.is_class(root.as_str()) {
            return Ok(0);
        }
        Ok(self.depth_below(root, &mut BTreeMap::new()))
    }

    fn depth_below<'a>(&'a self, class: &'a Token, memo: &mut BTreeMap<&'a Token, usize>) -> usize {
        if let Some(depth) = memo.get(class) {
            return *depth;
        }
        let mut deepest = 0;
        for child in self.store.predecessors(Relation::IsA, class) {
            deepest = deepest.max(self.depth_below(child, memo));
        }
        memo.insert(class, deepest + 1);
        deepest + 1
    }

    /// Counts of classes, instances, facts and aliases.
    #[must_use]
    pub fn summary(&self) -> OntologySummary {
        let canonical = self.store.class_count() + self.store.instance_count();
        OntologySummary::new(&self.store, self.aliases.len().saturating_sub(canonical))
    }

    /// Reports the size and depth of the subtree under `root`, and its leaf
    /// classes with fewer than `min_instances` direct instances.
    pub fn profile(&self, root: &str, min_instances: usize) -> Result<CorpusProfile, QueryError> {
        let depth = self.hierarchy_depth(root)?;
        let root = self.entity(root)?.clone();
        let mut subtree: Vec<Token> = Vec::new();
        if self.store.is_class(root.as_str()) {
            subtree.push(root.clone());
            subtree.extend(self.closures.descendants(&root).iter().cloned());
        }

        let underpopulated: Vec<Token> = subtree
            .iter()
            .filter(|class| self.store.predecessors(Relation::IsA, class).is_empty())
            .filter(|class| self.store.instances_of(class).len() < min_instances)
            .cloned()
            .collect();

        debug!(
            %root,
            classes = subtree.len(),
            depth,
            underpopulated = underpopulated.len(),
            "corpus_profiled"
        );

        Ok(CorpusProfile {
            root,
            class_count: subtree.len(),
            depth,
            underpopulated,
        })
    }
}

impl ReasoningQuery for Reasoner {
    type Error = QueryError;

    fn resolve(&self, name: &str) -> Result<Token, Self::Error> {
        self.aliases.resolve(name)
    }

    fn is_a_transitive(&self, child: &str, ancestor: &str) -> Result<bool, Self::Error> {
        self.closures.is_ancestor(Relation::IsA, child, ancestor)
    }

    fn part_of_transitive(&self, part: &str, whole: &str) -> Result<bool, Self::Error> {
        let part = self.entity(part)?;
        let whole = self.entity(whole)?;
        Ok(self.part_whole.part_of_transitive(part, whole))
    }

    fn has_part(&self, whole: &str, part: &str) -> Result<bool, Self::Error> {
        let whole = self.entity(whole)?;
        let part = self.entity(part)?;
        Ok(self.part_whole.has_part(whole, part))
    }

    fn has_part_transitive(&self, whole: &str, part: &str) -> Result<bool, Self::Error> {
        let whole = self.entity(whole)?;
        let part = self.entity(part)?;
        Ok(self.part_whole.has_part_transitive(whole, part))
    }

    fn connected(&self, from: &str, to: &str) -> Result<bool, Self::Error> {
        let from = self.entity(from)?;
        let to = self.entity(to)?;
        Ok(self.connectivity.connected(from, to))
    }

    fn connected_names(&self, from: &str, to: &str) -> Result<bool, Self::Error> {
        let (from, to) = self.aliases.resolve_pair(from, to)?;
        Ok(self.connectivity.connected(&from, &to))
    }

    fn ancestors(&self, class: &str) -> Result<Vec<Token>, Self::Error> {
        let class = self.entity(class)?;
        Ok(self.closures.ancestors(class).iter().cloned().collect())
    }

    fn descendants(&self, class: &str) -> Result<Vec<Token>, Self::Error> {
        let class = self.entity(class)?;
        Ok(self.closures.descendants(class).iter().cloned().collect())
    }

    fn path(&self, from: &str, to: &str) -> Result<Option<Vec<PathStep>>, Self::Error> {
        let from = self.entity(from)?;
        let to = self.entity(to)?;
        Ok(self.connectivity.path(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::Reasoner;
    use crate::config::ReasonerSettings;
    use crate::ontology::corpus::Corpus;
    use crate::ontology::entities::{OntologyError, QueryError};
    use crate::ontology::repositories::ReasoningQuery;
    use crate::ontology::value_objects::Token;

    fn token(text: &str) -> Token {
        Token::new(text).expect("valid token")
    }

    const PETS: &str = r"
classes: [animal, mammal, dog, cat, bird, tail]
is_a:
  - [mammal, animal]
  - [dog, mammal]
  - [cat, mammal]
  - [bird, animal]
part_of:
  - [tail, mammal]
instance_of:
  - [rex, dog]
  - [bim, dog]
  - [murka, cat]
aliases:
  dog: [собака]
  tail: [хвіст]
";

    fn reasoner() -> Reasoner {
        let corpus = Corpus::from_yaml_str(PETS).expect("corpus");
        Reasoner::load(&corpus, &ReasonerSettings::default()).expect("reasoner")
    }

    #[test]
    fn answers_predicates_over_tokens() {
        let reasoner = reasoner();
        assert_eq!(reasoner.is_a_transitive("dog", "animal"), Ok(true));
        assert_eq!(reasoner.part_of_transitive("tail", "dog"), Ok(true));
        assert_eq!(reasoner.has_part("mammal", "tail"), Ok(true));
        assert_eq!(reasoner.has_part("dog", "tail"), Ok(false));
        assert_eq!(reasoner.has_part_transitive("rex", "tail"), Ok(true));
        assert_eq!(reasoner.connected("bird", "tail"), Ok(true));
    }

    #[test]
    fn unknown_tokens_are_reported() {
        let reasoner = reasoner();
        assert_eq!(
            reasoner.connected("dog", "unicorn"),
            Err(QueryError::UnknownEntity {
                token: "unicorn".into()
            })
        );
        assert_eq!(
            reasoner.connected_names("собака", "єдиноріг"),
            Err(QueryError::UnknownAlias {
                names: vec!["єдиноріг".into()]
            })
        );
    }

    #[test]
    fn resolves_names_before_connecting() {
        let reasoner = reasoner();
        assert_eq!(reasoner.resolve("собака"), Ok(token("dog")));
        assert_eq!(reasoner.connected_names("собака", "хвіст"), Ok(true));
        let path = reasoner
            .path_names("собака", "хвіст")
            .expect("known names")
            .expect("connected");
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn lists_hierarchy_and_membership() {
        let reasoner = reasoner();
        assert_eq!(
            reasoner.ancestors("dog"),
            Ok(vec![token("animal"), token("mammal")])
        );
        assert_eq!(
            reasoner.descendants("mammal"),
            Ok(vec![token("cat"), token("dog")])
        );
        assert_eq!(reasoner.class_of("rex"), Ok(Some(token("dog"))));
        assert_eq!(reasoner.class_of("dog"), Ok(None));
        assert_eq!(
            reasoner.instances_of("dog"),
            Ok(vec![token("bim"), token("rex")])
        );
        assert_eq!(
            reasoner.parts_of("cat"),
            Ok(vec![token("tail")])
        );
        assert_eq!(
            reasoner.transitive_closure("is_a", "cat"),
            Ok(vec![token("animal"), token("mammal")])
        );
    }

    #[test]
    fn exposes_alias_table_and_connectivity_index() {
        let reasoner = reasoner();
        assert_eq!(reasoner.aliases().aliases_of(&token("dog")), vec!["собака"]);
        assert_eq!(reasoner.aliases().len(), 11);
        assert_eq!(reasoner.connectivity().node_count(), 9);
        assert!(reasoner
            .connectivity()
            .connected(&token("murka"), &token("tail")));
    }

    #[test]
    fn ancestor_checks_take_relation_names() {
        let reasoner = reasoner();
        assert_eq!(reasoner.is_ancestor("is_a", "cat", "animal"), Ok(true));
        assert_eq!(reasoner.is_ancestor("part_of", "tail", "animal"), Ok(false));
        assert_eq!(
            reasoner.is_ancestor("likes", "cat", "animal"),
            Err(QueryError::UnknownRelation {
                name: "likes".into()
            })
        );
    }

    #[test]
    fn measures_hierarchy_depth() {
        let reasoner = reasoner();
        assert_eq!(reasoner.hierarchy_depth("animal"), Ok(3));
        assert_eq!(reasoner.hierarchy_depth("dog"), Ok(1));
        assert_eq!(reasoner.hierarchy_depth("rex"), Ok(0));
    }

    #[test]
    fn profile_lists_underpopulated_leaves() {
        let reasoner = reasoner();
        let profile = reasoner.profile("animal", 2).expect("profile");
        assert_eq!(profile.class_count, 5);
        assert_eq!(profile.depth, 3);
        assert_eq!(profile.underpopulated, vec![token("bird"), token("cat")]);
    }

    #[test]
    fn summary_excludes_self_aliases() {
        let summary = reasoner().summary();
        assert_eq!(summary.class_count, 6);
        assert_eq!(summary.instance_count, 3);
        assert_eq!(summary.alias_count, 2);
    }

    #[test]
    fn inconsistent_corpus_is_rejected() {
        let corpus = Corpus::from_yaml_str("classes: [a, b]\nis_a:\n  - [a, b]\n  - [b, a]\n")
            .expect("corpus");
        assert!(matches!(
            Reasoner::load(&corpus, &ReasonerSettings::default()),
            Err(OntologyError::IsACycle { .. })
        ));
    }
}
