use std::sync::OnceLock;

use insta::{assert_debug_snapshot, assert_snapshot};
use ontology_reasoner::{
    config::{ConnectivitySettings, ReasonerSettings},
    ontology::{Corpus, QueryError, Reasoner, ReasoningQuery, Relation, Token},
};
use rstest::rstest;

fn zoology() -> &'static Reasoner {
    static REASONER: OnceLock<Reasoner> = OnceLock::new();
    REASONER.get_or_init(|| {
        let corpus = Corpus::zoology().expect("embedded corpus");
        Reasoner::load(&corpus, &ReasonerSettings::default()).expect("consistent corpus")
    })
}

fn classes() -> Vec<Token> {
    zoology().store().classes().cloned().collect()
}

fn token(text: &str) -> Token {
    Token::new(text).expect("valid token")
}

#[rstest]
#[case("собака", "dog")]
#[case("пес", "dog")]
#[case("dog", "dog")]
#[case(" горобець ", "sparrow")]
#[case("шерсть", "fur")]
#[case("rex", "rex")]
fn resolves_display_names(#[case] name: &str, #[case] expected: &str) {
    assert_eq!(zoology().resolve(name), Ok(token(expected)));
}

#[test]
fn unknown_name_is_reported() {
    assert_eq!(
        zoology().resolve("невідоме_слово"),
        Err(QueryError::UnknownAlias {
            names: vec!["невідоме_слово".into()]
        })
    );
}

#[rstest]
#[case("dog", "entity", true)]
#[case("dog", "mammal", true)]
#[case("canine", "animal", true)]
#[case("mammal", "animal", true)]
#[case("dog", "dog", false)]
#[case("mammal", "dog", false)]
#[case("oak", "animal", false)]
fn subclass_queries(#[case] child: &str, #[case] ancestor: &str, #[case] expected: bool) {
    assert_eq!(zoology().is_a_transitive(child, ancestor), Ok(expected));
}

#[rstest]
#[case("eye", "vertebrate", true)]
#[case("tail", "dog", true)]
#[case("fur", "dog", true)]
#[case("eye", "sparrow", true)]
#[case("feather", "eagle", true)]
#[case("tail", "rex", true)]
#[case("tail", "bird", false)]
#[case("vertebrate", "eye", false)]
fn part_of_queries(#[case] part: &str, #[case] whole: &str, #[case] expected: bool) {
    assert_eq!(zoology().part_of_transitive(part, whole), Ok(expected));
}

#[rstest]
#[case("bird", "wing", true)]
#[case("vertebrate", "eye", true)]
#[case("dog", "tail", true)]
#[case("rex", "fur", true)]
#[case("fish", "fur", false)]
fn has_part_transitive_queries(#[case] whole: &str, #[case] part: &str, #[case] expected: bool) {
    assert_eq!(zoology().has_part_transitive(whole, part), Ok(expected));
}

#[rstest]
#[case("горобець", "перо")]
#[case("собака", "шерсть")]
#[case("змія", "луска")]
#[case("дуб", "кіт")]
fn connects_display_names(#[case] from: &str, #[case] to: &str) {
    assert_eq!(zoology().connected_names(from, to), Ok(true));
}

#[test]
fn connected_names_reports_both_unknown_names() {
    let err = zoology()
        .connected_names("єдиноріг", "дракон")
        .expect_err("unknown names");
    assert_eq!(err.to_string(), "unknown alias: `єдиноріг`, `дракон`");
}

#[test]
fn connected_rejects_unknown_tokens() {
    assert_eq!(
        zoology().connected("dog", "unicorn"),
        Err(QueryError::UnknownEntity {
            token: "unicorn".into()
        })
    );
}

#[test]
fn is_a_transitive_is_transitive() {
    let reasoner = zoology();
    let classes = classes();
    for x in &classes {
        for y in &classes {
            if !reasoner.is_a_transitive(x.as_str(), y.as_str()).expect("known") {
                continue;
            }
            for z in &classes {
                if reasoner.is_a_transitive(y.as_str(), z.as_str()).expect("known") {
                    assert!(
                        reasoner.is_a_transitive(x.as_str(), z.as_str()).expect("known"),
                        "{x} is_a {y} is_a {z}"
                    );
                }
            }
        }
    }
}

#[test]
fn is_a_transitive_is_irreflexive() {
    for class in classes() {
        assert_eq!(
            zoology().is_a_transitive(class.as_str(), class.as_str()),
            Ok(false),
            "{class}"
        );
    }
}

#[test]
fn every_entity_is_connected_to_itself() {
    let reasoner = zoology();
    for token in reasoner.store().classes().chain(reasoner.store().instances()) {
        assert_eq!(reasoner.connected(token.as_str(), token.as_str()), Ok(true));
    }
}

#[test]
fn has_part_mirrors_direct_part_of_facts() {
    let reasoner = zoology();
    let classes = classes();
    for whole in &classes {
        for part in &classes {
            assert_eq!(
                reasoner.has_part(whole.as_str(), part.as_str()),
                Ok(reasoner.store().holds(Relation::PartOf, part, whole)),
                "has_part({whole}, {part})"
            );
        }
    }
}

#[test]
fn repeated_queries_are_idempotent() {
    let reasoner = zoology();
    let first = reasoner.ancestors("dog").expect("ancestors");
    let second = reasoner.ancestors("dog").expect("ancestors");
    assert_eq!(first, second);
    assert_eq!(
        reasoner.wholes_of("eye").expect("wholes"),
        reasoner.wholes_of("eye").expect("wholes")
    );
    assert_eq!(
        reasoner.connected_names("собака", "шерсть"),
        reasoner.connected_names("собака", "шерсть")
    );
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn reasoner_is_shared_across_threads() {
    assert_send_sync::<Reasoner>();

    let reasoner = zoology().clone();
    let answers: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let reasoner = reasoner.clone();
                scope.spawn(move || {
                    (
                        reasoner.part_of_transitive("tail", "dog"),
                        reasoner.connected_names("горобець", "перо"),
                        reasoner.is_a_transitive("dog", "entity"),
                    )
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("worker thread"))
            .collect()
    });

    assert_eq!(answers.len(), 8);
    for answer in answers {
        assert_eq!(answer, (Ok(true), Ok(true), Ok(true)));
    }
}

#[test]
fn ancestors_of_dog() {
    let ancestors: Vec<String> = zoology()
        .ancestors("dog")
        .expect("ancestors")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        ancestors,
        vec![
            "animal",
            "canine",
            "entity",
            "mammal",
            "organism",
            "physical_object",
            "vertebrate"
        ]
    );
}

#[test]
fn direct_path_from_instance_to_property() {
    let settings = ReasonerSettings {
        connectivity: ConnectivitySettings {
            traverse_closures: false,
            ..ConnectivitySettings::default()
        },
        ..ReasonerSettings::default()
    };
    let corpus = Corpus::zoology().expect("embedded corpus");
    let reasoner = Reasoner::load(&corpus, &settings).expect("consistent corpus");

    let path = reasoner
        .path_names("rex", "шерсть")
        .expect("known names")
        .expect("connected");
    let rendered = path
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!(rendered, @r"
    rex -[instance_of]-> dog
    dog -[is_a]-> canine
    canine -[is_a]-> mammal
    mammal <-[part_of]- fur
    ");
}

#[test]
fn closure_edges_give_single_step_paths() {
    let path = zoology()
        .path_names("горобець", "перо")
        .expect("known names")
        .expect("connected");
    assert_eq!(path.len(), 1);
    assert_eq!(path[0].to_string(), "sparrow <-[part_of_transitive]- feather");
}

#[test]
fn summary_of_builtin_corpus() {
    assert_debug_snapshot!(zoology().summary(), @r"
    OntologySummary {
        class_count: 42,
        instance_count: 30,
        is_a_count: 41,
        part_of_count: 11,
        has_property_count: 4,
        instance_of_count: 30,
        alias_count: 32,
    }
    ");
}

#[rstest]
#[case("entity", 8)]
#[case("animal", 5)]
#[case("body_part", 3)]
#[case("dog", 1)]
fn hierarchy_depth(#[case] root: &str, #[case] expected: usize) {
    assert_eq!(zoology().hierarchy_depth(root), Ok(expected));
}

#[test]
fn animal_profile_flags_classes_without_instances() {
    let profile = zoology().profile("animal", 2).expect("profile");
    assert_eq!(profile.class_count, 24);
    assert_eq!(profile.depth, 5);
    assert_eq!(profile.underpopulated, vec![token("amphibian")]);
}
