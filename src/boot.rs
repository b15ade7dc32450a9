//! Startup wiring from [`Settings`] to a ready [`Reasoner`].

use tracing::info;

use crate::config::Settings;
use crate::logger;
use crate::ontology::{BuiltinCorpus, CorpusSource, Reasoner, SeedFiles};
use crate::Result;

/// Initialises logging, loads the configured corpus and builds the reasoner.
///
/// The built-in zoology corpus is used when no seed files are configured.
pub fn create_reasoner(settings: &Settings) -> Result<Reasoner> {
    logger::init(&settings.logger)?;

    let source: Box<dyn CorpusSource> = if settings.corpus.seeds.is_empty() {
        info!("corpus_builtin_selected");
        Box::new(BuiltinCorpus)
    } else {
        info!(seeds = settings.corpus.seeds.len(), "corpus_seeds_selected");
        Box::new(SeedFiles::new(settings.corpus.seeds.clone()))
    };

    Reasoner::from_source(source.as_ref(), &settings.reasoner)
}
