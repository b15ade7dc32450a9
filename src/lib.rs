//! In-memory ontology reasoning over classes, instances and their relations.
//!
//! A corpus of `is_a`, `part_of`, `has_property` and `instance_of` facts is
//! validated once and then queried through [`ontology::Reasoner`]:
//!
//! ```
//! use ontology_reasoner::{boot, config::Settings, ontology::ReasoningQuery};
//!
//! let reasoner = boot::create_reasoner(&Settings::default())?;
//! assert!(reasoner.is_a_transitive("dog", "entity")?);
//! assert!(reasoner.connected_names("собака", "шерсть")?);
//! # Ok::<(), ontology_reasoner::Error>(())
//! ```

pub mod boot;
pub mod config;
mod errors;
pub mod logger;
pub mod ontology;

pub use errors::{Error, Result};
