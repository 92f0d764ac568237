//! Structural inference stages.
//!
//! Each stage is a struct holding its tuning knobs and compiled keyword
//! tables, with a single entry method taking the parsed [`DocumentModel`]:
//! - [`StructureClassifier`] - layout regions and page layout type
//! - [`ComponentDetector`] - recurring component patterns
//! - [`InteractiveElementScanner`] - buttons, inputs, dropdowns
//! - [`extract_meta`] - document metadata and AJAX endpoint hints
//!
//! All heuristics are ordered tables; priority is significant and documented
//! on each table.
//!
//! [`DocumentModel`]: crate::dom::DocumentModel

mod components;
mod interactive;
mod meta;
mod structure;


pub use components::ComponentDetector;
pub use interactive::InteractiveElementScanner;
pub use meta::extract_meta;
pub use structure::{CssHints, StructureClassifier};
