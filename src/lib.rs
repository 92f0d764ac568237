//! Pagesift Library
//!
//! A library for inferring the structure and style of a web page from its
//! HTML and CSS: layout regions, recurring components, interactive elements,
//! page metadata, classified style rules, and a color/font palette.
//!
//! # Module Overview
//!
//! - [`dom`] - Lenient HTML parsing into an owned element tree
//! - [`analysis`] - Structural inference stages (layout, components, interactive, meta)
//! - [`style`] - CSS rule classification and palette extraction
//! - [`pipeline`] - End-to-end analysis over fetched page content
//! - [`fetch`] - Page and stylesheet retrieval
//! - [`config`] - Tuning knobs for the heuristics
//! - [`diagnostics`] - Recovered-problem reporting
//! - [`output`] - Versioned report payloads and renderers
//! - [`types`] - Core data types and structures
//!
//! # Example
//!
//! ```no_run
//! use pagesift_lib::{analyze_page, AnalyzerConfig, Diagnostics, Fetcher, SiteReport};
//!
//! # async fn example() -> pagesift_lib::Result<()> {
//! let mut diag = Diagnostics::new();
//! let fetcher = Fetcher::new()?;
//! let page = fetcher.fetch_page("https://example.com", &mut diag).await?;
//!
//! let analysis = analyze_page(&page, &AnalyzerConfig::default(), &mut diag)?;
//! let report = SiteReport::new("https://example.com", analysis, &diag);
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod diagnostics;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod style;
pub mod types;

pub use analysis::{
    extract_meta, ComponentDetector, CssHints, InteractiveElementScanner, StructureClassifier,
};
pub use config::AnalyzerConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use dom::{DocumentModel, Element, Node};
pub use error::{ErrorCategory, PagesiftError, Result};
pub use fetch::Fetcher;
pub use output::{SiteReport, PAGESIFT_OUTPUT_VERSION};
pub use pipeline::{analyze_page, PageData, SiteAnalysis};
pub use style::{CssParseStrategy, PaletteExtractor, StyleRuleClassifier};
pub use types::{
    ApiEndpoint, ButtonElement, ColorEntry, ColorRole, Component, ComponentKind, DropdownElement,
    EventBinding, FileRuleStats, FontEntry, InputElement, InteractiveElements, LayoutRegion,
    PageLayout, PageMeta, Palette, Provenance, RegionKind, RuleCategory, SidebarPosition,
    StructuralModel, StyleModel, StyleRule,
};
