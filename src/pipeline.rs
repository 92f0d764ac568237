//! End-to-end analysis pipeline.
//!
//! [`analyze_page`] is a pure function of its inputs: given the fetched page
//! content and a config, it always produces the same models. Recovered
//! problems land in the caller's [`Diagnostics`] sink; only an unusable
//! document aborts the run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::{
    extract_meta, ComponentDetector, CssHints, InteractiveElementScanner, StructureClassifier,
};
use crate::config::AnalyzerConfig;
use crate::diagnostics::Diagnostics;
use crate::dom::DocumentModel;
use crate::error::Result;
use crate::style::{PaletteExtractor, StyleRuleClassifier};
use crate::types::{StructuralModel, StyleModel};

const STAGE: &str = "pipeline";

/// Raw inputs for one page: the HTML document, the URL it was fetched from,
/// and its CSS sources keyed by name (file URL or "inline-N").
#[derive(Debug, Clone, Default)]
pub struct PageData {
    pub html: String,
    pub base_url: String,
    pub css_files: BTreeMap<String, String>,
}

/// Combined output of a full analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    pub structure: StructuralModel,
    pub style: StyleModel,
}

/// Run every inference stage over one page.
pub fn analyze_page(
    page: &PageData,
    config: &AnalyzerConfig,
    diag: &mut Diagnostics,
) -> Result<SiteAnalysis> {
    let doc = DocumentModel::parse(&page.html)?;

    let combined_css: String = page
        .css_files
        .values()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    let hints = CssHints::from_css(&combined_css);

    let layout = StructureClassifier::new(config).classify(&doc, hints);
    let components = ComponentDetector::new(config).detect(&doc);
    let interactive = InteractiveElementScanner::new(config).scan(&doc);
    let meta = extract_meta(&doc);
    diag.info(
        STAGE,
        format!(
            "layout {} with {} component(s)",
            layout.kind,
            components.len()
        ),
    );

    let classified =
        StyleRuleClassifier::new(config).classify(&page.css_files, &doc, &page.base_url, diag);
    let palette = PaletteExtractor::new().extract(&combined_css, diag);

    Ok(SiteAnalysis {
        structure: StructuralModel {
            layout,
            components,
            interactive,
            meta,
        },
        style: StyleModel {
            layout_rules: classified.layout_rules,
            component_rules: classified.component_rules,
            global_rules: classified.global_rules,
            unclassified_rules: classified.unclassified_rules,
            file_stats: classified.file_stats,
            palette,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>Shop</title></head><body>
        <header class="navbar">Example Shop</header>
        <main class="container">
            <div class="product-card"><h3>A</h3><p>Price 1</p></div>
            <div class="product-card"><h3>B</h3><p>Price 2</p></div>
            <div class="product-card"><h3>C</h3><p>Price 3</p></div>
        </main>
        <footer>All rights reserved</footer>
    </body></html>"#;

    fn page() -> PageData {
        let mut css_files = BTreeMap::new();
        css_files.insert(
            "main.css".to_string(),
            ".container { display: flex; }\n.product-card { color: #ff0000; }".to_string(),
        );
        PageData {
            html: PAGE.to_string(),
            base_url: "https://example.com/".to_string(),
            css_files,
        }
    }

    #[test]
    fn full_run_assembles_both_models() {
        let mut diag = Diagnostics::new();
        let analysis =
            analyze_page(&page(), &AnalyzerConfig::default(), &mut diag).expect("analysis runs");

        assert_eq!(analysis.structure.layout.kind, "standard-layout_flex");
        assert_eq!(analysis.structure.meta.title.as_deref(), Some("Shop"));
        assert!(analysis.style.total_rules() >= 2);
        assert_eq!(analysis.style.palette.colors[0].value, "#ff0000");
    }

    #[test]
    fn empty_document_is_a_parse_error() {
        let mut diag = Diagnostics::new();
        let page = PageData {
            html: "   ".to_string(),
            ..PageData::default()
        };
        let err = analyze_page(&page, &AnalyzerConfig::default(), &mut diag).unwrap_err();
        assert!(matches!(err, crate::error::PagesiftError::Parse(_)));
    }
}
