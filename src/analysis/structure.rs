//! Layout region classification.
//!
//! Scans the document for header/footer/sidebar/main regions using an
//! ordered keyword table, falls back to positional inference when tags and
//! keywords give nothing, and derives the page-level layout type tag.

use regex::Regex;

use crate::config::AnalyzerConfig;
use crate::dom::{DocumentModel, Element};
use crate::types::{LayoutRegion, PageLayout, Provenance, RegionKind, SidebarPosition};

/// Keyword table, in detection priority order. Per region: the semantic tag
/// that matches on its own, the candidate tags that need a keyword hit, and
/// the keyword pattern applied to class tokens and ids.
const REGION_RULES: &[(RegionKind, &str, &[&str], &str)] = &[
    (
        RegionKind::Header,
        "header",
        &["header", "div", "nav"],
        r"(?i)header|navbar|nav-bar|top-bar|banner|hero|jumbotron|masthead",
    ),
    (
        RegionKind::Footer,
        "footer",
        &["footer", "div"],
        r"(?i)footer|bottom",
    ),
    (
        RegionKind::Sidebar,
        "aside",
        &["aside", "div", "nav"],
        r"(?i)sidebar|side-bar|sidenav|left-menu|right-menu|\bside\b",
    ),
    (
        RegionKind::MainContent,
        "main",
        &["main", "div", "article"],
        r"(?i)main|content|article|container",
    ),
    (
        RegionKind::Section,
        "section",
        &["section", "div", "article"],
        r"(?i)section|container|row|block",
    ),
];

/// Flex/grid usage detected in the CSS corpus; drives the layout type
/// suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssHints {
    pub uses_flex: bool,
    pub uses_grid: bool,
}

impl CssHints {
    pub fn from_css(css: &str) -> Self {
        let flex = Regex::new(r"display\s*:\s*(inline-)?flex").expect("static pattern");
        let grid = Regex::new(r"display\s*:\s*(inline-)?grid").expect("static pattern");
        Self {
            uses_flex: flex.is_match(css),
            uses_grid: grid.is_match(css),
        }
    }
}

struct CompiledRule {
    kind: RegionKind,
    semantic_tag: &'static str,
    tags: &'static [&'static str],
    keywords: Regex,
}

pub struct StructureClassifier {
    rules: Vec<CompiledRule>,
    container: Regex,
    column: Regex,
    section_cap: usize,
    min_text_len: usize,
    column_cap: usize,
}

impl StructureClassifier {
    pub fn new(config: &AnalyzerConfig) -> Self {
        let rules = REGION_RULES
            .iter()
            .map(|(kind, semantic, tags, pattern)| CompiledRule {
                kind: *kind,
                semantic_tag: semantic,
                tags,
                keywords: Regex::new(pattern).expect("static pattern"),
            })
            .collect();
        Self {
            rules,
            container: Regex::new(r"(?i)container|row|grid|wrapper").expect("static pattern"),
            column: Regex::new(r"(?i)col").expect("static pattern"),
            section_cap: config.section_cap,
            min_text_len: config.min_region_text_len,
            column_cap: config.column_cap,
        }
    }

    /// Classify the document into a [`PageLayout`]. Never fails: absence of
    /// structural cues yields `custom-layout` with empty regions.
    pub fn classify(&self, doc: &DocumentModel, hints: CssHints) -> PageLayout {
        let elements = doc.all_elements();

        let mut header = None;
        let mut footer = None;
        let mut sidebar = None;
        let mut main_content = None;
        let mut sections = Vec::new();

        // One document-order pass; first match wins per region.
        for &el in &elements {
            for rule in &self.rules {
                let slot_filled = match rule.kind {
                    RegionKind::Header => header.is_some(),
                    RegionKind::Footer => footer.is_some(),
                    RegionKind::Sidebar => sidebar.is_some(),
                    RegionKind::MainContent => main_content.is_some(),
                    RegionKind::Section => sections.len() >= self.section_cap,
                };
                if slot_filled {
                    continue;
                }
                let Some(provenance) = match_rule(el, rule) else {
                    continue;
                };
                let region = capture_region(el, rule.kind, provenance);
                match rule.kind {
                    RegionKind::Header => header = Some(region),
                    RegionKind::Footer => footer = Some(region),
                    RegionKind::Sidebar => sidebar = Some(region),
                    RegionKind::MainContent => main_content = Some(region),
                    RegionKind::Section => sections.push(region),
                }
            }
        }

        // Positional inference when keywords found nothing.
        if header.is_none() {
            header = self.positional_header(doc);
        }
        if footer.is_none() {
            footer = self.positional_footer(doc, header.as_ref());
        }

        let base = if sidebar.is_some() {
            "sidebar-layout"
        } else if sections.len() > 3 {
            "multi-section-layout"
        } else if header.is_some() && main_content.is_some() && footer.is_some() {
            "standard-layout"
        } else {
            "custom-layout"
        };
        let suffix = if hints.uses_flex {
            "_flex"
        } else if hints.uses_grid {
            "_grid"
        } else {
            ""
        };

        PageLayout {
            kind: format!("{}{}", base, suffix),
            header,
            footer,
            sidebar,
            main_content,
            sections,
            columns: self.estimate_columns(doc),
        }
    }

    /// First 3 top-level body children with meaningful text.
    fn positional_header(&self, doc: &DocumentModel) -> Option<LayoutRegion> {
        let body = doc.body()?;
        body.child_elements()
            .take(3)
            .find(|el| el.text().len() > self.min_text_len)
            .map(|el| capture_region(el, RegionKind::Header, Provenance::StructuralPosition))
    }

    /// Symmetric to the header rule: last 3 top-level body children, nearest
    /// the end first. The element already claimed as header is skipped.
    fn positional_footer(
        &self,
        doc: &DocumentModel,
        header: Option<&LayoutRegion>,
    ) -> Option<LayoutRegion> {
        let body = doc.body()?;
        let children: Vec<&Element> = body.child_elements().collect();
        children
            .iter()
            .rev()
            .take(3)
            .copied()
            .find(|el| el.text().len() > self.min_text_len && !is_claimed(el, header))
            .map(|el| capture_region(el, RegionKind::Footer, Provenance::StructuralPosition))
    }

    /// Column estimate from the first container-like element: count "col"
    /// children when present, otherwise direct child count capped.
    fn estimate_columns(&self, doc: &DocumentModel) -> usize {
        let container = doc
            .all_elements()
            .into_iter()
            .find(|el| el.classes.iter().any(|c| self.container.is_match(c)));
        let Some(container) = container else {
            return 1;
        };
        let col_children = container
            .child_elements()
            .filter(|c| c.classes.iter().any(|cls| self.column.is_match(cls)))
            .count();
        if col_children > 0 {
            col_children
        } else {
            container.child_elements().count().clamp(1, self.column_cap)
        }
    }
}

fn match_rule(el: &Element, rule: &CompiledRule) -> Option<Provenance> {
    if el.tag == rule.semantic_tag {
        return Some(Provenance::TagName);
    }
    if !rule.tags.contains(&el.tag.as_str()) {
        return None;
    }
    if el.classes.iter().any(|c| rule.keywords.is_match(c)) {
        return Some(Provenance::ClassPattern);
    }
    if el
        .id
        .as_deref()
        .map_or(false, |id| rule.keywords.is_match(id))
    {
        return Some(Provenance::IdPattern);
    }
    None
}

fn capture_region(el: &Element, kind: RegionKind, provenance: Provenance) -> LayoutRegion {
    let position = if kind == RegionKind::Sidebar {
        Some(sidebar_position(el))
    } else {
        None
    };
    LayoutRegion {
        kind,
        tag: el.tag.clone(),
        classes: el.classes.clone(),
        id: el.id.clone(),
        position,
        provenance,
    }
}

/// Textual reasoning over the serialized element; "left" anywhere in the
/// markup wins, otherwise right.
fn sidebar_position(el: &Element) -> SidebarPosition {
    if el.to_html().to_lowercase().contains("left") {
        SidebarPosition::Left
    } else {
        SidebarPosition::Right
    }
}

fn is_claimed(el: &Element, region: Option<&LayoutRegion>) -> bool {
    let Some(region) = region else {
        return false;
    };
    region.provenance == Provenance::StructuralPosition
        && region.tag == el.tag
        && region.classes == el.classes
        && region.id == el.id
}
