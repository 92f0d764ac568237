//! Recurring component detection.
//!
//! Candidates are harvested from an ordered identifier table, card-like
//! candidates are grouped by structural signature and materialized only
//! above a threshold, singleton kinds (navigation, form, table, ...) are
//! emitted per match, and the final list is deduplicated on a truncated
//! markup fingerprint.

use std::collections::HashMap;

use regex::Regex;

use crate::config::AnalyzerConfig;
use crate::dom::{DocumentModel, Element};
use crate::types::{Component, ComponentKind, Provenance};

/// Identifier table, in harvest priority order. Per kind: the semantic tags
/// that match on their own, the candidate tags that need a keyword hit, and
/// the keyword pattern.
const IDENTIFIERS: &[(ComponentKind, &[&str], &[&str], &str)] = &[
    (
        ComponentKind::Card,
        &[],
        &["div", "article", "section"],
        r"(?i)card|box|item|product|post|tile|panel",
    ),
    (
        ComponentKind::Navigation,
        &["nav"],
        &["nav", "ul"],
        r"(?i)nav|menu|navigation",
    ),
    (ComponentKind::Form, &["form"], &["form"], r"(?i)form"),
    (ComponentKind::Table, &["table"], &["table"], r"(?i)table"),
    (
        ComponentKind::Button,
        &["button"],
        &["button", "a"],
        r"(?i)btn|button",
    ),
    (
        ComponentKind::Modal,
        &[],
        &["div", "section"],
        r"(?i)modal|dialog|popup",
    ),
    (
        ComponentKind::Header,
        &["header"],
        &["header", "div", "nav"],
        r"(?i)header|navbar|top-bar|banner",
    ),
    (
        ComponentKind::Footer,
        &["footer"],
        &["footer", "div"],
        r"(?i)footer|bottom",
    ),
];

/// Sample markup is truncated to this many characters for readability.
const SAMPLE_LEN: usize = 300;

struct CompiledIdentifier {
    kind: ComponentKind,
    semantic_tags: &'static [&'static str],
    tags: &'static [&'static str],
    keywords: Regex,
}

struct Candidate<'a> {
    element: &'a Element,
    provenance: Provenance,
}

pub struct ComponentDetector {
    identifiers: Vec<CompiledIdentifier>,
    card_threshold: usize,
    fingerprint_len: usize,
    min_text_len: usize,
}

impl ComponentDetector {
    pub fn new(config: &AnalyzerConfig) -> Self {
        let identifiers = IDENTIFIERS
            .iter()
            .map(|(kind, semantic, tags, pattern)| CompiledIdentifier {
                kind: *kind,
                semantic_tags: semantic,
                tags,
                keywords: Regex::new(pattern).expect("static pattern"),
            })
            .collect();
        Self {
            identifiers,
            card_threshold: config.card_threshold,
            fingerprint_len: config.fingerprint_len,
            min_text_len: config.min_region_text_len,
        }
    }

    /// Detect components in discovery order. Deterministic: the same
    /// document always yields the same list.
    pub fn detect(&self, doc: &DocumentModel) -> Vec<Component> {
        let mut components = Vec::new();

        for identifier in &self.identifiers {
            let candidates = self.harvest(doc, identifier);
            match identifier.kind {
                ComponentKind::Card => {
                    components.extend(self.group_cards(&candidates));
                }
                _ => {
                    for candidate in &candidates {
                        components.push(self.singleton(identifier.kind, candidate));
                    }
                }
            }
        }

        self.positional_fallback(doc, &mut components);
        self.dedup(components)
    }

    fn harvest<'a>(
        &self,
        doc: &'a DocumentModel,
        identifier: &CompiledIdentifier,
    ) -> Vec<Candidate<'a>> {
        let mut out = Vec::new();
        for el in doc.all_elements() {
            if identifier.semantic_tags.contains(&el.tag.as_str()) {
                out.push(Candidate {
                    element: el,
                    provenance: Provenance::TagName,
                });
                continue;
            }
            if !identifier.tags.contains(&el.tag.as_str()) {
                continue;
            }
            if el.classes.iter().any(|c| identifier.keywords.is_match(c)) {
                out.push(Candidate {
                    element: el,
                    provenance: Provenance::ClassPattern,
                });
            } else if el
                .id
                .as_deref()
                .map_or(false, |id| identifier.keywords.is_match(id))
            {
                out.push(Candidate {
                    element: el,
                    provenance: Provenance::IdPattern,
                });
            }
        }
        out
    }

    /// Group card candidates by exact signature equality; only groups at or
    /// above the threshold become components. Group order follows the first
    /// occurrence of each signature.
    fn group_cards(&self, candidates: &[Candidate<'_>]) -> Vec<Component> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<&Candidate<'_>>> = HashMap::new();
        for candidate in candidates {
            let signature = structure_signature(candidate.element);
            if !groups.contains_key(&signature) {
                order.push(signature.clone());
            }
            groups.entry(signature).or_default().push(candidate);
        }

        let mut out = Vec::new();
        for signature in order {
            let group = &groups[&signature];
            if group.len() < self.card_threshold {
                continue;
            }
            let first = group[0];
            out.push(Component {
                kind: ComponentKind::Card,
                tag: first.element.tag.clone(),
                classes: first.element.classes.clone(),
                id: first.element.id.clone(),
                sample: first.element.truncated_html(SAMPLE_LEN),
                count: group.len(),
                signature: Some(signature),
                provenance: first.provenance,
                nav_items: None,
                form_fields: None,
                table_rows: None,
                table_columns: None,
            });
        }
        out
    }

    /// Singleton kinds carry kind-specific derived metrics; no threshold.
    fn singleton(&self, kind: ComponentKind, candidate: &Candidate<'_>) -> Component {
        let el = candidate.element;
        let mut component = Component {
            kind,
            tag: el.tag.clone(),
            classes: el.classes.clone(),
            id: el.id.clone(),
            sample: el.truncated_html(SAMPLE_LEN),
            count: 1,
            signature: None,
            provenance: candidate.provenance,
            nav_items: None,
            form_fields: None,
            table_rows: None,
            table_columns: None,
        };
        match kind {
            ComponentKind::Navigation => {
                component.nav_items = Some(count_descendants(el, &["li"]));
            }
            ComponentKind::Form => {
                component.form_fields =
                    Some(count_descendants(el, &["input", "select", "textarea"]));
            }
            ComponentKind::Table => {
                component.table_rows = Some(count_descendants(el, &["tr"]));
                component.table_columns = Some(table_columns(el));
            }
            _ => {}
        }
        component
    }

    /// Mirror of the positional layout rule: when keyword scanning produced
    /// no header/footer component, promote the first/last meaningful body
    /// children.
    fn positional_fallback(&self, doc: &DocumentModel, components: &mut Vec<Component>) {
        let Some(body) = doc.body() else {
            return;
        };
        let mut claimed_header: Option<&Element> = None;
        if !components.iter().any(|c| c.kind == ComponentKind::Header) {
            if let Some(el) = body
                .child_elements()
                .take(3)
                .find(|el| el.text().len() > self.min_text_len)
            {
                claimed_header = Some(el);
                components.push(positional_component(ComponentKind::Header, el));
            }
        }
        if !components.iter().any(|c| c.kind == ComponentKind::Footer) {
            let children: Vec<&Element> = body.child_elements().collect();
            if let Some(el) = children
                .iter()
                .rev()
                .take(3)
                .copied()
                .find(|el| {
                    el.text().len() > self.min_text_len
                        && !claimed_header.map_or(false, |h| std::ptr::eq(*el, h))
                })
            {
                components.push(positional_component(ComponentKind::Footer, el));
            }
        }
    }

    /// Keep the first component per (kind, fingerprint), preserving
    /// discovery order. The same element may appear under several kinds;
    /// only same-kind duplicates are removed.
    fn dedup(&self, components: Vec<Component>) -> Vec<Component> {
        let mut seen: Vec<(ComponentKind, String)> = Vec::new();
        let mut out = Vec::new();
        for component in components {
            let fingerprint: String = component
                .sample
                .chars()
                .take(self.fingerprint_len)
                .collect();
            let key = (component.kind, fingerprint);
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            out.push(component);
        }
        out
    }
}

/// Ordered "childTag:descendantCount" list over direct children; exact
/// string equality defines structural similarity.
pub fn structure_signature(el: &Element) -> String {
    el.child_elements()
        .map(|child| format!("{}:{}", child.tag, child.descendant_count()))
        .collect::<Vec<_>>()
        .join(">")
}

fn count_descendants(el: &Element, tags: &[&str]) -> usize {
    el.descendants()
        .into_iter()
        .filter(|d| tags.contains(&d.tag.as_str()))
        .count()
}

fn table_columns(el: &Element) -> usize {
    let th_count = count_descendants(el, &["th"]);
    if th_count > 0 {
        return th_count;
    }
    el.descendants()
        .into_iter()
        .find(|d| d.tag == "tr")
        .map(|row| {
            row.child_elements()
                .filter(|cell| cell.tag == "td")
                .count()
        })
        .unwrap_or(0)
}

fn positional_component(kind: ComponentKind, el: &Element) -> Component {
    Component {
        kind,
        tag: el.tag.clone(),
        classes: el.classes.clone(),
        id: el.id.clone(),
        sample: el.truncated_html(SAMPLE_LEN),
        count: 1,
        signature: None,
        provenance: Provenance::StructuralPosition,
        nav_items: None,
        form_fields: None,
        table_rows: None,
        table_columns: None,
    }
}
