//! Lenient HTML parsing into an owned, read-only element tree.
//!
//! [`DocumentModel`] wraps the `scraper` parser (html5ever underneath) and
//! converts its arena into an owned [`Element`] tree the analysis stages can
//! traverse freely. Malformed markup is tolerated the way browsers tolerate
//! it; parsing only fails on input with no element content at all.

use regex::Regex;
use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::error::{PagesiftError, Result};

/// Tags whose text content is invisible and excluded from [`Element::text`].
const INVISIBLE_TEXT: &[&str] = &["script", "style", "noscript", "template"];

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A child node: either a nested element or a run of text.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// One parsed HTML element. Owned, immutable after construction.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    /// Attribute pairs sorted by name; keys are unique.
    pub attributes: Vec<(String, String)>,
    /// Class tokens in source order.
    pub classes: Vec<String>,
    pub id: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        for child in self.child_elements() {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }

    pub fn descendant_count(&self) -> usize {
        self.child_elements()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Concatenated descendant text, whitespace-normalized. Text under
    /// script/style/noscript subtrees is excluded.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => {
                    buf.push(' ');
                    buf.push_str(t);
                }
                Node::Element(el) => {
                    if !INVISIBLE_TEXT.contains(&el.tag.as_str()) {
                        el.collect_text(buf);
                    }
                }
            }
        }
    }

    /// Raw text of this element only (used for inline script bodies).
    pub fn own_text(&self) -> String {
        let mut buf = String::new();
        for child in &self.children {
            if let Node::Text(t) = child {
                buf.push_str(t);
            }
        }
        buf
    }

    /// Serialize the subtree back to markup. Attribute order follows the
    /// stored (sorted) order, so output is deterministic across runs.
    pub fn to_html(&self) -> String {
        let mut buf = String::new();
        self.write_html(&mut buf);
        buf
    }

    fn write_html(&self, buf: &mut String) {
        buf.push('<');
        buf.push_str(&self.tag);
        for (name, value) in &self.attributes {
            buf.push(' ');
            buf.push_str(name);
            if !value.is_empty() {
                buf.push_str("=\"");
                buf.push_str(value);
                buf.push('"');
            }
        }
        buf.push('>');
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(t),
                Node::Element(el) => el.write_html(buf),
            }
        }
        buf.push_str("</");
        buf.push_str(&self.tag);
        buf.push('>');
    }

    /// First `len` characters of the serialized markup; used as the dedup
    /// fingerprint and for sample truncation.
    pub fn truncated_html(&self, len: usize) -> String {
        let html = self.to_html();
        if html.chars().count() <= len {
            html
        } else {
            html.chars().take(len).collect()
        }
    }

}

/// Parsed representation of one HTML document.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    root: Element,
}

impl DocumentModel {
    /// Parse `html` leniently. Fails only when the input contains no usable
    /// element content (effectively empty or non-markup text).
    pub fn parse(html: &str) -> Result<DocumentModel> {
        if html.trim().is_empty() {
            return Err(PagesiftError::parse("document is empty"));
        }
        let parsed = Html::parse_document(html);
        let root = convert(parsed.root_element());
        if root.descendant_count() == 0 && root.text().is_empty() {
            return Err(PagesiftError::parse("document has no element content"));
        }
        Ok(DocumentModel { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn body(&self) -> Option<&Element> {
        self.root.child_elements().find(|el| el.tag == "body")
    }

    pub fn head(&self) -> Option<&Element> {
        self.root.child_elements().find(|el| el.tag == "head")
    }

    pub fn title(&self) -> Option<String> {
        let head = self.head()?;
        let title = head
            .descendants()
            .into_iter()
            .find(|el| el.tag == "title")?;
        let text = title.text();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// All elements matching the given filters, in document order. Filters
    /// combine with AND; `None` means "any". `class_pattern` tests each
    /// class token, `id_pattern` tests the id attribute.
    pub fn find_all(
        &self,
        tags: Option<&[&str]>,
        class_pattern: Option<&Regex>,
        id_pattern: Option<&Regex>,
    ) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_matching(&self.root, tags, class_pattern, id_pattern, &mut out);
        out
    }

    /// Every element in document order, root included.
    pub fn all_elements(&self) -> Vec<&Element> {
        let mut out = vec![&self.root];
        out.extend(self.root.descendants());
        out
    }

    /// Class tokens referenced anywhere in the document.
    pub fn used_classes(&self) -> std::collections::HashSet<String> {
        self.all_elements()
            .into_iter()
            .flat_map(|el| el.classes.iter().cloned())
            .collect()
    }

    /// Id attributes referenced anywhere in the document.
    pub fn used_ids(&self) -> std::collections::HashSet<String> {
        self.all_elements()
            .into_iter()
            .filter_map(|el| el.id.clone())
            .collect()
    }
}

fn collect_matching<'a>(
    el: &'a Element,
    tags: Option<&[&str]>,
    class_pattern: Option<&Regex>,
    id_pattern: Option<&Regex>,
    out: &mut Vec<&'a Element>,
) {
    let tag_ok = tags.map_or(true, |ts| ts.contains(&el.tag.as_str()));
    let class_ok = class_pattern.map_or(true, |re| el.classes.iter().any(|c| re.is_match(c)));
    let id_ok = id_pattern.map_or(true, |re| {
        el.id.as_deref().map_or(false, |id| re.is_match(id))
    });
    if tag_ok && class_ok && id_ok {
        out.push(el);
    }
    for child in el.child_elements() {
        collect_matching(child, tags, class_pattern, id_pattern, out);
    }
}

fn convert(el: ElementRef<'_>) -> Element {
    let value = el.value();
    let tag = value.name().to_string();

    let mut attributes: Vec<(String, String)> = value
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    attributes.sort_by(|a, b| a.0.cmp(&b.0));
    attributes.dedup_by(|a, b| a.0 == b.0);

    let classes: Vec<String> = attributes
        .iter()
        .find(|(k, _)| k == "class")
        .map(|(_, v)| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    let id = attributes
        .iter()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.clone())
        .filter(|v| !v.is_empty());

    let mut children = Vec::new();
    for child in el.children() {
        match child.value() {
            ScraperNode::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    children.push(Node::Element(convert(child_el)));
                }
            }
            ScraperNode::Text(t) => {
                let s = t.text.to_string();
                if !s.trim().is_empty() {
                    children.push(Node::Text(s));
                }
            }
            _ => {}
        }
    }

    Element {
        tag,
        attributes,
        classes,
        id,
        children,
    }
}
