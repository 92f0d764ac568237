//! CSS rule parsing and classification.
//!
//! Three parse strategies share one output shape, in preference order: a
//! brace-aware tokenizer that descends into block at-rules, a simple
//! brace-split parser, and a last-resort regex splitter. A rule that fails
//! to parse is skipped and reported to the diagnostics sink; a file never
//! aborts the run.
//!
//! Classification is first-match-wins: component keyword, then layout
//! keyword, then usage-based global (the selector references a class or id
//! the document actually uses). Everything else is retained unclassified.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use url::Url;

use crate::config::AnalyzerConfig;
use crate::diagnostics::Diagnostics;
use crate::dom::DocumentModel;
use crate::types::{FileRuleStats, RuleCategory, StyleRule};

const STAGE: &str = "style-rules";

/// Component keyword table, in precedence order; the first alternation that
/// hits decides the kind name.
const COMPONENT_KEYWORDS: &[(&str, &str)] = &[
    (r"(?i)card|box|panel|tile|item|product|post", "card"),
    (r"(?i)btn|button", "button"),
    (r"(?i)nav|menu|navigation", "navigation"),
    (r"(?i)form|input-group", "form"),
    (r"(?i)table", "table"),
    (r"(?i)modal|dialog|popup", "modal"),
    (r"(?i)header", "header"),
    (r"(?i)footer", "footer"),
];

const LAYOUT_KEYWORDS: &str =
    r"(?i)layout|container|grid|row|col|flex|section|header|footer|sidebar|wrapper";

/// Which parse strategy to use. All three yield the same logical
/// (selector, declarations) shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CssParseStrategy {
    /// Brace-aware tokenizer; handles nested at-rules and comments.
    #[default]
    Tokenizer,
    /// Naive brace splitting; loses nested at-rule content.
    Simple,
    /// Regex over `selector { declarations }`; last resort.
    RegexSplit,
}

/// One parsed rule before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

/// Classification output, merged into the StyleModel by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedRules {
    pub layout_rules: Vec<StyleRule>,
    pub component_rules: BTreeMap<String, Vec<StyleRule>>,
    pub global_rules: Vec<StyleRule>,
    pub unclassified_rules: Vec<StyleRule>,
    pub file_stats: BTreeMap<String, FileRuleStats>,
}

pub struct StyleRuleClassifier {
    strategy: CssParseStrategy,
    component_patterns: Vec<(Regex, &'static str)>,
    layout_pattern: Regex,
    class_token: Regex,
    id_token: Regex,
    url_token: Regex,
    rule_split: Regex,
}

impl StyleRuleClassifier {
    pub fn new(_config: &AnalyzerConfig) -> Self {
        Self::with_strategy(CssParseStrategy::default())
    }

    pub fn with_strategy(strategy: CssParseStrategy) -> Self {
        let component_patterns = COMPONENT_KEYWORDS
            .iter()
            .map(|(pattern, kind)| (Regex::new(pattern).expect("static pattern"), *kind))
            .collect();
        Self {
            strategy,
            component_patterns,
            layout_pattern: Regex::new(LAYOUT_KEYWORDS).expect("static pattern"),
            class_token: Regex::new(r"\.([A-Za-z0-9_-]+)").expect("static pattern"),
            id_token: Regex::new(r"#([A-Za-z0-9_-]+)").expect("static pattern"),
            url_token: Regex::new(r#"url\(\s*['"]?([^'")]+?)['"]?\s*\)"#).expect("static pattern"),
            rule_split: Regex::new(r"(?s)([^{}]+)\{([^{}]*)\}").expect("static pattern"),
        }
    }

    /// Classify every rule in `css_files`. Files are processed in key order
    /// so the output buckets are deterministic.
    pub fn classify(
        &self,
        css_files: &BTreeMap<String, String>,
        doc: &DocumentModel,
        base_url: &str,
        diag: &mut Diagnostics,
    ) -> ClassifiedRules {
        let used_classes = doc.used_classes();
        let used_ids = doc.used_ids();
        let base = match Url::parse(base_url) {
            Ok(url) => Some(url),
            Err(err) => {
                if !base_url.is_empty() {
                    diag.warn(STAGE, format!("unusable base URL {:?}: {}", base_url, err));
                }
                None
            }
        };

        let mut out = ClassifiedRules::default();
        for (file, css) in css_files {
            let raw_rules = self.parse(css, diag);
            let stats = FileRuleStats {
                rules: raw_rules.len(),
                selectors: raw_rules
                    .iter()
                    .map(|r| r.selector.split(',').count())
                    .sum(),
            };
            out.file_stats.insert(file.clone(), stats);

            for mut raw in raw_rules {
                self.rewrite_urls(&mut raw, base.as_ref());
                let category = self.categorize(&raw.selector, &used_classes, &used_ids);
                let rule = StyleRule {
                    selector: raw.selector,
                    declarations: raw.declarations,
                    category: category.clone(),
                    source: file.clone(),
                };
                match category {
                    RuleCategory::Layout => out.layout_rules.push(rule),
                    RuleCategory::Component(kind) => {
                        out.component_rules.entry(kind).or_default().push(rule)
                    }
                    RuleCategory::Global => out.global_rules.push(rule),
                    RuleCategory::Unclassified => out.unclassified_rules.push(rule),
                }
            }
        }
        out
    }

    /// Parse one CSS text with the configured strategy.
    pub fn parse(&self, css: &str, diag: &mut Diagnostics) -> Vec<RawRule> {
        let stripped = strip_comments(css);
        let blocks = match self.strategy {
            CssParseStrategy::Tokenizer => tokenize_blocks(&stripped),
            CssParseStrategy::Simple => simple_blocks(&stripped),
            CssParseStrategy::RegexSplit => self
                .rule_split
                .captures_iter(&stripped)
                .map(|c| (c[1].to_string(), c[2].to_string()))
                .collect(),
        };

        let mut rules = Vec::new();
        for (selector, body) in blocks {
            let selector = selector.split_whitespace().collect::<Vec<_>>().join(" ");
            if selector.is_empty() || selector.starts_with('@') {
                continue;
            }
            let declarations = parse_declarations(&body);
            if declarations.is_empty() && !body.trim().is_empty() {
                diag.warn(
                    STAGE,
                    format!("skipped unparsable declarations for {:?}", selector),
                );
                continue;
            }
            rules.push(RawRule {
                selector,
                declarations,
            });
        }
        rules
    }

    /// Resolve relative `url(...)` values against the base URL. Data URIs
    /// and absolute URLs are left untouched.
    fn rewrite_urls(&self, rule: &mut RawRule, base: Option<&Url>) {
        let Some(base) = base else {
            return;
        };
        for (_, value) in &mut rule.declarations {
            if !value.contains("url(") {
                continue;
            }
            let rewritten = self
                .url_token
                .replace_all(value, |caps: &regex::Captures<'_>| {
                    let target = caps[1].trim();
                    if is_absolute(target) {
                        caps[0].to_string()
                    } else {
                        match base.join(target) {
                            Ok(resolved) => format!("url({})", resolved),
                            Err(_) => caps[0].to_string(),
                        }
                    }
                })
                .into_owned();
            *value = rewritten;
        }
    }

    fn categorize(
        &self,
        selector: &str,
        used_classes: &HashSet<String>,
        used_ids: &HashSet<String>,
    ) -> RuleCategory {
        for (pattern, kind) in &self.component_patterns {
            if pattern.is_match(selector) {
                return RuleCategory::Component((*kind).to_string());
            }
        }
        if self.layout_pattern.is_match(selector) {
            return RuleCategory::Layout;
        }
        for part in selector.split(',') {
            if let Some(caps) = self.class_token.captures(part) {
                if used_classes.contains(&caps[1]) {
                    return RuleCategory::Global;
                }
            }
            if let Some(caps) = self.id_token.captures(part) {
                if used_ids.contains(&caps[1]) {
                    return RuleCategory::Global;
                }
            }
        }
        RuleCategory::Unclassified
    }
}

fn is_absolute(target: &str) -> bool {
    target.starts_with("data:")
        || target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with("//")
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            // Consume until the closing marker; unterminated comments eat
            // the rest of the file, same as browsers.
            let mut prev = ' ';
            for inner in chars.by_ref() {
                if prev == '*' && inner == '/' {
                    break;
                }
                prev = inner;
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Brace-aware block scan. Block at-rules (`@media`, `@supports`) are
/// descended into; statement at-rules (`@import`, `@charset`) are skipped.
fn tokenize_blocks(css: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    scan_blocks(css, &mut out);
    out
}

fn scan_blocks(css: &str, out: &mut Vec<(String, String)>) {
    let bytes = css.as_bytes();
    let mut i = 0;
    let mut selector_start = 0;
    while i < bytes.len() {
        match bytes[i] {
            b';' => {
                // Statement at-rule or stray semicolon.
                selector_start = i + 1;
                i += 1;
            }
            b'{' => {
                let selector = css[selector_start..i].trim().to_string();
                let Some(end) = matching_brace(bytes, i) else {
                    // Unbalanced block: take the rest as the body.
                    let body = &css[i + 1..];
                    emit_block(&selector, body, out);
                    return;
                };
                let body = &css[i + 1..end];
                emit_block(&selector, body, out);
                i = end + 1;
                selector_start = i;
            }
            _ => i += 1,
        }
    }
}

fn emit_block(selector: &str, body: &str, out: &mut Vec<(String, String)>) {
    if selector.starts_with('@') && body.contains('{') {
        // Conditional group rule: classify the inner rules instead.
        scan_blocks(body, out);
    } else {
        out.push((selector.to_string(), body.to_string()));
    }
}

fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, &b) in bytes[open..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Secondary strategy: split on closing braces. Nested at-rule content
/// comes out mangled; those chunks are dropped by the `@` filter upstream.
fn simple_blocks(css: &str) -> Vec<(String, String)> {
    css.split('}')
        .filter_map(|chunk| {
            let mut parts = chunk.splitn(2, '{');
            let selector = parts.next()?.trim();
            let body = parts.next()?;
            if selector.is_empty() {
                None
            } else {
                Some((selector.to_string(), body.to_string()))
            }
        })
        .collect()
}

/// Split a declaration block into ordered (property, value) pairs.
/// Semicolons inside parentheses (data URIs, `url(...)`) do not split.
fn parse_declarations(body: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    let mut parts = Vec::new();
    for c in body.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ';' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);

    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((property, value)) = part.split_once(':') else {
            continue;
        };
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }
        declarations.push((property.to_string(), value.to_string()));
    }
    declarations
}
