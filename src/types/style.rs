//! Style model: classified CSS rules and the extracted palette.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category a rule was assigned to. Exactly one per rule; component matches
/// outrank layout matches, which outrank usage-based global classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "component")]
pub enum RuleCategory {
    Layout,
    Component(String),
    Global,
    /// Retained but not promoted to any output bucket: the selector matched
    /// no pattern and references nothing the document uses.
    Unclassified,
}

/// One parsed CSS rule with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRule {
    pub selector: String,
    /// Ordered property/value declarations.
    pub declarations: Vec<(String, String)>,
    pub category: RuleCategory,
    /// Name of the CSS source file this rule came from.
    pub source: String,
}

impl StyleRule {
    /// Render the rule back to CSS text.
    pub fn to_css(&self) -> String {
        let body = self
            .declarations
            .iter()
            .map(|(p, v)| format!("  {}: {};", p, v))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{} {{\n{}\n}}", self.selector, body)
    }
}

/// Per-source-file aggregate counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRuleStats {
    pub rules: usize,
    pub selectors: usize,
}

/// Role assigned to a classified color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    Primary,
    Secondary,
    Neutral,
    Accent,
}

/// A normalized color token with its frequency and brightness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorEntry {
    /// Canonical form, e.g. "#ff0000" or "rgba(0, 0, 0, 0.5)".
    pub value: String,
    pub count: usize,
    /// Luminance in [0, 1]; 0.5 when the token did not parse to RGB.
    pub brightness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ColorRole>,
}

/// A font family with its frequency. Generic keywords are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontEntry {
    pub family: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<ColorEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fonts: Vec<FontEntry>,
}

/// Complete style model for one analyzed page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleModel {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layout_rules: Vec<StyleRule>,
    /// Rules grouped by component kind name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub component_rules: BTreeMap<String, Vec<StyleRule>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_rules: Vec<StyleRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unclassified_rules: Vec<StyleRule>,
    /// Aggregate rule/selector counts per source file.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub file_stats: BTreeMap<String, FileRuleStats>,
    pub palette: Palette,
}

impl StyleModel {
    /// Total number of rules across every bucket, unclassified included.
    pub fn total_rules(&self) -> usize {
        self.layout_rules.len()
            + self
                .component_rules
                .values()
                .map(|rules| rules.len())
                .sum::<usize>()
            + self.global_rules.len()
            + self.unclassified_rules.len()
    }
}
