//! Report payloads and renderers.
//!
//! [`SiteReport`] is the versioned serialization surface: the analysis
//! models plus the run's diagnostics, rendered as JSON, YAML, or a Markdown
//! design document.

use std::fmt::Write as FmtWrite;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::pipeline::SiteAnalysis;
use crate::types::{Component, LayoutRegion, StructuralModel, StyleModel};

/// Schema version for report payloads.
pub const PAGESIFT_OUTPUT_VERSION: &str = "0.1.0";

/// Rule text samples rendered per component kind in the Markdown document.
const MAX_RULE_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteReport {
    pub version: String,
    /// URL the page was fetched from, or the local file path.
    pub source: String,
    pub structure: StructuralModel,
    pub style: StyleModel,
    /// Rendered diagnostics accumulated during the run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl SiteReport {
    pub fn new(source: impl Into<String>, analysis: SiteAnalysis, diag: &Diagnostics) -> Self {
        Self {
            version: PAGESIFT_OUTPUT_VERSION.to_string(),
            source: source.into(),
            structure: analysis.structure,
            style: analysis.style,
            diagnostics: diag.entries().iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render a human-readable design document.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let title = self
            .structure
            .meta
            .title
            .as_deref()
            .unwrap_or("Untitled page");
        let _ = writeln!(out, "# Design Document: {}\n", title);
        let _ = writeln!(out, "Source: {}\n", self.source);
        if let Some(description) = &self.structure.meta.description {
            let _ = writeln!(out, "> {}\n", description);
        }

        self.render_layout(&mut out);
        self.render_components(&mut out);
        self.render_interactive(&mut out);
        self.render_palette(&mut out);
        self.render_css_summary(&mut out);
        self.render_endpoints(&mut out);

        if !self.diagnostics.is_empty() {
            let _ = writeln!(out, "## Diagnostics\n");
            for entry in &self.diagnostics {
                let _ = writeln!(out, "- {}", entry);
            }
            out.push('\n');
        }
        out
    }

    fn render_layout(&self, out: &mut String) {
        let layout = &self.structure.layout;
        let _ = writeln!(out, "## Layout\n");
        let _ = writeln!(out, "- Type: `{}`", layout.kind);
        let _ = writeln!(out, "- Columns: {}", layout.columns);
        for (label, region) in [
            ("Header", layout.header.as_ref()),
            ("Footer", layout.footer.as_ref()),
            ("Sidebar", layout.sidebar.as_ref()),
            ("Main content", layout.main_content.as_ref()),
        ] {
            if let Some(region) = region {
                let _ = writeln!(out, "- {}: {}", label, describe_region(region));
            }
        }
        if !layout.sections.is_empty() {
            let _ = writeln!(out, "- Sections: {}", layout.sections.len());
        }
        out.push('\n');
    }

    fn render_components(&self, out: &mut String) {
        if self.structure.components.is_empty() {
            return;
        }
        let _ = writeln!(out, "## Components\n");
        for component in &self.structure.components {
            let _ = writeln!(out, "- {}", describe_component(component));
        }
        out.push('\n');
    }

    fn render_interactive(&self, out: &mut String) {
        let interactive = &self.structure.interactive;
        if interactive.buttons.is_empty()
            && interactive.inputs.is_empty()
            && interactive.dropdowns.is_empty()
        {
            return;
        }
        let _ = writeln!(out, "## Interactive Elements\n");
        let _ = writeln!(out, "- Buttons: {}", interactive.buttons.len());
        let _ = writeln!(out, "- Inputs: {}", interactive.inputs.len());
        let _ = writeln!(out, "- Dropdowns: {}", interactive.dropdowns.len());
        out.push('\n');
    }

    fn render_palette(&self, out: &mut String) {
        let palette = &self.style.palette;
        if palette.colors.is_empty() && palette.fonts.is_empty() {
            return;
        }
        let _ = writeln!(out, "## Palette\n");
        if !palette.colors.is_empty() {
            let _ = writeln!(out, "| Color | Role | Count | Brightness |");
            let _ = writeln!(out, "|-------|------|-------|------------|");
            for color in &palette.colors {
                let role = color
                    .role
                    .map(|r| format!("{:?}", r).to_lowercase())
                    .unwrap_or_else(|| "-".to_string());
                let _ = writeln!(
                    out,
                    "| `{}` | {} | {} | {:.2} |",
                    color.value, role, color.count, color.brightness
                );
            }
            out.push('\n');
        }
        if !palette.fonts.is_empty() {
            let families: Vec<&str> = palette
                .fonts
                .iter()
                .map(|f| f.family.as_str())
                .collect();
            let _ = writeln!(out, "Fonts: {}\n", families.join(", "));
        }
    }

    fn render_css_summary(&self, out: &mut String) {
        if self.style.total_rules() == 0 {
            return;
        }
        let _ = writeln!(out, "## CSS Summary\n");
        let _ = writeln!(out, "- Layout rules: {}", self.style.layout_rules.len());
        for (kind, rules) in &self.style.component_rules {
            let _ = writeln!(out, "- `{}` component rules: {}", kind, rules.len());
        }
        let _ = writeln!(out, "- Global rules: {}", self.style.global_rules.len());
        let _ = writeln!(
            out,
            "- Unclassified rules: {}",
            self.style.unclassified_rules.len()
        );
        for (file, stats) in &self.style.file_stats {
            let _ = writeln!(
                out,
                "- `{}`: {} rules, {} selectors",
                file, stats.rules, stats.selectors
            );
        }
        out.push('\n');

        for (kind, rules) in &self.style.component_rules {
            let _ = writeln!(out, "### `{}` rules\n", kind);
            let _ = writeln!(out, "```css");
            for rule in rules.iter().take(MAX_RULE_SAMPLES) {
                let _ = writeln!(out, "{}", rule.to_css());
            }
            let _ = writeln!(out, "```\n");
        }
    }

    fn render_endpoints(&self, out: &mut String) {
        let endpoints = &self.structure.meta.api_endpoints;
        if endpoints.is_empty() {
            return;
        }
        let _ = writeln!(out, "## API Endpoints\n");
        for endpoint in endpoints {
            let _ = writeln!(out, "- `{} {}`", endpoint.method, endpoint.url);
        }
        out.push('\n');
    }
}

fn describe_region(region: &LayoutRegion) -> String {
    let mut label = format!("`<{}>`", region.tag);
    if !region.classes.is_empty() {
        label.push_str(&format!(" .{}", region.classes.join(" .")));
    }
    if let Some(id) = &region.id {
        label.push_str(&format!(" #{}", id));
    }
    if let Some(position) = region.position {
        label.push_str(&format!(" ({:?})", position).to_lowercase());
    }
    label
}

fn describe_component(component: &Component) -> String {
    let mut label = format!("**{}** `<{}>`", component.kind.as_str(), component.tag);
    if component.count > 1 {
        label.push_str(&format!(" x{}", component.count));
    }
    if let Some(items) = component.nav_items {
        label.push_str(&format!(", {} items", items));
    }
    if let Some(fields) = component.form_fields {
        label.push_str(&format!(", {} fields", fields));
    }
    if let (Some(rows), Some(columns)) = (component.table_rows, component.table_columns) {
        label.push_str(&format!(", {}x{} cells", rows, columns));
    }
    label
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::pipeline::{analyze_page, PageData};

    fn sample_report() -> SiteReport {
        let mut css_files = BTreeMap::new();
        css_files.insert(
            "main.css".to_string(),
            ".btn { color: #ff0000; } body { font-family: Arial; }".to_string(),
        );
        let page = PageData {
            html: "<html><head><title>Shop</title></head><body>\
                <header>Example Shop header</header>\
                <main>Main content of the page</main>\
                <button class=\"btn\">Buy</button>\
                <footer>All rights reserved</footer>\
            </body></html>"
                .to_string(),
            base_url: "https://example.com/".to_string(),
            css_files,
        };
        let mut diag = Diagnostics::new();
        let analysis =
            analyze_page(&page, &AnalyzerConfig::default(), &mut diag).expect("analysis runs");
        SiteReport::new("https://example.com/", analysis, &diag)
    }

    #[test]
    fn json_report_carries_the_schema_version() {
        let report = sample_report();
        let json = report.to_json().expect("serialize report");
        assert!(json.contains(&format!("\"version\": \"{}\"", PAGESIFT_OUTPUT_VERSION)));
        assert!(json.contains("\"structure\""));
        assert!(json.contains("\"style\""));
    }

    #[test]
    fn json_report_round_trips_field_for_field() {
        let report = sample_report();
        let json = report.to_json().expect("serialize report");
        let back: SiteReport = serde_json::from_str(&json).expect("deserialize report");
        assert_eq!(back, report);
    }

    #[test]
    fn yaml_report_round_trips_field_for_field() {
        let report = sample_report();
        let yaml = report.to_yaml().expect("serialize report");
        let back: SiteReport = serde_yaml::from_str(&yaml).expect("deserialize report");
        assert_eq!(back, report);
    }

    #[test]
    fn markdown_document_lists_the_main_sections() {
        let report = sample_report();
        let markdown = report.to_markdown();
        assert!(markdown.starts_with("# Design Document: Shop"));
        assert!(markdown.contains("## Layout"));
        assert!(markdown.contains("## Palette"));
        assert!(markdown.contains("`#ff0000`"));
        assert!(markdown.contains("Fonts: Arial"));
    }

    #[test]
    fn markdown_document_includes_component_rule_text() {
        let markdown = sample_report().to_markdown();
        assert!(markdown.contains("### `button` rules"));
        assert!(markdown.contains("```css"));
        assert!(markdown.contains(".btn {\n  color: #ff0000;\n}"));
    }
}
