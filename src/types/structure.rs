//! Structural model: layout regions, components, interactive elements, meta.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which heuristic produced a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    TagName,
    IdPattern,
    ClassPattern,
    StructuralPosition,
}

/// Semantic classification of a page area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Header,
    Footer,
    Sidebar,
    MainContent,
    Section,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarPosition {
    Left,
    Right,
}

/// One classified layout region with its captured label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRegion {
    pub kind: RegionKind,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resolved only for sidebar regions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<SidebarPosition>,
    pub provenance: Provenance,
}

/// Page-level layout summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    /// Layout type tag, e.g. "sidebar-layout_flex" or "custom-layout".
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<LayoutRegion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<LayoutRegion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<LayoutRegion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_content: Option<LayoutRegion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<LayoutRegion>,
    /// Estimated column count of the first container-like element.
    pub columns: usize,
}

/// Detected reusable UI unit kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Card,
    Navigation,
    Form,
    Table,
    Button,
    Modal,
    Header,
    Footer,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Card => "card",
            ComponentKind::Navigation => "navigation",
            ComponentKind::Form => "form",
            ComponentKind::Table => "table",
            ComponentKind::Button => "button",
            ComponentKind::Modal => "modal",
            ComponentKind::Header => "header",
            ComponentKind::Footer => "footer",
        }
    }
}

/// A detected reusable component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub kind: ComponentKind,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Truncated markup of the first matching element.
    pub sample: String,
    /// How many structurally identical occurrences were grouped into this
    /// component. Always 1 for singleton kinds.
    pub count: usize,
    /// Joined "childTag:descendantCount" signature; cards only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub provenance: Provenance,
    /// `<li>` count for navigation components.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_items: Option<usize>,
    /// input/select/textarea count for form components.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_fields: Option<usize>,
    /// Row count for table components.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_rows: Option<usize>,
    /// Header cell count, falling back to the first row's `<td>` count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_columns: Option<usize>,
}

/// An event handler declared directly on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBinding {
    /// Event name without the "on" prefix, e.g. "click".
    pub event: String,
    /// Attribute value, recorded verbatim.
    pub handler: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonElement {
    pub tag: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventBinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputElement {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownElement {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// `<option>` count for native selects, 0 for styled dropdown divs.
    pub options: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveElements {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ButtonElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropdowns: Vec<DropdownElement>,
}

/// Best-effort AJAX endpoint detection from inline scripts. Heuristic by
/// construction; the method defaults to GET when the pattern carries no
/// method information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoint {
    pub method: String,
    pub url: String,
}

/// Page metadata extracted from the document head and inline scripts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta_tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stylesheets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_endpoints: Vec<ApiEndpoint>,
}

/// Complete structural model for one analyzed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralModel {
    pub layout: PageLayout,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    pub interactive: InteractiveElements,
    pub meta: PageMeta,
}
