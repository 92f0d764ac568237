//! Model types produced by the inference pipeline.
//!
//! Everything here is a plain tagged record: serde-derived, camelCase on the
//! wire, and round-trippable through JSON and YAML without loss. The models
//! are produced once per analysis run and treated as immutable by consumers.

mod structure;
mod style;

pub use structure::{
    ApiEndpoint, ButtonElement, Component, ComponentKind, DropdownElement, EventBinding,
    InputElement, InteractiveElements, LayoutRegion, PageLayout, PageMeta, Provenance, RegionKind,
    SidebarPosition, StructuralModel,
};
pub use style::{
    ColorEntry, ColorRole, FileRuleStats, FontEntry, Palette, RuleCategory, StyleModel, StyleRule,
};
