//! Style analysis: CSS rule classification and palette extraction.

mod palette;
mod rules;

#[cfg(test)]
mod tests;

pub use palette::PaletteExtractor;
pub use rules::{ClassifiedRules, CssParseStrategy, RawRule, StyleRuleClassifier};
