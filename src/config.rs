use serde::Deserialize;

/// Tuning knobs for the inference pipeline. Every documented heuristic
/// constant lives here so callers can override it; defaults match the
/// behavior described in the module docs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalyzerConfig {
    /// Minimum number of structurally identical card candidates before a
    /// `card` component is materialized.
    pub card_threshold: usize,
    /// Minimum text length for the positional header/footer fallback.
    pub min_region_text_len: usize,
    /// Number of leading characters of serialized sample HTML used as the
    /// dedup fingerprint.
    pub fingerprint_len: usize,
    /// Maximum number of generic `section` regions recorded.
    pub section_cap: usize,
    /// Caps on scanned interactive elements, in first-match order.
    pub max_buttons: usize,
    pub max_inputs: usize,
    pub max_dropdowns: usize,
    /// Upper bound on the estimated column count when no "col" classes are
    /// present.
    pub column_cap: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            card_threshold: 3,
            min_region_text_len: 10,
            fingerprint_len: 100,
            section_cap: 10,
            max_buttons: 20,
            max_inputs: 20,
            max_dropdowns: 10,
            column_cap: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnalyzerConfig;

    #[test]
    fn default_values_match_documented_constants() {
        let cfg = AnalyzerConfig::default();

        assert_eq!(cfg.card_threshold, 3);
        assert_eq!(cfg.min_region_text_len, 10);
        assert_eq!(cfg.fingerprint_len, 100);
        assert_eq!(cfg.section_cap, 10);
        assert_eq!(cfg.max_buttons, 20);
        assert_eq!(cfg.max_inputs, 20);
        assert_eq!(cfg.max_dropdowns, 10);
        assert_eq!(cfg.column_cap, 4);
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let cfg: AnalyzerConfig =
            toml::from_str("card-threshold = 2\nsection-cap = 5").expect("valid config");
        assert_eq!(cfg.card_threshold, 2);
        assert_eq!(cfg.section_cap, 5);
        assert_eq!(cfg.min_region_text_len, 10);
        assert_eq!(cfg.max_buttons, 20);
    }
}
