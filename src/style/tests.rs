use std::collections::BTreeMap;

use crate::config::AnalyzerConfig;
use crate::diagnostics::Diagnostics;
use crate::dom::DocumentModel;
use crate::types::{ColorRole, RuleCategory};

use super::{CssParseStrategy, PaletteExtractor, StyleRuleClassifier};

#[test]
fn btn_rules_land_in_button_component_bucket() {
    let css = ".btn { color: #FF0000; }\n.btn:hover { color: #FF0000; }";
    let out = classify_one("main.css", css, "<html><body><a class='btn'>Go</a></body></html>");

    let buttons = out.component_rules.get("button").expect("button bucket");
    assert_eq!(buttons.len(), 2);
    assert!(buttons
        .iter()
        .all(|r| r.category == RuleCategory::Component("button".to_string())));
    assert!(out.layout_rules.is_empty());
}

#[test]
fn component_keyword_outranks_layout_keyword() {
    // "card-container" matches both tables; component wins.
    let out = classify_one(
        "main.css",
        ".card-container { display: flex; }",
        "<html><body></body></html>",
    );
    assert!(out.component_rules.contains_key("card"));
    assert!(out.layout_rules.is_empty());
}

#[test]
fn navigation_keyword_matches_suffixed_selectors() {
    let out = classify_one(
        "main.css",
        ".navigation { width: 200px; }\n.navbar { height: 60px; }",
        "<html><body></body></html>",
    );
    let nav = out.component_rules.get("navigation").expect("navigation bucket");
    assert_eq!(nav.len(), 2);
    assert!(out.unclassified_rules.is_empty());
}

#[test]
fn used_class_without_keyword_is_global() {
    let out = classify_one(
        "main.css",
        ".promo { color: blue; }\n.unused { color: red; }",
        "<html><body><div class='promo'>hi</div></body></html>",
    );
    assert_eq!(out.global_rules.len(), 1);
    assert_eq!(out.global_rules[0].selector, ".promo");
    assert_eq!(out.unclassified_rules.len(), 1);
}

#[test]
fn every_parsed_rule_lands_in_exactly_one_bucket() {
    let css = ".container { width: 90%; }\n.btn { color: red; }\n.promo { color: blue; }\nh1 { margin: 0; }";
    let out = classify_one(
        "main.css",
        css,
        "<html><body><div class='promo'>hi</div></body></html>",
    );
    let total = out.layout_rules.len()
        + out
            .component_rules
            .values()
            .map(|rules| rules.len())
            .sum::<usize>()
        + out.global_rules.len()
        + out.unclassified_rules.len();
    assert_eq!(total, 4);
    assert_eq!(out.file_stats.get("main.css").map(|s| s.rules), Some(4));
}

#[test]
fn relative_urls_resolve_against_base() {
    let css = ".hero { background: url('img/bg.png'); }";
    let doc = parse_doc("<html><body><div class='hero'></div></body></html>");
    let mut diag = Diagnostics::default();
    let classifier = StyleRuleClassifier::new(&AnalyzerConfig::default());
    let mut files = BTreeMap::new();
    files.insert("main.css".to_string(), css.to_string());
    let out = classifier.classify(&files, &doc, "https://example.com/site/", &mut diag);

    // "hero" hits no keyword table but the class is used.
    let rule = &out.global_rules[0];
    assert_eq!(
        rule.declarations[0].1,
        "url(https://example.com/site/img/bg.png)"
    );
}

#[test]
fn absolute_and_data_urls_are_left_alone() {
    let css = ".a { background: url(data:image/png;base64,AAAA); }\n.b { background: url(https://cdn.example.com/x.png); }";
    let doc = parse_doc("<html><body><p class='a b'>x</p></body></html>");
    let mut diag = Diagnostics::default();
    let classifier = StyleRuleClassifier::new(&AnalyzerConfig::default());
    let mut files = BTreeMap::new();
    files.insert("main.css".to_string(), css.to_string());
    let out = classifier.classify(&files, &doc, "https://example.com/", &mut diag);

    for rule in &out.global_rules {
        assert!(!rule.declarations[0].1.contains("example.com/data"));
        assert!(!rule.declarations[0].1.contains("example.com/https"));
    }
}

#[test]
fn tokenizer_descends_into_media_blocks() {
    let css = "@media (max-width: 600px) { .btn { color: red; } }\n.container { width: 100%; }";
    let classifier = StyleRuleClassifier::new(&AnalyzerConfig::default());
    let mut diag = Diagnostics::default();
    let rules = classifier.parse(css, &mut diag);
    let selectors: Vec<&str> = rules.iter().map(|r| r.selector.as_str()).collect();
    assert_eq!(selectors, vec![".btn", ".container"]);
}

#[test]
fn parse_strategies_agree_on_flat_css() {
    let css = ".a { color: red; }\n.b { margin: 0; padding: 1px; }";
    let mut diag = Diagnostics::default();
    let flat: Vec<_> = [
        CssParseStrategy::Tokenizer,
        CssParseStrategy::Simple,
        CssParseStrategy::RegexSplit,
    ]
    .into_iter()
    .map(|strategy| StyleRuleClassifier::with_strategy(strategy).parse(css, &mut diag))
    .collect();
    assert_eq!(flat[0], flat[1]);
    assert_eq!(flat[1], flat[2]);
    assert_eq!(flat[0].len(), 2);
}

#[test]
fn comments_and_import_statements_are_skipped() {
    let css = "/* banner */ @import url('other.css');\n.a { /* inline */ color: red; }";
    let classifier = StyleRuleClassifier::new(&AnalyzerConfig::default());
    let mut diag = Diagnostics::default();
    let rules = classifier.parse(css, &mut diag);
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].declarations, vec![("color".to_string(), "red".to_string())]);
}

#[test]
fn semicolons_inside_data_uris_do_not_split_declarations() {
    let css = ".a { background: url(data:image/png;base64,AAAA); color: red; }";
    let classifier = StyleRuleClassifier::new(&AnalyzerConfig::default());
    let mut diag = Diagnostics::default();
    let rules = classifier.parse(css, &mut diag);
    assert_eq!(rules[0].declarations.len(), 2);
}

#[test]
fn repeated_color_counts_accumulate() {
    let css = ".btn { color: #FF0000; }\n.btn:hover { border-color: #FF0000; }";
    let palette = extract_palette(css);
    assert_eq!(palette.colors.len(), 1);
    assert_eq!(palette.colors[0].value, "#ff0000");
    assert_eq!(palette.colors[0].count, 2);
    assert_eq!(palette.colors[0].role, Some(ColorRole::Primary));
}

#[test]
fn near_identical_shades_merge_when_palette_is_small() {
    let css = ".a { color: #0000ff; }\n.b { color: #0000ff; }\n.c { color: #0000fe; }";
    let palette = extract_palette(css);
    assert_eq!(palette.colors.len(), 1);
    assert_eq!(palette.colors[0].value, "#0000ff");
    assert_eq!(palette.colors[0].count, 3);
}

#[test]
fn large_palettes_keep_distinct_shades() {
    let css = ".a{color:#0000ff}.b{color:#0000fe}.c{color:#ff0000}.d{color:#00ff00}.e{color:#abcdef}";
    let palette = extract_palette(css);
    assert_eq!(palette.colors.len(), 5);
}

#[test]
fn grayish_tail_colors_are_neutral_and_vivid_ones_accent() {
    // Six distinct colors with descending frequency; the sixth lands in the
    // neutral-or-accent band.
    let css = "\
        .a{color:#111111;background:#111111;border-color:#111111;outline-color:#111111;}\
        .b{color:#222222;background:#222222;border-color:#222222;}\
        .c{color:#333333;background:#333333;}\
        .d{color:#444444;background:#444444;}\
        .e{color:#555555;background:#555555;}\
        .f{color:#ff00ff;}\
        .g{color:#808080;}";
    let palette = extract_palette(css);
    let vivid = palette
        .colors
        .iter()
        .find(|c| c.value == "#ff00ff")
        .expect("vivid color present");
    assert_eq!(vivid.role, Some(ColorRole::Accent));
    let gray = palette
        .colors
        .iter()
        .find(|c| c.value == "#808080")
        .expect("gray color present");
    assert_eq!(gray.role, Some(ColorRole::Neutral));
}

#[test]
fn rgb_and_hsl_forms_are_normalized_and_parsed() {
    let css = ".a { color: RGB(255, 0, 0); background: hsl(120, 100%, 50%); }";
    let palette = extract_palette(css);
    let values: Vec<&str> = palette.colors.iter().map(|c| c.value.as_str()).collect();
    assert!(values.contains(&"rgb(255, 0, 0)"));
    assert!(values.contains(&"hsl(120, 100%, 50%)"));
    for color in &palette.colors {
        assert!((0.0..=1.0).contains(&color.brightness));
    }
}

#[test]
fn brightness_matches_luminance_extremes() {
    let palette = extract_palette(".a { color: #000; background: #fff; border-color: #fff; }");
    let white = palette
        .colors
        .iter()
        .find(|c| c.value == "#fff")
        .expect("white present");
    let black = palette
        .colors
        .iter()
        .find(|c| c.value == "#000")
        .expect("black present");
    assert!((white.brightness - 1.0).abs() < 1e-9);
    assert!(black.brightness.abs() < 1e-9);
}

#[test]
fn font_families_counted_without_generics() {
    let css = "body { font-family: 'Open Sans', Arial, sans-serif; }\nh1 { font-family: Arial; }";
    let palette = extract_palette(css);
    let arial = palette
        .fonts
        .iter()
        .find(|f| f.family == "Arial")
        .expect("Arial present");
    assert_eq!(arial.count, 2);
    assert!(palette.fonts.iter().any(|f| f.family == "Open Sans"));
    assert!(!palette.fonts.iter().any(|f| f.family == "sans-serif"));
    assert_eq!(palette.fonts[0].family, "Arial");
}

fn parse_doc(html: &str) -> DocumentModel {
    DocumentModel::parse(html).expect("valid document")
}

fn classify_one(file: &str, css: &str, html: &str) -> super::ClassifiedRules {
    let doc = parse_doc(html);
    let mut diag = Diagnostics::default();
    let classifier = StyleRuleClassifier::new(&AnalyzerConfig::default());
    let mut files = BTreeMap::new();
    files.insert(file.to_string(), css.to_string());
    classifier.classify(&files, &doc, "https://example.com/", &mut diag)
}

fn extract_palette(css: &str) -> crate::types::Palette {
    let mut diag = Diagnostics::default();
    PaletteExtractor::new().extract(css, &mut diag)
}
