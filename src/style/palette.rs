//! Color and font palette extraction from raw CSS text.

use std::collections::HashMap;

use regex::Regex;

use crate::diagnostics::Diagnostics;
use crate::types::{ColorEntry, ColorRole, FontEntry, Palette};

const STAGE: &str = "palette";

/// Font-family keywords that are not real families.
const GENERIC_FONTS: &[&str] = &["inherit", "initial", "sans-serif", "serif", "monospace"];

/// Colors classified below this channel spread are neutral (grayish).
const NEUTRAL_SPREAD: i32 = 30;

/// Similarity grouping kicks in only below this many distinct colors.
const GROUPING_THRESHOLD: usize = 5;

/// RGB channels are bucketed by this divisor when grouping near-identical
/// shades.
const BUCKET_SIZE: u32 = 20;

pub struct PaletteExtractor {
    hex: Regex,
    rgb: Regex,
    hsl: Regex,
    font_family: Regex,
}

impl PaletteExtractor {
    pub fn new() -> Self {
        Self {
            hex: Regex::new(r"#[0-9a-fA-F]{3,8}").expect("static pattern"),
            rgb: Regex::new(r"(?i)rgba?\([^)]+\)").expect("static pattern"),
            hsl: Regex::new(r"(?i)hsla?\([^)]+\)").expect("static pattern"),
            font_family: Regex::new(r"(?i)font-family\s*:\s*([^;}]+)").expect("static pattern"),
        }
    }

    /// Extract the palette from the concatenated CSS text of all files.
    pub fn extract(&self, css: &str, diag: &mut Diagnostics) -> Palette {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for pattern in [&self.hex, &self.rgb, &self.hsl] {
            for m in pattern.find_iter(css) {
                if let Some(canonical) = normalize_color(m.as_str()) {
                    *counts.entry(canonical).or_insert(0) += 1;
                }
            }
        }

        let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
        // Frequency order, value as tie-break, so output is deterministic.
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        if entries.len() < GROUPING_THRESHOLD && entries.len() > 1 {
            entries = group_similar(entries);
        }

        let unparseable = entries
            .iter()
            .filter(|(value, _)| parse_rgb(value).is_none())
            .count();
        if unparseable > 0 {
            diag.info(
                STAGE,
                format!("{} color token(s) did not parse to RGB", unparseable),
            );
        }

        let colors = classify_colors(entries);
        let fonts = self.extract_fonts(css);
        Palette { colors, fonts }
    }

    fn extract_fonts(&self, css: &str) -> Vec<FontEntry> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for caps in self.font_family.captures_iter(css) {
            for token in caps[1].split(',') {
                let family = token.trim().trim_matches(|c| c == '"' || c == '\'').trim();
                if family.is_empty() || GENERIC_FONTS.contains(&family.to_lowercase().as_str()) {
                    continue;
                }
                *counts.entry(family.to_string()).or_insert(0) += 1;
            }
        }
        let mut fonts: Vec<FontEntry> = counts
            .into_iter()
            .map(|(family, count)| FontEntry { family, count })
            .collect();
        fonts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.family.cmp(&b.family)));
        fonts
    }
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical string form: lowercase, single-spaced function arguments.
/// Returns `None` for hex tokens with an invalid digit count.
fn normalize_color(raw: &str) -> Option<String> {
    let lower = raw.trim().to_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        if !matches!(hex.len(), 3 | 4 | 6 | 8) {
            return None;
        }
        return Some(lower);
    }
    let open = lower.find('(')?;
    let close = lower.rfind(')')?;
    let name = &lower[..open];
    let args = lower[open + 1..close]
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("{}({})", name, args))
}

/// Bucket near-identical shades and keep the most frequent literal per
/// bucket, summing counts. Unparseable tokens pass through untouched.
fn group_similar(entries: Vec<(String, usize)>) -> Vec<(String, usize)> {
    let mut bucket_order: Vec<(u32, u32, u32)> = Vec::new();
    let mut buckets: HashMap<(u32, u32, u32), (String, usize)> = HashMap::new();
    let mut passthrough = Vec::new();

    for (value, count) in entries {
        let Some((r, g, b)) = parse_rgb(&value) else {
            passthrough.push((value, count));
            continue;
        };
        let key = (
            u32::from(r) / BUCKET_SIZE,
            u32::from(g) / BUCKET_SIZE,
            u32::from(b) / BUCKET_SIZE,
        );
        match buckets.get_mut(&key) {
            Some((_, total)) => *total += count,
            None => {
                // Entries arrive most-frequent first, so the first literal
                // seen is the bucket representative.
                bucket_order.push(key);
                buckets.insert(key, (value, count));
            }
        }
    }

    let mut out: Vec<(String, usize)> = bucket_order
        .into_iter()
        .map(|key| buckets.remove(&key).expect("bucket recorded"))
        .collect();
    out.extend(passthrough);
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Assign roles to the ten most frequent colors: first two primary, next
/// three secondary, the rest neutral or accent by channel spread.
fn classify_colors(entries: Vec<(String, usize)>) -> Vec<ColorEntry> {
    entries
        .into_iter()
        .enumerate()
        .map(|(idx, (value, count))| {
            let rgb = parse_rgb(&value);
            let brightness = rgb.map_or(0.5, |(r, g, b)| luminance(r, g, b));
            let role = if idx >= 10 {
                None
            } else if idx < 2 {
                Some(ColorRole::Primary)
            } else if idx < 5 {
                Some(ColorRole::Secondary)
            } else if rgb.map_or(false, |(r, g, b)| is_neutral(r, g, b)) {
                Some(ColorRole::Neutral)
            } else {
                Some(ColorRole::Accent)
            };
            ColorEntry {
                value,
                count,
                brightness,
                role,
            }
        })
        .collect()
}

fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0
}

fn is_neutral(r: u8, g: u8, b: u8) -> bool {
    let r = i32::from(r);
    let g = i32::from(g);
    let b = i32::from(b);
    (r - g).abs().max((r - b).abs()).max((g - b).abs()) < NEUTRAL_SPREAD
}

/// Parse a canonical color token to RGB. Alpha channels are ignored.
pub fn parse_rgb(value: &str) -> Option<(u8, u8, u8)> {
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    if value.starts_with("rgb") {
        let args = function_args(value)?;
        let r = parse_channel(args.first()?)?;
        let g = parse_channel(args.get(1)?)?;
        let b = parse_channel(args.get(2)?)?;
        return Some((r, g, b));
    }
    if value.starts_with("hsl") {
        let args = function_args(value)?;
        let h: f64 = args.first()?.trim_end_matches("deg").trim().parse().ok()?;
        let s: f64 = args.get(1)?.trim_end_matches('%').trim().parse().ok()?;
        let l: f64 = args.get(2)?.trim_end_matches('%').trim().parse().ok()?;
        return Some(hsl_to_rgb(h, s / 100.0, l / 100.0));
    }
    None
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    match hex.len() {
        3 | 4 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some((r * 17, g * 17, b * 17))
        }
        6 | 8 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

fn function_args(value: &str) -> Option<Vec<String>> {
    let open = value.find('(')?;
    let close = value.rfind(')')?;
    Some(
        value[open + 1..close]
            .split(',')
            .map(|s| s.trim().to_string())
            .collect(),
    )
}

fn parse_channel(arg: &str) -> Option<u8> {
    if let Some(percent) = arg.strip_suffix('%') {
        let value: f64 = percent.trim().parse().ok()?;
        return Some((value.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8);
    }
    let value: f64 = arg.trim().parse().ok()?;
    Some(value.clamp(0.0, 255.0).round() as u8)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
