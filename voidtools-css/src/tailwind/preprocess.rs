//! Normalizes CSS pasted from design tools before it reaches the converter.

use crate::config::DEFAULT_WRAPPER_SELECTOR;
use regex::Regex;
use std::sync::OnceLock;

/// Properties whose bare numbers are meaningful without a unit.
const UNITLESS_PROPERTIES: &[&str] = &[
    "opacity",
    "z-index",
    "flex-grow",
    "flex-shrink",
    "order",
    "line-height",
    "font-weight",
];

/// Declarations design tools export that only restate the browser default.
fn default_declaration_regex() -> &'static Regex {
    static DEFAULTS_REGEX: OnceLock<Regex> = OnceLock::new();
    DEFAULTS_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(font-style:\s*normal|font-weight:\s*400|position:\s*static|border:\s*none|box-sizing:\s*border-box|background:\s*transparent)\s*;?\s*$",
        )
        .unwrap()
    })
}

fn bare_number_regex() -> &'static Regex {
    static BARE_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    BARE_NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"^(\s*)([A-Za-z-]+)\s*:\s*(-?\d*\.?\d+)\s*;\s*$").unwrap()
    })
}

/// Cleans up a CSS paste using the default wrapper selector.
pub fn fix_figma_css(raw: &str) -> String {
    fix_figma_css_with(raw, DEFAULT_WRAPPER_SELECTOR)
}

/// Cleans up a CSS paste:
/// - drops no-op default declarations (`font-weight: 400`, `position: static`, ...)
/// - appends `px` to bare non-zero numbers, except for unitless properties
/// - removes blank lines
/// - wraps bare declaration lists in `wrapper_selector { ... }`
pub fn fix_figma_css_with(raw: &str, wrapper_selector: &str) -> String {
    let body = raw
        .lines()
        .filter(|line| !default_declaration_regex().is_match(line))
        .map(add_missing_px)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if raw.contains('{') {
        body
    } else {
        format!("{} {{\n{}\n}}", wrapper_selector, body)
    }
}

fn add_missing_px(line: &str) -> String {
    let Some(caps) = bare_number_regex().captures(line) else {
        return line.to_string();
    };

    let property = caps[2].to_ascii_lowercase();
    let number = &caps[3];
    if UNITLESS_PROPERTIES.contains(&property.as_str()) {
        return line.to_string();
    }
    // `0` needs no unit.
    if number.parse::<f64>().map(|n| n == 0.0).unwrap_or(true) {
        return line.to_string();
    }

    format!("{}{}: {}px;", &caps[1], &caps[2], number)
}
