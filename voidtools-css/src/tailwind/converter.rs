//! The CSS-to-utility converter seam.
//!
//! The pipeline only needs something that turns a CSS rule into a rule whose
//! body is an `@apply` class list. [`RuleConverter`] is the built-in
//! implementation; [`FnConverter`] adapts any async closure, e.g. a call into
//! an out-of-process converter.

use crate::error::{ConvertError, ConvertResult};
use std::future::Future;

pub trait Converter: Send + Sync + 'static {
    /// Converts `css` into a utility-class rule.
    ///
    /// `Err(ConvertError::Syntax)` means the input was rejected;
    /// `Err(ConvertError::Transport)` means the call itself failed.
    fn convert(&self, css: &str) -> impl Future<Output = ConvertResult<String>> + Send;
}

/// Adapts an async closure into a [`Converter`].
pub struct FnConverter<F>(F);

impl<F> FnConverter<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F, Fut> Converter for FnConverter<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ConvertResult<String>> + Send,
{
    fn convert(&self, css: &str) -> impl Future<Output = ConvertResult<String>> + Send {
        (self.0)(css.to_string())
    }
}

/// Deterministic in-process converter.
///
/// Every declaration it recognises becomes one or more utility classes; the
/// rest are kept as raw `property: value;` lines inside the emitted rule, the
/// same shape third-party converters produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleConverter;

impl RuleConverter {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous conversion, used by the async [`Converter`] impl.
    pub fn convert_blocking(&self, css: &str) -> ConvertResult<String> {
        let rules = parse_rules(css)?;
        if rules.is_empty() {
            return Err(ConvertError::Syntax("no rule blocks found".to_string()));
        }

        let mut out = Vec::with_capacity(rules.len());
        for rule in rules {
            let mut classes: Vec<String> = Vec::new();
            let mut leftovers: Vec<String> = Vec::new();
            for (property, value) in &rule.declarations {
                match utilities_for(property, value) {
                    Some(mut found) => classes.append(&mut found),
                    None => leftovers.push(format!("{}: {};", property, value)),
                }
            }

            let mut block = format!("{} {{\n", rule.selector);
            if !classes.is_empty() {
                block.push_str("  @apply ");
                block.push_str(&classes.join(" "));
                block.push_str(";\n");
            }
            for leftover in leftovers {
                block.push_str("  ");
                block.push_str(&leftover);
                block.push('\n');
            }
            block.push('}');
            out.push(block);
        }

        Ok(out.join("\n"))
    }
}

impl Converter for RuleConverter {
    fn convert(&self, css: &str) -> impl Future<Output = ConvertResult<String>> + Send {
        std::future::ready(self.convert_blocking(css))
    }
}

// ─── Rule parsing ───────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
struct ParsedRule {
    selector: String,
    declarations: Vec<(String, String)>,
}

fn strip_comments(css: &str) -> ConvertResult<String> {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("*/")
            .ok_or_else(|| ConvertError::Syntax("unterminated comment".to_string()))?;
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn parse_rules(css: &str) -> ConvertResult<Vec<ParsedRule>> {
    let css = strip_comments(css)?;
    let mut rules = Vec::new();
    let mut rest = css.as_str();

    loop {
        let Some(open) = rest.find('{') else {
            if let Some(stray) = rest.trim().chars().next() {
                return Err(ConvertError::Syntax(format!(
                    "unexpected '{}' outside of a rule block",
                    stray
                )));
            }
            break;
        };

        let selector = rest[..open].trim();
        if selector.is_empty() {
            return Err(ConvertError::Syntax("rule block without a selector".to_string()));
        }
        if selector.contains('}') {
            return Err(ConvertError::Syntax("unexpected '}'".to_string()));
        }

        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| ConvertError::Syntax(format!("unclosed block for '{}'", selector)))?;
        let body = &after[..close];
        if body.contains('{') {
            return Err(ConvertError::Syntax(format!(
                "nested blocks are not supported in '{}'",
                selector
            )));
        }

        rules.push(ParsedRule {
            selector: selector.to_string(),
            declarations: parse_body(body)?,
        });
        rest = &after[close + 1..];
    }

    Ok(rules)
}

fn parse_body(body: &str) -> ConvertResult<Vec<(String, String)>> {
    let mut declarations = Vec::new();
    for segment in body.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (property, value) = segment.split_once(':').ok_or_else(|| {
            ConvertError::Syntax(format!("expected ':' in declaration '{}'", segment))
        })?;
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            return Err(ConvertError::Syntax(format!(
                "incomplete declaration '{}'",
                segment
            )));
        }
        declarations.push((property, value.to_string()));
    }
    Ok(declarations)
}

// ─── Declaration → utilities ────────────────────────────────────────────────

fn utilities_for(property: &str, value: &str) -> Option<Vec<String>> {
    if property == "border" {
        return border_shorthand(value);
    }
    utility_for(property, value).map(|class| vec![class])
}

fn utility_for(property: &str, value: &str) -> Option<String> {
    let lower = value.to_ascii_lowercase();
    let v = lower.as_str();
    match property {
        "display" => display(v),
        "position" => match v {
            "static" | "fixed" | "absolute" | "relative" | "sticky" => Some(v.to_string()),
            _ => None,
        },

        "padding" => spacing("p", value, false),
        "padding-top" => spacing("pt", value, false),
        "padding-right" => spacing("pr", value, false),
        "padding-bottom" => spacing("pb", value, false),
        "padding-left" => spacing("pl", value, false),
        "margin" => spacing("m", value, true),
        "margin-top" => spacing("mt", value, true),
        "margin-right" => spacing("mr", value, true),
        "margin-bottom" => spacing("mb", value, true),
        "margin-left" => spacing("ml", value, true),
        "gap" => spacing("gap", value, false),
        "top" | "right" | "bottom" | "left" | "inset" => spacing(property, value, true),

        "width" => sizing("w", value, "100vw"),
        "min-width" => sizing("min-w", value, "100vw"),
        "max-width" => sizing("max-w", value, "100vw"),
        "height" => sizing("h", value, "100vh"),
        "min-height" => sizing("min-h", value, "100vh"),
        "max-height" => sizing("max-h", value, "100vh"),

        "color" => color("text", value),
        "background-color" => color("bg", value),
        "background" | "background-image" if v.starts_with("url(") => {
            Some(format!("bg-[{}]", arbitrary(value)))
        }
        "background" => color("bg", value),

        "font-size" => font_size(v),
        "font-weight" => font_weight(v),
        "font-family" => font_family(value),
        "font-style" => match v {
            "italic" => Some("italic".to_string()),
            "normal" => Some("not-italic".to_string()),
            _ => None,
        },
        "line-height" => line_height(value),
        "letter-spacing" => match v {
            "normal" | "0em" => Some("tracking-normal".to_string()),
            _ => Some(format!("tracking-[{}]", arbitrary(value))),
        },
        "text-align" => match v {
            "left" | "center" | "right" | "justify" | "start" | "end" => {
                Some(format!("text-{}", v))
            }
            _ => None,
        },
        "text-transform" => match v {
            "uppercase" | "lowercase" | "capitalize" => Some(v.to_string()),
            "none" => Some("normal-case".to_string()),
            _ => None,
        },
        "text-decoration" | "text-decoration-line" => match v {
            "underline" | "overline" | "line-through" => Some(v.to_string()),
            "none" => Some("no-underline".to_string()),
            _ => None,
        },
        "vertical-align" => match v {
            "baseline" | "top" | "middle" | "bottom" | "text-top" | "text-bottom" | "sub"
            | "super" => Some(format!("align-{}", v)),
            _ => Some(format!("align-[{}]", arbitrary(value))),
        },

        "flex-direction" => match v {
            "row" => Some("flex-row".to_string()),
            "row-reverse" => Some("flex-row-reverse".to_string()),
            "column" => Some("flex-col".to_string()),
            "column-reverse" => Some("flex-col-reverse".to_string()),
            _ => None,
        },
        "flex-wrap" => match v {
            "wrap" | "nowrap" | "wrap-reverse" => Some(format!("flex-{}", v)),
            _ => None,
        },
        "justify-content" => match v {
            "flex-start" | "start" => Some("justify-start".to_string()),
            "flex-end" | "end" => Some("justify-end".to_string()),
            "center" | "stretch" => Some(format!("justify-{}", v)),
            "space-between" => Some("justify-between".to_string()),
            "space-around" => Some("justify-around".to_string()),
            "space-evenly" => Some("justify-evenly".to_string()),
            _ => None,
        },
        "align-items" => align("items", v),
        "align-self" => match v {
            "auto" => Some("self-auto".to_string()),
            _ => align("self", v),
        },
        "align-content" => match v {
            "space-between" => Some("content-between".to_string()),
            "space-around" => Some("content-around".to_string()),
            "space-evenly" => Some("content-evenly".to_string()),
            _ => align("content", v),
        },
        "order" => order(v),
        "z-index" => z_index(v),

        "border-width" => border_width(v),
        "border-style" => border_style(v),
        "border-color" => Some(format!("border-[{}]", arbitrary(value))),
        "border-radius" => border_radius(v),
        "box-shadow" => match v {
            "none" => Some("shadow-none".to_string()),
            _ => Some(format!("shadow-[{}]", arbitrary(value))),
        },
        "opacity" => opacity(v),
        "mix-blend-mode" => Some(format!("mix-blend-{}", v)),
        "filter" => {
            let inner = v.strip_prefix("blur(")?.strip_suffix(')')?;
            Some(format!("blur-[{}]", inner.trim()))
        }
        "cursor" => cursor(v),
        _ => None,
    }
}

/// Tailwind arbitrary values use `_` for spaces.
fn arbitrary(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Maps a length onto the 4px spacing scale when it lands on a step.
fn spacing_step(value: &str) -> Option<String> {
    if value == "0" || value == "0px" {
        return Some("0".to_string());
    }
    if value == "1px" {
        return Some("px".to_string());
    }
    let px: f64 = value.strip_suffix("px")?.parse().ok()?;
    let step = px / 4.0;
    let on_scale = (step * 2.0).fract() == 0.0 && (0.5..=96.0).contains(&step);
    if !on_scale {
        return None;
    }
    Some(if step.fract() == 0.0 {
        format!("{}", step as u32)
    } else {
        format!("{}", step)
    })
}

fn spacing(prefix: &str, value: &str, allow_negative: bool) -> Option<String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("auto") {
        return Some(format!("{}-auto", prefix));
    }
    if allow_negative {
        if let Some(positive) = value.strip_prefix('-') {
            if let Some(step) = spacing_step(positive) {
                return Some(format!("-{}-{}", prefix, step));
            }
        }
    }
    match spacing_step(value) {
        Some(step) => Some(format!("{}-{}", prefix, step)),
        None => Some(format!("{}-[{}]", prefix, arbitrary(value))),
    }
}

fn sizing(prefix: &str, value: &str, screen: &str) -> Option<String> {
    let value = value.trim();
    let keyword = match value.to_ascii_lowercase().as_str() {
        "100%" => Some("full"),
        "auto" => Some("auto"),
        "min-content" => Some("min"),
        "max-content" => Some("max"),
        "fit-content" => Some("fit"),
        "none" if prefix.starts_with("max-") => Some("none"),
        s if s == screen => Some("screen"),
        _ => None,
    };
    if let Some(keyword) = keyword {
        return Some(format!("{}-{}", prefix, keyword));
    }
    match spacing_step(value) {
        Some(step) => Some(format!("{}-{}", prefix, step)),
        None => Some(format!("{}-[{}]", prefix, arbitrary(value))),
    }
}

fn color(prefix: &str, value: &str) -> Option<String> {
    let v = value.trim();
    let keyword = match v.to_ascii_lowercase().as_str() {
        "transparent" => Some("transparent"),
        "currentcolor" => Some("current"),
        "inherit" => Some("inherit"),
        "black" | "#000" | "#000000" => Some("black"),
        "white" | "#fff" | "#ffffff" => Some("white"),
        _ => None,
    };
    if let Some(keyword) = keyword {
        return Some(format!("{}-{}", prefix, keyword));
    }

    let lower = v.to_ascii_lowercase();
    let is_explicit = lower.starts_with('#')
        || lower.starts_with("rgb")
        || lower.starts_with("hsl");
    if is_explicit {
        Some(format!("{}-[{}]", prefix, arbitrary(v)))
    } else if prefix == "text" {
        // `text-[red]` would read as a font size
        Some(format!("text-[color:{}]", arbitrary(v)))
    } else {
        Some(format!("{}-[{}]", prefix, arbitrary(v)))
    }
}

fn display(v: &str) -> Option<String> {
    let class = match v {
        "none" => "hidden",
        "block" | "inline" | "inline-block" | "flex" | "inline-flex" | "grid"
        | "inline-grid" | "contents" | "flow-root" | "list-item" | "table" => v,
        _ => return None,
    };
    Some(class.to_string())
}

fn font_size(v: &str) -> Option<String> {
    let named = match v {
        "12px" | "0.75rem" => Some("xs"),
        "14px" | "0.875rem" => Some("sm"),
        "16px" | "1rem" => Some("base"),
        "18px" | "1.125rem" => Some("lg"),
        "20px" | "1.25rem" => Some("xl"),
        "24px" | "1.5rem" => Some("2xl"),
        "30px" | "1.875rem" => Some("3xl"),
        "36px" | "2.25rem" => Some("4xl"),
        "48px" | "3rem" => Some("5xl"),
        "60px" | "3.75rem" => Some("6xl"),
        "72px" | "4.5rem" => Some("7xl"),
        "96px" | "6rem" => Some("8xl"),
        "128px" | "8rem" => Some("9xl"),
        _ => None,
    };
    match named {
        Some(size) => Some(format!("text-{}", size)),
        None => Some(format!("text-[{}]", arbitrary(v))),
    }
}

fn font_weight(v: &str) -> Option<String> {
    let named = match v {
        "100" => "thin",
        "200" => "extralight",
        "300" => "light",
        "400" | "normal" => "normal",
        "500" => "medium",
        "600" => "semibold",
        "700" | "bold" => "bold",
        "800" => "extrabold",
        "900" => "black",
        _ => {
            v.parse::<u32>().ok()?;
            return Some(format!("font-[{}]", v));
        }
    };
    Some(format!("font-{}", named))
}

fn font_family(value: &str) -> Option<String> {
    let first = value.split(',').next()?.trim();
    let name = first.trim_matches(|c: char| c == '"' || c == '\'');
    match name.to_ascii_lowercase().as_str() {
        "" => None,
        "sans-serif" | "system-ui" | "ui-sans-serif" => Some("font-sans".to_string()),
        "serif" | "ui-serif" => Some("font-serif".to_string()),
        "monospace" | "ui-monospace" => Some("font-mono".to_string()),
        _ => Some(format!("font-['{}']", arbitrary(name))),
    }
}

fn line_height(value: &str) -> Option<String> {
    let named = match value.trim() {
        "1" => Some("none"),
        "1.25" => Some("tight"),
        "1.375" => Some("snug"),
        "1.5" => Some("normal"),
        "1.625" => Some("relaxed"),
        "2" => Some("loose"),
        _ => None,
    };
    match named {
        Some(name) => Some(format!("leading-{}", name)),
        None => Some(format!("leading-[{}]", arbitrary(value))),
    }
}

fn align(prefix: &str, v: &str) -> Option<String> {
    match v {
        "flex-start" | "start" => Some(format!("{}-start", prefix)),
        "flex-end" | "end" => Some(format!("{}-end", prefix)),
        "center" | "baseline" | "stretch" => Some(format!("{}-{}", prefix, v)),
        _ => None,
    }
}

fn order(v: &str) -> Option<String> {
    let n: i32 = v.parse().ok()?;
    Some(match n {
        0 => "order-none".to_string(),
        1..=12 => format!("order-{}", n),
        -9999 => "order-first".to_string(),
        9999 => "order-last".to_string(),
        _ => format!("order-[{}]", n),
    })
}

fn z_index(v: &str) -> Option<String> {
    if v == "auto" {
        return Some("z-auto".to_string());
    }
    let n: i32 = v.parse().ok()?;
    Some(match n {
        0 | 10 | 20 | 30 | 40 | 50 => format!("z-{}", n),
        -50 | -40 | -30 | -20 | -10 => format!("-z-{}", -n),
        _ => format!("z-[{}]", n),
    })
}

fn border_width(v: &str) -> Option<String> {
    Some(match v {
        "1px" => "border".to_string(),
        "0" | "0px" => "border-0".to_string(),
        "2px" | "4px" | "8px" => format!("border-{}", v.trim_end_matches("px")),
        _ => format!("border-[{}]", arbitrary(v)),
    })
}

fn border_style(v: &str) -> Option<String> {
    match v {
        "solid" | "dashed" | "dotted" | "double" | "hidden" | "none" => {
            Some(format!("border-{}", v))
        }
        _ => None,
    }
}

fn is_length(token: &str) -> bool {
    token == "0"
        || token
            .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.')
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '%')
            && token.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

/// `border: 1px solid #e5e7eb` → `border border-solid border-[#e5e7eb]`.
fn border_shorthand(value: &str) -> Option<Vec<String>> {
    let mut classes = Vec::new();
    // Keep `rgb(1, 2, 3)` together.
    let mut tokens: Vec<String> = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in value.trim().chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    for token in tokens {
        let lower = token.to_ascii_lowercase();
        if is_length(&lower) {
            classes.push(border_width(&lower)?);
        } else if let Some(style) = border_style(&lower) {
            classes.push(style);
        } else {
            classes.push(format!("border-[{}]", arbitrary(&token)));
        }
    }

    if classes.is_empty() {
        None
    } else {
        Some(classes)
    }
}

fn border_radius(v: &str) -> Option<String> {
    let named = match v {
        "0" | "0px" => Some("rounded-none"),
        "2px" | "0.125rem" => Some("rounded-sm"),
        "4px" | "0.25rem" => Some("rounded"),
        "6px" | "0.375rem" => Some("rounded-md"),
        "8px" | "0.5rem" => Some("rounded-lg"),
        "12px" | "0.75rem" => Some("rounded-xl"),
        "16px" | "1rem" => Some("rounded-2xl"),
        "24px" | "1.5rem" => Some("rounded-3xl"),
        "9999px" => Some("rounded-full"),
        _ => None,
    };
    match named {
        Some(class) => Some(class.to_string()),
        None => Some(format!("rounded-[{}]", arbitrary(v))),
    }
}

fn opacity(v: &str) -> Option<String> {
    let n: f64 = v.parse().ok()?;
    let percent = n * 100.0;
    let rounded = percent.round();
    let on_scale = (percent - rounded).abs() < 1e-6 && (rounded as i64) % 5 == 0;
    if (0.0..=100.0).contains(&rounded) && on_scale {
        Some(format!("opacity-{}", rounded as u32))
    } else {
        Some(format!("opacity-[{}]", v))
    }
}

fn cursor(v: &str) -> Option<String> {
    const CURSORS: &[&str] = &[
        "auto",
        "default",
        "pointer",
        "wait",
        "text",
        "move",
        "help",
        "not-allowed",
        "none",
        "context-menu",
        "progress",
        "cell",
        "crosshair",
        "vertical-text",
        "alias",
        "copy",
        "no-drop",
        "grab",
        "grabbing",
        "all-scroll",
        "col-resize",
        "row-resize",
        "zoom-in",
        "zoom-out",
    ];
    if CURSORS.contains(&v) {
        Some(format!("cursor-{}", v))
    } else {
        None
    }
}
