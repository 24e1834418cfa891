//! Property coverage: which CSS properties does a class list address?
//!
//! Every utility class maps to the set of CSS properties it is understood to
//! set. The mapping is a fixed table of patterns; a class collects the
//! properties of *every* pattern it matches, so `border-red-500` covers
//! `border`, `border-width`, `border-color` and `border-style` at once.
//!
//! Coverage only checks that *some* class addresses a property. It does not
//! check that the value survived the conversion.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

/// Properties never reported as unsupported, covered or not.
const ALWAYS_SUPPORTED: &[&str] = &["src", "filter"];

struct CoverageRule {
    pattern: &'static str,
    /// Classes matching this are skipped even if `pattern` matches.
    exclude: Option<&'static str>,
    properties: &'static [&'static str],
}

const COLOR_VALUE_PATTERN: &str = r"^text-\[(#|rgba?\(|hsla?\(|color:)";

const PADDING: &[&str] = &[
    "padding",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
];
const MARGIN: &[&str] = &[
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
];
const BORDER_RADIUS: &[&str] = &[
    "border-radius",
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-right-radius",
    "border-bottom-left-radius",
];

const RULES: &[CoverageRule] = &[
    // ─── Typography ─────────────────────────────────────────────────────────
    CoverageRule {
        pattern: r"^font-(thin|extralight|light|normal|medium|semibold|bold|extrabold|black|\[\d+\])$",
        exclude: None,
        properties: &["font-weight"],
    },
    CoverageRule {
        pattern: r"^(italic|not-italic)$",
        exclude: None,
        properties: &["font-style"],
    },
    CoverageRule {
        pattern: r"^text-(left|center|right|justify|start|end)$",
        exclude: None,
        properties: &["text-align"],
    },
    CoverageRule {
        pattern: r"^text-(\[(#|rgba?\(|hsla?\(|color:).*\]|inherit|current|transparent|black|white|[a-z]+-\d{2,3}(/\d+)?)$",
        exclude: None,
        properties: &["color"],
    },
    CoverageRule {
        pattern: r"^text-(xs|sm|base|lg|xl|[2-9]xl|\[.+\])$",
        exclude: Some(COLOR_VALUE_PATTERN),
        properties: &["font-size"],
    },
    CoverageRule {
        pattern: r"^font-(sans|serif|mono|\['.+'\]|\[family-name:.+\])$",
        exclude: None,
        properties: &["font-family"],
    },
    CoverageRule {
        pattern: r"^leading-",
        exclude: None,
        properties: &["line-height"],
    },
    CoverageRule {
        pattern: r"^tracking-",
        exclude: None,
        properties: &["letter-spacing"],
    },
    CoverageRule {
        pattern: r"^align-",
        exclude: None,
        properties: &["vertical-align"],
    },
    CoverageRule {
        pattern: r"^decoration-",
        exclude: None,
        properties: &["text-decoration-color", "text-decoration-thickness"],
    },
    CoverageRule {
        pattern: r"^(underline|overline|line-through|no-underline)$",
        exclude: None,
        properties: &["text-decoration", "text-decoration-line"],
    },
    CoverageRule {
        pattern: r"^(uppercase|lowercase|capitalize|normal-case)$",
        exclude: None,
        properties: &["text-transform"],
    },
    // ─── Spacing & sizing ───────────────────────────────────────────────────
    CoverageRule {
        pattern: r"^p[xytrbl]?-.+$",
        exclude: None,
        properties: PADDING,
    },
    CoverageRule {
        pattern: r"^-?m[xytrbl]?-.+$",
        exclude: None,
        properties: MARGIN,
    },
    CoverageRule {
        pattern: r"^(w|min-w|max-w)-",
        exclude: None,
        properties: &["width", "min-width", "max-width"],
    },
    CoverageRule {
        pattern: r"^(h|min-h|max-h)-",
        exclude: None,
        properties: &["height", "min-height", "max-height"],
    },
    // ─── Flexbox & grid ─────────────────────────────────────────────────────
    CoverageRule {
        pattern: r"^flex(-.+)?$",
        exclude: None,
        properties: &["display", "flex-direction", "flex-wrap"],
    },
    CoverageRule {
        pattern: r"^grid(-.+)?$",
        exclude: None,
        properties: &["display", "grid-template-columns", "gap"],
    },
    CoverageRule {
        pattern: r"^gap-",
        exclude: None,
        properties: &["gap"],
    },
    CoverageRule {
        pattern: r"^-?order-",
        exclude: None,
        properties: &["order"],
    },
    CoverageRule {
        pattern: r"^justify-",
        exclude: None,
        properties: &["justify-content", "justify-items"],
    },
    CoverageRule {
        pattern: r"^items-",
        exclude: None,
        properties: &["align-items"],
    },
    CoverageRule {
        pattern: r"^self-",
        exclude: None,
        properties: &["align-self"],
    },
    CoverageRule {
        pattern: r"^content-",
        exclude: None,
        properties: &["align-content"],
    },
    // ─── Layout ─────────────────────────────────────────────────────────────
    CoverageRule {
        pattern: r"^-?(top|right|bottom|left|inset)-",
        exclude: None,
        properties: &["top", "right", "bottom", "left", "inset"],
    },
    CoverageRule {
        pattern: r"^-?z-",
        exclude: None,
        properties: &["z-index"],
    },
    CoverageRule {
        pattern: r"^(static|fixed|absolute|relative|sticky)$",
        exclude: None,
        properties: &["position"],
    },
    CoverageRule {
        pattern: r"^(block|inline|inline-block|inline-flex|inline-grid|hidden|contents|flow-root|list-item|table|table-.+)$",
        exclude: None,
        properties: &["display"],
    },
    // ─── Backgrounds, borders & effects ─────────────────────────────────────
    CoverageRule {
        pattern: r"^bg-",
        exclude: None,
        properties: &["background", "background-color", "background-image"],
    },
    CoverageRule {
        pattern: r"^rounded(-.+)?$",
        exclude: None,
        properties: BORDER_RADIUS,
    },
    CoverageRule {
        pattern: r"^border(-.+)?$",
        exclude: None,
        properties: &["border", "border-width", "border-color", "border-style"],
    },
    CoverageRule {
        pattern: r"^shadow(-.+)?$",
        exclude: None,
        properties: &["box-shadow"],
    },
    CoverageRule {
        pattern: r"^opacity-",
        exclude: None,
        properties: &["opacity"],
    },
    CoverageRule {
        pattern: r"^mix-blend-",
        exclude: None,
        properties: &["mix-blend-mode"],
    },
    CoverageRule {
        pattern: r"^blur(-.+)?$",
        exclude: None,
        properties: &["filter"],
    },
    CoverageRule {
        pattern: r"^cursor-",
        exclude: None,
        properties: &["cursor"],
    },
];

struct CompiledRule {
    pattern: Regex,
    exclude: Option<Regex>,
    properties: &'static [&'static str],
}

impl CompiledRule {
    fn matches(&self, class: &str) -> bool {
        self.pattern.is_match(class)
            && !self.exclude.as_ref().is_some_and(|ex| ex.is_match(class))
    }
}

fn compiled_rules() -> &'static [CompiledRule] {
    static COMPILED: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| CompiledRule {
                pattern: Regex::new(rule.pattern).unwrap(),
                exclude: rule.exclude.map(|ex| Regex::new(ex).unwrap()),
                properties: rule.properties,
            })
            .collect()
    })
}

/// Returns every CSS property `class` is understood to set. Unknown classes
/// map to the empty set.
pub fn classify(class: &str) -> HashSet<&'static str> {
    compiled_rules()
        .iter()
        .filter(|rule| rule.matches(class))
        .flat_map(|rule| rule.properties.iter().copied())
        .collect()
}

/// Union of [`classify`] over every whitespace-separated class in `output`.
pub fn covered_properties(output: &str) -> HashSet<&'static str> {
    output.split_whitespace().flat_map(classify).collect()
}

/// One `property: value;` line of the source CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub property: String,
    /// The line with comments stripped and surrounding whitespace trimmed.
    pub raw_line: String,
}

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_REGEX.get_or_init(|| Regex::new(r"/\*.*?\*/").unwrap())
}

// Mixed-case property names are accepted and lowercased.
fn property_regex() -> &'static Regex {
    static PROPERTY_REGEX: OnceLock<Regex> = OnceLock::new();
    PROPERTY_REGEX.get_or_init(|| Regex::new(r"^([A-Za-z-]+)\s*:").unwrap())
}

/// Splits CSS text into declarations, one per line. Lines that do not start
/// with `property:` (selectors, braces, blanks) are ignored.
///
/// Lines opening a block are skipped before the property match, so a pseudo
/// selector such as `a:hover {` is not read as property `a`.
pub fn parse_declarations(css: &str) -> Vec<Declaration> {
    css.lines()
        .filter_map(|line| {
            let line = comment_regex().replace_all(line, "");
            let line = line.trim();
            if line.contains('{') {
                return None;
            }
            let caps = property_regex().captures(line)?;
            Some(Declaration {
                property: caps[1].to_ascii_lowercase(),
                raw_line: line.to_string(),
            })
        })
        .collect()
}

/// Lists the source lines whose property no class in `output` covers,
/// in input order, duplicates included.
pub fn check_unsupported(preprocessed_css: &str, output: &str) -> Vec<String> {
    let covered = covered_properties(output);
    let declarations = parse_declarations(preprocessed_css);
    debug!(
        declarations = declarations.len(),
        covered = covered.len(),
        "checking property coverage"
    );

    declarations
        .into_iter()
        .filter(|decl| !ALWAYS_SUPPORTED.contains(&decl.property.as_str()))
        .filter(|decl| !covered.contains(decl.property.as_str()))
        .map(|decl| decl.raw_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sorted(class: &str) -> Vec<&'static str> {
        let mut props: Vec<_> = classify(class).into_iter().collect();
        props.sort_unstable();
        props
    }

    #[test]
    fn all_patterns_compile() {
        assert_eq!(compiled_rules().len(), RULES.len());
    }

    #[test]
    fn border_covers_whole_family() {
        assert_eq!(
            sorted("border-red-500"),
            vec!["border", "border-color", "border-style", "border-width"]
        );
        assert_eq!(sorted("border"), sorted("border-2"));
    }

    #[test]
    fn bare_flex_and_rounded_match() {
        assert!(classify("flex").contains("display"));
        assert!(classify("flex-col").contains("flex-direction"));
        assert!(classify("rounded").contains("border-radius"));
        assert!(classify("rounded-lg").contains("border-top-left-radius"));
    }

    #[test]
    fn text_color_versus_font_size() {
        assert_eq!(sorted("text-[#ff0000]"), vec!["color"]);
        assert_eq!(sorted("text-[rgb(0,0,0)]"), vec!["color"]);
        assert_eq!(sorted("text-[color:red]"), vec!["color"]);
        assert_eq!(sorted("text-red-500"), vec!["color"]);
        assert_eq!(sorted("text-white"), vec!["color"]);
        assert_eq!(sorted("text-[14px]"), vec!["font-size"]);
        assert_eq!(sorted("text-[length:12px]"), vec!["font-size"]);
        assert_eq!(sorted("text-2xl"), vec!["font-size"]);
        assert_eq!(sorted("text-center"), vec!["text-align"]);
    }

    #[test]
    fn font_weight_versus_family() {
        assert_eq!(sorted("font-bold"), vec!["font-weight"]);
        assert_eq!(sorted("font-[550]"), vec!["font-weight"]);
        assert_eq!(sorted("font-mono"), vec!["font-family"]);
        assert_eq!(sorted("font-['Inter']"), vec!["font-family"]);
    }

    #[test]
    fn spacing_prefixes() {
        assert!(classify("p-4").contains("padding"));
        assert!(classify("px-[13px]").contains("padding-left"));
        assert!(classify("-mt-2").contains("margin-top"));
        assert!(classify("mx-auto").contains("margin"));
        assert!(classify("mix-blend-multiply").contains("mix-blend-mode"));
        assert!(!classify("mix-blend-multiply").contains("margin"));
        assert!(!classify("max-w-md").contains("margin"));
        assert!(classify("max-w-md").contains("max-width"));
    }

    #[test]
    fn keyword_classes() {
        assert_eq!(sorted("absolute"), vec!["position"]);
        assert_eq!(sorted("hidden"), vec!["display"]);
        assert_eq!(sorted("uppercase"), vec!["text-transform"]);
        assert_eq!(sorted("italic"), vec!["font-style"]);
        assert_eq!(
            sorted("underline"),
            vec!["text-decoration", "text-decoration-line"]
        );
        assert_eq!(sorted("cursor-grab"), vec!["cursor"]);
        assert_eq!(sorted("-z-10"), vec!["z-index"]);
    }

    #[test]
    fn grid_and_effect_rules() {
        assert_eq!(sorted("grid"), vec!["display", "gap", "grid-template-columns"]);
        assert_eq!(sorted("grid-cols-3"), sorted("grid"));
        assert_eq!(sorted("blur"), vec!["filter"]);
        assert_eq!(sorted("blur-sm"), vec!["filter"]);
        assert_eq!(sorted("shadow"), vec!["box-shadow"]);
        assert_eq!(sorted("shadow-lg"), vec!["box-shadow"]);
        assert_eq!(sorted("shadow-none"), vec!["box-shadow"]);
    }

    #[test]
    fn decoration_inset_and_content_rules() {
        assert_eq!(
            sorted("decoration-red-500"),
            vec!["text-decoration-color", "text-decoration-thickness"]
        );
        assert_eq!(sorted("decoration-2"), sorted("decoration-red-500"));
        assert_eq!(
            sorted("inset-0"),
            vec!["bottom", "inset", "left", "right", "top"]
        );
        assert_eq!(sorted("-inset-x-2"), sorted("inset-0"));
        assert_eq!(sorted("content-center"), vec!["align-content"]);
    }

    #[test]
    fn unknown_class_covers_nothing() {
        assert!(classify("sr-only").is_empty());
        assert!(classify("grow").is_empty());
    }

    #[test]
    fn parses_declarations_and_strips_comments() {
        let css = ".a {\n  /* note */ color: red; /* brand */\n  Margin-Top : 4px;\n  a:hover {\n}";
        assert_eq!(
            parse_declarations(css),
            vec![
                Declaration {
                    property: "color".into(),
                    raw_line: "color: red;".into(),
                },
                Declaration {
                    property: "margin-top".into(),
                    raw_line: "Margin-Top : 4px;".into(),
                },
            ]
        );
    }

    #[test]
    fn selector_lines_are_not_declarations() {
        let css = "a:hover {\n  color: red;\n}\n.btn:focus-visible {\n  cursor: grab;\n}";
        let properties: Vec<_> = parse_declarations(css)
            .into_iter()
            .map(|decl| decl.property)
            .collect();
        assert_eq!(properties, vec!["color", "cursor"]);
        assert_eq!(check_unsupported(css, "text-[color:red]"), vec!["cursor: grab;"]);
    }

    #[test]
    fn reports_uncovered_lines_in_order() {
        let css = ".a {\ncursor: grab;\ncolor: red;\nwhite-space: nowrap;\ncursor: grab;\n}";
        assert_eq!(
            check_unsupported(css, "text-[color:red]"),
            vec!["cursor: grab;", "white-space: nowrap;", "cursor: grab;"]
        );
    }

    #[test]
    fn src_and_filter_never_reported() {
        let css = ".a {\nsrc: url(font.woff2);\nfilter: drop-shadow(0 0 2px red);\n}";
        assert!(check_unsupported(css, "").is_empty());
    }

    #[test]
    fn covered_properties_unions_all_classes() {
        let covered = covered_properties("flex p-4  text-[#ff0000]");
        for prop in ["display", "padding", "color", "flex-wrap"] {
            assert!(covered.contains(prop), "missing {prop}");
        }
    }
}
