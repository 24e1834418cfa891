//! Flattens converter output into a plain class list.

/// Utilities that restate the browser default and add nothing to the markup.
const DEFAULT_VALUE_CLASSES: &[&str] = &[
    "opacity-100",
    "tracking-normal",
    "tracking-[0]",
    "tracking-[0px]",
    "tracking-[0%]",
];

/// Reduces a converter rule such as
/// `.temp-wrapper { @apply flex p-4; cursor: grab; }` to `flex p-4`.
///
/// Raw declarations the converter could not translate are dropped, as are
/// default-value utilities. Duplicate classes are kept as emitted.
pub fn clean_up_output(raw: &str) -> String {
    let text = raw.replace("@apply ", "");
    let body = strip_wrapper(&text);

    let mut classes: Vec<&str> = Vec::new();
    for segment in body.split(';') {
        let segment = segment.trim();
        if segment.is_empty() || is_leftover_declaration(segment) {
            continue;
        }
        classes.extend(
            segment
                .split_whitespace()
                .filter(|class| !DEFAULT_VALUE_CLASSES.contains(class)),
        );
    }

    classes.join(" ")
}

/// Drops everything up to the first `{` and a trailing `}`.
fn strip_wrapper(text: &str) -> &str {
    let body = match text.find('{') {
        Some(open) => &text[open + 1..],
        None => text,
    };
    let trimmed = body.trim_end();
    trimmed.strip_suffix('}').unwrap_or(trimmed)
}

/// `true` when the segment has a `:` outside `[...]`, i.e. it reads as
/// `property: value` rather than a class like `top-[3px]` or `bg-[url(a:b)]`.
pub fn is_leftover_declaration(segment: &str) -> bool {
    let mut depth: i32 = 0;
    for ch in segment.chars() {
        match ch {
            '[' => depth += 1,
            ']' => depth -= 1,
            ':' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}
