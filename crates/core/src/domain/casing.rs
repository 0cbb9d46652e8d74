// Casing Normalizer
//
// Route segments are kebab-case, generated TypeScript functions are camelCase.

use regex::Regex;
use std::sync::LazyLock;

/// Any char followed by a capitalized word: `getHTTPResponse` -> `getHTTP-Response`
static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid regex"));

/// Lowercase or digit followed by a capital: `getHTTP` -> `get-HTTP`
static LOWER_THEN_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid regex"));

static REPEATED_HYPHENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("-+").expect("valid regex"));

static REPEATED_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("_+").expect("valid regex"));

fn split_words(input: &str, separator: &str) -> String {
    let replacement = format!("${{1}}{separator}${{2}}");
    let first = CAPITALIZED_WORD.replace_all(input, replacement.as_str());
    LOWER_THEN_UPPER
        .replace_all(&first, replacement.as_str())
        .to_lowercase()
}

/// Convert an identifier to kebab-case (`getOutput` -> `get-output`)
pub fn to_kebab_case(input: &str) -> String {
    let words = split_words(input, "-").replace([' ', '_'], "-");
    REPEATED_HYPHENS.replace_all(&words, "-").into_owned()
}

/// Convert an identifier to snake_case (`getOutput` -> `get_output`)
pub fn to_snake_case(input: &str) -> String {
    let words = split_words(input, "_").replace([' ', '-'], "_");
    REPEATED_UNDERSCORES.replace_all(&words, "_").into_owned()
}

/// Convert an identifier to lowerCamelCase (`get-output` -> `getOutput`)
pub fn to_camel_case(input: &str) -> String {
    let kebab = to_kebab_case(input);
    let mut out = String::with_capacity(kebab.len());
    for (i, word) in kebab.split('-').filter(|w| !w.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Whether `input` is already a usable kebab-case identifier
///
/// Fixed point of [`to_kebab_case`], restricted to `[a-z0-9-]` with no
/// leading or trailing hyphen so it can be used verbatim as a URL segment.
pub fn is_kebab_case(input: &str) -> bool {
    !input.is_empty()
        && !input.starts_with('-')
        && !input.ends_with('-')
        && input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && to_kebab_case(input) == input
}
