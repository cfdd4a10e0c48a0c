//! Case and Diacritic Folding

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Trim, body-style and drivetrain words that follow the model name in
/// listings ("Octavia Combi RS 4x4"). Compared against whole folded tokens.
const TRIM_TOKENS: &[&str] = &[
    "combi", "kombi", "sedan", "hatchback", "liftback", "limousine", "variant", "avant",
    "estate", "sw", "scout", "rs", "vrs", "sportline", "style", "ambition", "active",
    "elegance", "laurin", "4x4", "4motion", "quattro", "xdrive", "facelift", "fl",
];

/// Fold text into its canonical comparison form.
///
/// Lowercases, decomposes canonically and drops combining marks, then trims.
/// `fold("  Škoda ") == "skoda"`.
pub fn fold(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    stripped.trim().to_string()
}

/// Fold and keep only alphanumeric characters
pub fn fold_compact(text: &str) -> String {
    fold(text).chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Folded model name with separators normalized and trim suffixes removed.
///
/// "Octavia-Combi RS" -> "octavia". A model made only of trim words is kept
/// whole so that "Scout" does not fold to nothing.
pub fn model_base(text: &str) -> String {
    let spaced: String = fold(text)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let tokens: Vec<&str> = spaced.split_whitespace().collect();

    let cut = tokens
        .iter()
        .position(|t| TRIM_TOKENS.contains(t))
        .unwrap_or(tokens.len());

    if cut == 0 {
        tokens.join(" ")
    } else {
        tokens[..cut].join(" ")
    }
}

/// Tolerant motor designator containment.
///
/// True when the compact fold of `candidate` contains the compact fold of
/// `filter`, or contains every whitespace-separated part of `filter`
/// ("TDI 2.0" matches a "2.0 TDI" filter). An empty filter matches anything.
pub fn motor_matches(candidate: &str, filter: &str) -> bool {
    let needle = fold_compact(filter);
    if needle.is_empty() {
        return true;
    }

    let haystack = fold_compact(candidate);
    if haystack.contains(&needle) {
        return true;
    }

    let parts: Vec<String> = filter
        .split_whitespace()
        .map(fold_compact)
        .filter(|p| !p.is_empty())
        .collect();

    parts.len() > 1 && parts.iter().all(|p| haystack.contains(p.as_str()))
}
