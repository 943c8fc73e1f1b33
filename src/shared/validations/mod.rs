use once_cell::sync::Lazy;
use regex::Regex;

/// Letters, digits, underscores and hyphens.
pub static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern compiles"));

static DASH_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("dash pattern compiles"));

pub const SLUG_MAX_LEN: u64 = 50;

pub fn is_valid_slug(value: &str) -> bool {
    SLUG_RE.is_match(value)
}

/// Derive a URL-safe slug from a display name.
///
/// Non-ASCII characters are dropped, the rest is lowercased, anything that
/// is not alphanumeric, underscore, hyphen or whitespace is removed, and runs
/// of whitespace/hyphens collapse into a single hyphen. Leading and trailing
/// hyphens and underscores are trimmed.
pub fn slugify(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_ascii())
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    DASH_RUN_RE
        .replace_all(kept.trim(), "-")
        .trim_matches(|c| c == '-' || c == '_')
        .to_string()
}
