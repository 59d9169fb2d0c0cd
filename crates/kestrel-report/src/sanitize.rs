use lazy_static::lazy_static;
use regex::Regex;

/// Longest text a single worksheet cell accepts
pub const MAX_CELL_CHARS: usize = 32_767;

/// Written in place of text that could not be rendered
pub const PLACEHOLDER: &str = "[Content sanitization failed]";

const TRUNCATION_MARKER: &str = "... [truncated]";
const TRUNCATION_MARGIN: usize = 20;

lazy_static! {
    // Control characters and non-characters that are illegal in cell XML
    static ref ILLEGAL_CHARS: Regex =
        Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x{FFFE}\x{FFFF}]").unwrap();
}

/// Make free text safe to write into a worksheet cell
pub fn sanitize(value: &str) -> String {
    sanitize_with_limit(value, MAX_CELL_CHARS)
}

/// Strip illegal characters and cap the result at `max_chars`.
///
/// Oversized text is cut `TRUNCATION_MARGIN` characters short of the limit,
/// backed off to a word boundary when one lies in the last fifth, and marked.
pub fn sanitize_with_limit(value: &str, max_chars: usize) -> String {
    let cleaned = ILLEGAL_CHARS.replace_all(value, "");
    if cleaned.chars().count() <= max_chars {
        return cleaned.into_owned();
    }

    let cut: String = cleaned
        .chars()
        .take(max_chars.saturating_sub(TRUNCATION_MARGIN))
        .collect();

    let word_floor = max_chars as f64 * 0.8;
    let kept = match cut.rfind(' ') {
        Some(idx) if cut[..idx].chars().count() as f64 > word_floor => &cut[..idx],
        _ => cut.as_str(),
    };

    tracing::debug!(
        "Truncated cell text from {} to {} characters",
        cleaned.chars().count(),
        kept.chars().count()
    );

    format!("{}{}", kept, TRUNCATION_MARKER)
}

/// Shorten to `max_chars`, ending in `...` when anything was cut
pub fn ellipsize(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let kept: String = value.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
