use once_cell::sync::Lazy;
use regex::Regex;

// @module: SRT line classification

// @const: SRT timestamp-range regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2},\d{3}\s-->\s\d{2}:\d{2}:\d{2},\d{3}$").unwrap()
});

// @const: bare sequence-index regex
static INDEX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// Decide whether a line carries dialogue that should be sent for translation.
///
/// Structural SRT lines never qualify: blank separators, bare sequence-index
/// lines (digits only) and timestamp ranges (`HH:MM:SS,mmm --> HH:MM:SS,mmm`).
/// Everything else is translatable content.
pub fn is_translatable(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    !INDEX_REGEX.is_match(trimmed) && !TIMESTAMP_REGEX.is_match(trimmed)
}

/// Check whether a line is an SRT timestamp range
pub fn is_timestamp_line(line: &str) -> bool {
    TIMESTAMP_REGEX.is_match(line.trim())
}

/// Check whether a line is a bare SRT sequence index
pub fn is_index_line(line: &str) -> bool {
    INDEX_REGEX.is_match(line.trim())
}
