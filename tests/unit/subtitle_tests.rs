/*!
 * Tests for SRT line classification
 */

use subtrans::subtitle::{is_index_line, is_timestamp_line, is_translatable};

/// Test that dialogue lines are classified as translatable
#[test]
fn test_is_translatable_withDialogue_shouldReturnTrue() {
    assert!(is_translatable("Hello world"));
    assert!(is_translatable("- Where were you last night?"));
    assert!(is_translatable("<i>Previously on...</i>"));
    assert!(is_translatable("¿Qué pasa?"));
}

/// Test that structural lines are classified as non-translatable
#[test]
fn test_is_translatable_withStructuralLines_shouldReturnFalse() {
    assert!(!is_translatable(""));
    assert!(!is_translatable("   "));
    assert!(!is_translatable("12"));
    assert!(!is_translatable("00:01:02,003 --> 00:01:04,005"));
}

/// Test that dialogue starting with digits is still translatable
#[test]
fn test_is_translatable_withLeadingDigits_shouldReturnTrue() {
    assert!(is_translatable("2 years ago, everything changed."));
    assert!(is_translatable("3.14 is pi"));
}

/// Test timestamp detection edge cases
#[test]
fn test_is_timestamp_line_withVariants_shouldMatchStrictFormatOnly() {
    assert!(is_timestamp_line("00:00:01,000 --> 00:00:02,000"));
    assert!(!is_timestamp_line("00:00:01.000 --> 00:00:02.000"));
    assert!(!is_timestamp_line("00:00:01,000 --> "));
    assert!(!is_timestamp_line("timestamp: 00:00:01,000 --> 00:00:02,000"));
}

/// Test index detection
#[test]
fn test_is_index_line_withDigitsOnly_shouldReturnTrue() {
    assert!(is_index_line("1"));
    assert!(is_index_line("999"));
    assert!(!is_index_line("1a"));
    assert!(!is_index_line("-1"));
}
