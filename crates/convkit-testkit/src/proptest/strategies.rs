use chrono::NaiveDate;
use proptest::prelude::*;

// ============================================================================
// Base Strategies
// ============================================================================

/// Strategy for arbitrary byte buffers up to `max_len` bytes
pub fn strategy_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Strategy for arbitrary Unicode text, including multi-byte scalars
pub fn strategy_text() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..64).prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for printable ASCII text
pub fn strategy_ascii_text() -> impl Strategy<Value = String> {
    "[ -~]{0,128}"
}

/// Strategy for generating non-empty strings
pub fn strategy_non_empty_string() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,40}"
}

/// Strategy for even-length hex strings in mixed case
pub fn strategy_hex_string() -> impl Strategy<Value = String> {
    prop::collection::vec("[0-9a-fA-F]{2}", 0..64).prop_map(|pairs| pairs.concat())
}

/// Strategy for Caesar shifts, including negative and oversized values
pub fn strategy_shift() -> impl Strategy<Value = i32> {
    -1000i32..1000
}

// ============================================================================
// Date Strategies
// ============================================================================

/// Strategy for generating valid NaiveDate values
pub fn strategy_naive_date() -> impl Strategy<Value = NaiveDate> {
    // Dates from 1970-01-01 to roughly 2079
    (0u64..40_000).prop_map(|days| {
        NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .checked_add_days(chrono::Days::new(days))
            .unwrap()
    })
}

/// Strategy for generating valid date ranges (start <= end)
pub fn strategy_date_range() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (strategy_naive_date(), strategy_naive_date()).prop_map(|(d1, d2)| {
        if d1 <= d2 { (d1, d2) } else { (d2, d1) }
    })
}
