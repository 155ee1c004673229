//! Proptest strategies for convkit property-based testing
//!
//! This module provides reusable proptest strategies for generating inputs
//! across all convkit crates.

pub mod strategies;

pub use strategies::{
    strategy_ascii_text, strategy_bytes, strategy_date_range, strategy_hex_string,
    strategy_naive_date, strategy_non_empty_string, strategy_shift, strategy_text,
};
