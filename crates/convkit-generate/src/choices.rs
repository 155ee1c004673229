//! Random picks from a caller-supplied list.

use crate::draw;
use convkit_error::Result;
use convkit_random::RandomSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceOptions {
    pub unique: bool,
}

/// Pick `count` entries from `items`.
///
/// Entries are trimmed and blank ones dropped. With `unique`, duplicates in
/// the list count once.
pub fn choices<S: AsRef<str>>(
    rng: &mut RandomSource,
    items: &[S],
    count: usize,
    opts: &ChoiceOptions,
) -> Result<Vec<String>> {
    let mut pool: Vec<String> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if opts.unique {
        let mut seen = std::collections::HashSet::new();
        pool.retain(|s| seen.insert(s.clone()));
    }
    tracing::debug!(count, pool = pool.len(), unique = opts.unique, "generate choices");
    draw(rng, &pool, count, opts.unique)
}
