//! Random test data generators for convkit.
//!
//! Every generator draws from a caller-owned [`RandomSource`] and returns
//! `count` values as strings, with `count` limited to
//! `1..=`[`MAX_COUNT`](convkit_random::MAX_COUNT).

pub mod choices;
pub mod date;
pub mod ip;
pub mod letters;
pub mod months;

pub use choices::{ChoiceOptions, choices};
pub use date::{DateOptions, dates};
pub use ip::{IpKind, IpOptions, ip_addresses, is_public_v4, is_public_v6};
pub use letters::{LetterCase, LetterOptions, letters};
pub use months::{MonthOptions, MonthStyle, months};

use convkit_error::{Result, invalid_option};
use convkit_random::{RandomSource, check_count};

/// Draw `count` entries from `pool`. Without `unique`, entries may repeat.
pub(crate) fn draw(
    rng: &mut RandomSource,
    pool: &[String],
    count: usize,
    unique: bool,
) -> Result<Vec<String>> {
    check_count(count)?;
    if pool.is_empty() {
        return Err(invalid_option("choices", "nothing to pick from"));
    }
    if unique {
        if count > pool.len() {
            return Err(invalid_option(
                "count",
                format!(
                    "only {} unique values are available, {count} requested",
                    pool.len()
                ),
            ));
        }
        return Ok(rng.sample(pool, count).into_iter().cloned().collect());
    }
    Ok((0..count)
        .map(|_| pool[rng.index(pool.len())].clone())
        .collect())
}
