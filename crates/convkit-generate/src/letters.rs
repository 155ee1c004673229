//! Random ASCII letters.

use crate::draw;
use convkit_error::Result;
use convkit_random::RandomSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterCase {
    #[default]
    Upper,
    Lower,
    Mixed,
}

impl LetterCase {
    fn alphabet(&self) -> Vec<String> {
        let upper = ('A'..='Z').map(String::from);
        let lower = ('a'..='z').map(String::from);
        match self {
            LetterCase::Upper => upper.collect(),
            LetterCase::Lower => lower.collect(),
            LetterCase::Mixed => upper.chain(lower).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterOptions {
    pub case: LetterCase,
    /// No letter appears twice
    pub unique: bool,
}

pub fn letters(rng: &mut RandomSource, count: usize, opts: &LetterOptions) -> Result<Vec<String>> {
    tracing::debug!(count, ?opts, "generate letters");
    draw(rng, &opts.case.alphabet(), count, opts.unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case() {
        let mut rng = RandomSource::seeded(1);
        let lower = LetterOptions {
            case: LetterCase::Lower,
            unique: false,
        };
        for l in letters(&mut rng, 100, &lower).unwrap() {
            assert_eq!(l.len(), 1);
            assert!(l.chars().all(|c| c.is_ascii_lowercase()));
        }
        for l in letters(&mut rng, 100, &LetterOptions::default()).unwrap() {
            assert!(l.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_unique_full_alphabet() {
        let mut rng = RandomSource::seeded(2);
        let opts = LetterOptions {
            case: LetterCase::Mixed,
            unique: true,
        };
        let mut out = letters(&mut rng, 52, &opts).unwrap();
        out.sort();
        out.dedup();
        assert_eq!(out.len(), 52);
    }

    #[test]
    fn test_unique_limit() {
        let mut rng = RandomSource::seeded(3);
        let opts = LetterOptions {
            case: LetterCase::Upper,
            unique: true,
        };
        assert!(letters(&mut rng, 26, &opts).is_ok());
        assert!(letters(&mut rng, 27, &opts).is_err());
    }
}
