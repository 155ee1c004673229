//! Caesar shift cipher for convkit.
//!
//! Only ASCII letters are rotated; case is preserved and every other
//! character passes through untouched.

use serde::{Deserialize, Serialize};

const ALPHABET_LEN: i32 = 26;

/// Relative letter frequencies of English text, `a` to `z`.
const ENGLISH_FREQUENCIES: [f64; 26] = [
    0.08167, 0.01492, 0.02782, 0.04253, 0.12702, 0.02228, 0.02015, 0.06094, 0.06966, 0.00153,
    0.00772, 0.04025, 0.02406, 0.06749, 0.07507, 0.01929, 0.00095, 0.05987, 0.06327, 0.09056,
    0.02758, 0.00978, 0.02360, 0.00150, 0.01974, 0.00074,
];

/// A Caesar cipher with a fixed shift in `0..26`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caesar {
    shift: u8,
}

impl Caesar {
    /// Create a cipher; any shift is accepted and reduced modulo 26.
    pub fn new(shift: i32) -> Self {
        Self {
            shift: shift.rem_euclid(ALPHABET_LEN) as u8,
        }
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }

    pub fn encrypt(&self, text: &str) -> String {
        tracing::debug!(shift = self.shift, len = text.len(), "caesar encrypt");
        rotate(text, self.shift)
    }

    pub fn decrypt(&self, text: &str) -> String {
        tracing::debug!(shift = self.shift, len = text.len(), "caesar decrypt");
        rotate(text, (26 - self.shift) % 26)
    }
}

impl Default for Caesar {
    /// The classical shift of three.
    fn default() -> Self {
        Self::new(3)
    }
}

fn rotate(text: &str, shift: u8) -> String {
    text.chars()
        .map(|c| match c {
            'a'..='z' => (b'a' + (c as u8 - b'a' + shift) % 26) as char,
            'A'..='Z' => (b'A' + (c as u8 - b'A' + shift) % 26) as char,
            _ => c,
        })
        .collect()
}

/// ROT13, its own inverse
pub fn rot13(text: &str) -> String {
    rotate(text, 13)
}

/// Every decryption with shifts 1 to 25
pub fn brute_force(text: &str) -> Vec<(u8, String)> {
    (1..26u8)
        .map(|shift| (shift, Caesar::new(shift as i32).decrypt(text)))
        .collect()
}

/// The decryption whose letter distribution looks most like English.
///
/// Returns the shift that was undone and the plaintext, or `None` if the
/// text has no ASCII letters.
pub fn crack(text: &str) -> Option<(u8, String)> {
    if !text.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let best = (0..26u8)
        .map(|shift| {
            let candidate = Caesar::new(shift as i32).decrypt(text);
            let score = chi_squared(&candidate);
            (shift, candidate, score)
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))?;
    tracing::debug!(shift = best.0, score = best.2, "caesar crack");
    Some((best.0, best.1))
}

/// Chi-squared distance between the letter counts of `text` and English.
fn chi_squared(text: &str) -> f64 {
    let mut counts = [0usize; 26];
    let mut total = 0usize;
    for c in text.chars().filter(char::is_ascii_alphabetic) {
        counts[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1;
        total += 1;
    }
    counts
        .iter()
        .zip(ENGLISH_FREQUENCIES)
        .map(|(&observed, frequency)| {
            let expected = frequency * total as f64;
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum()
}
