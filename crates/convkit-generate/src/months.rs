//! Random month names.

use crate::draw;
use chrono::Month;
use convkit_error::Result;
use convkit_random::RandomSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthStyle {
    /// `January`
    #[default]
    Full,
    /// `Jan`
    Short,
    /// `01`
    Number,
}

impl MonthStyle {
    pub fn render(&self, month: Month) -> String {
        match self {
            MonthStyle::Full => month.name().to_string(),
            MonthStyle::Short => month.name()[..3].to_string(),
            MonthStyle::Number => format!("{:02}", month.number_from_month()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthOptions {
    pub style: MonthStyle,
    pub unique: bool,
}

pub fn months(rng: &mut RandomSource, count: usize, opts: &MonthOptions) -> Result<Vec<String>> {
    let pool: Vec<String> = (1..=12u8)
        .filter_map(|n| Month::try_from(n).ok())
        .map(|m| opts.style.render(m))
        .collect();
    tracing::debug!(count, ?opts, "generate months");
    draw(rng, &pool, count, opts.unique)
}
