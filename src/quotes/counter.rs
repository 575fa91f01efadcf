use serde::{Deserialize, Serialize};
use std::fmt;

use super::{LEFT_DOUBLE, LEFT_SINGLE, RIGHT_DOUBLE, RIGHT_SINGLE, STRAIGHT_DOUBLE, STRAIGHT_SINGLE};

/// One of the four reported quote categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteCategory {
    StraightDouble,
    StraightSingle,
    CurlyDouble,
    CurlySingle,
}

impl QuoteCategory {
    pub const ALL: [QuoteCategory; 4] = [
        QuoteCategory::StraightDouble,
        QuoteCategory::StraightSingle,
        QuoteCategory::CurlyDouble,
        QuoteCategory::CurlySingle,
    ];

    /// Human-readable label used in reports
    pub fn label(self) -> &'static str {
        match self {
            Self::StraightDouble => "Straight double quotes (\")",
            Self::StraightSingle => "Straight single quotes (')",
            Self::CurlyDouble => "Curly double quotes (\u{201C}\u{201D})",
            Self::CurlySingle => "Curly single quotes (\u{2018}\u{2019})",
        }
    }
}

impl fmt::Display for QuoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category quote counts for one piece of text
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteTally {
    pub straight_double: u64,
    pub straight_single: u64,
    /// Opening plus closing curly double quotes
    pub curly_double: u64,
    /// Opening plus closing curly single quotes
    pub curly_single: u64,
}

impl QuoteTally {
    pub fn get(&self, category: QuoteCategory) -> u64 {
        match category {
            QuoteCategory::StraightDouble => self.straight_double,
            QuoteCategory::StraightSingle => self.straight_single,
            QuoteCategory::CurlyDouble => self.curly_double,
            QuoteCategory::CurlySingle => self.curly_single,
        }
    }

    pub fn total_double(&self) -> u64 {
        self.straight_double + self.curly_double
    }

    pub fn total_single(&self) -> u64 {
        self.straight_single + self.curly_single
    }

    pub fn total(&self) -> u64 {
        self.total_double() + self.total_single()
    }

    pub fn has_straight(&self) -> bool {
        self.straight_double > 0 || self.straight_single > 0
    }

    /// All four categories in report order
    pub fn entries(&self) -> [(QuoteCategory, u64); 4] {
        QuoteCategory::ALL.map(|category| (category, self.get(category)))
    }

    /// Categories with at least one occurrence, in report order
    pub fn nonzero_entries(&self) -> Vec<(QuoteCategory, u64)> {
        self.entries()
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Tally straight and curly quotes in a single pass
pub fn count_quotes(text: &str) -> QuoteTally {
    let mut tally = QuoteTally::default();
    for ch in text.chars() {
        match ch {
            STRAIGHT_DOUBLE => tally.straight_double += 1,
            STRAIGHT_SINGLE => tally.straight_single += 1,
            LEFT_DOUBLE | RIGHT_DOUBLE => tally.curly_double += 1,
            LEFT_SINGLE | RIGHT_SINGLE => tally.curly_single += 1,
            _ => {}
        }
    }
    tally
}
