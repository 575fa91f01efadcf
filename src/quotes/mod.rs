// WHY: quote classification shared by the counter and the normalizer
// Both stay pure so callers can run them in any order or concurrently

pub mod counter;
pub mod normalizer;

pub use counter::{count_quotes, QuoteCategory, QuoteTally};
pub use normalizer::{normalize_quotes, normalize_quotes_into};

pub const STRAIGHT_DOUBLE: char = '"';
pub const STRAIGHT_SINGLE: char = '\'';
pub const LEFT_DOUBLE: char = '\u{201C}';
pub const RIGHT_DOUBLE: char = '\u{201D}';
pub const LEFT_SINGLE: char = '\u{2018}';
pub const RIGHT_SINGLE: char = '\u{2019}';

/// Quote class used for parity tracking
///
/// Every variant of a class (straight, opening, closing) occupies one slot
/// in that class's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteClass {
    Double,
    Single,
}

impl QuoteClass {
    /// Classify a character, returning `None` for anything that is not a quote
    pub fn classify(ch: char) -> Option<Self> {
        match ch {
            STRAIGHT_DOUBLE | LEFT_DOUBLE | RIGHT_DOUBLE => Some(Self::Double),
            STRAIGHT_SINGLE | LEFT_SINGLE | RIGHT_SINGLE => Some(Self::Single),
            _ => None,
        }
    }

    pub fn opening(self) -> char {
        match self {
            Self::Double => LEFT_DOUBLE,
            Self::Single => LEFT_SINGLE,
        }
    }

    pub fn closing(self) -> char {
        match self {
            Self::Double => RIGHT_DOUBLE,
            Self::Single => RIGHT_SINGLE,
        }
    }

    /// Directional quote for the slot at `index` (0-based, even opens)
    pub fn for_slot(self, index: usize) -> char {
        if index % 2 == 0 {
            self.opening()
        } else {
            self.closing()
        }
    }
}
