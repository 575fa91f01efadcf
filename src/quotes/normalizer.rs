// WHY: single left-to-right scan with one parity counter per quote class
// Both classes are rewritten in the same pass since neither touches the other's characters

use super::QuoteClass;

/// Rewrite every quote into a directional curly quote chosen by position
///
/// Each double-quote variant (`"`, `“`, `”`) takes the next slot in the double
/// sequence; even slots open, odd slots close. Single quotes follow the same rule
/// on their own counter. Parity runs across the whole text, never per line.
///
/// Apostrophes (`don't`, `James'`) consume single-quote slots like any other `'`.
pub fn normalize_quotes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_quotes_into(text, &mut result);
    result
}

/// Normalize quotes into supplied buffer, clearing it first
/// WHY: callers holding a long-lived buffer skip the per-call allocation
pub fn normalize_quotes_into(text: &str, buffer: &mut String) {
    buffer.clear();
    // Curly quotes are 3 bytes in UTF-8, straight ones 1
    buffer.reserve(text.len());

    let mut double_slot = 0usize;
    let mut single_slot = 0usize;

    for ch in text.chars() {
        match QuoteClass::classify(ch) {
            Some(QuoteClass::Double) => {
                buffer.push(QuoteClass::Double.for_slot(double_slot));
                double_slot += 1;
            }
            Some(QuoteClass::Single) => {
                buffer.push(QuoteClass::Single.for_slot(single_slot));
                single_slot += 1;
            }
            None => buffer.push(ch),
        }
    }
}
