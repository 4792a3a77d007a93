//! Phone numbers: area code plus 8 or 9 digit subscriber number.

use super::tax_id::strip_mask;

/// Returns `true` when the digits of `input` number 10 or 11 and no
/// letters are mixed in.
#[must_use]
pub fn is_valid(input: &str) -> bool {
    if input.chars().any(char::is_alphabetic) {
        return false;
    }
    let digits = strip_mask(input);
    (10..=11).contains(&digits.len())
}

/// Formats stored digits as `(XX) XXXX-XXXX` or `(XX) XXXXX-XXXX`.
///
/// Partial input is formatted progressively, matching a typing mask.
#[must_use]
pub fn format_display(raw: &str) -> String {
    let digits = strip_mask(raw);
    let len = digits.len();
    let part = |from: usize, to: usize| digits.get(from..to.min(len)).unwrap_or_default();

    match len {
        0..=2 => digits.clone(),
        3..=7 => format!("({}) {}", part(0, 2), part(2, len)),
        8..=10 => format!("({}) {}-{}", part(0, 2), part(2, 6), part(6, len)),
        _ => format!("({}) {}-{}", part(0, 2), part(2, 7), part(7, 11)),
    }
}
