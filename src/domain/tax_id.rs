//! National tax id (11 digits, two check digits).
//!
//! Input may carry the usual `XXX.XXX.XXX-XX` mask; it is stripped to
//! digits before validation. Only the bare digits are ever stored.

/// Number of digits in a tax id.
pub const TAX_ID_LEN: usize = 11;

/// Removes every non-digit character.
#[must_use]
pub fn strip_mask(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Returns `true` if `input` (masked or not) is a valid tax id.
///
/// Rejects anything that is not exactly 11 digits, sequences of one
/// repeated digit, and ids whose check digits do not match.
#[must_use]
pub fn is_valid(input: &str) -> bool {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != TAX_ID_LEN || input.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    if digits.iter().all(|d| Some(d) == digits.first()) {
        return false;
    }

    let (Some(body), Some(&first), Some(&second)) =
        (digits.get(..9), digits.get(9), digits.get(10))
    else {
        return false;
    };

    let first_expected = check_digit(body, 10);
    if first != first_expected {
        return false;
    }

    let Some(body_with_first) = digits.get(..10) else {
        return false;
    };
    second == check_digit(body_with_first, 11)
}

/// Weighted mod-11 check digit. Weights run from `start_weight` down to 2.
fn check_digit(digits: &[u32], start_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=start_weight).rev())
        .map(|(d, w)| d * w)
        .sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

/// Formats stored digits as `XXX.XXX.XXX-XX` for display.
///
/// Shorter inputs are formatted progressively, the same way a typing mask
/// would render them.
#[must_use]
pub fn format_display(raw: &str) -> String {
    let digits = strip_mask(raw);
    let mut out = String::with_capacity(14);
    for (i, c) in digits.chars().take(TAX_ID_LEN).enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: [&str; 4] = ["52998224725", "11144477735", "39053344705", "12345678909"];

    #[test]
    fn accepts_known_valid_ids() {
        for id in VALID {
            assert!(is_valid(id), "{id} should be valid");
        }
    }

    #[test]
    fn accepts_masked_input() {
        assert!(is_valid("529.982.247-25"));
    }

    // Remainders 0 and 1 both yield check digit 0, so some ids have a
    // single-digit neighbour that also validates (see `check_digit_aliasing`).
    const NO_VALID_NEIGHBOURS: [&str; 5] = [
        "39825979194",
        "87623286030",
        "12904047980",
        "66697251085",
        "27346468627",
    ];

    #[test]
    fn rejects_any_single_digit_mutation() {
        for id in NO_VALID_NEIGHBOURS {
            assert!(is_valid(id));
            for pos in 0..TAX_ID_LEN {
                for replacement in '0'..='9' {
                    let mutated: String = id
                        .chars()
                        .enumerate()
                        .map(|(i, c)| if i == pos { replacement } else { c })
                        .collect();
                    if mutated != id {
                        assert!(!is_valid(&mutated), "{mutated} should be invalid");
                    }
                }
            }
        }
    }

    #[test]
    fn check_digit_aliasing() {
        assert!(is_valid("39053344705"));
        assert!(is_valid("49053344705"));
    }

    #[test]
    fn rejects_repeated_digits() {
        for d in '0'..='9' {
            let id: String = std::iter::repeat_n(d, TAX_ID_LEN).collect();
            assert!(!is_valid(&id));
        }
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!is_valid("5299822472"));
        assert!(!is_valid("529982247250"));
        assert!(!is_valid(""));
    }

    #[test]
    fn formats_for_display() {
        assert_eq!(format_display("52998224725"), "529.982.247-25");
        assert_eq!(format_display("5299"), "529.9");
        assert_eq!(strip_mask("529.982.247-25"), "52998224725");
    }
}
