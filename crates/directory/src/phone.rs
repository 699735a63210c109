//! Phone-number grammar.
//!
//! A number is accepted when it matches one of the fixed shapes below *and*
//! carries at most [`MAX_PHONE_DIGITS`] digits once every non-digit is
//! stripped. Segment separators are a space, hyphen or period and may differ
//! from segment to segment.
//!
//! The branches overlap (e.g. `011 701 111 1234` matches more than one), and a
//! few plausible `+CC (area)` spellings fall through every branch. That set of
//! accepted and rejected inputs is fixed; widen it deliberately or not at all.

use std::sync::LazyLock;

use regex::Regex;

/// ITU E.164 upper bound on the number of digits.
pub const MAX_PHONE_DIGITS: usize = 15;

static PHONE_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        // 12345 | 12345.12345
        r"[0-9]{5}|[0-9]{5}[-.\s][0-9]{5}",
        // 123-4567
        r"|[0-9]{3}[-.\s][0-9]{4}",
        // [+CC] [(]area[)] 123-4567
        r"|(?:\+?[1-9][0-9]{0,2})?\s?\(?[1-9][0-9]{1,2}\)?[-.\s]?[0-9]{3}[-.\s][0-9]{4}",
        // 011 1 703 111 1234
        r"|\+?[0-9]{1,3}[-.\s][0-9]{1,3}[-.\s][0-9]{3}[-.\s][0-9]{3}[-.\s][0-9]{4}",
        // 1234 5678
        r"|[0-9]{4}[-.\s][0-9]{4}",
        // 22 22 22 22
        r"|[0-9]{2}[-.\s][0-9]{2}[-.\s][0-9]{2}[-.\s][0-9]{2}",
        // +1 123 456 7890
        r"|\+?[0-9]{1,3}[-.\s][0-9]{3}[-.\s][0-9]{3}[-.\s][0-9]{4}",
        r")$",
    ))
    .expect("phone grammar is a valid regex")
});

/// Returns `true` when `s` is an acceptable phone number.
pub fn is_valid_phone(s: &str) -> bool {
    PHONE_GRAMMAR.is_match(s) && digit_count(s) <= MAX_PHONE_DIGITS
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(char::is_ascii_digit).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VALID: &[&str] = &[
        "12345",
        "(703)111-2121",
        "123-1234",
        "+1(703)111-2121",
        "+32 (21) 212-2324",
        "1(703)123-1234",
        "011 701 111 1234",
        "12345.12345",
        "011 1 703 111 1234",
        "22.22.22.22",
        "2222.2222",
        "111 111 1111",
        "(670)123-4567",
        "670-123-4567",
        "1-670-123-4567",
        "1(670)123-4567",
        "670 123 4567",
        "670.123.4567",
        "1 670 123 4567",
        "1.670.123.4567",
        "(123) 456-7890",
        "202.555.0188",
        "1-800-555-5555",
        "1 (800) 555-5555",
        "+1-800-555-5555",
        "+1 415-555-2671",
        "+1 (949) 555-2671",
        "+27 21 555 5555",
        "12345-12345",
        "+7 495 123-4567",
        "+1 212 555 1234",
    ];

    const INVALID: &[&str] = &[
        "123",
        "1/703/123/1234",
        "Nr 102-123-1234",
        "<script>alert(\"XSS\")</script>",
        "7031111234",
        "+1234 (201) 123-1234",
        "(001) 123-1234",
        "+01 (703) 123-1234",
        "(703) 123-1234 ext 204",
        "select * from users;",
        "12",
        "1234/567",
        "555-555-55555",
        "(123)-456-789",
        "+(123) 456-7890",
        "555-555-555a",
        "+123 (456) 789 12345",
        "01112345678901",
        "(000) 555-1234",
        "555*555*5555",
        "+1 (123) 555_1234",
        "(555)123-456",
        "123-1234-1234",
        "555 555 555",
        "555..555.5555",
        "555-555-5555 ext123456",
        "555-555-5555x",
        "(555) 555-5555 x99999",
        "+1-555-5555-1234",
        " ",
        "",
    ];

    #[test]
    fn accepts_valid_phone_corpus() {
        for phone in VALID {
            assert!(is_valid_phone(phone), "expected {phone:?} to be valid");
        }
    }

    #[test]
    fn rejects_invalid_phone_corpus() {
        for phone in INVALID {
            assert!(!is_valid_phone(phone), "expected {phone:?} to be invalid");
        }
    }

    #[test]
    fn digit_bound_applies_on_top_of_the_grammar() {
        // Matches the fully separated international shape with 16 digits.
        let phone = "123 456 789 123 4567";
        assert!(PHONE_GRAMMAR.is_match(phone));
        assert_eq!(digit_count(phone), 16);
        assert!(!is_valid_phone(phone));
    }

    #[test]
    fn digit_bound_allows_exactly_fifteen() {
        let phone = "123 45 789 123 4567";
        assert_eq!(digit_count(phone), 15);
        assert!(is_valid_phone(phone));
    }

    #[test]
    fn plus_with_wide_country_code_and_area_is_rejected() {
        // Looks plausible, but no branch admits a four-digit code before "(area)".
        assert!(!is_valid_phone("+1234 (201) 123-1234"));
    }

    #[test]
    fn non_ascii_digits_are_rejected() {
        assert!(!is_valid_phone("١٢٣-٤٥٦٧"));
    }

    #[test]
    fn information_separators_are_not_segment_separators() {
        assert!(is_valid_phone("123 4567"));
        for sep in ['\u{1c}', '\u{1d}', '\u{1e}', '\u{1f}'] {
            let phone = format!("123{sep}4567");
            assert!(!is_valid_phone(&phone), "expected {phone:?} to be invalid");
        }
    }

    #[test]
    fn rejects_trailing_newline() {
        assert!(!is_valid_phone("123-4567\n"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a letter anywhere in an otherwise valid local number is rejected.
        #[test]
        fn letters_are_rejected(
            prefix in "[0-9]{3}",
            letter in "[a-zA-Z]",
            suffix in "[0-9]{3}",
        ) {
            let candidate = format!("{prefix}-{letter}{suffix}");
            prop_assert!(!is_valid_phone(&candidate));
        }

        /// Property: any "NXX-NXX-XXXX" style number is accepted.
        #[test]
        fn ten_digit_hyphenated_numbers_are_accepted(
            area in "[1-9][0-9]{2}",
            exchange in "[0-9]{3}",
            line in "[0-9]{4}",
        ) {
            let candidate = format!("{area}-{exchange}-{line}");
            prop_assert!(is_valid_phone(&candidate));
        }
    }
}
