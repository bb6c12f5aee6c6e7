//! # Address Formatting

/// Shorten an address for display: first 6 characters, `...`, last 4.
///
/// Inputs shorter than 10 characters (including the empty string) come back
/// unchanged. Purely cosmetic, no validation is performed.
pub fn format_address(address: &str) -> String {
    let len = address.chars().count();
    if len < 10 {
        return address.to_string();
    }

    let head: String = address.chars().take(6).collect();
    let tail: String = address.chars().skip(len - 4).collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_address() {
        assert_eq!(
            format_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
    }

    #[test]
    fn test_short_inputs_unchanged() {
        assert_eq!(format_address(""), "");
        assert_eq!(format_address("0x1234"), "0x1234");
        assert_eq!(format_address("123456789"), "123456789");
    }

    #[test]
    fn test_ten_characters() {
        assert_eq!(format_address("0123456789"), "012345...6789");
    }

    proptest! {
        #[test]
        fn prop_ascii_matches_slicing(s in "[0-9a-zA-Z]{10,64}") {
            let expected = format!("{}...{}", &s[..6], &s[s.len() - 4..]);
            prop_assert_eq!(format_address(&s), expected);
        }

        #[test]
        fn prop_short_is_identity(s in "[0-9a-zA-Z]{0,9}") {
            prop_assert_eq!(format_address(&s), s);
        }

        #[test]
        fn prop_never_panics(s in ".*") {
            let _ = format_address(&s);
        }
    }
}
