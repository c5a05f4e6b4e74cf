//! ISO 7064 MOD 97-10 arithmetic for IBAN check digits and the national check
//! fields embedded in some BBANs.
//!
//! Remainders are folded one decimal digit at a time, so inputs of any length
//! are reduced without big-integer arithmetic. Letters expand to two digits
//! (`A` = 10 … `Z` = 35) and fold as two successive digits.

use crate::error::IbanError;

/// Longest digit string accepted by [`national_check_digits`].
pub const MAX_NATIONAL_CHECK_INPUT: usize = 100;

/// Placeholder returned by [`calculate_mod97_check`] for rejected input.
pub const CHECK_SENTINEL: &str = "00";

fn fold(remainder: u32, digit: u32) -> u32 {
    (remainder * 10 + digit) % 97
}

/// Remainder of the rearranged IBAN (first four characters moved to the end).
///
/// Returns `None` for inputs shorter than four characters or containing
/// anything other than ASCII letters and digits. Lowercase letters are treated
/// as their uppercase counterparts.
pub fn iban_remainder(iban: &str) -> Option<u32> {
    if iban.len() < 4 || !iban.is_ascii() {
        return None;
    }
    let (head, tail) = iban.split_at(4);
    let mut remainder = 0u32;
    for byte in tail.bytes().chain(head.bytes()) {
        match byte.to_ascii_uppercase() {
            digit @ b'0'..=b'9' => remainder = fold(remainder, u32::from(digit - b'0')),
            letter @ b'A'..=b'Z' => {
                let value = u32::from(letter - b'A') + 10;
                remainder = fold(fold(remainder, value / 10), value % 10);
            }
            _ => return None,
        }
    }
    Some(remainder)
}

/// Check digits for a candidate whose check-digit positions hold `"00"`.
///
/// ```
/// use iban_testgen::checksum::iban_check_digits;
///
/// assert_eq!(iban_check_digits("NL00ABNA0417164300").as_deref(), Some("91"));
/// assert_eq!(iban_check_digits("NL00ABNA-417164300"), None);
/// ```
pub fn iban_check_digits(candidate: &str) -> Option<String> {
    let remainder = iban_remainder(candidate)?;
    Some(format!("{:02}", 98 - remainder))
}

/// Check digits for `country` + `bban`.
pub fn check_digits_for(country: &str, bban: &str) -> Option<String> {
    if country.len() != 2 {
        return None;
    }
    iban_check_digits(&format!("{country}00{bban}"))
}

/// `true` when the full IBAN reduces to a remainder of exactly 1.
pub fn is_valid_checksum(iban: &str) -> bool {
    iban_remainder(iban) == Some(1)
}

/// National check digits over a purely numeric string.
///
/// The value is `98 - (input mod 97)` rendered as two digits. A remainder of 0
/// would give 98, which lies outside the two-digit check range `01..=97`, and
/// maps to `"01"`.
pub fn national_check_digits(numeric: &str) -> Result<String, IbanError> {
    if numeric.is_empty() {
        return Err(IbanError::validation(
            "national check input must not be empty",
        ));
    }
    if numeric.len() > MAX_NATIONAL_CHECK_INPUT {
        return Err(IbanError::validation(format!(
            "national check input exceeds {} digits",
            MAX_NATIONAL_CHECK_INPUT
        )));
    }
    if !numeric.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(IbanError::validation(format!(
            "national check input must be numeric: {numeric}"
        )));
    }

    let remainder = numeric
        .bytes()
        .fold(0u32, |acc, byte| fold(acc, u32::from(byte - b'0')));
    let check = 98 - remainder;
    if !(1..=97).contains(&check) {
        return Ok("01".to_string());
    }
    Ok(format!("{:02}", check))
}

/// Sentinel-returning wrapper around [`national_check_digits`]: rejected input
/// yields [`CHECK_SENTINEL`] and a warning in the log.
pub fn calculate_mod97_check(numeric: &str) -> String {
    national_check_digits(numeric).unwrap_or_else(|err| {
        log::warn!("mod-97 check rejected input: {err}");
        CHECK_SENTINEL.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_VALID: &[&str] = &[
        "NL91ABNA0417164300",
        "DE89370400440532013000",
        "GB82WEST12345698765432",
        "BE68539007547034",
        "FR1420041010050500013M02606",
        "IT60X0542811101000000123456",
        "ES9121000418450200051332",
        "PT50000201231234567890154",
        "AT611904300234573201",
        "CH9300762011623852957",
        "LU280019400644750000",
        "SE4550000000058398257466",
        "NO9386011117947",
        "DK5000400440116243",
    ];

    #[test]
    fn known_ibans_reduce_to_one() {
        for iban in KNOWN_VALID {
            assert_eq!(iban_remainder(iban), Some(1), "{iban}");
            assert!(is_valid_checksum(iban), "{iban}");
        }
    }

    #[test]
    fn flipped_check_digit_fails() {
        assert_eq!(iban_remainder("NL92ABNA0417164300"), Some(2));
        assert!(!is_valid_checksum("NL92ABNA0417164300"));
    }

    #[test]
    fn recomputes_known_check_digits() {
        assert_eq!(check_digits_for("NL", "ABNA0417164300").as_deref(), Some("91"));
        assert_eq!(
            check_digits_for("DE", "370400440532013000").as_deref(),
            Some("89")
        );
    }

    /// Single-digit results are zero-padded.
    #[test]
    fn check_digits_are_zero_padded() {
        assert_eq!(check_digits_for("NL", "ABNA0000000003").as_deref(), Some("04"));
    }

    #[test]
    fn lowercase_letters_match_uppercase() {
        assert_eq!(
            iban_remainder("nl91abna0417164300"),
            iban_remainder("NL91ABNA0417164300")
        );
    }

    #[test]
    fn rejects_foreign_characters() {
        assert_eq!(iban_remainder("NL91ABNA04171643-0"), None);
        assert_eq!(iban_check_digits("NL00ÄBNA0417164300"), None);
        assert_eq!(iban_remainder("NL9"), None);
        assert_eq!(check_digits_for("NLD", "ABNA0417164300"), None);
    }

    #[test]
    fn national_check_uses_98_minus_remainder() {
        assert_eq!(national_check_digits("12").unwrap(), "86");
        assert_eq!(national_check_digits("539007547").unwrap(), "17");
        assert_eq!(national_check_digits("1234567").unwrap(), "50");
    }

    /// A zero remainder would produce 98, outside the check range.
    #[test]
    fn national_check_zero_remainder_maps_to_01() {
        assert_eq!(calculate_mod97_check("97"), "01");
        assert_eq!(calculate_mod97_check("0"), "01");
        assert_eq!(calculate_mod97_check("000"), "01");
    }

    #[test]
    fn national_check_is_deterministic() {
        let input = "00330123456789012345";
        let first = calculate_mod97_check(input);
        for _ in 0..10 {
            assert_eq!(calculate_mod97_check(input), first);
        }
    }

    #[test]
    fn national_check_rejects_bad_input() {
        assert_eq!(national_check_digits("").unwrap_err().code(), "VALIDATION_ERROR");
        assert_eq!(
            national_check_digits("12A4").unwrap_err().code(),
            "VALIDATION_ERROR"
        );
        let long = "1".repeat(MAX_NATIONAL_CHECK_INPUT + 1);
        assert!(national_check_digits(&long).is_err());
        assert!(national_check_digits(&"1".repeat(MAX_NATIONAL_CHECK_INPUT)).is_ok());
    }

    #[test]
    fn sentinel_for_rejected_input() {
        assert_eq!(calculate_mod97_check(""), CHECK_SENTINEL);
        assert_eq!(calculate_mod97_check("abc"), CHECK_SENTINEL);
    }

    /// Folding digit by digit must match native arithmetic where it fits.
    #[test]
    fn fold_matches_native_modulo() {
        let value: u128 = 123_456_789_012_345_678_901_234_567_890;
        let text = value.to_string();
        let remainder = text
            .bytes()
            .fold(0u32, |acc, byte| fold(acc, u32::from(byte - b'0')));
        assert_eq!(u128::from(remainder), value % 97);
    }
}
