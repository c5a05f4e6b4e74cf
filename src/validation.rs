//! IBAN validation.
//!
//! [`validate_iban_with`] never fails: every problem it finds is reported as
//! a message in [`ValidationResult::errors`], and all applicable messages are
//! collected rather than stopping at the first.

use crate::bban::decompose;
use crate::checksum::iban_remainder;
use crate::config::IbanConfig;
use crate::error::IbanError;
use crate::models::ValidationResult;
use crate::util::{format_iban, normalize_iban};

use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_IBAN_LENGTH: usize = 15;
pub const MAX_IBAN_LENGTH: usize = 34;

pub const MSG_REQUIRED: &str = "IBAN is required";
pub const MSG_FORMAT: &str =
    "IBAN format is invalid. Expected format: CC##AAAA... (where C=country, #=check digit, A=alphanumeric)";
pub const MSG_LENGTH_RANGE: &str = "IBAN length must be between 15 and 34 characters";
pub const MSG_CHECKSUM: &str = "IBAN checksum is invalid";
pub const MSG_CHECKSUM_FAILED: &str = "Failed to validate IBAN checksum";

static STRUCTURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]+$")
        .unwrap_or_else(|_| Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken")))
});

static FORMAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{1,30}$")
        .unwrap_or_else(|_| Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken")))
});

fn prefix(input: &str, count: usize) -> String {
    input.chars().take(count).collect()
}

fn suffix(input: &str, skip: usize) -> String {
    input.chars().skip(skip).collect()
}

pub fn validate_iban_with(config: &IbanConfig, candidate: &str) -> ValidationResult {
    let clean = normalize_iban(candidate);
    if clean.is_empty() {
        return ValidationResult::invalid(vec![MSG_REQUIRED.to_string()]);
    }

    let mut errors = Vec::new();
    if !STRUCTURE_RE.is_match(&clean) {
        errors.push(MSG_FORMAT.to_string());
    }

    let length = clean.chars().count();
    if !(MIN_IBAN_LENGTH..=MAX_IBAN_LENGTH).contains(&length) {
        errors.push(MSG_LENGTH_RANGE.to_string());
    }

    let country = prefix(&clean, 2);
    let spec = config.spec_ref(&country);
    match spec {
        None => errors.push(format!("Country code '{country}' is not supported")),
        Some(spec) if spec.length != length => errors.push(format!(
            "IBAN length for {} should be {} characters, got {}",
            country, spec.length, length
        )),
        Some(_) => {}
    }

    match iban_remainder(&clean) {
        Some(1) => {}
        Some(_) => errors.push(MSG_CHECKSUM.to_string()),
        None => errors.push(MSG_CHECKSUM_FAILED.to_string()),
    }

    if !errors.is_empty() {
        log::debug!("rejected IBAN candidate with {} error(s)", errors.len());
        return ValidationResult::invalid(errors);
    }

    let mut result = ValidationResult {
        is_valid: true,
        formatted: Some(format_iban(&clean)),
        country: Some(country.clone()),
        ..ValidationResult::default()
    };
    if let Some(spec) = spec {
        let parts = decompose(&country, spec, &suffix(&clean, 4));
        result.bank_code = Some(parts.bank_code);
        result.account_number = Some(parts.account_number);
    }
    result
}

/// Structural check only: country letters, check digits and up to 30
/// alphanumeric characters.
pub fn validate_format(candidate: &str) -> bool {
    FORMAT_RE.is_match(&normalize_iban(candidate))
}

/// `true` when the candidate is well formed and its length matches the spec
/// of `country` (or of its own country prefix when `country` is `None`).
pub fn validate_length(config: &IbanConfig, candidate: &str, country: Option<&str>) -> bool {
    if !validate_format(candidate) {
        return false;
    }
    let clean = normalize_iban(candidate);
    let country = country.map(str::to_string).unwrap_or_else(|| prefix(&clean, 2));
    config
        .spec_ref(&country)
        .map(|spec| spec.length == clean.len())
        .unwrap_or(false)
}

/// Breakdown of an IBAN into its fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IbanInfo {
    pub country: String,
    pub check_digits: String,
    pub bban: String,
    pub bank_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    pub account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_check: Option<String>,
}

/// Decomposes a candidate without verifying its checksum or length.
pub fn iban_info(config: &IbanConfig, candidate: &str) -> Result<IbanInfo, IbanError> {
    let clean = normalize_iban(candidate);
    if clean.chars().count() < 5 {
        return Err(IbanError::validation(format!(
            "IBAN too short to decompose: {clean}"
        )));
    }
    let country = prefix(&clean, 2);
    let spec = config
        .spec_ref(&country)
        .ok_or_else(|| IbanError::CountryNotSupported {
            country: country.clone(),
        })?;
    let bban = suffix(&clean, 4);
    let parts = decompose(&country, spec, &bban);
    Ok(IbanInfo {
        check_digits: clean.chars().skip(2).take(2).collect(),
        country,
        bban,
        bank_code: parts.bank_code,
        branch_code: parts.branch_code,
        account_number: parts.account_number,
        national_check: parts.national_check,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(candidate: &str) -> ValidationResult {
        validate_iban_with(&IbanConfig::builtin(), candidate)
    }

    #[test]
    fn valid_dutch_iban() {
        let result = validate("NL91ABNA0417164300");
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.errors.is_empty());
        assert_eq!(result.formatted.as_deref(), Some("NL91 ABNA 0417 1643 00"));
        assert_eq!(result.country.as_deref(), Some("NL"));
        assert_eq!(result.bank_code.as_deref(), Some("ABNA"));
        assert_eq!(result.account_number.as_deref(), Some("0417164300"));
    }

    #[test]
    fn spaced_lowercase_input_is_normalized() {
        let result = validate("nl91 abna 0417 1643 00");
        assert!(result.is_valid);
        assert_eq!(result.country.as_deref(), Some("NL"));
    }

    #[test]
    fn empty_and_blank_input() {
        for candidate in ["", "   ", "\t\n"] {
            let result = validate(candidate);
            assert!(!result.is_valid);
            assert_eq!(result.errors, vec![MSG_REQUIRED.to_string()]);
        }
    }

    #[test]
    fn garbage_collects_several_errors() {
        let result = validate("invalid");
        assert!(!result.is_valid);
        assert!(result.errors.contains(&MSG_FORMAT.to_string()));
        assert!(result.errors.contains(&MSG_LENGTH_RANGE.to_string()));
        assert!(result
            .errors
            .contains(&"Country code 'IN' is not supported".to_string()));
        assert!(result.formatted.is_none());
    }

    #[test]
    fn two_letters_only() {
        let result = validate("NL");
        assert!(!result.is_valid);
        assert!(result.errors.contains(&MSG_FORMAT.to_string()));
        assert!(result.errors.contains(&MSG_CHECKSUM_FAILED.to_string()));
    }

    #[test]
    fn wrong_check_digits() {
        let result = validate("NL92ABNA0417164300");
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![MSG_CHECKSUM.to_string()]);
        assert!(result.bank_code.is_none());
    }

    #[test]
    fn wrong_length_for_country() {
        let result = validate("NL91ABNA04171643001");
        assert!(result
            .errors
            .contains(&"IBAN length for NL should be 18 characters, got 19".to_string()));
    }

    /// Unsupported countries still get a checksum verdict.
    #[test]
    fn unsupported_country_with_valid_checksum() {
        let result = validate("IE29AIBK93115212345678");
        assert_eq!(
            result.errors,
            vec!["Country code 'IE' is not supported".to_string()]
        );
    }

    #[test]
    fn italian_fields_skip_leading_check() {
        let result = validate("IT60X0542811101000000123456");
        assert!(result.is_valid, "{:?}", result.errors);
        assert_eq!(result.bank_code.as_deref(), Some("05428"));
        assert_eq!(result.account_number.as_deref(), Some("000000123456"));
    }

    #[test]
    fn spanish_account_follows_check() {
        let result = validate("ES9121000418450200051332");
        assert!(result.is_valid, "{:?}", result.errors);
        assert_eq!(result.bank_code.as_deref(), Some("2100"));
        assert_eq!(result.account_number.as_deref(), Some("0200051332"));
    }

    #[test]
    fn format_helper() {
        assert!(validate_format("NL91ABNA0417164300"));
        assert!(validate_format("nl91 abna 0417 1643 00"));
        assert!(!validate_format("NLXXABNA0417164300"));
        assert!(!validate_format(""));
        assert!(!validate_format(&format!("NL91{}", "1".repeat(31))));
    }

    #[test]
    fn length_helper() {
        let config = IbanConfig::builtin();
        assert!(validate_length(&config, "NL91ABNA0417164300", None));
        assert!(!validate_length(&config, "NL91ABNA041716430", None));
        assert!(!validate_length(&config, "NL91ABNA0417164300", Some("DE")));
        assert!(!validate_length(&config, "XX91ABNA0417164300", None));
    }

    #[test]
    fn info_for_portuguese_iban() {
        let info = iban_info(&IbanConfig::builtin(), "PT50000201231234567890154").unwrap();
        assert_eq!(info.country, "PT");
        assert_eq!(info.check_digits, "50");
        assert_eq!(info.bank_code, "0002");
        assert_eq!(info.branch_code.as_deref(), Some("0123"));
        assert_eq!(info.account_number, "12345678901");
        assert_eq!(info.national_check.as_deref(), Some("54"));
    }

    #[test]
    fn info_skips_checksum() {
        let info = iban_info(&IbanConfig::builtin(), "NL92ABNA0417164300").unwrap();
        assert_eq!(info.bank_code, "ABNA");
    }

    #[test]
    fn info_errors() {
        let config = IbanConfig::builtin();
        assert_eq!(iban_info(&config, "NL9").unwrap_err().code(), "VALIDATION_ERROR");
        assert_eq!(
            iban_info(&config, "XX00ABCD").unwrap_err().code(),
            "COUNTRY_NOT_SUPPORTED"
        );
    }
}
