//! Immutable IBAN configuration: specification table, country names and the
//! bank directory.
//!
//! A configuration is built once (from the compiled-in reference tables or a
//! JSON document) and then shared by reference. Public accessors hand out
//! owned copies, so nothing a caller does with a returned value can leak back
//! into the shared table.

use crate::error::IbanError;
use crate::models::{BankInfo, CountrySpec};
use crate::reference::{BANK_DIRECTORY, COUNTRY_NAMES, COUNTRY_SPECS};
use crate::validation::{MAX_IBAN_LENGTH, MIN_IBAN_LENGTH};

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

static BUILTIN: Lazy<IbanConfig> = Lazy::new(IbanConfig::builtin);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IbanConfig {
    iban_specs: BTreeMap<String, CountrySpec>,
    #[serde(default)]
    country_names: BTreeMap<String, String>,
    #[serde(default)]
    bank_data: BTreeMap<String, BTreeMap<String, BankInfo>>,
}

impl IbanConfig {
    pub fn builtin() -> Self {
        let iban_specs = COUNTRY_SPECS
            .iter()
            .map(|(code, spec)| (code.to_string(), spec.clone()))
            .collect();
        let country_names = COUNTRY_NAMES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        let bank_data = BANK_DIRECTORY
            .iter()
            .map(|(country, banks)| {
                let banks = banks
                    .iter()
                    .map(|(key, name, code)| (key.to_string(), BankInfo::new(name, code)))
                    .collect();
                (country.to_string(), banks)
            })
            .collect();

        Self {
            iban_specs,
            country_names,
            bank_data,
        }
    }

    /// Process-wide instance of [`IbanConfig::builtin`].
    pub fn shared() -> &'static IbanConfig {
        &BUILTIN
    }

    pub fn from_json_str(json: &str) -> Result<Self, IbanError> {
        let config: IbanConfig = serde_json::from_str(json).map_err(|err| IbanError::Config {
            detail: err.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, IbanError> {
        let contents = std::fs::read_to_string(path).map_err(|err| IbanError::Config {
            detail: format!("{}: {}", path.display(), err),
        })?;
        let config = Self::from_json_str(&contents)?;
        log::debug!(
            "loaded configuration for {} countries from {}",
            config.iban_specs.len(),
            path.display()
        );
        Ok(config)
    }

    fn check(&self) -> Result<(), IbanError> {
        if self.iban_specs.is_empty() {
            return Err(IbanError::Config {
                detail: "no IBAN specifications defined".to_string(),
            });
        }
        for (code, spec) in &self.iban_specs {
            if code.len() != 2 || !code.chars().all(|ch| ch.is_ascii_uppercase()) {
                return Err(IbanError::Config {
                    detail: format!("invalid country code: {code}"),
                });
            }
            if !(MIN_IBAN_LENGTH..=MAX_IBAN_LENGTH).contains(&spec.length) {
                return Err(IbanError::Config {
                    detail: format!(
                        "specification for {} declares {} characters, outside {}..={}",
                        code, spec.length, MIN_IBAN_LENGTH, MAX_IBAN_LENGTH
                    ),
                });
            }
            let declared = spec.declared_length().ok_or_else(|| IbanError::Config {
                detail: format!("field lengths of the specification for {code} overflow"),
            })?;
            if declared != spec.length {
                return Err(IbanError::Config {
                    detail: format!(
                        "specification for {} declares {} characters but its fields add up to {}",
                        code, spec.length, declared
                    ),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn spec_ref(&self, country: &str) -> Option<&CountrySpec> {
        self.iban_specs.get(country)
    }

    pub fn country_spec(&self, country: &str) -> Option<CountrySpec> {
        self.iban_specs.get(country).cloned()
    }

    pub fn iban_specs(&self) -> BTreeMap<String, CountrySpec> {
        self.iban_specs.clone()
    }

    /// Display name of a country, or the code itself when unknown.
    pub fn country_name(&self, country: &str) -> String {
        self.country_names
            .get(country)
            .cloned()
            .unwrap_or_else(|| country.to_string())
    }

    pub fn country_banks(&self, country: &str) -> BTreeMap<String, BankInfo> {
        self.bank_data.get(country).cloned().unwrap_or_default()
    }

    /// Looks a bank up by directory key or by bank code, ignoring case.
    pub fn find_bank(&self, country: &str, key_or_code: &str) -> Option<BankInfo> {
        let needle = key_or_code.trim();
        let banks = self.bank_data.get(country)?;
        banks
            .iter()
            .find(|(key, bank)| {
                key.eq_ignore_ascii_case(needle) || bank.code.eq_ignore_ascii_case(needle)
            })
            .map(|(_, bank)| bank.clone())
    }

    pub fn available_countries(&self) -> Vec<String> {
        self.iban_specs.keys().cloned().collect()
    }

    pub fn is_country_supported(&self, country: &str) -> bool {
        self.iban_specs.contains_key(country)
    }
}

impl Default for IbanConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CharacterType;

    #[test]
    fn builtin_covers_fourteen_countries() {
        let config = IbanConfig::builtin();
        assert_eq!(config.available_countries().len(), 14);
        for code in ["NL", "DE", "BE", "FR", "ES", "IT", "AT", "CH", "LU", "PT", "GB", "SE", "NO", "DK"] {
            assert!(config.is_country_supported(code), "{code}");
        }
        assert!(!config.is_country_supported("XX"));
    }

    #[test]
    fn builtin_passes_its_own_checks() {
        assert!(IbanConfig::builtin().check().is_ok());
    }

    #[test]
    fn accessors_return_copies() {
        let config = IbanConfig::builtin();
        let mut spec = config.country_spec("NL").unwrap();
        spec.length = 99;
        let mut banks = config.country_banks("NL");
        banks.clear();

        assert_eq!(config.country_spec("NL").unwrap().length, 18);
        assert_eq!(config.country_banks("NL").len(), 10);
    }

    #[test]
    fn country_name_falls_back_to_code() {
        let config = IbanConfig::builtin();
        assert_eq!(config.country_name("BE"), "Belgium");
        assert_eq!(config.country_name("XX"), "XX");
    }

    #[test]
    fn find_bank_by_key_or_code() {
        let config = IbanConfig::builtin();
        let by_key = config.find_bank("DE", "deutdeff").unwrap();
        assert_eq!(by_key.code, "50070010");
        let by_code = config.find_bank("DE", "50040000").unwrap();
        assert_eq!(by_code.name, "Commerzbank");
        assert!(config.find_bank("DE", "ABNA").is_none());
        assert!(config.find_bank("XX", "ABNA").is_none());
    }

    #[test]
    fn loads_json_document() {
        let json = r#"{
            "ibanSpecs": {
                "NL": {
                    "length": 18,
                    "bankCodeLength": 4,
                    "bankCodeType": "alphaUpper",
                    "accountLength": 10,
                    "accountType": "numeric"
                }
            },
            "countryNames": { "NL": "Netherlands" },
            "bankData": { "NL": { "ABNA": { "name": "ABN AMRO", "code": "ABNA" } } }
        }"#;
        let config = IbanConfig::from_json_str(json).unwrap();
        assert_eq!(config.available_countries(), vec!["NL".to_string()]);
        assert_eq!(
            config.country_spec("NL").unwrap().bank_code_type,
            CharacterType::AlphaUpper
        );
        assert_eq!(config.find_bank("NL", "ABNA").unwrap().name, "ABN AMRO");
    }

    #[test]
    fn rejects_inconsistent_length() {
        let json = r#"{
            "ibanSpecs": {
                "NL": {
                    "length": 19,
                    "bankCodeLength": 4,
                    "bankCodeType": "alphaUpper",
                    "accountLength": 10,
                    "accountType": "numeric"
                }
            }
        }"#;
        let err = IbanConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("NL"));
    }

    #[test]
    fn rejects_overflowing_field_lengths() {
        let json = r#"{
            "ibanSpecs": {
                "NL": {
                    "length": 18,
                    "bankCodeLength": 18446744073709551615,
                    "bankCodeType": "alphaUpper",
                    "accountLength": 10,
                    "accountType": "numeric"
                }
            }
        }"#;
        let err = IbanConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("NL"));
        assert!(err.to_string().contains("overflow"));
    }

    /// Lengths the validator would reject cannot be loaded either.
    #[test]
    fn rejects_length_outside_iban_range() {
        let json = r#"{
            "ibanSpecs": {
                "NL": {
                    "length": 40,
                    "bankCodeLength": 4,
                    "bankCodeType": "alphaUpper",
                    "accountLength": 32,
                    "accountType": "numeric"
                }
            }
        }"#;
        let err = IbanConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("outside 15..=34"));

        let short = json.replace("40", "14").replace("32", "6");
        assert!(IbanConfig::from_json_str(&short).is_err());
    }

    #[test]
    fn rejects_lowercase_country_code() {
        let json = r#"{
            "ibanSpecs": {
                "nl": {
                    "length": 18,
                    "bankCodeLength": 4,
                    "bankCodeType": "alphaUpper",
                    "accountLength": 10,
                    "accountType": "numeric"
                }
            }
        }"#;
        assert!(IbanConfig::from_json_str(json).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = IbanConfig::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = IbanConfig::load(Path::new("/nonexistent/iban-config.json")).unwrap_err();
        assert!(err.to_string().contains("iban-config.json"));
    }
}
