//! Checks on a caller's generation request before any IBAN is built.

use crate::config::IbanConfig;
use crate::error::IbanError;
use crate::models::BankInfo;
use crate::util::normalize_country_code;

/// Largest number of IBANs produced by one request.
pub const MAX_QUANTITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub country: String,
    /// Directory key or bank code.
    pub bank: Option<String>,
    pub quantity: usize,
}

/// A request whose country, bank and quantity have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub country: String,
    pub bank: Option<BankInfo>,
    pub quantity: usize,
}

impl GenerationRequest {
    pub fn new(country: &str, quantity: usize) -> Self {
        Self {
            country: country.to_string(),
            bank: None,
            quantity,
        }
    }

    pub fn with_bank(mut self, bank: &str) -> Self {
        self.bank = Some(bank.to_string());
        self
    }

    pub fn validate(&self, config: &IbanConfig) -> Result<ValidatedRequest, IbanError> {
        let country = validate_country_code(config, &self.country)?;
        validate_quantity(self.quantity)?;

        let bank = match self.bank.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(selection) => {
                let bank = config.find_bank(&country, selection).ok_or_else(|| {
                    IbanError::validation(format!(
                        "Bank {selection} not found for country {country}"
                    ))
                })?;
                validate_bank_info(config, &bank, &country)?;
                Some(bank)
            }
        };

        Ok(ValidatedRequest {
            country,
            bank,
            quantity: self.quantity,
        })
    }
}

/// Returns the normalized country code when it is supported.
pub fn validate_country_code(config: &IbanConfig, country: &str) -> Result<String, IbanError> {
    if country.trim().is_empty() {
        return Err(IbanError::validation("Country code is required"));
    }
    match normalize_country_code(country) {
        Some(code) if config.is_country_supported(&code) => Ok(code),
        _ => Err(IbanError::validation(format!(
            "Unsupported country code: {}",
            country.trim()
        ))),
    }
}

pub fn validate_quantity(quantity: usize) -> Result<(), IbanError> {
    if quantity < 1 {
        return Err(IbanError::validation("Quantity must be at least 1"));
    }
    if quantity > MAX_QUANTITY {
        return Err(IbanError::validation(format!(
            "Quantity must not exceed {MAX_QUANTITY}"
        )));
    }
    Ok(())
}

/// A bank must carry a code and a name, and must belong to the country's
/// directory when that directory is not empty.
pub fn validate_bank_info(
    config: &IbanConfig,
    bank: &BankInfo,
    country: &str,
) -> Result<(), IbanError> {
    if bank.code.trim().is_empty() {
        return Err(IbanError::validation("Bank code is required"));
    }
    if bank.name.trim().is_empty() {
        return Err(IbanError::validation("Bank name is required"));
    }

    let banks = config.country_banks(country);
    let known = banks
        .values()
        .any(|entry| entry.code == bank.code || entry.name == bank.name);
    if !banks.is_empty() && !known {
        return Err(IbanError::validation(format!(
            "Bank {} ({}) not found for country {}",
            bank.name, bank.code, country
        )));
    }
    Ok(())
}
