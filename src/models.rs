use crate::error::IbanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const NUMERIC: &[u8] = b"0123456789";
const ALPHA_UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERIC_UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Character class of a BBAN field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterType {
    #[serde(rename = "numeric", alias = "n")]
    Numeric,
    #[serde(rename = "alphaUpper", alias = "alpha")]
    AlphaUpper,
    #[serde(rename = "alphanumericUpper", alias = "alphanumeric", alias = "c")]
    AlphanumericUpper,
}

impl CharacterType {
    pub fn alphabet(self) -> &'static [u8] {
        match self {
            Self::Numeric => NUMERIC,
            Self::AlphaUpper => ALPHA_UPPER,
            Self::AlphanumericUpper => ALPHANUMERIC_UPPER,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::AlphaUpper => "alphaUpper",
            Self::AlphanumericUpper => "alphanumericUpper",
        }
    }

    pub fn contains(self, byte: u8) -> bool {
        self.alphabet().contains(&byte)
    }
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterType {
    type Err = IbanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "numeric" | "n" => Ok(Self::Numeric),
            "alphaupper" | "alpha" => Ok(Self::AlphaUpper),
            "alphanumericupper" | "alphanumeric" | "c" => Ok(Self::AlphanumericUpper),
            _ => Err(IbanError::InvalidArgument {
                message: format!("Invalid character type: {value}"),
            }),
        }
    }
}

/// Length and character class of one BBAN field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub length: usize,
    pub kind: CharacterType,
}

/// Structural description of one country's IBAN.
///
/// Optional fields are declared as separate length/type pairs, matching the
/// JSON configuration format. A field only counts as present when both halves
/// are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySpec {
    pub length: usize,
    pub bank_code_length: usize,
    pub bank_code_type: CharacterType,
    pub account_length: usize,
    pub account_type: CharacterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_code_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_code_type: Option<CharacterType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_check_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_check_type: Option<CharacterType>,
}

impl CountrySpec {
    pub fn bank_code(&self) -> FieldSpec {
        FieldSpec {
            length: self.bank_code_length,
            kind: self.bank_code_type,
        }
    }

    pub fn account(&self) -> FieldSpec {
        FieldSpec {
            length: self.account_length,
            kind: self.account_type,
        }
    }

    pub fn branch_code(&self) -> Option<FieldSpec> {
        match (self.branch_code_length, self.branch_code_type) {
            (Some(length), Some(kind)) => Some(FieldSpec { length, kind }),
            _ => None,
        }
    }

    pub fn national_check(&self) -> Option<FieldSpec> {
        match (self.national_check_length, self.national_check_type) {
            (Some(length), Some(kind)) => Some(FieldSpec { length, kind }),
            _ => None,
        }
    }

    pub fn bban_length(&self) -> usize {
        self.length.saturating_sub(4)
    }

    /// Length implied by the field declarations, `None` when the sum
    /// overflows.
    pub fn declared_length(&self) -> Option<usize> {
        4usize
            .checked_add(self.bank_code_length)?
            .checked_add(self.branch_code_length.unwrap_or(0))?
            .checked_add(self.account_length)?
            .checked_add(self.national_check_length.unwrap_or(0))
    }

    pub fn is_consistent(&self) -> bool {
        self.declared_length() == Some(self.length)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo {
    pub name: String,
    pub code: String,
}

impl BankInfo {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
        }
    }
}

/// Outcome of validating one candidate IBAN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
}

impl ValidationResult {
    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
            ..Self::default()
        }
    }
}
