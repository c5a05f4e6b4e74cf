//! Generation and validation of structurally valid test IBANs.
//!
//! ```
//! let iban = iban_testgen::generate_iban("NL", None).unwrap();
//! assert_eq!(iban.len(), 18);
//! assert!(iban_testgen::validate_iban(&iban).is_valid);
//! ```

pub mod bban;
pub mod checksum;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod logging;
pub mod models;
pub mod random;
pub mod reference;
pub mod request;
pub mod util;
pub mod validation;

pub use config::IbanConfig;
pub use error::IbanError;
pub use export::{ExportFormat, ExportMetadata, IbanExport};
pub use generator::{BatchOutcome, BatchStatus, GenerationCache, IbanGenerator};
pub use models::{BankInfo, CharacterType, CountrySpec, ValidationResult};
pub use random::Entropy;
pub use request::{GenerationRequest, MAX_QUANTITY};
pub use util::format_iban;
pub use validation::{iban_info, validate_format, validate_iban_with, validate_length, IbanInfo};

/// Generates one IBAN for `country` against the built-in configuration.
pub fn generate_iban(country: &str, bank: Option<&BankInfo>) -> Result<String, IbanError> {
    IbanGenerator::new(IbanConfig::shared()).generate(country, bank)
}

/// Validates `candidate` against the built-in configuration.
pub fn validate_iban(candidate: &str) -> ValidationResult {
    validate_iban_with(IbanConfig::shared(), candidate)
}
