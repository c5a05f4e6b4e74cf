//! Country BBAN assemblers.
//!
//! Every supported country maps to a [`BbanLayout`], a fixed sequence of
//! fields. Assembly walks that sequence, filling each field from the bank
//! override or the random source; decomposition walks the same sequence to
//! slice a BBAN back into its parts.

use crate::checksum::national_check_digits;
use crate::error::IbanError;
use crate::models::{BankInfo, CountrySpec, FieldSpec};
use crate::random::random_chars;

use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NationalCheck {
    /// Drawn from the random source like any other field.
    Random,
    /// MOD 97 over the digits of every field written before it.
    Mod97,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BbanField {
    BankCode,
    BranchCode,
    Account,
    NationalCheck(NationalCheck),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BbanLayout {
    /// bank code, account (NL, DE, AT, CH, LU, SE, NO, DK)
    BankAccount,
    /// bank code, account, computed national check
    Belgium,
    /// bank code, branch code, account, random national check
    France,
    /// bank code, branch code, random national check, account
    Spain,
    /// random alphabetic national check, bank code, branch code, account
    Italy,
    /// bank code, branch code, account, computed national check
    Portugal,
    /// bank code, sort code, account
    UnitedKingdom,
}

pub const LAYOUT_REGISTRY: &[(&str, BbanLayout)] = &[
    ("NL", BbanLayout::BankAccount),
    ("DE", BbanLayout::BankAccount),
    ("BE", BbanLayout::Belgium),
    ("FR", BbanLayout::France),
    ("ES", BbanLayout::Spain),
    ("IT", BbanLayout::Italy),
    ("AT", BbanLayout::BankAccount),
    ("CH", BbanLayout::BankAccount),
    ("LU", BbanLayout::BankAccount),
    ("PT", BbanLayout::Portugal),
    ("GB", BbanLayout::UnitedKingdom),
    ("SE", BbanLayout::BankAccount),
    ("NO", BbanLayout::BankAccount),
    ("DK", BbanLayout::BankAccount),
];

/// Field order used to decompose countries without a registered layout.
const FALLBACK_FIELDS: &[BbanField] = &[
    BbanField::BankCode,
    BbanField::BranchCode,
    BbanField::Account,
];

pub fn layout_for(country: &str) -> Option<BbanLayout> {
    LAYOUT_REGISTRY
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, layout)| *layout)
}

pub fn registered_countries() -> Vec<&'static str> {
    LAYOUT_REGISTRY.iter().map(|(code, _)| *code).collect()
}

impl BbanLayout {
    pub fn fields(self) -> &'static [BbanField] {
        use BbanField::{Account, BankCode, BranchCode, NationalCheck as Check};
        match self {
            Self::BankAccount => &[BankCode, Account],
            Self::Belgium => &[BankCode, Account, Check(NationalCheck::Mod97)],
            Self::France => &[BankCode, BranchCode, Account, Check(NationalCheck::Random)],
            Self::Spain => &[BankCode, BranchCode, Check(NationalCheck::Random), Account],
            Self::Italy => &[Check(NationalCheck::Random), BankCode, BranchCode, Account],
            Self::Portugal => &[BankCode, BranchCode, Account, Check(NationalCheck::Mod97)],
            Self::UnitedKingdom => &[BankCode, BranchCode, Account],
        }
    }

    /// Builds the BBAN for `country`. The bank override, when given, replaces
    /// the random bank-code field verbatim.
    pub fn assemble<R: RngCore + ?Sized>(
        self,
        country: &str,
        spec: &CountrySpec,
        bank: Option<&BankInfo>,
        rng: &mut R,
    ) -> Result<String, IbanError> {
        let mut bban = String::with_capacity(spec.bban_length());
        for field in self.fields() {
            let part = match field {
                BbanField::BankCode => match bank {
                    Some(bank) if !bank.code.is_empty() => {
                        bank_override(country, &bank.code, spec.bank_code())?
                    }
                    _ => random_field(rng, spec.bank_code())?,
                },
                BbanField::BranchCode => {
                    let branch = spec.branch_code().ok_or_else(|| {
                        IbanError::generation("Branch code specification missing", country)
                    })?;
                    random_field(rng, branch)?
                }
                BbanField::Account => random_field(rng, spec.account())?,
                BbanField::NationalCheck(mode) => {
                    let check = spec.national_check().ok_or_else(|| {
                        IbanError::generation("National check specification missing", country)
                    })?;
                    match mode {
                        NationalCheck::Random => random_field(rng, check)?,
                        NationalCheck::Mod97 => computed_check(country, &bban)?,
                    }
                }
            };
            bban.push_str(&part);
        }

        if bban.len() != spec.bban_length() {
            return Err(IbanError::generation(
                format!(
                    "BBAN length mismatch: expected {}, got {}",
                    spec.bban_length(),
                    bban.len()
                ),
                country,
            ));
        }
        log::debug!("assembled {} BBAN {}", country, bban);
        Ok(bban)
    }
}

fn random_field<R: RngCore + ?Sized>(rng: &mut R, field: FieldSpec) -> Result<String, IbanError> {
    random_chars(rng, field.length, field.kind)
}

/// Uppercased bank code, rejected when it falls outside the field's class.
fn bank_override(country: &str, code: &str, field: FieldSpec) -> Result<String, IbanError> {
    let code = code.to_ascii_uppercase();
    if !code.bytes().all(|byte| field.kind.contains(byte)) {
        return Err(IbanError::generation(
            format!("Bank code {code} is not {}", field.kind),
            country,
        ));
    }
    Ok(code)
}

fn computed_check(country: &str, preceding: &str) -> Result<String, IbanError> {
    let digits: String = preceding.chars().filter(|ch| ch.is_ascii_digit()).collect();
    national_check_digits(&digits).map_err(|err| {
        IbanError::generation(format!("National check computation failed: {err}"), country)
    })
}

/// Fields sliced out of a BBAN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BbanParts {
    pub bank_code: String,
    pub branch_code: Option<String>,
    pub account_number: String,
    pub national_check: Option<String>,
}

/// Slices `bban` according to the layout registered for `country`. Fields
/// running past the end of the input are truncated rather than rejected.
pub fn decompose(country: &str, spec: &CountrySpec, bban: &str) -> BbanParts {
    let fields = layout_for(country)
        .map(BbanLayout::fields)
        .unwrap_or(FALLBACK_FIELDS);

    let mut parts = BbanParts::default();
    let mut offset = 0usize;
    for field in fields {
        let length = match field {
            BbanField::BankCode => spec.bank_code_length,
            BbanField::BranchCode => spec.branch_code_length.unwrap_or(0),
            BbanField::Account => spec.account_length,
            BbanField::NationalCheck(_) => spec.national_check_length.unwrap_or(0),
        };
        let piece = slice(bban, offset, length);
        offset += length;
        match field {
            BbanField::BankCode => parts.bank_code = piece,
            BbanField::BranchCode if length > 0 => parts.branch_code = Some(piece),
            BbanField::Account => parts.account_number = piece,
            BbanField::NationalCheck(_) if length > 0 => parts.national_check = Some(piece),
            BbanField::BranchCode | BbanField::NationalCheck(_) => {}
        }
    }
    parts
}

fn slice(input: &str, start: usize, length: usize) -> String {
    input.chars().skip(start).take(length).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::calculate_mod97_check;
    use crate::config::IbanConfig;
    use crate::random::Entropy;
    use regex::Regex;

    fn assemble(country: &str, bank: Option<&BankInfo>) -> Result<String, IbanError> {
        let config = IbanConfig::builtin();
        let spec = config.country_spec(country).unwrap();
        layout_for(country)
            .unwrap()
            .assemble(country, &spec, bank, &mut Entropy::os())
    }

    fn assert_matches(pattern: &str, value: &str) {
        let re = Regex::new(pattern).unwrap();
        assert!(re.is_match(value), "{value} does not match {pattern}");
    }

    #[test]
    fn registry_matches_builtin_specs() {
        let config = IbanConfig::builtin();
        let mut registered = registered_countries();
        registered.sort_unstable();
        let mut specs = config.available_countries();
        specs.sort_unstable();
        assert_eq!(registered, specs);
    }

    #[test]
    fn bank_account_layouts() {
        assert_matches(r"^[A-Z]{4}\d{10}$", &assemble("NL", None).unwrap());
        assert_matches(r"^\d{18}$", &assemble("DE", None).unwrap());
        assert_matches(r"^\d{16}$", &assemble("AT", None).unwrap());
        assert_matches(r"^\d{17}$", &assemble("CH", None).unwrap());
        assert_matches(r"^\d{16}$", &assemble("LU", None).unwrap());
        assert_matches(r"^\d{20}$", &assemble("SE", None).unwrap());
        assert_matches(r"^\d{11}$", &assemble("NO", None).unwrap());
        assert_matches(r"^\d{14}$", &assemble("DK", None).unwrap());
    }

    #[test]
    fn france_layout() {
        assert_matches(r"^\d{5}\d{5}[A-Z0-9]{11}\d{2}$", &assemble("FR", None).unwrap());
    }

    #[test]
    fn spain_places_check_before_account() {
        let bank = BankInfo::new("Banco Santander", "0049");
        assert_matches(r"^0049\d{4}\d{2}\d{10}$", &assemble("ES", Some(&bank)).unwrap());
    }

    #[test]
    fn italy_starts_with_alphabetic_check() {
        let bank = BankInfo::new("UniCredit", "02008");
        assert_matches(
            r"^[A-Z]02008\d{5}[A-Z0-9]{12}$",
            &assemble("IT", Some(&bank)).unwrap(),
        );
    }

    #[test]
    fn united_kingdom_layout() {
        assert_matches(r"^[A-Z]{4}\d{14}$", &assemble("GB", None).unwrap());
        let bank = BankInfo::new("Barclays", "BARC");
        assert_matches(r"^BARC\d{14}$", &assemble("GB", Some(&bank)).unwrap());
    }

    #[test]
    fn belgium_check_covers_bank_and_account() {
        for _ in 0..50 {
            let bban = assemble("BE", None).unwrap();
            assert_matches(r"^\d{12}$", &bban);
            assert_eq!(&bban[10..], calculate_mod97_check(&bban[..10]));
        }
    }

    #[test]
    fn portugal_check_covers_bank_branch_and_account() {
        let bank = BankInfo::new("Millennium BCP", "0033");
        for _ in 0..50 {
            let bban = assemble("PT", Some(&bank)).unwrap();
            assert_matches(r"^0033\d{19}$", &bban);
            assert_eq!(&bban[19..], calculate_mod97_check(&bban[..19]));
        }
    }

    #[test]
    fn empty_bank_code_falls_back_to_random() {
        let bank = BankInfo::new("Nameless", "");
        assert_matches(r"^[A-Z]{4}\d{10}$", &assemble("NL", Some(&bank)).unwrap());
    }

    #[test]
    fn lowercase_override_is_uppercased() {
        let bank = BankInfo::new("ABN AMRO", "abna");
        assert_matches(r"^ABNA\d{10}$", &assemble("NL", Some(&bank)).unwrap());
    }

    #[test]
    fn override_outside_character_class_is_generation_error() {
        let bank = BankInfo::new("Letters", "ABCDEFGH");
        let err = assemble("DE", Some(&bank)).unwrap_err();
        assert_eq!(err.code(), "GENERATION_ERROR");
        assert_eq!(
            err.to_string(),
            "Bank code ABCDEFGH is not numeric for country DE"
        );
    }

    #[test]
    fn wrong_length_override_is_generation_error() {
        let bank = BankInfo::new("Too long", "ABNAX");
        let err = assemble("NL", Some(&bank)).unwrap_err();
        assert_eq!(err.code(), "GENERATION_ERROR");
        assert_eq!(
            err.to_string(),
            "BBAN length mismatch: expected 14, got 15 for country NL"
        );
    }

    #[test]
    fn missing_branch_spec_is_generation_error() {
        let mut spec = IbanConfig::builtin().country_spec("GB").unwrap();
        spec.branch_code_type = None;
        let err = BbanLayout::UnitedKingdom
            .assemble("GB", &spec, None, &mut Entropy::os())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Branch code specification missing for country GB"
        );
    }

    #[test]
    fn missing_national_check_spec_is_generation_error() {
        let mut spec = IbanConfig::builtin().country_spec("BE").unwrap();
        spec.national_check_length = None;
        let err = BbanLayout::Belgium
            .assemble("BE", &spec, None, &mut Entropy::os())
            .unwrap_err();
        assert!(err.to_string().starts_with("National check specification missing"));
    }

    #[test]
    fn decompose_skips_leading_italian_check() {
        let spec = IbanConfig::builtin().country_spec("IT").unwrap();
        let parts = decompose("IT", &spec, "X0542811101000000123456");
        assert_eq!(parts.national_check.as_deref(), Some("X"));
        assert_eq!(parts.bank_code, "05428");
        assert_eq!(parts.branch_code.as_deref(), Some("11101"));
        assert_eq!(parts.account_number, "000000123456");
    }

    #[test]
    fn decompose_spanish_account_after_check() {
        let spec = IbanConfig::builtin().country_spec("ES").unwrap();
        let parts = decompose("ES", &spec, "21000418450200051332");
        assert_eq!(parts.bank_code, "2100");
        assert_eq!(parts.branch_code.as_deref(), Some("0418"));
        assert_eq!(parts.national_check.as_deref(), Some("45"));
        assert_eq!(parts.account_number, "0200051332");
    }

    #[test]
    fn decompose_unregistered_country_uses_fallback_order() {
        let mut spec = IbanConfig::builtin().country_spec("GB").unwrap();
        spec.length = 22;
        let parts = decompose("IE", &spec, "AIBK93115212345678");
        assert_eq!(parts.bank_code, "AIBK");
        assert_eq!(parts.branch_code.as_deref(), Some("931152"));
        assert_eq!(parts.account_number, "12345678");
    }

    #[test]
    fn decompose_truncates_short_input() {
        let spec = IbanConfig::builtin().country_spec("NL").unwrap();
        let parts = decompose("NL", &spec, "ABN");
        assert_eq!(parts.bank_code, "ABN");
        assert_eq!(parts.account_number, "");
    }
}
