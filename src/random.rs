use crate::error::IbanError;
use crate::models::CharacterType;

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source for BBAN fields.
///
/// `Os` is the production source. `Seeded` reproduces a run from a seed and is
/// meant for fixtures and debugging only; creating one logs a warning.
pub enum Entropy {
    Os(OsRng),
    Seeded(ChaCha8Rng),
}

impl Entropy {
    pub fn os() -> Self {
        Self::Os(OsRng)
    }

    pub fn seeded(seed: u64) -> Self {
        log::warn!(
            "using seeded random source (seed {seed}); generated IBANs are reproducible and not suitable for production"
        );
        Self::Seeded(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, Self::Seeded(_))
    }
}

impl RngCore for Entropy {
    fn next_u32(&mut self) -> u32 {
        match self {
            Self::Os(rng) => rng.next_u32(),
            Self::Seeded(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            Self::Os(rng) => rng.next_u64(),
            Self::Seeded(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            Self::Os(rng) => rng.fill_bytes(dest),
            Self::Seeded(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match self {
            Self::Os(rng) => rng.try_fill_bytes(dest),
            Self::Seeded(rng) => rng.try_fill_bytes(dest),
        }
    }
}

/// Draws `length` characters of class `kind`, each picked as
/// `random_u32 % alphabet_len`.
pub fn random_chars<R: RngCore + ?Sized>(
    rng: &mut R,
    length: usize,
    kind: CharacterType,
) -> Result<String, IbanError> {
    if length == 0 {
        return Ok(String::new());
    }

    let alphabet = kind.alphabet();
    let byte_len = length
        .checked_mul(4)
        .ok_or_else(|| IbanError::InvalidArgument {
            message: format!("character count too large: {length}"),
        })?;
    let mut words = vec![0u8; byte_len];
    rng.try_fill_bytes(&mut words)
        .map_err(|err| IbanError::EnvironmentUnsupported {
            detail: err.to_string(),
        })?;

    let mut out = String::with_capacity(length);
    for word in words.chunks_exact(4) {
        let value = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        let idx = (value % alphabet.len() as u32) as usize;
        out.push(char::from(alphabet[idx]));
    }
    Ok(out)
}

/// [`random_chars`] with a signed length and a character class given by name.
/// Non-positive lengths yield an empty string.
pub fn random_chars_named<R: RngCore + ?Sized>(
    rng: &mut R,
    length: i64,
    kind: &str,
) -> Result<String, IbanError> {
    let kind: CharacterType = kind.parse()?;
    let length = usize::try_from(length).unwrap_or(0);
    random_chars(rng, length, kind)
}
