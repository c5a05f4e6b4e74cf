use crate::bban::layout_for;
use crate::checksum::check_digits_for;
use crate::config::IbanConfig;
use crate::error::IbanError;
use crate::models::BankInfo;
use crate::random::Entropy;

use rand::RngCore;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Mutex;

pub const MAX_CACHE_SIZE: usize = 1000;

/// Builds IBANs for the countries of one configuration.
pub struct IbanGenerator<'a> {
    config: &'a IbanConfig,
}

impl<'a> IbanGenerator<'a> {
    pub fn new(config: &'a IbanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a IbanConfig {
        self.config
    }

    pub fn is_country_supported(&self, country: &str) -> bool {
        self.config.is_country_supported(country) && layout_for(country).is_some()
    }

    /// Generates one IBAN from the operating-system random source.
    pub fn generate(&self, country: &str, bank: Option<&BankInfo>) -> Result<String, IbanError> {
        self.generate_with(&mut Entropy::os(), country, bank)
    }

    pub fn generate_with<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        country: &str,
        bank: Option<&BankInfo>,
    ) -> Result<String, IbanError> {
        let (spec, layout) = match (self.config.spec_ref(country), layout_for(country)) {
            (Some(spec), Some(layout)) => (spec, layout),
            _ => {
                return Err(IbanError::CountryNotSupported {
                    country: country.to_string(),
                })
            }
        };

        let bban = layout.assemble(country, spec, bank, rng)?;
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

        let check = check_digits_for(country, &bban).ok_or_else(|| {
            IbanError::generation("Failed to calculate IBAN check digits", country)
        })?;
        Ok(format!("{country}{check}{bban}"))
    }

    /// Generates `quantity` IBANs; every unit succeeds or fails on its own.
    pub fn generate_batch<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        country: &str,
        bank: Option<&BankInfo>,
        quantity: usize,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            country: country.to_string(),
            requested: quantity,
            ibans: Vec::with_capacity(quantity),
            failures: Vec::new(),
        };
        for _ in 0..quantity {
            match self.generate_with(rng, country, bank) {
                Ok(iban) => outcome.ibans.push(iban),
                Err(err) => {
                    log::warn!("IBAN generation failed: {err}");
                    outcome.failures.push(err);
                }
            }
        }
        log::debug!(
            "batch for {}: {} generated, {} failed",
            country,
            outcome.ibans.len(),
            outcome.failures.len()
        );
        outcome
    }

    /// Memoized [`IbanGenerator::generate`]: repeated calls with the same
    /// country and bank code return the cached IBAN until it is evicted.
    pub fn generate_cached(
        &self,
        cache: &GenerationCache,
        country: &str,
        bank: Option<&BankInfo>,
    ) -> Result<String, IbanError> {
        let key = CacheKey::new(country, bank);
        if let Some(hit) = cache.get(&key) {
            return Ok(hit);
        }
        let iban = self.generate(country, bank)?;
        cache.insert(key, iban.clone());
        Ok(iban)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Complete,
    Partial { failed: usize, total: usize },
    Failed,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => f.write_str("complete"),
            Self::Partial { failed, total } => {
                write!(f, "{failed} of {total} could not be generated")
            }
            Self::Failed => f.write_str("no IBANs could be generated"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub country: String,
    pub requested: usize,
    pub ibans: Vec<String>,
    pub failures: Vec<IbanError>,
}

impl BatchOutcome {
    pub fn status(&self) -> BatchStatus {
        if self.failures.is_empty() {
            BatchStatus::Complete
        } else if self.ibans.is_empty() {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial {
                failed: self.failures.len(),
                total: self.requested,
            }
        }
    }

    /// User-facing summary, `None` when every unit succeeded.
    pub fn summary(&self) -> Option<String> {
        match self.status() {
            BatchStatus::Complete => None,
            status @ BatchStatus::Partial { .. } => Some(status.to_string()),
            BatchStatus::Failed => Some(match self.failures.first() {
                Some(err) => format!("Failed to generate IBANs for {}: {}", self.country, err),
                None => format!("Failed to generate IBANs for {}", self.country),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub country: String,
    pub bank_code: Option<String>,
}

impl CacheKey {
    pub fn new(country: &str, bank: Option<&BankInfo>) -> Self {
        Self {
            country: country.to_string(),
            bank_code: bank.map(|bank| bank.code.clone()),
        }
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
}

/// Bounded memo of generated IBANs, evicting the oldest entry when full.
/// Safe to share between threads and to clear at any time.
pub struct GenerationCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl GenerationCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, iban: String) {
        let mut state = self.lock();
        if state.entries.contains_key(&key) {
            state.entries.insert(key, iban);
            return;
        }
        while state.entries.len() >= self.capacity {
            match state.order.pop_front() {
                Some(oldest) => {
                    state.entries.remove(&oldest);
                }
                None => break,
            }
        }
        state.order.push_back(key.clone());
        state.entries.insert(key, iban);
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GenerationCache {
    fn default() -> Self {
        Self::new()
    }
}
