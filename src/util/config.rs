// Key Generation Settings
// Bit lengths, Miller-Rabin rounds and retry bounds for the sampling loops

/// Prime factor size used when none is configured.
pub const DEFAULT_PRIME_BITS: u32 = 16;

/// Miller-Rabin rounds used when none is configured.
pub const DEFAULT_ROUNDS: u32 = 5;

/// Configuration for key generation
///
/// `max_attempts` bounds every resampling loop (prime search and public
/// exponent search). `None` keeps them unbounded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeygenConfig {
    pub prime_bits: u32,
    pub rounds: u32,
    pub max_attempts: Option<u64>,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            prime_bits: DEFAULT_PRIME_BITS,
            rounds: DEFAULT_ROUNDS,
            max_attempts: None,
        }
    }
}

impl KeygenConfig {
    pub fn with_prime_bits(mut self, bits: u32) -> Self {
        self.prime_bits = bits;
        self
    }

    /// Miller-Rabin rounds, at least 1
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds.max(1);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u64) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// True once `attempts` draws have been made and the bound is reached.
    pub(crate) fn exhausted(&self, attempts: u64) -> bool {
        matches!(self.max_attempts, Some(max) if attempts >= max)
    }
}
