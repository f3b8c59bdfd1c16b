// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;

use log::{debug, info, warn};
use num_bigint::RandBigInt;
use num_traits::One;
use rand::{thread_rng, Rng};

use super::bigint::{gcd, modular_inverse, RsaBigInt};
use super::decrypt::decrypt;
use super::encrypt::{encrypt, Ciphertext};
use super::prime::{generate_prime_with, is_probably_prime_with, try_generate_prime};
use crate::error::{Error, Result};
use crate::util::config::KeygenConfig;

/// RSA Public Key
///
/// Fields are public; `n` must be non-zero.
///
/// # Panics
///
/// Encrypting with `n == 0` panics in [`mod_pow`](super::bigint::mod_pow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub e: RsaBigInt, // Public exponent
    pub n: RsaBigInt, // Modulus
}

/// RSA Private Key
///
/// # Panics
///
/// Decrypting with `n == 0` panics in [`mod_pow`](super::bigint::mod_pow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub d: RsaBigInt, // Private exponent
    pub n: RsaBigInt, // Modulus (same as public)
}

/// RSA Key Pair, together with the primes it was derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub p: RsaBigInt,
    pub q: RsaBigInt,
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// True if every symbol of `text` has a code point below n, i.e. the
    /// text survives an encrypt/decrypt round trip under this key.
    pub fn accepts(&self, text: &str) -> bool {
        text.chars().all(|symbol| RsaBigInt::from(u32::from(symbol)) < self.n)
    }

    /// Encrypt a message symbol by symbol using this public key
    pub fn encrypt(&self, plaintext: &str) -> Ciphertext {
        encrypt(self, plaintext)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Decrypt a ciphertext using this private key
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<String> {
        decrypt(self, ciphertext)
    }
}

impl RsaKeyPair {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }

    /// The primes n was built from
    pub fn primes(&self) -> (&RsaBigInt, &RsaBigInt) {
        (&self.p, &self.q)
    }

    /// Euler's totient φ(n) = (p-1)(q-1)
    pub fn phi(&self) -> RsaBigInt {
        (&self.p - 1u8) * (&self.q - 1u8)
    }
}

impl fmt::Display for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.e, self.n)
    }
}

impl fmt::Display for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.d, self.n)
    }
}

/// Generate an RSA key pair with default settings
///
/// With both `p` and `q` given, they are validated and used. Otherwise two
/// distinct 16-bit primes are sampled.
///
/// # Errors
///
/// [`Error::InputNotPrime`] or [`Error::DuplicatePrimes`] for bad supplied
/// primes; [`Error::NoValidExponent`] when φ(n) leaves no exponent to pick.
pub fn generate_keypair(p: Option<RsaBigInt>, q: Option<RsaBigInt>) -> Result<RsaKeyPair> {
    generate_keypair_with(&KeygenConfig::default(), p, q, &mut thread_rng())
}

/// Generate an RSA key pair from an explicit configuration and random source
///
/// # Errors
///
/// As [`generate_keypair`], plus [`Error::AttemptsExhausted`] when
/// `config.max_attempts` is set and a sampling loop runs out.
pub fn generate_keypair_with<R: Rng + ?Sized>(
    config: &KeygenConfig,
    p: Option<RsaBigInt>,
    q: Option<RsaBigInt>,
    rng: &mut R,
) -> Result<RsaKeyPair> {
    // Step 1: Obtain two distinct primes p and q
    let (p, q) = match (p, q) {
        (Some(p), Some(q)) => validate_primes(p, q, config.rounds, rng)?,
        (p, q) => {
            if p.is_some() || q.is_some() {
                warn!("only one prime supplied, sampling both p and q");
            }
            sample_primes(config, rng)?
        }
    };

    // Step 2: Compute n = p * q
    let n = &p * &q;

    // Step 3: Compute φ(n) = (p-1)(q-1)
    let phi = (&p - 1u8) * (&q - 1u8);

    // Step 4: Pick e in [2, φ(n)) coprime to φ(n)
    let e = choose_exponent(&phi, config, rng)?;

    // Step 5: Compute d = e^(-1) mod φ(n)
    let d = match modular_inverse(&e, &phi) {
        Ok(d) => d,
        Err(err) => unreachable!("exponent was checked coprime to phi: {}", err),
    };

    info!("generated keypair with {}-bit modulus", n.bits());

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { e, n: n.clone() },
        private_key: RsaPrivateKey { d, n },
        p,
        q,
    })
}

fn validate_primes<R: Rng + ?Sized>(
    p: RsaBigInt,
    q: RsaBigInt,
    rounds: u32,
    rng: &mut R,
) -> Result<(RsaBigInt, RsaBigInt)> {
    for candidate in [&p, &q] {
        if !is_probably_prime_with(candidate, rounds, rng) {
            return Err(Error::InputNotPrime(candidate.clone()));
        }
    }

    if p == q {
        return Err(Error::DuplicatePrimes(p));
    }

    Ok((p, q))
}

fn sample_primes<R: Rng + ?Sized>(
    config: &KeygenConfig,
    rng: &mut R,
) -> Result<(RsaBigInt, RsaBigInt)> {
    let next_prime = |rng: &mut R| match config.max_attempts {
        Some(max) => try_generate_prime(config.prime_bits, config.rounds, max, rng),
        None => Ok(generate_prime_with(config.prime_bits, config.rounds, rng)),
    };

    let p = next_prime(&mut *rng)?;
    let mut q = next_prime(&mut *rng)?;

    // Ensure p != q
    let mut redraws = 0u64;
    while q == p {
        if config.exhausted(redraws) {
            return Err(Error::AttemptsExhausted { attempts: redraws });
        }
        redraws += 1;
        q = next_prime(&mut *rng)?;
    }

    if redraws > 0 {
        debug!("redrew q {} times to keep it distinct from p", redraws);
    }

    Ok((p, q))
}

fn choose_exponent<R: Rng + ?Sized>(
    phi: &RsaBigInt,
    config: &KeygenConfig,
    rng: &mut R,
) -> Result<RsaBigInt> {
    let two = RsaBigInt::from(2u8);

    // [2, φ) holds a unit only when φ > 2
    if phi <= &two {
        return Err(Error::NoValidExponent { phi: phi.clone() });
    }

    let mut attempts = 0u64;
    loop {
        if config.exhausted(attempts) {
            return Err(Error::AttemptsExhausted { attempts });
        }
        attempts += 1;

        let e = rng.gen_biguint_range(&two, phi);
        if gcd(&e, phi).is_one() {
            debug!("picked public exponent after {} draws", attempts);
            return Ok(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::bigint::from_u64;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn assert_invariants(keypair: &RsaKeyPair) {
        let (p, q) = keypair.primes();
        let phi = keypair.phi();

        // Verify n = p * q
        assert_eq!(keypair.public_key.n, p * q);
        assert_eq!(keypair.private_key.n, keypair.public_key.n);
        assert_ne!(p, q);

        // Verify 1 < e < φ(n) and gcd(e, φ(n)) = 1
        assert!(keypair.public_key.e > RsaBigInt::one());
        assert!(keypair.public_key.e < phi);
        assert!(gcd(&keypair.public_key.e, &phi).is_one());

        // Verify e * d ≡ 1 (mod φ(n))
        let product = &keypair.public_key.e * &keypair.private_key.d;
        assert!((product % &phi).is_one());
    }

    #[test_log::test]
    fn test_key_generation() {
        let keypair = generate_keypair(None, None).unwrap();
        assert_invariants(&keypair);

        let (p, q) = keypair.primes();
        assert_eq!(p.bits(), 16);
        assert_eq!(q.bits(), 16);
        assert!(keypair.bit_length() >= 31 && keypair.bit_length() <= 32);
    }

    #[test]
    fn test_seeded_generation() {
        let config = KeygenConfig::default().with_prime_bits(20);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let keypair = generate_keypair_with(&config, None, None, &mut rng).unwrap();
            assert_invariants(&keypair);
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = KeygenConfig::default();
        let a = generate_keypair_with(&config, None, None, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = generate_keypair_with(&config, None, None, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_supplied_primes() {
        let keypair = generate_keypair(Some(from_u64(61)), Some(from_u64(53))).unwrap();
        assert_invariants(&keypair);
        assert_eq!(keypair.public_key.n, from_u64(3233));
        assert_eq!(keypair.phi(), from_u64(3120));
        assert_eq!(keypair.primes(), (&from_u64(61), &from_u64(53)));
    }

    #[test]
    fn test_supplied_non_prime() {
        let err = generate_keypair(Some(from_u64(60)), Some(from_u64(53))).unwrap_err();
        assert_eq!(err, Error::InputNotPrime(from_u64(60)));

        let err = generate_keypair(Some(from_u64(61)), Some(from_u64(561))).unwrap_err();
        assert_eq!(err, Error::InputNotPrime(from_u64(561)));

        let err = generate_keypair(Some(from_u64(1)), Some(from_u64(53))).unwrap_err();
        assert_eq!(err, Error::InputNotPrime(from_u64(1)));
    }

    #[test]
    fn test_supplied_composites_rejected_with_zero_rounds() {
        let mut config = KeygenConfig::default();
        config.rounds = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let err = generate_keypair_with(&config, Some(from_u64(9)), Some(from_u64(15)), &mut rng)
            .unwrap_err();
        assert_eq!(err, Error::InputNotPrime(from_u64(9)));

        let config = KeygenConfig::default().with_rounds(0);
        let err = generate_keypair_with(&config, Some(from_u64(61)), Some(from_u64(15)), &mut rng)
            .unwrap_err();
        assert_eq!(err, Error::InputNotPrime(from_u64(15)));
    }

    #[test]
    fn test_supplied_duplicate() {
        let err = generate_keypair(Some(from_u64(61)), Some(from_u64(61))).unwrap_err();
        assert_eq!(err, Error::DuplicatePrimes(from_u64(61)));
    }

    #[test]
    fn test_not_prime_reported_before_duplicate() {
        let err = generate_keypair(Some(from_u64(9)), Some(from_u64(9))).unwrap_err();
        assert_eq!(err, Error::InputNotPrime(from_u64(9)));
    }

    #[test]
    fn test_smallest_primes() {
        // φ = 2 leaves no exponent in [2, 2)
        let err = generate_keypair(Some(from_u64(2)), Some(from_u64(3))).unwrap_err();
        assert_eq!(err, Error::NoValidExponent { phi: from_u64(2) });

        // φ = 4 allows only e = 3
        let keypair = generate_keypair(Some(from_u64(2)), Some(from_u64(5))).unwrap();
        assert_eq!(keypair.public_key.e, from_u64(3));
        assert_eq!(keypair.private_key.d, from_u64(3));
    }

    #[test_log::test]
    fn test_single_prime_is_ignored() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let config = KeygenConfig::default();
        let keypair = generate_keypair_with(&config, Some(from_u64(61)), None, &mut rng).unwrap();
        assert_invariants(&keypair);
        assert_eq!(keypair.p.bits(), 16);
    }

    #[test]
    fn test_bounded_attempts() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let config = KeygenConfig::default().with_max_attempts(0);

        let err = generate_keypair_with(&config, None, None, &mut rng).unwrap_err();
        assert_eq!(err, Error::AttemptsExhausted { attempts: 0 });

        let err = generate_keypair_with(&config, Some(from_u64(61)), Some(from_u64(53)), &mut rng)
            .unwrap_err();
        assert_eq!(err, Error::AttemptsExhausted { attempts: 0 });
    }

    #[test]
    fn test_generous_bound_succeeds() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let config = KeygenConfig::default().with_max_attempts(100_000);
        let keypair = generate_keypair_with(&config, None, None, &mut rng).unwrap();
        assert_invariants(&keypair);
    }

    #[test]
    fn test_two_bit_primes_cannot_be_distinct() {
        // 3 is the only 2-bit prime
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let config = KeygenConfig::default().with_prime_bits(2).with_max_attempts(50);
        let err = generate_keypair_with(&config, None, None, &mut rng).unwrap_err();
        assert_eq!(err, Error::AttemptsExhausted { attempts: 50 });
    }

    #[test]
    fn test_display() {
        let public_key = RsaPublicKey { e: from_u64(17), n: from_u64(3233) };
        let private_key = RsaPrivateKey { d: from_u64(2753), n: from_u64(3233) };
        assert_eq!(public_key.to_string(), "(17, 3233)");
        assert_eq!(private_key.to_string(), "(2753, 3233)");
    }

    #[test]
    fn test_accepts() {
        let public_key = RsaPublicKey { e: from_u64(17), n: from_u64(3233) };
        assert!(public_key.accepts("Hello, RSA!"));
        assert!(!public_key.accepts("€"));
    }
}
