// RSA Errors
// Failure modes surfaced by the key generator, the kernel and the block cipher

use num_bigint::BigUint;

/// Errors that can occur while deriving keys or running the block cipher.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("modular inverse does not exist: gcd({value}, {modulus}) != 1")]
    NoInverseExists { value: BigUint, modulus: BigUint },

    #[error("{0} is not prime")]
    InputNotPrime(BigUint),

    #[error("p and q must be distinct, both were {0}")]
    DuplicatePrimes(BigUint),

    #[error("no public exponent in [2, {phi}) is coprime to {phi}")]
    NoValidExponent { phi: BigUint },

    #[error("no acceptable candidate found after {attempts} attempts")]
    AttemptsExhausted { attempts: u64 },

    #[error("decrypted value {0} is not a valid symbol")]
    InvalidSymbol(BigUint),
}

pub type Result<T> = std::result::Result<T, Error>;
