// RSA Prime Operations
// Miller-Rabin primality oracle and random prime sampling

use log::debug;
use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::One;
use rand::{thread_rng, Rng};

use super::bigint::{mod_pow, RsaBigInt};
use crate::error::{Error, Result};
use crate::util::config::DEFAULT_ROUNDS;

/// Miller-Rabin primality test
/// Returns true if n is probably prime. A composite survives with
/// probability at most 4^-rounds. At least one round is always run.
pub fn is_probably_prime(n: &RsaBigInt, rounds: u32) -> bool {
    is_probably_prime_with(n, rounds, &mut thread_rng())
}

/// Miller-Rabin primality test drawing witnesses from `rng`
pub fn is_probably_prime_with<R: Rng + ?Sized>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    let two = RsaBigInt::from(2u8);

    if n < &two {
        return false;
    }
    if n == &two || n == &RsaBigInt::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    // Zero rounds would pass every odd n
    for _ in 0..rounds.max(1) {
        // Witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        let mut passed = false;
        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                passed = true;
                break;
            }
        }

        if !passed {
            // a witnesses compositeness
            return false;
        }
    }

    true
}

/// Generate a random prime of the specified bit length
///
/// The result lies in [2^(bits-1), 2^bits - 1]. `bits` must be at least 2.
pub fn generate_prime(bits: u32) -> RsaBigInt {
    generate_prime_with(bits, DEFAULT_ROUNDS, &mut thread_rng())
}

/// Generate a random prime, resampling until a candidate passes
///
/// The loop has no bound; see [`try_generate_prime`] for a bounded search.
pub fn generate_prime_with<R: Rng + ?Sized>(bits: u32, rounds: u32, rng: &mut R) -> RsaBigInt {
    let (lower, upper) = bit_range(bits);
    let mut attempts = 0u64;

    loop {
        attempts += 1;
        if let Some(prime) = draw_candidate(&lower, &upper, rounds, rng) {
            debug!("found {}-bit prime after {} draws", bits, attempts);
            return prime;
        }
    }
}

/// Generate a random prime, giving up after `max_attempts` draws
///
/// # Errors
///
/// [`Error::AttemptsExhausted`] if no draw passed.
pub fn try_generate_prime<R: Rng + ?Sized>(
    bits: u32,
    rounds: u32,
    max_attempts: u64,
    rng: &mut R,
) -> Result<RsaBigInt> {
    let (lower, upper) = bit_range(bits);

    for attempt in 1..=max_attempts {
        if let Some(prime) = draw_candidate(&lower, &upper, rounds, rng) {
            debug!("found {}-bit prime after {} draws", bits, attempt);
            return Ok(prime);
        }
    }

    debug!("no {}-bit prime in {} draws", bits, max_attempts);
    Err(Error::AttemptsExhausted { attempts: max_attempts })
}

/// Half-open sampling range [2^(bits-1), 2^bits)
fn bit_range(bits: u32) -> (RsaBigInt, RsaBigInt) {
    debug_assert!(bits >= 2, "prime bit length must be at least 2");

    let lower = RsaBigInt::one() << (bits - 1);
    let upper = RsaBigInt::one() << bits;
    (lower, upper)
}

fn draw_candidate<R: Rng + ?Sized>(
    lower: &RsaBigInt,
    upper: &RsaBigInt,
    rounds: u32,
    rng: &mut R,
) -> Option<RsaBigInt> {
    let candidate = rng.gen_biguint_range(lower, upper);

    // Even candidates are redrawn, not bumped to the next odd value
    if candidate.is_even() || !is_probably_prime_with(&candidate, rounds, rng) {
        return None;
    }

    Some(candidate)
}
