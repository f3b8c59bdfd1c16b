// RSA Big Integer Operations
// Modular arithmetic kernel over num-bigint: gcd, modular exponentiation, modular inverse

use num_bigint::BigInt;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply, reducing every intermediate modulo `modulus`.
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &RsaBigInt, b: &RsaBigInt) -> (RsaBigInt, BigInt, BigInt) {
    let mut r0 = a.clone();
    let mut r1 = b.clone();
    let (mut x1, mut x2) = (BigInt::one(), BigInt::zero());
    let (mut y1, mut y2) = (BigInt::zero(), BigInt::one());

    while !r1.is_zero() {
        let (quotient, remainder) = r0.div_rem(&r1);
        r0 = std::mem::replace(&mut r1, remainder);

        let quotient = BigInt::from(quotient);
        let next_x = &x1 - &quotient * &x2;
        x1 = std::mem::replace(&mut x2, next_x);
        let next_y = &y1 - &quotient * &y2;
        y1 = std::mem::replace(&mut y2, next_y);
    }

    (r0, x1, y1)
}

/// Compute modular inverse: e^(-1) mod phi
///
/// Returns d in [0, phi) with e*d ≡ 1 (mod phi).
///
/// # Errors
///
/// [`Error::NoInverseExists`] when gcd(e, phi) != 1 or phi is zero.
pub fn modular_inverse(e: &RsaBigInt, phi: &RsaBigInt) -> Result<RsaBigInt> {
    let no_inverse = || Error::NoInverseExists {
        value: e.clone(),
        modulus: phi.clone(),
    };

    if phi.is_zero() {
        return Err(no_inverse());
    }

    let (gcd, x, _) = extended_gcd(e, phi);
    if !gcd.is_one() {
        return Err(no_inverse());
    }

    // mod_floor by a positive modulus is never negative
    let (_, inverse) = x.mod_floor(&BigInt::from(phi.clone())).into_parts();
    Ok(inverse)
}

/// Greatest common divisor
/// Iterative Euclid; gcd(0, b) = b and gcd(0, 0) = 0.
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    let mut a = a.clone();
    let mut b = b.clone();

    while !b.is_zero() {
        let remainder = &a % &b;
        a = std::mem::replace(&mut b, remainder);
    }

    a
}

/// Least common multiple
pub fn lcm(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    if a.is_zero() || b.is_zero() {
        return RsaBigInt::zero();
    }
    (a * b) / gcd(a, b)
}
