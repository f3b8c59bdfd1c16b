// RSA Decryption Implementation
// Reverses the per-symbol encryption with the private exponent

use super::bigint::{mod_pow, RsaBigInt};
use super::encrypt::Ciphertext;
use super::keygen::RsaPrivateKey;
use crate::error::{Error, Result};

/// Decrypt a single block: m = c^d mod n
pub fn decrypt_block(c: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaBigInt {
    mod_pow(c, &private_key.d, &private_key.n)
}

/// Decrypt ciphertext to a string
///
/// # Errors
///
/// [`Error::InvalidSymbol`] if a block decrypts to a value that is not a
/// Unicode scalar value. This happens with the wrong key, and may happen when
/// a symbol's code point was not below n at encryption time.
pub fn decrypt(private_key: &RsaPrivateKey, ciphertext: &Ciphertext) -> Result<String> {
    ciphertext
        .iter()
        .map(|block| {
            let m = decrypt_block(block, private_key);
            u32::try_from(&m)
                .ok()
                .and_then(char::from_u32)
                .ok_or(Error::InvalidSymbol(m))
        })
        .collect()
}
