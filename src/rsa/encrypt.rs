// RSA Encryption Implementation
// Textbook RSA applied independently to each symbol of a message

use std::fmt;
use std::ops::Deref;

use log::warn;

use super::bigint::{mod_pow, RsaBigInt};
use super::keygen::RsaPublicKey;

/// Encrypted message: one block per plaintext symbol, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ciphertext {
    blocks: Vec<RsaBigInt>,
}

impl Ciphertext {
    pub fn new(blocks: Vec<RsaBigInt>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[RsaBigInt] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<RsaBigInt> {
        self.blocks
    }
}

impl Deref for Ciphertext {
    type Target = [RsaBigInt];

    fn deref(&self) -> &Self::Target {
        &self.blocks
    }
}

impl FromIterator<RsaBigInt> for Ciphertext {
    fn from_iter<I: IntoIterator<Item = RsaBigInt>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Ciphertext {
    type Item = RsaBigInt;
    type IntoIter = std::vec::IntoIter<RsaBigInt>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ciphertext {
    type Item = &'a RsaBigInt;
    type IntoIter = std::slice::Iter<'a, RsaBigInt>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Space-separated decimal blocks
impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut blocks = self.blocks.iter();
        if let Some(first) = blocks.next() {
            write!(f, "{}", first)?;
        }
        for block in blocks {
            write!(f, " {}", block)?;
        }
        Ok(())
    }
}

/// Encrypt a single block: c = m^e mod n
pub fn encrypt_block(m: &RsaBigInt, public_key: &RsaPublicKey) -> RsaBigInt {
    mod_pow(m, &public_key.e, &public_key.n)
}

/// Encrypt a string using RSA public key
///
/// Each symbol's Unicode scalar value is encrypted on its own. Symbols whose
/// code point is not below n are still encrypted but will not decrypt back
/// to the same symbol.
pub fn encrypt(public_key: &RsaPublicKey, plaintext: &str) -> Ciphertext {
    if !public_key.accepts(plaintext) {
        warn!(
            "plaintext has symbols at or above the {}-bit modulus; they will not round-trip",
            public_key.bit_length()
        );
    }

    plaintext
        .chars()
        .map(|symbol| encrypt_block(&RsaBigInt::from(u32::from(symbol)), public_key))
        .collect()
}
