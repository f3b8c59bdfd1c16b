//! Textbook RSA over small moduli.
//!
//! Miller-Rabin primality testing, random prime sampling, keypair derivation
//! through the extended Euclidean algorithm, and per-symbol modular
//! exponentiation. No padding: every symbol is encrypted on its own, so this
//! is for learning the number theory, not for protecting data.
//!
//! ```
//! use textbook_rsa::rsa::{generate_keypair, RsaBigInt};
//!
//! let keypair = generate_keypair(Some(RsaBigInt::from(61u32)), Some(RsaBigInt::from(53u32)))?;
//! let ciphertext = keypair.public_key.encrypt("Hi");
//! assert_eq!(keypair.private_key.decrypt(&ciphertext)?, "Hi");
//! # Ok::<(), textbook_rsa::Error>(())
//! ```

pub mod error;
pub mod rsa;
pub mod util;

pub use error::{Error, Result};
pub use rsa::{decrypt, encrypt, generate_keypair, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use util::KeygenConfig;
