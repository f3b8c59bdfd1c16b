// RSA Module - Main module file
// Exports the number-theoretic engine and the block cipher

pub mod bigint;
pub mod prime;
pub mod keygen;
pub mod encrypt;
pub mod decrypt;

pub use bigint::{gcd, lcm, mod_pow, modular_inverse, RsaBigInt};
pub use prime::{generate_prime, generate_prime_with, is_probably_prime, is_probably_prime_with, try_generate_prime};
pub use keygen::{generate_keypair, generate_keypair_with, RsaKeyPair, RsaPublicKey, RsaPrivateKey};
pub use encrypt::{encrypt, encrypt_block, Ciphertext};
pub use decrypt::{decrypt, decrypt_block};
