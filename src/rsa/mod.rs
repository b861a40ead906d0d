// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod keystore;
pub mod prime;

pub use decrypt::{decrypt, decrypt_to_text};
pub use encrypt::{encrypt, encrypt_text};
pub use keygen::{derive_key_material, totient, KeyDeriver, KeyMaterial};
pub use keystore::KeyStore;
pub use prime::{clock_seeded_rng, FixedPrimes, PrimeGenerator, PrimeSource};
