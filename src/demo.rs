//! End-to-end self test
//!
//! Generates a key pair, pushes a small integer and a text message through
//! encrypt/decrypt, and writes every stage as a labeled line.

use std::io::Write;

use anyhow::{Context, Result};
use rand::RngCore;
use tracing::info;

use crate::config::RsaConfig;
use crate::rsa::bigint::{from_u64, to_decimal, RsaBigInt};
use crate::rsa::{codec, KeyDeriver, KeyStore, PrimeGenerator};

/// Integer pushed through the cipher before the text round trip ('a')
pub const SAMPLE_INTEGER: u64 = 97;

/// Default message for the text round trip
pub const SAMPLE_MESSAGE: &str = "Hello, RSA!";

/// Outcome of one demo run
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub modulus_bits: u64,
    pub integer_roundtrip: bool,
    pub plaintext: String,
    pub ciphertext: RsaBigInt,
    pub decrypted: String,
    pub passed: bool,
}

/// Run the full keygen / encode / encrypt / decrypt / decode pipeline
pub fn run_demo<W, R>(out: &mut W, config: &RsaConfig, message: &str, rng: R) -> Result<DemoReport>
where
    W: Write,
    R: RngCore,
{
    config.validate()?;

    let generator = PrimeGenerator::new(rng, config);
    let mut deriver = KeyDeriver::new(generator, config.clone());
    let mut store = KeyStore::new();
    deriver
        .generate_keys(&mut store)
        .context("Key generation failed")?;

    writeln!(out, "pubkey: {}", store.public_key()?)?;
    writeln!(out, "privkey: {}", store.private_key()?)?;
    writeln!(out, "modulo: {}", store.modulus()?)?;

    // Raw integer round trip
    let sample = from_u64(SAMPLE_INTEGER);
    writeln!(out, "plaintext: {}", SAMPLE_INTEGER)?;
    let encrypted = store.encrypt(&sample).context("Failed to encrypt sample integer")?;
    writeln!(out, "encrypted: {}", to_decimal(&encrypted))?;
    let decrypted = store.decrypt(&encrypted).context("Failed to decrypt sample integer")?;
    writeln!(out, "decrypted: {}", to_decimal(&decrypted))?;
    let integer_roundtrip = decrypted == sample;

    // Text round trip
    writeln!(out, "message: {}", message)?;
    let packed = codec::encode(message).context("Failed to encode message")?;
    writeln!(out, "encoded: {}", to_decimal(&packed))?;
    let ciphertext = store.encrypt(&packed).context("Failed to encrypt message")?;
    writeln!(out, "encrypted: {}", to_decimal(&ciphertext))?;
    let unpacked = store.decrypt(&ciphertext).context("Failed to decrypt message")?;
    let decrypted_text = codec::decode_integer(&unpacked).context("Failed to decode message")?;
    writeln!(out, "decrypted: {}", decrypted_text)?;

    let passed = integer_roundtrip && decrypted_text == message;
    writeln!(out, "result: {}", if passed { "PASS" } else { "FAIL" })?;

    let modulus_bits = store.modulus_bits()?;
    info!(modulus_bits, passed, "demo finished");

    Ok(DemoReport {
        modulus_bits,
        integer_roundtrip,
        plaintext: message.to_string(),
        ciphertext,
        decrypted: decrypted_text,
        passed,
    })
}
