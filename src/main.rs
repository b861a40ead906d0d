use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use textbook_rsa::demo::{run_demo, SAMPLE_MESSAGE};
use textbook_rsa::rsa::clock_seeded_rng;
use textbook_rsa::RsaConfig;

#[derive(Parser)]
#[command(name = "textbook-rsa")]
#[command(version)]
#[command(about = "Generate a textbook RSA key pair and round-trip a message through it")]
struct Cli {
    /// Message to encrypt and decrypt
    #[arg(short, long, default_value = SAMPLE_MESSAGE)]
    message: String,

    /// Prime width in bits (the modulus is twice as wide)
    #[arg(short, long)]
    bits: Option<u64>,

    /// Fixed RNG seed instead of the wall clock
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with key generation settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => RsaConfig::load(path)?,
        None => RsaConfig::default(),
    };
    if let Some(bits) = cli.bits {
        config = config.with_prime_bits(bits);
    }
    info!(prime_bits = config.prime_bits, "generating key pair");

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => clock_seeded_rng(),
    };

    let stdout = io::stdout();
    let report = run_demo(&mut stdout.lock(), &config, &cli.message, rng)?;
    Ok(report.passed)
}

fn main() {
    init_logging();

    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => {
            error!("round trip did not reproduce the message");
            process::exit(1);
        }
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}
