//! BN254 Verifier CLI
//!
//! Verifies a Groth16 or PLONK proof read from files and prints `true` or
//! `false` on stdout. Exit status is 0 for a valid proof, 1 for an invalid
//! one and 2 when the input cannot be decoded.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bn254_verifier::{groth16, plonk};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bn254-verify", version, about = "Verify Groth16 and PLONK proofs over BN254")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a gnark Groth16 proof
    Groth16(ProofArgs),
    /// Verify a PLONK proof
    Plonk {
        #[command(flatten)]
        args: ProofArgs,

        /// Write the verifier trace as JSON to this file
        #[arg(long)]
        trace: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ProofArgs {
    /// Proof file
    #[arg(long)]
    proof: PathBuf,

    /// Verifying key file
    #[arg(long)]
    vk: PathBuf,

    /// Public inputs file, concatenated 32-byte big-endian scalars
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Files hold hex text instead of raw bytes
    #[arg(long)]
    hex: bool,

    /// Print `false` instead of failing on undecodable input
    #[arg(long)]
    fold_errors: bool,
}

struct Inputs {
    proof: Vec<u8>,
    vk: Vec<u8>,
    public_inputs: Vec<u8>,
}

fn read_file(path: &Path, hex: bool) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if !hex {
        return Ok(bytes);
    }
    let text = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
    let digits: String = text.split_whitespace().collect();
    let digits = digits.strip_prefix("0x").unwrap_or(&digits);
    hex::decode(digits).with_context(|| format!("{} is not valid hex", path.display()))
}

impl ProofArgs {
    fn load(&self) -> Result<Inputs> {
        let public_inputs = match &self.inputs {
            Some(path) => read_file(path, self.hex)?,
            None => Vec::new(),
        };
        Ok(Inputs {
            proof: read_file(&self.proof, self.hex)?,
            vk: read_file(&self.vk, self.hex)?,
            public_inputs,
        })
    }
}

fn run(command: &Command) -> Result<bool> {
    match command {
        Command::Groth16(args) => {
            let input = args.load()?;
            Ok(groth16::verify(&input.proof, &input.vk, &input.public_inputs)?)
        }
        Command::Plonk { args, trace } => {
            let input = args.load()?;
            let Some(trace_path) = trace else {
                return Ok(plonk::verify(&input.proof, &input.vk, &input.public_inputs)?);
            };

            let (valid, trace) =
                plonk::verify_bytes_with_trace(&input.proof, &input.vk, &input.public_inputs)?;
            let json = serde_json::to_string_pretty(&trace)?;
            fs::write(trace_path, json)
                .with_context(|| format!("failed to write {}", trace_path.display()))?;
            tracing::info!(path = %trace_path.display(), "wrote verifier trace");
            Ok(valid)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let fold_errors = match &cli.command {
        Command::Groth16(args) | Command::Plonk { args, .. } => args.fold_errors,
    };

    match run(&cli.command) {
        Ok(valid) => {
            println!("{}", valid);
            if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) if fold_errors => {
            tracing::warn!("{:#}", err);
            println!("false");
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
