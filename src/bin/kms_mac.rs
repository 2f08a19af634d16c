//! kms-mac: generate and verify HMACs with keys from a seed document.
//!
//! Exits non-zero when the request fails or when `verify` finds the MAC
//! invalid.

use std::process::ExitCode;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::{Parser, Subcommand};
use kms_mac::cli::args::{CommonArgs, MacArgs, OutputArgs};
use kms_mac::cli::output::{write_error, write_generate, write_verify};
use kms_mac::{GenerateMacRequest, MacService, VerifyMacRequest};

/// Generate and verify HMACs the way KMS GenerateMac/VerifyMac do.
#[derive(Debug, Parser)]
#[command(name = "kms-mac", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a MAC for a message.
    Generate(Invocation),
    /// Verify a MAC for a message.
    Verify {
        #[command(flatten)]
        invocation: Invocation,

        /// MAC to verify, base64-encoded.
        #[arg(long = "mac", value_name = "BASE64")]
        expected: String,
    },
}

/// Arguments every subcommand takes.
#[derive(Debug, Parser)]
struct Invocation {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    mac: MacArgs,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let (invocation, expected) = match args.command {
        Command::Generate(invocation) => (invocation, None),
        Command::Verify {
            invocation,
            expected,
        } => (invocation, Some(expected)),
    };
    let Invocation {
        common,
        mac,
        output,
    } = invocation;

    output.init_tracing();

    let registry = match common.load_registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let service = MacService::new(Arc::new(registry));
    let format = output.format;
    let mut stdout = std::io::stdout().lock();

    let written = match expected {
        None => {
            let request = GenerateMacRequest::new(mac.key_id, mac.message, mac.algorithm);
            match service.generate_mac(&request) {
                Ok(response) => write_generate(&mut stdout, format, &response).map(|_| true),
                Err(e) => write_error(&mut std::io::stderr(), format, &e).map(|_| false),
            }
        }
        Some(expected) => {
            let expected = match STANDARD.decode(expected.as_bytes()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    eprintln!("Error: --mac is not valid base64: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let request = VerifyMacRequest::new(mac.key_id, mac.message, expected, mac.algorithm);
            match service.verify_mac(&request) {
                Ok(response) => {
                    write_verify(&mut stdout, format, &response).map(|_| response.mac_valid)
                }
                Err(e) => write_error(&mut std::io::stderr(), format, &e).map(|_| false),
            }
        }
    };

    match written {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
