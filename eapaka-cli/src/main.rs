//! eapaka - EAP-AKA peer command line tool
//!
//! Drives the two transport operations locally against the software USIM:
//! answering a framed challenge, and answering a bare RAND/AUTN pair.

mod reply;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use eapaka_client::{Authenticator, Challenge, SoftUsim, StaticImsi};
use eapaka_common::config::{load_client_config, validate_client_config, ClientConfig};
use eapaka_common::logging::{init_logging, LogLevel};

use reply::{ChallengeReply, ImsiReply, InfoReply, VectorReply};

/// eapaka - EAP-AKA peer
#[derive(Parser, Debug)]
#[command(name = "eapaka")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the client configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config_file: Option<PathBuf>,

    /// Override the log level from the configuration
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a hex encoded EAP-Request/AKA-Challenge
    Challenge {
        /// Challenge frame as hex
        #[arg(value_name = "HEX")]
        frame: String,
    },
    /// Run the AKA algorithm on RAND and AUTN and print RES/CK/IK
    RandAutn {
        /// RAND as 32 hex digits
        #[arg(long)]
        rand: String,
        /// AUTN as 32 hex digits
        #[arg(long)]
        autn: String,
    },
    /// Print the configured IMSI
    Imsi,
    /// Print tool name and version
    Info,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let path = args
        .config_file
        .as_ref()
        .context("A configuration file is required, pass it with --config")?;

    let config = load_client_config(path)
        .with_context(|| format!("Failed to load configuration file: {}", path.display()))?;
    validate_client_config(&config)
        .with_context(|| format!("Invalid configuration file: {}", path.display()))?;

    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value).context("Failed to serialize reply")?);
    Ok(())
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Command::Info = args.command {
        init_logging(args.log_level.unwrap_or_default());
        print_json(&InfoReply {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&args)?;
    init_logging(args.log_level.unwrap_or(config.log_level));
    tracing::debug!(realm = %config.realm, usim = ?config.usim, "Configuration loaded");

    let usim = SoftUsim::from_config(&config.usim);
    let authenticator =
        Authenticator::from_config(usim, StaticImsi::new(config.usim.imsi.clone()), &config);

    match args.command {
        Command::Challenge { frame } => {
            let result = Challenge::parse_hex(&frame).and_then(|c| authenticator.respond(&c));
            if let Err(e) = &result {
                tracing::error!("Challenge failed: {}", e);
            }
            print_json(&ChallengeReply::from_result(&result))?;
            Ok(exit_code(result.is_ok()))
        }
        Command::RandAutn { rand, autn } => {
            let result = Challenge::from_hex(&rand, &autn).and_then(|c| authenticator.respond(&c));
            let reply = VectorReply::from_result(&result);
            print_json(&reply)?;
            Ok(exit_code(!reply.is_error()))
        }
        Command::Imsi => {
            print_json(&ImsiReply {
                imsi: config.usim.imsi.clone(),
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Info => Ok(ExitCode::SUCCESS),
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
