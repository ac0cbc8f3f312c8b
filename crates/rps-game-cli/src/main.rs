//! RPS Game CLI
//!
//! Play an N-move rock-paper-scissors round against the computer. The computer
//! publishes an HMAC of its move before you choose and discloses the key after,
//! so you can check it did not change its mind.

mod session;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rps_game_core::{verify_commitment, Commitment, ConfigIssue, GameError, HmacKey, RelationTable};
use session::Session;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "rps-game")]
#[command(about = "Generalized rock-paper-scissors with a provably fair computer opponent")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer
    Play {
        /// Odd number (at least 3) of distinct moves, each beating the half
        /// of the list that precedes it
        moves: Vec<String>,
    },

    /// Check a disclosed move and key against the HMAC shown before the round
    Verify {
        /// Computer's move as disclosed after the round
        #[arg(long = "move")]
        secret_move: String,

        /// Key disclosed after the round (hex)
        #[arg(long)]
        key: HmacKey,

        /// HMAC shown before the round (hex)
        #[arg(long)]
        hmac: Commitment,
    },
}

fn config_message(issue: &ConfigIssue) -> &'static str {
    match issue {
        ConfigIssue::TooFewMoves(_) => "There must be at least 3 moves!",
        ConfigIssue::DuplicateMove(_) => "All moves must have unique names!",
        ConfigIssue::EvenMoveCount(_) => "There must be an odd number of moves!",
    }
}

fn print_usage_error(message: &str) {
    eprintln!("Error: {message}");
    eprintln!("For example:");
    eprintln!("rps-game play rock paper scissors");
    eprintln!("rps-game play rock spock paper lizard scissors");
}

/// Returns false when the move list is rejected
fn play(moves: Vec<String>) -> Result<bool> {
    let table = match RelationTable::build(moves) {
        Ok(table) => Arc::new(table),
        Err(GameError::InvalidConfiguration(issue)) => {
            print_usage_error(config_message(&issue));
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };
    info!(moves = table.moves().len(), "starting session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(table, stdin.lock(), stdout.lock()).run()?;
    Ok(true)
}

fn verify(secret_move: &str, key: &HmacKey, hmac: &Commitment) -> bool {
    let valid = verify_commitment(secret_move, key, hmac);
    if valid {
        println!("OK: HMAC matches move {secret_move:?}");
    } else {
        println!("MISMATCH: HMAC does not match move {secret_move:?} under this key");
    }
    valid
}

fn run(cli: Cli) -> Result<bool> {
    // Logs go to stderr, quiet by default so they don't interleave with the game
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Play { moves } => play(moves),
        Commands::Verify {
            secret_move,
            key,
            hmac,
        } => Ok(verify(&secret_move, &key, &hmac)),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
