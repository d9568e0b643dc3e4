//! The `sigaid` command set.

mod face;
mod identity;
mod lease;
mod serve;

use clap::{Parser, Subcommand};

pub use serve::ServeArgs;

/// SIGAID: verifiable identity, exclusive leases, and tamper-evident
/// action logs for autonomous agents.
#[derive(Parser)]
#[command(name = "sigaid", version, about)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Generate a keypair and write an encrypted keyfile.
    Keygen(identity::KeygenArgs),
    /// Print the identity stored in a keyfile.
    Inspect(identity::InspectArgs),
    /// Render or describe a visual identity.
    #[command(subcommand)]
    Face(face::FaceCommand),
    /// Run an Authority gateway.
    Serve(ServeArgs),
    /// Lease operations against an Authority.
    #[command(subcommand)]
    Lease(lease::LeaseCommand),
    /// Append an action to the agent's state chain.
    Append(lease::AppendArgs),
    /// Produce a proof bundle for a verifier challenge.
    Prove(lease::ProveArgs),
    /// Verify a proof bundle offline.
    Verify(lease::VerifyArgs),
}

/// Dispatches a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Keygen(args) => identity::keygen(args),
        Command::Inspect(args) => identity::inspect(args),
        Command::Face(command) => face::run(command),
        Command::Serve(args) => serve::run(args).await,
        Command::Lease(command) => lease::run(command).await,
        Command::Append(args) => lease::append(args).await,
        Command::Prove(args) => lease::prove(args).await,
        Command::Verify(args) => lease::verify(args).await,
    }
}
