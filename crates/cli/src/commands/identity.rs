//! `keygen` and `inspect`.

use anyhow::{bail, Context};
use clap::Args;
use sigaid_crypto::key_store::KdfParams;
use sigaid_identity::KeyPair;
use std::path::PathBuf;

/// Arguments for `sigaid keygen`.
#[derive(Args)]
pub struct KeygenArgs {
    /// Where to write the encrypted keyfile.
    #[arg(long)]
    pub out: PathBuf,
    /// Passphrase protecting the keyfile.
    #[arg(long, env = "SIGAID_KEY_PASSWORD")]
    pub password: String,
    /// Optional 32-byte hex seed for a deterministic keypair.
    #[arg(long)]
    pub seed_hex: Option<String>,
}

/// Arguments for `sigaid inspect`.
#[derive(Args)]
pub struct InspectArgs {
    /// The keyfile to open.
    #[arg(long)]
    pub keyfile: PathBuf,
    /// Passphrase protecting the keyfile.
    #[arg(long, env = "SIGAID_KEY_PASSWORD")]
    pub password: String,
}

pub(crate) fn keygen(args: KeygenArgs) -> anyhow::Result<()> {
    let keypair = match &args.seed_hex {
        Some(seed_hex) => {
            let raw = hex::decode(seed_hex).context("seed is not valid hex")?;
            let seed: [u8; 32] = match raw.try_into() {
                Ok(seed) => seed,
                Err(_) => bail!("seed must be exactly 32 bytes"),
            };
            KeyPair::from_seed(seed)
        }
        None => KeyPair::generate()?,
    };

    keypair.to_keyfile(&args.out, &args.password, KdfParams::default())?;
    println!("{}", keypair.agent_id()?);
    Ok(())
}

pub(crate) fn inspect(args: InspectArgs) -> anyhow::Result<()> {
    let keypair = KeyPair::from_keyfile(&args.keyfile, &args.password)?;
    println!("agent_id:   {}", keypair.agent_id()?);
    println!("public_key: {}", hex::encode(keypair.public_key().to_bytes()));
    Ok(())
}
