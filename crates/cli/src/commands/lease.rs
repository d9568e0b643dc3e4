//! Lease, state, and proof commands against a running Authority.

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use sigaid_client::{AgentSession, ClientConfig};
use sigaid_identity::KeyPair;
use sigaid_types::timestamp;
use sigaid_types::{ActionType, AgentId, Challenge, ProofBundle, VerifyOutcome};
use std::path::PathBuf;
use std::time::Duration;

/// Options shared by every command that speaks to an Authority with an
/// identity.
#[derive(Args)]
pub struct ConnectionArgs {
    /// The keyfile holding the agent identity.
    #[arg(long)]
    pub keyfile: PathBuf,
    /// Passphrase protecting the keyfile.
    #[arg(long, env = "SIGAID_KEY_PASSWORD")]
    pub password: String,
    /// Authority URL. Overrides `SIGAID_AUTHORITY_URL`.
    #[arg(long)]
    pub url: Option<String>,
}

impl ConnectionArgs {
    fn session(&self) -> anyhow::Result<AgentSession> {
        let keypair = KeyPair::from_keyfile(&self.keyfile, &self.password)?;
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.url {
            config.authority_url = url.clone();
        }
        Ok(AgentSession::new(keypair, config)?)
    }
}

/// `sigaid lease` subcommands.
#[derive(Subcommand)]
pub enum LeaseCommand {
    /// Acquire the lease, hold it, then release.
    Acquire(AcquireArgs),
    /// Show the current lease holder.
    Status(StatusArgs),
}

/// Arguments for `sigaid lease acquire`.
#[derive(Args)]
pub struct AcquireArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// How long to hold the lease before releasing.
    #[arg(long, default_value_t = 0)]
    pub hold_secs: u64,
    /// Wait this long for a held lease to free up instead of failing.
    #[arg(long)]
    pub wait_secs: Option<u64>,
}

/// Arguments for `sigaid lease status`.
#[derive(Args)]
pub struct StatusArgs {
    /// The agent to query.
    pub agent_id: String,
    /// Authority URL. Overrides `SIGAID_AUTHORITY_URL`.
    #[arg(long)]
    pub url: Option<String>,
}

/// Arguments for `sigaid append`.
#[derive(Args)]
pub struct AppendArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// Action summary, at most 256 bytes.
    #[arg(long)]
    pub summary: String,
    /// Action type label.
    #[arg(long, default_value = "action")]
    pub action_type: String,
    /// File whose contents are hashed into the entry. The contents never
    /// leave this machine.
    #[arg(long)]
    pub payload_file: Option<PathBuf>,
}

/// Arguments for `sigaid prove`.
#[derive(Args)]
pub struct ProveArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// The verifier-issued challenge, hex.
    #[arg(long)]
    pub challenge_hex: String,
    /// Write the bundle JSON to a file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for `sigaid verify` (offline).
#[derive(Args)]
pub struct VerifyArgs {
    /// The bundle JSON file.
    #[arg(long)]
    pub bundle_file: PathBuf,
    /// The challenge that was issued, hex.
    #[arg(long)]
    pub challenge_hex: String,
}

pub(crate) async fn run(command: LeaseCommand) -> anyhow::Result<()> {
    match command {
        LeaseCommand::Acquire(args) => acquire(args).await,
        LeaseCommand::Status(args) => status(args).await,
    }
}

async fn acquire(args: AcquireArgs) -> anyhow::Result<()> {
    let session = args.connection.session()?;
    session.register(None).await?;

    let handle = match args.wait_secs {
        Some(secs) => session.acquire_wait(Duration::from_secs(secs)).await?,
        None => session.acquire().await?,
    };
    println!("session_id: {}", handle.session_id());
    println!("agent_id:   {}", handle.agent_id());

    if args.hold_secs > 0 {
        log::info!("holding lease for {}s", args.hold_secs);
        tokio::time::sleep(Duration::from_secs(args.hold_secs)).await;
    }
    handle.release().await;
    Ok(())
}

async fn status(args: StatusArgs) -> anyhow::Result<()> {
    let agent_id: AgentId = args.agent_id.parse()?;
    let mut config = ClientConfig::from_env();
    if let Some(url) = args.url {
        config.authority_url = url;
    }
    let client = sigaid_client::AuthorityClient::new(&config)?;
    let status = client.lease_status(&agent_id).await?;
    if status.held {
        println!(
            "held by {} until {}",
            status.session_id.unwrap_or_default(),
            status.expires_at.unwrap_or_default()
        );
    } else {
        println!("free");
    }
    Ok(())
}

pub(crate) async fn append(args: AppendArgs) -> anyhow::Result<()> {
    let payload = match &args.payload_file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => Vec::new(),
    };
    let action_type = ActionType::parse(&args.action_type)?;

    let session = args.connection.session()?;
    session.register(None).await?;
    let session_ref = &session;
    let summary = args.summary.clone();
    let head = session_ref
        .with_lease(|handle| async move {
            session_ref
                .append_action(&handle, action_type, &summary, &payload)
                .await
        })
        .await?;
    println!("appended sequence {}", head.sequence);
    Ok(())
}

pub(crate) async fn prove(args: ProveArgs) -> anyhow::Result<()> {
    let challenge_bytes = hex::decode(&args.challenge_hex).context("challenge is not hex")?;
    let challenge = Challenge::new(challenge_bytes)?;

    let session = args.connection.session()?;
    session.register(None).await?;
    let session_ref = &session;
    let bundle = session_ref
        .with_lease(|handle| async move { session_ref.prove(&handle, challenge).await })
        .await?;

    let json = serde_json::to_string_pretty(&bundle)?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub(crate) async fn verify(args: VerifyArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.bundle_file)
        .with_context(|| format!("reading {}", args.bundle_file.display()))?;
    let bundle: ProofBundle = serde_json::from_str(&raw).context("bundle is not valid JSON")?;
    let challenge = Challenge::new(hex::decode(&args.challenge_hex).context("challenge is not hex")?)?;

    let now = timestamp::now_unix() as i64;
    match sigaid_proof::verify_offline(&bundle, &challenge, now, None) {
        VerifyOutcome::ValidOffline => {
            println!("valid (offline; Authority not consulted)");
            Ok(())
        }
        VerifyOutcome::Valid => {
            println!("valid");
            Ok(())
        }
        VerifyOutcome::Invalid(reason) => bail!("invalid: {}", reason),
    }
}

