//! # canister-agent
//!
//! Command-line client for the call agent.
//!
//! ## Commands
//!
//! ```text
//! canister-agent identity new --out id.json [--curve ed25519]
//! canister-agent identity principal --identity id.json
//! canister-agent call --canister <id> --method greet --text "world" [--identity id.json]
//! ```
//!
//! The replica URL comes from `--url`, then `AGENT_URL`, then the `--config`
//! file, then `http://127.0.0.1:4943`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use agent_core::{Actor, Agent, AgentConfig, InterfaceDescription, TomlConfigProvider};
use agent_telemetry::{init_tracing, TelemetryConfig};
use shared_crypto::{
    load_identity, save_identity, AnonymousIdentity, Ed25519Identity, Identity, KeyPairHex,
    Secp256k1Identity,
};
use shared_types::Principal;

/// Signed canister calls from the command line
#[derive(Parser, Debug)]
#[command(name = "canister-agent", version)]
#[command(about = "Submit signed calls to canisters and wait for their replies")]
struct Args {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage identity files
    #[command(subcommand)]
    Identity(IdentityCommand),

    /// Call an update method with one text argument and print the text reply
    Call {
        /// Target canister id (textual principal)
        #[arg(long)]
        canister: String,

        /// Method name
        #[arg(long)]
        method: String,

        /// Text argument
        #[arg(long)]
        text: String,

        /// Identity file; anonymous when omitted
        #[arg(long)]
        identity: Option<PathBuf>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Replica base URL
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum IdentityCommand {
    /// Generate a fresh key pair and write it to a file
    New {
        /// Output path
        #[arg(long)]
        out: PathBuf,

        /// Signature scheme
        #[arg(long, value_enum, default_value_t = Curve::Secp256k1)]
        curve: Curve,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the principal of an identity file
    Principal {
        /// Identity file
        #[arg(long)]
        identity: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Curve {
    Secp256k1,
    Ed25519,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if args.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    init_tracing(&telemetry).context("failed to initialize logging")?;

    match args.command {
        Command::Identity(IdentityCommand::New { out, curve, force }) => {
            let principal = new_identity(&out, curve, force)?;
            println!("{principal}");
        }
        Command::Identity(IdentityCommand::Principal { identity }) => {
            let identity = load_identity(&identity)
                .with_context(|| format!("failed to load {}", identity.display()))?;
            println!("{}", identity.sender());
        }
        Command::Call {
            canister,
            method,
            text,
            identity,
            config,
            url,
        } => {
            let config = resolve_config(config.as_deref(), url)?;
            let reply = call_text(config, identity.as_deref(), &canister, &method, text).await?;
            println!("{reply}");
        }
    }

    Ok(())
}

/// Generate a key pair on `curve`, save it to `out` and return its principal.
fn new_identity(out: &Path, curve: Curve, force: bool) -> Result<Principal> {
    if out.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", out.display());
    }

    let (pair, principal): (KeyPairHex, Principal) = match curve {
        Curve::Secp256k1 => {
            let identity = Secp256k1Identity::generate();
            (identity.serialize(), identity.sender())
        }
        Curve::Ed25519 => {
            let identity = Ed25519Identity::generate();
            (identity.serialize(), identity.sender())
        }
    };

    save_identity(out, &pair).with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), principal = %principal, ?curve, "identity created");
    Ok(principal)
}

/// Layer the config file, `AGENT_URL` and `--url`, then validate.
fn resolve_config(path: Option<&Path>, url: Option<String>) -> Result<AgentConfig> {
    let mut config = match path {
        Some(path) => TomlConfigProvider::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?
            .into_config(),
        None => AgentConfig::default(),
    };
    config.apply_env_overrides();
    if let Some(url) = url {
        config.url = url;
    }
    config.validate().context("invalid agent configuration")?;
    Ok(config)
}

async fn call_text(
    config: AgentConfig,
    identity: Option<&Path>,
    canister: &str,
    method: &str,
    text: String,
) -> Result<String> {
    let canister_id = Principal::from_text(canister)
        .with_context(|| format!("invalid canister id {canister:?}"))?;

    let identity: Arc<dyn Identity> = match identity {
        Some(path) => Arc::from(
            load_identity(path).with_context(|| format!("failed to load {}", path.display()))?,
        ),
        None => Arc::new(AnonymousIdentity),
    };
    info!(url = %config.url, sender = %identity.sender(), "calling {canister}.{method}");

    let agent = Arc::new(Agent::from_config(config, identity)?);
    let actor = Actor::new(
        agent,
        canister_id,
        InterfaceDescription::new().with_update(method),
    );

    let (reply,): (String,) = actor.call(method, (text,)).await?;
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_call() {
        let args = Args::parse_from([
            "canister-agent",
            "call",
            "--canister",
            "aaaaa-aa",
            "--method",
            "greet",
            "--text",
            "world",
        ]);
        match args.command {
            Command::Call {
                method, identity, ..
            } => {
                assert_eq!(method, "greet");
                assert!(identity.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_new_identity_roundtrips_principal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.json");

        for curve in [Curve::Secp256k1, Curve::Ed25519] {
            let principal = new_identity(&path, curve, true).unwrap();
            let loaded = load_identity(&path).unwrap();
            assert_eq!(loaded.sender(), principal);
        }
    }

    #[test]
    fn test_new_identity_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.json");

        new_identity(&path, Curve::Ed25519, false).unwrap();
        assert!(new_identity(&path, Curve::Ed25519, false).is_err());
    }

    #[test]
    fn test_url_flag_wins() {
        let config = resolve_config(None, Some("http://replica:8080".to_string())).unwrap();
        assert_eq!(config.url, "http://replica:8080");
    }

    #[test]
    fn test_bad_url_is_rejected() {
        assert!(resolve_config(None, Some("ftp://replica".to_string())).is_err());
    }
}
