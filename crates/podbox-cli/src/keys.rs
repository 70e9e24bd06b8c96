//! # Key Subcommands
//!
//! Identity key generation and email attestation. Both run offline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use podbox_core::EmailAddress;
use podbox_crypto::{Ed25519KeyPair, Identity, IdentityCommitment};
use podbox_pcd::{EmailPcd, Pcd};

/// Arguments for `podbox keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the key files.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
    /// Prefix for the key filenames.
    #[arg(long, default_value = "podbox")]
    pub prefix: String,
}

/// Arguments for `podbox attest-email`.
#[derive(Args, Debug)]
pub struct AttestEmailArgs {
    /// Issuer seed file (hex-encoded 32 bytes).
    #[arg(long)]
    pub issuer_key: PathBuf,
    /// Email address to attest.
    #[arg(long)]
    pub email: String,
    /// Holder identity commitment (hex).
    #[arg(long)]
    pub commitment: String,
    /// Proof id. Defaults to `email:<address>`.
    #[arg(long)]
    pub id: Option<String>,
    /// Write the serialized proof here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Generate an identity and write `<prefix>.key`, `<prefix>.pub` and
/// `<prefix>.commitment`.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let dir = &args.output;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let identity = Identity::generate().context("failed to derive identity commitment")?;
    let seed = identity.seed_hex();
    let public_key = identity.public_key().to_hex();
    let commitment = identity.commitment().to_hex();

    let key_path = dir.join(format!("{}.key", args.prefix));
    write_file(&key_path, seed.as_str())?;
    write_file(&dir.join(format!("{}.pub", args.prefix)), &public_key)?;
    write_file(&dir.join(format!("{}.commitment", args.prefix)), &commitment)?;

    println!("OK: generated identity");
    println!("  Seed:       {}", key_path.display());
    println!("  Public key: {public_key}");
    println!("  Commitment: {commitment}");
    Ok(0)
}

/// Sign an email proof for a commitment with the issuer key.
pub fn run_attest_email(args: &AttestEmailArgs) -> Result<u8> {
    let seed = crate::read_seed(&args.issuer_key)?;
    let issuer = Ed25519KeyPair::from_seed_hex(seed.as_str()).context("invalid issuer key")?;
    let email = EmailAddress::parse(&args.email).context("invalid email address")?;
    let commitment =
        IdentityCommitment::from_hex(args.commitment.trim()).context("invalid commitment")?;
    let id = args.id.clone().unwrap_or_else(|| format!("email:{email}"));

    let serialized = EmailPcd::attest(&issuer, id, email, commitment)
        .and_then(|pcd| pcd.serialize_pcd())
        .context("failed to build email proof")?;
    let rendered = serde_json::to_string_pretty(&serialized)?;

    match &args.out {
        Some(path) => {
            write_file(path, &rendered)?;
            tracing::info!(path = %path.display(), "wrote email proof");
        }
        None => println!("{rendered}"),
    }
    Ok(0)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
