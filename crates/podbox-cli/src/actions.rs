//! # Network Subcommands
//!
//! `poll`, `check-in` and `pipeline-info`. Each builds its request, sends it
//! through [`PodboxClient`] and prints the resulting envelope.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use podbox_client::{ClientConfig, PodboxClient};
use podbox_core::{EventId, FeedId, PipelineId, TicketId};
use podbox_crypto::Identity;
use podbox_interface::{
    create_feed_credential_payload, create_ticket_action_credential_payload, feed_path,
    sign_feed_credential_payload, CredentialAction, PollFeedRequest, CHECK_IN_PATH,
};
use podbox_pcd::SerializedPcd;

/// Holder credentials shared by `poll` and `check-in`.
#[derive(Args, Debug)]
pub struct HolderArgs {
    /// Identity seed file written by `podbox keygen`.
    #[arg(long, env = "PODBOX_IDENTITY_FILE")]
    pub identity: PathBuf,
    /// Serialized email proof written by `podbox attest-email`.
    #[arg(long)]
    pub email_proof: PathBuf,
    /// Server base URL.
    #[arg(long, env = "PODBOX_SERVER_URL", default_value = "http://localhost:8080")]
    pub server: String,
}

impl HolderArgs {
    fn load(&self) -> Result<(Identity, SerializedPcd)> {
        let seed = crate::read_seed(&self.identity)?;
        let identity = Identity::from_seed_hex(seed.as_str()).context("invalid identity seed")?;
        let email_proof = crate::read_json(&self.email_proof)?;
        Ok((identity, email_proof))
    }

    fn base(&self) -> &str {
        self.server.trim_end_matches('/')
    }
}

/// Arguments for `podbox poll`.
#[derive(Args, Debug)]
pub struct PollArgs {
    #[command(flatten)]
    pub holder: HolderArgs,
    #[arg(long)]
    pub pipeline: PipelineId,
    #[arg(long, value_parser = parse_feed_id)]
    pub feed: FeedId,
}

/// Arguments for `podbox check-in`.
#[derive(Args, Debug)]
pub struct CheckInArgs {
    #[command(flatten)]
    pub holder: HolderArgs,
    #[arg(long)]
    pub event: EventId,
    #[arg(long)]
    pub ticket: TicketId,
}

/// Arguments for `podbox pipeline-info`.
#[derive(Args, Debug)]
pub struct PipelineInfoArgs {
    #[arg(long, env = "PODBOX_SERVER_URL", default_value = "http://localhost:8080")]
    pub server: String,
    #[arg(long)]
    pub pipeline: PipelineId,
    /// Admin bearer token.
    #[arg(long, env = "PODBOX_ADMIN_TOKEN", hide_env_values = true)]
    pub token: String,
}

fn parse_feed_id(raw: &str) -> Result<FeedId, String> {
    FeedId::new(raw).map_err(|e| e.to_string())
}

fn client() -> Result<PodboxClient> {
    let config = ClientConfig::from_env().context("invalid client configuration")?;
    PodboxClient::new(&config).context("failed to build HTTP client")
}

/// Poll a feed and print the folder actions.
pub async fn run_poll(args: &PollArgs) -> Result<u8> {
    let (identity, email_proof) = args.holder.load()?;
    let payload = create_feed_credential_payload(email_proof)?;
    let request = PollFeedRequest {
        feed_id: args.feed.clone(),
        pcd: sign_feed_credential_payload(&identity, &payload)?,
    };
    let url = format!("{}{}", args.holder.base(), feed_path(&args.pipeline, &args.feed));

    let result = client()?.request_poll_feed(&url, &request).await;
    crate::report(&result)
}

/// Check in one ticket.
pub async fn run_check_in(args: &CheckInArgs) -> Result<u8> {
    let (identity, email_proof) = args.holder.load()?;
    let payload = create_ticket_action_credential_payload(
        email_proof,
        CredentialAction::CheckIn,
        args.event,
        args.ticket,
    )?;
    let credential = sign_feed_credential_payload(&identity, &payload)?;
    let url = format!("{}{}", args.holder.base(), CHECK_IN_PATH);

    let result = client()?.request_check_in(&url, &credential).await;
    crate::report(&result)
}

/// Fetch a pipeline summary.
pub async fn run_pipeline_info(args: &PipelineInfoArgs) -> Result<u8> {
    let result = client()?
        .request_pipeline_info(&args.token, &args.server, args.pipeline)
        .await;
    crate::report(&result)
}
