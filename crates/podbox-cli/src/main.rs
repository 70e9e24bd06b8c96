//! # podbox CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use podbox_cli::actions::{
    run_check_in, run_pipeline_info, run_poll, CheckInArgs, PipelineInfoArgs, PollArgs,
};
use podbox_cli::keys::{run_attest_email, run_keygen, AttestEmailArgs, KeygenArgs};

/// Podbox generic issuance CLI.
///
/// Generates holder identities, issues email proofs, and drives the feed,
/// check-in and pipeline-info endpoints of a generic issuance server.
#[derive(Parser, Debug)]
#[command(name = "podbox", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a holder identity.
    Keygen(KeygenArgs),

    /// Issue an email proof bound to an identity commitment.
    AttestEmail(AttestEmailArgs),

    /// Poll a ticket feed.
    Poll(PollArgs),

    /// Check in a ticket.
    CheckIn(CheckInArgs),

    /// Fetch a pipeline summary (admin token required).
    PipelineInfo(PipelineInfoArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Keygen(args) => run_keygen(&args),
        Commands::AttestEmail(args) => run_attest_email(&args),
        Commands::Poll(args) => run_poll(&args).await,
        Commands::CheckIn(args) => run_check_in(&args).await,
        Commands::PipelineInfo(args) => run_pipeline_info(&args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_keygen_defaults() {
        let cli = Cli::try_parse_from(["podbox", "keygen"]).unwrap();
        if let Commands::Keygen(args) = cli.command {
            assert_eq!(args.output, PathBuf::from("."));
            assert_eq!(args.prefix, "podbox");
        } else {
            panic!("expected keygen");
        }
    }

    #[test]
    fn cli_parse_check_in() {
        let event = podbox_core::EventId::new();
        let ticket = podbox_core::TicketId::new();
        let (event_arg, ticket_arg) = (event.as_uuid().to_string(), ticket.as_uuid().to_string());
        let cli = Cli::try_parse_from([
            "podbox",
            "check-in",
            "--identity",
            "holder.key",
            "--email-proof",
            "email.json",
            "--server",
            "https://podbox.example",
            "--event",
            event_arg.as_str(),
            "--ticket",
            ticket_arg.as_str(),
        ])
        .unwrap();
        if let Commands::CheckIn(args) = cli.command {
            assert_eq!(args.event, event);
            assert_eq!(args.ticket, ticket);
            assert_eq!(args.holder.server, "https://podbox.example");
        } else {
            panic!("expected check-in");
        }
    }

    #[test]
    fn cli_parse_poll_rejects_bad_feed_id() {
        let pipeline = podbox_core::PipelineId::new().as_uuid().to_string();
        let result = Cli::try_parse_from([
            "podbox",
            "poll",
            "--identity",
            "holder.key",
            "--email-proof",
            "email.json",
            "--pipeline",
            pipeline.as_str(),
            "--feed",
            "no/slashes",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_pipeline_info_requires_token() {
        std::env::remove_var("PODBOX_ADMIN_TOKEN");
        let pipeline = podbox_core::PipelineId::new().as_uuid().to_string();
        let result = Cli::try_parse_from([
            "podbox",
            "pipeline-info",
            "--pipeline",
            pipeline.as_str(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_verbose_is_global() {
        let cli = Cli::try_parse_from(["podbox", "keygen", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
