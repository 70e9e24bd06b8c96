//! # podbox-cli: Generic Issuance Command-Line Interface
//!
//! The `podbox` binary drives a generic issuance server from the holder or
//! operator side.
//!
//! ## Subcommands
//!
//! - `podbox keygen` writes a new identity seed and prints its commitment.
//! - `podbox attest-email` issues an email proof bound to a commitment.
//! - `podbox poll` signs a `poll` credential and fetches a feed.
//! - `podbox check-in` signs a `checkin` credential for one ticket.
//! - `podbox pipeline-info` fetches an administrative pipeline summary.
//!
//! Network subcommands print the server's `ActionResult` envelope as JSON
//! and exit with status 2 when it is a failure.
//!
//! ```bash
//! podbox keygen --prefix holder
//! podbox attest-email --issuer-key issuer.key --email ada@example.com \
//!     --commitment "$(cat holder.commitment)" --out ada.email.json
//! podbox poll --identity holder.key --email-proof ada.email.json \
//!     --server http://localhost:8080 --pipeline <uuid> --feed tickets
//! ```

pub mod actions;
pub mod keys;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use podbox_core::ActionResult;
use zeroize::Zeroizing;

/// Exit status when the server returned a failure envelope.
pub const EXIT_REFUSED: u8 = 2;

/// Read a hex seed from a file, trimming surrounding whitespace.
///
/// Both the file contents and the returned seed are wiped on drop.
pub fn read_seed(path: &Path) -> Result<Zeroizing<String>> {
    let raw = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read key file: {}", path.display()))?,
    );
    Ok(Zeroizing::new(raw.trim().to_string()))
}

/// Read and decode a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {}", path.display()))
}

/// Print an action result and map it to an exit status.
pub fn report<T: Serialize>(result: &ActionResult<T>) -> Result<u8> {
    println!(
        "{}",
        serde_json::to_string_pretty(result).context("failed to render result")?
    );
    if let Some(err) = result.error() {
        tracing::warn!(name = %err.name, "server refused the request");
        return Ok(EXIT_REFUSED);
    }
    Ok(0)
}
