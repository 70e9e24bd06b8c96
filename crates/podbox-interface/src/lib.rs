//! # podbox-interface: Generic Issuance Wire Contract
//!
//! Types shared by the client, the server and the tests:
//!
//! - [`payload`]: the credential payload a client signs, and the builder
//!   that enforces the context rules for each action.
//! - [`requests`]: request and response bodies for the feed, check-in and
//!   pipeline-info endpoints, plus the result aliases.
//! - [`actions`]: folder actions returned by a feed poll, and helpers that
//!   make the position of the ticket-bearing action explicit.

pub mod actions;
pub mod payload;
pub mod requests;

pub use actions::{
    expect_replace_in_folder_at, find_replace_in_folder, ActionShapeError, PcdAction,
    ReplaceInFolder,
};
pub use payload::{
    create_feed_credential_payload, create_ticket_action_credential_payload,
    sign_feed_credential_payload, CredentialAction, CredentialPayload, CredentialPayloadBuilder,
    PayloadError, TicketActionContext,
};
pub use requests::{
    CheckInRequest, CheckInResult, CheckinOutcomeCounts, FeedInfo, PipelineInfo,
    PipelineInfoRequest, PipelineInfoResult, PipelineUser, PollFeedRequest, PollFeedResponse,
    PollFeedResult,
};

/// Path of the check-in endpoint, relative to the server base URL.
pub const CHECK_IN_PATH: &str = "/generic-issuance/api/check-in";

/// Path of the pipeline-info endpoint, relative to the server base URL.
pub const PIPELINE_INFO_PATH: &str = "/generic-issuance/api/pipeline-info";

/// Feed URL for a pipeline feed, relative to the server base URL.
pub fn feed_path(pipeline_id: &podbox_core::PipelineId, feed_id: &podbox_core::FeedId) -> String {
    format!("/generic-issuance/api/feed/{}/{}", pipeline_id.as_uuid(), feed_id)
}
