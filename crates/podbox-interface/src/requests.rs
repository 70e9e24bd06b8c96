//! Request and response bodies for the generic issuance endpoints.

use podbox_core::{ActionResult, EmailAddress, FeedId, PipelineId, UserId};
use podbox_pcd::SignedCredential;
use serde::{Deserialize, Serialize};

use crate::actions::PcdAction;

/// `POST /generic-issuance/api/feed/{pipelineId}/{feedId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollFeedRequest {
    pub feed_id: FeedId,
    /// A signed `poll` credential.
    pub pcd: SignedCredential,
}

/// Success value of a feed poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollFeedResponse {
    pub actions: Vec<PcdAction>,
}

/// `POST /generic-issuance/api/check-in`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInRequest {
    /// A signed `checkin` credential.
    pub credential: SignedCredential,
}

/// `POST /generic-issuance/api/pipeline-info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInfoRequest {
    pub pipeline_id: PipelineId,
}

/// A user known to a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineUser {
    pub id: UserId,
    pub email: EmailAddress,
    pub is_admin: bool,
}

/// A feed hosted by a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedInfo {
    pub feed_id: FeedId,
    pub name: String,
    pub folder: String,
    /// Absolute poll URL.
    pub url: String,
}

/// Check-in attempts by outcome since the pipeline loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinOutcomeCounts {
    pub succeeded: u64,
    pub already_checked_in: u64,
    pub not_eligible: u64,
    pub unauthorized: u64,
    pub ticket_not_found: u64,
    pub unknown_identity: u64,
}

/// Administrative summary of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInfo {
    pub id: PipelineId,
    pub name: String,
    pub feeds: Vec<FeedInfo>,
    pub ticket_count: u64,
    pub checked_in_count: u64,
    pub checkin_outcomes: CheckinOutcomeCounts,
    pub users: Vec<PipelineUser>,
}

pub type PollFeedResult = ActionResult<PollFeedResponse>;
pub type CheckInResult = ActionResult<()>;
pub type PipelineInfoResult = ActionResult<PipelineInfo>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pipeline_info_request_is_camel_case() {
        let id = PipelineId::new();
        let v = serde_json::to_value(PipelineInfoRequest { pipeline_id: id }).unwrap();
        assert_eq!(v, json!({"pipelineId": id.0.to_string()}));
    }

    #[test]
    fn pipeline_user_round_trips() {
        let user = PipelineUser {
            id: UserId::new(),
            email: EmailAddress::parse("admin@example.com").unwrap(),
            is_admin: true,
        };
        let v = serde_json::to_value(&user).unwrap();
        assert_eq!(v["isAdmin"], true);
        let back: PipelineUser = serde_json::from_value(v).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn check_in_success_value_is_null() {
        let r: CheckInResult = ActionResult::Success(());
        assert_eq!(serde_json::to_value(&r).unwrap(), json!({"success": true, "value": null}));
    }

    #[test]
    fn poll_request_rejects_bad_feed_id() {
        let v = json!({"feedId": "no/slashes", "pcd": {"type": "semaphore-signature-pcd", "pcd": "{}"}});
        assert!(serde_json::from_value::<PollFeedRequest>(v).is_err());
    }
}
