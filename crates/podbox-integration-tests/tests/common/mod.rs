//! Shared fixtures for end-to-end tests.
//!
//! A [`Scenario`] writes a pipeline definition file, loads it the way the
//! server binary does, and serves the router on an ephemeral port. The
//! helpers below drive that server through [`PodboxClient`] and assert on
//! what comes back.

#![allow(dead_code)]

use std::path::PathBuf;

use podbox_api::config::AppConfig;
use podbox_api::state::AppState;
use podbox_client::{ClientConfig, PodboxClient};
use podbox_core::{EmailAddress, EventId, FeedId, PipelineId, TicketId, UserId};
use podbox_crypto::{Ed25519KeyPair, Ed25519PublicKey, Identity};
use podbox_interface::{
    create_feed_credential_payload, create_ticket_action_credential_payload,
    expect_replace_in_folder_at, feed_path, sign_feed_credential_payload, CheckInResult,
    CredentialAction, PipelineInfo, PipelineUser, PollFeedRequest, PollFeedResult,
    CHECK_IN_PATH,
};
use podbox_pcd::{EmailPcd, Pcd, SerializedPcd, TicketData, TicketPcd};
use tempfile::TempDir;

pub const ADMIN_TOKEN: &str = "e2e-admin-token";
pub const FOLDER: &str = "Edge City Denver";
pub const PIPELINE_SEED: &str = "5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c5c";

/// A running server plus the ids of everything it was loaded with.
pub struct Scenario {
    pub issuer: Ed25519KeyPair,
    pub state: AppState,
    pub base_url: String,
    pub pipeline_id: PipelineId,
    pub event_id: EventId,
    pub feed_id: FeedId,
    pub admin_id: UserId,
    /// bob@example.com, General Admission.
    pub bob_ticket: TicketId,
    /// ada@example.com, General Admission.
    pub ada_ticket: TicketId,
    /// ada@example.com, Parking (not check-in eligible).
    pub ada_parking: TicketId,
    _config_dir: TempDir,
    _shutdown: tokio::sync::oneshot::Sender<()>,
}

/// A holder: an identity plus an email proof bound to it.
pub struct Holder {
    pub identity: Identity,
    pub email: EmailAddress,
    pub email_proof: SerializedPcd,
}

impl Scenario {
    pub async fn start() -> Self {
        let issuer = Ed25519KeyPair::generate();
        let pipeline_id = PipelineId::new();
        let event_id = EventId::new();
        let admin_id = UserId::new();
        let (bob_ticket, ada_ticket, ada_parking) = (TicketId::new(), TicketId::new(), TicketId::new());
        let (ga, parking) = (uuid(), uuid());

        let yaml = format!(
            r#"
pipelines:
  - id: {pipeline}
    name: Edge City
    signingKey: "{seed}"
    feed:
      id: tickets
      name: Edge City Tickets
      folder: {folder}
    events:
      - id: {event}
        name: Edge City Denver
        products:
          - id: {ga}
            name: General Admission
          - id: {parking}
            name: Parking
            checkinEligible: false
    tickets:
      - id: {bob_ticket}
        eventId: {event}
        productId: {ga}
        attendeeName: Bob
        attendeeEmail: bob@example.com
      - id: {ada_ticket}
        eventId: {event}
        productId: {ga}
        attendeeName: Ada
        attendeeEmail: ada@example.com
      - id: {ada_parking}
        eventId: {event}
        productId: {parking}
        attendeeName: Ada
        attendeeEmail: ada@example.com
    users:
      - id: {admin}
        email: ops@example.com
        isAdmin: true
"#,
            pipeline = pipeline_id.as_uuid(),
            seed = PIPELINE_SEED,
            folder = FOLDER,
            event = event_id.as_uuid(),
            bob_ticket = bob_ticket.as_uuid(),
            ada_ticket = ada_ticket.as_uuid(),
            ada_parking = ada_parking.as_uuid(),
            admin = admin_id.as_uuid(),
        );

        let config_dir = tempfile::tempdir().unwrap();
        let pipelines_path: PathBuf = config_dir.path().join("pipelines.yaml");
        std::fs::write(&pipelines_path, yaml).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{port}");

        let config = AppConfig {
            admin_token: Some(ADMIN_TOKEN.into()),
            pipelines_path: Some(pipelines_path),
            email_issuer_key: Some(issuer.public_key()),
            public_url: base_url.clone(),
            ..AppConfig::default()
        };
        let state = AppState::from_config(config).unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let app = podbox_api::app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    rx.await.ok();
                })
                .await
                .ok();
        });

        Self {
            issuer,
            state,
            base_url,
            pipeline_id,
            event_id,
            feed_id: FeedId::new("tickets").unwrap(),
            admin_id,
            bob_ticket,
            ada_ticket,
            ada_parking,
            _config_dir: config_dir,
            _shutdown: tx,
        }
    }

    pub fn client(&self) -> PodboxClient {
        PodboxClient::new(&ClientConfig::default()).unwrap()
    }

    pub fn feed_url(&self) -> String {
        format!("{}{}", self.base_url, feed_path(&self.pipeline_id, &self.feed_id))
    }

    pub fn checkin_url(&self) -> String {
        format!("{}{}", self.base_url, CHECK_IN_PATH)
    }

    pub fn pipeline_key(&self) -> Ed25519PublicKey {
        Ed25519KeyPair::from_seed_hex(PIPELINE_SEED).unwrap().public_key()
    }

    /// A fresh identity with an email proof from the trusted issuer.
    pub fn holder(&self, email: &str) -> Holder {
        let identity = Identity::generate().unwrap();
        let email = EmailAddress::parse(email).unwrap();
        let email_proof = EmailPcd::attest(
            &self.issuer,
            format!("email:{email}"),
            email.clone(),
            identity.commitment(),
        )
        .unwrap()
        .serialize_pcd()
        .unwrap();
        Holder {
            identity,
            email,
            email_proof,
        }
    }
}

fn uuid() -> String {
    TicketId::new().as_uuid().to_string()
}

/// Poll `feed_url` as `holder` and return the tickets in the
/// `ReplaceInFolder` action.
pub async fn request_tickets_from_pipeline(
    client: &PodboxClient,
    expected_folder: &str,
    feed_url: &str,
    feed_id: &FeedId,
    holder: &Holder,
) -> Vec<TicketPcd> {
    let payload = create_feed_credential_payload(holder.email_proof.clone()).unwrap();
    let request = PollFeedRequest {
        feed_id: feed_id.clone(),
        pcd: sign_feed_credential_payload(&holder.identity, &payload).unwrap(),
    };
    let result = client.request_poll_feed(feed_url, &request).await;
    get_tickets_from_feed_response(expected_folder, result)
}

/// Decode the tickets out of a successful poll. Panics on a failure
/// envelope or when position 1 is not a `ReplaceInFolder` for
/// `expected_folder`.
pub fn get_tickets_from_feed_response(expected_folder: &str, result: PollFeedResult) -> Vec<TicketPcd> {
    let response = match result.into_result() {
        Ok(response) => response,
        Err(err) => panic!("feed poll failed: {err}"),
    };
    let replace = expect_replace_in_folder_at(&response.actions, 1).unwrap();
    assert_eq!(replace.folder, expected_folder);
    replace.tickets().unwrap()
}

/// Sign a `checkin` credential for `ticket` as `checker` and send it.
pub async fn request_check_in_pipeline_ticket(
    client: &PodboxClient,
    checkin_url: &str,
    checker: &Holder,
    ticket: &TicketData,
) -> CheckInResult {
    let payload = create_ticket_action_credential_payload(
        checker.email_proof.clone(),
        CredentialAction::CheckIn,
        ticket.event_id,
        ticket.ticket_id,
    )
    .unwrap();
    let credential = sign_feed_credential_payload(&checker.identity, &payload).unwrap();
    client.request_check_in(checkin_url, &credential).await
}

pub fn assert_user_matches(expected: &PipelineUser, actual: &PipelineUser) {
    assert_eq!(expected.id, actual.id, "user id");
    assert_eq!(expected.email, actual.email, "user email");
    assert_eq!(expected.is_admin, actual.is_admin, "admin flag");
}

/// Fetch pipeline info with the admin token and check the basics.
pub async fn check_pipeline_info_endpoint(
    client: &PodboxClient,
    scenario: &Scenario,
) -> PipelineInfo {
    let result = client
        .request_pipeline_info(ADMIN_TOKEN, &scenario.base_url, scenario.pipeline_id)
        .await;
    let info = match result.into_result() {
        Ok(info) => info,
        Err(err) => panic!("pipeline info failed: {err}"),
    };
    assert_eq!(info.id, scenario.pipeline_id);
    assert_eq!(info.feeds.len(), 1);
    assert_eq!(info.feeds[0].url, scenario.feed_url());
    assert_eq!(info.feeds[0].folder, FOLDER);
    info
}
