//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::state::AppState;

/// Response envelope shared by every endpoint.
///
/// Exactly one of `value` (when `success` is true) or `error` is present.
#[derive(ToSchema)]
pub struct ActionResultEnvelope {
    pub success: bool,
    pub value: Option<serde_json::Value>,
    pub error: Option<ErrorDetailSchema>,
}

/// Failure payload.
#[derive(ToSchema)]
pub struct ErrorDetailSchema {
    /// One of `InvalidCredential`, `UnknownIdentity`, `TicketNotFound`,
    /// `AlreadyCheckedIn`, `NotEligible`, `Unauthorized`, `InvalidRequest`,
    /// `FeedNotFound`, `PipelineNotFound`, `ServerError`.
    pub name: String,
    pub detail: Option<String>,
}

/// Adds the admin bearer token scheme used by pipeline info.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Admin token. Set via PODBOX_ADMIN_TOKEN."))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Podbox Generic Issuance API",
        version = "0.1.0",
        description = "Credential-gated feed polls and ticket check-in for generic issuance pipelines. Every response body is an ActionResult envelope.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::feeds::poll_feed,
        crate::routes::checkin::check_in,
        crate::routes::pipelines::pipeline_info,
    ),
    components(schemas(ActionResultEnvelope, ErrorDetailSchema)),
    modifiers(&SecurityAddon),
    tags(
        (name = "feeds", description = "Feed polls"),
        (name = "check-in", description = "Ticket check-in"),
        (name = "pipelines", description = "Pipeline administration"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
