//! # Request and Check-In Metrics
//!
//! In-process atomic counters. [`ApiMetrics`] counts requests and error
//! responses for the whole router; [`CheckinCounters`] counts check-in
//! outcomes per pipeline and is reported through pipeline info.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use podbox_core::ErrorName;
use podbox_interface::CheckinOutcomeCounts;

/// Shared request metrics.
#[derive(Debug, Clone)]
pub struct ApiMetrics {
    pub request_count: Arc<AtomicU64>,
    pub error_count: Arc<AtomicU64>,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Responses with a 4xx or 5xx status. Denials are 200 and not counted.
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.request_count.fetch_add(1, Ordering::Relaxed);
        if response.status().is_server_error() || response.status().is_client_error() {
            m.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    response
}

/// Check-in attempts by outcome.
#[derive(Debug, Default)]
pub struct CheckinCounters {
    succeeded: AtomicU64,
    already_checked_in: AtomicU64,
    not_eligible: AtomicU64,
    unauthorized: AtomicU64,
    ticket_not_found: AtomicU64,
    unknown_identity: AtomicU64,
}

impl CheckinCounters {
    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a denial. Names outside the check-in taxonomy are ignored.
    pub fn record_denial(&self, name: ErrorName) {
        let counter = match name {
            ErrorName::AlreadyCheckedIn => &self.already_checked_in,
            ErrorName::NotEligible => &self.not_eligible,
            ErrorName::Unauthorized => &self.unauthorized,
            ErrorName::TicketNotFound => &self.ticket_not_found,
            ErrorName::UnknownIdentity => &self.unknown_identity,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CheckinOutcomeCounts {
        CheckinOutcomeCounts {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            already_checked_in: self.already_checked_in.load(Ordering::Relaxed),
            not_eligible: self.not_eligible.load(Ordering::Relaxed),
            unauthorized: self.unauthorized.load(Ordering::Relaxed),
            ticket_not_found: self.ticket_not_found.load(Ordering::Relaxed),
            unknown_identity: self.unknown_identity.load(Ordering::Relaxed),
        }
    }
}
