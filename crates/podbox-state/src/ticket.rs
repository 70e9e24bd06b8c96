//! # Ticket Check-In Lifecycle
//!
//! Tracks whether an issued ticket has been checked in, by whom, and when.

use podbox_core::{EmailAddress, TicketId, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Ticket State ────────────────────────────────────────────────────

/// Check-in state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketState {
    /// Issued and not yet used.
    Issued,
    /// Checked in (terminal).
    CheckedIn,
}

impl TicketState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedIn)
    }
}

impl std::fmt::Display for TicketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Issued => "ISSUED",
            Self::CheckedIn => "CHECKED_IN",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Rejected check-in transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// The ticket was already checked in.
    #[error("ticket {ticket_id} already checked in at {checked_in_at} by {checker}")]
    AlreadyCheckedIn {
        /// The ticket.
        ticket_id: TicketId,
        /// When the original check-in happened.
        checked_in_at: Timestamp,
        /// Who performed the original check-in.
        checker: EmailAddress,
    },
}

// ─── Check-In Record ─────────────────────────────────────────────────

/// Record of a completed check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRecord {
    /// Who checked the ticket in.
    pub checker: EmailAddress,
    /// When.
    pub timestamp: Timestamp,
}

// ─── Ticket Check-In ─────────────────────────────────────────────────

/// Check-in state of one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCheckin {
    ticket_id: TicketId,
    state: TicketState,
    checkin: Option<CheckinRecord>,
}

impl TicketCheckin {
    /// A freshly issued ticket.
    pub fn issued(ticket_id: TicketId) -> Self {
        Self {
            ticket_id,
            state: TicketState::Issued,
            checkin: None,
        }
    }

    pub fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    pub fn state(&self) -> TicketState {
        self.state
    }

    /// The check-in record, once checked in.
    pub fn checkin(&self) -> Option<&CheckinRecord> {
        self.checkin.as_ref()
    }

    /// Check the ticket in (ISSUED → CHECKED_IN).
    pub fn check_in(
        &mut self,
        checker: EmailAddress,
        at: Timestamp,
    ) -> Result<&CheckinRecord, TicketError> {
        if let Some(existing) = &self.checkin {
            return Err(TicketError::AlreadyCheckedIn {
                ticket_id: self.ticket_id,
                checked_in_at: existing.timestamp,
                checker: existing.checker.clone(),
            });
        }
        self.state = TicketState::CheckedIn;
        Ok(self.checkin.insert(CheckinRecord {
            checker,
            timestamp: at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(s: &str) -> EmailAddress {
        EmailAddress::parse(s).unwrap()
    }

    #[test]
    fn new_ticket_is_issued() {
        let t = TicketCheckin::issued(TicketId::new());
        assert_eq!(t.state(), TicketState::Issued);
        assert!(!t.state().is_terminal());
        assert!(t.checkin().is_none());
    }

    #[test]
    fn check_in_transitions_once() {
        let mut t = TicketCheckin::issued(TicketId::new());
        let at = Timestamp::from_epoch_secs(1_000).unwrap();
        let record = t.check_in(email("gate@example.com"), at).unwrap().clone();
        assert_eq!(record.timestamp, at);
        assert_eq!(t.state(), TicketState::CheckedIn);
        assert!(t.state().is_terminal());
    }

    #[test]
    fn second_check_in_is_rejected_and_state_unchanged() {
        let mut t = TicketCheckin::issued(TicketId::new());
        let first_at = Timestamp::from_epoch_secs(1_000).unwrap();
        t.check_in(email("gate@example.com"), first_at).unwrap();
        let before = t.clone();

        let err = t
            .check_in(email("other@example.com"), Timestamp::from_epoch_secs(2_000).unwrap())
            .unwrap_err();
        match err {
            TicketError::AlreadyCheckedIn {
                checked_in_at,
                checker,
                ..
            } => {
                assert_eq!(checked_in_at, first_at);
                assert_eq!(checker.as_str(), "gate@example.com");
            }
        }
        assert_eq!(t, before);
    }

    #[test]
    fn display_names() {
        assert_eq!(TicketState::Issued.to_string(), "ISSUED");
        assert_eq!(TicketState::CheckedIn.to_string(), "CHECKED_IN");
    }

    #[test]
    fn serde_is_camel_case() {
        let mut t = TicketCheckin::issued(TicketId::new());
        t.check_in(email("a@b.co"), Timestamp::from_epoch_secs(0).unwrap())
            .unwrap();
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["state"], "CheckedIn");
        assert_eq!(v["checkin"]["checker"], "a@b.co");
        assert!(v.get("ticketId").is_some());
    }
}
