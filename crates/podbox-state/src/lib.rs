//! # podbox-state: Ticket Check-In State Machine
//!
//! ```text
//! Issued ──check_in──▶ CheckedIn (terminal)
//! ```
//!
//! A second check-in on a `CheckedIn` ticket is rejected with
//! [`TicketError::AlreadyCheckedIn`] and leaves the state untouched. The
//! server wraps each [`TicketCheckin`] in its own mutex, so the transition
//! happens at most once per ticket however many requests race for it.

pub mod ticket;

pub use ticket::{CheckinRecord, TicketCheckin, TicketError, TicketState};
