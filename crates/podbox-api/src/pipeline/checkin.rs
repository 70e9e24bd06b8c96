//! # Ticket Check-In
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the ticket exists under the named event (`TicketNotFound`)
//! 2. its product is check-in eligible (`NotEligible`)
//! 3. the checker may check it in (`Unauthorized`)
//! 4. the atomic `Issued -> CheckedIn` transition (`AlreadyCheckedIn`)
//!
//! A checker may check in their own ticket. Pipeline admins and holders of a
//! `checker` product in the same pipeline may check in any ticket.

use podbox_core::{EmailAddress, ErrorName, TicketId, Timestamp};
use podbox_interface::{PipelineUser, TicketActionContext};
use podbox_state::{CheckinRecord, TicketError};
use thiserror::Error;

use super::definition::TicketDefinition;
use super::Pipeline;

/// Why a check-in was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckinDenial {
    #[error("ticket {0} not found")]
    TicketNotFound(TicketId),

    #[error("ticket {ticket_id} is a {product} ticket, which cannot be checked in")]
    NotEligible { ticket_id: TicketId, product: String },

    #[error("{checker} may not check in ticket {ticket_id}")]
    Unauthorized {
        checker: EmailAddress,
        ticket_id: TicketId,
    },

    #[error(transparent)]
    AlreadyCheckedIn(#[from] TicketError),
}

impl CheckinDenial {
    pub fn error_name(&self) -> ErrorName {
        match self {
            Self::TicketNotFound(_) => ErrorName::TicketNotFound,
            Self::NotEligible { .. } => ErrorName::NotEligible,
            Self::Unauthorized { .. } => ErrorName::Unauthorized,
            Self::AlreadyCheckedIn(_) => ErrorName::AlreadyCheckedIn,
        }
    }
}

impl Pipeline {
    /// Check in the ticket named by `target` on behalf of `checker`.
    ///
    /// The outcome is counted in [`Pipeline::outcomes`].
    pub fn check_in(
        &self,
        checker: &PipelineUser,
        target: &TicketActionContext,
        now: Timestamp,
    ) -> Result<CheckinRecord, CheckinDenial> {
        let outcome = self.try_check_in(checker, target, now);
        match &outcome {
            Ok(_) => {
                self.outcomes.record_success();
                tracing::info!(
                    pipeline = %self.id,
                    ticket = %target.ticket_id,
                    checker = %checker.email,
                    "ticket checked in"
                );
            }
            Err(denial) => {
                self.outcomes.record_denial(denial.error_name());
                tracing::info!(
                    pipeline = %self.id,
                    ticket = %target.ticket_id,
                    checker = %checker.email,
                    reason = %denial,
                    "check-in denied"
                );
            }
        }
        outcome
    }

    fn try_check_in(
        &self,
        checker: &PipelineUser,
        target: &TicketActionContext,
        now: Timestamp,
    ) -> Result<CheckinRecord, CheckinDenial> {
        let not_found = || CheckinDenial::TicketNotFound(target.ticket_id);

        let ticket = self
            .tickets
            .get(&target.ticket_id)
            .filter(|t| t.event_id == target.event_id)
            .ok_or_else(not_found)?;

        let product = self.products.get(&ticket.product_id).ok_or_else(not_found)?;
        if !product.checkin_eligible {
            return Err(CheckinDenial::NotEligible {
                ticket_id: ticket.id,
                product: product.name.clone(),
            });
        }

        if !self.may_check_in(&checker.email, ticket) {
            return Err(CheckinDenial::Unauthorized {
                checker: checker.email.clone(),
                ticket_id: ticket.id,
            });
        }

        self.checkins
            .try_check_in(&ticket.id, checker.email.clone(), now)
            .ok_or_else(not_found)?
            .map_err(CheckinDenial::from)
    }

    /// Whether `checker` may check in `ticket`.
    pub fn may_check_in(&self, checker: &EmailAddress, ticket: &TicketDefinition) -> bool {
        &ticket.attendee_email == checker || self.is_admin(checker) || self.holds_checker_ticket(checker)
    }

    fn holds_checker_ticket(&self, email: &EmailAddress) -> bool {
        self.tickets.values().any(|t| {
            &t.attendee_email == email
                && self.products.get(&t.product_id).is_some_and(|p| p.checker)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{self, Ids};
    use super::*;
    use crate::state::UserDirectory;
    use podbox_core::EventId;
    use podbox_state::TicketState;

    fn setup() -> (Pipeline, Ids) {
        let (def, ids) = fixtures::devconnect();
        (Pipeline::from_definition(def, &UserDirectory::new()).unwrap(), ids)
    }

    fn user(p: &Pipeline, email: &str) -> PipelineUser {
        p.users()
            .resolve(&EmailAddress::parse(email).unwrap())
            .unwrap()
            .clone()
    }

    fn target(ids: &Ids, ticket_id: TicketId) -> TicketActionContext {
        TicketActionContext {
            event_id: ids.event,
            ticket_id,
        }
    }

    fn now() -> Timestamp {
        Timestamp::from_epoch_secs(1_800_000_000).unwrap()
    }

    #[test]
    fn self_check_in_succeeds() {
        let (p, ids) = setup();
        let bob = user(&p, "bob@example.com");
        let record = p.check_in(&bob, &target(&ids, ids.bob), now()).unwrap();
        assert_eq!(record.checker, bob.email);
        assert_eq!(p.checkins().get(&ids.bob).unwrap().state(), TicketState::CheckedIn);
        assert_eq!(p.outcomes().snapshot().succeeded, 1);
    }

    #[test]
    fn repeat_is_already_checked_in_and_keeps_first_record() {
        let (p, ids) = setup();
        let ops = user(&p, "ops@example.com");
        let bob = user(&p, "bob@example.com");
        p.check_in(&ops, &target(&ids, ids.bob), now()).unwrap();
        let before = p.checkins().get(&ids.bob).unwrap();

        let denial = p.check_in(&bob, &target(&ids, ids.bob), now()).unwrap_err();
        assert_eq!(denial.error_name(), ErrorName::AlreadyCheckedIn);
        assert_eq!(p.checkins().get(&ids.bob).unwrap(), before);
        assert_eq!(p.outcomes().snapshot().already_checked_in, 1);
    }

    #[test]
    fn ineligible_product_is_not_eligible_and_state_unchanged() {
        let (p, ids) = setup();
        let ops = user(&p, "ops@example.com");
        let denial = p
            .check_in(&ops, &target(&ids, ids.parking_ticket), now())
            .unwrap_err();
        assert_eq!(denial.error_name(), ErrorName::NotEligible);
        assert_eq!(
            p.checkins().get(&ids.parking_ticket).unwrap().state(),
            TicketState::Issued
        );
    }

    #[test]
    fn unknown_ticket_or_wrong_event_is_not_found() {
        let (p, ids) = setup();
        let ops = user(&p, "ops@example.com");
        let missing = p.check_in(&ops, &target(&ids, TicketId::new()), now()).unwrap_err();
        assert_eq!(missing.error_name(), ErrorName::TicketNotFound);

        let wrong_event = TicketActionContext {
            event_id: EventId::new(),
            ticket_id: ids.bob,
        };
        let denial = p.check_in(&ops, &wrong_event, now()).unwrap_err();
        assert_eq!(denial.error_name(), ErrorName::TicketNotFound);
    }

    #[test]
    fn other_attendee_is_unauthorized() {
        let (p, ids) = setup();
        let ada = user(&p, "ada@example.com");
        let denial = p.check_in(&ada, &target(&ids, ids.bob), now()).unwrap_err();
        assert_eq!(denial.error_name(), ErrorName::Unauthorized);
        assert_eq!(p.checkins().get(&ids.bob).unwrap().state(), TicketState::Issued);
    }

    #[test]
    fn checker_product_holder_may_check_in_others() {
        let (p, ids) = setup();
        let carol = user(&p, "carol@example.com");
        assert!(p.check_in(&carol, &target(&ids, ids.ada), now()).is_ok());
    }

    #[test]
    fn eligibility_is_checked_before_authorization() {
        let (p, ids) = setup();
        let bob = user(&p, "bob@example.com");
        let denial = p
            .check_in(&bob, &target(&ids, ids.parking_ticket), now())
            .unwrap_err();
        assert_eq!(denial.error_name(), ErrorName::NotEligible);
    }

    #[test]
    fn authorization_is_checked_before_already_checked_in() {
        let (p, ids) = setup();
        let ops = user(&p, "ops@example.com");
        let ada = user(&p, "ada@example.com");
        p.check_in(&ops, &target(&ids, ids.bob), now()).unwrap();
        let denial = p.check_in(&ada, &target(&ids, ids.bob), now()).unwrap_err();
        assert_eq!(denial.error_name(), ErrorName::Unauthorized);
    }
}
