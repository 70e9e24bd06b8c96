//! # Feed Poll
//!
//! A poll returns two actions for the pipeline's folder: a recursive
//! `DeleteFolder` followed by a `ReplaceInFolder` holding a freshly signed
//! ticket proof for every ticket whose attendee email matches the poller.

use podbox_core::Timestamp;
use podbox_crypto::IdentityCommitment;
use podbox_interface::{PcdAction, PipelineUser, ReplaceInFolder};
use podbox_pcd::{Pcd, ProofConstructionError, TicketData, TicketPcd};
use podbox_state::TicketState;

use super::definition::TicketDefinition;
use super::Pipeline;

impl Pipeline {
    /// Folder actions for `holder`, whose identity is `commitment`.
    pub fn feed_actions(
        &self,
        holder: &PipelineUser,
        commitment: IdentityCommitment,
        now: Timestamp,
    ) -> Result<Vec<PcdAction>, ProofConstructionError> {
        let mut held: Vec<&TicketDefinition> = self
            .tickets
            .values()
            .filter(|t| t.attendee_email == holder.email)
            .collect();
        held.sort_by_key(|t| t.id);

        let pcds = held
            .into_iter()
            .map(|t| self.issue_ticket(t, commitment, now)?.serialize_pcd())
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            pipeline = %self.id,
            holder = %holder.email,
            tickets = pcds.len(),
            "feed actions issued"
        );

        let folder = self.feed.folder.clone();
        Ok(vec![
            PcdAction::DeleteFolder {
                folder: folder.clone(),
                recursive: true,
            },
            PcdAction::ReplaceInFolder(ReplaceInFolder { folder, pcds }),
        ])
    }

    /// Sign a ticket proof reflecting the ticket's current check-in state.
    fn issue_ticket(
        &self,
        ticket: &TicketDefinition,
        commitment: IdentityCommitment,
        now: Timestamp,
    ) -> Result<TicketPcd, ProofConstructionError> {
        let event_name = self
            .events
            .get(&ticket.event_id)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        let ticket_name = self
            .products
            .get(&ticket.product_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let is_consumed = self
            .checkins
            .get(&ticket.id)
            .is_some_and(|c| c.state() == TicketState::CheckedIn);

        TicketPcd::prove(
            &self.signing_key,
            TicketData {
                ticket_id: ticket.id,
                event_id: ticket.event_id,
                product_id: ticket.product_id,
                event_name,
                ticket_name,
                attendee_name: ticket.attendee_name.clone(),
                attendee_email: ticket.attendee_email.clone(),
                attendee_semaphore_id: Some(commitment),
                is_consumed,
                is_revoked: false,
                timestamp_signed: now,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::state::UserDirectory;
    use podbox_core::EmailAddress;
    use podbox_crypto::Identity;
    use podbox_interface::expect_replace_in_folder_at;

    fn holder(p: &Pipeline, email: &str) -> PipelineUser {
        p.users()
            .resolve(&EmailAddress::parse(email).unwrap())
            .unwrap()
            .clone()
    }

    #[test]
    fn poll_returns_delete_then_replace_with_holder_tickets() {
        let (def, ids) = fixtures::devconnect();
        let p = Pipeline::from_definition(def, &UserDirectory::new()).unwrap();
        let identity = Identity::generate().unwrap();

        let actions = p
            .feed_actions(&holder(&p, "bob@example.com"), identity.commitment(), Timestamp::now())
            .unwrap();
        assert_eq!(actions.len(), 2);
        assert!(matches!(
            &actions[0],
            PcdAction::DeleteFolder { recursive: true, .. }
        ));

        let replace = expect_replace_in_folder_at(&actions, 1).unwrap();
        assert_eq!(replace.folder, "Devconnect");
        let tickets = replace.tickets().unwrap();
        assert_eq!(tickets.len(), 1);

        let t = tickets[0].ticket();
        assert_eq!(t.ticket_id, ids.bob);
        assert_eq!(t.event_id, ids.event);
        assert_eq!(t.ticket_name, "GA");
        assert_eq!(t.event_name, "Devconnect 2026");
        assert_eq!(t.attendee_semaphore_id, Some(identity.commitment()));
        assert!(!t.is_consumed);
        tickets[0]
            .verify_issued_by(&p.signing_key.public_key())
            .unwrap();
    }

    #[test]
    fn poll_returns_every_ticket_of_the_holder() {
        let (def, _) = fixtures::devconnect();
        let p = Pipeline::from_definition(def, &UserDirectory::new()).unwrap();
        let identity = Identity::generate().unwrap();
        let actions = p
            .feed_actions(&holder(&p, "ada@example.com"), identity.commitment(), Timestamp::now())
            .unwrap();
        let replace = expect_replace_in_folder_at(&actions, 1).unwrap();
        assert_eq!(replace.pcds.len(), 2);
    }

    #[test]
    fn user_without_tickets_gets_empty_folder() {
        let (def, _) = fixtures::devconnect();
        let p = Pipeline::from_definition(def, &UserDirectory::new()).unwrap();
        let identity = Identity::generate().unwrap();
        let actions = p
            .feed_actions(&holder(&p, "ops@example.com"), identity.commitment(), Timestamp::now())
            .unwrap();
        assert!(expect_replace_in_folder_at(&actions, 1).unwrap().pcds.is_empty());
    }

    #[test]
    fn consumed_flag_follows_check_in() {
        let (def, ids) = fixtures::devconnect();
        let p = Pipeline::from_definition(def, &UserDirectory::new()).unwrap();
        let bob = holder(&p, "bob@example.com");
        p.checkins()
            .try_check_in(&ids.bob, bob.email.clone(), Timestamp::now())
            .unwrap()
            .unwrap();

        let identity = Identity::generate().unwrap();
        let actions = p.feed_actions(&bob, identity.commitment(), Timestamp::now()).unwrap();
        let tickets = expect_replace_in_folder_at(&actions, 1).unwrap().tickets().unwrap();
        assert!(tickets[0].ticket().is_consumed);
    }
}
