//! # Issuance Pipelines
//!
//! A pipeline owns one feed, the events and products it issues tickets for,
//! the tickets themselves, its users, and the check-in state of its tickets.
//! Definitions are immutable after load; only check-in state changes.
//!
//! - [`feed`]: the folder actions returned by a feed poll.
//! - [`checkin`]: check-in authorization and the atomic transition.

pub mod checkin;
pub mod definition;
pub mod feed;

use std::collections::HashMap;

use podbox_core::{EmailAddress, EventId, PipelineId, ProductId, TicketId};
use podbox_crypto::Ed25519KeyPair;
use podbox_interface::{feed_path, FeedInfo, PipelineInfo};

use crate::config::ConfigError;
use crate::middleware::metrics::CheckinCounters;
use crate::state::{TicketStore, UserDirectory};

pub use checkin::CheckinDenial;
use definition::{EventDefinition, FeedDefinition, PipelineDefinition, ProductDefinition, TicketDefinition};

/// A loaded pipeline.
#[derive(Debug)]
pub struct Pipeline {
    id: PipelineId,
    name: String,
    signing_key: Ed25519KeyPair,
    feed: FeedDefinition,
    events: HashMap<EventId, EventDefinition>,
    products: HashMap<ProductId, ProductDefinition>,
    tickets: HashMap<TicketId, TicketDefinition>,
    users: UserDirectory,
    checkins: TicketStore,
    outcomes: CheckinCounters,
}

impl Pipeline {
    /// Validate a definition and build the pipeline.
    ///
    /// User ids are taken from `registry` so they match across pipelines.
    pub fn from_definition(
        def: PipelineDefinition,
        registry: &UserDirectory,
    ) -> Result<Self, ConfigError> {
        let pipeline_id = def.id;
        let invalid = move |reason: String| ConfigError::InvalidPipeline {
            pipeline: pipeline_id,
            reason,
        };

        let signing_key = Ed25519KeyPair::from_seed_hex(def.signing_key.expose())
            .map_err(|e| invalid(format!("signingKey: {e}")))?;

        let mut events = HashMap::new();
        let mut products = HashMap::new();
        for event in &def.events {
            for product in &event.products {
                if products.insert(product.id, product.clone()).is_some() {
                    return Err(invalid(format!("duplicate product {}", product.id)));
                }
            }
            if events.insert(event.id, event.clone()).is_some() {
                return Err(invalid(format!("duplicate event {}", event.id)));
            }
        }

        let mut tickets = HashMap::new();
        for ticket in &def.tickets {
            let event: &EventDefinition = events
                .get(&ticket.event_id)
                .ok_or_else(|| invalid(format!("ticket {} names unknown event {}", ticket.id, ticket.event_id)))?;
            if !event.products.iter().any(|p| p.id == ticket.product_id) {
                return Err(invalid(format!(
                    "ticket {} names product {} which is not sold for event {}",
                    ticket.id, ticket.product_id, ticket.event_id
                )));
            }
            tickets.insert(ticket.id, ticket.clone());
        }

        let mut users = UserDirectory::new();
        let known_id = |email: &EmailAddress| registry.resolve(email).map(|u| u.id);
        for user in &def.users {
            users.register(user.email.clone(), known_id(&user.email).or(user.id), user.is_admin);
        }
        for ticket in &def.tickets {
            users.register(ticket.attendee_email.clone(), known_id(&ticket.attendee_email), false);
        }

        let checkins = TicketStore::new();
        for id in tickets.keys() {
            checkins.insert_issued(*id);
        }

        Ok(Self {
            id: def.id,
            name: def.name,
            signing_key,
            feed: def.feed,
            events,
            products,
            tickets,
            users,
            checkins,
            outcomes: CheckinCounters::default(),
        })
    }

    pub fn id(&self) -> PipelineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feed(&self) -> &FeedDefinition {
        &self.feed
    }

    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    pub fn has_ticket(&self, ticket_id: &TicketId) -> bool {
        self.tickets.contains_key(ticket_id)
    }

    /// Users of this pipeline, with this pipeline's admin flags.
    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn checkins(&self) -> &TicketStore {
        &self.checkins
    }

    pub fn outcomes(&self) -> &CheckinCounters {
        &self.outcomes
    }

    fn is_admin(&self, email: &EmailAddress) -> bool {
        self.users.resolve(email).is_some_and(|u| u.is_admin)
    }

    /// Administrative summary.
    pub fn info(&self, public_url: &str) -> PipelineInfo {
        PipelineInfo {
            id: self.id,
            name: self.name.clone(),
            feeds: vec![FeedInfo {
                feed_id: self.feed.id.clone(),
                name: self.feed.name.clone(),
                folder: self.feed.folder.clone(),
                url: format!("{public_url}{}", feed_path(&self.id, &self.feed.id)),
            }],
            ticket_count: self.tickets.len() as u64,
            checked_in_count: self.checkins.checked_in_count() as u64,
            checkin_outcomes: self.outcomes.snapshot(),
            users: self.users.list(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn load(def: PipelineDefinition) -> Result<Pipeline, ConfigError> {
        Pipeline::from_definition(def, &UserDirectory::new())
    }

    #[test]
    fn loads_and_registers_users() {
        let (def, _) = fixtures::devconnect();
        let p = load(def).unwrap();
        assert_eq!(p.ticket_count(), 4);
        assert_eq!(p.users().len(), 4);
        assert!(p.is_admin(&EmailAddress::parse("ops@example.com").unwrap()));
        assert!(!p.is_admin(&EmailAddress::parse("ada@example.com").unwrap()));
        assert_eq!(p.checkins().len(), 4);
    }

    #[test]
    fn ticket_for_unknown_event_is_rejected() {
        let (mut def, _) = fixtures::devconnect();
        def.tickets[0].event_id = EventId::new();
        assert!(matches!(load(def), Err(ConfigError::InvalidPipeline { .. })));
    }

    #[test]
    fn ticket_for_product_of_other_event_is_rejected() {
        let (mut def, _) = fixtures::devconnect();
        def.tickets[0].product_id = ProductId::new();
        assert!(matches!(load(def), Err(ConfigError::InvalidPipeline { .. })));
    }

    #[test]
    fn bad_signing_key_is_rejected() {
        let (mut def, _) = fixtures::devconnect();
        def.signing_key = definition::SecretSeed::new("zz");
        let err = load(def).unwrap_err();
        assert!(err.to_string().contains("signingKey"));
    }

    #[test]
    fn user_ids_come_from_registry() {
        let (def, _) = fixtures::devconnect();
        let ada = EmailAddress::parse("ada@example.com").unwrap();
        let mut registry = UserDirectory::new();
        let id = registry.register(ada.clone(), None, false).id;

        let p = Pipeline::from_definition(def, &registry).unwrap();
        assert_eq!(p.users().resolve(&ada).unwrap().id, id);
    }

    #[test]
    fn info_reports_feed_url_and_counts() {
        let (def, _) = fixtures::devconnect();
        let p = load(def).unwrap();
        let info = p.info("https://podbox.example");
        assert_eq!(info.ticket_count, 4);
        assert_eq!(info.checked_in_count, 0);
        assert_eq!(
            info.feeds[0].url,
            format!("https://podbox.example/generic-issuance/api/feed/{}/tickets", p.id().as_uuid())
        );
        assert_eq!(info.users.len(), 4);
    }
}
