//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Everything here is built once from
//! configuration; the only mutable data is per-ticket check-in state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use podbox_core::{EmailAddress, PipelineId, TicketId, Timestamp, UserId};
use podbox_interface::PipelineUser;
use podbox_state::{CheckinRecord, TicketCheckin, TicketError, TicketState};

use crate::config::{AppConfig, ConfigError};
use crate::pipeline::definition::{load_pipelines, PipelineDefinition};
use crate::pipeline::Pipeline;
use crate::verifier::CredentialVerifier;

// -- Ticket Store --------------------------------------------------------------

/// Check-in state of every ticket in a pipeline.
///
/// The map lock is only held long enough to clone the ticket's `Arc`; the
/// transition itself runs under that ticket's own mutex. Check-ins of the
/// same ticket are serialized, different tickets proceed in parallel. Both
/// locks are `parking_lot` and never held across `.await`.
#[derive(Debug, Clone, Default)]
pub struct TicketStore {
    tickets: Arc<RwLock<HashMap<TicketId, Arc<Mutex<TicketCheckin>>>>>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ticket in the `Issued` state. Existing state is kept.
    pub fn insert_issued(&self, ticket_id: TicketId) {
        self.tickets
            .write()
            .entry(ticket_id)
            .or_insert_with(|| Arc::new(Mutex::new(TicketCheckin::issued(ticket_id))));
    }

    fn slot(&self, ticket_id: &TicketId) -> Option<Arc<Mutex<TicketCheckin>>> {
        self.tickets.read().get(ticket_id).cloned()
    }

    /// Current state of a ticket.
    pub fn get(&self, ticket_id: &TicketId) -> Option<TicketCheckin> {
        self.slot(ticket_id).map(|t| t.lock().clone())
    }

    /// Atomically check a ticket in.
    ///
    /// Returns `None` if the ticket is unknown.
    pub fn try_check_in(
        &self,
        ticket_id: &TicketId,
        checker: EmailAddress,
        at: Timestamp,
    ) -> Option<Result<CheckinRecord, TicketError>> {
        let slot = self.slot(ticket_id)?;
        let mut ticket = slot.lock();
        Some(ticket.check_in(checker, at).cloned())
    }

    pub fn len(&self) -> usize {
        self.tickets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tickets in the `CheckedIn` state.
    pub fn checked_in_count(&self) -> usize {
        let slots: Vec<_> = self.tickets.read().values().cloned().collect();
        slots
            .iter()
            .filter(|t| t.lock().state() == TicketState::CheckedIn)
            .count()
    }
}

// -- User Directory ------------------------------------------------------------

/// Users keyed by normalized email.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<EmailAddress, PipelineUser>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user, or upgrade an existing one to admin.
    ///
    /// The first registration of an email fixes its id.
    pub fn register(&mut self, email: EmailAddress, id: Option<UserId>, is_admin: bool) -> &PipelineUser {
        let user = self
            .users
            .entry(email.clone())
            .or_insert_with(|| PipelineUser {
                id: id.unwrap_or_default(),
                email,
                is_admin: false,
            });
        user.is_admin |= is_admin;
        user
    }

    pub fn resolve(&self, email: &EmailAddress) -> Option<&PipelineUser> {
        self.users.get(email)
    }

    /// All users, ordered by email.
    pub fn list(&self) -> Vec<PipelineUser> {
        let mut users: Vec<_> = self.users.values().cloned().collect();
        users.sort_by(|a, b| a.email.as_str().cmp(b.email.as_str()));
        users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

// -- Application State ---------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pipelines: Arc<HashMap<PipelineId, Arc<Pipeline>>>,
    users: Arc<UserDirectory>,
    verifier: Option<CredentialVerifier>,
}

impl AppState {
    /// State with default configuration and no pipelines.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// State with no pipelines.
    pub fn with_config(config: AppConfig) -> Self {
        let verifier = config
            .email_issuer_key
            .map(|key| CredentialVerifier::new(key, config.credential_max_age_secs));
        Self {
            config,
            pipelines: Arc::new(HashMap::new()),
            users: Arc::new(UserDirectory::new()),
            verifier,
        }
    }

    /// Load pipelines from `config.pipelines_path`, if set.
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let definitions = match &config.pipelines_path {
            Some(path) => load_pipelines(path)?,
            None => Vec::new(),
        };
        Self::from_definitions(config, definitions)
    }

    /// Build state from already-parsed pipeline definitions.
    ///
    /// Users are registered globally first so a person keeps one id across
    /// pipelines: every configured user, then every ticket attendee.
    pub fn from_definitions(
        config: AppConfig,
        definitions: Vec<PipelineDefinition>,
    ) -> Result<Self, ConfigError> {
        if !definitions.is_empty() && config.email_issuer_key.is_none() {
            return Err(ConfigError::MissingIssuerKey);
        }

        let mut users = UserDirectory::new();
        for def in &definitions {
            for user in &def.users {
                users.register(user.email.clone(), user.id, user.is_admin);
            }
            for ticket in &def.tickets {
                users.register(ticket.attendee_email.clone(), None, false);
            }
        }

        let mut pipelines = HashMap::new();
        let mut seen_tickets = std::collections::HashSet::new();
        for def in definitions {
            if pipelines.contains_key(&def.id) {
                return Err(ConfigError::DuplicatePipeline(def.id));
            }
            for ticket in &def.tickets {
                if !seen_tickets.insert(ticket.id) {
                    return Err(ConfigError::DuplicateTicket(ticket.id));
                }
            }
            let pipeline = Pipeline::from_definition(def, &users)?;
            tracing::info!(
                pipeline = %pipeline.id(),
                name = pipeline.name(),
                tickets = pipeline.ticket_count(),
                "pipeline loaded"
            );
            pipelines.insert(pipeline.id(), Arc::new(pipeline));
        }

        let mut state = Self::with_config(config);
        state.pipelines = Arc::new(pipelines);
        state.users = Arc::new(users);
        Ok(state)
    }

    pub fn pipeline(&self, id: &PipelineId) -> Option<Arc<Pipeline>> {
        self.pipelines.get(id).cloned()
    }

    /// The pipeline that issued `ticket_id`.
    pub fn pipeline_for_ticket(&self, ticket_id: &TicketId) -> Option<Arc<Pipeline>> {
        self.pipelines
            .values()
            .find(|p| p.has_ticket(ticket_id))
            .cloned()
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// `None` when no trusted email issuer is configured.
    pub fn verifier(&self) -> Option<&CredentialVerifier> {
        self.verifier.as_ref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
