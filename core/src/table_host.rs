//! In-process reference host.
//!
//! `TableHost` implements the host interface on top of plain code tables
//! from a [`HostConfig`]. It exists so the console and the tests can drive
//! real sessions without an external engine.
//!
//! Schemas are deployed by a one-time maintenance task running on its own
//! thread. While it runs the service reports itself disabled and refuses new
//! sessions; [`HostControl::join_maintenance_thread`] installs the result.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::config::HostConfig;
use crate::error::{HostError, Result};
use crate::host::{
    CandidateListItem, ContextView, Host, HostControl, NotificationHandler, SchemaListItem,
    SchemaView, SessionId, SessionView,
};
use crate::key_event::parse_key_sequence;
use crate::schema::Schema;
use crate::session::TableSession;

type Deployment = Result<Vec<Schema>>;

pub struct TableHost {
    config: HostConfig,
    /// Deployed schemas, in configuration order
    schemas: Vec<Arc<Schema>>,
    sessions: BTreeMap<SessionId, TableSession>,
    next_session_id: u64,
    disabled: bool,
    notification_handler: Option<NotificationHandler>,
    maintenance: Option<JoinHandle<Deployment>>,
}

/// Compile every configured schema. A full check also validates the set.
fn deploy(config: &HostConfig, full_check: bool) -> Deployment {
    if full_check {
        let mut seen = HashSet::new();
        for schema in &config.schemas {
            if schema.schema_id.is_empty() {
                return Err(HostError::Maintenance("schema with empty id".into()));
            }
            if !seen.insert(schema.schema_id.as_str()) {
                return Err(HostError::Maintenance(format!(
                    "duplicate schema id {}",
                    schema.schema_id
                )));
            }
        }
    }
    let schemas: Vec<Schema> = config.schemas.iter().map(Schema::compile).collect();
    if full_check {
        for schema in &schemas {
            schema.check();
        }
    }
    Ok(schemas)
}

impl TableHost {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            schemas: Vec::new(),
            sessions: BTreeMap::new(),
            next_session_id: 1,
            disabled: false,
            notification_handler: None,
            maintenance: None,
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn initialize(&mut self) {
        info!(
            app = %self.config.app_name,
            schemas = self.config.schemas.len(),
            "initializing table host"
        );
    }

    /// Join any running maintenance and drop all sessions.
    pub fn finalize(&mut self) {
        self.join_maintenance_thread();
        if !self.sessions.is_empty() {
            debug!(count = self.sessions.len(), "dropping sessions");
        }
        self.sessions.clear();
        info!("table host finalized");
    }

    fn notify(&mut self, session_id: Option<SessionId>, message_type: &str, message_value: &str) {
        debug!(?session_id, message_type, message_value, "notification");
        if let Some(handler) = self.notification_handler.as_mut() {
            handler(session_id, message_type, message_value);
        }
    }

    /// Compile schemas in place when no maintenance has deployed them.
    fn ensure_deployed(&mut self) {
        if !self.schemas.is_empty() || self.config.schemas.is_empty() {
            return;
        }
        debug!("deploying schemas on demand");
        if let Ok(schemas) = deploy(&self.config, false) {
            self.schemas = schemas.into_iter().map(Arc::new).collect();
        }
    }

    fn find_schema(&self, schema_id: &str) -> Option<Arc<Schema>> {
        self.schemas
            .iter()
            .find(|s| s.schema_id() == schema_id)
            .cloned()
    }

    fn default_schema(&self) -> Option<Arc<Schema>> {
        self.config
            .default_schema
            .as_deref()
            .and_then(|id| self.find_schema(id))
            .or_else(|| self.schemas.first().cloned())
    }

    fn session_or_err(&mut self, session_id: SessionId) -> Result<&mut TableSession> {
        self.sessions
            .get_mut(&session_id)
            .ok_or(HostError::SessionNotFound(session_id))
    }
}

impl Host for TableHost {
    type Session = TableSession;

    fn session(&self, session_id: SessionId) -> Option<&TableSession> {
        self.sessions.get(&session_id)
    }

    fn session_mut(&mut self, session_id: SessionId) -> Option<&mut TableSession> {
        self.sessions.get_mut(&session_id)
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl HostControl for TableHost {
    fn create_session(&mut self) -> Option<SessionId> {
        if self.disabled {
            warn!("cannot create session while maintenance is running");
            return None;
        }
        self.ensure_deployed();
        let session_id = SessionId::new(self.next_session_id)?;
        self.next_session_id += 1;
        let schema = self.default_schema();
        info!(%session_id, schema = ?schema.as_ref().map(|s| s.schema_id()), "session created");
        self.sessions.insert(session_id, TableSession::new(schema));
        Some(session_id)
    }

    fn destroy_session(&mut self, session_id: SessionId) -> bool {
        let removed = self.sessions.remove(&session_id).is_some();
        if removed {
            info!(%session_id, "session destroyed");
        }
        removed
    }

    fn simulate_key_sequence(&mut self, session_id: SessionId, key_sequence: &str) -> Result<()> {
        if self.disabled {
            return Err(HostError::Disabled);
        }
        let keys = parse_key_sequence(key_sequence)?;
        let session = self.session_or_err(session_id)?;
        for key in keys {
            let handled = session.process_key(key);
            debug!(?key, handled, "key");
        }
        Ok(())
    }

    fn schema_list(&self) -> Vec<SchemaListItem> {
        self.schemas
            .iter()
            .map(|s| SchemaListItem {
                schema_id: s.schema_id().to_string(),
                name: s.schema_name().to_string(),
            })
            .collect()
    }

    fn current_schema(&self, session_id: SessionId) -> Option<String> {
        self.sessions
            .get(&session_id)?
            .schema()
            .map(|s| s.schema_id().to_string())
    }

    fn select_schema(&mut self, session_id: SessionId, schema_id: &str) -> Result<()> {
        let schema = self
            .find_schema(schema_id)
            .ok_or_else(|| HostError::UnknownSchema(schema_id.to_string()))?;
        let value = format!("{}/{}", schema.schema_id(), schema.schema_name());
        self.session_or_err(session_id)?.apply_schema(schema);
        self.notify(Some(session_id), "schema", &value);
        Ok(())
    }

    fn select_candidate_on_current_page(&mut self, session_id: SessionId, index: usize) -> Result<()> {
        self.session_or_err(session_id)?.select_on_current_page(index)
    }

    fn candidate_list(&self, session_id: SessionId) -> Option<Vec<CandidateListItem>> {
        let ctx = self.sessions.get(&session_id)?.context()?;
        if !ctx.has_menu() {
            return None;
        }
        Some(
            ctx.candidates()
                .candidates()
                .iter()
                .enumerate()
                .map(|(index, c)| CandidateListItem {
                    index,
                    text: c.text.clone(),
                    comment: (!c.comment.is_empty()).then(|| c.comment.clone()),
                })
                .collect(),
        )
    }

    fn set_option(&mut self, session_id: SessionId, option: &str, value: bool) -> Result<()> {
        self.session_or_err(session_id)?
            .context_mut()
            .set_option(option, value);
        let message = if value {
            option.to_string()
        } else {
            format!("!{option}")
        };
        self.notify(Some(session_id), "option", &message);
        Ok(())
    }

    fn get_option(&self, session_id: SessionId, option: &str) -> bool {
        self.sessions
            .get(&session_id)
            .and_then(|s| s.context())
            .is_some_and(|ctx| ctx.get_option(option))
    }

    fn set_notification_handler(&mut self, handler: NotificationHandler) {
        self.notification_handler = Some(handler);
    }

    fn start_maintenance(&mut self, full_check: bool) -> bool {
        if self.maintenance.is_some() || self.config.schemas.is_empty() {
            return false;
        }
        let config = self.config.clone();
        let spawned = thread::Builder::new()
            .name("maintenance".into())
            .spawn(move || deploy(&config, full_check));
        match spawned {
            Ok(handle) => {
                info!(full_check, "maintenance started");
                self.maintenance = Some(handle);
                self.disabled = true;
                self.notify(None, "deploy", "start");
                true
            }
            Err(err) => {
                warn!(%err, "cannot spawn maintenance thread");
                false
            }
        }
    }

    fn join_maintenance_thread(&mut self) {
        let Some(handle) = self.maintenance.take() else {
            return;
        };
        let outcome = handle
            .join()
            .unwrap_or_else(|_| Err(HostError::Maintenance("maintenance thread panicked".into())));
        self.disabled = false;
        match outcome {
            Ok(schemas) => {
                info!(count = schemas.len(), "schemas deployed");
                self.schemas = schemas.into_iter().map(Arc::new).collect();
                self.notify(None, "deploy", "success");
            }
            Err(err) => {
                warn!(%err, "deployment failed");
                self.notify(None, "deploy", "failure");
            }
        }
    }
}
