//! Host engine interface.
//!
//! Everything the projector and the console know about the input-method
//! engine goes through the traits in this module. The engine itself is an
//! external component: it owns schemas, sessions and candidate generation,
//! and hands out read-only views of that state.
//!
//! The interface is split in two:
//!
//! - [`Host`] with [`SessionView`], [`ContextView`] and [`SchemaView`] is the
//!   read side the projector needs to build snapshots.
//! - [`HostControl`] is the control side a presentation layer uses to drive a
//!   session (key simulation, schema and candidate selection, options).

use std::fmt;
use std::num::NonZeroU64;

use crate::error::Result;

/// Opaque session identifier handed out by the host.
///
/// Zero is never a valid id; hosts signal a failed session creation by
/// returning `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(NonZeroU64);

impl SessionId {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Preedit state as reported by the engine.
///
/// All positions are byte offsets into `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preedit {
    pub text: String,
    pub caret_pos: usize,
    pub sel_start: usize,
    pub sel_end: usize,
}

/// A candidate as stored in an engine menu page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCandidate {
    pub text: String,
    /// Empty when the candidate carries no comment.
    pub comment: String,
}

/// One page of an engine menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub page_size: usize,
    pub page_number: usize,
    pub is_last_page: bool,
    pub candidates: Vec<PageCandidate>,
}

/// Entry of the host's schema list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaListItem {
    pub schema_id: String,
    pub name: String,
}

/// Entry of a session's full candidate list (all pages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateListItem {
    /// Global 0-based index.
    pub index: usize,
    pub text: String,
    pub comment: Option<String>,
}

/// Read access to the active schema's settings.
pub trait SchemaView {
    fn schema_id(&self) -> &str;

    fn schema_name(&self) -> &str;

    /// Configured page size, `None` when the schema leaves it unset.
    fn page_size(&self) -> Option<usize>;

    /// Select keys, empty when the schema defines none.
    fn select_keys(&self) -> &str;

    /// The `menu/alternative_select_labels` list, if configured.
    fn alternative_select_labels(&self) -> Option<&[String]>;
}

/// Read access to a session's composition context.
pub trait ContextView {
    fn input(&self) -> &str;

    fn caret_pos(&self) -> usize;

    fn is_composing(&self) -> bool;

    fn preedit(&self) -> Preedit;

    /// Text that would be committed if the composition were confirmed now.
    fn commit_text_preview(&self) -> String;

    fn has_menu(&self) -> bool;

    /// Global index of the selected candidate in the active menu.
    fn selected_index(&self) -> usize;

    /// Build the page `page_number` of the active menu at `page_size`, or
    /// `None` when the menu has no such page.
    fn create_page(&self, page_size: usize, page_number: usize) -> Option<Page>;

    fn get_option(&self, name: &str) -> bool;
}

/// Read access to a session, plus the one write the projector performs:
/// clearing delivered commit text.
pub trait SessionView {
    type Schema: SchemaView;
    type Context: ContextView;

    fn schema(&self) -> Option<&Self::Schema>;

    fn context(&self) -> Option<&Self::Context>;

    /// Pending commit text, empty when nothing has been committed since the
    /// last reset.
    fn commit_text(&self) -> &str;

    fn reset_commit_text(&mut self);
}

/// Read side of a host engine.
pub trait Host {
    type Session: SessionView;

    fn session(&self, session_id: SessionId) -> Option<&Self::Session>;

    fn session_mut(&mut self, session_id: SessionId) -> Option<&mut Self::Session>;

    /// Global disabled flag of the service.
    fn is_disabled(&self) -> bool;
}

/// Callback invoked with `(session, message type, message value)`.
///
/// Service-wide events (deployment) carry no session.
pub type NotificationHandler = Box<dyn FnMut(Option<SessionId>, &str, &str) + Send>;

/// Control side of a host engine.
pub trait HostControl: Host {
    /// Create a session; `None` signals failure.
    fn create_session(&mut self) -> Option<SessionId>;

    fn destroy_session(&mut self, session_id: SessionId) -> bool;

    /// Feed a key-sequence descriptor (see [`crate::key_event`]) to a session.
    fn simulate_key_sequence(&mut self, session_id: SessionId, key_sequence: &str) -> Result<()>;

    fn schema_list(&self) -> Vec<SchemaListItem>;

    fn current_schema(&self, session_id: SessionId) -> Option<String>;

    fn select_schema(&mut self, session_id: SessionId, schema_id: &str) -> Result<()>;

    /// Select the candidate at 0-based `index` on the current menu page.
    fn select_candidate_on_current_page(&mut self, session_id: SessionId, index: usize)
        -> Result<()>;

    /// All candidates of the active menu, `None` when there is no menu.
    fn candidate_list(&self, session_id: SessionId) -> Option<Vec<CandidateListItem>>;

    fn set_option(&mut self, session_id: SessionId, option: &str, value: bool) -> Result<()>;

    fn get_option(&self, session_id: SessionId, option: &str) -> bool;

    fn set_notification_handler(&mut self, handler: NotificationHandler);

    /// Start the one-time background maintenance task. Returns `false` when
    /// there is nothing to run.
    fn start_maintenance(&mut self, full_check: bool) -> bool;

    /// Block until the maintenance task has finished.
    fn join_maintenance_thread(&mut self);
}
