//! rimeproto-core
//!
//! Snapshot projection for an input-method engine. A host engine exposes its
//! sessions through the traits in [`host`]; the [`projector`] turns a session
//! into plain [`proto`] messages (commit, status, context with composition and
//! menu) and [`render`] prints them as console text.
//!
//! The crate also carries [`TableHost`], a small in-process host driven by code
//! tables from a [`HostConfig`], so the projection can be exercised without an
//! external engine.
//!
//! Public API:
//! - `Host` / `HostControl` - Engine interface (read side and control side)
//! - `commit_proto`, `status_proto`, `context_proto` - Snapshot projection
//! - `Commit`, `Status`, `Context`, `Composition`, `Menu` - Snapshot messages
//! - `parse_key_sequence` - Key-sequence descriptor parser
//! - `TableHost` - Reference host over TOML-configured code tables

pub mod error;
pub use error::{HostError, Result};

pub mod host;
pub use host::{
    CandidateListItem, ContextView, Host, HostControl, NotificationHandler, Page, PageCandidate,
    Preedit, SchemaListItem, SchemaView, SessionId, SessionView,
};

pub mod proto;
pub use proto::{Candidate as MenuCandidate, Commit, Composition, Context, Menu, Status};

pub mod projector;
pub use projector::{commit_proto, context_proto, effective_page_size, status_proto};

pub mod render;

pub mod key_event;
pub use key_event::{parse_key_sequence, KeyCode, KeyEvent, Modifiers};

pub mod config;
pub use config::{HostConfig, SchemaConfig};

pub mod schema;
pub use schema::Schema;

pub mod candidate;
pub use candidate::{Candidate, CandidateList};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod session;
pub use session::{TableContext, TableSession};

pub mod table_host;
pub use table_host::TableHost;

/// Utility helpers.
pub mod utils {
    /// Convert ASCII characters to full-width equivalents.
    ///
    /// Printable ASCII maps onto the full-width block (U+FF01..U+FF5E) and the
    /// space becomes an ideographic space. Everything else passes through.
    pub fn to_fullwidth(s: &str) -> String {
        s.chars()
            .map(|ch| match ch {
                ' ' => '\u{3000}',
                '!'..='~' => char::from_u32(ch as u32 - 0x21 + 0xFF01).unwrap_or(ch),
                _ => ch,
            })
            .collect()
    }

}
