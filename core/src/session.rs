//! Table host session.
//!
//! A `TableSession` combines the raw input, the candidate menu, option flags
//! and pending commit text, and turns key events into changes of that
//! state. It is the session type behind [`crate::TableHost`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::candidate::CandidateList;
use crate::error::{HostError, Result};
use crate::host::{ContextView, Page, Preedit, SessionView};
use crate::input_buffer::InputBuffer;
use crate::key_event::{KeyCode, KeyEvent};
use crate::projector::effective_page_size;
use crate::schema::Schema;
use crate::utils::to_fullwidth;

/// Composition state of a table session.
#[derive(Debug, Clone, Default)]
pub struct TableContext {
    /// Raw input buffer (e.g., "nihao")
    input: InputBuffer,

    /// Candidates for the current input
    candidates: CandidateList,

    /// Named option flags
    options: HashMap<String, bool>,
}

impl TableContext {
    pub fn set_option(&mut self, name: &str, value: bool) {
        self.options.insert(name.to_string(), value);
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    fn clear_composition(&mut self) {
        self.input.clear();
        self.candidates.clear();
    }

    /// Highlighted candidate when a menu is open, raw input otherwise.
    fn composed_text(&self) -> String {
        match self.candidates.highlighted_candidate() {
            Some(candidate) => candidate.text.clone(),
            None => self.input.text().to_string(),
        }
    }
}

impl ContextView for TableContext {
    fn input(&self) -> &str {
        self.input.text()
    }

    fn caret_pos(&self) -> usize {
        self.input.caret()
    }

    fn is_composing(&self) -> bool {
        !self.input.is_empty()
    }

    fn preedit(&self) -> Preedit {
        // the whole input is a single segment
        Preedit {
            text: self.input.text().to_string(),
            caret_pos: self.input.caret(),
            sel_start: 0,
            sel_end: self.input.len(),
        }
    }

    fn commit_text_preview(&self) -> String {
        if self.is_composing() {
            self.composed_text()
        } else {
            String::new()
        }
    }

    fn has_menu(&self) -> bool {
        !self.candidates.is_empty()
    }

    fn selected_index(&self) -> usize {
        self.candidates.highlighted()
    }

    fn create_page(&self, page_size: usize, page_number: usize) -> Option<Page> {
        self.candidates.create_page(page_size, page_number)
    }

    fn get_option(&self, name: &str) -> bool {
        self.options.get(name).copied().unwrap_or(false)
    }
}

/// Session of the table host.
#[derive(Debug, Clone, Default)]
pub struct TableSession {
    schema: Option<Arc<Schema>>,
    context: TableContext,
    /// Text committed since the last read
    commit_text: String,
}

impl TableSession {
    pub fn new(schema: Option<Arc<Schema>>) -> Self {
        let mut session = Self::default();
        if let Some(schema) = schema {
            session.apply_schema(schema);
        }
        session
    }

    /// Switch to `schema`: drop the composition and apply its switches.
    pub fn apply_schema(&mut self, schema: Arc<Schema>) {
        self.context.clear_composition();
        for (name, value) in schema.switches() {
            self.context.set_option(name, *value);
        }
        self.schema = Some(schema);
    }

    pub fn context_mut(&mut self) -> &mut TableContext {
        &mut self.context
    }

    fn page_size(&self) -> usize {
        effective_page_size(self.schema.as_deref())
    }

    fn commit(&mut self, text: &str) {
        if !text.is_empty() {
            debug!(text, "commit");
            self.commit_text.push_str(text);
        }
    }

    fn commit_composition(&mut self) {
        let text = self.context.composed_text();
        self.context.clear_composition();
        self.commit(&text);
    }

    fn refresh_candidates(&mut self, schema: &Schema) {
        let candidates = schema.lookup(self.context.input.text());
        self.context.candidates.set_candidates(candidates);
    }

    /// Select candidate `index` (0-based) of the page holding the highlight
    /// and commit it.
    pub fn select_on_current_page(&mut self, index: usize) -> Result<()> {
        let page_size = self.page_size();
        if index >= page_size {
            return Err(HostError::CandidateOutOfRange { index });
        }
        let global = self.context.candidates.page_start(page_size) + index;
        let Some(candidate) = self.context.candidates.candidates().get(global).cloned() else {
            return Err(HostError::CandidateOutOfRange { index });
        };
        self.context.clear_composition();
        self.commit(&candidate.text);
        Ok(())
    }

    /// Process one key. Returns whether the session handled it; unhandled
    /// keys belong to the application.
    pub fn process_key(&mut self, key: KeyEvent) -> bool {
        if key.is_shortcut() {
            return false;
        }
        let Some(schema) = self.schema.clone() else {
            return false;
        };
        let composing = self.context.is_composing();
        match key.code {
            KeyCode::Char(ch) => self.process_char(&schema, ch),
            KeyCode::Space if composing => {
                self.commit_composition();
                true
            }
            KeyCode::Space => self.commit_char(' '),
            _ if !composing => false,
            KeyCode::Return => {
                let raw = self.context.input.take();
                self.context.candidates.clear();
                self.commit(&raw);
                true
            }
            KeyCode::Escape => {
                self.context.clear_composition();
                true
            }
            KeyCode::BackSpace => {
                self.context.input.delete_before();
                self.refresh_candidates(&schema);
                true
            }
            KeyCode::Delete => {
                self.context.input.delete_after();
                self.refresh_candidates(&schema);
                true
            }
            KeyCode::Left => {
                self.context.input.move_left();
                true
            }
            KeyCode::Right => {
                self.context.input.move_right();
                true
            }
            KeyCode::Home => {
                self.context.input.move_to_start();
                true
            }
            KeyCode::End => {
                self.context.input.move_to_end();
                true
            }
            KeyCode::Up => {
                self.context.candidates.cursor_up();
                true
            }
            KeyCode::Down => {
                self.context.candidates.cursor_down();
                true
            }
            KeyCode::PageUp => {
                let page_size = self.page_size();
                self.context.candidates.page_up(page_size);
                true
            }
            KeyCode::PageDown => {
                let page_size = self.page_size();
                self.context.candidates.page_down(page_size);
                true
            }
            KeyCode::Tab => false,
        }
    }

    fn process_char(&mut self, schema: &Schema, ch: char) -> bool {
        if self.context.get_option("ascii_mode") {
            return false;
        }
        if self.context.is_composing() {
            let mut extended = self.context.input.clone();
            extended.insert(ch);
            let extends_code = schema.in_alphabet(ch) && schema.is_prefix(extended.text());
            if !extends_code && self.context.has_menu() {
                let page_size = self.page_size();
                if let Some(slot) = schema
                    .effective_select_keys()
                    .chars()
                    .position(|k| k == ch)
                    .filter(|&slot| slot < page_size)
                {
                    if let Err(err) = self.select_on_current_page(slot) {
                        debug!(%err, "select key ignored");
                    }
                    return true;
                }
            }
            if schema.in_alphabet(ch) {
                self.context.input = extended;
                self.refresh_candidates(schema);
                return true;
            }
            self.commit_composition();
        } else if schema.in_alphabet(ch) && schema.is_prefix(ch.encode_utf8(&mut [0; 4])) {
            self.context.input.insert(ch);
            self.refresh_candidates(schema);
            return true;
        }
        self.commit_char(ch)
    }

    /// Commit a key that is not part of a composition. Only full-shape mode
    /// turns it into text; otherwise it is left to the application.
    fn commit_char(&mut self, ch: char) -> bool {
        if !self.context.get_option("full_shape") {
            return false;
        }
        self.commit(&to_fullwidth(ch.encode_utf8(&mut [0; 4])));
        true
    }
}

impl SessionView for TableSession {
    type Schema = Schema;
    type Context = TableContext;

    fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    fn context(&self) -> Option<&TableContext> {
        Some(&self.context)
    }

    fn commit_text(&self) -> &str {
        &self.commit_text
    }

    fn reset_commit_text(&mut self) {
        self.commit_text.clear();
    }
}
