//! Snapshot projection.
//!
//! Reads a live session through the [`Host`] traits and builds the
//! [`Commit`], [`Status`] and [`Context`] messages. A missing session, schema
//! or context yields an unpopulated message, never an error: "field absent"
//! is the normal "nothing to report" answer.

use tracing::debug;

use crate::host::{ContextView, Host, SchemaView, SessionId, SessionView};
use crate::proto::{Candidate, Commit, Composition, Context, Menu, Status};

/// Page size used when the schema does not configure one.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Take the pending commit text of a session.
///
/// The text is cleared on the session once read, so each commit event is
/// observed at most once.
pub fn commit_proto<H: Host + ?Sized>(host: &mut H, session_id: SessionId) -> Commit {
    let Some(session) = host.session_mut(session_id) else {
        debug!(%session_id, "commit: no such session");
        return Commit::default();
    };
    if session.commit_text().is_empty() {
        return Commit::default();
    }
    let text = session.commit_text().to_string();
    session.reset_commit_text();
    Commit { text: Some(text) }
}

/// Snapshot of the active schema and option flags.
pub fn status_proto<H: Host + ?Sized>(host: &H, session_id: SessionId) -> Status {
    let Some(session) = host.session(session_id) else {
        debug!(%session_id, "status: no such session");
        return Status::default();
    };
    let (Some(schema), Some(ctx)) = (session.schema(), session.context()) else {
        debug!(%session_id, "status: session has no schema or context");
        return Status::default();
    };
    Status {
        schema_id: schema.schema_id().to_string(),
        schema_name: schema.schema_name().to_string(),
        is_disabled: host.is_disabled(),
        is_composing: ctx.is_composing(),
        is_ascii_mode: ctx.get_option("ascii_mode"),
        is_full_shape: ctx.get_option("full_shape"),
        is_simplified: ctx.get_option("simplification"),
        is_traditional: ctx.get_option("traditional"),
        is_ascii_punct: ctx.get_option("ascii_punct"),
    }
}

/// Snapshot of the composition and the current menu page.
pub fn context_proto<H: Host + ?Sized>(host: &H, session_id: SessionId) -> Context {
    let Some(session) = host.session(session_id) else {
        debug!(%session_id, "context: no such session");
        return Context::default();
    };
    let Some(ctx) = session.context() else {
        return Context::default();
    };
    let mut context = Context {
        input: ctx.input().to_string(),
        caret_pos: ctx.caret_pos(),
        ..Default::default()
    };
    if ctx.is_composing() {
        context.composition = Some(project_composition(ctx));
    }
    if ctx.has_menu() {
        context.menu = Some(project_menu(ctx, session.schema()));
    }
    context
}

fn project_composition<C: ContextView + ?Sized>(ctx: &C) -> Composition {
    let preedit = ctx.preedit();
    let preview = ctx.commit_text_preview();
    Composition {
        length: preedit.text.len(),
        cursor_pos: preedit.caret_pos,
        sel_start: preedit.sel_start,
        sel_end: preedit.sel_end,
        preedit: preedit.text,
        commit_text_preview: (!preview.is_empty()).then_some(preview),
    }
}

/// Page size of a schema, falling back to [`DEFAULT_PAGE_SIZE`] when unset
/// or zero.
pub fn effective_page_size<S: SchemaView + ?Sized>(schema: Option<&S>) -> usize {
    schema
        .and_then(|s| s.page_size())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

fn project_menu<C, S>(ctx: &C, schema: Option<&S>) -> Menu
where
    C: ContextView + ?Sized,
    S: SchemaView + ?Sized,
{
    let page_size = effective_page_size(schema);
    let selected_index = ctx.selected_index();
    let page_number = selected_index / page_size;

    let Some(page) = ctx.create_page(page_size, page_number) else {
        debug!(page_size, page_number, "menu has no page at selected index");
        return Menu::default();
    };

    let labels = SelectLabels::resolve(schema, page_size);
    let candidates = page
        .candidates
        .into_iter()
        .enumerate()
        .map(|(index, src)| Candidate {
            label: labels.label_at(index),
            comment: (!src.comment.is_empty()).then_some(src.comment),
            text: src.text,
        })
        .collect();

    Menu {
        page_size,
        page_number,
        is_last_page: page.is_last_page,
        highlighted_candidate_index: selected_index % page_size,
        candidates,
        select_keys: schema
            .map(|s| s.select_keys())
            .filter(|keys| !keys.is_empty())
            .map(str::to_string),
        select_labels: labels.alternative,
    }
}

/// Labels chosen for the slots of one menu page.
#[derive(Debug, Default, PartialEq, Eq)]
struct SelectLabels {
    /// Per-slot labels from whichever source won.
    slots: Vec<String>,
    /// Copy of the alternative labels when they were the winning source.
    alternative: Vec<String>,
}

impl SelectLabels {
    /// First match wins: alternative labels covering a full page, then the
    /// leading characters of the select keys, then nothing (ordinals).
    fn resolve<S: SchemaView + ?Sized>(schema: Option<&S>, page_size: usize) -> Self {
        let Some(schema) = schema else {
            return Self::default();
        };
        if let Some(alternative) = schema
            .alternative_select_labels()
            .filter(|labels| labels.len() >= page_size)
        {
            let alternative = alternative[..page_size].to_vec();
            return Self {
                slots: alternative.clone(),
                alternative,
            };
        }
        let slots = schema
            .select_keys()
            .chars()
            .take(page_size)
            .map(String::from)
            .collect();
        Self {
            slots,
            alternative: Vec::new(),
        }
    }

    fn label_at(&self, index: usize) -> String {
        self.slots
            .get(index)
            .cloned()
            .unwrap_or_else(|| (index + 1).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Page, PageCandidate, Preedit};

    struct FakeSchema {
        page_size: Option<usize>,
        select_keys: String,
        alternative: Option<Vec<String>>,
    }

    impl SchemaView for FakeSchema {
        fn schema_id(&self) -> &str {
            "fake"
        }
        fn schema_name(&self) -> &str {
            "Fake"
        }
        fn page_size(&self) -> Option<usize> {
            self.page_size
        }
        fn select_keys(&self) -> &str {
            &self.select_keys
        }
        fn alternative_select_labels(&self) -> Option<&[String]> {
            self.alternative.as_deref()
        }
    }

    #[derive(Default)]
    struct FakeContext {
        input: String,
        candidates: Vec<(&'static str, &'static str)>,
        selected: usize,
        preview: String,
        options: Vec<&'static str>,
    }

    impl ContextView for FakeContext {
        fn input(&self) -> &str {
            &self.input
        }
        fn caret_pos(&self) -> usize {
            self.input.len()
        }
        fn is_composing(&self) -> bool {
            !self.input.is_empty()
        }
        fn preedit(&self) -> Preedit {
            Preedit {
                text: self.input.clone(),
                caret_pos: self.input.len(),
                sel_start: 0,
                sel_end: self.input.len(),
            }
        }
        fn commit_text_preview(&self) -> String {
            self.preview.clone()
        }
        fn has_menu(&self) -> bool {
            !self.candidates.is_empty()
        }
        fn selected_index(&self) -> usize {
            self.selected
        }
        fn create_page(&self, page_size: usize, page_number: usize) -> Option<Page> {
            let start = page_size * page_number;
            if start >= self.candidates.len() {
                return None;
            }
            let end = (start + page_size).min(self.candidates.len());
            Some(Page {
                page_size,
                page_number,
                is_last_page: end == self.candidates.len(),
                candidates: self.candidates[start..end]
                    .iter()
                    .map(|(text, comment)| PageCandidate {
                        text: text.to_string(),
                        comment: comment.to_string(),
                    })
                    .collect(),
            })
        }
        fn get_option(&self, name: &str) -> bool {
            self.options.iter().any(|option| *option == name)
        }
    }

    struct FakeSession {
        schema: Option<FakeSchema>,
        context: Option<FakeContext>,
        commit: String,
    }

    impl SessionView for FakeSession {
        type Schema = FakeSchema;
        type Context = FakeContext;
        fn schema(&self) -> Option<&FakeSchema> {
            self.schema.as_ref()
        }
        fn context(&self) -> Option<&FakeContext> {
            self.context.as_ref()
        }
        fn commit_text(&self) -> &str {
            &self.commit
        }
        fn reset_commit_text(&mut self) {
            self.commit.clear();
        }
    }

    struct FakeHost {
        session: FakeSession,
    }

    impl Host for FakeHost {
        type Session = FakeSession;
        fn session(&self, session_id: SessionId) -> Option<&FakeSession> {
            (session_id.get() == 1).then_some(&self.session)
        }
        fn session_mut(&mut self, session_id: SessionId) -> Option<&mut FakeSession> {
            (session_id.get() == 1).then_some(&mut self.session)
        }
        fn is_disabled(&self) -> bool {
            false
        }
    }

    fn sid(raw: u64) -> SessionId {
        SessionId::new(raw).unwrap()
    }

    fn host_with(schema: Option<FakeSchema>, context: FakeContext) -> FakeHost {
        FakeHost {
            session: FakeSession {
                schema,
                context: Some(context),
                commit: String::new(),
            },
        }
    }

    fn schema(page_size: Option<usize>, select_keys: &str) -> FakeSchema {
        FakeSchema {
            page_size,
            select_keys: select_keys.to_string(),
            alternative: None,
        }
    }

    fn numbered(count: usize) -> Vec<(&'static str, &'static str)> {
        const TEXTS: [&str; 12] = [
            "一", "二", "三", "四", "五", "六", "七", "八", "九", "十", "百", "千",
        ];
        TEXTS[..count].iter().map(|t| (*t, "")).collect()
    }

    #[test]
    fn test_labels_from_select_keys() {
        let host = host_with(
            Some(schema(Some(3), "abc")),
            FakeContext {
                input: "x".into(),
                candidates: numbered(3),
                ..Default::default()
            },
        );
        let menu = context_proto(&host, sid(1)).menu.unwrap();
        assert_eq!(menu.labels(), vec!["a", "b", "c"]);
        assert_eq!(menu.select_keys.as_deref(), Some("abc"));
        assert!(menu.select_labels.is_empty());
    }

    #[test]
    fn test_labels_fall_back_to_ordinals() {
        let host = host_with(
            Some(schema(Some(3), "")),
            FakeContext {
                input: "x".into(),
                candidates: numbered(2),
                ..Default::default()
            },
        );
        let menu = context_proto(&host, sid(1)).menu.unwrap();
        assert_eq!(menu.labels(), vec!["1", "2"]);
        assert_eq!(menu.select_keys, None);
    }

    #[test]
    fn test_short_select_keys_pad_with_ordinals() {
        let host = host_with(
            Some(schema(Some(4), "ab")),
            FakeContext {
                input: "x".into(),
                candidates: numbered(4),
                ..Default::default()
            },
        );
        let menu = context_proto(&host, sid(1)).menu.unwrap();
        assert_eq!(menu.labels(), vec!["a", "b", "3", "4"]);
    }

    #[test]
    fn test_alternative_labels_take_precedence() {
        let mut s = schema(Some(3), "abc");
        s.alternative = Some(vec!["①".into(), "②".into(), "③".into(), "④".into()]);
        let host = host_with(
            Some(s),
            FakeContext {
                input: "x".into(),
                candidates: numbered(3),
                ..Default::default()
            },
        );
        let menu = context_proto(&host, sid(1)).menu.unwrap();
        assert_eq!(menu.labels(), vec!["①", "②", "③"]);
        assert_eq!(menu.select_labels, vec!["①", "②", "③"]);
    }

    #[test]
    fn test_short_alternative_labels_are_ignored() {
        let mut s = schema(Some(3), "abc");
        s.alternative = Some(vec!["①".into(), "②".into()]);
        let host = host_with(
            Some(s),
            FakeContext {
                input: "x".into(),
                candidates: numbered(3),
                ..Default::default()
            },
        );
        let menu = context_proto(&host, sid(1)).menu.unwrap();
        assert_eq!(menu.labels(), vec!["a", "b", "c"]);
        assert!(menu.select_labels.is_empty());
    }

    #[test]
    fn test_pagination_of_selected_index() {
        let host = host_with(
            Some(schema(Some(5), "")),
            FakeContext {
                input: "x".into(),
                candidates: numbered(12),
                selected: 7,
                ..Default::default()
            },
        );
        let menu = context_proto(&host, sid(1)).menu.unwrap();
        assert_eq!(menu.page_number, 1);
        assert_eq!(menu.highlighted_candidate_index, 2);
        assert_eq!(menu.candidates.len(), 5);
        assert_eq!(menu.candidates[0].text, "六");
        assert!(!menu.is_last_page);
    }

    #[test]
    fn test_unset_page_size_defaults_to_five() {
        let host = host_with(
            Some(schema(None, "")),
            FakeContext {
                input: "x".into(),
                candidates: numbered(7),
                ..Default::default()
            },
        );
        let menu = context_proto(&host, sid(1)).menu.unwrap();
        assert_eq!(menu.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(menu.candidates.len(), 5);
    }

    #[test]
    fn test_missing_page_leaves_menu_empty() {
        let host = host_with(
            Some(schema(Some(5), "")),
            FakeContext {
                input: "x".into(),
                candidates: numbered(3),
                selected: 9,
                ..Default::default()
            },
        );
        assert_eq!(context_proto(&host, sid(1)).menu, Some(Menu::default()));
    }

    #[test]
    fn test_comment_absent_when_empty() {
        let host = host_with(
            Some(schema(Some(5), "")),
            FakeContext {
                input: "ni".into(),
                candidates: vec![("你", ""), ("你好", "~hao")],
                ..Default::default()
            },
        );
        let menu = context_proto(&host, sid(1)).menu.unwrap();
        assert_eq!(menu.candidates[0].comment, None);
        assert_eq!(menu.candidates[1].comment.as_deref(), Some("~hao"));
    }

    #[test]
    fn test_composition_preview_only_when_non_empty() {
        let mut host = host_with(
            None,
            FakeContext {
                input: "ni".into(),
                ..Default::default()
            },
        );
        let composition = context_proto(&host, sid(1)).composition.unwrap();
        assert_eq!(composition.length, 2);
        assert_eq!(composition.commit_text_preview, None);

        host.session.context.as_mut().unwrap().preview = "你".into();
        let composition = context_proto(&host, sid(1)).composition.unwrap();
        assert_eq!(composition.commit_text_preview.as_deref(), Some("你"));
    }

    #[test]
    fn test_idle_context_keeps_input_only() {
        let host = host_with(None, FakeContext::default());
        let context = context_proto(&host, sid(1));
        assert_eq!(context, Context::default());
    }

    #[test]
    fn test_unknown_session_yields_empty_messages() {
        let mut host = host_with(None, FakeContext::default());
        assert_eq!(context_proto(&host, sid(2)), Context::default());
        assert_eq!(status_proto(&host, sid(2)), Status::default());
        assert_eq!(commit_proto(&mut host, sid(2)), Commit::default());
    }

    #[test]
    fn test_status_requires_schema() {
        let host = host_with(
            None,
            FakeContext {
                input: "x".into(),
                ..Default::default()
            },
        );
        assert_eq!(status_proto(&host, sid(1)), Status::default());
    }

    #[test]
    fn test_status_reads_options() {
        let host = host_with(
            Some(schema(None, "")),
            FakeContext {
                options: vec!["ascii_mode", "simplification", "ascii_punct"],
                ..Default::default()
            },
        );
        let status = status_proto(&host, sid(1));
        assert_eq!(status.schema_id, "fake");
        assert_eq!(status.schema_name, "Fake");
        assert!(status.is_ascii_mode);
        assert!(!status.is_full_shape);
        assert!(status.is_simplified);
        assert!(!status.is_traditional);
        assert!(status.is_ascii_punct);
        assert!(!status.is_composing);
    }

    #[test]
    fn test_commit_is_observed_once() {
        let mut host = host_with(None, FakeContext::default());
        host.session.commit = "你好".into();
        assert_eq!(commit_proto(&mut host, sid(1)).text.as_deref(), Some("你好"));
        assert_eq!(commit_proto(&mut host, sid(1)).text, None);
    }
}
