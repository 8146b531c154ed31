//! Line-oriented text rendering of snapshots.
//!
//! Every function returns complete lines, each terminated by `\n`, or an
//! empty string when there is nothing to show.

use crate::proto::{Commit, Composition, Context, Menu, Status};

/// `commit: <text>` when the commit carries text.
pub fn render_commit(commit: &Commit) -> String {
    match &commit.text {
        Some(text) => format!("commit: {text}\n"),
        None => String::new(),
    }
}

/// Schema line followed by the list of flags that are set.
pub fn render_status(status: &Status) -> String {
    let mut out = format!(
        "schema: {} / {}\nstatus:",
        status.schema_id, status.schema_name
    );
    let flags = [
        (status.is_disabled, "disabled"),
        (status.is_composing, "composing"),
        (status.is_ascii_mode, "ascii"),
        (status.is_full_shape, "full_shape"),
        (status.is_simplified, "simplified"),
    ];
    for (_, name) in flags.iter().filter(|(set, _)| *set) {
        out.push(' ');
        out.push_str(name);
    }
    out.push('\n');
    out
}

/// Preedit with selection brackets and the cursor bar overlaid.
pub fn render_composition(composition: &Composition) -> String {
    if composition.preedit.is_empty() {
        return String::new();
    }
    let mut out = overlay_markers(
        &composition.preedit,
        composition.sel_start,
        composition.sel_end,
        composition.cursor_pos,
    );
    out.push('\n');
    out
}

/// Page header and one line per candidate.
pub fn render_menu(menu: &Menu) -> String {
    if menu.candidates.is_empty() {
        return String::new();
    }
    let mut out = format!(
        "page: {}{} (of size {})\n",
        menu.page_number + 1,
        if menu.is_last_page { '$' } else { ' ' },
        menu.page_size
    );
    for (i, candidate) in menu.candidates.iter().enumerate() {
        let highlighted = i == menu.highlighted_candidate_index;
        out.push_str(&format!(
            "{}. {}{}{}{}\n",
            i + 1,
            if highlighted { '[' } else { ' ' },
            candidate.text,
            if highlighted { ']' } else { ' ' },
            candidate.comment.as_deref().unwrap_or("")
        ));
    }
    out
}

/// Composition and menu while composing, `(not composing)` otherwise.
pub fn render_context(context: &Context) -> String {
    match &context.composition {
        Some(composition) if composition.length > 0 => {
            let mut out = render_composition(composition);
            if let Some(menu) = &context.menu {
                out.push_str(&render_menu(menu));
            }
            out
        }
        _ => "(not composing)\n".to_string(),
    }
}

/// Insert `[`, `]` and `|` into `text` at byte positions.
///
/// Brackets appear only when `sel_start < sel_end`. Markers sharing a
/// position keep the order bracket, then bar. A position inside a multi-byte
/// character is rendered at the next character boundary; positions past the
/// end of `text` are dropped.
pub fn overlay_markers(text: &str, sel_start: usize, sel_end: usize, cursor: usize) -> String {
    let mut marks: Vec<(usize, char)> = Vec::with_capacity(3);
    if sel_start < sel_end {
        marks.push((sel_start, '['));
        marks.push((sel_end, ']'));
    }
    marks.push((cursor, '|'));
    marks.retain(|&(pos, _)| pos <= text.len());
    // stable: equal positions keep insertion order
    marks.sort_by_key(|&(pos, _)| pos);

    let mut out = String::with_capacity(text.len() + marks.len());
    let mut pending = marks.into_iter().peekable();
    for (offset, ch) in text.char_indices() {
        while let Some((_, mark)) = pending.next_if(|&(pos, _)| pos <= offset) {
            out.push(mark);
        }
        out.push(ch);
    }
    out.extend(pending.map(|(_, mark)| mark));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::Candidate;

    fn composition(preedit: &str, cursor: usize, sel: (usize, usize)) -> Composition {
        Composition {
            length: preedit.len(),
            cursor_pos: cursor,
            sel_start: sel.0,
            sel_end: sel.1,
            preedit: preedit.to_string(),
            commit_text_preview: None,
        }
    }

    #[test]
    fn test_overlay_selection_and_cursor_at_end() {
        assert_eq!(overlay_markers("nihao", 0, 5, 5), "[nihao]|");
    }

    #[test]
    fn test_overlay_cursor_inside_selection() {
        assert_eq!(overlay_markers("nihao", 0, 5, 2), "[ni|hao]");
    }

    #[test]
    fn test_overlay_selection_start_and_cursor_coincide() {
        assert_eq!(overlay_markers("nihao", 2, 5, 2), "ni[|hao]");
    }

    #[test]
    fn test_overlay_without_selection() {
        assert_eq!(overlay_markers("abc", 1, 1, 1), "a|bc");
        assert_eq!(overlay_markers("abc", 2, 1, 0), "|abc");
    }

    #[test]
    fn test_overlay_preserves_characters() {
        let text = "你好ma";
        let out = overlay_markers(text, 3, 6, 8);
        assert_eq!(out, "你[好]ma|");
        let stripped: String = out.chars().filter(|c| !"[]|".contains(*c)).collect();
        assert_eq!(stripped, text);
        assert_eq!(out.chars().count(), text.chars().count() + 3);
    }

    #[test]
    fn test_overlay_inside_multibyte_char_moves_to_boundary() {
        assert_eq!(overlay_markers("你好", 0, 0, 1), "你|好");
    }

    #[test]
    fn test_overlay_drops_out_of_range_marker() {
        assert_eq!(overlay_markers("ab", 0, 0, 7), "ab");
    }

    #[test]
    fn test_render_empty_composition() {
        assert_eq!(render_composition(&composition("", 0, (0, 0))), "");
    }

    #[test]
    fn test_render_menu_lines() {
        let menu = Menu {
            page_size: 5,
            page_number: 0,
            is_last_page: true,
            highlighted_candidate_index: 0,
            candidates: vec![
                Candidate {
                    text: "你".into(),
                    comment: None,
                    label: "1".into(),
                },
                Candidate {
                    text: "你好".into(),
                    comment: Some("~hao".into()),
                    label: "2".into(),
                },
            ],
            ..Default::default()
        };
        assert_eq!(
            render_menu(&menu),
            "page: 1$ (of size 5)\n1. [你]\n2.  你好 ~hao\n"
        );
    }

    #[test]
    fn test_render_menu_not_last_page() {
        let menu = Menu {
            page_size: 2,
            page_number: 1,
            highlighted_candidate_index: 1,
            candidates: vec![
                Candidate {
                    text: "a".into(),
                    ..Default::default()
                },
                Candidate {
                    text: "b".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(render_menu(&menu), "page: 2  (of size 2)\n1.  a \n2. [b]\n");
    }

    #[test]
    fn test_render_empty_menu() {
        assert_eq!(render_menu(&Menu::default()), "");
    }

    #[test]
    fn test_render_status_flags_in_order() {
        let status = Status {
            schema_id: "luna_pinyin".into(),
            schema_name: "朙月拼音".into(),
            is_composing: true,
            is_full_shape: true,
            is_simplified: true,
            is_traditional: true,
            ..Default::default()
        };
        assert_eq!(
            render_status(&status),
            "schema: luna_pinyin / 朙月拼音\nstatus: composing full_shape simplified\n"
        );
    }

    #[test]
    fn test_render_status_no_flags() {
        assert_eq!(render_status(&Status::default()), "schema:  / \nstatus:\n");
    }

    #[test]
    fn test_render_context_not_composing() {
        let context = Context {
            input: "hello".into(),
            caret_pos: 5,
            ..Default::default()
        };
        assert_eq!(render_context(&context), "(not composing)\n");
    }

    #[test]
    fn test_render_context_composing() {
        let context = Context {
            input: "ni".into(),
            caret_pos: 2,
            composition: Some(composition("ni", 2, (0, 2))),
            menu: None,
        };
        assert_eq!(render_context(&context), "[ni]|\n");
    }

    #[test]
    fn test_render_commit() {
        assert_eq!(render_commit(&Commit::default()), "");
        let commit = Commit {
            text: Some("你好".into()),
        };
        assert_eq!(render_commit(&commit), "commit: 你好\n");
    }
}
