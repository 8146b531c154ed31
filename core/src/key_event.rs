//! Key events and the textual key-sequence descriptor.
//!
//! A key sequence is a string of plain characters and braced key names:
//!
//! ```text
//! nihao{space}          type "nihao", then press space
//! ni{BackSpace}{Return} edit and commit
//! {Control+a}{Shift+Left}
//! ```
//!
//! A literal space is the `space` key. Literal braces are written
//! `{braceleft}` and `{braceright}`.

use crate::error::{HostError, Result};

/// Key identity, without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// Printable character
    Char(char),
    Space,
    BackSpace,
    Tab,
    Return,
    Escape,
    Delete,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::default(),
        }
    }

    /// True when Control or Alt is held; such keys are shortcuts, not text.
    pub fn is_shortcut(&self) -> bool {
        self.modifiers.control || self.modifiers.alt
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

fn named_key(name: &str) -> Option<KeyCode> {
    let code = match name {
        "space" => KeyCode::Space,
        "BackSpace" => KeyCode::BackSpace,
        "Tab" => KeyCode::Tab,
        "Return" => KeyCode::Return,
        "Escape" => KeyCode::Escape,
        "Delete" => KeyCode::Delete,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Page_Up" | "Prior" => KeyCode::PageUp,
        "Page_Down" | "Next" => KeyCode::PageDown,
        "braceleft" => KeyCode::Char('{'),
        "braceright" => KeyCode::Char('}'),
        _ => {
            let mut chars = name.chars();
            return match (chars.next(), chars.next()) {
                (Some(' '), None) => Some(KeyCode::Space),
                (Some(ch), None) => Some(KeyCode::Char(ch)),
                _ => None,
            };
        }
    };
    Some(code)
}

fn invalid(position: usize, reason: impl Into<String>) -> HostError {
    HostError::InvalidKeySequence {
        position,
        reason: reason.into(),
    }
}

/// Parse the body of a `{...}` group starting at byte `position`.
fn parse_braced(body: &str, position: usize) -> Result<KeyEvent> {
    if body.is_empty() {
        return Err(invalid(position, "empty key name"));
    }
    let mut modifiers = Modifiers::default();
    let mut parts: Vec<&str> = body.split('+').collect();
    // "{+}" and "{Shift++}" name the plus key itself
    if body.ends_with('+') {
        parts.retain(|p| !p.is_empty());
        parts.push("+");
    }
    let Some((name, prefix)) = parts.split_last() else {
        return Err(invalid(position, "empty key name"));
    };
    for modifier in prefix {
        match *modifier {
            "Shift" => modifiers.shift = true,
            "Control" => modifiers.control = true,
            "Alt" => modifiers.alt = true,
            other => return Err(invalid(position, format!("unknown modifier '{other}'"))),
        }
    }
    let code =
        named_key(name).ok_or_else(|| invalid(position, format!("unknown key name '{name}'")))?;
    Ok(KeyEvent { code, modifiers })
}

/// Parse a key-sequence descriptor. Any malformed group rejects the whole
/// sequence.
pub fn parse_key_sequence(sequence: &str) -> Result<Vec<KeyEvent>> {
    let mut keys = Vec::new();
    let mut offset = 0;
    while let Some(ch) = sequence[offset..].chars().next() {
        match ch {
            '{' => {
                let body_start = offset + 1;
                let len = sequence[body_start..]
                    .find('}')
                    .ok_or_else(|| invalid(offset, "unterminated '{'"))?;
                keys.push(parse_braced(
                    &sequence[body_start..body_start + len],
                    offset,
                )?);
                offset = body_start + len + 1;
            }
            ' ' => {
                keys.push(KeyCode::Space.into());
                offset += 1;
            }
            ch => {
                keys.push(KeyCode::Char(ch).into());
                offset += ch.len_utf8();
            }
        }
    }
    Ok(keys)
}
