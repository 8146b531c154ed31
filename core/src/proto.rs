//! Snapshot messages produced by the projector.
//!
//! These types are the wire format of the adapter. Optional fields stay
//! `Option` so that "absent" and "empty string" remain distinguishable after
//! a round trip through JSON.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Text committed by the last input sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Session status: active schema and option flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Status {
    pub schema_id: String,
    pub schema_name: String,
    pub is_disabled: bool,
    pub is_composing: bool,
    pub is_ascii_mode: bool,
    pub is_full_shape: bool,
    pub is_simplified: bool,
    pub is_traditional: bool,
    pub is_ascii_punct: bool,
}

/// Preedit with caret and selection, positions in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Composition {
    pub length: usize,
    pub cursor_pos: usize,
    pub sel_start: usize,
    pub sel_end: usize,
    pub preedit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_text_preview: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub label: String,
}

/// One page of the candidate menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Menu {
    pub page_size: usize,
    pub page_number: usize,
    pub is_last_page: bool,
    pub highlighted_candidate_index: usize,
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_keys: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub select_labels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Context {
    pub input: String,
    pub caret_pos: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<Composition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<Menu>,
}

impl Menu {
    /// Labels of the candidates on this page, in order.
    pub fn labels(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Encode a message as compact JSON.
pub fn to_json<M: Serialize>(message: &M) -> serde_json::Result<String> {
    serde_json::to_string(message)
}

/// Decode a message from JSON; missing fields take their defaults.
pub fn from_json<M: DeserializeOwned>(json: &str) -> serde_json::Result<M> {
    serde_json::from_str(json)
}
