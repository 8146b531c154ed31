//! Deployed schema: settings plus a sorted code table.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::candidate::Candidate;
use crate::config::SchemaConfig;
use crate::host::SchemaView;
use crate::projector::effective_page_size;

/// Select keys used by the table host when a schema defines none.
pub const DEFAULT_SELECT_KEYS: &str = "1234567890";

#[derive(Debug, Clone)]
pub struct Schema {
    schema_id: String,
    name: String,
    page_size: Option<usize>,
    select_keys: String,
    alternative_select_labels: Option<Vec<String>>,
    switches: BTreeMap<String, bool>,
    table: BTreeMap<String, Vec<String>>,
    /// Characters used by any code
    alphabet: BTreeSet<char>,
}

impl Schema {
    /// Compile a schema from its configuration. Empty codes and empty
    /// candidate lists are dropped.
    pub fn compile(config: &SchemaConfig) -> Self {
        let table: BTreeMap<String, Vec<String>> = config
            .table
            .iter()
            .filter(|(code, texts)| !code.is_empty() && !texts.is_empty())
            .map(|(code, texts)| (code.clone(), texts.clone()))
            .collect();
        let alphabet = table.keys().flat_map(|code| code.chars()).collect();
        let name = if config.name.is_empty() {
            config.schema_id.clone()
        } else {
            config.name.clone()
        };
        Self {
            schema_id: config.schema_id.clone(),
            name,
            page_size: config.page_size,
            select_keys: config.select_keys.clone(),
            alternative_select_labels: config.alternative_select_labels.clone(),
            switches: config.switches.clone(),
            table,
            alphabet,
        }
    }

    /// Problems worth reporting during a full check. None of them prevent
    /// deployment.
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.page_size == Some(0) {
            problems.push(format!("{}: page_size 0, default applies", self.schema_id));
        }
        let page_size = effective_page_size(Some(self));
        if let Some(labels) = &self.alternative_select_labels {
            if labels.len() < page_size {
                problems.push(format!(
                    "{}: {} alternative labels for page size {}, ignored",
                    self.schema_id,
                    labels.len(),
                    page_size
                ));
            }
        }
        let keys = self.select_keys.chars().count();
        if keys > 0 && keys < page_size {
            problems.push(format!(
                "{}: {} select keys for page size {}",
                self.schema_id, keys, page_size
            ));
        }
        if self.table.is_empty() {
            problems.push(format!("{}: empty code table", self.schema_id));
        }
        for problem in &problems {
            warn!("{problem}");
        }
        problems
    }

    pub fn switches(&self) -> &BTreeMap<String, bool> {
        &self.switches
    }

    /// Select keys the session reacts to.
    pub fn effective_select_keys(&self) -> &str {
        if self.select_keys.is_empty() {
            DEFAULT_SELECT_KEYS
        } else {
            &self.select_keys
        }
    }

    pub fn in_alphabet(&self, ch: char) -> bool {
        self.alphabet.contains(&ch)
    }

    /// True when some code starts with `prefix`.
    pub fn is_prefix(&self, prefix: &str) -> bool {
        self.table
            .range(prefix.to_string()..)
            .next()
            .is_some_and(|(code, _)| code.starts_with(prefix))
    }

    /// Candidates for `input`: exact matches first, then completions of
    /// longer codes commented with the remaining keys.
    pub fn lookup(&self, input: &str) -> Vec<Candidate> {
        if input.is_empty() {
            return Vec::new();
        }
        let mut exact = Vec::new();
        let mut completions = Vec::new();
        for (code, texts) in self
            .table
            .range(input.to_string()..)
            .take_while(|(code, _)| code.starts_with(input))
        {
            if code == input {
                exact.extend(texts.iter().map(Candidate::new));
            } else {
                let rest = &code[input.len()..];
                completions.extend(
                    texts
                        .iter()
                        .map(|text| Candidate::with_comment(text, format!("~{rest}"))),
                );
            }
        }
        exact.extend(completions);
        exact
    }
}

impl SchemaView for Schema {
    fn schema_id(&self) -> &str {
        &self.schema_id
    }

    fn schema_name(&self) -> &str {
        &self.name
    }

    fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    fn select_keys(&self) -> &str {
        &self.select_keys
    }

    fn alternative_select_labels(&self) -> Option<&[String]> {
        self.alternative_select_labels.as_deref()
    }
}
