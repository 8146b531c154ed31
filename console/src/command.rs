//! Console command lines.

use thiserror::Error;

const SELECT_SCHEMA: &str = "select schema ";
const SELECT_CANDIDATE: &str = "select candidate ";
const SET_OPTION: &str = "set option ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    PrintSchemaList,
    SelectSchema(String),
    /// 1-based index on the current page
    SelectCandidate(usize),
    PrintCandidateList,
    SetOption { name: String, value: bool },
    /// Anything that is not a command is fed to the session as keys
    KeySequence(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Candidate index that is not a positive integer; carries the raw text.
    #[error("cannot select candidate at index {0}.")]
    InvalidCandidateIndex(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        match line {
            "exit" => return Ok(Self::Exit),
            "print schema list" => return Ok(Self::PrintSchemaList),
            "print candidate list" => return Ok(Self::PrintCandidateList),
            _ => {}
        }
        if let Some(schema_id) = line.strip_prefix(SELECT_SCHEMA) {
            return Ok(Self::SelectSchema(schema_id.to_string()));
        }
        if let Some(index) = line.strip_prefix(SELECT_CANDIDATE) {
            return match index.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(Self::SelectCandidate(n)),
                _ => Err(CommandError::InvalidCandidateIndex(index.to_string())),
            };
        }
        if let Some(option) = line.strip_prefix(SET_OPTION) {
            let (name, value) = match option.strip_prefix('!') {
                Some(name) => (name, false),
                None => (option, true),
            };
            return Ok(Self::SetOption {
                name: name.to_string(),
                value,
            });
        }
        Ok(Self::KeySequence(line.to_string()))
    }
}
