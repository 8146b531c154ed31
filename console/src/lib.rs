//! rimeproto-console
//!
//! Request/response loop over one host session: each input line is either a
//! console command or a key sequence, and after every key sequence the
//! commit, status and context snapshots are printed.

use std::io::{self, BufRead, Write};

use serde::Serialize;
use tracing::debug;

use rimeproto_core::render::{render_commit, render_context, render_status};
use rimeproto_core::{commit_proto, context_proto, status_proto};
use rimeproto_core::{Commit, Context, HostControl, SessionId, Status};

pub mod command;
pub use command::{Command, CommandError};

/// How snapshots are printed.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per refresh
    Json,
}

/// Whether the loop keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The three snapshots of one refresh, as printed in JSON mode.
#[derive(Debug, Serialize)]
struct Snapshot {
    commit: Commit,
    status: Status,
    context: Context,
}

/// A host notification as one output line, without the trailing newline.
///
/// In JSON mode the line is an object keyed by `notification`, so it can
/// share stdout with the snapshot objects.
pub fn format_notification(
    format: OutputFormat,
    session_id: Option<SessionId>,
    message_type: &str,
    message_value: &str,
) -> String {
    let id = session_id.map_or(0, SessionId::get);
    match format {
        OutputFormat::Text => format!("message: [{id}] [{message_type}] {message_value}"),
        OutputFormat::Json => serde_json::json!({
            "notification": {
                "sessionId": id,
                "messageType": message_type,
                "messageValue": message_value,
            }
        })
        .to_string(),
    }
}

pub struct Console<H, W, E> {
    host: H,
    session_id: SessionId,
    format: OutputFormat,
    out: W,
    err: E,
}

impl<H: HostControl, W: Write, E: Write> Console<H, W, E> {
    pub fn new(host: H, session_id: SessionId, out: W, err: E) -> Self {
        Self {
            host,
            session_id,
            format: OutputFormat::Text,
            out,
            err,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Process lines until `exit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            if self.handle_line(&line?)? == Flow::Exit {
                break;
            }
        }
        self.out.flush()
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(self.err, "{err}")?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "console command");
        let id = self.session_id;
        match command {
            Command::Exit => return Ok(Flow::Exit),
            Command::PrintSchemaList => {
                writeln!(self.out, "schema list:")?;
                for (i, item) in self.host.schema_list().iter().enumerate() {
                    writeln!(self.out, "{}. {} [{}]", i + 1, item.name, item.schema_id)?;
                }
                if let Some(current) = self.host.current_schema(id) {
                    writeln!(self.out, "current schema: [{current}]")?;
                }
            }
            Command::SelectSchema(schema_id) => match self.host.select_schema(id, &schema_id) {
                Ok(()) => writeln!(self.out, "selected schema: [{schema_id}]")?,
                Err(err) => writeln!(self.err, "cannot select schema [{schema_id}]: {err}")?,
            },
            Command::SelectCandidate(n) => {
                match self.host.select_candidate_on_current_page(id, n - 1) {
                    Ok(()) => self.print()?,
                    Err(err) => {
                        debug!(%err, "candidate selection failed");
                        writeln!(self.err, "cannot select candidate at index {n}.")?;
                    }
                }
            }
            Command::PrintCandidateList => match self.host.candidate_list(id) {
                Some(list) => {
                    for item in list {
                        write!(self.out, "{}. {}", item.index + 1, item.text)?;
                        if let Some(comment) = item.comment {
                            write!(self.out, " ({comment})")?;
                        }
                        writeln!(self.out)?;
                    }
                }
                None => writeln!(self.out, "no candidates.")?,
            },
            Command::SetOption { name, value } => match self.host.set_option(id, &name, value) {
                Ok(()) => {
                    let state = if value { "on" } else { "off" };
                    writeln!(self.out, "{name} set {state}")?;
                }
                Err(err) => writeln!(self.err, "cannot set option {name}: {err}")?,
            },
            Command::KeySequence(keys) => match self.host.simulate_key_sequence(id, &keys) {
                Ok(()) => self.print()?,
                Err(err) => {
                    debug!(%err, "key sequence rejected");
                    writeln!(self.err, "Error processing key sequence: {keys}")?;
                }
            },
        }
        Ok(Flow::Continue)
    }

    /// Print commit, status and context of the session. Reading the commit
    /// consumes it.
    pub fn print(&mut self) -> io::Result<()> {
        let commit = commit_proto(&mut self.host, self.session_id);
        let status = status_proto(&self.host, self.session_id);
        let context = context_proto(&self.host, self.session_id);
        match self.format {
            OutputFormat::Text => {
                write!(self.out, "{}", render_commit(&commit))?;
                write!(self.out, "{}", render_status(&status))?;
                write!(self.out, "{}", render_context(&context))?;
            }
            OutputFormat::Json => {
                let snapshot = Snapshot {
                    commit,
                    status,
                    context,
                };
                serde_json::to_writer(&mut self.out, &snapshot)?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }
}
