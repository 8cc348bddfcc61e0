//! Last-selection-wins sequencing for on-demand loads.
//!
//! Every request gets a ticket. Issuing a new one supersedes the previous
//! ticket, so a result arriving late for an older selection is dropped
//! instead of overwriting the newer one.

use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A file the caller should load and hand back with its ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: Ticket,
    pub key: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct LoadGate {
    issued: u64,
    pending: Option<Ticket>,
}

impl LoadGate {
    pub fn issue(&mut self, key: impl Into<String>, path: PathBuf) -> LoadRequest {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        if let Some(old) = self.pending.replace(ticket) {
            debug!(superseded = old.0, by = ticket.0, "load superseded");
        }
        LoadRequest {
            ticket,
            key: key.into(),
            path,
        }
    }

    /// Accept `ticket` if it is the one still pending; clears the pending
    /// slot on success.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
