//! Event decoding and crash classification.
//!
//! Turns a raw protocol [`Frame`] into a decision: ignore and acknowledge,
//! or alert on an unexpected exit.

mod error;

pub use error::ClassifyError;

use std::collections::HashMap;

use tracing::debug;

use crate::protocol::Frame;

/// Event kinds the listener distinguishes.
///
/// Only exit transitions are acted upon; every other kind is consumed and
/// acknowledged without structural payload parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ProcessStateExited,
    Other,
}

impl EventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "PROCESS_STATE_EXITED" => Self::ProcessStateExited,
            _ => Self::Other,
        }
    }
}

/// Decoded payload of a `PROCESS_STATE_EXITED` event.
#[derive(Debug, Clone)]
pub struct ExitedEvent {
    pub processname: String,
    pub groupname: String,
    pub pid: String,
    pub from_state: String,
    /// Non-zero when the exit code was among the process's configured
    /// expected exit codes.
    pub expected: i64,
}

fn take(fields: &mut HashMap<String, String>, name: &'static str) -> Result<String, ClassifyError> {
    fields.remove(name).ok_or(ClassifyError::MissingField { name })
}

impl ExitedEvent {
    /// Decodes the structured payload of an exit event.
    ///
    /// `groupname` is tolerated as absent; the remaining fields are part
    /// of the protocol contract and their absence is fatal.
    pub fn decode(frame: &Frame) -> Result<Self, ClassifyError> {
        let mut fields = frame.payload_fields()?;

        let expected_raw = take(&mut fields, "expected")?;
        let expected = expected_raw.parse::<i64>().map_err(|_| ClassifyError::BadInteger {
            name: "expected",
            value: expected_raw.clone(),
        })?;

        Ok(Self {
            processname: take(&mut fields, "processname")?,
            groupname: fields.remove("groupname").unwrap_or_default(),
            pid: take(&mut fields, "pid")?,
            from_state: take(&mut fields, "from_state")?,
            expected,
        })
    }

    pub fn is_expected(&self) -> bool {
        self.expected != 0
    }
}

/// Process-name filter from the `-p`/`-a` configuration surface.
///
/// A filter entry is either a bare process name or `group:name` for a
/// process inside a group. An empty list watches everything; `any`
/// overrides the list.
#[derive(Debug, Clone, Default)]
pub struct ProcessFilter {
    pub programs: Vec<String>,
    pub any: bool,
}

impl ProcessFilter {
    pub fn new(programs: Vec<String>, any: bool) -> Self {
        Self { programs, any }
    }

    pub fn matches(&self, event: &ExitedEvent) -> bool {
        if self.any || self.programs.is_empty() {
            return true;
        }
        let qualified = format!("{}:{}", event.groupname, event.processname);
        self.programs.iter().any(|p| *p == event.processname || *p == qualified)
    }
}

/// Outcome of classifying one frame.
#[derive(Debug)]
pub enum Classification {
    /// Acknowledge and move on.
    Ignore,
    /// Unexpected exit worth alerting on.
    Alert(ExitedEvent),
}

/// Decides whether a frame represents an unexpected termination.
///
/// Two short-circuit checkpoints before any alerting: the event kind,
/// then the exit disposition. The process filter is applied last so that
/// a malformed exit payload is still detected even for unwatched
/// processes.
pub fn classify(frame: &Frame, filter: &ProcessFilter) -> Result<Classification, ClassifyError> {
    if EventKind::from_name(frame.event_name()) != EventKind::ProcessStateExited {
        debug!(eventname = frame.event_name(), "ignoring event kind");
        return Ok(Classification::Ignore);
    }

    let event = ExitedEvent::decode(frame)?;

    if event.is_expected() {
        debug!(processname = %event.processname, "exit was expected, ignoring");
        return Ok(Classification::Ignore);
    }

    if !filter.matches(&event) {
        debug!(processname = %event.processname, "process not watched, ignoring");
        return Ok(Classification::Ignore);
    }

    Ok(Classification::Alert(event))
}
