//! crashnotify - supervisor crash notification event listener
//!
//! A supervisor event listener subscribed to `PROCESS_STATE_EXITED`
//! events. When a child of the supervising process manager transitions to
//! EXITED unexpectedly, it relays an alert to a DingTalk group robot
//! webhook.
//!
//! The listener speaks the half-duplex READY/RESULT event protocol on
//! stdin/stdout; stderr carries diagnostics only. Every received frame is
//! acknowledged exactly once, whatever happens on the notification path.
//!
//! # Modules
//!
//! - [`protocol`] - framed READY/RESULT event-stream transport
//! - [`event`] - event decoding and crash classification
//! - [`alert`] - alert message composition
//! - [`notify`] - rate-limited webhook dispatch
//! - [`listener`] - the read-classify-notify-acknowledge run loop
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod alert;
pub mod cli;
pub mod config;
pub mod event;
pub mod host;
pub mod listener;
pub mod notify;
pub mod protocol;

// Re-export commonly used types
pub use alert::{AlertMessage, compose};
pub use config::Config;
pub use event::{Classification, ClassifyError, EventKind, ExitedEvent, ProcessFilter, classify};
pub use listener::{Listener, ListenerError};
pub use notify::{DeliveryErrorKind, DeliveryResult, Dispatcher, RatePolicy};
pub use protocol::{EventStream, Frame, ProtocolError, READY_TOKEN, RESULT_OK};
