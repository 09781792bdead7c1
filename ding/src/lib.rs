//! DingTalk custom group robot webhook client.
//!
//! A group robot accepts JSON message envelopes over a webhook URL and
//! answers every POST with an `errcode`/`errmsg` receipt. Three message
//! shapes are supported: plain text, markdown, and link cards; text and
//! markdown messages can mention members or the whole group.
//!
//! The endpoint limits each robot to 20 messages per minute. This crate
//! does not pace requests itself; callers own that policy (see the
//! dispatcher in the `crashnotify` crate).

mod client;
mod error;
mod message;

pub use client::{DEFAULT_ENDPOINT, Robot, RobotClient};
pub use error::RobotError;
pub use message::{At, Message, Receipt};
