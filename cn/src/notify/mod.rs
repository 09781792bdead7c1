//! Rate-limited webhook dispatch.
//!
//! One dispatcher object owns the webhook client and the rate-window
//! counters; it is constructed once at startup and handed to the run
//! loop. Dispatch is serialized by the half-duplex protocol, so the
//! window state needs no locking.

use std::sync::Arc;
use std::time::Duration;

use dingrobot::{Message, Robot, RobotError};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::alert::AlertMessage;

/// Delivery rate accepted by the webhook endpoint.
#[derive(Debug, Clone)]
pub struct RatePolicy {
    /// Deliveries allowed per window. Zero disables throttling.
    pub max_per_window: u32,

    /// Length of the rolling window.
    pub window: Duration,
}

impl Default for RatePolicy {
    fn default() -> Self {
        // DingTalk caps each robot at 20 messages per minute.
        Self {
            max_per_window: 20,
            window: Duration::from_secs(60),
        }
    }
}

/// Sliding-window counters owned by the dispatcher.
#[derive(Debug)]
struct RateWindow {
    sent_count: u64,
    window_start: Instant,
}

/// Failure classification of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorKind {
    /// Connection refused, reset, or timed out.
    Network,
    /// Response body was not the expected receipt envelope.
    MalformedResponse,
    /// The endpoint accepted the request but reported a non-zero error
    /// code.
    Application,
    /// The message failed local validation before any network call.
    InvalidMessage,
}

/// Outcome of [`Dispatcher::dispatch`]. Never an `Err`: delivery failures
/// must not block acknowledgement of the supervision event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryResult {
    pub delivered: bool,
    pub error: Option<DeliveryErrorKind>,
}

impl DeliveryResult {
    fn ok() -> Self {
        Self {
            delivered: true,
            error: None,
        }
    }

    fn failed(kind: DeliveryErrorKind) -> Self {
        Self {
            delivered: false,
            error: Some(kind),
        }
    }
}

/// Delivers alerts to one webhook endpoint under the endpoint's rate
/// policy.
pub struct Dispatcher {
    robot: Arc<dyn Robot>,
    policy: RatePolicy,
    window: RateWindow,
}

impl Dispatcher {
    pub fn new(robot: Arc<dyn Robot>, policy: RatePolicy) -> Self {
        Self {
            robot,
            policy,
            window: RateWindow {
                sent_count: 0,
                window_start: Instant::now(),
            },
        }
    }

    /// Sleeps out the remainder of the rate window when the send count
    /// reaches a multiple of the endpoint's limit. Stalling the listener
    /// is preferred over dropping or buffering alerts.
    async fn throttle(&mut self) {
        self.window.sent_count += 1;
        if self.policy.max_per_window == 0 {
            return;
        }
        if self.window.sent_count % u64::from(self.policy.max_per_window) == 0 {
            let elapsed = self.window.window_start.elapsed();
            if elapsed < self.policy.window {
                let wait = self.policy.window - elapsed;
                warn!(wait_ms = wait.as_millis() as u64, "delivery rate limit reached, cooling down");
                tokio::time::sleep(wait).await;
            }
            self.window.window_start = Instant::now();
        }
    }

    /// Delivers one alert as a markdown message mentioning everyone.
    ///
    /// On an application-level rejection a single plain-text escalation
    /// is attempted; its own outcome is only logged, never escalated
    /// further.
    pub async fn dispatch(&mut self, alert: &AlertMessage) -> DeliveryResult {
        self.throttle().await;

        let message = Message::markdown(&alert.subject, &alert.body).at_all();
        match self.robot.send(&message).await {
            Ok(()) => {
                debug!(subject = %alert.subject, "alert delivered");
                DeliveryResult::ok()
            }
            Err(RobotError::Application { code, message: errmsg }) => {
                warn!(code, error = %errmsg, "endpoint rejected alert, escalating as plain text");
                let fallback = Message::text(format!("Robot message delivery failed: {errmsg}")).at_all();
                if let Err(e) = self.robot.send(&fallback).await {
                    warn!(error = %e, "escalation fallback failed");
                }
                DeliveryResult::failed(DeliveryErrorKind::Application)
            }
            Err(e @ RobotError::Network(_)) => {
                warn!(error = %e, "alert delivery failed");
                DeliveryResult::failed(DeliveryErrorKind::Network)
            }
            Err(e @ RobotError::MalformedResponse { .. }) => {
                warn!(error = %e, "endpoint response was not a valid receipt");
                DeliveryResult::failed(DeliveryErrorKind::MalformedResponse)
            }
            Err(e @ RobotError::InvalidMessage(_)) => {
                warn!(error = %e, "alert message failed validation");
                DeliveryResult::failed(DeliveryErrorKind::InvalidMessage)
            }
        }
    }
}
