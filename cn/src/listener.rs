//! The read-classify-notify-acknowledge run loop.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{info, warn};

use crate::alert::compose;
use crate::event::{Classification, ClassifyError, ProcessFilter, classify};
use crate::host;
use crate::notify::Dispatcher;
use crate::protocol::{EventStream, ProtocolError, RESULT_OK};

/// Fatal run-loop failures. Delivery problems never appear here; they are
/// downgraded to warnings inside the loop.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// The event listener: owns the transport and the dispatcher and drives
/// the half-duplex exchange with the parent until the stream closes.
pub struct Listener<R, W> {
    transport: EventStream<R, W>,
    filter: ProcessFilter,
    subject_prefix: Option<String>,
    hostname: String,
    dispatcher: Dispatcher,
}

impl<R, W> Listener<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        transport: EventStream<R, W>,
        filter: ProcessFilter,
        subject_prefix: Option<String>,
        hostname: String,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            transport,
            filter,
            subject_prefix,
            hostname,
            dispatcher,
        }
    }

    /// Processes frames until the stream closes.
    ///
    /// Every frame is acknowledged exactly once, after any dispatch
    /// attempt has finished; only the rate-limit cooldown may delay the
    /// acknowledgement. Returns `Ok(())` on clean EOF.
    pub async fn run(&mut self) -> Result<(), ListenerError> {
        loop {
            self.transport.signal_ready().await?;

            let Some(frame) = self.transport.next_frame().await? else {
                info!("event stream closed, shutting down");
                return Ok(());
            };

            match classify(&frame, &self.filter)? {
                Classification::Ignore => {}
                Classification::Alert(event) => {
                    info!(
                        processname = %event.processname,
                        pid = %event.pid,
                        "unexpected process exit detected, sending notification"
                    );

                    let alert = compose(
                        &self.hostname,
                        &event.processname,
                        &event.pid,
                        &event.from_state,
                        &host::asctime_now(),
                        self.subject_prefix.as_deref(),
                    );

                    let result = self.dispatcher.dispatch(&alert).await;
                    if !result.delivered {
                        warn!(
                            error = ?result.error,
                            processname = %event.processname,
                            "alert was not delivered"
                        );
                    }
                }
            }

            self.transport.acknowledge(RESULT_OK).await?;
        }
    }
}
