//! Event-stream transport: the READY / frame / RESULT exchange.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::trace;

use super::error::ProtocolError;
use super::frame::{Frame, parse_fields};

/// Readiness token announced before each frame read.
pub const READY_TOKEN: &[u8] = b"READY\n";

/// Result body acknowledging successful processing.
pub const RESULT_OK: &str = "OK";

/// Framed transport over the inbound event channel and the outbound
/// acknowledgement channel.
pub struct EventStream<R, W> {
    reader: R,
    writer: W,
}

impl EventStream<BufReader<Stdin>, Stdout> {
    /// Production wiring over the process's own stdio, the channel pair a
    /// supervisor hands its event listeners.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> EventStream<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Tells the parent a new frame may be sent.
    pub async fn signal_ready(&mut self) -> Result<(), ProtocolError> {
        self.writer.write_all(READY_TOKEN).await?;
        // The parent blocks on this token; an unflushed buffer deadlocks
        // both processes.
        self.writer.flush().await?;
        Ok(())
    }

    /// Reads one complete frame.
    ///
    /// Returns `Ok(None)` when the stream closes cleanly at a frame
    /// boundary. The declared payload is consumed in full even when the
    /// caller will ignore the event, keeping the stream framing intact.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>, ProtocolError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        if !line.ends_with('\n') {
            return Err(ProtocolError::UnterminatedHeader);
        }

        let header = parse_fields(line.trim_end_matches('\n'))?;

        let len = match header.get("len") {
            Some(value) => value.parse::<usize>().map_err(|_| ProtocolError::BadLength {
                value: value.clone(),
            })?,
            None => 0,
        };

        let mut payload = vec![0u8; len];
        if len > 0 {
            self.reader.read_exact(&mut payload).await.map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => ProtocolError::TruncatedPayload { expected: len },
                _ => ProtocolError::Io(e),
            })?;
        }

        trace!(
            eventname = header.get("eventname").map(String::as_str).unwrap_or(""),
            len,
            "frame received"
        );
        Ok(Some(Frame { header, payload }))
    }

    /// Writes the result frame for the frame just processed.
    ///
    /// The body is always [`RESULT_OK`] in practice: the listener's own
    /// failures are never surfaced as protocol-level failures.
    pub async fn acknowledge(&mut self, body: &str) -> Result<(), ProtocolError> {
        let result = format!("RESULT {}\n{}", body.len(), body);
        self.writer.write_all(result.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
