//! Message relay: per-direction logging and verbatim forwarding.
//!
//! Each direction is served by one worker thread that drains a
//! `crossbeam-channel` of batches and pushes them, unaltered, into the
//! direction's [`MessageSink`]. The two directions share nothing
//! mutable, so interleaving between them is never coordinated.

use crate::error::Result;
use crossbeam_channel::Receiver;
use std::io::Write;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Raw message bytes, passed through verbatim.
pub type Message = Vec<u8>;

/// An atomically-delivered, ordered group of messages. The hardware
/// transport delivers single-message batches; the relay handles any
/// batch size the same way.
pub type Batch = Vec<Message>;

/// Emphasis line emitted after a batch containing a bulk-request sysex.
pub const BULK_REQUEST_HIGHLIGHT: &str = "⚡⚡⚡ BULK REQUEST DETECTED ABOVE! ⚡⚡⚡";

const SYSEX_START: u8 = 0xF0;
const BULK_REQUEST_BYTE: u8 = 0x0E;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Controlling application toward the real device.
    SubjectToTarget,
    /// Real device back toward the controlling application.
    TargetToSubject,
    /// Observation only (sniffer); no counterpart endpoint.
    Observe,
}

impl Direction {
    pub fn tag(self) -> &'static str {
        match self {
            Direction::SubjectToTarget => "SM→MIXER",
            Direction::TargetToSubject => "MIXER→SM",
            Direction::Observe => "MIDI",
        }
    }

    fn thread_name(self) -> &'static str {
        match self {
            Direction::SubjectToTarget => "relay-sm-to-mixer",
            Direction::TargetToSubject => "relay-mixer-to-sm",
            Direction::Observe => "relay-observe",
        }
    }
}

/// `F0` at offset 0 and `0E` at offset 4 marks the console's
/// bulk-request sysex. The `0E` discriminator is kept as an opaque
/// constant; it is only ever used for log emphasis.
pub fn is_bulk_request(message: &[u8]) -> bool {
    message.len() > 4 && message[0] == SYSEX_START && message[4] == BULK_REQUEST_BYTE
}

/// Uppercase hex, space-separated: `F0 43 10 3E 0E F7`.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Where a direction's messages go. Implemented by the hardware output
/// connection in production and by buffers in tests.
pub trait MessageSink: Send {
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

#[cfg(feature = "midi-io")]
impl MessageSink for midir::MidiOutputConnection {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        midir::MidiOutputConnection::send(self, message).map_err(Into::into)
    }
}

/// Sink for observation-only mode; accepts and discards every message.
pub struct NullSink;

impl MessageSink for NullSink {
    fn send(&mut self, _message: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// One direction of the relay: owns its sink and its diagnostic stream,
/// touches nothing else.
pub struct RelayHandler<S, W> {
    direction: Direction,
    sink: S,
    log: W,
}

impl<S: MessageSink, W: Write> RelayHandler<S, W> {
    pub fn new(direction: Direction, sink: S, log: W) -> Self {
        Self {
            direction,
            sink,
            log,
        }
    }

    /// Logs every message in the batch in order, emits the highlight
    /// line if any message is a bulk request, then forwards the batch
    /// verbatim. A failed forward is logged and dropped; the handler
    /// always returns.
    pub fn handle_batch(&mut self, batch: &[Message]) {
        let tag = self.direction.tag();

        let mut marked = false;
        for message in batch {
            let _ = writeln!(self.log, "{}: {}", tag, format_hex(message));
            if is_bulk_request(message) {
                marked = true;
            }
        }
        if marked {
            let _ = writeln!(self.log, "{}", BULK_REQUEST_HIGHLIGHT);
        }
        let _ = self.log.flush();

        for message in batch {
            if let Err(e) = self.sink.send(message) {
                warn!(direction = tag, error = %e, "forward failed; message dropped");
            }
        }
    }
}

/// Spawns the worker thread for one direction. The thread drains
/// `batches` until every sender is dropped, then exits.
pub fn spawn_relay<S, W>(
    direction: Direction,
    sink: S,
    log: W,
    batches: Receiver<Batch>,
) -> JoinHandle<()>
where
    S: MessageSink + 'static,
    W: Write + Send + 'static,
{
    thread::Builder::new()
        .name(direction.thread_name().to_string())
        .spawn(move || {
            let mut handler = RelayHandler::new(direction, sink, log);
            for batch in batches {
                handler.handle_batch(&batch);
            }
            debug!(direction = direction.tag(), "relay channel closed");
        })
        .expect("Failed to spawn relay thread")
}
