//! Observation-only variant: attach to every matching source and log.
//!
//! A strict reduction of the proxy's direction handling. The same
//! [`RelayHandler`](crate::relay::RelayHandler) does the logging, with
//! a [`NullSink`](crate::relay::NullSink) in place of a forward path.

use crate::endpoint::{self, find_endpoints};
use crate::error::{Error, Result};
use crate::relay::{Direction, NullSink, RelayHandler};
use midir::{Ignore, MidiInput};
use std::io;
use std::thread;
use tracing::{info, warn};

/// Substring rules for picking the sources to observe. The default
/// include matches every port the 01V96 driver publishes.
#[derive(Debug, Clone)]
pub struct SnifferConfig {
    pub include: String,
    pub exclude: String,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            include: "01V96".to_string(),
            exclude: "Proxy".to_string(),
        }
    }
}

/// Connects to all matching sources and blocks for the process
/// lifetime. Per-source connection failures are logged and skipped;
/// zero connected sources is fatal.
pub fn run(config: SnifferConfig) -> Result<()> {
    let sources = endpoint::list_sources()?;
    let matching: Vec<_> = find_endpoints(&sources, &config.include, &config.exclude)
        .into_iter()
        .cloned()
        .collect();

    let mut connections = Vec::new();
    for ep in &matching {
        // `connect` consumes the client, so each source gets its own.
        let mut midi_in = MidiInput::new("mitmidi-sniffer")?;
        midi_in.ignore(Ignore::None);

        let ports = midi_in.ports();
        let Some(port) = ports.get(ep.index) else {
            warn!(name = %ep.name, "source disappeared during setup; skipping");
            continue;
        };

        let handler = RelayHandler::new(Direction::Observe, NullSink, io::stdout());
        match midi_in.connect(
            port,
            "mitmidi-sniff",
            move |_timestamp, message, handler: &mut RelayHandler<NullSink, io::Stdout>| {
                handler.handle_batch(&[message.to_vec()]);
            },
            handler,
        ) {
            Ok(conn) => {
                info!(name = %ep.name, "observing source");
                connections.push(conn);
            }
            Err(e) => {
                warn!(name = %ep.name, error = %e, "failed to connect; skipping");
            }
        }
    }

    if connections.is_empty() {
        return Err(Error::NoSourcesConnected);
    }

    info!(count = connections.len(), "sniffer running; terminate the process to stop");

    loop {
        thread::park();
    }
}
