//! Man-in-the-middle proxy: virtual endpoint pair, routing setup, run loop.
//!
//! The proxy publishes two virtual ports the controlling application
//! wires itself to, resolves the real device among the hardware ports,
//! and relays every message in both directions unchanged:
//!
//! ```text
//! subject → "… Proxy IN" → relay → real destination   (Direction A)
//! real source → relay → "… Proxy OUT" → subject       (Direction B)
//! ```
//!
//! Routing is fixed before any callback can fire; after setup nothing
//! is reassigned and the two directions share no mutable state.

use crate::endpoint::{self, find_endpoint};
use crate::error::{Error, Result};
use crate::relay::{spawn_relay, Batch, Direction};
use crossbeam_channel::{bounded, Sender};
use midir::os::unix::{VirtualInput, VirtualOutput};
use midir::{Ignore, MidiInput, MidiOutput};
use std::io;
use std::thread;
use tracing::{info, warn};

/// Headroom for bursts while a worker is inside a slow forward call.
const BATCH_CHANNEL_CAPACITY: usize = 1024;

/// Substring rules for resolving the real device, plus the names the
/// proxy publishes its own ports under. The defaults match a Yamaha
/// 01V96 driver; the exclude substring must appear in both virtual
/// port names so the resolver never picks the proxy itself.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub include: String,
    pub exclude: String,
    pub virtual_in_name: String,
    pub virtual_out_name: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            include: "Port1".to_string(),
            exclude: "Proxy".to_string(),
            virtual_in_name: "01V96 Proxy IN".to_string(),
            virtual_out_name: "01V96 Proxy OUT".to_string(),
        }
    }
}

fn deliver(tx: &Sender<Batch>, message: &[u8]) {
    // Transport callback context: hand off and return immediately.
    if tx.send(vec![message.to_vec()]).is_err() {
        warn!("relay worker gone; message dropped");
    }
}

/// Sets up both directions and then blocks for the process lifetime.
///
/// Fatal errors (no real device, virtual port creation failure) are
/// returned before the steady state is entered; once this function
/// blocks, the proxy runs until the process is externally terminated.
pub fn run(config: ProxyConfig) -> Result<()> {
    // Both directions must resolve before anything is created; partial
    // setup is treated as fatal.
    let destinations = endpoint::list_destinations()?;
    let target_dest = find_endpoint(&destinations, &config.include, &config.exclude)
        .cloned()
        .ok_or_else(|| Error::EndpointNotFound {
            include: config.include.clone(),
            exclude: config.exclude.clone(),
        })?;
    info!(name = %target_dest.name, "resolved real device destination");

    let sources = endpoint::list_sources()?;
    let target_src = find_endpoint(&sources, &config.include, &config.exclude)
        .cloned()
        .ok_or_else(|| Error::EndpointNotFound {
            include: config.include.clone(),
            exclude: config.exclude.clone(),
        })?;
    info!(name = %target_src.name, "resolved real device source");

    // Owned output channel to the target.
    let midi_out = MidiOutput::new("mitmidi-proxy")?;
    let out_ports = midi_out.ports();
    let out_port = out_ports.get(target_dest.index).ok_or_else(|| {
        Error::MidiDevice(format!(
            "destination {} disappeared during setup",
            target_dest.name
        ))
    })?;
    let to_target = midi_out.connect(out_port, "mitmidi-to-target")?;

    // Subject-facing virtual source; the proxy is its only writer.
    let virtual_out = MidiOutput::new("mitmidi-proxy-out")?;
    let to_subject = virtual_out.create_virtual(&config.virtual_out_name)?;
    info!(name = %config.virtual_out_name, "created virtual source");

    // One worker per direction, each owning its output connection.
    let (a_tx, a_rx) = bounded::<Batch>(BATCH_CHANNEL_CAPACITY);
    let (b_tx, b_rx) = bounded::<Batch>(BATCH_CHANNEL_CAPACITY);
    let _worker_a = spawn_relay(Direction::SubjectToTarget, to_target, io::stdout(), a_rx);
    let _worker_b = spawn_relay(Direction::TargetToSubject, to_subject, io::stdout(), b_rx);

    // Subject-facing virtual destination; its callback feeds Direction A.
    let mut virtual_in = MidiInput::new("mitmidi-proxy-in")?;
    virtual_in.ignore(Ignore::None);
    let _from_subject = virtual_in.create_virtual(
        &config.virtual_in_name,
        move |_timestamp, message, tx| deliver(tx, message),
        a_tx,
    )?;
    info!(name = %config.virtual_in_name, "created virtual destination");

    // Listen to the real device; its callback feeds Direction B.
    let mut real_in = MidiInput::new("mitmidi-proxy-listen")?;
    real_in.ignore(Ignore::None);
    let in_ports = real_in.ports();
    let in_port = in_ports.get(target_src.index).ok_or_else(|| {
        Error::MidiDevice(format!("source {} disappeared during setup", target_src.name))
    })?;
    let _from_target = real_in.connect(
        in_port,
        "mitmidi-from-target",
        move |_timestamp, message, tx| deliver(tx, message),
        b_tx,
    )?;
    info!(name = %target_src.name, "listening to real device source");

    info!("proxy running; terminate the process to stop");

    // No shutdown protocol: the connections held above live as long as
    // this frame, and the transport keeps invoking the callbacks.
    loop {
        thread::park();
    }
}
