//! Transparent man-in-the-middle relay for MIDI device-control traffic.
//!
//! Sits between a controlling application (the subject) and a real
//! hardware device (the target), presenting a virtual endpoint pair to
//! the subject while forwarding every message in both directions
//! byte-for-byte and logging it as hex. An observation-only sniffer
//! mode reuses the same relay primitives without a forward path.
//!
//! Hardware I/O (port enumeration, virtual ports) requires the
//! `midi-io` feature (enabled by default); the resolver and relay core
//! are testable without it.

pub mod error;
pub use error::{Error, Result};

pub mod endpoint;
pub use endpoint::{find_endpoint, find_endpoints, EndpointInfo};

pub mod relay;
pub use relay::{
    format_hex, is_bulk_request, spawn_relay, Batch, Direction, Message, MessageSink, NullSink,
    RelayHandler, BULK_REQUEST_HIGHLIGHT,
};

#[cfg(feature = "midi-io")]
pub mod proxy;
#[cfg(feature = "midi-io")]
pub use proxy::ProxyConfig;

#[cfg(feature = "midi-io")]
pub mod sniffer;
#[cfg(feature = "midi-io")]
pub use sniffer::SnifferConfig;
