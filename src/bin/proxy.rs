//! Man-in-the-middle proxy binary.
//!
//! Publishes the virtual endpoint pair, relays both directions, and
//! logs every message to stdout until the process is terminated.

use mitmidi::{endpoint, proxy, ProxyConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn print_ports() -> mitmidi::Result<()> {
    println!("Sources:");
    for ep in endpoint::list_sources()? {
        println!("  [{}] {}", ep.index, ep.name);
    }
    println!("Destinations:");
    for ep in endpoint::list_destinations()? {
        println!("  [{}] {}", ep.index, ep.name);
    }
    Ok(())
}

fn main() {
    // Diagnostics go to stderr; stdout carries the relayed traffic.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ProxyConfig::default();

    println!("MIDI man-in-the-middle proxy");
    println!("  point the subject's OUTPUT at '{}'", config.virtual_in_name);
    println!("  point the subject's INPUT  at '{}'", config.virtual_out_name);
    println!();

    if let Err(e) = print_ports() {
        error!(error = %e, "could not enumerate MIDI ports");
        std::process::exit(1);
    }
    println!();

    if let Err(e) = proxy::run(config) {
        error!(error = %e, "proxy startup failed");
        std::process::exit(1);
    }
}
