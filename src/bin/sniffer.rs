//! Observation-only binary: log traffic from every matching source.

use mitmidi::{endpoint, sniffer, SnifferConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("MIDI sniffer");
    match endpoint::list_sources() {
        Ok(sources) => {
            println!("Sources:");
            for ep in &sources {
                println!("  [{}] {}", ep.index, ep.name);
            }
            println!();
        }
        Err(e) => {
            error!(error = %e, "could not enumerate MIDI sources");
            std::process::exit(1);
        }
    }

    if let Err(e) = sniffer::run(SnifferConfig::default()) {
        error!(error = %e, "sniffer startup failed");
        std::process::exit(1);
    }
}
