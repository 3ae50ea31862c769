//! Endpoint enumeration and name-based resolution.
//!
//! Real endpoints are discovered once at startup and matched by
//! case-sensitive substring rules. The exclude substring keeps the
//! proxy from resolving to its own virtual ports (their names carry
//! a distinguishing tag).

/// A named logical MIDI port at its transport-assigned enumeration index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    pub index: usize,
    pub name: String,
}

/// First candidate (in enumeration order) whose name contains `include`
/// and does not contain `exclude`. Case-sensitive, no secondary sort.
pub fn find_endpoint<'a>(
    candidates: &'a [EndpointInfo],
    include: &str,
    exclude: &str,
) -> Option<&'a EndpointInfo> {
    candidates
        .iter()
        .find(|ep| ep.name.contains(include) && !ep.name.contains(exclude))
}

/// All candidates matching the same include/exclude rules, in
/// enumeration order. Used by the sniffer, which observes every match.
pub fn find_endpoints<'a>(
    candidates: &'a [EndpointInfo],
    include: &str,
    exclude: &str,
) -> Vec<&'a EndpointInfo> {
    candidates
        .iter()
        .filter(|ep| ep.name.contains(include) && !ep.name.contains(exclude))
        .collect()
}

#[cfg(feature = "midi-io")]
pub fn list_sources() -> crate::error::Result<Vec<EndpointInfo>> {
    let midi_in = midir::MidiInput::new("mitmidi-port-scan")?;
    let endpoints = midi_in
        .ports()
        .iter()
        .enumerate()
        .map(|(index, port)| EndpointInfo {
            index,
            name: midi_in
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index)),
        })
        .collect();
    Ok(endpoints)
}

#[cfg(feature = "midi-io")]
pub fn list_destinations() -> crate::error::Result<Vec<EndpointInfo>> {
    let midi_out = midir::MidiOutput::new("mitmidi-port-scan")?;
    let endpoints = midi_out
        .ports()
        .iter()
        .enumerate()
        .map(|(index, port)| EndpointInfo {
            index,
            name: midi_out
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index)),
        })
        .collect();
    Ok(endpoints)
}
