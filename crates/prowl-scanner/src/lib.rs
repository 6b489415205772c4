/// The in-page probe JavaScript implementation.
/// Backends inject this into browser contexts and call
/// `window.Prowl.process(request)` with a serialized ProbeRequest.
pub const PROBE_JS: &str = include_str!("probe.js");
