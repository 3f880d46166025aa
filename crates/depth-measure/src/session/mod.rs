//! Frame-driven scan session.
//!
//! This module wires together ROI sampling, temporal averaging, baseline
//! differencing, and area estimation behind a single state machine that
//! consumes one depth frame at a time and emits discrete update messages
//! to the presentation layer.

mod params;
mod phase;
mod pipeline;
mod update;

pub use params::{ScanConfigError, ScanParams};
pub use phase::ScanPhase;
pub use pipeline::{ScanSession, ScanTelemetry};
pub use update::ScanUpdate;
