use serde::{Deserialize, Serialize};

/// Authoritative pipeline phase.
///
/// Owned by [`ScanSession`](super::ScanSession); all transitions happen
/// inside its trigger methods or on accumulation-window completion.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ScanPhase {
    /// Waiting for the user to start a baseline capture.
    Idle,
    /// Accumulating empty-surface frames.
    CapturingBaseline,
    /// Baseline committed; ready to scan the object.
    BaselineReady,
    /// Accumulating frames with the object in place.
    ScanningObject,
    /// Measurement produced; terminal until reset.
    Completed,
}

impl ScanPhase {
    /// Phases in which incoming frames feed the accumulation window.
    pub fn is_accumulating(self) -> bool {
        matches!(self, ScanPhase::CapturingBaseline | ScanPhase::ScanningObject)
    }
}
