use crate::area::MeasurementResult;
use crate::guidance::Guidance;
use crate::session::phase::ScanPhase;

/// Discrete state-change message for the presentation layer.
///
/// Every mutating session call returns the batch of updates it produced,
/// by value. The presentation layer runs in a different execution
/// context, so nothing is shared mutably across the boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanUpdate {
    Phase(ScanPhase),
    Guidance(Guidance),
    Measurement(MeasurementResult),
    /// Request to the illumination collaborator: ON while a scan is in
    /// progress, OFF once the measurement is complete.
    Illumination { on: bool },
}
