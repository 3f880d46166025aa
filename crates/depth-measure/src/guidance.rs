//! Distance-band classification for user guidance.

use serde::{Deserialize, Serialize};

/// Distance thresholds delimiting the target band, in meters.
///
/// The target band doubles as the acceptance band for baseline capture:
/// `set_baseline` is honored only while the center distance lies inside
/// it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GuidanceBands {
    /// Below this the camera is too close to the surface.
    pub too_close_m: f32,
    /// Above this the camera is too far from the surface.
    pub too_far_m: f32,
}

impl Default for GuidanceBands {
    fn default() -> Self {
        Self {
            too_close_m: 0.28,
            too_far_m: 0.45,
        }
    }
}

/// User-facing guidance derived from the scan state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Guidance {
    /// Camera closer than the target band; back away.
    MoveBack,
    /// Camera beyond the target band; come closer.
    MoveCloser,
    /// Inside the target band with no baseline committed yet.
    CaptureBaseline,
    /// Inside the target band with a baseline ready.
    IdealDistance,
    /// Center reading invalid or missing this frame.
    NoReading,
    /// The last scan window produced no measurable object.
    ObjectNotDetected,
}

impl GuidanceBands {
    /// Classify a single center-distance reading.
    ///
    /// The three bands partition `[0, inf)` with no gaps; which message
    /// the target band maps to depends only on whether a baseline is
    /// already committed. Callers filter non-finite readings first (the
    /// session reports those as [`Guidance::NoReading`]).
    pub fn classify(&self, distance_m: f32, baseline_set: bool) -> Guidance {
        if distance_m < self.too_close_m {
            Guidance::MoveBack
        } else if distance_m > self.too_far_m {
            Guidance::MoveCloser
        } else if baseline_set {
            Guidance::IdealDistance
        } else {
            Guidance::CaptureBaseline
        }
    }

    /// Whether `distance_m` lies inside the target band.
    pub fn accepts(&self, distance_m: f32) -> bool {
        (self.too_close_m..=self.too_far_m).contains(&distance_m)
    }

    /// Check that the thresholds delimit a non-empty band.
    pub fn is_ordered(&self) -> bool {
        self.too_close_m.is_finite()
            && self.too_far_m.is_finite()
            && 0.0 < self.too_close_m
            && self.too_close_m < self.too_far_m
    }
}
