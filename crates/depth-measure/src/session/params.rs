use depth_measure_core::{RoiBounds, SampleError};
use serde::{Deserialize, Serialize};

use crate::compare::CompareParams;
use crate::guidance::GuidanceBands;

fn default_frames_per_window() -> usize {
    12
}

/// Full pipeline configuration.
///
/// All thresholds are tunable; the defaults carry the reference values
/// for a close-range scan of a small object on a flat surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanParams {
    /// Region of the depth grid sampled each frame.
    #[serde(default)]
    pub roi: RoiBounds,
    /// Frames accumulated per averaging window.
    #[serde(default = "default_frames_per_window")]
    pub frames_per_window: usize,
    #[serde(default)]
    pub guidance: GuidanceBands,
    #[serde(default)]
    pub compare: CompareParams,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            roi: RoiBounds::default(),
            frames_per_window: default_frames_per_window(),
            guidance: GuidanceBands::default(),
            compare: CompareParams::default(),
        }
    }
}

/// Errors detected when validating a configuration.
#[derive(thiserror::Error, Debug)]
pub enum ScanConfigError {
    #[error(transparent)]
    Roi(#[from] SampleError),
    #[error("guidance bands out of order: too_close {too_close_m} / too_far {too_far_m}")]
    InvalidBands { too_close_m: f32, too_far_m: f32 },
    #[error("averaging window must hold at least one frame")]
    EmptyWindow,
}

impl ScanParams {
    /// Validate the configuration once, before any frame is processed.
    pub fn validate(&self) -> Result<(), ScanConfigError> {
        self.roi.validate()?;
        if !self.guidance.is_ordered() {
            return Err(ScanConfigError::InvalidBands {
                too_close_m: self.guidance.too_close_m,
                too_far_m: self.guidance.too_far_m,
            });
        }
        if self.frames_per_window == 0 {
            return Err(ScanConfigError::EmptyWindow);
        }
        Ok(())
    }
}
