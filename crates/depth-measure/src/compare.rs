//! Baseline-vs-live differencing and object-mask selection.
//!
//! Works entirely in sensor units (meters). Physical area and height
//! conversion happens downstream in [`crate::area`].

use serde::{Deserialize, Serialize};

/// Tunables for object detection in the difference map.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CompareParams {
    /// Differences below this are surface micro-roughness, meters.
    pub noise_floor_m: f32,
    /// Mask threshold as a fraction of the tallest difference.
    ///
    /// Scales the mask to the object's own height, so a flat low object
    /// is not drowned out by the threshold tuned for a tall one.
    pub mask_rel_frac: f32,
    /// Absolute minimum height for a position to count as object, meters.
    pub min_height_m: f32,
    /// Minimum number of masked positions for a credible object.
    ///
    /// Guards against isolated sensor spikes being reported as a
    /// measurement.
    pub min_mask_pixels: usize,
}

impl Default for CompareParams {
    fn default() -> Self {
        Self {
            noise_floor_m: 0.005,
            mask_rel_frac: 0.4,
            min_height_m: 0.009,
            min_mask_pixels: 60,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    #[error("baseline holds {baseline} samples, live map holds {live}")]
    LengthMismatch { baseline: usize, live: usize },
    #[error("no object above the surface (mask {pixels} px, need {min_pixels})")]
    ObjectNotDetected { pixels: usize, min_pixels: usize },
}

/// One position selected into the object mask.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskedPoint {
    /// Position in the flattened ROI sample order.
    pub index: usize,
    /// Height above the baseline surface, meters.
    pub height_m: f32,
    /// Averaged live depth at this position, meters.
    pub depth_m: f32,
}

/// Object mask plus summary statistics, in sensor units.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectStats {
    pub points: Vec<MaskedPoint>,
    /// Tallest difference surviving the noise floor, meters.
    pub max_height_m: f32,
}

/// Difference a live averaged map against the baseline and select the
/// object mask.
///
/// Positions whose difference is non-finite or below the noise floor are
/// discarded, then the adaptive threshold
/// `max(mask_rel_frac * max_d, min_height_m)` selects the mask. The
/// result does not depend on iteration order: only the maximum and the
/// mask count feed the decisions.
pub fn compare(
    baseline: &[f32],
    live: &[f32],
    params: &CompareParams,
) -> Result<ObjectStats, CompareError> {
    if baseline.len() != live.len() {
        return Err(CompareError::LengthMismatch {
            baseline: baseline.len(),
            live: live.len(),
        });
    }

    let mut max_d = 0.0f32;
    let mut survivors = 0usize;
    for (&b, &l) in baseline.iter().zip(live) {
        let d = b - l;
        if !d.is_finite() || d < params.noise_floor_m {
            continue;
        }
        survivors += 1;
        if d > max_d {
            max_d = d;
        }
    }
    if survivors == 0 {
        return Err(CompareError::ObjectNotDetected {
            pixels: 0,
            min_pixels: params.min_mask_pixels,
        });
    }

    let threshold = (params.mask_rel_frac * max_d).max(params.min_height_m);
    let mut points = Vec::new();
    for (index, (&b, &l)) in baseline.iter().zip(live).enumerate() {
        let d = b - l;
        if !d.is_finite() || d < params.noise_floor_m || d <= threshold {
            continue;
        }
        points.push(MaskedPoint {
            index,
            height_m: d,
            depth_m: l,
        });
    }

    if points.len() < params.min_mask_pixels {
        return Err(CompareError::ObjectNotDetected {
            pixels: points.len(),
            min_pixels: params.min_mask_pixels,
        });
    }

    Ok(ObjectStats {
        points,
        max_height_m: max_d,
    })
}
