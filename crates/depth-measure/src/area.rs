//! Physical area and height estimation from the object mask.

use depth_measure_core::CameraIntrinsics;
use serde::{Deserialize, Serialize};

use crate::compare::ObjectStats;

#[derive(thiserror::Error, Debug)]
pub enum EstimateError {
    #[error("focal lengths are unusable (fx={fx}, fy={fy})")]
    InvalidIntrinsics { fx: f32, fy: f32 },
    #[error("object mask is empty")]
    EmptyMask,
}

/// Final measurement summary handed to the presentation layer.
///
/// Immutable value type; produced once per completed scan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Footprint area, square centimeters. Never negative.
    pub area_cm2: f32,
    /// Tallest point above the baseline, millimeters.
    pub max_height_mm: f32,
    /// Mean height across the object mask, millimeters.
    pub mean_height_mm: f32,
    /// Number of samples in the object mask.
    pub pixel_count: usize,
}

/// Estimate the physical footprint and height of the masked object.
///
/// Each masked sample is projected through the pinhole model at its own
/// live depth: one sample at depth `z` covers `(z/fx) * (z/fy)` square
/// meters on the surface. Summing per sample keeps the estimate correct
/// when depth varies across the object (tilted or curved tops), unlike a
/// single global footprint.
pub fn estimate(
    stats: &ObjectStats,
    intrinsics: &CameraIntrinsics,
) -> Result<MeasurementResult, EstimateError> {
    check_intrinsics(intrinsics)?;
    if stats.points.is_empty() {
        return Err(EstimateError::EmptyMask);
    }

    let fx = f64::from(intrinsics.fx);
    let fy = f64::from(intrinsics.fy);
    let mut area_m2 = 0.0f64;
    let mut height_sum = 0.0f64;
    for p in &stats.points {
        let z = f64::from(p.depth_m);
        area_m2 += (z / fx) * (z / fy);
        height_sum += f64::from(p.height_m);
    }
    let mean_height_m = height_sum / stats.points.len() as f64;

    Ok(MeasurementResult {
        area_cm2: (area_m2 * 10_000.0) as f32,
        max_height_mm: stats.max_height_m * 1000.0,
        mean_height_mm: (mean_height_m * 1000.0) as f32,
        pixel_count: stats.points.len(),
    })
}

/// Coarser estimate using one representative depth for the whole mask.
///
/// Degraded mode for callers that only have a single center-point
/// distance: every masked sample is assumed to sit at `depth_m`, so the
/// footprint is `mask size * (z/fx) * (z/fy)`. Over- or under-estimates
/// tilted and uneven objects; prefer [`estimate`], which projects each
/// sample at its own depth.
pub fn estimate_uniform(
    stats: &ObjectStats,
    depth_m: f32,
    intrinsics: &CameraIntrinsics,
) -> Result<MeasurementResult, EstimateError> {
    check_intrinsics(intrinsics)?;
    if stats.points.is_empty() {
        return Err(EstimateError::EmptyMask);
    }

    let z = f64::from(depth_m);
    let footprint = (z / f64::from(intrinsics.fx)) * (z / f64::from(intrinsics.fy));
    let area_m2 = footprint * stats.points.len() as f64;
    let height_sum: f64 = stats.points.iter().map(|p| f64::from(p.height_m)).sum();
    let mean_height_m = height_sum / stats.points.len() as f64;

    Ok(MeasurementResult {
        area_cm2: (area_m2 * 10_000.0) as f32,
        max_height_mm: stats.max_height_m * 1000.0,
        mean_height_mm: (mean_height_m * 1000.0) as f32,
        pixel_count: stats.points.len(),
    })
}

fn check_intrinsics(intrinsics: &CameraIntrinsics) -> Result<(), EstimateError> {
    if intrinsics.is_valid() {
        Ok(())
    } else {
        Err(EstimateError::InvalidIntrinsics {
            fx: intrinsics.fx,
            fy: intrinsics.fy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::MaskedPoint;
    use approx::assert_relative_eq;

    fn block_stats(count: usize, height_m: f32, depth_m: f32) -> ObjectStats {
        let points = (0..count)
            .map(|index| MaskedPoint {
                index,
                height_m,
                depth_m,
            })
            .collect();
        ObjectStats {
            points,
            max_height_m: height_m,
        }
    }

    #[test]
    fn flat_block_area_follows_the_pinhole_footprint() {
        let stats = block_stats(100, 0.020, 0.38);
        let intrinsics = CameraIntrinsics::new(50.0, 50.0, 64, 48);

        let result = estimate(&stats, &intrinsics).expect("estimate");
        let expected_cm2 = 100.0 * (0.38 / 50.0) * (0.38 / 50.0) * 10_000.0;
        assert_relative_eq!(result.area_cm2, expected_cm2 as f32, max_relative = 1e-4);
        assert_relative_eq!(result.max_height_mm, 20.0, max_relative = 1e-4);
        assert_relative_eq!(result.mean_height_mm, 20.0, max_relative = 1e-4);
        assert_eq!(result.pixel_count, 100);
    }

    #[test]
    fn per_pixel_projection_scales_with_local_depth() {
        // Two samples at different depths contribute different footprints.
        let stats = ObjectStats {
            points: vec![
                MaskedPoint { index: 0, height_m: 0.02, depth_m: 0.30 },
                MaskedPoint { index: 1, height_m: 0.02, depth_m: 0.40 },
            ],
            max_height_m: 0.02,
        };
        let intrinsics = CameraIntrinsics::new(50.0, 50.0, 64, 48);

        let per_pixel = estimate(&stats, &intrinsics).expect("estimate");
        let expected = ((0.30f64 / 50.0) * (0.30 / 50.0) + (0.40 / 50.0) * (0.40 / 50.0)) * 10_000.0;
        assert_relative_eq!(per_pixel.area_cm2, expected as f32, max_relative = 1e-4);

        // The degraded mode collapses both onto one representative depth.
        let uniform = estimate_uniform(&stats, 0.40, &intrinsics).expect("estimate");
        let expected_uniform = 2.0 * (0.40f64 / 50.0) * (0.40 / 50.0) * 10_000.0;
        assert_relative_eq!(uniform.area_cm2, expected_uniform as f32, max_relative = 1e-4);
        assert!(uniform.area_cm2 > per_pixel.area_cm2);
    }

    #[test]
    fn degenerate_intrinsics_are_rejected() {
        let stats = block_stats(10, 0.02, 0.40);
        let intrinsics = CameraIntrinsics::new(0.0, 50.0, 64, 48);
        assert!(matches!(
            estimate(&stats, &intrinsics),
            Err(EstimateError::InvalidIntrinsics { .. })
        ));
    }

    #[test]
    fn empty_mask_is_rejected() {
        let stats = ObjectStats {
            points: Vec::new(),
            max_height_m: 0.0,
        };
        let intrinsics = CameraIntrinsics::new(50.0, 50.0, 64, 48);
        assert!(matches!(
            estimate(&stats, &intrinsics),
            Err(EstimateError::EmptyMask)
        ));
    }
}
