use serde::{Deserialize, Serialize};

/// Pinhole focal parameters for one delivered frame.
///
/// `fx` and `fy` are focal lengths in pixel units at the `width` x
/// `height` resolution they were calibrated for. Depth grids often
/// arrive at a lower resolution than the calibration image; use
/// [`scaled_to`](CameraIntrinsics::scaled_to) to express the focal
/// lengths on the grid's pixel lattice before estimating areas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub width: usize,
    pub height: usize,
}

impl CameraIntrinsics {
    pub fn new(fx: f32, fy: f32, width: usize, height: usize) -> Self {
        Self {
            fx,
            fy,
            width,
            height,
        }
    }

    /// Rescale the focal lengths to a different image resolution.
    pub fn scaled_to(&self, width: usize, height: usize) -> Self {
        if self.width == 0 || self.height == 0 {
            return Self { width, height, ..*self };
        }
        let sx = width as f32 / self.width as f32;
        let sy = height as f32 / self.height as f32;
        Self {
            fx: self.fx * sx,
            fy: self.fy * sy,
            width,
            height,
        }
    }

    /// Whether both focal lengths are usable for projection.
    pub fn is_valid(&self) -> bool {
        self.fx.is_finite() && self.fx > 0.0 && self.fy.is_finite() && self.fy > 0.0
    }
}
