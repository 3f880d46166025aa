use serde::{Deserialize, Serialize};

use crate::grid::DepthGridView;

/// Fractional region of interest within a depth grid.
///
/// Bounds are fractions of the grid dimensions, so the same config works
/// across sensor resolutions. Each bound pair must satisfy
/// `0 <= start < end <= 1`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RoiBounds {
    pub start_x: f32,
    pub end_x: f32,
    pub start_y: f32,
    pub end_y: f32,
}

impl Default for RoiBounds {
    fn default() -> Self {
        Self {
            start_x: 0.3,
            end_x: 0.7,
            start_y: 0.3,
            end_y: 0.7,
        }
    }
}

/// Errors from applying an ROI to a depth grid.
#[derive(thiserror::Error, Debug)]
pub enum SampleError {
    #[error(
        "fractional bounds out of order or outside [0, 1]: \
         x {start_x}..{end_x}, y {start_y}..{end_y}"
    )]
    InvalidBounds {
        start_x: f32,
        end_x: f32,
        start_y: f32,
        end_y: f32,
    },
    #[error("sampling region is empty for a {width}x{height} grid")]
    EmptyRegion { width: usize, height: usize },
    #[error("depth buffer holds {len} values, expected {expected}")]
    BufferMismatch { len: usize, expected: usize },
}

/// Integer pixel rectangle produced by applying fractional bounds to a
/// grid. Half-open in both axes: `x in [x0, x1)`, `y in [y0, y1)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PixelRect {
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

impl PixelRect {
    #[inline]
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y1 - self.y0
    }

    /// Number of samples covered by the rectangle.
    #[inline]
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RoiBounds {
    /// Check the fractional bounds without a concrete grid.
    ///
    /// Run once at configuration time; a validated ROI cannot produce an
    /// empty or out-of-range rectangle on a non-empty grid.
    pub fn validate(&self) -> Result<(), SampleError> {
        let ordered = |s: f32, e: f32| s.is_finite() && e.is_finite() && 0.0 <= s && s < e && e <= 1.0;
        if ordered(self.start_x, self.end_x) && ordered(self.start_y, self.end_y) {
            Ok(())
        } else {
            Err(SampleError::InvalidBounds {
                start_x: self.start_x,
                end_x: self.end_x,
                start_y: self.start_y,
                end_y: self.end_y,
            })
        }
    }

    /// Apply the fractional bounds to a grid of the given dimensions.
    ///
    /// Each bound is floored onto the pixel lattice. Fails when the
    /// resulting rectangle covers no pixel.
    pub fn pixel_rect(&self, width: usize, height: usize) -> Result<PixelRect, SampleError> {
        self.validate()?;
        let rect = PixelRect {
            x0: (width as f32 * self.start_x).floor() as usize,
            x1: (width as f32 * self.end_x).floor() as usize,
            y0: (height as f32 * self.start_y).floor() as usize,
            y1: (height as f32 * self.end_y).floor() as usize,
        };
        if rect.x0 >= rect.x1 || rect.y0 >= rect.y1 || rect.x1 > width || rect.y1 > height {
            return Err(SampleError::EmptyRegion { width, height });
        }
        Ok(rect)
    }
}

/// Copy the region of interest out of a frame, row-major.
///
/// Pure function of its inputs; invalid sensor readings are copied as-is
/// and filtered downstream.
pub fn sample_region(grid: &DepthGridView<'_>, roi: &RoiBounds) -> Result<Vec<f32>, SampleError> {
    let expected = grid.width * grid.height;
    if grid.data.len() != expected {
        return Err(SampleError::BufferMismatch {
            len: grid.data.len(),
            expected,
        });
    }
    let rect = roi.pixel_rect(grid.width, grid.height)?;

    let mut out = Vec::with_capacity(rect.len());
    for y in rect.y0..rect.y1 {
        let row = y * grid.width;
        out.extend_from_slice(&grid.data[row + rect.x0..row + rect.x1]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_grid_samples_to_constant_array() {
        let data = vec![0.37f32; 40 * 30];
        let grid = DepthGridView::new(40, 30, &data);
        let roi = RoiBounds::default();

        let rect = roi.pixel_rect(40, 30).expect("rect");
        let sample = sample_region(&grid, &roi).expect("sample");

        assert_eq!(rect, PixelRect { x0: 12, x1: 28, y0: 9, y1: 21 });
        assert_eq!(sample.len(), rect.len());
        assert!(sample.iter().all(|&v| v == 0.37));
    }

    #[test]
    fn full_frame_bounds_stay_inside_the_grid() {
        let data = vec![1.0f32; 8 * 6];
        let grid = DepthGridView::new(8, 6, &data);
        let roi = RoiBounds {
            start_x: 0.0,
            end_x: 1.0,
            start_y: 0.0,
            end_y: 1.0,
        };
        let sample = sample_region(&grid, &roi).expect("sample");
        assert_eq!(sample.len(), 8 * 6);
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let roi = RoiBounds {
            start_x: 0.7,
            end_x: 0.3,
            start_y: 0.3,
            end_y: 0.7,
        };
        assert!(matches!(
            roi.validate(),
            Err(SampleError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn degenerate_region_is_rejected() {
        // Valid fractions that floor to zero pixels on a tiny grid.
        let roi = RoiBounds {
            start_x: 0.1,
            end_x: 0.2,
            start_y: 0.1,
            end_y: 0.2,
        };
        assert!(matches!(
            roi.pixel_rect(4, 4),
            Err(SampleError::EmptyRegion { .. })
        ));
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let data = vec![0.4f32; 10];
        let grid = DepthGridView {
            width: 8,
            height: 6,
            data: &data,
        };
        assert!(matches!(
            sample_region(&grid, &RoiBounds::default()),
            Err(SampleError::BufferMismatch { len: 10, .. })
        ));
    }
}
