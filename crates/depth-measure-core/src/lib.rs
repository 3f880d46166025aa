//! Core types and utilities for depth-frame object measurement.
//!
//! This crate is intentionally small and purely numeric. It does *not*
//! depend on any concrete depth sensor backend or presentation layer:
//! frames arrive as borrowed row-major `f32` buffers and leave as owned
//! sample vectors.

mod average;
mod grid;
mod intrinsics;
mod logger;
mod roi;

pub use average::{AverageError, TemporalAverager};
pub use grid::{is_valid_depth, DepthGridView};
pub use intrinsics::CameraIntrinsics;
pub use roi::{sample_region, PixelRect, RoiBounds, SampleError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level};
