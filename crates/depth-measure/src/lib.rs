//! Object footprint and height measurement from depth-camera frames.
//!
//! A [`ScanSession`] consumes one depth frame at a time from a sensor
//! collaborator and drives a small state machine: capture an averaged
//! baseline of the empty surface, then average frames with the object in
//! place, difference the two maps, and project the surviving object mask
//! through the camera intrinsics into a physical area/height summary.
//! State changes are handed to the presentation layer as owned
//! [`ScanUpdate`] messages; nothing is shared mutably across that
//! boundary.
//!
//! ## Quickstart
//!
//! ```
//! use depth_measure::{ScanParams, ScanSession};
//! use depth_measure::core::{CameraIntrinsics, DepthGridView};
//!
//! let mut session = ScanSession::new(ScanParams::default()).expect("valid params");
//!
//! let depth = vec![0.40_f32; 64 * 48];
//! let grid = DepthGridView::new(64, 48, &depth);
//! let intrinsics = CameraIntrinsics::new(50.0, 50.0, 64, 48);
//!
//! let updates = session.process_frame(&grid, &intrinsics, true);
//! assert!(!updates.is_empty());
//! ```
//!
//! ## API map
//! - [`core`]: grid view, ROI sampling, temporal averaging, intrinsics.
//! - [`guidance`]: distance-band classification for user prompts.
//! - [`compare`]: baseline differencing and object-mask selection.
//! - [`area`]: physical area/height estimation.
//! - [`session`]: the frame-driven state machine and update messages.

pub use depth_measure_core as core;

pub mod area;
pub mod compare;
pub mod guidance;
mod io;
pub mod session;

pub use area::{estimate, estimate_uniform, EstimateError, MeasurementResult};
pub use compare::{compare, CompareError, CompareParams, MaskedPoint, ObjectStats};
pub use guidance::{Guidance, GuidanceBands};
pub use io::ScanIoError;
pub use session::{ScanConfigError, ScanParams, ScanPhase, ScanSession, ScanTelemetry, ScanUpdate};
