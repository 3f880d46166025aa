use depth_measure_core::{sample_region, CameraIntrinsics, DepthGridView, TemporalAverager};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::area::{estimate, MeasurementResult};
use crate::compare::{compare, CompareError};
use crate::guidance::Guidance;
use crate::session::params::{ScanConfigError, ScanParams};
use crate::session::phase::ScanPhase;
use crate::session::update::ScanUpdate;

/// Smoothing gain for the tracking stability score.
const STABILITY_GAIN: f32 = 0.1;

/// Debug telemetry mirrored to the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanTelemetry {
    /// Last valid center-point distance, meters.
    pub center_distance_m: Option<f32>,
    /// Whether any depth frame has been delivered this session.
    pub depth_seen: bool,
    /// Frames accumulated in the current averaging window.
    pub frames_accumulated: usize,
    /// Exponential moving average of the tracking-quality flag, in
    /// `[0, 1]`. Diagnostic only; never feeds the measurement math.
    pub stability: f32,
}

/// Frame-driven measurement session.
///
/// Consumes one depth frame at a time (single producer, synchronous) and
/// owns every piece of scan state: phase, accumulation window, baseline
/// map, guidance, telemetry, and the final result. State changes leave
/// the session only as owned [`ScanUpdate`] batches.
pub struct ScanSession {
    params: ScanParams,
    phase: ScanPhase,
    averager: TemporalAverager,
    baseline: Option<Vec<f32>>,
    guidance: Option<Guidance>,
    result: Option<MeasurementResult>,
    telemetry: ScanTelemetry,
    queued: Vec<ScanUpdate>,
}

impl ScanSession {
    /// Validate the configuration and start an idle session.
    ///
    /// The initial update batch (drained by the first mutating call)
    /// requests illumination ON for the sensor session.
    pub fn new(params: ScanParams) -> Result<Self, ScanConfigError> {
        params.validate()?;
        let averager = TemporalAverager::new(params.frames_per_window);
        let mut session = Self {
            params,
            phase: ScanPhase::Idle,
            averager,
            baseline: None,
            guidance: None,
            result: None,
            telemetry: ScanTelemetry::default(),
            queued: Vec::new(),
        };
        session.emit(ScanUpdate::Illumination { on: true });
        Ok(session)
    }

    #[inline]
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    #[inline]
    pub fn guidance(&self) -> Option<Guidance> {
        self.guidance
    }

    /// Finished measurement; meaningful only while phase is
    /// [`ScanPhase::Completed`].
    #[inline]
    pub fn result(&self) -> Option<MeasurementResult> {
        self.result
    }

    #[inline]
    pub fn telemetry(&self) -> ScanTelemetry {
        self.telemetry
    }

    #[inline]
    pub fn is_baseline_set(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn params(&self) -> &ScanParams {
        &self.params
    }

    /// Feed one delivered depth frame through the pipeline.
    ///
    /// Always updates telemetry and guidance; in an accumulating phase
    /// the frame additionally contributes exactly one sample to the
    /// averaging window, and a completed window either commits the
    /// baseline or produces the measurement.
    pub fn process_frame(
        &mut self,
        grid: &DepthGridView<'_>,
        intrinsics: &CameraIntrinsics,
        tracking_stable: bool,
    ) -> Vec<ScanUpdate> {
        self.telemetry.depth_seen = true;
        let stable = if tracking_stable { 1.0 } else { 0.0 };
        self.telemetry.stability += STABILITY_GAIN * (stable - self.telemetry.stability);

        let center = grid.center_distance();
        if center.is_some() {
            self.telemetry.center_distance_m = center;
        }
        self.update_guidance(center);

        if self.phase.is_accumulating() {
            self.accumulate(grid, intrinsics);
        }
        self.telemetry.frames_accumulated = self.averager.len();
        self.drain_updates()
    }

    /// Begin a baseline capture.
    ///
    /// Honored only from [`ScanPhase::Idle`] with the camera inside the
    /// guidance target band; otherwise the session stays put and a
    /// distance-error guidance message is emitted. No-op in any other
    /// phase.
    pub fn set_baseline(&mut self) -> Vec<ScanUpdate> {
        if self.phase == ScanPhase::Idle {
            match self.telemetry.center_distance_m {
                Some(d) if self.params.guidance.accepts(d) => {
                    self.baseline = None;
                    self.averager.clear();
                    self.transition(ScanPhase::CapturingBaseline);
                }
                Some(d) => {
                    debug!("baseline capture rejected at {d:.3} m");
                    self.force_guidance(self.params.guidance.classify(d, false));
                }
                None => self.force_guidance(Guidance::NoReading),
            }
        }
        self.drain_updates()
    }

    /// Start scanning the object; no-op while no baseline is committed.
    pub fn scan_object(&mut self) -> Vec<ScanUpdate> {
        if self.phase == ScanPhase::BaselineReady && self.baseline.is_some() {
            self.averager.clear();
            self.transition(ScanPhase::ScanningObject);
        }
        self.drain_updates()
    }

    /// Drop all scan state and return to [`ScanPhase::Idle`].
    ///
    /// Safe at any point, including mid-accumulation; leaves no stale
    /// baseline or partial window behind. Idempotent.
    pub fn reset(&mut self) -> Vec<ScanUpdate> {
        self.baseline = None;
        self.averager.clear();
        self.result = None;
        self.guidance = None;
        self.telemetry.frames_accumulated = 0;
        self.transition(ScanPhase::Idle);
        self.emit(ScanUpdate::Illumination { on: true });
        self.drain_updates()
    }

    fn update_guidance(&mut self, center: Option<f32>) {
        if self.phase == ScanPhase::Completed {
            return;
        }
        let next = match center {
            Some(d) => self.params.guidance.classify(d, self.baseline.is_some()),
            None => Guidance::NoReading,
        };
        self.set_guidance(next);
    }

    /// Record and emit a guidance change; unchanged guidance is not
    /// re-emitted.
    fn set_guidance(&mut self, next: Guidance) {
        if self.guidance != Some(next) {
            self.guidance = Some(next);
            self.emit(ScanUpdate::Guidance(next));
        }
    }

    /// Emit guidance unconditionally, for rejections that must surface
    /// even when the message text is unchanged.
    fn force_guidance(&mut self, next: Guidance) {
        self.guidance = Some(next);
        self.emit(ScanUpdate::Guidance(next));
    }

    fn accumulate(&mut self, grid: &DepthGridView<'_>, intrinsics: &CameraIntrinsics) {
        let sample = match sample_region(grid, &self.params.roi) {
            Ok(sample) => sample,
            Err(err) => {
                warn!("frame skipped: {err}");
                return;
            }
        };

        if let Err(err) = self.averager.push(&sample) {
            // Frame shape changed mid-window: discard and restart the
            // cycle with this frame as its first sample.
            warn!("accumulation window restarted: {err}");
            self.averager.clear();
            let _ = self.averager.push(&sample);
        }
        if !self.averager.is_full() {
            return;
        }
        let Some(averaged) = self.averager.drain() else {
            return;
        };

        match self.phase {
            ScanPhase::CapturingBaseline => self.commit_baseline(averaged),
            ScanPhase::ScanningObject => self.finish_scan(&averaged, intrinsics),
            _ => {}
        }
    }

    fn commit_baseline(&mut self, averaged: Vec<f32>) {
        info!("baseline committed over {} samples", averaged.len());
        self.baseline = Some(averaged);
        self.transition(ScanPhase::BaselineReady);
    }

    fn finish_scan(&mut self, averaged: &[f32], intrinsics: &CameraIntrinsics) {
        let Some(baseline) = self.baseline.as_deref() else {
            warn!("scan window dropped: no baseline committed");
            return;
        };

        let stats = match compare(baseline, averaged, &self.params.compare) {
            Ok(stats) => stats,
            Err(err @ CompareError::ObjectNotDetected { .. }) => {
                // Recoverable: stay in the scanning phase and refill the
                // window from subsequent frames.
                debug!("scan window rejected: {err}");
                self.force_guidance(Guidance::ObjectNotDetected);
                return;
            }
            Err(err) => {
                warn!("scan window discarded: {err}");
                return;
            }
        };

        match estimate(&stats, intrinsics) {
            Ok(result) => {
                info!(
                    "measurement complete: {:.1} cm2, max {:.1} mm over {} px",
                    result.area_cm2, result.max_height_mm, result.pixel_count
                );
                self.result = Some(result);
                self.emit(ScanUpdate::Measurement(result));
                self.transition(ScanPhase::Completed);
                self.emit(ScanUpdate::Illumination { on: false });
            }
            Err(err) => {
                warn!("estimate failed, retrying with the next window: {err}");
            }
        }
    }

    fn transition(&mut self, next: ScanPhase) {
        if self.phase != next {
            debug!("phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
            self.emit(ScanUpdate::Phase(next));
        }
    }

    fn emit(&mut self, update: ScanUpdate) {
        self.queued.push(update);
    }

    fn drain_updates(&mut self) -> Vec<ScanUpdate> {
        std::mem::take(&mut self.queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 40;
    const H: usize = 30;

    fn frame(depth: f32) -> Vec<f32> {
        vec![depth; W * H]
    }

    fn feed(session: &mut ScanSession, depth: &[f32]) -> Vec<ScanUpdate> {
        let grid = DepthGridView::new(W, H, depth);
        let intrinsics = CameraIntrinsics::new(50.0, 50.0, W, H);
        session.process_frame(&grid, &intrinsics, true)
    }

    fn session() -> ScanSession {
        ScanSession::new(ScanParams::default()).expect("valid params")
    }

    #[test]
    fn scan_object_is_a_noop_without_a_baseline() {
        let mut s = session();
        feed(&mut s, &frame(0.40));
        s.scan_object();
        assert_eq!(s.phase(), ScanPhase::Idle);
        assert!(!s.is_baseline_set());
    }

    #[test]
    fn baseline_capture_is_rejected_outside_the_target_band() {
        let mut s = session();
        feed(&mut s, &frame(0.60));
        let updates = s.set_baseline();
        assert_eq!(s.phase(), ScanPhase::Idle);
        assert!(updates.contains(&ScanUpdate::Guidance(Guidance::MoveCloser)));
    }

    #[test]
    fn baseline_capture_requires_a_center_reading() {
        let mut s = session();
        let updates = s.set_baseline();
        assert_eq!(s.phase(), ScanPhase::Idle);
        assert!(updates.contains(&ScanUpdate::Guidance(Guidance::NoReading)));
    }

    #[test]
    fn double_reset_is_idempotent() {
        let mut s = session();
        feed(&mut s, &frame(0.40));
        s.set_baseline();
        feed(&mut s, &frame(0.40));

        s.reset();
        let telemetry = s.telemetry();
        s.reset();
        assert_eq!(s.phase(), ScanPhase::Idle);
        assert!(!s.is_baseline_set());
        assert_eq!(s.result(), None);
        assert_eq!(s.telemetry(), telemetry);
    }

    #[test]
    fn frames_outside_accumulating_phases_do_not_fill_the_window() {
        let mut s = session();
        for _ in 0..5 {
            feed(&mut s, &frame(0.40));
        }
        assert_eq!(s.telemetry().frames_accumulated, 0);
    }

    #[test]
    fn guidance_tracks_the_distance_bands() {
        let mut s = session();
        let updates = feed(&mut s, &frame(0.20));
        assert!(updates.contains(&ScanUpdate::Guidance(Guidance::MoveBack)));
        // Unchanged guidance is not re-emitted.
        let updates = feed(&mut s, &frame(0.20));
        assert!(!updates.iter().any(|u| matches!(u, ScanUpdate::Guidance(_))));
        let updates = feed(&mut s, &frame(0.40));
        assert!(updates.contains(&ScanUpdate::Guidance(Guidance::CaptureBaseline)));
    }

    #[test]
    fn stability_score_converges_toward_the_flag() {
        let mut s = session();
        for _ in 0..50 {
            feed(&mut s, &frame(0.40));
        }
        assert!(s.telemetry().stability > 0.9);
    }

    #[test]
    fn length_mismatch_restarts_the_window() {
        let mut s = session();
        feed(&mut s, &frame(0.40));
        s.set_baseline();
        assert_eq!(s.phase(), ScanPhase::CapturingBaseline);
        feed(&mut s, &frame(0.40));
        assert_eq!(s.telemetry().frames_accumulated, 1);

        // A frame at a different resolution restarts the cycle instead of
        // corrupting it.
        let other = vec![0.40f32; 20 * 16];
        let grid = DepthGridView::new(20, 16, &other);
        let intrinsics = CameraIntrinsics::new(50.0, 50.0, 20, 16);
        s.process_frame(&grid, &intrinsics, true);
        assert_eq!(s.telemetry().frames_accumulated, 1);
        assert_eq!(s.phase(), ScanPhase::CapturingBaseline);
    }
}
