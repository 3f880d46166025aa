/// Bounded accumulation window producing a per-position mean.
///
/// Samples are summed sequentially into an `f64` accumulator with a
/// single division per position on [`drain`](TemporalAverager::drain),
/// so the output depends only on the order of `push` calls and is
/// bit-reproducible for the same ordered inputs.
#[derive(Clone, Debug)]
pub struct TemporalAverager {
    capacity: usize,
    sum: Vec<f64>,
    count: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum AverageError {
    #[error("sample holds {got} values, current window expects {expected}")]
    LengthMismatch { expected: usize, got: usize },
}

impl TemporalAverager {
    /// Window accumulating `capacity` frames; clamped to at least one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sum: Vec::new(),
            count: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Frames accumulated in the current window.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    /// Add one sample to the window.
    ///
    /// The first sample of a window fixes the expected length; later
    /// samples of a different length leave the window untouched and
    /// report [`AverageError::LengthMismatch`].
    pub fn push(&mut self, sample: &[f32]) -> Result<(), AverageError> {
        if self.count == 0 {
            self.sum.clear();
            self.sum.resize(sample.len(), 0.0);
        } else if sample.len() != self.sum.len() {
            return Err(AverageError::LengthMismatch {
                expected: self.sum.len(),
                got: sample.len(),
            });
        }
        for (acc, &v) in self.sum.iter_mut().zip(sample) {
            *acc += f64::from(v);
        }
        self.count += 1;
        Ok(())
    }

    /// Per-position mean once the window is full; `None` before that.
    ///
    /// Draining resets the window for the next cycle.
    pub fn drain(&mut self) -> Option<Vec<f32>> {
        if !self.is_full() {
            return None;
        }
        let n = self.count as f64;
        let averaged = self.sum.iter().map(|&s| (s / n) as f32).collect();
        self.clear();
        Some(averaged)
    }

    /// Abort the current window.
    pub fn clear(&mut self) {
        self.sum.clear();
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn drain_yields_per_position_mean() {
        let mut avg = TemporalAverager::new(3);
        avg.push(&[0.40, 0.50, 0.10]).unwrap();
        avg.push(&[0.42, 0.48, 0.20]).unwrap();
        assert!(avg.drain().is_none());
        avg.push(&[0.44, 0.52, 0.30]).unwrap();

        let mean = avg.drain().expect("full window");
        assert_relative_eq!(mean[0], 0.42, max_relative = 1e-6);
        assert_relative_eq!(mean[1], 0.50, max_relative = 1e-6);
        assert_relative_eq!(mean[2], 0.20, max_relative = 1e-6);
        assert!(avg.is_empty());
    }

    #[test]
    fn mismatched_sample_is_rejected_without_corrupting_the_window() {
        let mut avg = TemporalAverager::new(2);
        avg.push(&[1.0, 2.0]).unwrap();
        let err = avg.push(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            AverageError::LengthMismatch { expected: 2, got: 3 }
        ));
        assert_eq!(avg.len(), 1);

        avg.push(&[3.0, 4.0]).unwrap();
        let mean = avg.drain().expect("full window");
        assert_relative_eq!(mean[0], 2.0);
        assert_relative_eq!(mean[1], 3.0);
    }

    #[test]
    fn clear_aborts_the_cycle() {
        let mut avg = TemporalAverager::new(2);
        avg.push(&[1.0]).unwrap();
        avg.clear();
        assert!(avg.is_empty());
        // A cleared window accepts a new sample length.
        avg.push(&[1.0, 2.0]).unwrap();
        assert_eq!(avg.len(), 1);
    }
}
