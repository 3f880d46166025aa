//! JSON configuration helpers for the scan pipeline.

use std::fs;
use std::path::Path;

use crate::session::{ScanConfigError, ScanParams, ScanSession};

#[derive(thiserror::Error, Debug)]
pub enum ScanIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ScanParams {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ScanIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ScanIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Build a validated session from this config.
    pub fn build_session(self) -> Result<ScanSession, ScanConfigError> {
        ScanSession::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::CompareParams;

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scan.json");

        let params = ScanParams {
            frames_per_window: 15,
            compare: CompareParams {
                min_mask_pixels: 80,
                ..CompareParams::default()
            },
            ..ScanParams::default()
        };
        params.write_json(&path).expect("write");

        let loaded = ScanParams::load_json(&path).expect("load");
        assert_eq!(loaded.frames_per_window, 15);
        assert_eq!(loaded.compare.min_mask_pixels, 80);
        loaded.build_session().expect("session");
    }

    #[test]
    fn missing_knobs_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scan.json");
        fs::write(&path, "{}").expect("write");

        let loaded = ScanParams::load_json(&path).expect("load");
        assert_eq!(loaded.frames_per_window, 12);
        loaded.validate().expect("defaults are valid");
    }
}
