//! Capture adapters.
//!
//! The core treats capture as a capability that yields a still image or
//! nothing. In the terminal client that capability is file-backed: the user
//! points at an image on disk instead of a webcam frame.

use std::fs;
use std::path::PathBuf;

use loo_core::error::Result;
use loo_core::session::{CaptureAdapter, CapturedImage};

/// Reads a still image from a file on demand.
pub struct FileCaptureAdapter {
    path: PathBuf,
}

impl FileCaptureAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CaptureAdapter for FileCaptureAdapter {
    fn capture(&self) -> Result<Option<CapturedImage>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.path)?;
        if data.is_empty() {
            return Ok(None);
        }
        Ok(Some(CapturedImage::new(data)))
    }
}

/// Always reports that no image is available.
pub struct NoCaptureAdapter;

impl CaptureAdapter for NoCaptureAdapter {
    fn capture(&self) -> Result<Option<CapturedImage>> {
        Ok(None)
    }
}
