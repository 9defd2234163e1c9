// SPDX-License-Identifier: GPL-3.0-only

//! Camera types: devices, preview frames and captured image references

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Which way the camera points, as reported by libcamera
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraFacing {
    /// Rear camera (the one pointing away from the user)
    #[default]
    Back,
    /// Front/selfie camera
    Front,
}

impl CameraFacing {
    /// Value of the `api.libcamera.location` device property for this facing
    pub fn libcamera_location(self) -> &'static str {
        match self {
            CameraFacing::Back => "back",
            CameraFacing::Front => "front",
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.libcamera_location())
    }
}

/// A single RGBA frame delivered by the viewfinder pipeline
///
/// Rows are tightly packed (`width * 4` bytes per row).
#[derive(Clone)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    /// When the frame left the pipeline
    pub captured_at: Instant,
}

impl PreviewFrame {
    /// Check that the buffer holds exactly `width * height` RGBA pixels
    pub fn is_complete(&self) -> bool {
        self.data.len() == self.width as usize * self.height as usize * 4
    }
}

impl std::fmt::Debug for PreviewFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Channel the pipeline pushes preview frames into
pub type FrameSender = futures::channel::mpsc::Sender<PreviewFrame>;

/// Reference to a captured image file on local storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    path: PathBuf,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Percent-encoded `file://` URI of the image, as recorded in capture
    /// metadata
    pub fn uri(&self) -> String {
        match url::Url::from_file_path(&self.path) {
            Ok(uri) => uri.to_string(),
            // Relative paths have no file URI
            Err(()) => format!("file://{}", self.path.display()),
        }
    }
}

/// Camera picked for the viewfinder
#[derive(Debug, Clone)]
pub struct CameraDevice {
    /// Human readable device name
    pub name: String,
    /// Facing reported by the device, if any
    pub facing: Option<CameraFacing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_ref_uri() {
        let image = ImageRef::new("/tmp/a.jpg");
        assert_eq!(image.uri(), "file:///tmp/a.jpg");
        assert_eq!(image.path(), Path::new("/tmp/a.jpg"));
    }

    #[test]
    fn test_image_ref_uri_is_percent_encoded() {
        let image = ImageRef::new("/home/Jane Doe/Pictures/#1 100%.jpg");
        assert_eq!(
            image.uri(),
            "file:///home/Jane%20Doe/Pictures/%231%20100%25.jpg"
        );
    }

    #[test]
    fn test_preview_frame_completeness() {
        let frame = PreviewFrame {
            width: 2,
            height: 2,
            data: Arc::from(vec![0u8; 16]),
            captured_at: Instant::now(),
        };
        assert!(frame.is_complete());

        let truncated = PreviewFrame {
            data: Arc::from(vec![0u8; 12]),
            ..frame
        };
        assert!(!truncated.is_complete());
    }

    #[test]
    fn test_facing_location_names() {
        assert_eq!(CameraFacing::Back.libcamera_location(), "back");
        assert_eq!(CameraFacing::Front.to_string(), "front");
    }
}
