// SPDX-License-Identifier: GPL-3.0-only

//! Camera capability provider
//!
//! ```text
//! ┌─────────────────────┐
//! │   UI Layer (App)    │
//! └──────────┬──────────┘
//!            │ request_permission / capture_still
//!            ▼
//! ┌─────────────────────┐     ┌──────────────────────┐
//! │ CameraProvider Trait│     │  ViewfinderPipeline  │ ← frames via subscription
//! └──────────┬──────────┘     └──────────────────────┘
//!            ▼
//!   ┌────────────────┐
//!   │  PortalCamera  │  ← xdg portal + JPEG encode
//!   └────────────────┘
//! ```

pub mod pipeline;
pub mod portal;
pub mod types;

pub use pipeline::ViewfinderPipeline;
pub use types::*;

use crate::backends::types::PermissionResponse;
use crate::errors::CameraError;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Camera operations used by the capture screen
///
/// The live viewfinder is not part of the trait: it is a stream of frames
/// owned by the UI, and `capture_still` turns the most recent of those frames
/// into an image file.
pub trait CameraProvider: Send + Sync {
    /// Ask the platform for permission to use the camera
    fn request_permission(&self) -> BoxFuture<'_, Result<PermissionResponse, CameraError>>;

    /// Store `frame` as a still image and return a reference to the file
    fn capture_still(&self, frame: Arc<PreviewFrame>)
    -> BoxFuture<'_, Result<ImageRef, CameraError>>;

    /// Release a still produced by `capture_still` that is no longer shown
    fn discard_still<'a>(&'a self, image: &'a ImageRef) -> BoxFuture<'a, Result<(), CameraError>>;
}

/// Portal-backed camera writing JPEG stills into a capture directory
#[derive(Debug, Clone)]
pub struct PortalCamera {
    capture_dir: PathBuf,
    jpeg_quality: u8,
}

impl PortalCamera {
    pub fn new(capture_dir: PathBuf, jpeg_quality: u8) -> Self {
        Self {
            capture_dir,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// Default capture directory (`$XDG_CACHE_HOME/geocam/captures`)
    pub fn default_capture_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("geocam")
            .join("captures")
    }

    pub fn capture_dir(&self) -> &std::path::Path {
        &self.capture_dir
    }

    async fn write_still(&self, frame: Arc<PreviewFrame>) -> Result<ImageRef, CameraError> {
        if !frame.is_complete() {
            return Err(CameraError::CaptureFailed(format!(
                "incomplete frame ({} bytes for {}x{})",
                frame.data.len(),
                frame.width,
                frame.height
            )));
        }

        let quality = self.jpeg_quality;
        let encoded = tokio::task::spawn_blocking(move || encode_jpeg(&frame, quality))
            .await
            .map_err(|e| CameraError::EncodingFailed(format!("Encoding task error: {}", e)))??;

        tokio::fs::create_dir_all(&self.capture_dir).await?;
        let path = self
            .capture_dir
            .join(format!("capture-{}.jpg", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &encoded).await?;

        info!(path = %path.display(), bytes = encoded.len(), "Still captured");
        Ok(ImageRef::new(path))
    }

    /// Remove a still from the capture directory; files elsewhere are left alone
    async fn remove_still(&self, image: &ImageRef) -> Result<(), CameraError> {
        if !image.path().starts_with(self.capture_dir()) {
            debug!(path = %image.path().display(), "Not a cached still, keeping it");
            return Ok(());
        }
        match tokio::fs::remove_file(image.path()).await {
            Ok(()) => {
                debug!(path = %image.path().display(), "Cached still removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl CameraProvider for PortalCamera {
    fn request_permission(&self) -> BoxFuture<'_, Result<PermissionResponse, CameraError>> {
        Box::pin(portal::request_camera_access())
    }

    fn capture_still(
        &self,
        frame: Arc<PreviewFrame>,
    ) -> BoxFuture<'_, Result<ImageRef, CameraError>> {
        Box::pin(self.write_still(frame))
    }

    fn discard_still<'a>(&'a self, image: &'a ImageRef) -> BoxFuture<'a, Result<(), CameraError>> {
        Box::pin(self.remove_still(image))
    }
}

/// Encode an RGBA preview frame as JPEG, dropping the alpha channel
pub fn encode_jpeg(frame: &PreviewFrame, quality: u8) -> Result<Vec<u8>, CameraError> {
    let rgba = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .ok_or_else(|| CameraError::EncodingFailed("frame size mismatch".to_string()))?;
    let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| CameraError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

    debug!(size = buffer.len(), "JPEG encoding complete");
    Ok(buffer)
}
