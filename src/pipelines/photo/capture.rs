// SPDX-License-Identifier: GPL-3.0-only

//! Permission requests, still capture and position lookup

use crate::backends::camera::{CameraProvider, ImageRef, PreviewFrame};
use crate::backends::location::{LocationOptions, LocationProvider, Position};
use crate::backends::types::PermissionResponse;
use crate::errors::{CameraError, LocationError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ask for camera access; a provider error counts as a refusal
pub async fn request_camera_permission(camera: &dyn CameraProvider) -> PermissionResponse {
    match camera.request_permission().await {
        Ok(response) => {
            info!(?response, "Camera permission resolved");
            response
        }
        Err(e) => {
            warn!(error = %e, "Camera permission request failed, treating as denied");
            PermissionResponse::Denied
        }
    }
}

/// Ask for foreground location access; a provider error counts as a refusal
pub async fn request_location_permission(location: &dyn LocationProvider) -> PermissionResponse {
    match location.request_foreground_permission().await {
        Ok(response) => {
            info!(?response, "Location permission resolved");
            response
        }
        Err(e) => {
            warn!(error = %e, "Location permission request failed, treating as denied");
            PermissionResponse::Denied
        }
    }
}

/// Turn the current viewfinder frame into a still image
pub async fn take_still(
    camera: &dyn CameraProvider,
    frame: Arc<PreviewFrame>,
) -> Result<ImageRef, CameraError> {
    debug!(
        width = frame.width,
        height = frame.height,
        age_ms = frame.captured_at.elapsed().as_millis() as u64,
        "Capturing still from viewfinder frame"
    );
    camera.capture_still(frame).await
}

/// Release a still that a newer capture replaced
///
/// Failures are only logged; a leftover file is harmless.
pub async fn discard_still(camera: &dyn CameraProvider, image: ImageRef) {
    if let Err(e) = camera.discard_still(&image).await {
        warn!(error = %e, path = %image.path().display(), "Failed to discard still");
    }
}

/// Resolve the current position, giving up after `options.timeout` if set
pub async fn locate(
    location: &dyn LocationProvider,
    options: LocationOptions,
) -> Result<Position, LocationError> {
    let request = location.current_position(options);
    match options.timeout {
        Some(limit) => tokio::time::timeout(limit, request).await.map_err(|_| {
            warn!(timeout_ms = limit.as_millis() as u64, "Location request timed out");
            LocationError::Timeout
        })?,
        None => request.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::time::Duration;

    struct StalledLocation;

    impl LocationProvider for StalledLocation {
        fn request_foreground_permission(
            &self,
        ) -> BoxFuture<'_, Result<PermissionResponse, LocationError>> {
            Box::pin(async { Err(LocationError::ServiceUnavailable("no geoclue".into())) })
        }

        fn current_position(
            &self,
            _options: LocationOptions,
        ) -> BoxFuture<'_, Result<Position, LocationError>> {
            Box::pin(futures::future::pending())
        }
    }

    #[tokio::test]
    async fn test_locate_times_out() {
        let options = LocationOptions {
            timeout: Some(Duration::from_millis(10)),
            ..Default::default()
        };
        let result = locate(&StalledLocation, options).await;
        assert_eq!(result, Err(LocationError::Timeout));
    }

    #[tokio::test]
    async fn test_permission_error_is_denied() {
        let response = request_location_permission(&StalledLocation).await;
        assert_eq!(response, PermissionResponse::Denied);
    }
}
