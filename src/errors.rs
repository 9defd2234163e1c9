// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera application
//!
//! Every platform call made on behalf of a user action returns one of these,
//! and the action handler turns it into an alert instead of letting it
//! escape.

use std::fmt;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Geolocation errors
    Location(LocationError),
    /// Photo library errors
    Library(LibraryError),
    /// Save was requested without both an image and a location
    MissingCaptureData,
    /// Another capture or save is still running
    Busy,
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq)]
pub enum CameraError {
    /// The viewfinder has not delivered a frame yet
    NotReady,
    /// The camera portal could not be reached
    PortalUnavailable(String),
    /// Pipeline or device initialization failed
    InitializationFailed(String),
    /// Still capture failed
    CaptureFailed(String),
    /// The captured frame could not be encoded
    EncodingFailed(String),
}

/// Location-specific errors
#[derive(Debug, Clone, PartialEq)]
pub enum LocationError {
    /// The location service refused access
    PermissionDenied,
    /// GeoClue is not running or not reachable
    ServiceUnavailable(String),
    /// No fix arrived within the configured timeout
    Timeout,
    /// Any other failure while resolving a position
    Failed(String),
}

/// Photo library errors
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    /// Copying the captured file into the library failed
    AssetCreationFailed(String),
    /// Album name cannot be used as a directory name
    InvalidAlbumName(String),
    /// Album does not exist
    AlbumNotFound(String),
    /// Filesystem error while touching an album
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Location(e) => write!(f, "Location error: {}", e),
            AppError::Library(e) => write!(f, "Photo library error: {}", e),
            AppError::MissingCaptureData => write!(f, "No image or location data available"),
            AppError::Busy => write!(f, "Another capture or save is still in progress"),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NotReady => write!(f, "Camera is not ready"),
            CameraError::PortalUnavailable(msg) => write!(f, "Camera portal unavailable: {}", msg),
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CameraError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            CameraError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "Location access denied"),
            LocationError::ServiceUnavailable(msg) => {
                write!(f, "Location service unavailable: {}", msg)
            }
            LocationError::Timeout => write!(f, "Timed out waiting for a location fix"),
            LocationError::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::AssetCreationFailed(msg) => write!(f, "Failed to create asset: {}", msg),
            LibraryError::InvalidAlbumName(name) => write!(f, "Invalid album name: {:?}", name),
            LibraryError::AlbumNotFound(name) => write!(f, "Album not found: {}", name),
            LibraryError::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for LocationError {}
impl std::error::Error for LibraryError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<LocationError> for AppError {
    fn from(err: LocationError) -> Self {
        AppError::Location(err)
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        AppError::Library(err)
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::Io(err.to_string())
    }
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::CaptureFailed(err.to_string())
    }
}

impl From<zbus::Error> for LocationError {
    fn from(err: zbus::Error) -> Self {
        LocationError::ServiceUnavailable(err.to_string())
    }
}

impl From<zbus::Error> for CameraError {
    fn from(err: zbus::Error) -> Self {
        CameraError::PortalUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_capture_data_message() {
        assert_eq!(
            AppError::MissingCaptureData.to_string(),
            "No image or location data available"
        );
    }

    #[test]
    fn test_sub_error_conversion() {
        let err: AppError = LibraryError::AlbumNotFound("Camera".into()).into();
        assert_eq!(err.to_string(), "Photo library error: Album not found: Camera");

        let err: AppError = CameraError::NotReady.into();
        assert!(matches!(err, AppError::Camera(CameraError::NotReady)));
    }

    #[test]
    fn test_io_error_maps_to_library_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert_eq!(LibraryError::from(io), LibraryError::Io("read-only".into()));
    }
}
