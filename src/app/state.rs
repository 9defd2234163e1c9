// SPDX-License-Identifier: GPL-3.0-only

//! Application state management
//!
//! [`ScreenState`] owns everything the capture screen knows: both permission
//! states, the live viewfinder frame, the captured image and its location,
//! and the guard for the action currently in flight. Its transition methods
//! are synchronous and tell the caller what to do next, so the same record
//! drives the GUI, the headless capture and the tests.

use crate::backends::camera::{ImageRef, PreviewFrame};
use crate::backends::location::Position;
use crate::backends::types::{PermissionResponse, PermissionState};
use crate::config::Config;
use crate::errors::{AppError, CameraError, LocationError};
use crate::pipelines::photo::{CaptureMetadataRecord, SaveReceipt, SaveRequest, TimestampSource};
use chrono::{DateTime, Utc};
use cosmic::widget::about::About;
use cosmic::widget::image;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// User action that holds the in-flight guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Capture,
    Save,
}

/// What the camera region of the screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraBranch {
    /// Camera permission not answered yet
    RequestingPermission,
    /// Camera permission denied; no camera UI at all
    NoAccess,
    /// Live viewfinder with the capture control
    Viewfinder,
}

/// Next step after a still capture completed
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureStep {
    /// Image stored; look up the position (the guard stays held)
    Locate,
    /// Image stored; location permission is not granted
    Done,
    /// Capture failed; image and location are unchanged
    Failed(AppError),
}

/// State of the capture screen
#[derive(Debug, Default)]
pub struct ScreenState {
    camera_permission: PermissionState,
    location_permission: PermissionState,
    /// Latest viewfinder frame; `Some` once the camera resource is ready
    viewfinder: Option<Arc<PreviewFrame>>,
    image: Option<ImageRef>,
    location: Option<Position>,
    captured_at: Option<DateTime<Utc>>,
    in_flight: Option<Action>,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera_permission(&self) -> PermissionState {
        self.camera_permission
    }

    pub fn location_permission(&self) -> PermissionState {
        self.location_permission
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn location(&self) -> Option<&Position> {
        self.location.as_ref()
    }

    pub fn in_flight(&self) -> Option<Action> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Record the camera permission answer; later answers are ignored
    pub fn set_camera_permission(&mut self, response: PermissionResponse) -> bool {
        if self.camera_permission.is_resolved() {
            warn!(?response, "Camera permission already resolved, ignoring");
            return false;
        }
        self.camera_permission = response.into();
        true
    }

    /// Record the location permission answer; later answers are ignored
    pub fn set_location_permission(&mut self, response: PermissionResponse) -> bool {
        if self.location_permission.is_resolved() {
            warn!(?response, "Location permission already resolved, ignoring");
            return false;
        }
        self.location_permission = response.into();
        true
    }

    pub fn camera_branch(&self) -> CameraBranch {
        match self.camera_permission {
            PermissionState::Unknown => CameraBranch::RequestingPermission,
            PermissionState::Denied => CameraBranch::NoAccess,
            PermissionState::Granted => CameraBranch::Viewfinder,
        }
    }

    /// Show a new viewfinder frame; frames are dropped without camera access
    pub fn mount_viewfinder(&mut self, frame: Arc<PreviewFrame>) -> bool {
        if self.camera_branch() != CameraBranch::Viewfinder {
            return false;
        }
        self.viewfinder = Some(frame);
        true
    }

    /// The viewfinder pipeline went away
    pub fn unmount_viewfinder(&mut self) {
        self.viewfinder = None;
    }

    pub fn can_capture(&self) -> bool {
        self.camera_branch() == CameraBranch::Viewfinder
            && self.viewfinder.is_some()
            && !self.is_busy()
    }

    /// Whether the save control is shown
    pub fn has_preview(&self) -> bool {
        self.image.is_some()
    }

    pub fn can_save(&self) -> bool {
        self.has_preview() && !self.is_busy()
    }

    /// Start a capture, returning the frame to turn into a still
    ///
    /// Returns `None` and changes nothing when the viewfinder is not ready,
    /// the camera is not granted, or another action is running.
    pub fn begin_capture(&mut self) -> Option<Arc<PreviewFrame>> {
        if !self.can_capture() {
            debug!(
                branch = ?self.camera_branch(),
                ready = self.viewfinder.is_some(),
                in_flight = ?self.in_flight,
                "Capture ignored"
            );
            return None;
        }
        let frame = self.viewfinder.clone()?;
        self.in_flight = Some(Action::Capture);
        Some(frame)
    }

    /// Apply the result of a still capture
    pub fn still_captured(
        &mut self,
        result: Result<ImageRef, CameraError>,
        now: DateTime<Utc>,
    ) -> CaptureStep {
        match result {
            Ok(image) => {
                info!(uri = %image.uri(), "Still stored");
                self.image = Some(image);
                self.location = None;
                self.captured_at = Some(now);
                if self.location_permission.is_granted() {
                    CaptureStep::Locate
                } else {
                    self.in_flight = None;
                    CaptureStep::Done
                }
            }
            Err(e) => {
                self.in_flight = None;
                CaptureStep::Failed(e.into())
            }
        }
    }

    /// Apply the result of the post-capture position lookup
    pub fn located(&mut self, result: Result<Position, LocationError>) -> Result<(), AppError> {
        self.in_flight = None;
        let position = result?;
        debug!(
            latitude = position.latitude,
            longitude = position.longitude,
            "Position stored"
        );
        self.location = Some(position);
        Ok(())
    }

    /// Start a save, returning what to write
    ///
    /// Fails with [`AppError::MissingCaptureData`] unless both an image and a
    /// location are present, and with [`AppError::Busy`] while another action
    /// runs. Neither failure changes the state.
    pub fn begin_save(
        &mut self,
        now: DateTime<Utc>,
        source: TimestampSource,
    ) -> Result<SaveRequest, AppError> {
        if self.is_busy() {
            return Err(AppError::Busy);
        }
        let (Some(image), Some(position)) = (&self.image, &self.location) else {
            return Err(AppError::MissingCaptureData);
        };

        let at = match source {
            TimestampSource::Capture => self.captured_at.unwrap_or(now),
            TimestampSource::Save => now,
        };
        let request = SaveRequest {
            image: image.clone(),
            record: CaptureMetadataRecord::new(at, position, image),
        };
        self.in_flight = Some(Action::Save);
        Ok(request)
    }

    /// Release the guard after a save finished
    pub fn finish_save(
        &mut self,
        result: Result<SaveReceipt, AppError>,
    ) -> Result<SaveReceipt, AppError> {
        self.in_flight = None;
        result
    }
}

/// Modal message shown after an action
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub body: String,
    /// Album to offer opening, set on a successful save
    pub album_path: Option<PathBuf>,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Camera, location and library providers
    pub providers: crate::backends::Providers,
    /// Capture screen state
    pub screen: ScreenState,
    /// Image handle for the latest viewfinder frame
    pub viewfinder_handle: Option<image::Handle>,
    /// Image handle for the captured still
    pub preview_handle: Option<image::Handle>,
    /// Alert dialog currently shown
    pub alert: Option<Alert>,
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open URL in browser
    LaunchUrl(String),
    /// Toggle context drawer page
    ToggleContextPage(ContextPage),

    // ===== Permissions =====
    CameraPermissionResolved(PermissionResponse),
    LocationPermissionResolved(PermissionResponse),

    // ===== Viewfinder =====
    /// New frame from the viewfinder pipeline
    ViewfinderFrame(Arc<PreviewFrame>),
    /// Viewfinder pipeline could not be started (it is retried)
    ViewfinderFailed(String),

    // ===== Capture & Save =====
    /// Capture button pressed
    Capture,
    StillCaptured(Result<ImageRef, CameraError>),
    Located(Result<Position, LocationError>),
    /// Save button pressed
    Save,
    Saved(Result<SaveReceipt, AppError>),

    // ===== Alerts =====
    DismissAlert,
    /// Open the album directory in the file manager
    OpenAlbum(PathBuf),

    // ===== Settings =====
    /// Configuration changed on disk
    UpdateConfig(Config),

    /// No-op message for tasks that report nothing
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn frame() -> Arc<PreviewFrame> {
        Arc::new(PreviewFrame {
            width: 1,
            height: 1,
            data: Arc::from(vec![0u8; 4]),
            captured_at: Instant::now(),
        })
    }

    #[test]
    fn test_permission_is_set_once() {
        let mut screen = ScreenState::new();
        assert!(screen.set_camera_permission(PermissionResponse::Denied));
        assert!(!screen.set_camera_permission(PermissionResponse::Granted));
        assert_eq!(screen.camera_permission(), PermissionState::Denied);
    }

    #[test]
    fn test_frames_dropped_without_camera_access() {
        let mut screen = ScreenState::new();
        assert!(!screen.mount_viewfinder(frame()));
        screen.set_camera_permission(PermissionResponse::Granted);
        assert!(screen.mount_viewfinder(frame()));
        assert!(screen.can_capture());
    }

    #[test]
    fn test_capture_holds_guard_until_located() {
        let mut screen = ScreenState::new();
        screen.set_camera_permission(PermissionResponse::Granted);
        screen.set_location_permission(PermissionResponse::Granted);
        screen.mount_viewfinder(frame());

        assert!(screen.begin_capture().is_some());
        assert_eq!(screen.in_flight(), Some(Action::Capture));
        assert!(screen.begin_capture().is_none());

        let step = screen.still_captured(Ok(ImageRef::new("/tmp/x.jpg")), Utc::now());
        assert_eq!(step, CaptureStep::Locate);
        assert!(screen.is_busy());

        screen.located(Ok(Position::new(1.0, 2.0))).unwrap();
        assert!(!screen.is_busy());
        assert_eq!(screen.location(), Some(&Position::new(1.0, 2.0)));
    }

    #[test]
    fn test_capture_timestamp_source() {
        let mut screen = ScreenState::new();
        screen.set_camera_permission(PermissionResponse::Granted);
        screen.set_location_permission(PermissionResponse::Granted);
        screen.mount_viewfinder(frame());
        screen.begin_capture();

        let captured = Utc::now() - chrono::Duration::seconds(30);
        screen.still_captured(Ok(ImageRef::new("/tmp/x.jpg")), captured);
        screen.located(Ok(Position::new(1.0, 2.0))).unwrap();

        let now = Utc::now();
        let request = screen
            .begin_save(now, TimestampSource::Capture)
            .unwrap();
        assert_eq!(
            request.record.timestamp,
            crate::pipelines::photo::format_timestamp(captured)
        );
    }
}
