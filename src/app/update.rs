// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function is a dispatcher; the handlers live in the
//! `handlers` submodules grouped by concern.
//!
//! # Handler Modules
//!
//! - `handlers::permissions`: Camera and location permission answers
//! - `handlers::capture`: Viewfinder frames, capture, location and save
//! - `handlers::system`: URLs, context drawer, alerts, album and config

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Permissions =====
            Message::CameraPermissionResolved(response) => {
                self.handle_camera_permission_resolved(response)
            }
            Message::LocationPermissionResolved(response) => {
                self.handle_location_permission_resolved(response)
            }

            // ===== Viewfinder =====
            Message::ViewfinderFrame(frame) => self.handle_viewfinder_frame(frame),
            Message::ViewfinderFailed(error) => self.handle_viewfinder_failed(error),

            // ===== Capture & Save =====
            Message::Capture => self.handle_capture(),
            Message::StillCaptured(result) => self.handle_still_captured(result),
            Message::Located(result) => self.handle_located(result),
            Message::Save => self.handle_save(),
            Message::Saved(result) => self.handle_saved(result),

            // ===== Alerts =====
            Message::DismissAlert => self.handle_dismiss_alert(),
            Message::OpenAlbum(path) => self.handle_open_album(path),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),

            Message::Noop => Task::none(),
        }
    }
}
