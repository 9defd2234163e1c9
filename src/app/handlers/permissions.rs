// SPDX-License-Identifier: GPL-3.0-only

//! Permission handlers
//!
//! Camera access is requested from `init`; its answer triggers the location
//! request. Each answer is recorded once and never re-queried.

use crate::app::state::{AppModel, Message};
use crate::backends::types::PermissionResponse;
use crate::pipelines::photo;
use cosmic::Task;
use std::sync::Arc;
use tracing::info;

impl AppModel {
    pub(crate) fn handle_camera_permission_resolved(
        &mut self,
        response: PermissionResponse,
    ) -> Task<cosmic::Action<Message>> {
        if !self.screen.set_camera_permission(response) {
            return Task::none();
        }
        info!(state = %self.screen.camera_permission(), "Camera permission stored");

        let location = Arc::clone(&self.providers.location);
        Task::perform(
            async move { photo::request_location_permission(location.as_ref()).await },
            |response| cosmic::Action::App(Message::LocationPermissionResolved(response)),
        )
    }

    pub(crate) fn handle_location_permission_resolved(
        &mut self,
        response: PermissionResponse,
    ) -> Task<cosmic::Action<Message>> {
        if self.screen.set_location_permission(response) {
            info!(state = %self.screen.location_permission(), "Location permission stored");
        }
        Task::none()
    }
}
