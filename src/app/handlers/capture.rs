// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles viewfinder frames, still capture, the post-capture position
//! lookup and saving into the photo library. Every step is started only
//! after the previous step's message arrived; the screen state holds the
//! in-flight guard in between.

use crate::app::state::{AppModel, CaptureStep, Message};
use crate::backends::camera::{ImageRef, PreviewFrame};
use crate::backends::location::Position;
use crate::errors::{AppError, CameraError, LocationError};
use crate::pipelines::photo::{self, SaveReceipt};
use cosmic::Task;
use cosmic::widget::image;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Viewfinder Handlers
    // =========================================================================

    pub(crate) fn handle_viewfinder_frame(
        &mut self,
        frame: Arc<PreviewFrame>,
    ) -> Task<cosmic::Action<Message>> {
        if self.screen.mount_viewfinder(Arc::clone(&frame)) {
            self.viewfinder_handle = Some(image::Handle::from_rgba(
                frame.width,
                frame.height,
                frame.data.to_vec(),
            ));
        }
        Task::none()
    }

    pub(crate) fn handle_viewfinder_failed(&mut self, error: String) -> Task<cosmic::Action<Message>> {
        warn!(error = %error, "Viewfinder unavailable");
        self.screen.unmount_viewfinder();
        self.viewfinder_handle = None;
        Task::none()
    }

    // =========================================================================
    // Capture Handlers
    // =========================================================================

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(frame) = self.screen.begin_capture() else {
            return Task::none();
        };
        info!(width = frame.width, height = frame.height, "Capturing still");

        let camera = Arc::clone(&self.providers.camera);
        Task::perform(
            async move { photo::take_still(camera.as_ref(), frame).await },
            |result| cosmic::Action::App(Message::StillCaptured(result)),
        )
    }

    pub(crate) fn handle_still_captured(
        &mut self,
        result: Result<ImageRef, CameraError>,
    ) -> Task<cosmic::Action<Message>> {
        let previous = self.screen.image().cloned();
        match self.screen.still_captured(result, chrono::Utc::now()) {
            CaptureStep::Locate => {
                self.refresh_preview();
                let location = Arc::clone(&self.providers.location);
                let options = self.config.location_options();
                debug!(?options, "Requesting position for capture");
                let locate = Task::perform(
                    async move { photo::locate(location.as_ref(), options).await },
                    |result| cosmic::Action::App(Message::Located(result)),
                );
                Task::batch([locate, self.discard_replaced(previous)])
            }
            CaptureStep::Done => {
                self.refresh_preview();
                info!("Capture stored without location (permission not granted)");
                self.discard_replaced(previous)
            }
            CaptureStep::Failed(err) => {
                self.show_error(&err);
                Task::none()
            }
        }
    }

    pub(crate) fn handle_located(
        &mut self,
        result: Result<Position, LocationError>,
    ) -> Task<cosmic::Action<Message>> {
        if let Err(err) = self.screen.located(result) {
            self.show_error(&err);
        }
        Task::none()
    }

    /// Drop the still that the new capture replaced
    fn discard_replaced(&self, previous: Option<ImageRef>) -> Task<cosmic::Action<Message>> {
        let Some(previous) = previous.filter(|p| self.screen.image() != Some(p)) else {
            return Task::none();
        };
        let camera = Arc::clone(&self.providers.camera);
        Task::perform(
            async move { photo::discard_still(camera.as_ref(), previous).await },
            |_| cosmic::Action::App(Message::Noop),
        )
    }

    fn refresh_preview(&mut self) {
        self.preview_handle = self
            .screen
            .image()
            .map(|image| image::Handle::from_path(image.path()));
    }

    // =========================================================================
    // Save Handlers
    // =========================================================================

    pub(crate) fn handle_save(&mut self) -> Task<cosmic::Action<Message>> {
        let request = match self
            .screen
            .begin_save(chrono::Utc::now(), self.config.metadata_timestamp)
        {
            Ok(request) => request,
            Err(AppError::Busy) => {
                debug!("Save ignored while another action is running");
                return Task::none();
            }
            Err(err) => {
                self.show_error(&err);
                return Task::none();
            }
        };

        let library = Arc::clone(&self.providers.library);
        let album_name = self.config.album_name.clone();
        Task::perform(
            async move { photo::store(library.as_ref(), request, &album_name).await },
            |result| cosmic::Action::App(Message::Saved(result)),
        )
    }

    pub(crate) fn handle_saved(
        &mut self,
        result: Result<SaveReceipt, AppError>,
    ) -> Task<cosmic::Action<Message>> {
        match self.screen.finish_save(result) {
            Ok(receipt) => self.show_saved(&receipt),
            Err(err) => self.show_error(&err),
        }
        Task::none()
    }
}
