// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles URLs, the context drawer, alerts, opening the album and
//! configuration updates.

use crate::app::state::{Alert, AppModel, ContextPage, Message};
use crate::errors::AppError;
use crate::fl;
use crate::pipelines::photo::SaveReceipt;
use cosmic::Task;
use std::path::PathBuf;
use tracing::{error, info, warn};

impl AppModel {
    // =========================================================================
    // UI Navigation Handlers
    // =========================================================================

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    // =========================================================================
    // Alert Handlers
    // =========================================================================

    pub(crate) fn show_error(&mut self, err: &AppError) {
        warn!(error = %err, "Showing error alert");
        let body = match err {
            AppError::MissingCaptureData => fl!("missing-capture-data"),
            AppError::Location(_) => fl!("location-unavailable", reason = err.to_string()),
            other => other.to_string(),
        };
        self.alert = Some(Alert {
            title: fl!("error-title"),
            body,
            album_path: None,
        });
    }

    pub(crate) fn show_saved(&mut self, receipt: &SaveReceipt) {
        info!(
            asset = %receipt.asset.id,
            album = %receipt.album.title,
            created_album = receipt.created_album,
            "Showing save confirmation"
        );
        self.alert = Some(Alert {
            title: fl!("image-saved-title"),
            body: fl!("image-saved-body"),
            album_path: Some(receipt.album.path.clone()),
        });
    }

    pub(crate) fn handle_dismiss_alert(&mut self) -> Task<cosmic::Action<Message>> {
        self.alert = None;
        Task::none()
    }

    pub(crate) fn handle_open_album(&mut self, path: PathBuf) -> Task<cosmic::Action<Message>> {
        self.alert = None;
        info!(path = %path.display(), "Opening album directory");
        if let Err(e) = open::that(&path) {
            error!(error = %e, path = %path.display(), "Failed to open album directory");
        }
        Task::none()
    }

    // =========================================================================
    // Settings Handlers
    // =========================================================================

    pub(crate) fn handle_update_config(
        &mut self,
        config: crate::config::Config,
    ) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        // Library root and JPEG quality are baked into the providers
        if config.library_dir != self.config.library_dir
            || config.jpeg_quality != self.config.jpeg_quality
        {
            self.providers =
                crate::backends::Providers::system(<Self as cosmic::Application>::APP_ID, &config);
        }
        self.config = config;
        Task::none()
    }
}
