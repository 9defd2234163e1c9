// SPDX-License-Identifier: GPL-3.0-only

//! Main application module
//!
//! # Architecture
//!
//! - `state`: Screen state record, `AppModel` and `Message`
//! - `capture_screen`: Viewfinder, capture control, preview and save control
//! - `controls`: Capture button
//! - `handlers`: Message handlers grouped by concern
//! - `view`: Root container
//! - `update`: Message dispatcher

mod capture_screen;
mod controls;
mod handlers;
mod state;
mod update;
mod view;

use crate::backends::Providers;
use crate::backends::camera::ViewfinderPipeline;
use crate::config::Config;
use crate::constants::{REPOSITORY, pipeline, timing};
use crate::fl;
use crate::pipelines::photo;
use cosmic::app::context_drawer;
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{
    Action, Alert, AppModel, CameraBranch, CaptureStep, ContextPage, Message, ScreenState,
};
use std::sync::Arc;
use tracing::{error, info, warn};

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.geocam.GeoCam";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application and asks for camera access.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_name("camera-photo-symbolic"))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let config = Config::load(Self::APP_ID);
        info!(
            album = %config.album_name,
            facing = %config.camera_facing,
            library = %config.library_root().display(),
            "Configuration loaded"
        );

        // Initialize GStreamer before the viewfinder subscription starts
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let providers = Providers::system(Self::APP_ID, &config);

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            providers,
            screen: ScreenState::new(),
            viewfinder_handle: None,
            preview_handle: None,
            alert: None,
        };

        // Camera first; location is requested once the camera answer arrives
        let camera = Arc::clone(&app.providers.camera);
        let permission_task = Task::perform(
            async move { photo::request_camera_permission(camera.as_ref()).await },
            |response| cosmic::Action::App(Message::CameraPermissionResolved(response)),
        );

        (app, permission_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
        })
    }

    /// Alert shown after a capture or save.
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        let alert = self.alert.as_ref()?;

        let mut dialog = widget::dialog()
            .title(alert.title.as_str())
            .body(alert.body.as_str())
            .primary_action(
                widget::button::suggested(fl!("ok")).on_press(Message::DismissAlert),
            );

        if let Some(path) = &alert.album_path {
            dialog = dialog.secondary_action(
                widget::button::standard(fl!("show-in-album"))
                    .on_press(Message::OpenAlbum(path.clone())),
            );
        }

        Some(dialog.into())
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // The viewfinder only exists once camera access is granted
        if self.screen.camera_branch() != CameraBranch::Viewfinder {
            return config_sub;
        }

        let facing = self.config.camera_facing;
        let viewfinder_sub = Subscription::run_with_id(
            ("viewfinder", facing),
            cosmic::iced::stream::channel(100, move |mut output| async move {
                use cosmic::iced::futures::{SinkExt, StreamExt};

                info!(%facing, "Viewfinder subscription started");
                let mut frame_count = 0u64;

                loop {
                    let (sender, mut receiver) =
                        futures::channel::mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);

                    let failure = match ViewfinderPipeline::new(facing, sender) {
                        Ok(viewfinder) => {
                            info!(device = %viewfinder.device().name, "Waiting for frames from pipeline...");
                            while let Some(frame) = receiver.next().await {
                                frame_count += 1;
                                if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                    info!(
                                        frame = frame_count,
                                        width = frame.width,
                                        height = frame.height,
                                        latency_ms = frame.captured_at.elapsed().as_millis() as u64,
                                        "Received frame from pipeline"
                                    );
                                }

                                // Dropping frames is fine for a live preview
                                if let Err(e) =
                                    output.try_send(Message::ViewfinderFrame(Arc::new(frame)))
                                    && e.is_disconnected()
                                {
                                    info!("Output channel closed - viewfinder subscription ending");
                                    return;
                                }
                            }
                            drop(viewfinder);
                            "viewfinder stream ended".to_string()
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to initialize viewfinder pipeline");
                            e.to_string()
                        }
                    };

                    if output.send(Message::ViewfinderFailed(failure)).await.is_err() {
                        return;
                    }
                    warn!(
                        retry_secs = timing::VIEWFINDER_RETRY.as_secs(),
                        "Recreating viewfinder pipeline after delay"
                    );
                    tokio::time::sleep(timing::VIEWFINDER_RETRY).await;
                }
            }),
        );

        Subscription::batch([config_sub, viewfinder_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
