// SPDX-License-Identifier: GPL-3.0-only

//! Headless capture
//!
//! Runs the capture screen's sequence without a window: camera permission,
//! location permission, viewfinder, still capture, position lookup and save,
//! all through the same [`ScreenState`] the GUI uses.

use chrono::Utc;
use futures::StreamExt;
use futures::channel::mpsc;
use geocam::app::{CameraBranch, CaptureStep, ScreenState};
use geocam::backends::Providers;
use geocam::backends::camera::{CameraFacing, PreviewFrame, ViewfinderPipeline};
use geocam::config::Config;
use geocam::constants::{pipeline, timing};
use geocam::errors::CameraError;
use geocam::AppModel;
use geocam::pipelines::photo;
use std::sync::Arc;
use tracing::{info, warn};

/// Capture one photo, tag it with the current position and save it
pub fn capture(album: Option<String>, front: bool) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let app_id = <AppModel as cosmic::Application>::APP_ID;
    let mut config = Config::load(app_id);
    if let Some(album) = album {
        config.album_name = album;
    }
    if front {
        config.camera_facing = CameraFacing::Front;
    }
    let providers = Providers::system(app_id, &config);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(&providers, &config))
}

async fn run(providers: &Providers, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = ScreenState::new();

    screen.set_camera_permission(
        photo::request_camera_permission(providers.camera.as_ref()).await,
    );
    if screen.camera_branch() != CameraBranch::Viewfinder {
        return Err("No access to camera".into());
    }
    screen.set_location_permission(
        photo::request_location_permission(providers.location.as_ref()).await,
    );
    println!("Location access: {}", screen.location_permission());

    println!("Starting camera...");
    let (sender, receiver) = mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);
    let viewfinder = ViewfinderPipeline::new(config.camera_facing, sender)?;
    println!("Using camera: {}", viewfinder.device().name);

    let frame = settled_frame(receiver).await?;
    screen.mount_viewfinder(Arc::new(frame));

    let frame = screen.begin_capture().ok_or(CameraError::NotReady)?;
    let result = photo::take_still(providers.camera.as_ref(), frame).await;
    drop(viewfinder);

    match screen.still_captured(result, Utc::now()) {
        CaptureStep::Locate => {
            println!("Locating...");
            let result = photo::locate(providers.location.as_ref(), config.location_options()).await;
            if let Err(e) = screen.located(result) {
                warn!(error = %e, "Location lookup failed");
            }
        }
        CaptureStep::Done => {}
        CaptureStep::Failed(e) => return Err(e.into()),
    }
    if let Some(image) = screen.image() {
        println!("Captured: {}", image.path().display());
    }

    let request = screen.begin_save(Utc::now(), config.metadata_timestamp)?;
    let result = photo::store(providers.library.as_ref(), request, &config.album_name).await;
    let receipt = screen.finish_save(result)?;
    if let Some(image) = screen.image() {
        photo::discard_still(providers.camera.as_ref(), image.clone()).await;
    }

    println!(
        "Image saved to album \"{}\": {}",
        receipt.album.title,
        receipt.album.path.display()
    );
    println!("Metadata: {}", receipt.record.to_json()?);
    Ok(())
}

/// Wait for the camera to deliver frames and return one taken after warm-up
async fn settled_frame(
    mut receiver: mpsc::Receiver<PreviewFrame>,
) -> Result<PreviewFrame, CameraError> {
    let mut latest = None;
    for seen in 0..=timing::CLI_WARMUP_FRAMES {
        match tokio::time::timeout(timing::CLI_FIRST_FRAME_TIMEOUT, receiver.next()).await {
            Ok(Some(frame)) => latest = Some(frame),
            Ok(None) => break,
            Err(_) => {
                warn!(frames = seen, "Timed out waiting for camera frames");
                break;
            }
        }
    }

    let frame = latest.ok_or(CameraError::NotReady)?;
    info!(width = frame.width, height = frame.height, "Frame selected for capture");
    Ok(frame)
}
