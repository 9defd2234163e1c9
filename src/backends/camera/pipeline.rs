// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer viewfinder pipeline
//!
//! ```text
//! <camera source> ! videoconvert ! video/x-raw,format=RGBA ! appsink
//! ```
//!
//! The source is picked through a `DeviceMonitor`, preferring the camera
//! whose libcamera location matches the requested facing. Frames are pushed
//! into a bounded channel and dropped when the UI falls behind.

use super::types::{CameraDevice, CameraFacing, FrameSender, PreviewFrame};
use crate::constants::{pipeline, timing};
use crate::errors::CameraError;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Live camera pipeline feeding the viewfinder
///
/// The pipeline stops when this value is dropped.
pub struct ViewfinderPipeline {
    pipeline: gstreamer::Pipeline,
    device: CameraDevice,
}

impl ViewfinderPipeline {
    /// Build and start a viewfinder for the camera facing `facing`
    pub fn new(facing: CameraFacing, frame_sender: FrameSender) -> Result<Self, CameraError> {
        gstreamer::init().map_err(|e| CameraError::InitializationFailed(e.to_string()))?;

        let (source, device) = select_source(facing)?;
        info!(device = %device.name, facing = ?device.facing, "Creating viewfinder pipeline");

        let convert = gstreamer::ElementFactory::make("videoconvert")
            .build()
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;

        let caps = gstreamer_video::VideoCapsBuilder::new()
            .format(gstreamer_video::VideoFormat::Rgba)
            .build();
        let appsink = AppSink::builder().name("sink").caps(&caps).build();
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let pipeline = gstreamer::Pipeline::new();
        pipeline
            .add_many([&source, &convert, appsink.upcast_ref()])
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;
        gstreamer::Element::link_many([&source, &convert, appsink.upcast_ref()])
            .map_err(|e| CameraError::InitializationFailed(format!("Failed to link: {}", e)))?;

        let mut frame_sender = frame_sender;
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);
                    let sample = appsink
                        .pull_sample()
                        .map_err(|_| gstreamer::FlowError::Eos)?;

                    let frame = match frame_from_sample(&sample) {
                        Some(frame) => frame,
                        None => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                warn!(frame = frame_num, "Unreadable sample, skipping frame");
                            }
                            return Ok(gstreamer::FlowSuccess::Ok);
                        }
                    };

                    if let Err(e) = frame_sender.try_send(frame) {
                        if e.is_disconnected() {
                            debug!("Viewfinder receiver gone, stopping stream");
                            return Err(gstreamer::FlowError::Eos);
                        }
                        if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                            debug!(frame = frame_num, "Frame dropped (channel full)");
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            CameraError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, _pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, "Pipeline state");
        if result.is_err() {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(CameraError::InitializationFailed(
                "Pipeline failed to reach PLAYING".to_string(),
            ));
        }

        Ok(Self { pipeline, device })
    }

    /// The camera this pipeline reads from
    pub fn device(&self) -> &CameraDevice {
        &self.device
    }
}

impl Drop for ViewfinderPipeline {
    fn drop(&mut self) {
        info!(device = %self.device.name, "Stopping viewfinder pipeline");
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            error!(error = %e, "Failed to stop viewfinder pipeline");
        }
    }
}

/// Pick the source element for `facing`
///
/// Order: device with matching libcamera location, any video source device,
/// then a bare `pipewiresrc` or `v4l2src`.
fn select_source(facing: CameraFacing) -> Result<(gstreamer::Element, CameraDevice), CameraError> {
    let monitor = gstreamer::DeviceMonitor::new();
    monitor.add_filter(Some("Video/Source"), None);

    let devices = match monitor.start() {
        Ok(()) => {
            let devices: Vec<gstreamer::Device> = monitor.devices().into_iter().collect();
            monitor.stop();
            devices
        }
        Err(e) => {
            warn!(error = %e, "Device monitor unavailable");
            Vec::new()
        }
    };
    debug!(count = devices.len(), "Video source devices");

    let facing_of = |device: &gstreamer::Device| -> Option<CameraFacing> {
        let location = device
            .properties()?
            .get::<String>("api.libcamera.location")
            .ok()?;
        match location.as_str() {
            "back" => Some(CameraFacing::Back),
            "front" => Some(CameraFacing::Front),
            _ => None,
        }
    };

    let preferred = devices
        .iter()
        .find(|device| facing_of(device) == Some(facing))
        .or_else(|| {
            if !devices.is_empty() {
                warn!(%facing, "No camera with requested facing, using first camera");
            }
            devices.first()
        });

    if let Some(device) = preferred {
        let element = device
            .create_element(None)
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;
        return Ok((
            element,
            CameraDevice {
                name: device.display_name().to_string(),
                facing: facing_of(device),
            },
        ));
    }

    for factory in pipeline::FALLBACK_SOURCES {
        if let Ok(element) = gstreamer::ElementFactory::make(factory).build() {
            info!(source = factory, "No camera devices listed, using default source");
            return Ok((
                element,
                CameraDevice {
                    name: format!("Default Camera ({})", factory),
                    facing: None,
                },
            ));
        }
    }

    Err(CameraError::InitializationFailed(
        "No camera source available".to_string(),
    ))
}

/// Copy an RGBA sample into a tightly packed frame
fn frame_from_sample(sample: &gstreamer::Sample) -> Option<PreviewFrame> {
    let buffer = sample.buffer()?;
    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
        return None;
    }
    let info = VideoInfo::from_caps(sample.caps()?).ok()?;
    let map = buffer.map_readable().ok()?;

    let width = info.width();
    let height = info.height();
    let stride = usize::try_from(info.stride()[0]).ok()?;
    let data = pack_rows(map.as_slice(), width as usize * 4, stride, height as usize)?;

    Some(PreviewFrame {
        width,
        height,
        data,
        captured_at: Instant::now(),
    })
}

/// Strip row padding; `None` if the buffer is shorter than the frame
fn pack_rows(src: &[u8], row_bytes: usize, stride: usize, rows: usize) -> Option<Arc<[u8]>> {
    if stride < row_bytes || rows == 0 {
        return None;
    }
    let needed = stride * (rows - 1) + row_bytes;
    if src.len() < needed {
        return None;
    }
    if stride == row_bytes {
        return Some(Arc::from(&src[..row_bytes * rows]));
    }

    let mut packed = Vec::with_capacity(row_bytes * rows);
    for row in 0..rows {
        let start = row * stride;
        packed.extend_from_slice(&src[start..start + row_bytes]);
    }
    Some(Arc::from(packed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rows_removes_padding() {
        // 2 rows of 4 bytes with 2 bytes of padding each
        let src = [1, 2, 3, 4, 0, 0, 5, 6, 7, 8, 0, 0];
        let packed = pack_rows(&src, 4, 6, 2).unwrap();
        assert_eq!(&*packed, &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pack_rows_tight_buffer() {
        let src = [9u8; 8];
        let packed = pack_rows(&src, 4, 4, 2).unwrap();
        assert_eq!(packed.len(), 8);
    }

    #[test]
    fn test_pack_rows_rejects_short_buffer() {
        assert!(pack_rows(&[0u8; 5], 4, 4, 2).is_none());
        assert!(pack_rows(&[0u8; 8], 4, 2, 2).is_none());
    }
}
