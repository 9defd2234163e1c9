// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::CameraFacing;
use crate::backends::location::{LocationAccuracy, LocationOptions};
use crate::backends::media_library::FsMediaLibrary;
use crate::constants::{DEFAULT_ALBUM_NAME, DEFAULT_JPEG_QUALITY, timing};
use crate::pipelines::photo::TimestampSource;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Album that saved images are filed into
    pub album_name: String,
    /// Camera used for the viewfinder
    pub camera_facing: CameraFacing,
    /// Photo library root (None = XDG pictures directory)
    pub library_dir: Option<PathBuf>,
    /// Accuracy requested from the location service
    pub location_accuracy: LocationAccuracy,
    /// Give up on the location fix after this many seconds (None or 0 = no limit)
    pub location_timeout_secs: Option<u64>,
    /// Which moment the metadata timestamp records
    pub metadata_timestamp: TimestampSource,
    /// JPEG quality for captured stills (1-100)
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            album_name: DEFAULT_ALBUM_NAME.to_string(),
            camera_facing: CameraFacing::default(), // Back camera
            library_dir: None,
            location_accuracy: LocationAccuracy::default(),
            location_timeout_secs: Some(timing::LOCATION_TIMEOUT_SECS),
            metadata_timestamp: TimestampSource::default(), // Save time
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// Load the stored configuration for `app_id`
    ///
    /// Falls back to defaults when the config store is unavailable; entries
    /// that fail to parse keep their default values.
    pub fn load(app_id: &str) -> Self {
        match cosmic_config::Config::new(app_id, Self::VERSION) {
            Ok(handler) => match Self::get_entry(&handler) {
                Ok(config) => config,
                Err((errors, config)) => {
                    error!(?errors, "Errors loading config");
                    config
                }
            },
            Err(err) => {
                error!(%err, "Failed to create config handler");
                Self::default()
            }
        }
    }

    /// Options for the post-capture position request
    pub fn location_options(&self) -> LocationOptions {
        LocationOptions {
            accuracy: self.location_accuracy,
            timeout: self
                .location_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    /// Photo library root directory
    pub fn library_root(&self) -> PathBuf {
        self.library_dir
            .clone()
            .unwrap_or_else(FsMediaLibrary::default_root)
    }
}
