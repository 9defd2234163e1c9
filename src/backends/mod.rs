// SPDX-License-Identifier: GPL-3.0-only

//! Host capability providers
//!
//! The capture screen talks to three platform capabilities, each behind an
//! object-safe trait so the screen logic can run against test doubles:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  App Layer                  │
//! └────────────────────┬────────────────────────┘
//!                      │ Providers
//! ┌────────────────────┴────────────────────────┐
//! │  ┌────────────┐ ┌────────────┐ ┌─────────┐  │
//! │  │   Camera   │ │  Location  │ │ Library │  │
//! │  │  (portal + │ │ (GeoClue2) │ │  (XDG   │  │
//! │  │ GStreamer) │ │            │ │pictures)│  │
//! │  └────────────┘ └────────────┘ └─────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Camera permission, viewfinder pipeline and still capture
//! - [`location`]: Location permission and position lookup
//! - [`media_library`]: Assets and albums in the photo library
//! - [`types`]: Permission types shared by the providers

pub mod camera;
pub mod location;
pub mod media_library;
pub mod types;

use crate::config::Config;
use camera::{CameraProvider, PortalCamera};
use location::{GeoClueLocation, LocationProvider};
use media_library::{FsMediaLibrary, MediaLibrary};
use std::sync::Arc;

/// The set of providers the capture screen works against
#[derive(Clone)]
pub struct Providers {
    pub camera: Arc<dyn CameraProvider>,
    pub location: Arc<dyn LocationProvider>,
    pub library: Arc<dyn MediaLibrary>,
}

impl Providers {
    /// Providers backed by the desktop: camera portal, GeoClue2 and the
    /// filesystem photo library
    pub fn system(app_id: &str, config: &Config) -> Self {
        Self {
            camera: Arc::new(PortalCamera::new(
                PortalCamera::default_capture_dir(),
                config.jpeg_quality,
            )),
            location: Arc::new(GeoClueLocation::new(app_id)),
            library: Arc::new(FsMediaLibrary::new(config.library_root())),
        }
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}
