// SPDX-License-Identifier: GPL-3.0-only

//! Photo workflow
//!
//! - [`capture`]: Permission requests, still capture and position lookup
//! - [`metadata`]: The metadata record attached to a saved image
//! - [`save`]: Filing a captured image into the photo library

pub mod capture;
pub mod metadata;
pub mod save;

pub use capture::{
    discard_still, locate, request_camera_permission, request_location_permission, take_still,
};
pub use metadata::{CaptureMetadataRecord, TimestampSource, format_timestamp};
pub use save::{SaveReceipt, SaveRequest, store};
