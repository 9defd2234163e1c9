// SPDX-License-Identifier: GPL-3.0-only

//! Capture metadata record
//!
//! The record is built when an image is saved and written to the log once
//! the library accepted the image:
//!
//! ```json
//! {"timestamp":"2024-05-01T12:30:00.000Z","latitude":52.52,"longitude":13.405,"uri":"file:///..."}
//! ```

use crate::backends::camera::ImageRef;
use crate::backends::location::Position;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Which moment the record's timestamp describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampSource {
    /// When the still was captured
    Capture,
    /// When the save was requested
    #[default]
    Save,
}

/// Metadata attached to a saved image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadataRecord {
    /// ISO-8601 UTC with millisecond precision
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Reference of the captured image
    pub uri: String,
}

impl CaptureMetadataRecord {
    pub fn new(at: DateTime<Utc>, position: &Position, image: &ImageRef) -> Self {
        Self {
            timestamp: format_timestamp(at),
            latitude: position.latitude,
            longitude: position.longitude,
            uri: image.uri(),
        }
    }

    /// Serialize as a single-line JSON object
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_has_millis_and_z() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(at), "2024-05-01T12:30:00.000Z");

        let at = at + chrono::Duration::milliseconds(1234);
        assert_eq!(format_timestamp(at), "2024-05-01T12:30:01.234Z");
    }

    #[test]
    fn test_json_field_order() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let record = CaptureMetadataRecord::new(
            at,
            &Position::new(52.5, 13.25),
            &ImageRef::new("/tmp/a.jpg"),
        );
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"timestamp":"2024-05-01T12:30:00.000Z","latitude":52.5,"longitude":13.25,"uri":"file:///tmp/a.jpg"}"#
        );
    }
}
