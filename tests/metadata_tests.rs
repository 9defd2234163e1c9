// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the capture metadata record

use chrono::{TimeZone, Utc};
use geocam::app::ScreenState;
use geocam::backends::camera::{ImageRef, PreviewFrame};
use geocam::backends::location::Position;
use geocam::backends::types::PermissionResponse;
use geocam::pipelines::photo::{CaptureMetadataRecord, TimestampSource};
use std::sync::Arc;
use std::time::Instant;

#[test]
fn test_record_for_fixed_inputs() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    let record = CaptureMetadataRecord::new(
        at,
        &Position::new(37.0, -122.0),
        &ImageRef::new("/tmp/a.jpg"),
    );

    assert_eq!(
        record,
        CaptureMetadataRecord {
            timestamp: "2024-05-01T12:30:00.000Z".to_string(),
            latitude: 37.0,
            longitude: -122.0,
            uri: "file:///tmp/a.jpg".to_string(),
        }
    );

    let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
    assert_eq!(json["timestamp"], "2024-05-01T12:30:00.000Z");
    assert_eq!(json["latitude"], 37.0);
    assert_eq!(json["longitude"], -122.0);
    assert_eq!(json["uri"], "file:///tmp/a.jpg");
}

#[test]
fn test_save_builds_record_from_screen_state() {
    let mut screen = ScreenState::new();
    screen.set_camera_permission(PermissionResponse::Granted);
    screen.set_location_permission(PermissionResponse::Granted);
    screen.mount_viewfinder(Arc::new(PreviewFrame {
        width: 1,
        height: 1,
        data: Arc::from(vec![0u8; 4]),
        captured_at: Instant::now(),
    }));

    let captured_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    let saved_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 31, 15).unwrap();

    screen.begin_capture().unwrap();
    screen.still_captured(Ok(ImageRef::new("/tmp/c.jpg")), captured_at);
    screen.located(Ok(Position::new(1.5, -2.25))).unwrap();

    let request = screen.begin_save(saved_at, TimestampSource::Save).unwrap();
    assert_eq!(request.record.timestamp, "2024-05-01T12:31:15.000Z");
    assert_eq!(request.record.latitude, 1.5);
    assert_eq!(request.record.longitude, -2.25);
    assert_eq!(request.record.uri, "file:///tmp/c.jpg");
    assert_eq!(request.image, ImageRef::new("/tmp/c.jpg"));
}
