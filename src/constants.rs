// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Album that saved images are filed into
pub const DEFAULT_ALBUM_NAME: &str = "Camera";

/// JPEG quality for captured stills (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Repository shown in the About page
pub const REPOSITORY: &str = "https://github.com/geocam/geocam";

/// UI layout constants
pub mod ui {
    /// Screen padding around the content
    pub const SCREEN_PADDING: u16 = 16;

    /// Height of the viewfinder region
    pub const VIEWFINDER_HEIGHT: f32 = 400.0;

    /// Width and height of the post-capture preview
    pub const PREVIEW_SIZE: f32 = 200.0;

    /// Corner radius of the post-capture preview
    pub const PREVIEW_RADIUS: f32 = 8.0;

    /// Outer size of the capture button
    pub const CAPTURE_BUTTON_OUTER: f32 = 60.0;

    /// Inner size of the capture button
    pub const CAPTURE_BUTTON_INNER: f32 = 50.0;

    /// Corner radius of the capture button (circular)
    pub const CAPTURE_BUTTON_RADIUS: f32 = 25.0;

    /// Distance between the capture button and the bottom of the viewfinder
    pub const CAPTURE_BUTTON_BOTTOM_OFFSET: u16 = 20;

    /// Spacing between the viewfinder and the preview section
    pub const SECTION_SPACING: u16 = 20;

    /// Text size for permission and status messages
    pub const STATUS_TEXT_SIZE: u16 = 18;

    /// Screen background (#F4F4F9)
    pub const BACKGROUND_RGB: (u8, u8, u8) = (0xF4, 0xF4, 0xF9);

    /// Viewfinder placeholder background
    pub const VIEWFINDER_PLACEHOLDER_RGB: (u8, u8, u8) = (0x20, 0x20, 0x24);
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Max buffers queued in appsink before old frames are dropped
    pub const MAX_BUFFERS: u32 = 2;

    /// Source elements tried when no camera device is listed
    pub const FALLBACK_SOURCES: &[&str] = &["pipewiresrc", "v4l2src"];

    /// Frames buffered between the pipeline and the viewfinder subscription
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;
}

/// Timing constants
pub mod timing {
    use std::time::Duration;

    /// Log every Nth frame
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Max seconds to wait for the pipeline to reach PLAYING
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Default limit for the post-capture location fix
    pub const LOCATION_TIMEOUT_SECS: u64 = 30;

    /// Delay before a failed viewfinder pipeline is recreated
    pub const VIEWFINDER_RETRY: Duration = Duration::from_secs(5);

    /// How long the headless capture waits for the first usable frame
    pub const CLI_FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(10);

    /// Frames discarded by the headless capture while exposure settles
    pub const CLI_WARMUP_FRAMES: usize = 10;
}
