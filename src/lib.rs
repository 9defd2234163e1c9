// SPDX-License-Identifier: GPL-3.0-only

//! GeoCam - capture photos tagged with their location
//!
//! A single-screen camera application for the COSMIC desktop: it asks for
//! camera and location access, shows a live viewfinder, captures a still,
//! tags it with the current position and a timestamp, and files it into the
//! "Camera" album of the photo library.
//!
//! # Architecture
//!
//! - [`app`]: Application shell, screen state and UI
//! - [`backends`]: Camera, location and photo library providers
//! - [`pipelines`]: Capture and save workflows over the providers
//! - [`config`]: User configuration handling
//! - [`errors`]: Error types
//!
//! # Example
//!
//! ```ignore
//! // GUI:
//! // geocam
//! // Headless capture into the "Camera" album:
//! // geocam capture
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod pipelines;

// Re-export commonly used types
pub use app::{AppModel, Message, ScreenState};
pub use config::Config;
pub use errors::AppError;
