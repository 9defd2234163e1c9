// SPDX-License-Identifier: GPL-3.0-only

//! Capture and save workflows
//!
//! Each step is an async function over the provider traits. The UI runs
//! them as tasks one after another; the headless capture awaits them in
//! sequence.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Viewfinder   │ ──▶ │ Still (JPEG) │ ──▶ │ Position fix │
//! │ frame        │     │ capture dir  │     │ (optional)   │
//! └──────────────┘     └──────┬───────┘     └──────┬───────┘
//!                             └─────────┬──────────┘
//!                                       ▼
//!                     ┌──────────────────────────────────┐
//!                     │ Library asset + album + metadata │
//!                     └──────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: Permission requests, still capture, location and library save

pub mod photo;
