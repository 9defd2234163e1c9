// SPDX-License-Identifier: GPL-3.0-only

//! Capture controls module

pub mod capture_button;
