// SPDX-License-Identifier: GPL-3.0-only

//! Message handler modules
//!
//! Handlers are organized by functional domain, keeping related
//! functionality together.

pub mod capture;
pub mod permissions;
pub mod system;
