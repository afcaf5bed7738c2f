// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drehwerk: Core orientation types, classifier, and error definitions shared
// across all crates.

pub mod classify;
pub mod config;
pub mod error;
pub mod types;

pub use classify::{classify, classify_surface};
pub use config::BridgeConfig;
pub use error::DrehwerkError;
pub use types::*;
