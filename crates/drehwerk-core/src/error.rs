// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Drehwerk.

use thiserror::Error;

/// Top-level error type for all Drehwerk operations.
#[derive(Debug, Error)]
pub enum DrehwerkError {
    // -- Platform host --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("no configuration-change subscription registered under {0}")]
    NotSubscribed(String),

    // -- Host runtime --
    #[error("unknown module method: {0}")]
    UnknownMethod(String),

    // -- Configuration / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DrehwerkError>;

/// A configuration orientation code the platform reported but that none of
/// the coarse labels covers. Carries the raw code so the host runtime can
/// still inspect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognized configuration orientation code {0}")]
pub struct UnrecognizedOrientation(pub i32);
