// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Return the application data directory. Not created; a missing directory
/// just means no config file.
pub fn data_dir() -> PathBuf {
    dirs_fallback().join("drehwerk")
}

/// Default location of the bridge config file.
pub fn config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

fn dirs_fallback() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from("/tmp")
}
