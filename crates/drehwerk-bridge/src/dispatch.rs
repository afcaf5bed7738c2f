// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Method dispatch for the host runtime's request/response channel.
//
// The host runtime calls module methods by name. Query methods answer through
// an error-first callback that fires exactly once; lock methods are
// fire-and-forget and never call back.

use std::str::FromStr;

use serde_json::{Value, json};
use tracing::debug;

use drehwerk_core::error::{DrehwerkError, Result, UnrecognizedOrientation};
use drehwerk_core::types::{CoarseOrientation, LockState};

use crate::service::OrientationService;

/// A module method the host runtime can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodCall {
    GetOrientation,
    GetSpecificOrientation,
    Lock(LockState),
}

impl MethodCall {
    /// Every method name exported to the host runtime.
    pub const NAMES: [&'static str; 7] = [
        "getOrientation",
        "getSpecificOrientation",
        "lockToPortrait",
        "lockToLandscape",
        "lockToLandscapeLeft",
        "lockToLandscapeRight",
        "unlockAllOrientations",
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::GetOrientation => "getOrientation",
            Self::GetSpecificOrientation => "getSpecificOrientation",
            Self::Lock(LockState::LockedPortrait) => "lockToPortrait",
            Self::Lock(LockState::LockedLandscape) => "lockToLandscape",
            Self::Lock(LockState::LockedLandscapeLeft) => "lockToLandscapeLeft",
            Self::Lock(LockState::LockedLandscapeRight) => "lockToLandscapeRight",
            Self::Lock(LockState::Unlocked) => "unlockAllOrientations",
        }
    }
}

impl FromStr for MethodCall {
    type Err = DrehwerkError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "getOrientation" => Ok(Self::GetOrientation),
            "getSpecificOrientation" => Ok(Self::GetSpecificOrientation),
            "lockToPortrait" => Ok(Self::Lock(LockState::LockedPortrait)),
            "lockToLandscape" => Ok(Self::Lock(LockState::LockedLandscape)),
            "lockToLandscapeLeft" => Ok(Self::Lock(LockState::LockedLandscapeLeft)),
            "lockToLandscapeRight" => Ok(Self::Lock(LockState::LockedLandscapeRight)),
            "unlockAllOrientations" => Ok(Self::Lock(LockState::Unlocked)),
            other => Err(DrehwerkError::UnknownMethod(other.to_owned())),
        }
    }
}

/// Error-first answer to a query method. Exactly one side is ever populated.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Error(Value),
    Success(Value),
}

impl Reply {
    pub fn error(&self) -> Option<&Value> {
        match self {
            Self::Error(value) => Some(value),
            Self::Success(_) => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Error(_) => None,
            Self::Success(value) => Some(value),
        }
    }

    /// Callback arguments in `[error, value]` order, `null` on the empty side.
    pub fn to_args(&self) -> Value {
        match self {
            Self::Error(error) => json!([error, null]),
            Self::Success(value) => json!([null, value]),
        }
    }
}

impl From<std::result::Result<CoarseOrientation, UnrecognizedOrientation>> for Reply {
    fn from(result: std::result::Result<CoarseOrientation, UnrecognizedOrientation>) -> Self {
        match result {
            Ok(orientation) => Self::Success(json!(orientation.as_str())),
            Err(UnrecognizedOrientation(code)) => Self::Error(json!(code)),
        }
    }
}

impl OrientationService {
    /// Run `call`, handing query results to `callback`.
    ///
    /// `callback` runs exactly once for query methods and is dropped unused
    /// for lock methods.
    pub fn dispatch<F>(&self, call: MethodCall, callback: F)
    where
        F: FnOnce(Reply),
    {
        debug!(method = call.name(), "dispatching module method");
        match call {
            MethodCall::GetOrientation => callback(Reply::from(self.orientation())),
            MethodCall::GetSpecificOrientation => {
                callback(Reply::Success(json!(self.specific_orientation().as_str())))
            }
            MethodCall::Lock(lock) => self.lock(lock),
        }
    }

    /// Decode `method` and dispatch it.
    pub fn invoke<F>(&self, method: &str, callback: F) -> Result<()>
    where
        F: FnOnce(Reply),
    {
        let call = method.parse::<MethodCall>()?;
        self.dispatch(call, callback);
        Ok(())
    }
}
