// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The session-facing error taxonomy.
//!
//! Nothing in this engine is fatal: every failure degrades to "retry
//! later" or "require re-login". Polling code swallows `Transient`
//! internally; the variants here are what synchronous operations
//! (identity, booking, feedback) surface to the initiating actor.

use crate::backend::BackendError;
use thiserror::Error;

/// Errors surfaced to the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Missing or expired credential. Callers must halt dependent
    /// operations and force re-authentication.
    #[error("Session expired: {reason}")]
    Unauthenticated {
        /// Why the session is not usable.
        reason: String,
    },
    /// Rejected input. The message is surfaced verbatim; no retry.
    #[error("{message}")]
    Validation {
        /// Which input was rejected.
        field: String,
        /// The rejection message, verbatim.
        message: String,
    },
    /// Duplicate or overlapping operation. A benign notice, not a crash.
    #[error("{message}")]
    Conflict {
        /// The conflict message.
        message: String,
    },
    /// The backend was unreachable. Retain last-known-good state and
    /// retry later.
    #[error("Temporary backend failure: {message}")]
    Transient {
        /// What went wrong.
        message: String,
    },
    /// Anything else the backend reported.
    #[error("Unexpected backend error: {message}")]
    Backend {
        /// The backend's message.
        message: String,
    },
}

impl EngineError {
    /// Maps a boundary error into the session taxonomy.
    ///
    /// Field-level rejections keep the backend's message verbatim so the
    /// presentation can show exactly what the backend said.
    pub(crate) fn from_backend(err: BackendError, field: &str) -> Self {
        match err {
            BackendError::Transport { message } => Self::Transient { message },
            BackendError::Malformed { message } => Self::Backend { message },
            BackendError::Status { code, message } => match code {
                400 | 422 => Self::Validation {
                    field: field.to_string(),
                    message,
                },
                401 | 403 => Self::Unauthenticated { reason: message },
                409 => Self::Conflict { message },
                _ => Self::Backend { message },
            },
        }
    }
}
