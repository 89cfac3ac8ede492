// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by the persistence core. None of these are fatal to the
/// process: `Validation`/`NotFound`/`Constraint` go back to the caller for
/// correction, `Sync` leaves the affected rows dirty for the next push.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("sync: {0}")]
    Sync(String),

    #[error(transparent)]
    Db(rusqlite::Error),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn sync(msg: impl Into<String>) -> Self {
        Self::Sync(msg.into())
    }
}

// SQLite-level constraint failures (foreign keys, CHECKs, the protected
// category trigger) are their own recoverable kind, not generic DB errors.
impl From<rusqlite::Error> for CoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(f, Some(msg))
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                CoreError::Constraint(msg)
            }
            other => CoreError::Db(other),
        }
    }
}
