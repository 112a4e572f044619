// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for throome-sdk.

use thiserror::Error;

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors that can occur when talking to the Throome gateway.
///
/// `Api` and `Connection` come from a round trip; every other variant is
/// raised locally and never carries a status code.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The gateway was reached and answered with status >= 400.
    #[error("API error ({status_code}): {message}")]
    Api { status_code: u16, message: String },

    /// The request never completed (timeout, refused connection, DNS failure).
    #[error("connection error: {0}")]
    Connection(String),

    /// `query_row` got an empty result set.
    #[error("no rows returned")]
    NoRows,

    /// Operation the SDK deliberately does not provide.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Successful response without the data the operation needs.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl SdkError {
    /// HTTP status code, present only for gateway rejections.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// True for a 404 from the gateway.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// True when the gateway was never reached.
    pub fn is_connection(&self) -> bool {
        matches!(self, SdkError::Connection(_))
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}
