// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the Throome client.

use std::time::Duration;

use crate::error::{Result, SdkError};

const DEFAULT_BASE_URL: &str = "http://localhost:9000";
const DEFAULT_TIMEOUT_MS: u64 = 120_000;

/// Configuration for the ThroomClient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkConfig {
    /// Base URL of the gateway, e.g. `http://localhost:9000`.
    pub base_url: String,
    /// Timeout applied to each whole request.
    pub timeout: Duration,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl SdkConfig {
    /// Create a configuration for the given gateway URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create a configuration for a gateway on localhost.
    pub fn localhost() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `THROOME_GATEWAY_URL`: Gateway base URL (default: "http://localhost:9000")
    /// - `THROOME_REQUEST_TIMEOUT_MS`: Request timeout in milliseconds (default: 120000)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("THROOME_GATEWAY_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_ms: u64 = match std::env::var("THROOME_REQUEST_TIMEOUT_MS") {
            Ok(raw) => raw.trim().parse().map_err(|e| {
                SdkError::Config(format!("invalid THROOME_REQUEST_TIMEOUT_MS: {}", e))
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Set the gateway base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the values and return the base URL without trailing slashes.
    pub(crate) fn normalized_base_url(&self) -> Result<String> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(SdkError::Config("base URL is empty".to_string()));
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(SdkError::Config(format!(
                "base URL must start with http:// or https://: {}",
                trimmed
            )));
        }
        if self.timeout.is_zero() {
            return Err(SdkError::Config("timeout must be greater than zero".to_string()));
        }

        Ok(trimmed.trim_end_matches('/').to_string())
    }
}
