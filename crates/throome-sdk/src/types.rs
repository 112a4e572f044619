// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Typed records exchanged with the Throome gateway.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One result row: column name to value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Service kinds the gateway knows how to provision and route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// PostgreSQL database.
    Postgres,
    /// Redis cache.
    Redis,
    /// Kafka message queue.
    Kafka,
}

impl ServiceType {
    /// Wire name used in the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Postgres => "postgres",
            ServiceType::Redis => "redis",
            ServiceType::Kafka => "kafka",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ServiceType> for String {
    fn from(service_type: ServiceType) -> Self {
        service_type.as_str().to_string()
    }
}

// =========================================================================
// Clusters
// =========================================================================

/// Caller-supplied configuration for one service of a new cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service kind, one of the [`ServiceType`] wire names.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Provision a new container when true; connect to an existing service otherwise.
    #[serde(default)]
    pub provision: bool,
    /// Service port.
    pub port: u16,
    /// Host, required when not provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Username, required for databases when not provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password, required for databases when not provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Database name, required for databases when not provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl ServiceConfig {
    /// Create a configuration with the required fields.
    pub fn new(service_type: impl Into<String>, port: u16) -> Self {
        Self {
            service_type: service_type.into(),
            port,
            ..Default::default()
        }
    }

    /// Configuration for a container the gateway provisions itself.
    pub fn provisioned(service_type: impl Into<String>, port: u16) -> Self {
        Self::new(service_type, port).with_provision(true)
    }

    /// Set the provision flag.
    pub fn with_provision(mut self, provision: bool) -> Self {
        self.provision = provision;
        self
    }

    /// Set the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// A service inside a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service name, unique within the cluster.
    pub name: String,
    /// Service kind (`postgres`, `redis`, `kafka`).
    #[serde(rename = "type")]
    pub service_type: String,
    /// Host the gateway connects to.
    pub host: String,
    /// Port the gateway connects to.
    pub port: u16,
    /// Result of the last health check.
    pub healthy: bool,
    /// Database user, for database services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Database name, for database services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Container ID, when the gateway provisioned the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

/// A group of services managed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Gateway-assigned cluster ID.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Creation time as reported by the gateway.
    pub created_at: String,
    /// Services in the order the gateway listed them.
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Cluster {
    /// Find a service by name.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// Result of creating a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClusterResponse {
    /// ID of the new cluster.
    pub cluster_id: String,
    /// Status message from the gateway.
    pub message: String,
}

/// Detailed information about one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name.
    pub name: String,
    /// Service kind (`postgres`, `redis`, `kafka`).
    #[serde(rename = "type")]
    pub service_type: String,
    /// Host the gateway connects to.
    pub host: String,
    /// Port the gateway connects to.
    pub port: u16,
    /// Result of the last health check.
    pub healthy: bool,
    /// Container ID, when the gateway provisioned the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    /// Container status, when the service is provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// =========================================================================
// Health & Metrics
// =========================================================================

/// Gateway health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status, e.g. `healthy`.
    pub status: String,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
}

/// Health of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Whether the service answered its health check.
    pub healthy: bool,
    /// Health check round trip in milliseconds.
    pub response_time: i64,
    /// Failure reason when unhealthy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Health of every service in a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterHealthResponse {
    /// Cluster the report belongs to.
    pub cluster_id: String,
    /// Health per service name.
    pub services: HashMap<String, ServiceHealth>,
}

impl ClusterHealthResponse {
    /// True when every service reported healthy.
    pub fn is_healthy(&self) -> bool {
        self.services.values().all(|s| s.healthy)
    }

    /// Names of unhealthy services, sorted.
    pub fn unhealthy_services(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .services
            .iter()
            .filter(|(_, health)| !health.healthy)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// Aggregate request metrics of a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    /// Requests routed through the cluster.
    pub requests: i64,
    /// Requests that failed.
    pub errors: i64,
    /// Mean response time in milliseconds.
    pub avg_response_ms: f64,
    /// 95th percentile response time in milliseconds.
    pub p95_response_ms: f64,
    /// Services currently up.
    pub active_services: u32,
}

// =========================================================================
// Activity & Logs
// =========================================================================

/// One recorded operation against a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    /// Entry ID.
    pub id: String,
    /// When the operation ran.
    pub timestamp: DateTime<Utc>,
    /// Cluster the operation ran against.
    pub cluster_id: String,
    /// Target service name.
    pub service_name: String,
    /// Target service kind.
    pub service_type: String,
    /// GET, SET, SELECT, PUBLISH, ...
    pub operation: String,
    /// Full command or query text.
    pub command: String,
    /// Bound parameters, in order.
    #[serde(default)]
    pub parameters: Vec<serde_json::Value>,
    /// Duration in milliseconds.
    pub duration: i64,
    /// `success` or `error`.
    pub status: String,
    /// Summary of the result, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Error text for failed operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rows touched by a database statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<i64>,
    /// Caller metadata attached by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_info: Option<HashMap<String, String>>,
}

impl ActivityLog {
    /// True when the operation failed.
    pub fn is_error(&self) -> bool {
        self.status == "error" || self.error.is_some()
    }
}

/// Filters for activity queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFilters {
    /// Maximum entries; `None` or zero leaves the choice to the gateway.
    pub limit: Option<u32>,
}

impl ActivityFilters {
    /// Create empty filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        match self.limit {
            Some(limit) if limit > 0 => vec![("limit", limit.to_string())],
            _ => Vec::new(),
        }
    }
}

/// Options for fetching container logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogOptions {
    /// Last N lines; `None` or zero leaves the choice to the gateway.
    pub tail: Option<u32>,
    /// Prefix each line with its timestamp.
    pub timestamps: bool,
}

impl LogOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of trailing lines.
    pub fn with_tail(mut self, lines: u32) -> Self {
        self.tail = Some(lines);
        self
    }

    /// Enable or disable timestamps.
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(tail) = self.tail.filter(|t| *t > 0) {
            query.push(("tail", tail.to_string()));
        }
        if self.timestamps {
            query.push(("timestamps", "true".to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_wire_names() {
        assert_eq!(serde_json::to_value(ServiceType::Postgres).unwrap(), "postgres");
        assert_eq!(
            serde_json::from_str::<ServiceType>("\"kafka\"").unwrap(),
            ServiceType::Kafka
        );
        assert_eq!(ServiceType::Redis.to_string(), "redis");
        assert_eq!(String::from(ServiceType::Redis), "redis");
    }

    #[test]
    fn test_activity_filters_query() {
        assert!(ActivityFilters::new().to_query().is_empty());
        assert!(ActivityFilters::new().with_limit(0).to_query().is_empty());
        assert_eq!(
            ActivityFilters::new().with_limit(25).to_query(),
            vec![("limit", "25".to_string())]
        );
    }

    #[test]
    fn test_log_options_query() {
        assert!(LogOptions::new().to_query().is_empty());
        assert!(LogOptions::new().with_tail(0).to_query().is_empty());
        assert_eq!(
            LogOptions::new().with_tail(100).with_timestamps(true).to_query(),
            vec![
                ("tail", "100".to_string()),
                ("timestamps", "true".to_string())
            ]
        );
        assert_eq!(
            LogOptions::new().with_timestamps(true).to_query(),
            vec![("timestamps", "true".to_string())]
        );
    }
}
