// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! ThroomClient and the scoped clients built from it.

use std::collections::{BTreeMap, HashMap};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::SdkConfig;
use crate::error::{Result, SdkError};
use crate::transport::{Query, Transport, decode};
use crate::types::{
    ActivityFilters, ActivityLog, Cluster, ClusterHealthResponse, CreateClusterResponse,
    HealthResponse, LogOptions, MetricsResponse, Row, ServiceConfig, ServiceInfo,
};

const API_PREFIX: &str = "/api/v1";

/// Characters escaped in an identifier placed in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Blocking client for the Throome gateway.
///
/// Every method performs exactly one HTTP round trip and blocks until it
/// completes or the configured timeout expires. Scoped clients returned by
/// [`ThroomClient::cluster`] borrow this client and share its connection pool.
pub struct ThroomClient {
    transport: Transport,
    config: SdkConfig,
}

impl ThroomClient {
    /// Create a client with the given configuration.
    pub fn new(config: SdkConfig) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self { transport, config })
    }

    /// Create a client for the given gateway URL with the default timeout.
    pub fn from_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(SdkConfig::new(base_url))
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(SdkConfig::from_env()?)
    }

    /// Create a client for a gateway on localhost.
    pub fn localhost() -> Result<Self> {
        Self::new(SdkConfig::localhost())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Base URL with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Check gateway health.
    #[instrument(skip(self))]
    pub fn health(&self) -> Result<HealthResponse> {
        debug!("Checking gateway health");
        let data = self.transport.get(&format!("{}/health", API_PREFIX), &Query::new())?;
        decode(data, "HealthResponse")
    }

    // =========================================================================
    // Cluster Management
    // =========================================================================

    /// List all clusters in the order the gateway returns them.
    #[instrument(skip(self))]
    pub fn list_clusters(&self) -> Result<Vec<Cluster>> {
        debug!("Listing clusters");
        let data = self
            .transport
            .get(&format!("{}/clusters", API_PREFIX), &Query::new())?;
        decode(data, "cluster list")
    }

    /// Get one cluster.
    #[instrument(skip(self))]
    pub fn get_cluster(&self, cluster_id: &str) -> Result<Cluster> {
        debug!("Getting cluster");
        let data = self.transport.get(&cluster_path(cluster_id), &Query::new())?;
        decode(data, "Cluster")
    }

    /// Create a cluster from named service configurations.
    ///
    /// Optional connection fields left unset are omitted from the payload.
    #[instrument(skip(self, services), fields(services = services.len()))]
    pub fn create_cluster(
        &self,
        name: &str,
        services: &HashMap<String, ServiceConfig>,
    ) -> Result<CreateClusterResponse> {
        info!("Creating cluster");

        let request = CreateClusterRequest {
            name,
            services: services
                .iter()
                .map(|(service_name, config)| (service_name.as_str(), ServicePayload::from(config)))
                .collect(),
        };

        let data = self
            .transport
            .post(&format!("{}/clusters", API_PREFIX), &request)?;
        let response: CreateClusterResponse = decode(data, "CreateClusterResponse")?;

        info!(cluster_id = %response.cluster_id, "Cluster created");
        Ok(response)
    }

    /// Delete a cluster and its provisioned containers.
    #[instrument(skip(self))]
    pub fn delete_cluster(&self, cluster_id: &str) -> Result<()> {
        info!("Deleting cluster");
        self.transport.delete(&cluster_path(cluster_id))
    }

    /// Activity across all clusters, newest first.
    #[instrument(skip(self))]
    pub fn get_activity(&self, filters: ActivityFilters) -> Result<Vec<ActivityLog>> {
        debug!("Getting activity");
        let data = self
            .transport
            .get(&format!("{}/activity", API_PREFIX), &filters.to_query())?;
        decode(data, "activity list")
    }

    /// Scope subsequent calls to one cluster. No network call.
    pub fn cluster(&self, cluster_id: impl Into<String>) -> ClusterClient<'_> {
        ClusterClient {
            client: self,
            cluster_id: cluster_id.into(),
        }
    }
}

fn cluster_path(cluster_id: &str) -> String {
    format!("{}/clusters/{}", API_PREFIX, segment(cluster_id))
}

fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

#[derive(Serialize)]
struct CreateClusterRequest<'a> {
    name: &'a str,
    services: BTreeMap<&'a str, ServicePayload<'a>>,
}

/// Wire shape of one service; `provision` is not part of the gateway contract.
#[derive(Serialize)]
struct ServicePayload<'a> {
    #[serde(rename = "type")]
    service_type: &'a str,
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'a str>,
}

impl<'a> From<&'a ServiceConfig> for ServicePayload<'a> {
    fn from(config: &'a ServiceConfig) -> Self {
        Self {
            service_type: &config.service_type,
            port: config.port,
            host: config.host.as_deref(),
            username: config.username.as_deref(),
            password: config.password.as_deref(),
            database: config.database.as_deref(),
        }
    }
}

// =========================================================================
// Cluster scope
// =========================================================================

/// Operations on one cluster.
#[derive(Clone)]
pub struct ClusterClient<'a> {
    client: &'a ThroomClient,
    cluster_id: String,
}

impl<'a> ClusterClient<'a> {
    /// Cluster this client is bound to.
    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    /// Health of every service in the cluster.
    #[instrument(skip(self), fields(cluster_id = %self.cluster_id))]
    pub fn health(&self) -> Result<ClusterHealthResponse> {
        debug!("Checking cluster health");
        let data = self
            .client
            .transport
            .get(&self.path("/health"), &Query::new())?;
        decode(data, "ClusterHealthResponse")
    }

    /// Aggregate request metrics.
    #[instrument(skip(self), fields(cluster_id = %self.cluster_id))]
    pub fn metrics(&self) -> Result<MetricsResponse> {
        debug!("Getting cluster metrics");
        let data = self
            .client
            .transport
            .get(&self.path("/metrics"), &Query::new())?;
        decode(data, "MetricsResponse")
    }

    /// Activity within this cluster, newest first.
    #[instrument(skip(self), fields(cluster_id = %self.cluster_id))]
    pub fn get_activity(&self, filters: ActivityFilters) -> Result<Vec<ActivityLog>> {
        debug!("Getting cluster activity");
        let data = self
            .client
            .transport
            .get(&self.path("/activity"), &filters.to_query())?;
        decode(data, "activity list")
    }

    /// Scope to one named service.
    pub fn service(&self, service_name: impl Into<String>) -> ServiceClient<'a> {
        ServiceClient {
            client: self.client,
            cluster_id: self.cluster_id.clone(),
            service_name: service_name.into(),
        }
    }

    /// Database operations.
    pub fn db(&self) -> DbClient<'a> {
        DbClient {
            client: self.client,
            cluster_id: self.cluster_id.clone(),
        }
    }

    /// Cache operations.
    pub fn cache(&self) -> CacheClient<'a> {
        CacheClient {
            client: self.client,
            cluster_id: self.cluster_id.clone(),
        }
    }

    /// Queue operations.
    pub fn queue(&self) -> QueueClient<'a> {
        QueueClient {
            client: self.client,
            cluster_id: self.cluster_id.clone(),
        }
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}{}", cluster_path(&self.cluster_id), suffix)
    }
}

// =========================================================================
// Service scope
// =========================================================================

/// Operations on one service of a cluster.
#[derive(Clone)]
pub struct ServiceClient<'a> {
    client: &'a ThroomClient,
    cluster_id: String,
    service_name: String,
}

impl ServiceClient<'_> {
    /// Cluster this client is bound to.
    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    /// Service this client is bound to.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Service details.
    #[instrument(skip(self), fields(cluster_id = %self.cluster_id, service = %self.service_name))]
    pub fn get_info(&self) -> Result<ServiceInfo> {
        debug!("Getting service info");
        let data = self.client.transport.get(&self.path(""), &Query::new())?;
        decode(data, "ServiceInfo")
    }

    /// Raw container logs, returned verbatim.
    #[instrument(skip(self), fields(cluster_id = %self.cluster_id, service = %self.service_name))]
    pub fn get_logs(&self, options: LogOptions) -> Result<String> {
        debug!("Getting service logs");
        self.client
            .transport
            .request_text(&self.path("/logs"), &options.to_query())
    }

    /// Activity for this service, newest first.
    #[instrument(skip(self), fields(cluster_id = %self.cluster_id, service = %self.service_name))]
    pub fn get_activity(&self, filters: ActivityFilters) -> Result<Vec<ActivityLog>> {
        debug!("Getting service activity");
        let data = self
            .client
            .transport
            .get(&self.path("/activity"), &filters.to_query())?;
        decode(data, "activity list")
    }

    fn path(&self, suffix: &str) -> String {
        format!(
            "{}/services/{}{}",
            cluster_path(&self.cluster_id),
            segment(&self.service_name),
            suffix
        )
    }
}

// =========================================================================
// Database scope
// =========================================================================

/// SQL operations executed by the gateway against the cluster's database.
#[derive(Clone)]
pub struct DbClient<'a> {
    client: &'a ThroomClient,
    cluster_id: String,
}

#[derive(Serialize)]
struct DbRequest<'a> {
    query: &'a str,
    args: &'a [Value],
}

impl DbClient<'_> {
    /// Execute a statement that returns no rows.
    #[instrument(skip(self, args), fields(cluster_id = %self.cluster_id, args = args.len()))]
    pub fn execute(&self, query: &str, args: &[Value]) -> Result<()> {
        debug!("Executing statement");
        self.client
            .transport
            .post(&self.path("/execute"), &DbRequest { query, args })?;
        Ok(())
    }

    /// Run a query and return its rows in order.
    #[instrument(skip(self, args), fields(cluster_id = %self.cluster_id, args = args.len()))]
    pub fn query(&self, query: &str, args: &[Value]) -> Result<Vec<Row>> {
        debug!("Running query");
        let data = self
            .client
            .transport
            .post(&self.path("/query"), &DbRequest { query, args })?;
        let mut result = match data {
            Some(Value::Object(result)) => result,
            _ => {
                return Err(SdkError::UnexpectedResponse(
                    "expected query result object".to_string(),
                ));
            }
        };

        // A query with no matches may come back as `"rows": null`.
        match result.remove("rows") {
            Some(Value::Null) => Ok(Vec::new()),
            Some(rows) => Ok(serde_json::from_value(rows)?),
            None => Err(SdkError::UnexpectedResponse(
                "query result without rows".to_string(),
            )),
        }
    }

    /// Run a query and return its first row.
    pub fn query_row(&self, query: &str, args: &[Value]) -> Result<Row> {
        self.query(query, args)?
            .into_iter()
            .next()
            .ok_or(SdkError::NoRows)
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}/db{}", cluster_path(&self.cluster_id), suffix)
    }
}

// =========================================================================
// Cache scope
// =========================================================================

/// Key/value operations on the cluster's cache.
#[derive(Clone)]
pub struct CacheClient<'a> {
    client: &'a ThroomClient,
    cluster_id: String,
}

#[derive(Serialize)]
struct CacheKeyRequest<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct CacheSetRequest<'a> {
    key: &'a str,
    value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration: Option<u64>,
}

#[derive(Deserialize)]
struct CacheGetResponse {
    value: String,
}

impl CacheClient<'_> {
    /// Read a value.
    #[instrument(skip(self), fields(cluster_id = %self.cluster_id))]
    pub fn get(&self, key: &str) -> Result<String> {
        debug!("Getting cache key");
        let data = self
            .client
            .transport
            .post(&self.path("/get"), &CacheKeyRequest { key })?;
        let response: CacheGetResponse = decode(data, "cache value")?;
        Ok(response.value)
    }

    /// Write a value; `expiration` is in seconds and only sent when positive.
    #[instrument(skip(self, value), fields(cluster_id = %self.cluster_id))]
    pub fn set(&self, key: &str, value: &str, expiration: Option<u64>) -> Result<()> {
        debug!("Setting cache key");
        let request = CacheSetRequest {
            key,
            value,
            expiration: expiration.filter(|secs| *secs > 0),
        };
        self.client.transport.post(&self.path("/set"), &request)?;
        Ok(())
    }

    /// Remove a key.
    #[instrument(skip(self), fields(cluster_id = %self.cluster_id))]
    pub fn delete(&self, key: &str) -> Result<()> {
        debug!("Deleting cache key");
        self.client
            .transport
            .post(&self.path("/delete"), &CacheKeyRequest { key })?;
        Ok(())
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}/cache{}", cluster_path(&self.cluster_id), suffix)
    }
}

// =========================================================================
// Queue scope
// =========================================================================

/// Message operations on the cluster's broker.
#[derive(Clone)]
pub struct QueueClient<'a> {
    client: &'a ThroomClient,
    cluster_id: String,
}

/// Byte fields serialize as JSON integer arrays.
#[derive(Serialize)]
struct PublishRequest<'a> {
    topic: &'a str,
    message: &'a [u8],
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a [u8]>,
}

impl QueueClient<'_> {
    /// Publish a message to a topic.
    #[instrument(skip(self, message), fields(cluster_id = %self.cluster_id, bytes = message.len()))]
    pub fn publish(&self, topic: &str, message: &[u8]) -> Result<()> {
        debug!("Publishing message");
        self.send(PublishRequest {
            topic,
            message,
            key: None,
        })
    }

    /// Publish a message with a partition key.
    #[instrument(skip(self, key, message), fields(cluster_id = %self.cluster_id, bytes = message.len()))]
    pub fn publish_with_key(&self, topic: &str, key: &[u8], message: &[u8]) -> Result<()> {
        debug!("Publishing keyed message");
        self.send(PublishRequest {
            topic,
            message,
            key: Some(key),
        })
    }

    /// Streaming consumption is not offered over the request/response API.
    ///
    /// Always fails with [`SdkError::NotImplemented`] without touching the
    /// network; consume through a direct broker connection instead.
    pub fn subscribe<F>(&self, topic: &str, _handler: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        Err(SdkError::NotImplemented(format!(
            "subscribe to topic '{}' is not supported by the SDK, use a direct Kafka consumer",
            topic
        )))
    }

    fn send(&self, request: PublishRequest<'_>) -> Result<()> {
        let path = format!("{}/queue/publish", cluster_path(&self.cluster_id));
        self.client.transport.post(&path, &request)?;
        Ok(())
    }
}
