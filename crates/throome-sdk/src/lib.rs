// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Throome SDK
//!
//! Blocking client for the Throome gateway's HTTP/JSON API.
//!
//! The gateway manages clusters of databases, caches and queues. This crate
//! turns each gateway endpoint into a typed method call; the gateway does all
//! the actual work.
//!
//! # Architecture
//!
//! - [`ThroomClient`]: gateway health, cluster lifecycle, global activity
//! - [`ClusterClient`]: cluster health, metrics, activity
//! - [`ServiceClient`]: service details, container logs, activity
//! - [`DbClient`], [`CacheClient`], [`QueueClient`]: data operations routed
//!   through the gateway
//!
//! Every call is a single round trip with no retries. Failures are either
//! [`SdkError::Api`] (the gateway answered with status >= 400) or
//! [`SdkError::Connection`] (it was never reached).
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use throome_sdk::{ActivityFilters, ServiceConfig, ServiceType, ThroomClient};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ThroomClient::from_url("http://localhost:9000")?;
//!
//! let health = client.health()?;
//! println!("Gateway status: {}", health.status);
//!
//! let mut services = HashMap::new();
//! services.insert(
//!     "db".to_string(),
//!     ServiceConfig::provisioned(ServiceType::Postgres, 5432),
//! );
//! let created = client.create_cluster("orders", &services)?;
//!
//! let db = client.cluster(&created.cluster_id).db();
//! db.execute("INSERT INTO orders (id) VALUES ($1)", &[serde_json::json!(42)])?;
//! let row = db.query_row("SELECT count(*) AS n FROM orders", &[])?;
//! println!("Orders: {}", row["n"]);
//!
//! let recent = client.get_activity(ActivityFilters::new().with_limit(10))?;
//! println!("{} recent operations", recent.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod transport;
mod types;

pub use client::{CacheClient, ClusterClient, DbClient, QueueClient, ServiceClient, ThroomClient};
pub use config::SdkConfig;
pub use error::{Result, SdkError};
pub use types::{
    ActivityFilters, ActivityLog, Cluster, ClusterHealthResponse, CreateClusterResponse,
    HealthResponse, LogOptions, MetricsResponse, Row, Service, ServiceConfig, ServiceHealth,
    ServiceInfo, ServiceType,
};
