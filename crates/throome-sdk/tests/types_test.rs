// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Deserialization tests for gateway records.

use serde_json::json;
use throome_sdk::{
    ActivityFilters, ActivityLog, Cluster, ClusterHealthResponse, LogOptions, MetricsResponse,
    ServiceConfig, ServiceInfo, ServiceType,
};

#[test]
fn test_cluster_preserves_service_order() {
    let raw = json!({
        "id": "c-1",
        "name": "orders",
        "created_at": "2025-01-10T12:00:00Z",
        "services": [
            {"name": "db", "type": "postgres", "host": "localhost", "port": 5432, "healthy": true,
             "username": "app", "database": "orders"},
            {"name": "cache", "type": "redis", "host": "localhost", "port": 6379, "healthy": false},
            {"name": "events", "type": "kafka", "host": "localhost", "port": 9092, "healthy": true,
             "container_id": "abc123"}
        ]
    });

    let cluster: Cluster = serde_json::from_value(raw).unwrap();
    assert_eq!(cluster.services.len(), 3);
    let names: Vec<&str> = cluster.services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["db", "cache", "events"]);

    let db = cluster.service("db").unwrap();
    assert_eq!(db.service_type, ServiceType::Postgres.as_str());
    assert_eq!(db.username.as_deref(), Some("app"));
    assert_eq!(db.container_id, None);
    assert_eq!(
        cluster.service("events").unwrap().container_id.as_deref(),
        Some("abc123")
    );
    assert!(cluster.service("missing").is_none());
}

#[test]
fn test_cluster_without_services() {
    let raw = json!({"id": "c-2", "name": "empty", "created_at": "2025-01-10T12:00:00Z"});
    let cluster: Cluster = serde_json::from_value(raw).unwrap();
    assert!(cluster.services.is_empty());
}

#[test]
fn test_activity_log_optional_fields_absent() {
    let raw = json!({
        "id": "a-1",
        "timestamp": "2025-01-10T12:00:00.123456789Z",
        "cluster_id": "c-1",
        "service_name": "cache",
        "service_type": "redis",
        "operation": "GET",
        "command": "GET user:1",
        "duration": 3,
        "status": "success"
    });

    let log: ActivityLog = serde_json::from_value(raw).unwrap();
    assert!(log.parameters.is_empty());
    assert_eq!(log.response, None);
    assert_eq!(log.error, None);
    assert_eq!(log.rows_affected, None);
    assert_eq!(log.client_info, None);
    assert!(!log.is_error());
    assert_eq!(log.timestamp.timestamp(), 1_736_510_400);
}

#[test]
fn test_activity_log_error_entry() {
    let raw = json!({
        "id": "a-2",
        "timestamp": "2025-01-10T12:00:00+01:00",
        "cluster_id": "c-1",
        "service_name": "db",
        "service_type": "postgres",
        "operation": "SELECT",
        "command": "SELECT * FROM missing WHERE id = $1",
        "parameters": [7],
        "duration": 12,
        "status": "error",
        "error": "relation \"missing\" does not exist",
        "rows_affected": 0,
        "client_info": {"source": "sdk"}
    });

    let log: ActivityLog = serde_json::from_value(raw).unwrap();
    assert!(log.is_error());
    assert_eq!(log.parameters, vec![json!(7)]);
    assert_eq!(log.rows_affected, Some(0));
    assert_eq!(
        log.client_info.unwrap().get("source").map(String::as_str),
        Some("sdk")
    );
}

#[test]
fn test_cluster_health_helpers() {
    let raw = json!({
        "cluster_id": "c-1",
        "services": {
            "db": {"healthy": true, "response_time": 4},
            "cache": {"healthy": false, "response_time": 0, "error_message": "connection refused"},
            "bus": {"healthy": false, "response_time": 0}
        }
    });

    let health: ClusterHealthResponse = serde_json::from_value(raw).unwrap();
    assert!(!health.is_healthy());
    assert_eq!(health.unhealthy_services(), vec!["bus", "cache"]);
    assert_eq!(health.services["db"].error_message, None);
    assert_eq!(
        health.services["cache"].error_message.as_deref(),
        Some("connection refused")
    );
}

#[test]
fn test_metrics_and_service_info() {
    let metrics: MetricsResponse = serde_json::from_value(json!({
        "requests": 120,
        "errors": 3,
        "avg_response_ms": 4.5,
        "p95_response_ms": 12.0,
        "active_services": 2
    }))
    .unwrap();
    assert_eq!(metrics.requests, 120);
    assert_eq!(metrics.active_services, 2);

    let info: ServiceInfo = serde_json::from_value(json!({
        "name": "db", "type": "postgres", "host": "host.docker.internal", "port": 5432,
        "healthy": true, "container_id": "f00", "status": "running"
    }))
    .unwrap();
    assert_eq!(info.status.as_deref(), Some("running"));
}

#[test]
fn test_service_config_builder() {
    let config = ServiceConfig::new(ServiceType::Postgres, 5432)
        .with_host("db.internal")
        .with_username("app")
        .with_password("secret")
        .with_database("orders");

    assert_eq!(config.service_type, "postgres");
    assert!(!config.provision);
    assert_eq!(config.host.as_deref(), Some("db.internal"));
    assert_eq!(config.database.as_deref(), Some("orders"));

    let provisioned = ServiceConfig::provisioned(ServiceType::Redis, 6379);
    assert!(provisioned.provision);
    assert_eq!(provisioned.host, None);
}

#[test]
fn test_options_defaults() {
    assert_eq!(ActivityFilters::default().limit, None);
    assert_eq!(ActivityFilters::new().with_limit(5).limit, Some(5));

    let options = LogOptions::default();
    assert_eq!(options.tail, None);
    assert!(!options.timestamps);
}
