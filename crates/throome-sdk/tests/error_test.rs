// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error type tests for throome-sdk.

use throome_sdk::{SdkError, ThroomClient};

#[test]
fn test_api_error_display() {
    let err = SdkError::Api {
        status_code: 404,
        message: "Cluster not found".to_string(),
    };
    let display = err.to_string();
    assert!(display.contains("API error"));
    assert!(display.contains("404"));
    assert!(display.contains("Cluster not found"));
}

#[test]
fn test_connection_error_display() {
    let err = SdkError::Connection("connection refused".to_string());
    assert!(err.to_string().contains("connection error"));
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn test_no_rows_error_display() {
    assert_eq!(SdkError::NoRows.to_string(), "no rows returned");
}

#[test]
fn test_not_implemented_error_display() {
    let err = SdkError::NotImplemented("subscribe".to_string());
    assert!(err.to_string().contains("not implemented"));
    assert!(err.to_string().contains("subscribe"));
}

#[test]
fn test_config_error_display() {
    let err = SdkError::Config("base URL is empty".to_string());
    assert!(err.to_string().contains("configuration error"));
    assert!(err.to_string().contains("base URL is empty"));
}

#[test]
fn test_unexpected_response_error_display() {
    let err = SdkError::UnexpectedResponse("query result without rows".to_string());
    assert!(err.to_string().contains("unexpected response"));
}

#[test]
fn test_status_code_only_on_api_errors() {
    let api = SdkError::Api {
        status_code: 500,
        message: "boom".to_string(),
    };
    assert_eq!(api.status_code(), Some(500));
    assert!(!api.is_not_found());
    assert!(!api.is_connection());

    let not_found = SdkError::Api {
        status_code: 404,
        message: "missing".to_string(),
    };
    assert!(not_found.is_not_found());

    let local = [
        SdkError::Connection("timed out".to_string()),
        SdkError::NoRows,
        SdkError::NotImplemented("subscribe".to_string()),
        SdkError::Config("bad".to_string()),
        SdkError::Serialization("bad".to_string()),
        SdkError::UnexpectedResponse("bad".to_string()),
    ];
    for err in &local {
        assert_eq!(err.status_code(), None, "{:?} must not carry a status", err);
    }
    assert!(local[0].is_connection());
}

#[test]
fn test_error_and_client_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SdkError>();
    assert_send_sync::<ThroomClient>();
}

#[test]
fn test_from_serde_json_error() {
    let json_err: Result<(), serde_json::Error> = serde_json::from_str::<()>("invalid");

    let sdk_err: SdkError = json_err.unwrap_err().into();
    assert!(matches!(sdk_err, SdkError::Serialization(_)));
}
