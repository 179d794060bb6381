// Uniform response envelope shared by every route.
//
// Success: {"success": true, "data": ..., "timestamp": "..."}
// Failure: {"success": false, "error": {"code", "message", "details"?}, "timestamp": "..."}

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": data,
        "timestamp": timestamp(),
    }))
}

/// Success envelope with a pagination block, used by list endpoints that
/// accept limit/skip parameters.
pub fn ok_paginated<T: Serialize>(data: T, pagination: Value) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": data,
        "pagination": pagination,
        "timestamp": timestamp(),
    }))
}

pub fn error_body(code: &str, message: &str, details: Option<Value>) -> Value {
    let mut error = json!({
        "code": code,
        "message": message,
    });
    if let Some(details) = details {
        error["details"] = details;
    }
    json!({
        "success": false,
        "error": error,
        "timestamp": timestamp(),
    })
}
