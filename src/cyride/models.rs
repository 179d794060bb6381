//! Canonical CyRide record shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub operating_days: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_trip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trip: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub routes: Vec<String>,
    pub accessible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelter: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub route_id: String,
    pub stop_id: String,
    pub scheduled_arrival: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_arrival: Option<DateTime<Utc>>,
    /// Minutes relative to schedule; negative means early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<i32>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub route_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub heading: u16,
    pub speed: u16,
    pub last_update: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLeg {
    pub route_id: String,
    pub route_name: String,
    pub boarding_stop: String,
    pub alighting_stop: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub origin: PlanPoint,
    pub destination: PlanPoint,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// Total trip minutes.
    pub duration: u32,
    /// Walking minutes within the trip.
    pub walking_time: u32,
    pub routes: Vec<PlanLeg>,
}

/// Coordinates as submitted by the client. Fields stay optional so missing
/// values become a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct Coord {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub origin: Option<Coord>,
    pub destination: Option<Coord>,
    pub departure_time: Option<DateTime<Utc>>,
}

/// Transit lists fetched for the dashboard snapshot.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CyrideDashboard {
    pub favorite_routes: Vec<Route>,
    pub nearby_stops: Vec<Stop>,
    pub upcoming_trips: Vec<Trip>,
}
