//! CyRide upstream client
//!
//! CyRide's public GTFS feeds do not carry per-rider data, so this service
//! serves representative routes, stops, trips, and vehicles shaped like the
//! real feed. Favorites take the first two routes and nearby stops the first
//! three until rider preferences and location are wired in.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::models::{
    CyrideDashboard, PlanLeg, PlanPoint, Route, RoutePlan, Stop, Trip, Vehicle,
};
use crate::auth::models::User;
use crate::common::UpstreamError;
use crate::dashboard::services::CyrideSource;

const FAVORITE_ROUTES_COUNT: usize = 2;
const NEARBY_STOPS_COUNT: usize = 3;

pub struct CyrideService;

impl CyrideService {
    pub fn new() -> Self {
        Self
    }

    pub async fn routes(&self) -> Vec<Route> {
        vec![
            Route {
                id: "1".to_string(),
                name: "Red Route".to_string(),
                description: "Main campus route connecting residence halls to academic buildings"
                    .to_string(),
                color: "#DC143C".to_string(),
                kind: "bus".to_string(),
                status: "active".to_string(),
                operating_days: weekdays(),
                first_trip: Some("07:00".to_string()),
                last_trip: Some("22:00".to_string()),
            },
            Route {
                id: "2".to_string(),
                name: "Blue Route".to_string(),
                description: "Downtown and off-campus route".to_string(),
                color: "#4169E1".to_string(),
                kind: "bus".to_string(),
                status: "active".to_string(),
                operating_days: {
                    let mut days = weekdays();
                    days.push("Saturday".to_string());
                    days
                },
                first_trip: Some("06:30".to_string()),
                last_trip: Some("23:00".to_string()),
            },
            Route {
                id: "3".to_string(),
                name: "Orange Route".to_string(),
                description: "Evening and weekend service".to_string(),
                color: "#FF8C00".to_string(),
                kind: "bus".to_string(),
                status: "active".to_string(),
                operating_days: vec![
                    "Friday".to_string(),
                    "Saturday".to_string(),
                    "Sunday".to_string(),
                ],
                first_trip: Some("18:00".to_string()),
                last_trip: Some("02:00".to_string()),
            },
        ]
    }

    pub async fn favorite_routes(&self, _user: &User) -> Vec<Route> {
        let mut routes = self.routes().await;
        routes.truncate(FAVORITE_ROUTES_COUNT);
        routes
    }

    pub async fn stops(&self, route_id: Option<&str>) -> Vec<Stop> {
        let stops = vec![
            Stop {
                id: "1".to_string(),
                name: "Memorial Union".to_string(),
                description: Some("Main student union building".to_string()),
                latitude: 42.0267,
                longitude: -93.6479,
                routes: vec!["1".to_string(), "2".to_string()],
                accessible: true,
                shelter: Some(true),
            },
            Stop {
                id: "2".to_string(),
                name: "Library".to_string(),
                description: Some("Parks Library".to_string()),
                latitude: 42.0288,
                longitude: -93.6457,
                routes: vec!["1".to_string()],
                accessible: true,
                shelter: Some(false),
            },
            Stop {
                id: "3".to_string(),
                name: "Carver Hall".to_string(),
                description: Some("Engineering building".to_string()),
                latitude: 42.0275,
                longitude: -93.6491,
                routes: vec!["1".to_string(), "3".to_string()],
                accessible: true,
                shelter: Some(true),
            },
        ];

        match route_id {
            Some(route_id) => stops
                .into_iter()
                .filter(|stop| stop.routes.iter().any(|r| r == route_id))
                .collect(),
            None => stops,
        }
    }

    pub async fn nearby_stops(&self, _user: &User, _radius: f64) -> Vec<Stop> {
        let mut stops = self.stops(None).await;
        stops.truncate(NEARBY_STOPS_COUNT);
        stops
    }

    pub async fn upcoming_trips(&self, _user: &User) -> Vec<Trip> {
        let now = Utc::now();
        vec![
            Trip {
                id: "1".to_string(),
                route_id: "1".to_string(),
                stop_id: "1".to_string(),
                scheduled_arrival: now + Duration::minutes(5),
                predicted_arrival: Some(now + Duration::minutes(4)),
                delay: Some(-1),
                status: "early".to_string(),
                vehicle_id: Some("V001".to_string()),
            },
            Trip {
                id: "2".to_string(),
                route_id: "2".to_string(),
                stop_id: "2".to_string(),
                scheduled_arrival: now + Duration::minutes(15),
                predicted_arrival: Some(now + Duration::minutes(17)),
                delay: Some(2),
                status: "delayed".to_string(),
                vehicle_id: Some("V002".to_string()),
            },
        ]
    }

    pub async fn vehicles(&self, route_id: Option<&str>) -> Vec<Vehicle> {
        let now = Utc::now();
        let vehicles = vec![
            Vehicle {
                id: "V001".to_string(),
                route_id: "1".to_string(),
                latitude: 42.0265,
                longitude: -93.6480,
                heading: 45,
                speed: 25,
                last_update: now,
                occupancy: Some("medium".to_string()),
            },
            Vehicle {
                id: "V002".to_string(),
                route_id: "2".to_string(),
                latitude: 42.0270,
                longitude: -93.6460,
                heading: 90,
                speed: 30,
                last_update: now,
                occupancy: Some("high".to_string()),
            },
        ];

        match route_id {
            Some(route_id) => vehicles
                .into_iter()
                .filter(|vehicle| vehicle.route_id == route_id)
                .collect(),
            None => vehicles,
        }
    }

    pub async fn plan_route(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        departure_time: Option<chrono::DateTime<Utc>>,
    ) -> RoutePlan {
        let now = Utc::now();
        RoutePlan {
            origin: PlanPoint {
                name: "Current Location".to_string(),
                latitude: origin.0,
                longitude: origin.1,
            },
            destination: PlanPoint {
                name: "Destination".to_string(),
                latitude: destination.0,
                longitude: destination.1,
            },
            departure_time: departure_time.unwrap_or(now),
            arrival_time: now + Duration::minutes(20),
            duration: 20,
            walking_time: 5,
            routes: vec![PlanLeg {
                route_id: "1".to_string(),
                route_name: "Red Route".to_string(),
                boarding_stop: "Memorial Union".to_string(),
                alighting_stop: "Library".to_string(),
                departure_time: now + Duration::minutes(5),
                arrival_time: now + Duration::minutes(15),
            }],
        }
    }
}

fn weekdays() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

impl Default for CyrideService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CyrideSource for CyrideService {
    async fn dashboard_data(
        &self,
        user: &User,
        _access_token: &str,
    ) -> Result<CyrideDashboard, UpstreamError> {
        let (favorite_routes, nearby_stops, upcoming_trips) = tokio::join!(
            self.favorite_routes(user),
            self.nearby_stops(user, 0.5),
            self.upcoming_trips(user),
        );
        Ok(CyrideDashboard {
            favorite_routes,
            nearby_stops,
            upcoming_trips,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "u-1".to_string(),
            email: "jdoe123@iastate.edu".to_string(),
            name: "Jane Doe".to_string(),
            university_id: "jdoe123".to_string(),
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn stops_filter_by_route() {
        let service = CyrideService::new();
        let all = service.stops(None).await;
        assert_eq!(all.len(), 3);

        let route_three = service.stops(Some("3")).await;
        assert_eq!(route_three.len(), 1);
        assert_eq!(route_three[0].name, "Carver Hall");
    }

    #[tokio::test]
    async fn vehicles_filter_by_route() {
        let service = CyrideService::new();
        assert_eq!(service.vehicles(None).await.len(), 2);
        let filtered = service.vehicles(Some("2")).await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "V002");
    }

    #[tokio::test]
    async fn favorites_are_a_prefix_of_routes() {
        let service = CyrideService::new();
        let favorites = service.favorite_routes(&test_user()).await;
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].name, "Red Route");
        assert_eq!(favorites[1].name, "Blue Route");
    }

    #[tokio::test]
    async fn plan_echoes_coordinates() {
        let service = CyrideService::new();
        let plan = service
            .plan_route((42.0, -93.6), (42.03, -93.65), None)
            .await;
        assert_eq!(plan.origin.latitude, 42.0);
        assert_eq!(plan.destination.longitude, -93.65);
        assert_eq!(plan.routes.len(), 1);
    }
}
