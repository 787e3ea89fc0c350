//! Route construction: raw definitions into enriched, immutable routes.

use crate::geodesy::{bearing_deg, haversine_km, LatLng};
use crate::{polyline, RouteSet};
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};

/// Minimum configured average speed, in km/h.
const MIN_SPEED_KMH: f64 = 5.0;

/// Minimum loop duration, in s.
const MIN_LOOP_SECONDS: u64 = 900;

/// A raw route record, as supplied by the hosting application.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub id: String,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Polyline6-encoded geometry.
    pub polyline: String,
    #[serde(default = "default_speed")]
    pub average_speed_kmh: f64,
    #[serde(default = "default_origin_label")]
    pub origin_label: String,
    #[serde(default = "default_destination_label")]
    pub destination_label: String,
}

fn default_color() -> String {
    "#2563eb".to_owned()
}

fn default_speed() -> f64 {
    35.0
}

fn default_origin_label() -> String {
    "Origin".to_owned()
}

fn default_destination_label() -> String {
    "Destination".to_owned()
}

/// A named endpoint of a route, with a display-rounded position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Terminus {
    pub label: String,
    pub lat: f64,
    pub lng: f64,
}

/// An enriched route. Built once from a [RouteDefinition] and shared
/// read-only by every simulation call afterwards.
#[derive(Clone, Debug)]
pub struct Route {
    /// The route's stable identifier.
    pub id: String,
    /// The route's display name.
    pub name: String,
    /// The route's display color.
    pub color: String,
    /// The decoded geometry; always at least one point.
    points: Vec<LatLng>,
    /// The geometry rounded for display, parallel to `points`.
    display_points: Vec<LatLng>,
    /// Cumulative distance along the route, in km, parallel to `points`.
    /// `cumulative_km[0]` is 0 and the values are non-decreasing.
    cumulative_km: Vec<f64>,
    /// Total route length in km.
    length_km: f64,
    /// Configured average speed in km/h, floored at [MIN_SPEED_KMH].
    average_speed_kmh: f64,
    /// Time to traverse the whole route once, in s, floored at [MIN_LOOP_SECONDS].
    loop_seconds: u64,
    /// The route's starting terminus.
    pub origin: Terminus,
    /// The route's final terminus.
    pub destination: Terminus,
}

impl Route {
    /// Builds a route from a definition, or `None` when the geometry
    /// decodes to zero points.
    pub fn from_definition(definition: &RouteDefinition) -> Option<Self> {
        let points = match polyline::decode(&definition.polyline) {
            Ok(points) => points,
            Err(err) => {
                warn!("dropping route {:?}: {}", definition.id, err);
                return None;
            }
        };
        if points.is_empty() {
            warn!("dropping route {:?}: no geometry", definition.id);
            return None;
        }

        let mut cumulative_km = Vec::with_capacity(points.len());
        cumulative_km.push(0.0);
        for (a, b) in points.iter().tuple_windows() {
            let last = *cumulative_km.last().unwrap();
            cumulative_km.push(last + haversine_km(*a, *b));
        }
        let length_km = *cumulative_km.last().unwrap();

        let average_speed_kmh = definition.average_speed_kmh.max(MIN_SPEED_KMH);
        let loop_seconds =
            ((length_km / average_speed_kmh * 3600.0) as u64).max(MIN_LOOP_SECONDS);

        let first = points[0].rounded();
        let last = points[points.len() - 1].rounded();

        Some(Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            color: definition.color.clone(),
            display_points: points.iter().map(LatLng::rounded).collect(),
            points,
            cumulative_km,
            length_km,
            average_speed_kmh,
            loop_seconds,
            origin: Terminus {
                label: definition.origin_label.clone(),
                lat: first.lat,
                lng: first.lng,
            },
            destination: Terminus {
                label: definition.destination_label.clone(),
                lat: last.lat,
                lng: last.lng,
            },
        })
    }

    /// The decoded route geometry.
    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    /// The route geometry rounded for display.
    pub fn display_points(&self) -> &[LatLng] {
        &self.display_points
    }

    /// The cumulative distance table, in km.
    pub fn cumulative_km(&self) -> &[f64] {
        &self.cumulative_km
    }

    /// Total route length in km.
    pub fn length_km(&self) -> f64 {
        self.length_km
    }

    /// Average speed in km/h.
    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }

    /// Time to traverse the whole route once, in s.
    pub fn loop_seconds(&self) -> u64 {
        self.loop_seconds
    }

    /// Locates the point a given distance along the route, returning the
    /// interpolated position and the index of the segment containing it.
    ///
    /// Distances at or beyond the ends clamp to the first or last vertex,
    /// and a zero-length segment yields its start vertex.
    pub fn position_at_km(&self, distance_km: f64) -> (LatLng, usize) {
        if distance_km <= 0.0 || self.points.len() == 1 {
            return (self.points[0], 0);
        }
        if distance_km >= self.length_km {
            return (self.points[self.points.len() - 1], self.points.len() - 1);
        }

        // Lowest index whose cumulative distance reaches the target.
        let idx = self.cumulative_km.partition_point(|c| *c < distance_km);
        if self.cumulative_km[idx] == distance_km {
            return (self.points[idx], idx.saturating_sub(1));
        }

        let prev_idx = idx.saturating_sub(1);
        let segment_km = self.cumulative_km[idx] - self.cumulative_km[prev_idx];
        if segment_km <= 0.0 {
            return (self.points[prev_idx], prev_idx);
        }

        let ratio = (distance_km - self.cumulative_km[prev_idx]) / segment_km;
        (self.points[prev_idx].lerp(&self.points[idx], ratio), prev_idx)
    }

    /// The heading at an interpolated position, in degrees.
    ///
    /// Points toward the next vertex; at the final vertex the bearing is
    /// taken from the previous vertex instead, so the two endpoints of a
    /// bearing are never the same point.
    pub fn heading_at(&self, segment_index: usize, position: LatLng) -> f64 {
        let next_index = (segment_index + 1).min(self.points.len() - 1);
        if next_index == segment_index {
            let prev_index = segment_index.saturating_sub(1);
            if prev_index == segment_index {
                // Single-point route; no direction of travel exists.
                return 0.0;
            }
            return bearing_deg(self.points[prev_index], position);
        }
        bearing_deg(position, self.points[next_index])
    }
}

/// Builds the route set from raw definitions. Definitions whose geometry
/// decodes to zero points are dropped and logged, never exposed downstream.
pub fn build_routes(definitions: &[RouteDefinition]) -> RouteSet {
    let mut routes = RouteSet::default();
    for definition in definitions {
        if let Some(route) = Route::from_definition(definition) {
            routes.insert(route);
        }
    }
    routes
}
