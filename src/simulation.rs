//! The time-driven fleet simulator: maps injected wall-clock time to a
//! rendering-ready snapshot of every simulated vehicle.

use crate::filter::FilterStore;
use crate::geodesy::LatLng;
use crate::graph::{GraphStrategy, RouteGraph};
use crate::overlay::{Depot, Geofence, Legend, LegendEntry, MapCenter};
use crate::route::{build_routes, Route, RouteDefinition, Terminus};
use crate::vehicle::{
    SnapshotRoute, VehicleIdentifiers, VehicleProfile, VehicleSnapshot, VehicleStatus,
};
use crate::{presets, RouteId, RouteSet};
use chrono::{DateTime, Utc};
use log::warn;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Phase offset between consecutive vehicles, in s. Spreads the fleet out
/// along the route loops.
const PHASE_OFFSET_SECONDS: f64 = 180.0;

/// Period divisor of the sinusoidal speed perturbation, in s.
const SPEED_WAVE_PERIOD: f64 = 90.0;

/// Amplitude of the speed perturbation, in km/h.
const SPEED_WAVE_AMPLITUDE: f64 = 6.0;

/// Minimum simulated speed, in km/h.
const SPEED_FLOOR_KMH: f64 = 8.0;

/// Minimum speed used for the ETA estimate, in km/h.
const ETA_SPEED_FLOOR_KMH: f64 = 5.0;

/// Minimum remaining distance used for the ETA estimate, in km. Keeps the
/// residual positive at the very end of a loop.
const ETA_REMAINING_FLOOR_KM: f64 = 0.02;

/// Number of route vertices retained behind the vehicle in its trail.
const TRAIL_VERTICES: usize = 60;

/// A fleet of simulated vehicles circulating over a fixed route set.
///
/// The route set is immutable after construction; the injected filter
/// store is the only state that changes between calls, so a snapshot is a
/// pure function of (routes, vehicle index, time, filter state).
pub struct Simulation {
    /// The routes vehicles circulate on.
    routes: RouteSet,
    /// Route keys in insertion order, for round-robin assignment.
    route_order: Vec<RouteId>,
    /// The identities vehicles cycle through.
    profiles: Vec<VehicleProfile>,
    /// Geofence overlays included in tracking snapshots.
    geofences: Vec<Geofence>,
    /// Depot overlays included in tracking snapshots.
    depots: Vec<Depot>,
    /// The initial map viewport.
    center: MapCenter,
    /// How many vehicles to simulate per call.
    vehicle_count: usize,
    /// Per-vehicle Kalman state, keyed by `"{route_id}:{device_id}"`.
    filters: FilterStore,
    /// Lazily built graph over the route geometry.
    graph: OnceCell<RouteGraph>,
}

impl Simulation {
    /// Creates a simulation over the given route definitions, with an
    /// injected filter store.
    pub fn new(
        definitions: &[RouteDefinition],
        profiles: Vec<VehicleProfile>,
        filters: FilterStore,
    ) -> Self {
        let routes = build_routes(definitions);
        let route_order = routes.keys().collect();
        Self {
            routes,
            route_order,
            profiles,
            geofences: Vec::new(),
            depots: Vec::new(),
            center: presets::BASE_LOCATION,
            vehicle_count: 10,
            filters,
            graph: OnceCell::new(),
        }
    }

    /// Creates a simulation of the built-in demo fleet: the preset
    /// corridors, profiles and overlays.
    pub fn with_preset_fleet() -> Self {
        let mut sim = Self::new(
            &presets::route_definitions(),
            presets::vehicle_profiles(),
            FilterStore::default(),
        );
        sim.geofences = presets::geofences();
        sim.depots = presets::depots();
        sim
    }

    /// Sets the number of vehicles simulated per call. Batches are capped
    /// at [Self::distinct_pairings] so every vehicle in a batch keeps its
    /// own filter key.
    pub fn set_vehicle_count(&mut self, count: usize) {
        self.vehicle_count = count;
    }

    /// The number of distinct (route, profile) pairings the round-robin
    /// assignment can produce before `"{route_id}:{device_id}"` keys
    /// repeat: lcm(route count, profile count).
    pub fn distinct_pairings(&self) -> usize {
        let routes = self.route_order.len();
        let profiles = self.profiles.len();
        if routes == 0 || profiles == 0 {
            return 0;
        }
        routes / gcd(routes, profiles) * profiles
    }

    /// Sets the geofence overlays.
    pub fn set_geofences(&mut self, geofences: Vec<Geofence>) {
        self.geofences = geofences;
    }

    /// Sets the depot overlays.
    pub fn set_depots(&mut self, depots: Vec<Depot>) {
        self.depots = depots;
    }

    /// Sets the initial map viewport.
    pub fn set_center(&mut self, center: MapCenter) {
        self.center = center;
    }

    /// Returns an iterator over the routes in the simulation.
    pub fn iter_routes(&self) -> impl Iterator<Item = &Route> {
        self.route_order.iter().map(|id| &self.routes[*id])
    }

    /// The number of routes that survived construction.
    pub fn route_count(&self) -> usize {
        self.route_order.len()
    }

    /// The injected filter store.
    pub fn filter_store(&self) -> &FilterStore {
        &self.filters
    }

    /// Mutable access to the filter store, e.g. to clear it between test
    /// runs or evict stale vehicle keys.
    pub fn filter_store_mut(&mut self) -> &mut FilterStore {
        &mut self.filters
    }

    /// The graph over the route geometry, built on first use.
    pub fn route_graph(&self) -> &RouteGraph {
        self.graph
            .get_or_init(|| RouteGraph::build(self.iter_routes(), GraphStrategy::VertexChain))
    }

    /// Finds the shortest path between two arbitrary coordinates across
    /// the route network. Empty when no route exists.
    pub fn shortest_path(&self, start: LatLng, end: LatLng) -> Vec<LatLng> {
        self.route_graph().shortest_path(start, end)
    }

    /// Produces the state of every simulated vehicle as of `now`.
    ///
    /// Vehicles are assigned routes and profiles round-robin by index,
    /// each offset along its route loop by [PHASE_OFFSET_SECONDS]. The raw
    /// interpolated position is fed through the per-vehicle Kalman filter,
    /// and the filtered point becomes the vehicle's primary location.
    pub fn vehicles_at(&mut self, now: DateTime<Utc>) -> Vec<VehicleSnapshot> {
        let epoch = now.timestamp_millis() as f64 / 1e3;
        if self.route_order.is_empty() || self.profiles.is_empty() {
            return Vec::new();
        }

        // Two vehicles sharing a filter key would read-modify-write one
        // filter per tick and corrupt both tracks.
        let count = self.vehicle_count.min(self.distinct_pairings());
        if count < self.vehicle_count {
            warn!(
                "vehicle count {} exceeds the {} distinct route/profile pairings; clamping",
                self.vehicle_count, count,
            );
        }

        let mut vehicles = Vec::with_capacity(count);
        for index in 0..count {
            let route = &self.routes[self.route_order[index % self.route_order.len()]];
            let profile = &self.profiles[index % self.profiles.len()];

            let loop_seconds = route.loop_seconds() as f64;
            let phase = index as f64 * PHASE_OFFSET_SECONDS;
            let progress_seconds = (epoch + phase).rem_euclid(loop_seconds);
            let progress = progress_seconds / loop_seconds;
            let target_km = progress * route.length_km();

            let (raw, segment) = route.position_at_km(target_km);
            let heading = route.heading_at(segment, raw);

            let base_speed = route.average_speed_kmh();
            let wave = (epoch / SPEED_WAVE_PERIOD + index as f64 * 0.7).sin();
            let speed_kmh = (base_speed + SPEED_WAVE_AMPLITUDE * wave).max(SPEED_FLOOR_KMH);

            let remaining_km = (route.length_km() - target_km).max(ETA_REMAINING_FLOOR_KM);
            let eta_minutes = remaining_km / speed_kmh.max(ETA_SPEED_FLOOR_KMH) * 60.0;

            let status = VehicleStatus::classify(progress, speed_kmh, base_speed);

            let uid = format!("{}:{}", route.id, profile.device_id);
            let raw_point = raw.rounded();
            let filtered = self.filters.step(&uid, epoch, raw).rounded();

            let (mut trail, mut upcoming) = route_window(route, segment, raw_point);
            if let Some(last) = trail.last_mut() {
                *last = filtered;
            }
            if let Some(first) = upcoming.first_mut() {
                *first = filtered;
            }

            vehicles.push(VehicleSnapshot {
                id: index + 1,
                uid,
                name: profile.callsign.clone(),
                fleet_area: route.name.clone(),
                status,
                speed_kmh: round_places(speed_kmh, 1),
                // Rounding can land exactly on 360.0; wrap it back.
                heading: round_places(heading, 1) % 360.0,
                location: filtered,
                raw_location: raw_point,
                trail,
                upcoming,
                path: route.display_points().to_vec(),
                last_update: now.to_rfc3339(),
                last_update_epoch: epoch,
                eta_minutes: round_places(eta_minutes, 1),
                identifiers: VehicleIdentifiers {
                    license_plate: profile.license_plate.clone(),
                    device_id: profile.device_id.clone(),
                    driver: profile.driver.clone(),
                    vehicle_type: profile.vehicle_type.clone(),
                },
                route: SnapshotRoute {
                    id: route.id.clone(),
                    name: route.name.clone(),
                    color: route.color.clone(),
                    progress: round_places(progress, 3),
                    distance_km: round_places(route.length_km(), 2),
                    origin: route.origin.clone(),
                    destination: route.destination.clone(),
                },
            });
        }

        vehicles
    }

    /// Produces the full tracking snapshot: the vehicle batch plus the
    /// derived filters, catalog, overlays and legend a map client needs.
    pub fn tracking_snapshot(&mut self, now: DateTime<Utc>) -> TrackingSnapshot {
        let vehicles = self.vehicles_at(now);

        let status_filters: BTreeSet<String> =
            vehicles.iter().map(|v| v.status.to_string()).collect();
        let fleet_filters: BTreeSet<String> =
            vehicles.iter().map(|v| v.fleet_area.clone()).collect();

        let legend = Legend {
            routes: self
                .iter_routes()
                .map(|route| LegendEntry {
                    label: route.name.clone(),
                    color: route.color.clone(),
                })
                .collect(),
            // Severity palette for the traffic overlay an embedding map
            // layers on top of this feed.
            traffic: vec![
                LegendEntry { label: "Heavy".to_owned(), color: "#ef4444".to_owned() },
                LegendEntry { label: "Moderate".to_owned(), color: "#f59e0b".to_owned() },
                LegendEntry { label: "Light".to_owned(), color: "#22c55e".to_owned() },
            ],
            geofences: self
                .geofences
                .iter()
                .map(|fence| LegendEntry {
                    label: fence.name.clone(),
                    color: fence.color.clone(),
                })
                .collect(),
        };

        TrackingSnapshot {
            vehicles,
            status_filters: status_filters.into_iter().collect(),
            fleet_filters: fleet_filters.into_iter().collect(),
            center_location: self.center,
            generation_time: now.to_rfc3339(),
            route_catalog: self
                .iter_routes()
                .map(|route| RouteCatalogEntry {
                    id: route.id.clone(),
                    name: route.name.clone(),
                    color: route.color.clone(),
                    distance_km: round_places(route.length_km(), 2),
                    loop_seconds: route.loop_seconds(),
                    origin: route.origin.clone(),
                    destination: route.destination.clone(),
                })
                .collect(),
            geofences: self.geofences.clone(),
            depots: self.depots.clone(),
            legend,
        }
    }
}

/// One route in the snapshot's catalog listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteCatalogEntry {
    pub id: String,
    pub name: String,
    pub color: String,
    pub distance_km: f64,
    pub loop_seconds: u64,
    pub origin: Terminus,
    pub destination: Terminus,
}

/// A ready-to-serve snapshot of the whole fleet and its map context.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    pub vehicles: Vec<VehicleSnapshot>,
    /// The distinct vehicle statuses present, sorted.
    pub status_filters: Vec<String>,
    /// The distinct fleet areas (route names) present, sorted.
    pub fleet_filters: Vec<String>,
    pub center_location: MapCenter,
    /// Generation time, RFC 3339.
    pub generation_time: String,
    pub route_catalog: Vec<RouteCatalogEntry>,
    pub geofences: Vec<Geofence>,
    pub depots: Vec<Depot>,
    pub legend: Legend,
}

/// Splits a route into the trail behind the vehicle and the geometry
/// still ahead, both ending/starting at the current point.
fn route_window(route: &Route, segment: usize, current: LatLng) -> (Vec<LatLng>, Vec<LatLng>) {
    let display = route.display_points();

    let trail_start = segment.saturating_sub(TRAIL_VERTICES);
    let mut trail = display[trail_start..=segment].to_vec();
    if trail.last() != Some(&current) {
        trail.push(current);
    }

    let mut upcoming = Vec::with_capacity(display.len() - segment);
    upcoming.push(current);
    upcoming.extend_from_slice(&display[segment + 1..]);
    if upcoming.len() <= 1 {
        upcoming.clear();
    }

    (trail, upcoming)
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Rounds a value to the given number of decimal places.
fn round_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::encode;
    use chrono::TimeZone;

    fn test_definitions() -> Vec<RouteDefinition> {
        let north: Vec<LatLng> = (0..40)
            .map(|i| LatLng::new(23.70 + i as f64 * 0.002, 90.40))
            .collect();
        let east: Vec<LatLng> = (0..40)
            .map(|i| LatLng::new(23.70, 90.40 + i as f64 * 0.002))
            .collect();
        vec![
            RouteDefinition {
                id: "north".to_owned(),
                name: "Northbound".to_owned(),
                color: "#ff0000".to_owned(),
                polyline: encode(&north),
                average_speed_kmh: 40.0,
                origin_label: "South End".to_owned(),
                destination_label: "North End".to_owned(),
            },
            RouteDefinition {
                id: "east".to_owned(),
                name: "Eastbound".to_owned(),
                color: "#00ff00".to_owned(),
                polyline: encode(&east),
                average_speed_kmh: 30.0,
                origin_label: "West End".to_owned(),
                destination_label: "East End".to_owned(),
            },
        ]
    }

    fn test_profiles(count: usize) -> Vec<VehicleProfile> {
        (0..count)
            .map(|i| VehicleProfile {
                callsign: format!("VT-{i:03}"),
                license_plate: format!("PLATE-{i:03}"),
                device_id: format!("DEV-{i:03}"),
                driver: format!("Driver {i}"),
                vehicle_type: "Van".to_owned(),
            })
            .collect()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 10, 30, 0).unwrap()
    }

    #[test]
    fn raw_positions_are_deterministic() {
        let now = fixed_now();
        let mut a = Simulation::new(&test_definitions(), test_profiles(4), FilterStore::default());
        let mut b = Simulation::new(&test_definitions(), test_profiles(4), FilterStore::default());

        let first = a.vehicles_at(now);
        let second = b.vehicles_at(now);
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(&second) {
            assert_eq!(x.raw_location, y.raw_location);
            assert_eq!(x.heading, y.heading);
            assert_eq!(x.speed_kmh, y.speed_kmh);
            assert_eq!(x.status, y.status);
        }
    }

    #[test]
    fn first_snapshot_returns_raw_position_as_location() {
        let mut sim = Simulation::new(&test_definitions(), test_profiles(4), FilterStore::default());
        for vehicle in sim.vehicles_at(fixed_now()) {
            // An uninitialised filter passes the observation through.
            assert_eq!(vehicle.location, vehicle.raw_location);
        }
    }

    #[test]
    fn vehicles_cycle_routes_and_profiles() {
        let mut sim = Simulation::new(&test_definitions(), test_profiles(3), FilterStore::default());
        sim.set_vehicle_count(6);
        let vehicles = sim.vehicles_at(fixed_now());
        assert_eq!(vehicles.len(), 6);
        assert_eq!(vehicles[0].route.id, "north");
        assert_eq!(vehicles[1].route.id, "east");
        assert_eq!(vehicles[2].route.id, "north");
        assert_eq!(vehicles[0].name, vehicles[3].name);
        // Each (route, device) pairing within the batch is unique.
        let uids: BTreeSet<_> = vehicles.iter().map(|v| v.uid.clone()).collect();
        assert_eq!(uids.len(), vehicles.len());
    }

    #[test]
    fn snapshot_fields_respect_floors_and_bounds() {
        let mut sim =
            Simulation::new(&test_definitions(), test_profiles(10), FilterStore::default());
        for vehicle in sim.vehicles_at(fixed_now()) {
            assert!(vehicle.speed_kmh >= SPEED_FLOOR_KMH);
            assert!(vehicle.eta_minutes > 0.0);
            assert!((0.0..360.0).contains(&vehicle.heading));
            assert!((0.0..1.0).contains(&vehicle.route.progress));
        }
    }

    #[test]
    fn trail_and_upcoming_join_at_the_filtered_point() {
        let mut sim = Simulation::new(&test_definitions(), test_profiles(4), FilterStore::default());
        for vehicle in sim.vehicles_at(fixed_now()) {
            assert_eq!(vehicle.trail.last(), Some(&vehicle.location));
            assert!(vehicle.trail.len() <= TRAIL_VERTICES + 2);
            if !vehicle.upcoming.is_empty() {
                assert_eq!(vehicle.upcoming.first(), Some(&vehicle.location));
                assert!(vehicle.upcoming.len() > 1);
            }
        }
    }

    #[test]
    fn batch_size_clamps_to_distinct_pairings() {
        // 2 routes x 4 profiles repeat their (route, device) pairing after
        // 4 vehicles; anything beyond that would alias a filter key.
        let mut sim = Simulation::new(&test_definitions(), test_profiles(4), FilterStore::default());
        sim.set_vehicle_count(10);
        assert_eq!(sim.distinct_pairings(), 4);

        let vehicles = sim.vehicles_at(fixed_now());
        assert_eq!(vehicles.len(), 4);
        let uids: BTreeSet<_> = vehicles.iter().map(|v| v.uid.clone()).collect();
        assert_eq!(uids.len(), vehicles.len());
        for vehicle in &vehicles {
            assert_eq!(vehicle.location, vehicle.raw_location);
        }
    }

    #[test]
    fn heading_rounding_wraps_to_zero() {
        // Just west of due north: the bearing is ~359.97, which rounds to
        // 360.0 at one decimal place and must wrap back into [0, 360).
        let points = [LatLng::new(0.0, 0.0), LatLng::new(1.0, -0.0005)];
        let definition = RouteDefinition {
            id: "nnw".to_owned(),
            name: "North by west".to_owned(),
            color: "#000000".to_owned(),
            polyline: encode(&points),
            average_speed_kmh: 35.0,
            origin_label: "A".to_owned(),
            destination_label: "B".to_owned(),
        };
        let mut sim = Simulation::new(&[definition], test_profiles(1), FilterStore::default());
        sim.set_vehicle_count(1);

        let vehicles = sim.vehicles_at(fixed_now());
        assert_eq!(vehicles[0].heading, 0.0);
    }

    #[test]
    fn empty_route_set_produces_no_vehicles() {
        let mut sim = Simulation::new(&[], test_profiles(4), FilterStore::default());
        assert!(sim.vehicles_at(fixed_now()).is_empty());
        assert_eq!(sim.route_count(), 0);
    }

    #[test]
    fn filter_state_accumulates_one_key_per_vehicle() {
        let mut sim = Simulation::new(&test_definitions(), test_profiles(5), FilterStore::default());
        sim.set_vehicle_count(5);
        sim.vehicles_at(fixed_now());
        assert_eq!(sim.filter_store().len(), 5);
        // A later call reuses the same keys.
        sim.vehicles_at(fixed_now() + chrono::Duration::seconds(30));
        assert_eq!(sim.filter_store().len(), 5);
    }

    #[test]
    fn shortest_path_follows_a_route_chain() {
        let sim = Simulation::new(&test_definitions(), test_profiles(2), FilterStore::default());
        let start = LatLng::new(23.70, 90.40);
        let end = LatLng::new(23.70, 90.40 + 39.0 * 0.002);
        let path = sim.shortest_path(start, end);
        assert_eq!(path.len(), 40);
        // The two routes only touch at their shared origin vertex, so a
        // cross-route query resolves through that junction.
        let north_end = LatLng::new(23.70 + 39.0 * 0.002, 90.40);
        let cross = sim.shortest_path(north_end, end);
        assert_eq!(cross.len(), 79);
    }
}
