pub use filter::{FilterParams, FilterStore, KalmanFilter2d};
pub use geodesy::{bearing_deg, haversine_km, LatLng, EARTH_RADIUS_KM};
pub use graph::{GraphStrategy, NodeIndex, RouteGraph, ShortestPathTree};
pub use overlay::{Depot, Geofence, Legend, LegendEntry, MapCenter};
pub use polyline::PolylineError;
pub use route::{build_routes, Route, RouteDefinition, Terminus};
pub use simulation::{RouteCatalogEntry, Simulation, TrackingSnapshot};
use slotmap::{new_key_type, SlotMap};
pub use vehicle::{
    SnapshotRoute, VehicleIdentifiers, VehicleProfile, VehicleSnapshot, VehicleStatus,
};

mod filter;
mod geodesy;
mod graph;
mod overlay;
pub mod polyline;
pub mod presets;
mod route;
mod simulation;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Route].
    pub struct RouteId;
}

type RouteSet = SlotMap<RouteId, Route>;
