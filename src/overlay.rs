//! Static map overlays shipped alongside the vehicle feed: geofenced
//! zones, depots and the legend describing them.

use crate::geodesy::LatLng;
use serde::{Deserialize, Serialize};

/// A polygonal zone drawn on the map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geofence {
    pub id: String,
    pub name: String,
    pub color: String,
    /// The polygon's vertices, in drawing order.
    pub points: Vec<LatLng>,
}

/// A fixed depot location with a vehicle capacity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Depot {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub location: LatLng,
}

/// The initial map viewport.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

/// One entry of the map legend: a label and its color.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// The legend block of a tracking snapshot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Legend {
    pub routes: Vec<LegendEntry>,
    pub traffic: Vec<LegendEntry>,
    pub geofences: Vec<LegendEntry>,
}
