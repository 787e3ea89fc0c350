//! Vehicle identities and the per-tick snapshot payload exposed to
//! clients.

use crate::geodesy::LatLng;
use crate::route::Terminus;
use serde::{Deserialize, Serialize};

/// The static identity a simulated vehicle is assigned: who is driving
/// what, under which telemetry device.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub callsign: String,
    pub license_plate: String,
    pub device_id: String,
    pub driver: String,
    pub vehicle_type: String,
}

/// The operational status of a simulated vehicle, classified from route
/// progress and current speed.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum VehicleStatus {
    #[serde(rename = "Departing Terminal")]
    Departing,
    #[serde(rename = "Approaching Destination")]
    Approaching,
    #[serde(rename = "Congested")]
    Congested,
    #[serde(rename = "En Route")]
    EnRoute,
}

impl VehicleStatus {
    /// Classifies a vehicle's status. The progress checks take priority
    /// over the congestion check.
    pub fn classify(progress: f64, speed_kmh: f64, base_speed_kmh: f64) -> Self {
        if progress < 0.05 {
            Self::Departing
        } else if progress > 0.95 {
            Self::Approaching
        } else if speed_kmh < base_speed_kmh * 0.6 {
            Self::Congested
        } else {
            Self::EnRoute
        }
    }

    /// The display string, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Departing => "Departing Terminal",
            Self::Approaching => "Approaching Destination",
            Self::Congested => "Congested",
            Self::EnRoute => "En Route",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The identifiers block of a [VehicleSnapshot].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleIdentifiers {
    pub license_plate: String,
    pub device_id: String,
    pub driver: String,
    pub vehicle_type: String,
}

/// The route block of a [VehicleSnapshot]: which route the vehicle is on
/// and how far along it is.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotRoute {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Progress around the route loop, in `[0, 1)`, rounded to 3 places.
    pub progress: f64,
    pub distance_km: f64,
    pub origin: Terminus,
    pub destination: Terminus,
}

/// One simulated vehicle as of "now". Recomputed on every call and never
/// persisted; the field set is the contract the serving layer reproduces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    /// 1-based vehicle number within the generated batch.
    pub id: usize,
    /// Stable identity: route id and device id.
    pub uid: String,
    pub name: String,
    /// The route name, doubling as a fleet-area filter value.
    pub fleet_area: String,
    pub status: VehicleStatus,
    pub speed_kmh: f64,
    /// Heading in degrees, `[0, 360)`.
    pub heading: f64,
    /// The Kalman-filtered position; the vehicle's primary location.
    pub location: LatLng,
    /// The raw interpolated position, kept for diagnostics.
    pub raw_location: LatLng,
    /// Recently travelled geometry, ending at the current position.
    pub trail: Vec<LatLng>,
    /// The current position followed by the geometry still ahead; empty
    /// when the vehicle sits at the end of its route.
    pub upcoming: Vec<LatLng>,
    /// The full route geometry, display-rounded.
    pub path: Vec<LatLng>,
    /// Generation time, RFC 3339.
    pub last_update: String,
    /// Generation time, epoch seconds.
    pub last_update_epoch: f64,
    pub eta_minutes: f64,
    pub identifiers: VehicleIdentifiers,
    pub route: SnapshotRoute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_priority_order() {
        // Progress bounds win over the congestion check.
        assert_eq!(VehicleStatus::classify(0.01, 1.0, 40.0), VehicleStatus::Departing);
        assert_eq!(VehicleStatus::classify(0.96, 1.0, 40.0), VehicleStatus::Approaching);
        // In between, slow speed means congestion.
        assert_eq!(VehicleStatus::classify(0.5, 20.0, 40.0), VehicleStatus::Congested);
        assert_eq!(VehicleStatus::classify(0.5, 35.0, 40.0), VehicleStatus::EnRoute);
    }

    #[test]
    fn status_serializes_to_display_strings() {
        let json = serde_json::to_string(&VehicleStatus::Departing).unwrap();
        assert_eq!(json, "\"Departing Terminal\"");
        assert_eq!(VehicleStatus::EnRoute.to_string(), "En Route");
    }
}
