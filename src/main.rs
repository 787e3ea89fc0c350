use std::time::Duration;

use chrono::Utc;
use fleet_sim::Simulation;

fn main() {
    let mut sim = Simulation::with_preset_fleet();

    println!("Simulating {} routes...", sim.route_count());
    for _ in 0..5 {
        let snapshot = sim.tracking_snapshot(Utc::now());
        for vehicle in &snapshot.vehicles {
            println!(
                "{:>8} [{}] {:>24} {:6.1} km/h hdg {:5.1} eta {:5.1} min",
                vehicle.name,
                vehicle.route.id,
                vehicle.status.label(),
                vehicle.speed_kmh,
                vehicle.heading,
                vehicle.eta_minutes,
            );
        }
        println!();
        std::thread::sleep(Duration::from_secs(2));
    }

    let snapshot = sim.tracking_snapshot(Utc::now());
    println!("{}", serde_json::to_string_pretty(&snapshot).unwrap());
}
