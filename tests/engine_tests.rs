//! Invariants of the engine checked over longer runs of busy networks

use std::collections::HashMap;

use uam_sim::simulation::{
    Destination, SimConfig, SimWorld, SnapshotRecorder, StopReason, VehicleEvent, VehicleId,
    VehicleStatus,
};

/// Six ports sharing two hub pads, with enough energy that nobody runs dry
fn busy_config() -> SimConfig {
    SimConfig {
        hub_pads: 2,
        max_energy: 100.0,
        recharge_rate: 3.0,
        ..SimConfig::default()
    }
}

fn busy_world() -> SimWorld {
    SimWorld::new(busy_config()).unwrap()
}

fn grounded_at(world: &SimWorld, site: Destination) -> usize {
    world
        .vehicles
        .iter()
        .filter(|v| v.status == VehicleStatus::Ground)
        .filter(|v| match site {
            Destination::Hub => v.destination == Some(Destination::Hub),
            Destination::Port(port) => {
                v.id.home_port() == port && v.destination != Some(Destination::Hub)
            }
        })
        .count()
}

#[test]
fn test_pad_conservation() {
    let mut world = busy_world();

    for _ in 0..400 {
        world.step().unwrap();

        let hub = &world.hub.pads;
        assert!(hub.occupied() <= hub.num_pads());
        assert_eq!(hub.occupied() + hub.available(), hub.num_pads());
        assert_eq!(hub.occupied(), grounded_at(&world, Destination::Hub));

        for port in &world.ports {
            assert!(port.pads.occupied() <= port.pads.num_pads());
            assert_eq!(
                port.pads.occupied(),
                grounded_at(&world, Destination::Port(port.id))
            );
        }
    }
}

#[test]
fn test_fifo_no_overtaking() {
    let mut world = SimWorld::new(SimConfig {
        hub_pads: 1,
        max_energy: 120.0,
        recharge_rate: 4.0,
        energy_margin: 2.5,
        ..SimConfig::default()
    })
    .unwrap();

    // Per site: the order vehicles reached the hover point, and the order they landed
    let mut joined: HashMap<String, Vec<VehicleId>> = HashMap::new();
    let mut landed: HashMap<String, Vec<VehicleId>> = HashMap::new();
    let mut hovering: Vec<bool> = vec![false; world.vehicles.len()];

    for _ in 0..400 {
        let report = world.step().unwrap();
        for (id, event) in report.events {
            let site = format!("{:?}", world.vehicles[id.0].destination);
            match event {
                VehicleEvent::Hovering { .. } => {
                    if !hovering[id.0] {
                        joined.entry(site).or_default().push(id);
                        hovering[id.0] = true;
                    }
                }
                VehicleEvent::Landed { .. } => {
                    if !hovering[id.0] {
                        joined.entry(site.clone()).or_default().push(id);
                    }
                    landed.entry(site).or_default().push(id);
                    hovering[id.0] = false;
                }
                _ => {}
            }
        }
    }

    assert!(!landed.is_empty());
    for (site, landings) in &landed {
        let joins = &joined[site];
        assert_eq!(&joins[..landings.len()], &landings[..], "site {}", site);
    }
}

#[test]
fn test_energy_changes_follow_rates() {
    let config = SimConfig {
        hub_pads: 1,
        max_energy: 120.0,
        recharge_rate: 4.0,
        ..SimConfig::default()
    };
    let (max, recharge, discharge) = (config.max_energy, config.recharge_rate, config.discharge_rate);
    let mut world = SimWorld::new(config).unwrap();

    for _ in 0..300 {
        let before: Vec<(f64, bool)> = world
            .vehicles
            .iter()
            .map(|v| (v.energy, v.at_hub()))
            .collect();
        let report = world.step().unwrap();

        for (id, event) in report.events {
            let (energy, at_hub) = before[id.0];
            let after = world.vehicles[id.0].energy;
            let expected = match event {
                VehicleEvent::Departed { .. } => energy - discharge / 2.0,
                VehicleEvent::Cruising => energy - discharge,
                VehicleEvent::Hovering { .. } | VehicleEvent::Landed { .. } => {
                    energy - discharge / 2.0
                }
                VehicleEvent::HeldForCharge => (energy + recharge).min(max),
                VehicleEvent::Dwelling if at_hub => (energy + recharge).min(max),
                VehicleEvent::Dwelling => energy,
            };
            assert_eq!(after, expected, "vehicle {} on {:?}", id.0, event);
            assert!(after <= max);
        }
    }
}

#[test]
fn test_destinations_alternate_and_legs_take_time_to_hub() {
    let mut world = busy_world();
    let count = world.vehicles.len();
    let mut last_departure: Vec<Option<Destination>> = vec![None; count];
    let mut cruise_steps = vec![0u32; count];
    let mut legs_checked = 0;

    for _ in 0..400 {
        let report = world.step().unwrap();
        for (id, event) in report.events {
            let vehicle = &world.vehicles[id.0];
            match event {
                VehicleEvent::Departed { from } => {
                    if let Some(previous) = last_departure[id.0] {
                        assert_ne!(previous, from, "vehicle {} left the same place twice", id.0);
                    } else {
                        assert!(!from.is_hub(), "first departure must be from the home port");
                    }
                    assert_ne!(vehicle.destination, Some(from));
                    last_departure[id.0] = Some(from);
                    cruise_steps[id.0] = 0;
                }
                VehicleEvent::Cruising => cruise_steps[id.0] += 1,
                VehicleEvent::Hovering { .. } | VehicleEvent::Landed { .. } => {
                    if cruise_steps[id.0] > 0 {
                        assert_eq!(cruise_steps[id.0], world.ports[id.0].time_to_hub);
                        assert_eq!(vehicle.travel_time, 0);
                        legs_checked += 1;
                    }
                    cruise_steps[id.0] = 0;
                }
                _ => {}
            }
        }
    }

    assert!(legs_checked > count);
}

#[test]
fn test_runs_are_deterministic() {
    let run = || {
        let mut world = busy_world();
        let mut recorder = SnapshotRecorder::default();
        let report = world.run(250, &mut recorder).unwrap();
        (report, recorder.snapshots)
    };

    let (first_report, first) = run();
    let (second_report, second) = run();

    assert_eq!(first_report, second_report);
    assert_eq!(first.len(), 251);
    assert_eq!(first, second);
}

#[test]
fn test_run_reports_counters() {
    let mut world = busy_world();
    let mut recorder = SnapshotRecorder::default();
    let report = world.run(120, &mut recorder).unwrap();

    assert_eq!(report.stop, StopReason::Completed);
    assert_eq!(report.steps, 120);
    assert_eq!(report.ports.len(), 6);

    let last = recorder.snapshots.last().unwrap();
    assert_eq!(last.step, 120);
    assert_eq!(last.clock, "09:00");
    assert_eq!(report.total_operations(), last.total_operations());

    let landings: u32 = report.hub.landings + report.ports.iter().map(|p| p.landings).sum::<u32>();
    assert_eq!(landings, report.total_trips());
    assert!(report.operations_per_hour() > 0.0);

    // Every vehicle leaves its port in the first step
    let after_first = &recorder.snapshots[1];
    assert!(after_first.ports.iter().all(|p| p.takeoffs == 1));
    assert!(after_first
        .vehicles
        .iter()
        .all(|v| v.status == VehicleStatus::Flight));
}

#[test]
fn test_initial_state() {
    let config = SimConfig {
        port_pads: 3,
        ..SimConfig::default()
    };
    let world = SimWorld::new(config).unwrap();

    assert_eq!(world.hub.pads.available(), 2);
    assert_eq!(world.hub.pads.takeoffs(), 0);
    for (port, vehicle) in world.ports.iter().zip(&world.vehicles) {
        assert_eq!(vehicle.id.home_port(), port.id);
        assert_eq!(vehicle.position, port.location);
        assert_eq!(vehicle.energy, vehicle.max_energy);
        assert_eq!(vehicle.status, VehicleStatus::Ground);
        assert_eq!(vehicle.destination, None);
        assert_eq!(vehicle.trip, 0);
        assert_eq!(port.pads.occupied(), 1);
        assert_eq!(port.pads.available(), 2);
    }
    assert_eq!(
        world.ports.iter().map(|p| p.time_to_hub).collect::<Vec<_>>(),
        vec![15, 18, 21, 24, 27, 30]
    );
}
