//! Step-by-step timing of small hand-checked scenarios

use uam_sim::simulation::{
    Destination, PadNumber, PortId, SimConfig, SimWorld, StepReport, StopReason, VehicleEvent,
    VehicleId, VehicleStatus,
};

/// One hub pad, one port, 15 minute legs, recharge 3, discharge 1
fn single_route_config() -> SimConfig {
    SimConfig {
        hub_pads: 1,
        num_ports: 1,
        port_pads: 1,
        hub_turnaround: 10,
        port_turnaround: 5,
        time_to_hub: vec![15],
        max_energy: 75.0,
        recharge_rate: 3.0,
        discharge_rate: 1.0,
        ..SimConfig::with_ports(1)
    }
}

fn run_steps(world: &mut SimWorld, steps: usize) -> Vec<StepReport> {
    (0..steps)
        .map(|_| world.step().expect("step should succeed"))
        .collect()
}

fn event_of(report: &StepReport, vehicle: usize) -> VehicleEvent {
    report.events[vehicle].1
}

#[test]
fn test_single_route_timeline() {
    let mut world = SimWorld::new(single_route_config()).unwrap();
    let reports = run_steps(&mut world, 80);
    let port = Destination::Port(PortId(0));

    assert_eq!(event_of(&reports[0], 0), VehicleEvent::Departed { from: port });
    for step in 1..=15 {
        assert_eq!(event_of(&reports[step], 0), VehicleEvent::Cruising, "step {}", step);
    }
    assert_eq!(
        event_of(&reports[16], 0),
        VehicleEvent::Landed {
            at: Destination::Hub,
            pad: PadNumber(1)
        }
    );
    for step in 17..=26 {
        assert_eq!(event_of(&reports[step], 0), VehicleEvent::Dwelling, "step {}", step);
    }
    assert_eq!(
        event_of(&reports[27], 0),
        VehicleEvent::Departed {
            from: Destination::Hub
        }
    );
    assert_eq!(
        event_of(&reports[43], 0),
        VehicleEvent::Landed {
            at: port,
            pad: PadNumber(1)
        }
    );
    assert_eq!(event_of(&reports[49], 0), VehicleEvent::Departed { from: port });
    assert_eq!(
        event_of(&reports[65], 0),
        VehicleEvent::Landed {
            at: Destination::Hub,
            pad: PadNumber(1)
        }
    );
    assert_eq!(
        event_of(&reports[76], 0),
        VehicleEvent::Departed {
            from: Destination::Hub
        }
    );
}

#[test]
fn test_single_route_energy_ledger() {
    let mut world = SimWorld::new(single_route_config()).unwrap();

    run_steps(&mut world, 1);
    assert_eq!(world.vehicles[0].energy, 74.5);

    run_steps(&mut world, 15);
    assert_eq!(world.vehicles[0].energy, 59.5);
    assert_eq!(world.vehicles[0].travel_time, 0);
    assert!(world.vehicles[0].position.distance(&world.hub.hover_locations[0]) < 1e-9);

    // Landing costs the hover rate
    run_steps(&mut world, 1);
    assert_eq!(world.vehicles[0].energy, 59.0);
    assert_eq!(world.vehicles[0].trip, 1);
    assert_eq!(world.vehicles[0].position, world.hub.pad_locations[0]);

    // Dwelling at the hub recharges up to the maximum
    run_steps(&mut world, 10);
    assert_eq!(world.vehicles[0].energy, 75.0);
    assert_eq!(world.vehicles[0].wait_time, 0);

    // Out and back to the port
    run_steps(&mut world, 17);
    assert_eq!(world.vehicles[0].trip, 2);
    assert_eq!(world.vehicles[0].energy, 59.0);

    // No recharge at the port
    run_steps(&mut world, 5);
    assert_eq!(world.vehicles[0].energy, 59.0);
    assert_eq!(world.vehicles[0].status, VehicleStatus::Ground);
}

#[test]
fn test_landing_counters_match_legs() {
    let mut world = SimWorld::new(single_route_config()).unwrap();
    run_steps(&mut world, 100);

    let vehicle = &world.vehicles[0];
    let hub_landings = world.hub.pads.landings();
    let port_landings = world.ports[0].pads.landings();

    assert_eq!(hub_landings + port_landings, vehicle.trip);
    // Legs alternate, starting towards the hub
    assert!(hub_landings == port_landings || hub_landings == port_landings + 1);
    assert_eq!(world.ports[0].pads.takeoffs(), port_landings + 1);
}

/// With pad contention, a pad released by an earlier vehicle is taken by a
/// later vehicle in the same step.
#[test]
fn test_fifo_landing_with_same_step_visibility() {
    let config = SimConfig {
        hub_pads: 1,
        hub_turnaround: 5,
        time_to_hub: vec![10, 10, 10],
        ..SimConfig::with_ports(3)
    };
    let mut world = SimWorld::new(config).unwrap();
    let reports = run_steps(&mut world, 30);

    assert!(matches!(event_of(&reports[11], 0), VehicleEvent::Landed { .. }));
    assert_eq!(event_of(&reports[11], 1), VehicleEvent::Hovering { place: 0 });
    assert_eq!(event_of(&reports[11], 2), VehicleEvent::Hovering { place: 1 });

    // Vehicle 0 leaves at step 17, vehicle 1 takes the pad in the same step
    assert_eq!(
        event_of(&reports[17], 0),
        VehicleEvent::Departed {
            from: Destination::Hub
        }
    );
    assert!(matches!(event_of(&reports[17], 1), VehicleEvent::Landed { .. }));
    assert_eq!(event_of(&reports[17], 2), VehicleEvent::Hovering { place: 0 });

    assert!(matches!(event_of(&reports[23], 2), VehicleEvent::Landed { .. }));

    assert_eq!(world.vehicles[2].trip, 1);
    assert_eq!(world.hub.pads.landings(), 3);
}

#[test]
fn test_hover_energy_drain() {
    let config = SimConfig {
        hub_pads: 1,
        hub_turnaround: 5,
        time_to_hub: vec![10, 10, 10],
        ..SimConfig::with_ports(3)
    };
    let mut world = SimWorld::new(config).unwrap();
    run_steps(&mut world, 24);

    // Hovered from step 11, landed at step 23
    assert_eq!(world.vehicles[2].status, VehicleStatus::Ground);
    assert_eq!(world.vehicles[2].energy, 75.0 - 0.5 - 10.0 - 13.0 * 0.5);
}

#[test]
fn test_vehicle_held_for_charge_at_hub() {
    let config = SimConfig {
        hub_pads: 1,
        hub_turnaround: 0,
        time_to_hub: vec![10],
        max_energy: 40.0,
        recharge_rate: 1.0,
        discharge_rate: 1.0,
        energy_margin: 3.0,
        ..SimConfig::with_ports(1)
    };
    let mut world = SimWorld::new(config).unwrap();
    let reports = run_steps(&mut world, 14);

    assert!(matches!(event_of(&reports[11], 0), VehicleEvent::Landed { .. }));
    assert_eq!(world.vehicles[0].trip, 1);
    assert_eq!(event_of(&reports[12], 0), VehicleEvent::HeldForCharge);
    assert_eq!(
        event_of(&reports[13], 0),
        VehicleEvent::Departed {
            from: Destination::Hub
        }
    );
    assert_eq!(world.vehicles[0].energy, 29.5);
}

#[test]
fn test_energy_floor_stops_run() {
    let config = SimConfig {
        hub_pads: 1,
        time_to_hub: vec![30],
        max_energy: 20.0,
        recharge_rate: 1.0,
        discharge_rate: 5.0,
        ..SimConfig::with_ports(1)
    };
    let mut world = SimWorld::new(config).unwrap();
    let report = world
        .run(100, &mut uam_sim::simulation::SnapshotRecorder::default())
        .unwrap();

    assert_eq!(
        report.stop,
        StopReason::EnergyDepleted {
            step: 4,
            vehicle: VehicleId(0),
            energy: -2.5
        }
    );
    assert_eq!(report.steps, 5);
    assert!(!report.completed());
    assert!(world.halted().is_some());
    assert!(world.step().is_err());
}
