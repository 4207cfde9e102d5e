//! Main simulation world that ties everything together
//!
//! The world owns the hub, the ports and the fleet, applies the vehicle
//! transition once per step in ascending vehicle id order, and stops the
//! run when any vehicle's energy goes negative.
//!
//! Vehicles see each other's changes within a step: a pad released by an
//! earlier vehicle can be taken by a later one in the same step.

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use super::config::SimConfig;
use super::geometry::{hub_topology, ring};
use super::observer::{step_to_clock, SiteView, StepObserver, VehicleView, WorldSnapshot};
use super::site::{Destination, LandingSite, Route, SimHub, SimPort};
use super::stats::{RunReport, StopReason};
use super::types::{PortId, VehicleId, VehicleStatus};
use super::vehicle::{SimVehicle, VehicleEvent};

/// Result of applying one step
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Index of the step just applied
    pub step: usize,
    /// What each vehicle did, in processing order
    pub events: Vec<(VehicleId, VehicleEvent)>,
    /// Set when this step drove a vehicle below zero energy
    pub depleted: Option<StopReason>,
}

/// The main simulation world
pub struct SimWorld {
    pub config: SimConfig,
    pub hub: SimHub,
    /// Ports indexed by [`PortId`]
    pub ports: Vec<SimPort>,
    /// Vehicles indexed by [`VehicleId`]; vehicle `i` serves port `i`
    pub vehicles: Vec<SimVehicle>,
    /// Steps applied so far
    pub step: usize,
    halted: Option<StopReason>,
}

impl SimWorld {
    /// Build the hub, ports and fleet for a validated configuration
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate().context("Invalid simulation configuration")?;

        let hub = SimHub::new(
            hub_topology(config.hub_pads, config.num_ports),
            config.hub_turnaround,
        );

        let port_locations = ring(config.port_radius, config.num_ports);
        let hover_locations = ring(config.port_hover_radius(), config.num_ports);

        let ports: Vec<SimPort> = port_locations
            .iter()
            .zip(&hover_locations)
            .zip(&config.time_to_hub)
            .enumerate()
            .map(|(index, ((&location, &hover), &time_to_hub))| {
                SimPort::new(
                    PortId(index),
                    location,
                    hover,
                    config.port_pads,
                    config.port_turnaround,
                    time_to_hub,
                )
            })
            .collect();

        let vehicles = ports
            .iter()
            .map(|port| {
                SimVehicle::new(
                    VehicleId(port.id.0),
                    port.location,
                    config.max_energy,
                    config.recharge_rate,
                    config.discharge_rate,
                )
            })
            .collect();

        Ok(Self {
            config,
            hub,
            ports,
            vehicles,
            step: 0,
            halted: None,
        })
    }

    /// Why the world stopped accepting steps, if it has
    pub fn halted(&self) -> Option<StopReason> {
        self.halted
    }

    /// Apply the vehicle transition to every vehicle, then check the energy floor
    pub fn step(&mut self) -> Result<StepReport> {
        if let Some(reason) = self.halted {
            bail!("Simulation already stopped: {:?}", reason);
        }

        let step = self.step;
        let mut events = Vec::with_capacity(self.vehicles.len());

        for vehicle in &mut self.vehicles {
            let port = self
                .ports
                .get_mut(vehicle.id.home_port().0)
                .with_context(|| format!("Vehicle {} has no home port", vehicle.id.0))?;
            let reserve = self.config.departure_reserve(port.time_to_hub);
            let mut route = Route {
                hub: &mut self.hub,
                port,
            };

            let event = vehicle
                .update(&mut route, reserve)
                .with_context(|| format!("Vehicle {} failed at step {}", vehicle.id.0, step))?;

            match event {
                VehicleEvent::Departed { from } => debug!(
                    "[{}] vehicle {} took off from {:?}",
                    step_to_clock(step),
                    vehicle.id.0,
                    from
                ),
                VehicleEvent::Landed { at, pad } => debug!(
                    "[{}] vehicle {} landed at {:?} on pad {} (trip {})",
                    step_to_clock(step),
                    vehicle.id.0,
                    at,
                    pad.0,
                    vehicle.trip
                ),
                _ => {}
            }
            events.push((vehicle.id, event));
        }

        self.step += 1;

        let depleted = self
            .vehicles
            .iter()
            .find(|v| v.energy < 0.0)
            .map(|v| StopReason::EnergyDepleted {
                step,
                vehicle: v.id,
                energy: v.energy,
            });
        if let Some(reason) = depleted {
            warn!(
                "Energy level is below 0. Simulation stopped at step {} ({:?})",
                step, reason
            );
            self.halted = Some(reason);
        }

        Ok(StepReport {
            step,
            events,
            depleted,
        })
    }

    /// Run up to `steps` steps, showing the observer the state before each
    /// step and once more at the end.
    pub fn run(&mut self, steps: usize, observer: &mut dyn StepObserver) -> Result<RunReport> {
        info!(
            "Running {} steps: {} ports, {} hub pads, recharge rate {}",
            steps, self.config.num_ports, self.config.hub_pads, self.config.recharge_rate
        );

        let mut stop = StopReason::Completed;
        for _ in 0..steps {
            observer.observe(&self.snapshot())?;
            if let Some(reason) = self.step()?.depleted {
                stop = reason;
                break;
            }
        }

        let last = self.snapshot();
        observer.observe(&last)?;

        let report = RunReport::from_snapshot(&last, stop);
        info!(
            "Run finished after {} steps: {} operations, {} trips",
            report.steps,
            report.total_operations(),
            report.total_trips()
        );
        Ok(report)
    }

    /// Copy of everything an observer may see
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            step: self.step,
            clock: step_to_clock(self.step),
            vehicles: self
                .vehicles
                .iter()
                .map(|v| VehicleView {
                    id: v.id,
                    position: v.position,
                    heading: (v.dx, v.dy),
                    energy: v.energy,
                    status: v.status,
                    destination: v.destination,
                    pad: v.pad,
                    trip: v.trip,
                })
                .collect(),
            hub: SiteView::from_pool(
                Destination::Hub,
                Default::default(),
                self.hub.pads(),
            ),
            hub_pads: self.hub.pad_locations.clone(),
            hub_hover: self.hub.hover_locations.clone(),
            ports: self
                .ports
                .iter()
                .map(|p| SiteView::from_pool(p.destination(), p.location, p.pads()))
                .collect(),
            port_hover: self.ports.iter().map(|p| p.hover_location).collect(),
            hub_turnaround: self.hub.turnaround_time,
            recharge_rate: self.config.recharge_rate,
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== UAM Simulation Summary ===");
        println!("Time: {} (step {})", step_to_clock(self.step), self.step);
        println!(
            "Hub: pads {}/{} free, T={}, LO={}, queue={:?}",
            self.hub.pads.available(),
            self.hub.pads.num_pads(),
            self.hub.pads.takeoffs(),
            self.hub.pads.landings(),
            self.hub.pads.queue().map(|v| v.0).collect::<Vec<_>>()
        );

        println!("--- Ports ---");
        for port in &self.ports {
            println!(
                "  Port {}: time to hub={} min, T={}, LO={}",
                port.id.0 + 1,
                port.time_to_hub,
                port.pads.takeoffs(),
                port.pads.landings()
            );
        }

        println!("--- Vehicles ---");
        for vehicle in &self.vehicles {
            let state = match (vehicle.status, vehicle.travel_time) {
                (VehicleStatus::Ground, _) => format!("ground (wait {})", vehicle.wait_time),
                (VehicleStatus::Flight, 0) => "hovering".to_string(),
                (VehicleStatus::Flight, left) => format!("flight ({} min left)", left),
            };
            println!(
                "  Vehicle {}: {}, energy={:.1}/{:.1}, trips={}, position=({:.2}, {:.2})",
                vehicle.id.0 + 1,
                state,
                vehicle.energy,
                vehicle.max_energy,
                vehicle.trip,
                vehicle.position.x,
                vehicle.position.y
            );
        }
    }
}
