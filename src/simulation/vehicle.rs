//! Vehicle state and the per-step transition
//!
//! Each step a vehicle is in exactly one of four sub-states, checked in
//! this order: ready to depart, dwelling, hovering for a pad, en route.

use anyhow::{Context, Result};

use super::site::{Destination, Route};
use super::types::{PadNumber, Position, VehicleId, VehicleStatus};

/// What a vehicle did during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleEvent {
    /// Left `from` and is now flying to the other end of its route
    Departed { from: Destination },
    /// Ready at the hub but below the energy reserve; recharged instead
    HeldForCharge,
    /// Counting down its turnaround on the ground
    Dwelling,
    /// Waiting at the hover waypoint; `place` is its position in the queue
    Hovering { place: usize },
    /// Touched down on `pad` at `at`
    Landed { at: Destination, pad: PadNumber },
    /// Advanced one step along its flight leg
    Cruising,
}

/// A vehicle shuttling between its home port and the hub
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub max_energy: f64,
    pub recharge_rate: f64,
    pub discharge_rate: f64,
    pub position: Position,
    pub energy: f64,
    /// Current leg's target, or where the vehicle sits when grounded.
    /// `None` before the first departure (parked at the home port).
    pub destination: Option<Destination>,
    pub status: VehicleStatus,
    /// Minutes left on the ground
    pub wait_time: u32,
    /// Minutes left before reaching the destination's hover waypoint
    pub travel_time: u32,
    pub dx: f64,
    pub dy: f64,
    pub pad: Option<PadNumber>,
    /// Completed landings
    pub trip: u32,
}

impl SimVehicle {
    /// A fully charged vehicle parked on pad 1 of its home port
    pub fn new(
        id: VehicleId,
        position: Position,
        max_energy: f64,
        recharge_rate: f64,
        discharge_rate: f64,
    ) -> Self {
        Self {
            id,
            max_energy,
            recharge_rate,
            discharge_rate,
            position,
            energy: max_energy,
            destination: None,
            status: VehicleStatus::Ground,
            wait_time: 0,
            travel_time: 0,
            dx: 0.0,
            dy: 0.0,
            pad: Some(PadNumber(1)),
            trip: 0,
        }
    }

    /// Where the vehicle is grounded, or was last grounded
    pub fn current_site(&self, route: &Route) -> Destination {
        self.destination
            .unwrap_or_else(|| Destination::Port(route.port.id))
    }

    pub fn at_hub(&self) -> bool {
        self.destination == Some(Destination::Hub)
    }

    fn recharge(&mut self) {
        self.energy = (self.energy + self.recharge_rate).min(self.max_energy);
    }

    /// Apply one step of the transition, mutating the route's sites as needed.
    ///
    /// `departure_reserve` is the energy the vehicle must hold to leave the hub.
    pub fn update(&mut self, route: &mut Route, departure_reserve: f64) -> Result<VehicleEvent> {
        match self.status {
            VehicleStatus::Ground if self.wait_time == 0 => {
                if self.at_hub() && self.energy < departure_reserve {
                    self.recharge();
                    return Ok(VehicleEvent::HeldForCharge);
                }
                self.depart(route)
            }
            VehicleStatus::Ground => {
                self.wait_time -= 1;
                if self.at_hub() && self.energy < self.max_energy {
                    self.recharge();
                }
                Ok(VehicleEvent::Dwelling)
            }
            VehicleStatus::Flight if self.travel_time == 0 => self.approach(route),
            VehicleStatus::Flight => {
                self.position.x += self.dx;
                self.position.y += self.dy;
                self.travel_time -= 1;
                self.energy -= self.discharge_rate;
                Ok(VehicleEvent::Cruising)
            }
        }
    }

    fn depart(&mut self, route: &mut Route) -> Result<VehicleEvent> {
        let from = self.current_site(route);
        let to = route.other_end(from);

        let pad = self
            .pad
            .take()
            .with_context(|| format!("Vehicle {} is grounded without a pad", self.id.0))?;
        let origin = route.site_mut(from);
        origin.pads_mut().release(pad).with_context(|| {
            format!("Vehicle {} could not release its pad", self.id.0)
        })?;
        self.position = origin.hover_position(self.id);

        let target = route.site(to).hover_position(self.id);
        self.destination = Some(to);
        self.travel_time = route.port.time_to_hub;
        (self.dx, self.dy) = self.position.step_towards(&target, self.travel_time);

        self.energy -= self.discharge_rate / 2.0;
        self.status = VehicleStatus::Flight;
        Ok(VehicleEvent::Departed { from })
    }

    fn approach(&mut self, route: &mut Route) -> Result<VehicleEvent> {
        let at = self
            .destination
            .with_context(|| format!("Vehicle {} is flying without a destination", self.id.0))?;

        self.energy -= self.discharge_rate / 2.0;

        let site = route.site_mut(at);
        let place = site.pads_mut().join_queue(self.id);
        let Some(pad) = site.pads_mut().try_land(self.id) else {
            return Ok(VehicleEvent::Hovering { place });
        };

        self.status = VehicleStatus::Ground;
        self.trip += 1;
        self.wait_time = site.turnaround_time();
        self.pad = Some(pad);
        self.position = site.pad_position(pad);
        Ok(VehicleEvent::Landed { at, pad })
    }
}
