//! Landing sites: the hub, the remote ports and their pad pools
//!
//! Every change to a site's pads, queue or counters goes through
//! [`PadPool`], so pad conservation is enforced in one place.

use anyhow::{bail, Result};
use std::collections::VecDeque;

use super::geometry::HubTopology;
use super::types::{PadNumber, PortId, Position, VehicleId};

/// Where a vehicle is headed, or where it sits once landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Hub,
    Port(PortId),
}

impl Destination {
    pub fn is_hub(self) -> bool {
        matches!(self, Destination::Hub)
    }
}

/// Pads, arrival queue and traffic counters of one location
#[derive(Debug, Clone, PartialEq)]
pub struct PadPool {
    num_pads: usize,
    /// Free pad tokens; landings take from the front, takeoffs return to the back
    available: VecDeque<PadNumber>,
    /// Vehicles hovering for a pad, in order of arrival
    queue: VecDeque<VehicleId>,
    takeoffs: u32,
    landings: u32,
}

impl PadPool {
    /// Create a pool of `num_pads` pads with `occupied` pads already taken
    pub fn new(num_pads: usize, occupied: &[PadNumber]) -> Self {
        let available = (1..=num_pads)
            .map(PadNumber)
            .filter(|pad| !occupied.contains(pad))
            .collect();

        Self {
            num_pads,
            available,
            queue: VecDeque::new(),
            takeoffs: 0,
            landings: 0,
        }
    }

    pub fn num_pads(&self) -> usize {
        self.num_pads
    }

    pub fn available(&self) -> usize {
        self.available.len()
    }

    pub fn occupied(&self) -> usize {
        self.num_pads - self.available.len()
    }

    pub fn available_pads(&self) -> impl Iterator<Item = PadNumber> + '_ {
        self.available.iter().copied()
    }

    pub fn queue(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.queue.iter().copied()
    }

    pub fn takeoffs(&self) -> u32 {
        self.takeoffs
    }

    pub fn landings(&self) -> u32 {
        self.landings
    }

    /// Append a hovering vehicle to the queue unless it is already waiting.
    /// Returns its place in line (0 = head).
    pub fn join_queue(&mut self, vehicle: VehicleId) -> usize {
        match self.queue.iter().position(|&v| v == vehicle) {
            Some(index) => index,
            None => {
                self.queue.push_back(vehicle);
                self.queue.len() - 1
            }
        }
    }

    /// Grant a pad to `vehicle` if one is free and the vehicle heads the queue
    pub fn try_land(&mut self, vehicle: VehicleId) -> Option<PadNumber> {
        if self.queue.front() != Some(&vehicle) {
            return None;
        }
        let pad = self.available.pop_front()?;
        self.queue.pop_front();
        self.landings += 1;
        Some(pad)
    }

    /// Record a takeoff and return the vehicle's pad to the pool
    pub fn release(&mut self, pad: PadNumber) -> Result<()> {
        if pad.0 == 0 || pad.0 > self.num_pads {
            bail!("Pad {} does not exist (location has {} pads)", pad.0, self.num_pads);
        }
        if self.available.contains(&pad) {
            bail!("Pad {} released while already free", pad.0);
        }
        self.available.push_back(pad);
        self.takeoffs += 1;
        Ok(())
    }
}

/// Capabilities the vehicle transition needs from any landing site
pub trait LandingSite {
    /// Which endpoint this is
    fn destination(&self) -> Destination;

    /// Ground position of a pad
    fn pad_position(&self, pad: PadNumber) -> Position;

    /// Waypoint where `vehicle` hovers while waiting for a pad
    fn hover_position(&self, vehicle: VehicleId) -> Position;

    /// Mandatory dwell after landing
    fn turnaround_time(&self) -> u32;

    fn pads(&self) -> &PadPool;

    fn pads_mut(&mut self) -> &mut PadPool;

    fn is_hub(&self) -> bool {
        self.destination().is_hub()
    }
}

/// The central facility every vehicle visits between port legs
#[derive(Debug, Clone)]
pub struct SimHub {
    /// Ground position of each pad
    pub pad_locations: Vec<Position>,
    /// Hover waypoint for each port's vehicle
    pub hover_locations: Vec<Position>,
    pub turnaround_time: u32,
    pub pads: PadPool,
}

impl SimHub {
    pub fn new(topology: HubTopology, turnaround_time: u32) -> Self {
        let pads = PadPool::new(topology.pads.len(), &[]);
        Self {
            pad_locations: topology.pads,
            hover_locations: topology.hover,
            turnaround_time,
            pads,
        }
    }
}

impl LandingSite for SimHub {
    fn destination(&self) -> Destination {
        Destination::Hub
    }

    fn pad_position(&self, pad: PadNumber) -> Position {
        self.pad_locations[pad.0 - 1]
    }

    fn hover_position(&self, vehicle: VehicleId) -> Position {
        self.hover_locations[vehicle.0]
    }

    fn turnaround_time(&self) -> u32 {
        self.turnaround_time
    }

    fn pads(&self) -> &PadPool {
        &self.pads
    }

    fn pads_mut(&mut self) -> &mut PadPool {
        &mut self.pads
    }
}

/// A remote port, home of exactly one vehicle
#[derive(Debug, Clone)]
pub struct SimPort {
    pub id: PortId,
    pub location: Position,
    pub hover_location: Position,
    pub turnaround_time: u32,
    /// One-way flight time to the hub in minutes
    pub time_to_hub: u32,
    pub pads: PadPool,
}

impl SimPort {
    /// Create a port whose first pad is taken by its home vehicle
    pub fn new(
        id: PortId,
        location: Position,
        hover_location: Position,
        num_pads: usize,
        turnaround_time: u32,
        time_to_hub: u32,
    ) -> Self {
        Self {
            id,
            location,
            hover_location,
            turnaround_time,
            time_to_hub,
            pads: PadPool::new(num_pads, &[PadNumber(1)]),
        }
    }
}

impl LandingSite for SimPort {
    fn destination(&self) -> Destination {
        Destination::Port(self.id)
    }

    fn pad_position(&self, _pad: PadNumber) -> Position {
        self.location
    }

    fn hover_position(&self, _vehicle: VehicleId) -> Position {
        self.hover_location
    }

    fn turnaround_time(&self) -> u32 {
        self.turnaround_time
    }

    fn pads(&self) -> &PadPool {
        &self.pads
    }

    fn pads_mut(&mut self) -> &mut PadPool {
        &mut self.pads
    }
}

/// Both ends of one vehicle's route, borrowed for a single transition
pub struct Route<'a> {
    pub hub: &'a mut SimHub,
    pub port: &'a mut SimPort,
}

impl Route<'_> {
    pub fn site(&self, destination: Destination) -> &dyn LandingSite {
        match destination {
            Destination::Hub => &*self.hub,
            Destination::Port(_) => &*self.port,
        }
    }

    pub fn site_mut(&mut self, destination: Destination) -> &mut dyn LandingSite {
        match destination {
            Destination::Hub => &mut *self.hub,
            Destination::Port(_) => &mut *self.port,
        }
    }

    /// The endpoint opposite `destination`
    pub fn other_end(&self, destination: Destination) -> Destination {
        match destination {
            Destination::Hub => Destination::Port(self.port.id),
            Destination::Port(_) => Destination::Hub,
        }
    }
}
