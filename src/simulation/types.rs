//! Core types for the air mobility simulation
//!
//! These are standalone types shared by every part of the engine.

/// Identifier of a vehicle. Vehicle `i` is permanently bound to port `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

/// Identifier of a remote port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub usize);

impl VehicleId {
    /// The port this vehicle shuttles from
    pub fn home_port(self) -> PortId {
        PortId(self.0)
    }
}

/// Physical pad number at a location (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadNumber(pub usize);

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    /// On a pad, either dwelling or ready to depart
    Ground,
    /// Airborne, en route or hovering at a waypoint
    Flight,
}

/// A 2D position in the simulation plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Per-step displacement that covers the way to `other` in `steps` steps
    pub fn step_towards(&self, other: &Position, steps: u32) -> (f64, f64) {
        let steps = f64::from(steps);
        ((other.x - self.x) / steps, (other.y - self.y) / steps)
    }
}

/// Radius of the ring the hub pads sit on when there is more than one
pub const HUB_PAD_RING_RADIUS: f64 = 0.8;

/// Radius of the ring of hover waypoints around the hub
pub const HUB_HOVER_RING_RADIUS: f64 = 1.4;

/// Default distance of the remote ports from the hub
pub const PORT_RING_RADIUS: f64 = 4.0;

/// How far inside the port ring the port hover waypoints sit
pub const PORT_HOVER_OFFSET: f64 = 0.4;

/// Wall-clock hour of step 0
pub const START_HOUR: usize = 7;
