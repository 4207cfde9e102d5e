//! Read-only observation of the simulation between steps
//!
//! The engine hands a [`WorldSnapshot`] to a [`StepObserver`] before every
//! step. Observers never write back into the world.

use anyhow::Result;
use log::debug;

use super::site::{Destination, PadPool};
use super::types::{PadNumber, Position, VehicleId, VehicleStatus, START_HOUR};

/// Convert a step index to a wall-clock label, one step per minute from 07:00
pub fn step_to_clock(step: usize) -> String {
    let hour = START_HOUR + step / 60;
    let minute = step % 60;
    format!("{:02}:{:02}", hour, minute)
}

/// Observable state of one vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleView {
    pub id: VehicleId,
    pub position: Position,
    /// Per-step displacement, the heading arrow of a plot
    pub heading: (f64, f64),
    pub energy: f64,
    pub status: VehicleStatus,
    pub destination: Option<Destination>,
    pub pad: Option<PadNumber>,
    pub trip: u32,
}

/// Observable state of a hub or port
#[derive(Debug, Clone, PartialEq)]
pub struct SiteView {
    pub site: Destination,
    pub position: Position,
    pub num_pads: usize,
    pub available_pads: Vec<PadNumber>,
    pub queue: Vec<VehicleId>,
    pub takeoffs: u32,
    pub landings: u32,
}

impl SiteView {
    pub fn from_pool(site: Destination, position: Position, pool: &PadPool) -> Self {
        Self {
            site,
            position,
            num_pads: pool.num_pads(),
            available_pads: pool.available_pads().collect(),
            queue: pool.queue().collect(),
            takeoffs: pool.takeoffs(),
            landings: pool.landings(),
        }
    }

    pub fn occupied_pads(&self) -> usize {
        self.num_pads - self.available_pads.len()
    }
}

/// Everything an observer may see at a step boundary
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    /// Number of steps applied so far
    pub step: usize,
    pub clock: String,
    pub vehicles: Vec<VehicleView>,
    pub hub: SiteView,
    pub hub_pads: Vec<Position>,
    pub hub_hover: Vec<Position>,
    pub ports: Vec<SiteView>,
    pub port_hover: Vec<Position>,
    pub hub_turnaround: u32,
    pub recharge_rate: f64,
}

impl WorldSnapshot {
    /// Takeoffs and landings at every location so far
    pub fn total_operations(&self) -> u32 {
        std::iter::once(&self.hub)
            .chain(&self.ports)
            .map(|site| site.takeoffs + site.landings)
            .sum()
    }
}

/// Consumer of per-step snapshots
pub trait StepObserver {
    fn observe(&mut self, snapshot: &WorldSnapshot) -> Result<()>;
}

/// Keeps every snapshot it is shown
#[derive(Debug, Default)]
pub struct SnapshotRecorder {
    pub snapshots: Vec<WorldSnapshot>,
}

impl StepObserver for SnapshotRecorder {
    fn observe(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }
}

/// Logs a one-line digest of each snapshot at debug level
#[derive(Debug, Default)]
pub struct SummaryLogger;

impl StepObserver for SummaryLogger {
    fn observe(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        let airborne = snapshot
            .vehicles
            .iter()
            .filter(|v| v.status == VehicleStatus::Flight)
            .count();
        debug!(
            "[{}] step {}: {} airborne, hub queue {:?}, hub T={} LO={}",
            snapshot.clock,
            snapshot.step,
            airborne,
            snapshot.hub.queue.iter().map(|v| v.0).collect::<Vec<_>>(),
            snapshot.hub.takeoffs,
            snapshot.hub.landings
        );
        Ok(())
    }
}

/// Draws the network as a terminal map every `every` steps
#[derive(Debug)]
pub struct MapRenderer {
    every: usize,
    /// Characters per distance unit horizontally
    scale: f64,
}

impl MapRenderer {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            scale: 6.0,
        }
    }

    /// Render the snapshot as lines of text
    pub fn render(&self, snapshot: &WorldSnapshot) -> Vec<String> {
        let mut extent: f64 = 1.0;
        for port in &snapshot.ports {
            extent = extent.max(port.position.x.abs()).max(port.position.y.abs());
        }
        extent += 1.0;

        // Terminal cells are about twice as tall as they are wide
        let width = (2.0 * extent * self.scale) as usize + 1;
        let height = (extent * self.scale) as usize + 1;
        let mut grid = vec![vec![' '; width]; height];

        let to_grid = |p: &Position| -> (usize, usize) {
            let col = ((p.x + extent) * self.scale).round() as usize;
            let row = ((extent - p.y) * self.scale / 2.0).round() as usize;
            (row.min(height - 1), col.min(width - 1))
        };

        for hover in snapshot.hub_hover.iter().chain(&snapshot.port_hover) {
            let (row, col) = to_grid(hover);
            grid[row][col] = 'x';
        }

        for (index, pad) in snapshot.hub_pads.iter().enumerate() {
            let (row, col) = to_grid(pad);
            grid[row][col] = digit(index + 1);
        }

        for port in &snapshot.ports {
            let (row, col) = to_grid(&port.position);
            grid[row][col] = 'P';
        }

        for vehicle in &snapshot.vehicles {
            let (row, col) = to_grid(&vehicle.position);
            grid[row][col] = vehicle_glyph(vehicle.id);
        }

        let mut lines = Vec::with_capacity(height + 4 + snapshot.ports.len());
        lines.push(format!(
            "=== UAM Dashboard - Time: {} (step {}) ===",
            snapshot.clock, snapshot.step
        ));
        lines.push("Legend: 1-9=Hub pad, P=Port, x=Hover point, a-z=Vehicle".to_string());
        lines.extend(grid.iter().map(|row| row.iter().collect::<String>()));
        lines.push(format!(
            "Hub: T={}, LO={}, queue={:?}",
            snapshot.hub.takeoffs,
            snapshot.hub.landings,
            snapshot.hub.queue.iter().map(|v| v.0).collect::<Vec<_>>()
        ));
        for (index, port) in snapshot.ports.iter().enumerate() {
            lines.push(format!(
                "Port {}: T={}, LO={}",
                index + 1,
                port.takeoffs,
                port.landings
            ));
        }
        for vehicle in &snapshot.vehicles {
            lines.push(format!(
                "  {} vehicle {}: energy={:.1}, trips={}",
                vehicle_glyph(vehicle.id),
                vehicle.id.0 + 1,
                vehicle.energy,
                vehicle.trip
            ));
        }
        lines
    }
}

impl StepObserver for MapRenderer {
    fn observe(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        if snapshot.step % self.every == 0 {
            for line in self.render(snapshot) {
                println!("{}", line);
            }
            println!();
        }
        Ok(())
    }
}

fn digit(n: usize) -> char {
    char::from_digit((n % 10) as u32, 10).unwrap_or('#')
}

fn vehicle_glyph(id: VehicleId) -> char {
    char::from(b'a' + (id.0 % 26) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_labels() {
        assert_eq!(step_to_clock(0), "07:00");
        assert_eq!(step_to_clock(5), "07:05");
        assert_eq!(step_to_clock(60), "08:00");
        assert_eq!(step_to_clock(185), "10:05");
        assert_eq!(step_to_clock(17 * 60), "24:00");
    }
}
