//! End-of-run statistics

use super::observer::WorldSnapshot;
use super::types::VehicleId;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopReason {
    /// The step budget was used up
    Completed,
    /// A vehicle's energy went below zero during `step`
    EnergyDepleted {
        step: usize,
        vehicle: VehicleId,
        energy: f64,
    },
}

/// Takeoff and landing counts of one location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SiteCounters {
    pub takeoffs: u32,
    pub landings: u32,
}

impl SiteCounters {
    pub fn operations(&self) -> u32 {
        self.takeoffs + self.landings
    }
}

/// Final state of one vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSummary {
    pub id: VehicleId,
    pub trips: u32,
    pub energy: f64,
}

/// Outcome of [`SimWorld::run`](super::SimWorld::run)
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Steps actually applied
    pub steps: usize,
    pub stop: StopReason,
    pub hub: SiteCounters,
    pub ports: Vec<SiteCounters>,
    pub vehicles: Vec<VehicleSummary>,
}

impl RunReport {
    pub fn from_snapshot(snapshot: &WorldSnapshot, stop: StopReason) -> Self {
        let counters = |takeoffs, landings| SiteCounters { takeoffs, landings };
        Self {
            steps: snapshot.step,
            stop,
            hub: counters(snapshot.hub.takeoffs, snapshot.hub.landings),
            ports: snapshot
                .ports
                .iter()
                .map(|p| counters(p.takeoffs, p.landings))
                .collect(),
            vehicles: snapshot
                .vehicles
                .iter()
                .map(|v| VehicleSummary {
                    id: v.id,
                    trips: v.trip,
                    energy: v.energy,
                })
                .collect(),
        }
    }

    pub fn completed(&self) -> bool {
        self.stop == StopReason::Completed
    }

    /// Touchdowns and liftoffs across the hub and all ports
    pub fn total_operations(&self) -> u32 {
        self.hub.operations() + self.ports.iter().map(SiteCounters::operations).sum::<u32>()
    }

    pub fn total_trips(&self) -> u32 {
        self.vehicles.iter().map(|v| v.trips).sum()
    }

    pub fn operations_per_hour(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        f64::from(self.total_operations()) * 60.0 / self.steps as f64
    }
}
