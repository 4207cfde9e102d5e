//! Standalone air mobility simulation module
//!
//! This module contains the discrete-time engine: a hub, a ring of ports
//! and a fleet of vehicles shuttling between them one minute per step.
//! Rendering is left to observers fed with read-only snapshots.

mod config;
mod geometry;
mod observer;
mod site;
mod stats;
mod sweep;
mod types;
mod vehicle;
mod world;

pub use config::{
    time_to_hub_ladder, SimConfig, DEFAULT_ENERGY_MARGIN, DEFAULT_MAX_TIME_TO_HUB,
    DEFAULT_MIN_TIME_TO_HUB,
};
pub use geometry::{evenly_spaced_angles, hub_topology, polar_to_cartesian, ring, HubTopology};
pub use observer::{
    step_to_clock, MapRenderer, SiteView, SnapshotRecorder, StepObserver, SummaryLogger,
    VehicleView, WorldSnapshot,
};
pub use site::{Destination, LandingSite, PadPool, Route, SimHub, SimPort};
pub use stats::{RunReport, SiteCounters, StopReason, VehicleSummary};
pub use sweep::{best_row, run_sweep, SweepRow};
pub use types::{
    PadNumber, PortId, Position, VehicleId, VehicleStatus, HUB_HOVER_RING_RADIUS,
    HUB_PAD_RING_RADIUS, PORT_HOVER_OFFSET, PORT_RING_RADIUS, START_HOUR,
};
pub use vehicle::{SimVehicle, VehicleEvent};
pub use world::{SimWorld, StepReport};
