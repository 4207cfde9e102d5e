//! Layout helpers for the hub and the ring of ports
//!
//! Pure functions, no state.

use std::f64::consts::TAU;

use super::types::{Position, HUB_HOVER_RING_RADIUS, HUB_PAD_RING_RADIUS};

/// Pad positions and hover waypoints of the hub
#[derive(Debug, Clone, PartialEq)]
pub struct HubTopology {
    /// One ground position per pad, pad `n` at index `n - 1`
    pub pads: Vec<Position>,
    /// One hover waypoint per port, index-aligned with port ids
    pub hover: Vec<Position>,
}

/// Convert polar coordinates to cartesian points, one point per angle
pub fn polar_to_cartesian(radius: f64, angles: &[f64]) -> Vec<Position> {
    angles
        .iter()
        .map(|angle| Position::new(radius * angle.cos(), radius * angle.sin()))
        .collect()
}

/// `count` angles evenly spaced over a full turn, starting at zero
pub fn evenly_spaced_angles(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| TAU * i as f64 / count as f64)
        .collect()
}

/// Points evenly spaced on a ring of the given radius
pub fn ring(radius: f64, count: usize) -> Vec<Position> {
    polar_to_cartesian(radius, &evenly_spaced_angles(count))
}

/// Lay out the hub for `num_pads` pads serving `num_ports` ports.
///
/// A single pad sits at the origin; more pads are spread on a ring.
/// Hover waypoint `k` lies on the same bearing as port `k`.
pub fn hub_topology(num_pads: usize, num_ports: usize) -> HubTopology {
    let pads = if num_pads == 1 {
        vec![Position::new(0.0, 0.0)]
    } else {
        ring(HUB_PAD_RING_RADIUS, num_pads)
    };

    HubTopology {
        pads,
        hover: ring(HUB_HOVER_RING_RADIUS, num_ports),
    }
}
