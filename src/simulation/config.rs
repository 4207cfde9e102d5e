//! Scenario parameters for a simulation run
//!
//! All values are plain numbers; the command line maps its flags onto
//! [`SimConfig`] and the engine validates it before the first step.

use anyhow::{bail, Result};
use log::warn;

use super::types::{PORT_HOVER_OFFSET, PORT_RING_RADIUS};

/// Fastest port-to-hub flight in the default ladder (minutes)
pub const DEFAULT_MIN_TIME_TO_HUB: u32 = 15;
/// Slowest port-to-hub flight in the default ladder (minutes)
pub const DEFAULT_MAX_TIME_TO_HUB: u32 = 30;
/// Default energy reserve multiplier applied to a port's flight time
pub const DEFAULT_ENERGY_MARGIN: f64 = 3.0;

/// Configuration of the hub, the ports and the fleet
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Landing pads at the hub
    pub hub_pads: usize,
    /// Number of remote ports, and therefore vehicles
    pub num_ports: usize,
    /// Landing pads at each port
    pub port_pads: usize,
    /// Minutes a vehicle dwells at the hub before departing
    pub hub_turnaround: u32,
    /// Minutes a vehicle dwells at its port before departing
    pub port_turnaround: u32,
    /// One-way flight time of each port, index-aligned with ports
    pub time_to_hub: Vec<u32>,
    pub max_energy: f64,
    /// Units per minute regained while dwelling at the hub
    pub recharge_rate: f64,
    /// Units per minute spent in cruise flight
    pub discharge_rate: f64,
    /// A vehicle leaves the hub only with at least `energy_margin * time_to_hub` energy
    pub energy_margin: f64,
    /// Distance of the ports from the hub
    pub port_radius: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::with_ports(6)
    }
}

impl SimConfig {
    /// Default scenario with `num_ports` ports and a matching flight-time ladder
    pub fn with_ports(num_ports: usize) -> Self {
        Self {
            hub_pads: 2,
            num_ports,
            port_pads: 1,
            hub_turnaround: 10,
            port_turnaround: 5,
            time_to_hub: time_to_hub_ladder(
                DEFAULT_MIN_TIME_TO_HUB,
                DEFAULT_MAX_TIME_TO_HUB,
                num_ports,
            ),
            max_energy: 75.0,
            recharge_rate: 2.0,
            discharge_rate: 1.0,
            energy_margin: DEFAULT_ENERGY_MARGIN,
            port_radius: PORT_RING_RADIUS,
        }
    }

    /// Radius of the ring of port hover waypoints
    pub fn port_hover_radius(&self) -> f64 {
        self.port_radius - PORT_HOVER_OFFSET
    }

    /// Energy a vehicle bound to a port with this flight time must hold to leave the hub
    pub fn departure_reserve(&self, time_to_hub: u32) -> f64 {
        self.energy_margin * f64::from(time_to_hub)
    }

    /// Check the scenario for values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.num_ports == 0 {
            bail!("At least one port is required");
        }
        if self.hub_pads == 0 {
            bail!("The hub needs at least one pad");
        }
        if self.port_pads == 0 {
            bail!("Each port needs at least one pad");
        }
        if self.time_to_hub.len() != self.num_ports {
            bail!(
                "Got {} flight times for {} ports",
                self.time_to_hub.len(),
                self.num_ports
            );
        }
        if let Some(port) = self.time_to_hub.iter().position(|&t| t == 0) {
            bail!("Flight time to hub for port {} must be at least one minute", port);
        }
        for (name, value) in [
            ("max energy", self.max_energy),
            ("recharge rate", self.recharge_rate),
            ("discharge rate", self.discharge_rate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("The {} must be a positive number, got {}", name, value);
            }
        }
        if !self.energy_margin.is_finite() || self.energy_margin < 0.0 {
            bail!(
                "Energy margin must be a non-negative number, got {}",
                self.energy_margin
            );
        }
        if !self.port_radius.is_finite() || self.port_radius <= PORT_HOVER_OFFSET {
            bail!(
                "Port radius must exceed the hover offset of {}, got {}",
                PORT_HOVER_OFFSET,
                self.port_radius
            );
        }

        for (port, &time) in self.time_to_hub.iter().enumerate() {
            let reserve = self.departure_reserve(time);
            if reserve > self.max_energy {
                warn!(
                    "Vehicle {} needs {:.1} energy to leave the hub but holds at most {:.1}; it will stay grounded there",
                    port, reserve, self.max_energy
                );
            }
        }

        Ok(())
    }
}

/// Integer flight times spread linearly from `min` to `max` over `count` ports.
///
/// Fractional values are truncated, a single port gets `min`.
pub fn time_to_hub_ladder(min: u32, max: u32, count: usize) -> Vec<u32> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (f64::from(max) - f64::from(min)) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        return max;
                    }
                    (f64::from(min) + step * i as f64).trunc() as u32
                })
                .collect()
        }
    }
}
