//! Sensitivity analysis over recharge rate and hub turnaround time

use anyhow::{Context, Result};
use log::info;
use ordered_float::OrderedFloat;

use super::config::SimConfig;
use super::observer::{StepObserver, WorldSnapshot};
use super::stats::StopReason;
use super::world::SimWorld;

/// One cell of the sweep grid
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub recharge_rate: f64,
    pub hub_turnaround: u32,
    pub total_operations: u32,
    pub operations_per_hour: f64,
    pub stop: StopReason,
}

struct Silent;

impl StepObserver for Silent {
    fn observe(&mut self, _snapshot: &WorldSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Run `base` once for every (recharge rate, hub turnaround) pair.
///
/// Rows come back in grid order: recharge rates outer, turnaround inner.
pub fn run_sweep(
    base: &SimConfig,
    recharge_rates: &[f64],
    hub_turnarounds: &[u32],
    steps: usize,
) -> Result<Vec<SweepRow>> {
    let mut rows = Vec::with_capacity(recharge_rates.len() * hub_turnarounds.len());

    for &recharge_rate in recharge_rates {
        for &hub_turnaround in hub_turnarounds {
            let config = SimConfig {
                recharge_rate,
                hub_turnaround,
                ..base.clone()
            };
            let mut world = SimWorld::new(config).with_context(|| {
                format!(
                    "Sweep point recharge={} turnaround={} is invalid",
                    recharge_rate, hub_turnaround
                )
            })?;
            let report = world.run(steps, &mut Silent)?;

            info!(
                "recharge {} / turnaround {}: {} operations",
                recharge_rate,
                hub_turnaround,
                report.total_operations()
            );
            rows.push(SweepRow {
                recharge_rate,
                hub_turnaround,
                total_operations: report.total_operations(),
                operations_per_hour: report.operations_per_hour(),
                stop: report.stop,
            });
        }
    }

    Ok(rows)
}

/// Highest-throughput row that ran to completion; earlier rows win ties
pub fn best_row(rows: &[SweepRow]) -> Option<&SweepRow> {
    rows.iter()
        .filter(|row| row.stop == StopReason::Completed)
        .rev()
        .max_by_key(|row| OrderedFloat(row.operations_per_hour))
}
