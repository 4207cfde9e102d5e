use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;

use uam_sim::simulation::{
    best_row, run_sweep, time_to_hub_ladder, MapRenderer, SimConfig, SimWorld, StepObserver,
    StopReason, SummaryLogger, WorldSnapshot, DEFAULT_ENERGY_MARGIN, DEFAULT_MAX_TIME_TO_HUB,
    DEFAULT_MIN_TIME_TO_HUB,
};

#[derive(Parser)]
#[command(name = "uam_sim")]
#[command(about = "Urban air mobility hub-and-port simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single scenario and print the network as it evolves
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Number of one-minute steps to simulate
        #[arg(long, default_value = "100")]
        num_itr: usize,

        /// Draw the map every N steps (0 disables the map)
        #[arg(long, default_value = "10")]
        map_every: usize,
    },
    /// Count takeoffs and landings over a grid of recharge rates and hub turnaround times
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,

        #[arg(long, default_value = "100")]
        num_itr: usize,

        /// Recharge rates to try (units/min)
        #[arg(long, value_delimiter = ',', default_values_t = vec![2.0, 3.0, 4.0, 5.0])]
        recharge_rates: Vec<f64>,

        /// Hub turnaround times to try (min)
        #[arg(long, value_delimiter = ',', default_values_t = vec![6, 8, 10])]
        hub_turnarounds: Vec<u32>,
    },
}

#[derive(Args, Clone)]
struct ScenarioArgs {
    /// Number of pads at the hub
    #[arg(long, default_value = "2")]
    num_pads: usize,

    /// Number of remote ports (one vehicle each)
    #[arg(long, default_value = "6")]
    num_ports: usize,

    /// Number of pads at each port
    #[arg(long, default_value = "1")]
    port_pads: usize,

    /// Turnaround time at the hub (min)
    #[arg(long, default_value = "10")]
    hub_turnaround: u32,

    /// Turnaround time at the ports (min)
    #[arg(long, default_value = "5")]
    port_turnaround: u32,

    #[arg(long, default_value = "75")]
    max_energy: f64,

    /// Units per minute regained while grounded at the hub
    #[arg(long, default_value = "2")]
    recharge_rate: f64,

    /// Units per minute spent in cruise flight
    #[arg(long, default_value = "1")]
    discharge_rate: f64,

    /// Flight time of the closest port (min)
    #[arg(long, default_value_t = DEFAULT_MIN_TIME_TO_HUB)]
    min_time_to_hub: u32,

    /// Flight time of the farthest port (min)
    #[arg(long, default_value_t = DEFAULT_MAX_TIME_TO_HUB)]
    max_time_to_hub: u32,

    /// Energy reserve to leave the hub, as a multiple of the port's flight time
    #[arg(long, default_value_t = DEFAULT_ENERGY_MARGIN)]
    energy_margin: f64,
}

impl ScenarioArgs {
    fn to_config(&self) -> SimConfig {
        SimConfig {
            hub_pads: self.num_pads,
            num_ports: self.num_ports,
            port_pads: self.port_pads,
            hub_turnaround: self.hub_turnaround,
            port_turnaround: self.port_turnaround,
            time_to_hub: time_to_hub_ladder(
                self.min_time_to_hub,
                self.max_time_to_hub,
                self.num_ports,
            ),
            max_energy: self.max_energy,
            recharge_rate: self.recharge_rate,
            discharge_rate: self.discharge_rate,
            energy_margin: self.energy_margin,
            ..SimConfig::with_ports(self.num_ports)
        }
    }
}

/// Fans each snapshot out to the map (when enabled) and the step log
struct Display {
    map: Option<MapRenderer>,
    log: SummaryLogger,
}

impl StepObserver for Display {
    fn observe(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        if let Some(map) = &mut self.map {
            map.observe(snapshot)?;
        }
        self.log.observe(snapshot)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            scenario,
            num_itr,
            map_every,
        } => run_single(scenario.to_config(), num_itr, map_every),
        Command::Sweep {
            scenario,
            num_itr,
            recharge_rates,
            hub_turnarounds,
        } => run_grid(&scenario.to_config(), num_itr, &recharge_rates, &hub_turnarounds),
    }
}

/// Run one scenario, drawing the map along the way
fn run_single(config: SimConfig, steps: usize, map_every: usize) -> Result<()> {
    let mut world = SimWorld::new(config)?;

    println!("Initial state:");
    world.print_summary();
    println!();

    let mut display = Display {
        map: (map_every > 0).then(|| MapRenderer::new(map_every)),
        log: SummaryLogger,
    };
    let report = world.run(steps, &mut display)?;

    println!("=== Final State ===");
    world.print_summary();

    info!("=== SIMULATION COMPLETE ===");
    info!("Steps run: {}", report.steps);
    info!("Total operations: {}", report.total_operations());
    info!("Total trips: {}", report.total_trips());
    info!("Operations per hour: {:.1}", report.operations_per_hour());
    if let StopReason::EnergyDepleted { step, vehicle, energy } = report.stop {
        info!(
            "Stopped early: vehicle {} reached energy {:.1} at step {}",
            vehicle.0 + 1,
            energy,
            step
        );
    }
    Ok(())
}

/// Run the sensitivity grid and print a table of results
fn run_grid(
    base: &SimConfig,
    steps: usize,
    recharge_rates: &[f64],
    hub_turnarounds: &[u32],
) -> Result<()> {
    let rows = run_sweep(base, recharge_rates, hub_turnarounds, steps)?;

    println!(
        "{:>10} {:>11} {:>11} {:>10}  outcome",
        "recharge", "turnaround", "operations", "ops/hour"
    );
    for row in &rows {
        let outcome = match row.stop {
            StopReason::Completed => "completed".to_string(),
            StopReason::EnergyDepleted { step, .. } => format!("depleted at step {}", step),
        };
        println!(
            "{:>10} {:>11} {:>11} {:>10.1}  {}",
            row.recharge_rate,
            row.hub_turnaround,
            row.total_operations,
            row.operations_per_hour,
            outcome
        );
    }

    if let Some(best) = best_row(&rows) {
        info!(
            "Best: recharge rate {} with hub turnaround {} ({} operations)",
            best.recharge_rate, best.hub_turnaround, best.total_operations
        );
    }
    Ok(())
}
