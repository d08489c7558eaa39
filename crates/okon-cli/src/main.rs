//! OKON mission driver.
//!
//! Single binary that provides:
//! - `okon run` - gate qualification mission against the simulated vehicle
//! - `okon demo` - depth and rotation exercise
//! - `okon tree` - print a mission tree without ticking it

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tokio::signal;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use okon_bt::{BehaviourTree, Node};

mod config;
mod driver;
mod mission;
mod sim;

use config::MissionConfig;
use driver::{Driver, Outcome, SharedLog};
use sim::SimVehicle;

#[derive(Parser)]
#[command(name = "okon")]
#[command(about = "Behavior-tree missions for the OKON vehicle", version)]
struct Cli {
    /// Mission configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output, including per-tick tree and blackboard dumps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gate qualification mission
    Run(DriveArgs),

    /// Run the depth and rotation demo
    Demo(DriveArgs),

    /// Print a mission tree
    Tree {
        /// Print the demo tree instead of the gate mission
        #[arg(long)]
        demo: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct DriveArgs {
    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Write the node lifecycle trace to this file as JSON
    #[arg(long)]
    trace_out: Option<PathBuf>,
}

impl DriveArgs {
    fn apply(&self, config: &mut MissionConfig) -> Result<()> {
        if let Some(max_ticks) = self.max_ticks {
            config.driver.max_ticks = max_ticks;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.driver.tick_interval_ms = tick_ms;
        }
        config.validate()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let mut config = MissionConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Run(args)) => {
            args.apply(&mut config)?;
            let root = mission::gate_mission(&config.gate, &config.finish, config.sim.hfov_deg);
            drive(root, &config, args.trace_out.as_deref()).await
        }
        Some(Commands::Demo(args)) => {
            args.apply(&mut config)?;
            drive(mission::depth_demo(), &config, args.trace_out.as_deref()).await
        }
        Some(Commands::Tree { demo }) => {
            let root: Node<SimVehicle> = if demo {
                mission::depth_demo()
            } else {
                mission::gate_mission(&config.gate, &config.finish, config.sim.hfov_deg)
            };
            print!("{}", BehaviourTree::new(root).ascii_tree());
            Ok(())
        }
        None => {
            println!("OKON - behavior-tree missions");
            println!();
            println!("Usage: okon <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run   Run the gate qualification mission");
            println!("  demo  Run the depth and rotation demo");
            println!("  tree  Print a mission tree");
            println!();
            println!("Run 'okon --help' for more information.");
            Ok(())
        }
    }
}

async fn drive(
    root: Node<SimVehicle>,
    config: &MissionConfig,
    trace_out: Option<&Path>,
) -> Result<()> {
    let log = SharedLog::default();
    let vehicle = SimVehicle::new(config.sim.clone()).with_gate_label(&config.gate.object);
    let mut driver = Driver::new(root, vehicle, config.driver.max_ticks, log.clone())?;

    info!(
        root = %driver.tree().root().name(),
        tick_ms = config.driver.tick_interval_ms,
        max_ticks = config.driver.max_ticks,
        "Starting mission"
    );

    let mut interval = time::interval(Duration::from_millis(config.driver.tick_interval_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    let outcome = loop {
        let interrupted = tokio::select! {
            _ = interval.tick() => false,
            _ = signal::ctrl_c() => true,
        };

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        if interrupted {
            break driver.interrupt(dt);
        }
        if let Some(outcome) = driver.step(dt)? {
            break outcome;
        }
    };

    match &outcome {
        Outcome::Halted(halt) => {
            info!(tick = halt.tick, reason = %halt.reason, "Mission halted");
        }
        Outcome::TickLimit { ticks, status } => {
            warn!(ticks, status = %status, "Tick limit reached before the mission halted");
        }
        Outcome::Interrupted { ticks } => {
            warn!(ticks, "Mission interrupted");
        }
    }
    let [east, north] = driver.vehicle().position();
    info!(
        ticks = driver.ticks(),
        east,
        north,
        velocity = ?driver.vehicle().velocity(),
        "Final vehicle state"
    );

    if let Some(path) = trace_out {
        log.write_json(path)?;
        info!(path = %path.display(), events = log.event_count(), "Trace written");
    }

    Ok(())
}
