//! Skyline simulator
//!
//! Runs one master and several receivers against simulated HT16K33 banks and
//! an in-memory radio, then draws what every building shows.

mod air;
mod config;
mod input;
mod panel;
mod sim;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;

use config::SimConfig;
use sim::Simulation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Show {
    /// Draw every building once the run is over
    #[default]
    Final,
    /// Draw the master whenever it sends a frame
    Frames,
    /// Draw nothing
    None,
}

#[derive(Parser)]
#[command(name = "skyline-sim")]
#[command(about = "Simulate a Skyline master and its receivers")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of receivers
    #[arg(short, long)]
    receivers: Option<usize>,

    /// Override the simulation length in ticks
    #[arg(short, long)]
    ticks: Option<u32>,

    /// What to draw
    #[arg(long, default_value = "final", value_enum)]
    show: Show,

    /// Make the master's radio fail to start
    #[arg(long)]
    radio_down: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(if cli.verbose {
        "debug"
    } else {
        "info"
    }))
    .format_timestamp_millis()
    .init();

    let mut config = match &cli.config {
        Some(path) => {
            let config = SimConfig::load(path)?;
            info!("Loaded configuration from: {}", path.display());
            config
        }
        None => SimConfig::default(),
    };
    if let Some(receivers) = cli.receivers {
        config.receivers = receivers;
    }
    if let Some(ticks) = cli.ticks {
        config.ticks = ticks;
    }
    config.validate()?;

    let mut sim = Simulation::new(&config, cli.radio_down)?;
    info!(
        "{} receiver(s), {} ticks of {} ms",
        config.receivers, config.ticks, config.tick_ms
    );

    for tick in 0..config.ticks {
        let sent = sim.step(tick);
        if sent && cli.show == Show::Frames {
            println!(
                "frame {} (digit {}, {:?})",
                sim.master().last_broadcast().sampling_number,
                sim.master().digit(),
                sim.master().mode()
            );
            print!("{}", panel::render(&panel::grid(&sim.master_panel())));
        }
    }

    let master = sim.master();
    info!(
        "master: {} peer(s), next sampling number {}",
        master.registry().len(),
        master.sampling_number()
    );
    for node in sim.receivers() {
        let stats = node.stats();
        info!(
            "receiver {}: {} accepted, {} dropped, {} gap(s)",
            node.mac, stats.accepted, stats.dropped, stats.gaps
        );
    }

    if cli.show == Show::Final {
        println!("master");
        print!("{}", panel::render(&panel::grid(&sim.master_panel())));
        for node in sim.receivers() {
            println!("receiver {}", node.mac);
            print!("{}", panel::render(&panel::grid(&node.panel())));
        }
    }

    Ok(())
}
