//! Headless pursuit demo
//!
//! Runs one agent chasing a moving target around a wall and logs a summary.
//! Pass a `.ron` or `.json` scene file to override the default scene.
//!
//! ```text
//! RUST_LOG=debug cargo run -- demos/scene.ron
//! ```

use env_logger::Env;
use pursuit::core::{Simulation, SimulationConfig};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("Simulation error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let mut sim = Simulation::new(config)?;
    let summary = sim.run();

    log::info!("{}", summary.format_summary());
    if let Some(position) = sim.agent_position() {
        log::info!(
            "Agent finished at {} ({})",
            position,
            if sim.agent_engaged() {
                "engaged"
            } else {
                "idle"
            }
        );
    }

    Ok(())
}
