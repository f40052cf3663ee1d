//! Core module
//!
//! Configuration, the fixed-step clock, debug lines and the headless runner

mod config;
mod debug;
mod simulation;
mod time;

pub use config::{
    BoxConfig, ConfigError, SceneConfig, SimulationConfig, from_json_str, from_ron_str, load,
};
pub use debug::{DebugColor, DebugLines, DebugSegment};
pub use simulation::{RunSummary, Simulation};
pub use time::SimClock;
