//! AI module
//!
//! Target pursuit with aggro tracking and single-obstacle detours.

mod aggro;
mod probe;
mod pursuit;
mod steering;

pub use aggro::AggroState;
pub use probe::{EmptyWorld, ObjectId, ObstacleBounds, RayCaster, RayHit};
pub use pursuit::{Pursuer, PursuitConfig, Tick, TickReport};
pub use steering::{
    Detour, DetourEdge, EDGE_CORNERS, detour_corners, detour_edges, direct_heading, horizontal,
    look_rotation, select_detour,
};
