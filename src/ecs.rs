mod profiler;
pub mod systems;
mod types;
mod world;

pub use profiler::{SystemProfileScope, SystemProfiler, SystemTimingSummary};
pub use types::*;
pub use world::SceneWorld;
