pub mod animation;
pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod ecs;
pub mod events;
pub mod input;
pub mod layout;
pub mod scenario;
pub mod textures;

pub use app::{run, run_with_overrides, SessionSummary};
pub use ecs::SceneWorld;

pub(crate) fn wrap_angle(mut radians: f32) -> f32 {
    let two_pi = 2.0 * std::f32::consts::PI;
    while radians > std::f32::consts::PI {
        radians -= two_pi;
    }
    while radians < -std::f32::consts::PI {
        radians += two_pi;
    }
    radians
}

/// Keeps an oscillator phase in `[0, 2π)` so long sessions do not lose precision.
pub(crate) fn wrap_phase(radians: f32) -> f32 {
    radians.rem_euclid(std::f32::consts::TAU)
}
