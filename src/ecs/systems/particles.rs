use super::collect::{step_collect, CollectStep};
use crate::animation::Pose;
use crate::config::ParticleConfig;
use crate::ecs::profiler::SystemProfiler;
use crate::ecs::types::*;
use crate::events::{EventBus, ReleasedKind, SceneEvent};
use bevy_ecs::prelude::*;
use glam::Vec3;

/// Reverses every drift component that is carrying the particle further out once it strays
/// past `radius` from its reference point (or past `height` vertically).
pub fn reflect_drift(offset: Vec3, drift: &mut Vec3, radius: f32, height: f32) {
    if offset.length() > radius {
        if offset.x * drift.x > 0.0 {
            drift.x = -drift.x;
        }
        if offset.z * drift.z > 0.0 {
            drift.z = -drift.z;
        }
        if offset.y * drift.y > 0.0 {
            drift.y = -drift.y;
        }
    }
    if offset.y.abs() > height && offset.y * drift.y > 0.0 {
        drift.y = -drift.y;
    }
}

/// Emissive intensity, reflectivity and roughness for a sparkle phase and rotation.
pub fn sparkle_levels(phase: f32, angles: Vec3, surface: &ParticleSurface) -> (f32, f32, f32) {
    let blink = (phase.sin() + (phase * 1.7).sin() * 0.5 + (phase * 2.3).sin() * 0.3) / 1.8;
    let blink = ((blink + 1.0) * 0.5).clamp(0.0, 1.0);
    let emissive = surface.base_emissive * (0.3 + blink * 1.5);

    let reflect = ((angles.x * 3.0).sin() + (angles.y * 2.5).sin() + (angles.z * 2.8).sin()) / 3.0;
    let reflect = ((reflect + 1.0) * 0.5).clamp(0.0, 1.0);
    let bling = 1.0 + blink * 0.5;
    let (reflectivity, roughness) = if surface.metallic {
        (surface.base_reflectivity * (1.0 + reflect * 5.0) * bling, 0.02 + (1.0 - reflect) * 0.03)
    } else {
        (surface.base_reflectivity * (0.8 + reflect * 2.7) * bling, 0.05 + (1.0 - reflect) * 0.05)
    };
    (emissive, reflectivity, roughness)
}

pub fn advance_particle(
    particle: &Particle,
    motion: &mut ParticleMotion,
    transform: &mut Transform3D,
    floating: bool,
    dt: f32,
    config: &ParticleConfig,
) {
    motion.angles += motion.spin * dt;
    transform.rotation = motion.rotation();
    if !floating {
        return;
    }
    transform.translation += motion.drift * dt;
    let offset = transform.translation - particle.reference;
    reflect_drift(offset, &mut motion.drift, config.float_radius, config.float_height);
}

/// Spin and float drift with a reflective bound around each particle's reference point.
pub fn sys_float_particles(
    mut profiler: ResMut<SystemProfiler>,
    clock: Res<SceneClock>,
    settings: Res<SceneSettings>,
    mut particles: Query<(&Particle, &mut ParticleMotion, &mut Transform3D, &ParticlePhase)>,
) {
    let _span = profiler.scope("sys_float_particles");
    let config = &settings.0.particles;
    for (particle, mut motion, mut transform, phase) in &mut particles {
        let floating = matches!(phase, ParticlePhase::Floating);
        advance_particle(particle, &mut motion, &mut transform, floating, clock.delta, config);
    }
}

pub fn sys_sparkle_particles(
    mut profiler: ResMut<SystemProfiler>,
    clock: Res<SceneClock>,
    mut particles: Query<(&mut Sparkle, &ParticleMotion, &mut ParticleSurface)>,
) {
    let _span = profiler.scope("sys_sparkle_particles");
    for (mut sparkle, motion, mut surface) in &mut particles {
        sparkle.phase = crate::wrap_phase(sparkle.phase + sparkle.speed * clock.delta);
        let (emissive, reflectivity, roughness) = sparkle_levels(sparkle.phase, motion.angles, &surface);
        surface.emissive_intensity = emissive;
        surface.reflectivity = reflectivity;
        surface.roughness = roughness;
    }
}

pub fn sys_collect_particles(
    mut profiler: ResMut<SystemProfiler>,
    mut commands: Commands,
    clock: Res<SceneClock>,
    settings: Res<SceneSettings>,
    mut events: ResMut<EventBus>,
    mut particles: Query<(Entity, &mut ParticlePhase, &mut Transform3D, &mut Opacity)>,
) {
    let _span = profiler.scope("sys_collect_particles");
    let now = clock.elapsed;
    let duration = settings.0.collect.duration;
    for (entity, mut phase, mut transform, mut opacity) in &mut particles {
        let ParticlePhase::Collecting(mut plan) = *phase else {
            continue;
        };
        let current = Pose::new(transform.translation, transform.scale, opacity.0);
        match step_collect(&mut plan, now, duration, current) {
            CollectStep::Waiting => {}
            CollectStep::Moving(pose) => {
                transform.translation = pose.translation;
                transform.scale = pose.scale;
                opacity.0 = pose.opacity;
                *phase = ParticlePhase::Collecting(plan);
            }
            CollectStep::Finished(_) => {
                events.push(SceneEvent::EntityReleased { entity, kind: ReleasedKind::Particle });
                commands.entity(entity).despawn();
            }
        }
    }
}
