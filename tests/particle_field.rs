use giftbox_engine::config::SceneConfig;
use giftbox_engine::ecs::SceneWorld;
use giftbox_engine::events::{ReleasedKind, SceneEvent};
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn seeded(seed: u64) -> SceneWorld {
    SceneWorld::new(SceneConfig { seed: Some(seed), ..Default::default() })
}

#[test]
fn spawn_places_particles_in_an_annulus_around_the_origin() {
    let mut scene = seeded(3);
    let origin = Vec3::new(1.0, 2.0, -1.0);
    let spawned = scene.spawn_particles(origin, 300);
    assert_eq!(spawned.len(), 300);
    for particle in scene.particles() {
        let offset = particle.translation - origin;
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        assert!((3.0 - 1e-4..15.0 + 1e-4).contains(&horizontal), "radius {horizontal} outside annulus");
        assert!(offset.y.abs() <= 7.0, "height {} outside band", offset.y);
        assert_eq!(particle.reference, particle.translation);
        assert_eq!(particle.opacity, 1.0);
        assert!(!particle.collecting);
    }
}

#[test]
fn seeded_scenes_place_particles_identically() {
    let mut a = seeded(99);
    let mut b = seeded(99);
    a.spawn_particles(Vec3::ZERO, 40);
    b.spawn_particles(Vec3::ZERO, 40);
    let pa: Vec<Vec3> = a.particles().iter().map(|p| p.translation).collect();
    let pb: Vec<Vec3> = b.particles().iter().map(|p| p.translation).collect();
    assert_eq!(pa, pb);

    let mut c = seeded(100);
    c.spawn_particles(Vec3::ZERO, 40);
    let pc: Vec<Vec3> = c.particles().iter().map(|p| p.translation).collect();
    assert_ne!(pa, pc);
}

#[test]
fn floating_particles_stay_inside_the_reflective_bound() {
    let mut scene = seeded(5);
    scene.spawn_particles(Vec3::ZERO, 120);
    for _ in 0..3600 {
        scene.update(DT);
    }
    for particle in scene.particles() {
        let offset = particle.translation - particle.reference;
        assert!(particle.translation.is_finite());
        assert!(offset.length() <= 12.05, "particle drifted {} from its reference", offset.length());
        assert!(offset.y.abs() <= 6.05, "particle rose {} above its reference", offset.y);
    }
}

#[test]
fn particles_drift_and_sparkle_within_material_ranges() {
    let mut scene = seeded(8);
    scene.spawn_particles(Vec3::ZERO, 64);
    let before: Vec<Vec3> = scene.particles().iter().map(|p| p.translation).collect();
    for _ in 0..120 {
        scene.update(DT);
    }
    let after = scene.particles();
    let moved = before.iter().zip(after.iter()).filter(|(b, a)| (**b - a.translation).length() > 1e-3).count();
    assert_eq!(moved, after.len(), "every floating particle should drift");
    for particle in after {
        assert!((0.09 - 1e-4..=0.72 + 1e-4).contains(&particle.emissive_intensity));
        assert!((1.6 - 1e-3..=36.0 + 1e-3).contains(&particle.reflectivity));
        assert!((0.02 - 1e-5..=0.1 + 1e-5).contains(&particle.roughness));
    }
}

#[test]
fn clear_releases_every_particle() {
    let mut scene = seeded(1);
    scene.spawn_particles(Vec3::ZERO, 25);
    scene.drain_events();
    assert_eq!(scene.clear_particles(), 25);
    assert_eq!(scene.particle_count(), 0);
    let released = scene
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, SceneEvent::EntityReleased { kind: ReleasedKind::Particle, .. }))
        .count();
    assert_eq!(released, 25);
    assert_eq!(scene.clear_particles(), 0);
}

#[test]
fn zero_delta_frames_leave_particles_in_place() {
    let mut scene = seeded(2);
    scene.spawn_particles(Vec3::ZERO, 10);
    let before: Vec<Vec3> = scene.particles().iter().map(|p| p.translation).collect();
    scene.update(0.0);
    scene.update(f32::NAN);
    let after: Vec<Vec3> = scene.particles().iter().map(|p| p.translation).collect();
    assert_eq!(before, after);
}

#[test]
fn particles_expose_their_jewel_look() {
    let mut scene = seeded(5);
    scene.spawn_particles(Vec3::ZERO, 300);
    let particles = scene.particles();
    assert!(particles.iter().any(|particle| particle.metallic));
    assert!(particles.iter().any(|particle| !particle.metallic));
    for particle in &particles {
        assert!(particle.color.cmpge(Vec3::ZERO).all() && particle.color.cmple(Vec3::ONE).all());
        assert!(particle.half_extents.cmpgt(Vec3::ZERO).all());
        assert!(particle.half_extents.max_element() <= 0.12, "{:?}", particle.half_extents);
        let base = if particle.metallic { 0.3 } else { 0.4 };
        assert!(particle.emissive_intensity >= base * 0.3 - 1e-5);
    }
}
