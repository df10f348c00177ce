use giftbox_engine::config::SceneConfig;
use giftbox_engine::ecs::{PhotoPhase, SceneWorld};
use giftbox_engine::events::{ReleasedKind, SceneEvent};
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn settled_scene(particles: u32) -> SceneWorld {
    let mut config = SceneConfig { seed: Some(31), ..Default::default() };
    config.particles.count = particles;
    let mut scene = SceneWorld::new(config);
    scene.open_box();
    run_for(&mut scene, 3.0);
    scene.drain_events();
    scene
}

fn run_for(scene: &mut SceneWorld, seconds: f32) {
    let frames = (seconds / DT).ceil() as usize;
    for _ in 0..frames {
        scene.update(DT);
    }
}

#[test]
fn collect_with_nothing_active_is_a_no_op() {
    let mut scene = SceneWorld::new(SceneConfig { seed: Some(1), ..Default::default() });
    assert!(!scene.collect(None));
    assert!(scene.drain_events().is_empty());
    assert!(!scene.is_collecting());
}

#[test]
fn collect_pulls_everything_into_the_box_and_closes_it_after_the_grace_period() {
    let mut scene = settled_scene(40);
    assert!(scene.collect(None));
    assert!(scene.is_collecting());
    assert!(scene.is_photos_animating());
    assert!(scene.photos().iter().all(|photo| photo.phase.is_collecting()));
    assert!(scene.particles().iter().all(|particle| particle.collecting));

    run_for(&mut scene, 1.95);
    assert_eq!(scene.photo_count(), 0, "last photo lands at 0.4 + 1.5s");
    assert_eq!(scene.particle_count(), 0);
    assert!(scene.is_box_open(), "box stays open until the grace period ends");

    run_for(&mut scene, 0.2);
    assert!(!scene.is_box_open());
    assert!(!scene.is_collecting());
    assert!(!scene.is_photos_animating());
    assert_eq!(scene.selected_photo(), None);

    let events = scene.drain_events();
    assert!(events.contains(&SceneEvent::CollectionStarted { photos: 9, particles: 40 }));
    let released_photos = events
        .iter()
        .filter(|e| matches!(e, SceneEvent::EntityReleased { kind: ReleasedKind::Photo, .. }))
        .count();
    let released_particles = events
        .iter()
        .filter(|e| matches!(e, SceneEvent::EntityReleased { kind: ReleasedKind::Particle, .. }))
        .count();
    assert_eq!((released_photos, released_particles), (9, 40));
    assert_eq!(events.last(), Some(&SceneEvent::CollectionFinished));
}

#[test]
fn collecting_photos_fade_shrink_and_head_for_the_target() {
    let mut scene = settled_scene(0);
    let target = Vec3::new(2.0, -6.0, 1.0);
    let start: Vec<f32> = scene.photos().iter().map(|p| p.pose.translation.distance(target)).collect();
    scene.collect(Some(target));

    let mut last_opacity = vec![1.0_f32; 9];
    for _ in 0..60 {
        scene.update(DT);
        for photo in scene.photos() {
            assert!(photo.pose.opacity <= last_opacity[photo.index] + 1e-6);
            assert!((0.0..=1.0).contains(&photo.pose.opacity));
            last_opacity[photo.index] = photo.pose.opacity;
        }
    }
    for photo in scene.photos() {
        assert!(photo.pose.translation.distance(target) < start[photo.index]);
        assert!(photo.pose.scale.x < 2.0 && photo.pose.scale.x >= 0.1 - 1e-6);
        assert_eq!(photo.pose.scale.z, 1.0);
    }
}

#[test]
fn photos_leave_in_index_order() {
    let mut scene = settled_scene(0);
    scene.collect(None);
    run_for(&mut scene, 1.5 + 0.05 * 4.5);
    let remaining: Vec<usize> = scene.photos().iter().map(|p| p.index).collect();
    assert_eq!(remaining, vec![5, 6, 7, 8]);
}

#[test]
fn every_particle_finishes_its_flight_before_the_box_closes() {
    let mut scene = settled_scene(800);
    assert!(scene.collect(None));
    let mut released = 0;
    let mut frames = 0;
    loop {
        let before = scene.particles();
        scene.update(DT);
        frames += 1;
        let events = scene.drain_events();
        released += events
            .iter()
            .filter(|e| matches!(e, SceneEvent::EntityReleased { kind: ReleasedKind::Particle, .. }))
            .count();
        if events.contains(&SceneEvent::CollectionFinished) {
            assert!(
                before.iter().all(|particle| particle.collecting && particle.scale < 1.0),
                "particles still waiting for their slot when the box closed"
            );
            break;
        }
        assert!(frames < 600, "collection never finished");
    }
    assert_eq!(released, 800);
    assert_eq!(scene.particle_count(), 0);
    assert!(!scene.is_box_open());
    // Last slot opens at 799 * 0.005s and flies for 1.5s.
    assert!(frames as f32 * DT >= 3.995 + 1.5 - 1e-3);
}

#[test]
fn small_collections_keep_the_configured_grace_period() {
    let mut scene = settled_scene(40);
    scene.collect(None);
    run_for(&mut scene, 1.95);
    assert_eq!(scene.particle_count(), 0);
    assert!(scene.is_box_open());
    run_for(&mut scene, 0.1);
    assert!(!scene.is_box_open());
}

#[test]
fn collecting_again_extends_the_window_and_keeps_the_reveal() {
    let mut scene = settled_scene(0);
    scene.select_photo_index(3);
    run_for(&mut scene, 0.6);
    assert!(scene.accept_selection());
    run_for(&mut scene, 1.0);
    scene.spawn_particles(Vec3::ZERO, 10);
    assert!(scene.collect(None), "new particles give the second collect work to do");
    assert!(!scene.collect(None), "nothing left that is not already collecting");

    run_for(&mut scene, 1.2);
    assert!(scene.is_box_open(), "second collect restarted the grace period");
    assert!(!scene.cell("C2-2").expect("C2-2").visible);
    run_for(&mut scene, 1.0);
    assert!(!scene.is_box_open());
    assert_eq!(scene.particle_count(), 0);
    assert!(scene.cell("C2-2").expect("C2-2").visible);
}

#[test]
fn collect_clears_the_selection() {
    let mut scene = settled_scene(0);
    scene.select_photo_index(2);
    run_for(&mut scene, 0.6);
    scene.collect(None);
    assert_eq!(scene.selected_photo(), None);
    assert!(scene.photos().iter().all(|photo| !photo.is_selected()));
    assert!(!scene.select_photo_index(2), "collecting photos are not selectable");
}

#[test]
fn accepting_photo_four_reveals_c2_2() {
    let mut scene = settled_scene(10);
    scene.select_photo_index(3);
    run_for(&mut scene, 0.6);
    assert!(scene.accept_selection());
    run_for(&mut scene, 1.0);
    assert!(!scene.cell("C2-2").expect("C2-2").visible, "reveal waits for the grace period");
    run_for(&mut scene, 1.1);
    assert!(scene.cell("C2-2").expect("C2-2").visible);
    assert!(scene.drain_events().contains(&SceneEvent::CellRevealed { label: "C2-2".to_string() }));
}

#[test]
fn accepting_photo_six_reveals_b1_2() {
    let mut scene = settled_scene(0);
    scene.select_photo_index(5);
    run_for(&mut scene, 0.6);
    scene.accept_selection();
    run_for(&mut scene, 2.1);
    assert!(scene.cell("B1-2").expect("B1-2").visible);
    assert!(!scene.cell("C2-2").expect("C2-2").visible);
}

#[test]
fn accepting_other_photos_reveals_nothing() {
    let mut scene = settled_scene(0);
    scene.select_photo_index(0);
    run_for(&mut scene, 0.6);
    scene.accept_selection();
    run_for(&mut scene, 2.1);
    assert_eq!(scene.cells().iter().filter(|cell| cell.visible).count(), 1);
}

#[test]
fn box_can_be_opened_again_after_collection() {
    let mut scene = settled_scene(5);
    scene.collect(None);
    assert!(!scene.open_box(), "box is still open during the grace period");
    run_for(&mut scene, 2.1);
    assert!(scene.open_box());
    assert_eq!(scene.photo_count(), 9);
    assert!(scene.photos().iter().all(|photo| matches!(photo.phase, PhotoPhase::Idle { .. })));
}
