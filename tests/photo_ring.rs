use approx::assert_abs_diff_eq;
use giftbox_engine::config::SceneConfig;
use giftbox_engine::ecs::{PhotoPhase, SceneWorld, TextureSlot};
use giftbox_engine::events::SceneEvent;
use giftbox_engine::layout::distance_scale;
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn scene_with(particles: u32, seed: u64) -> SceneWorld {
    let mut config = SceneConfig { seed: Some(seed), ..Default::default() };
    config.particles.count = particles;
    SceneWorld::new(config)
}

fn run_for(scene: &mut SceneWorld, seconds: f32) {
    let frames = (seconds / DT).ceil() as usize;
    for _ in 0..frames {
        scene.update(DT);
    }
}

fn expected_home(index: usize, count: usize) -> Vec3 {
    let i = index as f32;
    let angle = i / count as f32 * std::f32::consts::TAU;
    let height = (i * 1.5).sin() * 3.0 * 0.8 + (i * 2.3).cos() * 3.0 * 0.5;
    Vec3::new(angle.cos() * 8.0, height, angle.sin() * 8.0)
}

#[test]
fn open_box_spawns_nine_hidden_photos_at_the_box() {
    let mut scene = scene_with(20, 4);
    assert!(scene.open_box());
    assert!(scene.is_box_open());
    assert!(scene.is_photos_animating());
    let photos = scene.photos();
    assert_eq!(photos.len(), 9);
    for (i, photo) in photos.iter().enumerate() {
        assert_eq!(photo.index, i);
        assert_eq!(photo.name, format!("B2-2-{}", i + 1));
        assert_eq!(photo.source, format!("photos/B2-2-{}.png", i + 1));
        assert_eq!(photo.pose.translation, Vec3::new(0.0, -8.0, 0.0));
        assert_eq!(photo.pose.opacity, 0.0);
        assert_eq!(photo.texture, TextureSlot::Pending);
        assert!(matches!(photo.phase, PhotoPhase::Idle { .. }));
    }
    assert_eq!(scene.particle_count(), 20);
    assert_eq!(scene.take_texture_requests().len(), 9);
    assert!(scene.drain_events().contains(&SceneEvent::BoxOpened { photos: 9, particles: 20 }));
    assert!(!scene.open_box(), "a second open is ignored while the box is open");
}

#[test]
fn ring_positions_do_not_depend_on_the_seed() {
    let mut a = scene_with(0, 1);
    let mut b = scene_with(0, 2);
    a.open_box();
    b.open_box();
    let homes_a: Vec<Vec3> = a.photos().iter().map(|p| p.home).collect();
    let homes_b: Vec<Vec3> = b.photos().iter().map(|p| p.home).collect();
    assert_eq!(homes_a, homes_b);
    for (i, home) in homes_a.iter().enumerate() {
        let expected = expected_home(i, 9);
        assert_abs_diff_eq!(home.x, expected.x, epsilon = 1e-4);
        assert_abs_diff_eq!(home.y, expected.y, epsilon = 1e-4);
        assert_abs_diff_eq!(home.z, expected.z, epsilon = 1e-4);
    }
}

#[test]
fn photos_launch_one_stagger_step_apart() {
    let mut scene = scene_with(0, 3);
    scene.open_box();
    for _ in 0..5 {
        scene.update(0.05);
    }
    let launched: Vec<bool> =
        scene.photos().iter().map(|p| !matches!(p.phase, PhotoPhase::Idle { .. })).collect();
    assert_eq!(launched, vec![true, true, true, false, false, false, false, false, false]);
    let events = scene.drain_events();
    let launches = events.iter().filter(|e| matches!(e, SceneEvent::PhotoLaunched { .. })).count();
    assert_eq!(launches, 3);
}

#[test]
fn fly_in_fades_in_and_settles_on_the_ring() {
    let mut scene = scene_with(0, 6);
    scene.open_box();
    run_for(&mut scene, 1.0);
    let midway = scene.photos();
    let first = &midway[0];
    assert!(matches!(first.phase, PhotoPhase::FlyingIn(_)));
    assert!(first.pose.opacity > 0.0 && first.pose.opacity < 1.0);
    assert!(scene.is_photos_animating());

    run_for(&mut scene, 2.0);
    assert!(!scene.is_photos_animating());
    let photos = scene.photos();
    for photo in &photos {
        assert_eq!(photo.phase, PhotoPhase::Active);
        assert_abs_diff_eq!(photo.pose.opacity, 1.0, epsilon = 1e-6);
        assert!((photo.pose.translation - photo.home).length() < 1e-4);
    }
    let arrivals =
        scene.drain_events().iter().filter(|e| matches!(e, SceneEvent::PhotoArrived { .. })).count();
    assert_eq!(arrivals, 9);
}

#[test]
fn resting_photos_face_the_camera_and_scale_with_distance() {
    let mut scene = scene_with(0, 9);
    scene.open_box();
    run_for(&mut scene, 3.0);
    let eye = scene.camera().position;
    let selection = scene.settings().selection.clone();
    for photo in scene.photos() {
        let to_eye = (eye - photo.pose.translation).normalize();
        assert_abs_diff_eq!(photo.yaw, to_eye.x.atan2(to_eye.z), epsilon = 1e-4);
        let expected = distance_scale(photo.pose.translation.distance(eye), &selection);
        assert_abs_diff_eq!(photo.pose.scale.x, expected, epsilon = 1e-5);
        assert_abs_diff_eq!(photo.pose.scale.y, expected, epsilon = 1e-5);
        assert_eq!(photo.pose.scale.z, 1.0);
        assert!((0.5..=2.0).contains(&photo.pose.scale.x));
    }
}

#[test]
fn explicit_billboard_uses_the_given_eye() {
    let mut scene = scene_with(0, 10);
    scene.open_box();
    run_for(&mut scene, 3.0);
    let eye = Vec3::new(0.0, 0.0, 40.0);
    scene.billboard_photos(eye);
    for photo in scene.photos() {
        let to_eye = eye - photo.pose.translation;
        assert_abs_diff_eq!(photo.yaw, to_eye.x.atan2(to_eye.z), epsilon = 1e-4);
        assert!((0.5..=2.0).contains(&photo.pose.scale.x));
    }
}

#[test]
fn configured_photo_count_and_sources_are_used() {
    let mut config = SceneConfig { seed: Some(1), ..Default::default() };
    config.particles.count = 0;
    config.photos.count = 3;
    config.photos.sources = vec!["a.png".to_string()];
    let mut scene = SceneWorld::new(config);
    scene.open_box();
    let sources: Vec<String> = scene.photos().into_iter().map(|p| p.source).collect();
    assert_eq!(sources, vec!["a.png", "photos/B2-2-2.png", "photos/B2-2-3.png"]);
}
