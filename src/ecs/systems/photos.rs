use super::collect::{step_collect, CollectStep};
use crate::animation::{Easing, Pose, Transition};
use crate::ecs::profiler::SystemProfiler;
use crate::ecs::types::*;
use crate::events::{EventBus, ReleasedKind, SceneEvent};
use crate::layout::{billboard_yaw, distance_scale};
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

fn flat_scale(value: f32) -> Vec3 {
    Vec3::new(value, value, 1.0)
}

fn apply_pose(transform: &mut Transform3D, opacity: &mut Opacity, pose: &Pose) {
    transform.translation = pose.translation;
    transform.scale = pose.scale;
    opacity.0 = pose.opacity.clamp(0.0, 1.0);
}

/// Starts the fly-in of every idle photo whose stagger slot has opened.
pub fn sys_launch_photos(
    mut profiler: ResMut<SystemProfiler>,
    clock: Res<SceneClock>,
    settings: Res<SceneSettings>,
    view: Res<ViewCamera>,
    mut events: ResMut<EventBus>,
    mut photos: Query<(Entity, &mut Photo)>,
) {
    let _span = profiler.scope("sys_launch_photos");
    let config = &settings.0;
    let eye = view.camera.position;
    for (entity, mut photo) in &mut photos {
        let PhotoPhase::Idle { launch_at } = photo.phase else {
            continue;
        };
        if clock.elapsed < launch_at {
            continue;
        }
        let from_scale = distance_scale(photo.origin.distance(eye), &config.selection);
        let to_scale = distance_scale(photo.home.distance(eye), &config.selection);
        let transition = Transition::new(
            Pose::new(photo.origin, flat_scale(from_scale), 0.0),
            Pose::new(photo.home, flat_scale(to_scale), 1.0),
            launch_at,
            config.photos.fly_in_duration,
            Easing::CubicOut,
        );
        photo.phase = PhotoPhase::FlyingIn(transition);
        events.push(SceneEvent::PhotoLaunched { entity, index: photo.index });
    }
}

/// Advances fly-in, selection, deselection and collection transitions.
pub fn sys_drive_photo_transitions(
    mut profiler: ResMut<SystemProfiler>,
    mut commands: Commands,
    clock: Res<SceneClock>,
    settings: Res<SceneSettings>,
    mut state: ResMut<SceneState>,
    mut events: ResMut<EventBus>,
    mut photos: Query<(Entity, &mut Photo, &mut Transform3D, &mut Opacity)>,
) {
    let _span = profiler.scope("sys_drive_photo_transitions");
    let now = clock.elapsed;
    let collect_duration = settings.0.collect.duration;
    for (entity, mut photo, mut transform, mut opacity) in &mut photos {
        let index = photo.index;
        let phase = photo.phase;
        match phase {
            PhotoPhase::FlyingIn(transition) => {
                apply_pose(&mut transform, &mut opacity, &transition.sample(now));
                if transition.is_finished(now) {
                    photo.phase = PhotoPhase::Active;
                    tracing::debug!(index, name = %photo.name, "photo reached ring");
                    events.push(SceneEvent::PhotoArrived { entity, index });
                }
            }
            PhotoPhase::Selecting(transition) => {
                apply_pose(&mut transform, &mut opacity, &transition.sample(now));
                if transition.is_finished(now) {
                    photo.phase = PhotoPhase::Selected;
                    events.push(SceneEvent::ShowPhotoDialog { entity, index, name: photo.name.clone() });
                }
            }
            PhotoPhase::Deselecting(transition) => {
                apply_pose(&mut transform, &mut opacity, &transition.sample(now));
                if transition.is_finished(now) {
                    photo.phase = PhotoPhase::Active;
                }
            }
            PhotoPhase::Collecting(mut plan) => {
                let current = Pose::new(transform.translation, transform.scale, opacity.0);
                match step_collect(&mut plan, now, collect_duration, current) {
                    CollectStep::Waiting => {}
                    CollectStep::Moving(pose) => {
                        apply_pose(&mut transform, &mut opacity, &pose);
                        photo.phase = PhotoPhase::Collecting(plan);
                    }
                    CollectStep::Finished(pose) => {
                        apply_pose(&mut transform, &mut opacity, &pose);
                        if state.selected == Some(entity) {
                            state.selected = None;
                        }
                        events.push(SceneEvent::EntityReleased { entity, kind: ReleasedKind::Photo });
                        commands.entity(entity).despawn();
                    }
                }
            }
            PhotoPhase::Idle { .. } | PhotoPhase::Active | PhotoPhase::Selected => {}
        }
    }
}

/// Clears the fly-in flag once no photo is still waiting for or running its fly-in.
pub fn sys_track_photo_arrivals(mut state: ResMut<SceneState>, photos: Query<&Photo>) {
    if !state.photos_animating || state.collection.is_some() {
        return;
    }
    if !photos.iter().any(|photo| photo.phase.is_arriving()) {
        state.photos_animating = false;
    }
}

/// Yaws every non-collecting photo toward the camera and applies the distance size cue
/// to photos resting on the ring.
pub fn sys_billboard_photos(
    mut profiler: ResMut<SystemProfiler>,
    settings: Res<SceneSettings>,
    view: Res<ViewCamera>,
    mut photos: Query<(&Photo, &mut Transform3D)>,
) {
    let _span = profiler.scope("sys_billboard_photos");
    let eye = view.camera.position;
    for (photo, mut transform) in &mut photos {
        billboard_photo(photo, &mut transform, eye, &settings.0.selection);
    }
}

pub fn billboard_photo(
    photo: &Photo,
    transform: &mut Transform3D,
    eye: Vec3,
    selection: &crate::config::SelectionConfig,
) {
    if photo.phase.is_collecting() {
        return;
    }
    transform.rotation = Quat::from_rotation_y(billboard_yaw(transform.translation, eye));
    if photo.phase == PhotoPhase::Active {
        let scale = distance_scale(transform.translation.distance(eye), selection);
        transform.scale = flat_scale(scale);
    }
}
