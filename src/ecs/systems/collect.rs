use crate::animation::{Easing, Pose, Transition};
use crate::ecs::types::CollectPlan;

/// Outcome of advancing one entity's collection for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollectStep {
    Waiting,
    Moving(Pose),
    Finished(Pose),
}

/// Advances `plan`, capturing `current` as the start pose the first time its stagger slot opens.
pub fn step_collect(plan: &mut CollectPlan, now: f32, duration: f32, current: Pose) -> CollectStep {
    if now < plan.starts_at {
        return CollectStep::Waiting;
    }
    let (target, end_scale, starts_at) = (plan.target, plan.end_scale, plan.starts_at);
    let transition = *plan.transition.get_or_insert_with(|| {
        let to = Pose::new(target, end_scale, 0.0);
        Transition::new(current, to, starts_at, duration, Easing::CubicIn)
    });
    let pose = transition.sample(now);
    if transition.is_finished(now) {
        CollectStep::Finished(pose)
    } else {
        CollectStep::Moving(pose)
    }
}
