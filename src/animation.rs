use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    CubicIn,
    CubicOut,
    CubicInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` onto the curve. Input outside the range is clamped.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::CubicIn => "cubic_in",
            Easing::CubicOut => "cubic_out",
            Easing::CubicInOut => "cubic_in_out",
        }
    }
}

/// Visual state a transition interpolates: translation, scale and opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub scale: Vec3,
    pub opacity: f32,
}

impl Pose {
    pub fn new(translation: Vec3, scale: Vec3, opacity: f32) -> Self {
        Self { translation, scale, opacity: opacity.clamp(0.0, 1.0) }
    }

    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            translation: self.translation.lerp(other.translation, t),
            scale: self.scale.lerp(other.scale, t),
            opacity: (self.opacity + (other.opacity - self.opacity) * t).clamp(0.0, 1.0),
        }
    }
}

/// Time-bounded interpolation between two poses, sampled against the scene clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: Pose,
    pub to: Pose,
    pub started_at: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl Transition {
    pub fn new(from: Pose, to: Pose, started_at: f32, duration: f32, easing: Easing) -> Self {
        Self { from, to, started_at, duration: duration.max(0.0), easing }
    }

    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= f32::EPSILON {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }

    pub fn ends_at(&self) -> f32 {
        self.started_at + self.duration
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.duration <= f32::EPSILON || now >= self.ends_at()
    }

    pub fn sample(&self, now: f32) -> Pose {
        if self.is_finished(now) {
            return self.to;
        }
        let eased = self.easing.apply(self.progress(now));
        self.from.lerp(&self.to, eased)
    }
}
