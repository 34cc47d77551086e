//! Hook motion
//!
//! The hook moves either along an eased tween (cast and reel) or under
//! manual crown control with decaying momentum.

use serde::{Deserialize, Serialize};

use crate::config::CrownTuning;

/// Quadratic ease-out: fast start, gentle arrival
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Eased depth change over a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HookTween {
    pub from: f32,
    pub to: f32,
    /// Absolute start time (seconds)
    pub start: f64,
    /// Duration (seconds)
    pub duration: f64,
}

impl HookTween {
    pub fn new(from: f32, to: f32, start: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(0.0),
        }
    }

    /// Normalized progress in [0, 1]
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn depth_at(&self, now: f64) -> f32 {
        self.from + (self.to - self.from) * ease_out(self.progress(now))
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Result of one crown reel step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrownStep {
    /// Still coasting
    Moving,
    /// Hook reached the surface (reel target depth)
    Surfaced,
    /// Momentum ran out; the hook rests where it is
    Settled,
}

/// Manual reel driven by a rotating input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrownReel {
    /// Signed depth change per frame at full momentum (positive reels in)
    pub delta_per_frame: f32,
    /// Momentum in [0, 1]
    pub momentum: f32,
}

impl CrownReel {
    pub fn from_rotation(rotation_speed: f32, tuning: &CrownTuning) -> Self {
        let magnitude = (rotation_speed.abs() * tuning.gain).min(tuning.max_delta);
        Self {
            delta_per_frame: magnitude * rotation_speed.signum(),
            momentum: 1.0,
        }
    }

    /// Advance one frame, moving `depth` within [min_depth, max_depth]
    pub fn step(
        &mut self,
        depth: &mut f32,
        min_depth: f32,
        max_depth: f32,
        tuning: &CrownTuning,
    ) -> CrownStep {
        *depth -= self.delta_per_frame * self.momentum;

        if *depth <= min_depth {
            *depth = min_depth;
            self.momentum = 0.0;
            return CrownStep::Surfaced;
        }

        if *depth >= max_depth {
            *depth = max_depth;
            self.momentum = 0.0;
        }

        self.momentum *= tuning.decay;
        if self.momentum < tuning.stop_threshold {
            self.momentum = 0.0;
            return CrownStep::Settled;
        }
        CrownStep::Moving
    }
}

/// What is currently moving the hook
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HookMotion {
    Idle,
    Tween(HookTween),
    Crown(CrownReel),
}

/// The hook at the end of the line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    /// Distance below the boat
    pub depth: f32,
    pub motion: HookMotion,
}

impl Hook {
    pub fn new(depth: f32) -> Self {
        Self {
            depth,
            motion: HookMotion::Idle,
        }
    }

    pub fn is_moving(&self) -> bool {
        !matches!(self.motion, HookMotion::Idle)
    }

    pub fn is_tweening(&self) -> bool {
        matches!(self.motion, HookMotion::Tween(_))
    }

    /// Stop any motion, leaving the hook at its current depth
    pub fn stop(&mut self) {
        self.motion = HookMotion::Idle;
    }

    /// Start an eased move to `target` lasting `duration`
    pub fn tween_to(&mut self, target: f32, now: f64, duration: f64) {
        self.motion = HookMotion::Tween(HookTween::new(self.depth, target, now, duration));
    }
}
