//! Time window and status machine shared by behaviors and keyframes.

use crate::interpolator::Interpolator;
use serde::{Deserialize, Serialize};

/// Lifecycle of a time-bounded animation.
///
/// Transitions only move forward (`NotStarted -> Started -> Expired`) until
/// the window is explicitly re-armed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorStatus {
    #[default]
    NotStarted,
    Started,
    Expired,
}

/// Outcome of checking a time value against a [`Timing`] window.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum TimeCheck {
    /// Expired, unset, or before the start time.
    Inactive,
    /// Within the window. `started` is true on the call that left `NotStarted`.
    InTime { started: bool },
    /// Reached the end of a non-cyclic window on this call.
    Expire { started: bool },
}

/// Start time, duration and cycling policy of an animation, in scene milliseconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Timing {
    /// Scene-relative start time. Negative means unset; the animation is inert.
    pub start_time: f64,
    pub duration: f64,
    pub cycle: bool,
    pub interpolator: Interpolator,
    /// Fraction of `duration` added to every incoming time value.
    pub time_offset: f64,
    status: BehaviorStatus,
    /// False while a delayed start still has to be resolved against the first seen time.
    solved: bool,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            start_time: -1.0,
            duration: 0.0,
            cycle: false,
            interpolator: Interpolator::linear(),
            time_offset: 0.0,
            status: BehaviorStatus::NotStarted,
            solved: true,
        }
    }
}

impl Timing {
    pub fn new(start_time: f64, duration: f64) -> Self {
        Self {
            start_time,
            duration,
            ..Self::default()
        }
    }

    pub fn status(&self) -> BehaviorStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: BehaviorStatus) {
        self.status = status;
    }

    /// Sets an absolute window and re-arms the status machine.
    pub fn set_frame_time(&mut self, start_time: f64, duration: f64) {
        self.start_time = start_time;
        self.duration = duration;
        self.status = BehaviorStatus::NotStarted;
        self.solved = true;
    }

    /// Sets a window relative to the first time value seen by `apply`.
    pub fn set_delay_time(&mut self, delay: f64, duration: f64) {
        self.start_time = delay;
        self.duration = duration;
        self.status = BehaviorStatus::NotStarted;
        self.solved = false;
    }

    /// Expires permanently; the window moves to the end of time.
    pub fn set_out_of_frame_time(&mut self) {
        self.status = BehaviorStatus::Expired;
        self.start_time = f64::MAX;
        self.duration = 0.0;
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Resolves a pending delayed start against `time`. One-shot.
    pub(crate) fn solve(&mut self, time: f64) {
        if !self.solved {
            self.start_time += time;
            self.solved = true;
        }
    }

    /// Applies the fractional pre-shift.
    pub(crate) fn offset(&self, time: f64) -> f64 {
        time + self.time_offset * self.duration
    }

    /// End of the window, or `None` for cyclic windows.
    pub fn end_time(&self) -> Option<f64> {
        (!self.cycle).then(|| self.start_time + self.duration)
    }

    pub(crate) fn check(&mut self, time: f64) -> TimeCheck {
        if self.status == BehaviorStatus::Expired || self.start_time < 0.0 {
            return TimeCheck::Inactive;
        }
        let mut t = time;
        if self.cycle {
            if self.duration <= 0.0 {
                return TimeCheck::Inactive;
            }
            if t >= self.start_time {
                t = (t - self.start_time) % self.duration + self.start_time;
            }
        }
        if t < self.start_time {
            return TimeCheck::Inactive;
        }
        let started = self.status == BehaviorStatus::NotStarted;
        if started {
            self.status = BehaviorStatus::Started;
        }
        if !self.cycle && t >= self.start_time + self.duration {
            return TimeCheck::Expire { started };
        }
        TimeCheck::InTime { started }
    }

    /// Maps an in-window time to the interpolator's eased output.
    pub(crate) fn normalize(&self, time: f64) -> f32 {
        let mut t = time - self.start_time;
        if self.cycle {
            t %= self.duration;
        }
        let fraction = if self.duration > 0.0 {
            (t / self.duration) as f32
        } else {
            1.0
        };
        self.interpolator.get_position(fraction).y
    }

    /// Window-local time, wrapped for cyclic windows.
    pub(crate) fn local_time(&self, time: f64) -> f64 {
        let mut t = time - self.start_time;
        if self.cycle && self.duration > 0.0 {
            t %= self.duration;
        }
        t
    }

    /// Eased value at the very end of the window.
    pub(crate) fn final_value(&self) -> f32 {
        self.interpolator.get_position(1.0).y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_start_is_inert() {
        let mut t = Timing::default();
        assert_eq!(t.check(1_000.0), TimeCheck::Inactive);
        assert_eq!(t.status(), BehaviorStatus::NotStarted);
    }

    #[test]
    fn starts_once_then_expires() {
        let mut t = Timing::new(100.0, 50.0);
        assert_eq!(t.check(50.0), TimeCheck::Inactive);
        assert_eq!(t.check(100.0), TimeCheck::InTime { started: true });
        assert_eq!(t.check(120.0), TimeCheck::InTime { started: false });
        assert_eq!(t.check(150.0), TimeCheck::Expire { started: false });
    }

    #[test]
    fn jumping_past_the_end_still_reports_start() {
        let mut t = Timing::new(0.0, 10.0);
        assert_eq!(t.check(99.0), TimeCheck::Expire { started: true });
    }

    #[test]
    fn cyclic_windows_wrap() {
        let mut t = Timing::new(0.0, 100.0);
        t.cycle = true;
        assert_eq!(t.check(1_050.0), TimeCheck::InTime { started: true });
        assert!((t.normalize(1_050.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn delayed_start_resolves_once() {
        let mut t = Timing::default();
        t.set_delay_time(100.0, 10.0);
        t.solve(500.0);
        t.solve(900.0);
        assert_eq!(t.start_time, 600.0);
    }

    #[test]
    fn out_of_frame_never_fires() {
        let mut t = Timing::new(0.0, 10.0);
        t.set_out_of_frame_time();
        assert_eq!(t.check(5.0), TimeCheck::Inactive);
        assert_eq!(t.status(), BehaviorStatus::Expired);
    }
}
