//! Scene-level timers checked against the scene's virtual clock.

use std::fmt;
use tracing::debug;

pub type TimerId = u64;

/// Receives the check time and the task state, so a timeout can re-arm itself with [`TimerState::reset`].
pub type TimerCallback = Box<dyn FnMut(f64, &mut TimerState)>;

#[derive(Clone, Debug, PartialEq)]
pub struct TimerState {
    pub id: TimerId,
    pub start_time: f64,
    pub duration: f64,
    /// Marked for removal at the end of the next check.
    pub remove: bool,
}

impl TimerState {
    /// Restarts the countdown at `time`.
    pub fn reset(&mut self, time: f64) {
        self.start_time = time;
        self.remove = false;
    }

    pub fn add_time(&mut self, time: f64) {
        self.duration += time;
    }

    pub fn remaining(&self, time: f64) -> f64 {
        (self.start_time + self.duration - time).max(0.0)
    }
}

pub struct TimerTask {
    pub state: TimerState,
    on_timeout: Option<TimerCallback>,
    on_tick: Option<TimerCallback>,
    on_cancel: Option<TimerCallback>,
}

impl fmt::Debug for TimerTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerTask").field("state", &self.state).finish()
    }
}

impl TimerTask {
    pub fn new(start_time: f64, duration: f64) -> Self {
        Self {
            state: TimerState {
                id: 0,
                start_time,
                duration,
                remove: false,
            },
            on_timeout: None,
            on_tick: None,
            on_cancel: None,
        }
    }

    pub fn on_timeout(mut self, f: impl FnMut(f64, &mut TimerState) + 'static) -> Self {
        self.on_timeout = Some(Box::new(f));
        self
    }

    pub fn on_tick(mut self, f: impl FnMut(f64, &mut TimerState) + 'static) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }

    pub fn on_cancel(mut self, f: impl FnMut(f64, &mut TimerState) + 'static) -> Self {
        self.on_cancel = Some(Box::new(f));
        self
    }

    fn check(&mut self, time: f64) {
        if self.state.remove {
            return;
        }
        if time - self.state.start_time >= self.state.duration {
            self.state.remove = true;
            if let Some(cb) = self.on_timeout.as_mut() {
                cb(time, &mut self.state);
            }
        } else if let Some(cb) = self.on_tick.as_mut() {
            cb(time, &mut self.state);
        }
    }

    fn cancel(&mut self, time: f64) {
        if self.state.remove {
            return;
        }
        self.state.remove = true;
        if let Some(cb) = self.on_cancel.as_mut() {
            cb(time, &mut self.state);
        }
    }
}

#[derive(Debug, Default)]
pub struct TimerManager {
    tasks: Vec<TimerTask>,
    next_id: TimerId,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mut task: TimerTask) -> TimerId {
        self.next_id += 1;
        task.state.id = self.next_id;
        self.tasks.push(task);
        self.next_id
    }

    /// Shorthand for a one-shot timer with only a timeout callback.
    pub fn create(
        &mut self,
        start_time: f64,
        duration: f64,
        on_timeout: impl FnMut(f64, &mut TimerState) + 'static,
    ) -> TimerId {
        self.add(TimerTask::new(start_time, duration).on_timeout(on_timeout))
    }

    /// Runs tick or timeout callbacks for every live task, then drops finished ones.
    pub fn check_timers(&mut self, time: f64) {
        for task in self.tasks.iter_mut() {
            task.check(time);
        }
        self.remove_expired();
    }

    pub fn remove_expired(&mut self) {
        self.tasks.retain(|t| {
            if t.state.remove {
                debug!(timer = t.state.id, "timer removed");
            }
            !t.state.remove
        });
    }

    /// Cancels a task, firing its cancel callback. Returns false for unknown ids.
    pub fn cancel(&mut self, id: TimerId, time: f64) -> bool {
        match self.tasks.iter_mut().find(|t| t.state.id == id) {
            Some(task) => {
                task.cancel(time);
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self, id: TimerId, time: f64) -> bool {
        self.state_mut(id).map(|s| s.reset(time)).is_some()
    }

    pub fn add_time(&mut self, id: TimerId, time: f64) -> bool {
        self.state_mut(id).map(|s| s.add_time(time)).is_some()
    }

    pub fn has_timer(&self, id: TimerId) -> bool {
        self.tasks.iter().any(|t| t.state.id == id && !t.state.remove)
    }

    pub fn get(&self, id: TimerId) -> Option<&TimerState> {
        self.tasks.iter().find(|t| t.state.id == id).map(|t| &t.state)
    }

    fn state_mut(&mut self, id: TimerId) -> Option<&mut TimerState> {
        self.tasks
            .iter_mut()
            .find(|t| t.state.id == id)
            .map(|t| &mut t.state)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
