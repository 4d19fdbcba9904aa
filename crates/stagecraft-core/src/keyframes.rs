//! # Keyframes
//!
//! Cloneable, registry-friendly animations driven by `keyframe::AnimationSequence`.
//!
//! ## Responsibilities
//! - **Tracks**: one [`KeyframeTrack`] per actor property, with stops placed
//!   at normalized positions in `[0, 1]` of the owning window.
//! - **Timing**: [`Keyframes`] and [`KeyframesContainer`] share the behavior
//!   status machine (see [`Timing`]), including cycling and container-local time.
//! - **Callbacks**: `on_start` / `on_apply` / `on_expire` lists of shared
//!   closures, carried along when a set is cloned out of the registry.
//! - **Registry**: [`KeyframesRegistry`] maps names to reusable containers.
//!   It is an explicit object owned by the `Director`, never global state.

use crate::actor::Actor;
use crate::behavior::{BehaviorStatus, TimeCheck, Timing};
use crate::interpolator::Interpolator;
use crate::types::Property;
use keyframe::{AnimationSequence, Keyframe};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq)]
pub enum KeyframesEvent {
    Started { time: f64 },
    Applied { time: f64, normalized: f32 },
    Expired { time: f64 },
}

/// Receives the animation's name and the event.
pub type KeyframesCallback = Rc<dyn Fn(&str, &KeyframesEvent)>;

#[derive(Clone, Default)]
pub struct KeyframesCallbacks {
    pub on_start: Vec<KeyframesCallback>,
    pub on_apply: Vec<KeyframesCallback>,
    pub on_expire: Vec<KeyframesCallback>,
}

impl fmt::Debug for KeyframesCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyframesCallbacks")
            .field("on_start", &self.on_start.len())
            .field("on_apply", &self.on_apply.len())
            .field("on_expire", &self.on_expire.len())
            .finish()
    }
}

impl KeyframesCallbacks {
    fn fire(&self, name: &str, event: &KeyframesEvent) {
        let list = match event {
            KeyframesEvent::Started { .. } => &self.on_start,
            KeyframesEvent::Applied { .. } => &self.on_apply,
            KeyframesEvent::Expired { .. } => &self.on_expire,
        };
        for cb in list {
            cb(name, event);
        }
    }
}

/// A single stop on a track.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyframeStop {
    /// Normalized position in the owning window.
    pub at: f64,
    pub value: f32,
    /// Easing used from this stop to the next one.
    pub easing: Interpolator,
}

/// Animated values for one actor property.
#[derive(Clone)]
pub struct KeyframeTrack {
    pub property: Property,
    stops: Vec<KeyframeStop>,
    sequence: AnimationSequence<f32>,
}

impl fmt::Debug for KeyframeTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyframeTrack")
            .field("property", &self.property)
            .field("stops", &self.stops)
            .finish()
    }
}

impl KeyframeTrack {
    pub fn new(property: Property) -> Self {
        Self {
            property,
            stops: Vec::new(),
            sequence: AnimationSequence::from(Vec::new()),
        }
    }

    pub fn with_stop(mut self, at: f64, value: f32, easing: Interpolator) -> Self {
        self.add_stop(at, value, easing);
        self
    }

    /// Inserts a stop, keeping stops ordered by position, and rebuilds the sequence.
    pub fn add_stop(&mut self, at: f64, value: f32, easing: Interpolator) {
        let at = at.clamp(0.0, 1.0);
        let index = self.stops.partition_point(|s| s.at <= at);
        self.stops.insert(index, KeyframeStop { at, value, easing });

        let frames: Vec<Keyframe<f32>> = self
            .stops
            .iter()
            .map(|s| Keyframe::new(s.value, s.at, s.easing))
            .collect();
        self.sequence = AnimationSequence::from(frames);
    }

    pub fn stops(&self) -> &[KeyframeStop] {
        &self.stops
    }

    /// Value at normalized time `t`, or `None` for an empty track.
    pub fn sample(&mut self, t: f32) -> Option<f32> {
        let first = self.stops.first()?;
        let t = t as f64;
        if t <= first.at {
            return Some(first.value);
        }
        let end = self.sequence.duration();
        self.sequence.advance_to(t.min(end));
        Some(self.sequence.now())
    }
}

/// A named set of property tracks over one time window.
#[derive(Clone, Debug)]
pub struct Keyframes {
    pub name: String,
    pub timing: Timing,
    pub discardable: bool,
    pub do_value_application: bool,
    tracks: Vec<KeyframeTrack>,
    pub callbacks: KeyframesCallbacks,
}

impl Keyframes {
    pub fn new(name: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            name: name.into(),
            timing: Timing::new(start_time, duration),
            discardable: false,
            do_value_application: true,
            tracks: Vec::new(),
            callbacks: KeyframesCallbacks::default(),
        }
    }

    pub fn with_track(mut self, track: KeyframeTrack) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn with_cycle(mut self, cycle: bool) -> Self {
        self.timing.cycle = cycle;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.timing.interpolator = interpolator;
        self
    }

    pub fn on_start(mut self, cb: impl Fn(&str, &KeyframesEvent) + 'static) -> Self {
        self.callbacks.on_start.push(Rc::new(cb));
        self
    }

    pub fn on_apply(mut self, cb: impl Fn(&str, &KeyframesEvent) + 'static) -> Self {
        self.callbacks.on_apply.push(Rc::new(cb));
        self
    }

    pub fn on_expire(mut self, cb: impl Fn(&str, &KeyframesEvent) + 'static) -> Self {
        self.callbacks.on_expire.push(Rc::new(cb));
        self
    }

    pub fn tracks(&self) -> &[KeyframeTrack] {
        &self.tracks
    }

    pub fn add_track(&mut self, track: KeyframeTrack) {
        self.tracks.push(track);
    }

    pub fn status(&self) -> BehaviorStatus {
        self.timing.status()
    }

    pub fn is_expired(&self) -> bool {
        self.status() == BehaviorStatus::Expired
    }

    pub fn set_frame_time(&mut self, start_time: f64, duration: f64) -> &mut Self {
        self.timing.set_frame_time(start_time, duration);
        self
    }

    pub fn set_delay_time(&mut self, delay: f64, duration: f64) -> &mut Self {
        self.timing.set_delay_time(delay, duration);
        self
    }

    /// Returns true when the tracks were evaluated on this call.
    pub fn apply(&mut self, time: f64, target: &mut Actor) -> bool {
        self.timing.solve(time);
        let time = self.timing.offset(time);
        match self.timing.check(time) {
            TimeCheck::Inactive => false,
            TimeCheck::Expire { started } => {
                if started {
                    self.callbacks.fire(&self.name, &KeyframesEvent::Started { time });
                }
                self.set_expired(target, time);
                true
            }
            TimeCheck::InTime { started } => {
                if started {
                    self.callbacks.fire(&self.name, &KeyframesEvent::Started { time });
                }
                let normalized = self.timing.normalize(time);
                self.set_for_time(normalized, target);
                self.callbacks
                    .fire(&self.name, &KeyframesEvent::Applied { time, normalized });
                true
            }
        }
    }

    pub fn set_for_time(&mut self, t: f32, target: &mut Actor) {
        for track in self.tracks.iter_mut() {
            if let Some(value) = track.sample(t) {
                if self.do_value_application {
                    target.set_property(track.property, value);
                }
            }
        }
    }

    pub fn set_expired(&mut self, target: &mut Actor, time: f64) {
        self.timing.set_status(BehaviorStatus::Expired);
        self.set_for_time(self.timing.final_value(), target);
        debug!(keyframes = %self.name, time, "keyframes expired");
        self.callbacks.fire(&self.name, &KeyframesEvent::Expired { time });
    }
}

/// Groups [`Keyframes`] on a container-local timeline.
#[derive(Clone, Debug)]
pub struct KeyframesContainer {
    pub name: String,
    pub timing: Timing,
    pub discardable: bool,
    children: Vec<Keyframes>,
    pub callbacks: KeyframesCallbacks,
}

impl KeyframesContainer {
    pub fn new(name: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            name: name.into(),
            timing: Timing::new(start_time, duration),
            discardable: false,
            children: Vec::new(),
            callbacks: KeyframesCallbacks::default(),
        }
    }

    pub fn with_keyframes(mut self, keyframes: Keyframes) -> Self {
        self.children.push(keyframes);
        self
    }

    pub fn with_cycle(mut self, cycle: bool) -> Self {
        self.timing.cycle = cycle;
        self
    }

    pub fn add_keyframes(&mut self, keyframes: Keyframes) {
        self.children.push(keyframes);
    }

    pub fn children(&self) -> &[Keyframes] {
        &self.children
    }

    pub fn status(&self) -> BehaviorStatus {
        self.timing.status()
    }

    pub fn is_expired(&self) -> bool {
        self.status() == BehaviorStatus::Expired
    }

    /// Re-arms the container and every child.
    pub fn set_frame_time(&mut self, start_time: f64, duration: f64) -> &mut Self {
        self.timing.set_frame_time(start_time, duration);
        for child in self.children.iter_mut() {
            let (start, duration) = (child.timing.start_time, child.timing.duration);
            child.set_frame_time(start, duration);
        }
        self
    }

    pub fn apply(&mut self, time: f64, target: &mut Actor) -> bool {
        self.timing.solve(time);
        let time = self.timing.offset(time);
        match self.timing.check(time) {
            TimeCheck::Inactive => false,
            TimeCheck::Expire { started } => {
                if started {
                    self.callbacks.fire(&self.name, &KeyframesEvent::Started { time });
                }
                self.set_expired(target, time);
                true
            }
            TimeCheck::InTime { started } => {
                if started {
                    self.callbacks.fire(&self.name, &KeyframesEvent::Started { time });
                }
                let local = self.timing.local_time(time);
                let cycle = self.timing.cycle;
                let mut applied = false;
                for child in self.children.iter_mut() {
                    let was_expired = child.is_expired();
                    applied |= child.apply(local, target);
                    if cycle && !was_expired && child.is_expired() {
                        child.timing.set_status(BehaviorStatus::Started);
                    }
                }
                applied
            }
        }
    }

    pub fn set_expired(&mut self, target: &mut Actor, time: f64) {
        self.timing.set_status(BehaviorStatus::Expired);
        let local = time - self.timing.start_time;
        for child in self.children.iter_mut().filter(|c| !c.is_expired()) {
            child.set_expired(target, local);
        }
        debug!(keyframes = %self.name, time, "keyframes container expired");
        self.callbacks.fire(&self.name, &KeyframesEvent::Expired { time });
    }
}

/// Named, reusable keyframe animations.
#[derive(Debug, Default)]
pub struct KeyframesRegistry {
    entries: HashMap<String, KeyframesContainer>,
}

impl KeyframesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under `name`, returning any entry it replaced.
    pub fn register(&mut self, name: impl Into<String>, keyframes: KeyframesContainer) -> Option<KeyframesContainer> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), keyframes);
        if previous.is_some() {
            debug!(name = %name, "keyframes entry replaced");
        }
        previous
    }

    /// Returns an independent clone, so each actor gets its own status and sequence state.
    pub fn get(&self, name: &str) -> Option<KeyframesContainer> {
        let entry = self.entries.get(name).cloned();
        if entry.is_none() {
            warn!(name, "keyframes entry not found");
        }
        entry
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<KeyframesContainer> {
        self.entries.remove(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
