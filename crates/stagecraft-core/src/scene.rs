//! Scenes: root containers with their own clock, timers and ease transitions.
//!
//! A scene is a container node carrying a [`SceneState`]. User code cannot
//! attach behaviors to it; it moves only through the `ease_*` builders, which
//! install exactly one [`ContainerBehavior`] holding a translate, scale or
//! rotate behavior plus an optional fade.

use crate::actor::Actor;
use crate::behavior::{
    AlphaBehavior, Axis, Behavior, BehaviorId, ContainerBehavior, PathBehavior, RotateBehavior,
    Scale1Behavior, ScaleBehavior,
};
use crate::errors::{ConfigError, SceneError};
use crate::graph::{SceneGraph, SceneNode};
use crate::interpolator::Interpolator;
use crate::path::MotionPath;
use crate::systems::dirty::DirtyRegions;
use crate::systems::transitions::{Anchor, TransitionKind, TransitionLeg};
use crate::timer::TimerManager;
use crate::types::ActorId;
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use tracing::{debug, instrument};

/// An ease transition in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SceneEase {
    pub behavior: BehaviorId,
    pub entering: bool,
}

#[derive(Debug)]
pub struct SceneState {
    /// Scene-local virtual clock in milliseconds.
    pub time: f64,
    pub paused: bool,
    /// Multiplier applied to every delta fed to this scene.
    pub time_scale: f64,
    pub timers: TimerManager,
    pub(crate) ease: Option<SceneEase>,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            time: 0.0,
            paused: false,
            time_scale: 1.0,
            timers: TimerManager::new(),
            ease: None,
        }
    }
}

impl SceneState {
    /// Advances the clock unless paused.
    pub fn advance(&mut self, delta: f64) {
        if !self.paused {
            self.time += delta * self.time_scale;
        }
    }

    pub fn is_easing(&self) -> bool {
        self.ease.is_some()
    }
}

fn fade(duration: f64, entering: bool) -> Behavior {
    let (start, end) = if entering { (0.0, 1.0) } else { (1.0, 0.0) };
    Behavior::new(AlphaBehavior::new(start, end)).with_frame_time(0.0, duration)
}

fn check_duration(duration: f64) -> Result<(), ConfigError> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration(duration))
    }
}

impl SceneGraph {
    /// Creates a scene node from `actor`.
    pub fn add_scene(&mut self, actor: Actor) -> ActorId {
        let mut node = SceneNode::container(actor);
        node.scene = Some(SceneState::default());
        self.add_node(node)
    }

    pub fn scene_state(&self, scene: ActorId) -> Option<&SceneState> {
        self.get_node(scene)?.scene.as_ref()
    }

    pub fn scene_state_mut(&mut self, scene: ActorId) -> Option<&mut SceneState> {
        self.get_node_mut(scene)?.scene.as_mut()
    }

    fn scene_state_checked(&mut self, scene: ActorId) -> Result<&mut SceneState, SceneError> {
        self.node_mut(scene)?
            .scene
            .as_mut()
            .ok_or(SceneError::NotAScene(scene))
    }

    /// Slides the scene in from, or out towards, an edge.
    ///
    /// Only `Top`, `Bottom`, `Left` and `Right` are accepted.
    pub fn ease_translation(
        &mut self,
        scene: ActorId,
        duration: f64,
        alpha: bool,
        anchor: Anchor,
        entering: bool,
        interpolator: Interpolator,
    ) -> Result<BehaviorId, SceneError> {
        check_duration(duration)?;
        if !anchor.is_edge() {
            return Err(ConfigError::UnsupportedAnchor {
                anchor: anchor.name().to_string(),
                operation: "ease_translation",
            }
            .into());
        }
        let (w, h) = self
            .actor(scene)
            .map(|a| (a.width, a.height))
            .ok_or(SceneError::UnknownActor(scene))?;
        let (ox, oy) = match anchor {
            Anchor::Top => (0.0, -h),
            Anchor::Bottom => (0.0, h),
            Anchor::Left => (-w, 0.0),
            _ => (w, 0.0),
        };
        let path = if entering {
            MotionPath::linear(ox, oy, 0.0, 0.0)
        } else {
            MotionPath::linear(0.0, 0.0, ox, oy)
        };
        let slide = Behavior::new(PathBehavior::new(path))
            .with_frame_time(0.0, duration)
            .with_interpolator(interpolator);
        self.install_ease(scene, slide, duration, alpha, entering)
    }

    /// Grows the scene from, or shrinks it into, an anchor.
    ///
    /// Edge anchors scale a single axis; corners and center scale both.
    /// `start_time` is relative to the transition start.
    #[allow(clippy::too_many_arguments)]
    pub fn ease_scale(
        &mut self,
        scene: ActorId,
        start_time: f64,
        duration: f64,
        alpha: bool,
        anchor: Anchor,
        entering: bool,
        interpolator: Interpolator,
    ) -> Result<BehaviorId, SceneError> {
        check_duration(duration)?;
        let (from, to) = if entering { (0.0, 1.0) } else { (1.0, 0.0) };
        let (ax, ay) = anchor.fraction();
        let behavior = match anchor {
            Anchor::Top | Anchor::Bottom => {
                Behavior::new(Scale1Behavior::new(from, to, Axis::Y).with_anchor(ax, ay))
            }
            Anchor::Left | Anchor::Right => {
                Behavior::new(Scale1Behavior::new(from, to, Axis::X).with_anchor(ax, ay))
            }
            _ => Behavior::new(ScaleBehavior::new(from, to, from, to).with_anchor(ax, ay)),
        };
        let behavior = behavior
            .with_frame_time(start_time, (duration - start_time).max(0.0))
            .with_interpolator(interpolator);
        self.install_ease(scene, behavior, duration, alpha, entering)
    }

    /// Spins the scene in or out around an anchor.
    ///
    /// Corners turn a quarter, edges half and the center a full turn.
    pub fn ease_rotation(
        &mut self,
        scene: ActorId,
        duration: f64,
        alpha: bool,
        anchor: Anchor,
        entering: bool,
        interpolator: Interpolator,
    ) -> Result<BehaviorId, SceneError> {
        check_duration(duration)?;
        let turn = if anchor.is_corner() {
            FRAC_PI_2
        } else if anchor.is_edge() {
            PI
        } else {
            TAU
        };
        let (start, end) = if entering { (turn, 0.0) } else { (0.0, turn) };
        let (ax, ay) = anchor.fraction();
        let spin = Behavior::new(RotateBehavior::new(start, end).with_anchor(ax, ay))
            .with_frame_time(0.0, duration)
            .with_interpolator(interpolator);
        self.install_ease(scene, spin, duration, alpha, entering)
    }

    pub fn ease_translation_in(
        &mut self,
        scene: ActorId,
        duration: f64,
        alpha: bool,
        anchor: Anchor,
        interpolator: Interpolator,
    ) -> Result<BehaviorId, SceneError> {
        self.ease_translation(scene, duration, alpha, anchor, true, interpolator)
    }

    pub fn ease_translation_out(
        &mut self,
        scene: ActorId,
        duration: f64,
        alpha: bool,
        anchor: Anchor,
        interpolator: Interpolator,
    ) -> Result<BehaviorId, SceneError> {
        self.ease_translation(scene, duration, alpha, anchor, false, interpolator)
    }

    pub fn ease_scale_in(
        &mut self,
        scene: ActorId,
        duration: f64,
        alpha: bool,
        anchor: Anchor,
        interpolator: Interpolator,
    ) -> Result<BehaviorId, SceneError> {
        self.ease_scale(scene, 0.0, duration, alpha, anchor, true, interpolator)
    }

    pub fn ease_scale_out(
        &mut self,
        scene: ActorId,
        duration: f64,
        alpha: bool,
        anchor: Anchor,
        interpolator: Interpolator,
    ) -> Result<BehaviorId, SceneError> {
        self.ease_scale(scene, 0.0, duration, alpha, anchor, false, interpolator)
    }

    pub fn ease_rotation_in(
        &mut self,
        scene: ActorId,
        duration: f64,
        alpha: bool,
        anchor: Anchor,
        interpolator: Interpolator,
    ) -> Result<BehaviorId, SceneError> {
        self.ease_rotation(scene, duration, alpha, anchor, true, interpolator)
    }

    pub fn ease_rotation_out(
        &mut self,
        scene: ActorId,
        duration: f64,
        alpha: bool,
        anchor: Anchor,
        interpolator: Interpolator,
    ) -> Result<BehaviorId, SceneError> {
        self.ease_rotation(scene, duration, alpha, anchor, false, interpolator)
    }

    /// Runs one side of a scene transition.
    pub fn ease_leg(
        &mut self,
        scene: ActorId,
        leg: &TransitionLeg,
        duration: f64,
        alpha: bool,
        entering: bool,
    ) -> Result<BehaviorId, SceneError> {
        match leg.kind {
            TransitionKind::Translate => {
                self.ease_translation(scene, duration, alpha, leg.anchor, entering, leg.interpolator)
            }
            TransitionKind::Scale => {
                self.ease_scale(scene, 0.0, duration, alpha, leg.anchor, entering, leg.interpolator)
            }
            TransitionKind::Rotate => {
                self.ease_rotation(scene, duration, alpha, leg.anchor, entering, leg.interpolator)
            }
        }
    }

    /// Replaces the scene's behaviors with a single transition container.
    fn install_ease(
        &mut self,
        scene: ActorId,
        behavior: Behavior,
        duration: f64,
        alpha: bool,
        entering: bool,
    ) -> Result<BehaviorId, SceneError> {
        let state = self.scene_state_checked(scene)?;
        let now = state.time;

        let mut ease = ContainerBehavior::new().with_behavior(behavior);
        if alpha {
            ease.add_behavior(fade(duration, entering));
        }
        let ease = Behavior::new(ease).with_frame_time(now, duration);
        let id = ease.id();

        let actor = &mut self.node_mut(scene)?.actor;
        if entering {
            actor.set_location(0.0, 0.0);
            actor.set_scale(1.0, 1.0);
            actor.set_rotation(0.0);
            actor.set_alpha(1.0);
        }
        actor.set_frame_time(0.0, f64::MAX);
        actor.empty_behavior_list();
        actor.add_behavior(ease);

        self.scene_state_checked(scene)?.ease = Some(SceneEase {
            behavior: id,
            entering,
        });
        debug!(scene, entering, duration, "scene ease installed");
        Ok(id)
    }

    /// Drops any ease in progress and resets the scene's transform.
    pub fn cancel_ease(&mut self, scene: ActorId) {
        let Some(node) = self.get_node_mut(scene) else {
            return;
        };
        if let Some(state) = node.scene.as_mut() {
            state.ease = None;
        }
        let actor = &mut node.actor;
        actor.empty_behavior_list();
        actor.set_location(0.0, 0.0);
        actor.set_scale(1.0, 1.0);
        actor.set_rotation(0.0);
        actor.set_alpha(1.0);
    }

    /// Checks timers, then animates the scene subtree at the scene clock.
    #[instrument(level = "trace", skip(self, dirty))]
    pub fn animate_scene(&mut self, scene: ActorId, dirty: &mut DirtyRegions) -> bool {
        let Some(state) = self.scene_state_mut(scene) else {
            return false;
        };
        let time = state.time;
        state.timers.check_timers(time);
        self.animate(scene, time, dirty)
    }

    /// Returns the direction of an ease whose container behavior has expired,
    /// clearing it. The caller owns the follow-up (`Director::ease_end`).
    pub(crate) fn take_finished_ease(&mut self, scene: ActorId) -> Option<bool> {
        let node = self.get_node_mut(scene)?;
        let ease = node.scene.as_ref()?.ease?;
        let done = node
            .actor
            .behavior(ease.behavior)
            .map_or(true, Behavior::is_expired);
        if !done {
            return None;
        }
        if let Some(state) = node.scene.as_mut() {
            state.ease = None;
        }
        Some(ease.entering)
    }
}
