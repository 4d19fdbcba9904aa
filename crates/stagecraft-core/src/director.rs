use crate::actor::Actor;
use crate::config::DirectorConfig;
use crate::errors::{RenderError, SceneError};
use crate::graph::SceneGraph;
use crate::input::{PointerEvent, PointerKind, PointerState};
use crate::keyframes::KeyframesRegistry;
use crate::systems::dirty::DirtyRegions;
use crate::systems::renderer::{paint_root, RenderSurface};
use crate::systems::transitions::SceneTransition;
use crate::types::{ActorId, Point, Rect};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Counters describing the last animated frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FrameStats {
    /// Frames animated so far.
    pub frame: u64,
    /// Director clock in milliseconds.
    pub time: f64,
    /// Nodes in every visible scene.
    pub total_actors: usize,
    /// Nodes that were alive in the last pass.
    pub active_actors: usize,
    /// Dirty rectangles collected for the frame.
    pub dirty_rects: usize,
}

/// The frame driver.
///
/// `Director` owns the actor arena, the scene list, the keyframes registry
/// and the virtual clock. Each frame it advances every visible scene's clock,
/// animates them, settles finished scene transitions and paints the result.
pub struct Director {
    /// Viewport and frame settings.
    pub config: DirectorConfig,
    /// Every actor, container and scene.
    pub graph: SceneGraph,
    /// Named keyframe sets available to `attach_keyframes`.
    pub keyframes: KeyframesRegistry,
    /// Scene roots in creation order.
    scenes: Vec<ActorId>,
    /// Scene indices in paint order; the incoming scene of a transition is last.
    visible: Vec<usize>,
    current: Option<usize>,
    time: f64,
    frame: u64,
    dirty: DirtyRegions,
    pointer: PointerState,
}

impl std::fmt::Debug for Director {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Director")
            .field("config", &self.config)
            .field("scenes", &self.scenes)
            .field("visible", &self.visible)
            .field("current", &self.current)
            .field("time", &self.time)
            .field("frame", &self.frame)
            .finish()
    }
}

impl Default for Director {
    fn default() -> Self {
        Self::new(DirectorConfig::default())
    }
}

impl Director {
    pub fn new(config: DirectorConfig) -> Self {
        let dirty = DirtyRegions::new(config.dirty_rects);
        Self {
            config,
            graph: SceneGraph::new(),
            keyframes: KeyframesRegistry::new(),
            scenes: Vec::new(),
            visible: Vec::new(),
            current: None,
            time: 0.0,
            frame: 0,
            dirty,
            pointer: PointerState::default(),
        }
    }

    /// Global clock in milliseconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Creates a viewport-sized scene. The first scene becomes current.
    pub fn create_scene(&mut self) -> ActorId {
        let actor = Actor::new().with_bounds(
            0.0,
            0.0,
            self.config.width as f32,
            self.config.height as f32,
        );
        self.add_scene(actor)
    }

    /// Registers a scene built from `actor`.
    pub fn add_scene(&mut self, actor: Actor) -> ActorId {
        let id = self.graph.add_scene(actor);
        self.scenes.push(id);
        if self.current.is_none() {
            let index = self.scenes.len() - 1;
            self.current = Some(index);
            self.visible = vec![index];
        }
        debug!(scene = id, index = self.scenes.len() - 1, "scene created");
        id
    }

    pub fn scene(&self, index: usize) -> Option<ActorId> {
        self.scenes.get(index).copied()
    }

    pub fn scene_index(&self, scene: ActorId) -> Option<usize> {
        self.scenes.iter().position(|&s| s == scene)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn current_scene(&self) -> Option<ActorId> {
        self.current.and_then(|i| self.scene(i))
    }

    pub fn current_scene_index(&self) -> Option<usize> {
        self.current
    }

    /// Scenes that will be painted this frame, back to front.
    pub fn visible_scenes(&self) -> Vec<ActorId> {
        self.visible.iter().filter_map(|&i| self.scene(i)).collect()
    }

    /// True while a scene transition is running.
    pub fn is_transitioning(&self) -> bool {
        self.visible.len() > 1
    }

    fn scene_checked(&self, index: usize) -> Result<ActorId, SceneError> {
        self.scene(index).ok_or(SceneError::UnknownScene(index))
    }

    /// Shows scene `index` immediately, cancelling any running transition.
    pub fn set_scene(&mut self, index: usize) -> Result<(), SceneError> {
        let target = self.scene_checked(index)?;
        for &i in &self.visible {
            if let Some(scene) = self.scenes.get(i).copied() {
                self.graph.cancel_ease(scene);
            }
        }
        self.graph.cancel_ease(target);
        if let Some(actor) = self.graph.actor_mut(target) {
            actor.mouse_enabled = true;
        }
        self.visible = vec![index];
        self.current = Some(index);
        self.pointer = PointerState::default();
        let viewport = self.viewport();
        self.dirty.add(viewport);
        debug!(scene = target, index, "scene set");
        Ok(())
    }

    /// Switches to scene `index`, animated by `transition` when given.
    ///
    /// Both scenes ignore input until the switch settles in [`Self::ease_end`].
    #[instrument(level = "debug", skip(self, transition))]
    pub fn switch_to_scene(
        &mut self,
        index: usize,
        transition: Option<SceneTransition>,
    ) -> Result<(), SceneError> {
        let incoming = self.scene_checked(index)?;
        let (Some(transition), Some(out_index)) = (transition, self.current) else {
            return self.set_scene(index);
        };
        if out_index == index {
            return Ok(());
        }
        transition.validate()?;
        let outgoing = self.scene_checked(out_index)?;

        for &i in &self.visible {
            if i != out_index {
                if let Some(scene) = self.scenes.get(i).copied() {
                    self.graph.cancel_ease(scene);
                }
            }
        }
        self.graph.ease_leg(
            outgoing,
            &transition.outgoing,
            transition.duration,
            transition.alpha,
            false,
        )?;
        self.graph.ease_leg(
            incoming,
            &transition.incoming,
            transition.duration,
            transition.alpha,
            true,
        )?;
        for scene in [outgoing, incoming] {
            if let Some(actor) = self.graph.actor_mut(scene) {
                actor.mouse_enabled = false;
            }
        }
        self.visible = vec![out_index, index];
        self.pointer = PointerState::default();
        Ok(())
    }

    /// Settles one side of a finished scene transition.
    ///
    /// The entering scene becomes current; the leaving one stops being painted.
    pub fn ease_end(&mut self, scene: ActorId, entering: bool) {
        let Some(index) = self.scene_index(scene) else {
            warn!(scene, "ease_end for unknown scene");
            return;
        };
        if let Some(actor) = self.graph.actor_mut(scene) {
            actor.empty_behavior_list();
            actor.mouse_enabled = true;
        }
        if entering {
            self.current = Some(index);
        } else {
            self.visible.retain(|&i| i != index);
        }
        let viewport = self.viewport();
        self.dirty.add(viewport);
        debug!(scene, entering, "scene ease finished");
    }

    pub fn pause_scene(&mut self, index: usize) -> Result<(), SceneError> {
        self.scene_state_at(index)?.paused = true;
        Ok(())
    }

    pub fn resume_scene(&mut self, index: usize) -> Result<(), SceneError> {
        self.scene_state_at(index)?.paused = false;
        Ok(())
    }

    pub fn set_time_scale(&mut self, index: usize, scale: f64) -> Result<(), SceneError> {
        self.scene_state_at(index)?.time_scale = scale;
        Ok(())
    }

    pub fn scene_time(&self, index: usize) -> Option<f64> {
        self.graph.scene_state(self.scene(index)?).map(|s| s.time)
    }

    fn scene_state_at(&mut self, index: usize) -> Result<&mut crate::scene::SceneState, SceneError> {
        let scene = self.scene_checked(index)?;
        self.graph
            .scene_state_mut(scene)
            .ok_or(SceneError::NotAScene(scene))
    }

    /// Attaches an independent copy of a registered keyframe set.
    ///
    /// Unknown names are logged and skipped.
    pub fn attach_keyframes(&mut self, actor: ActorId, name: &str) -> bool {
        let Some(keyframes) = self.keyframes.get(name) else {
            return false;
        };
        match self.graph.actor_mut(actor) {
            Some(target) => {
                target.add_keyframes(keyframes);
                true
            }
            None => {
                warn!(actor, keyframes = name, "keyframes target missing");
                false
            }
        }
    }

    fn viewport(&self) -> Rect {
        Rect::from_wh(self.config.width as f32, self.config.height as f32)
    }

    /// Advances the clock by `delta` milliseconds and animates every visible scene.
    #[instrument(level = "debug", skip(self), fields(frame = self.frame))]
    pub fn animate(&mut self, delta: f64) {
        self.time += delta;
        self.frame += 1;
        let visible: Vec<ActorId> = self.visible_scenes();
        let mut finished = Vec::new();
        for scene in visible {
            if let Some(state) = self.graph.scene_state_mut(scene) {
                state.advance(delta);
            }
            self.graph.animate_scene(scene, &mut self.dirty);
            if let Some(entering) = self.graph.take_finished_ease(scene) {
                finished.push((scene, entering));
            }
        }
        for (scene, entering) in finished {
            self.ease_end(scene, entering);
        }
    }

    /// Paints the visible scenes back to front.
    ///
    /// With dirty tracking on, only the pixel-aligned dirty regions are
    /// cleared, drawing is clipped to them and actors outside them are
    /// skipped; the collected regions are consumed.
    #[instrument(level = "debug", skip(self, surface), fields(frame = self.frame))]
    pub fn paint(&mut self, surface: &mut dyn RenderSurface) -> Result<(), RenderError> {
        let dirty = self
            .dirty
            .is_enabled()
            .then(|| self.dirty.take().iter().map(Rect::round_out).collect::<Vec<_>>());
        match &dirty {
            Some(rects) => {
                for rect in rects {
                    surface.clear_rect(*rect, self.config.clear_color);
                }
                surface.clip_rects(rects);
            }
            None => surface.clear(self.config.clear_color),
        }

        let mut result = Ok(());
        for scene in self.visible_scenes() {
            let time = self.graph.scene_state(scene).map_or(self.time, |s| s.time);
            if let Err(e) = paint_root(&self.graph, scene, surface, time, dirty.as_deref()) {
                warn!(scene, error = %e, "scene paint failed");
                result = Err(e);
            }
        }
        if dirty.is_some() {
            surface.reset_clip();
        }
        result
    }

    /// Animates by `delta`, paints, and reports the frame's counters.
    pub fn render(
        &mut self,
        delta: f64,
        surface: &mut dyn RenderSurface,
    ) -> Result<FrameStats, RenderError> {
        self.animate(delta);
        let stats = self.frame_stats();
        self.paint(surface)?;
        Ok(stats)
    }

    pub fn frame_stats(&self) -> FrameStats {
        let (total_actors, active_actors) = self
            .visible_scenes()
            .into_iter()
            .map(|s| self.graph.sizes(s))
            .fold((0, 0), |(t, a), (st, sa)| (t + st, a + sa));
        FrameStats {
            frame: self.frame,
            time: self.time,
            total_actors,
            active_actors,
            dirty_rects: self.dirty.rects().len(),
        }
    }

    /// Routes a pointer event at a screen point to the topmost actor of the
    /// current scene.
    ///
    /// Move events synthesize `Exit`/`Enter` when the hovered actor changes;
    /// a release on the actor that received the press also yields `Click`.
    /// Returns the actor under the pointer. Input is ignored mid-transition.
    pub fn dispatch_pointer(&mut self, kind: PointerKind, x: f32, y: f32) -> Option<ActorId> {
        if self.is_transitioning() {
            return None;
        }
        let scene = self.current_scene()?;
        let screen = Point::new(x, y);
        let hit = self.graph.find_actor_at_position(scene, screen);

        match kind {
            PointerKind::Move | PointerKind::TouchMove => {
                if hit != self.pointer.hover {
                    if let Some(old) = self.pointer.hover {
                        self.fire(old, PointerKind::Exit, screen);
                    }
                    if let Some(new) = hit {
                        self.fire(new, PointerKind::Enter, screen);
                    }
                    self.pointer.hover = hit;
                }
            }
            PointerKind::Down | PointerKind::TouchStart => self.pointer.pressed = hit,
            _ => {}
        }

        if let Some(target) = hit {
            self.fire(target, kind, screen);
            if kind.is_release() && self.pointer.pressed == Some(target) {
                self.fire(target, PointerKind::Click, screen);
            }
        }
        if kind.is_release() {
            self.pointer.pressed = None;
        }
        hit
    }

    fn fire(&mut self, actor: ActorId, kind: PointerKind, screen: Point) {
        let time = self.time;
        let Some(target) = self.graph.actor_mut(actor) else {
            return;
        };
        let local = target.screen_to_local(screen).unwrap_or(screen);
        let event = PointerEvent {
            kind,
            screen,
            local,
            actor,
            time,
        };
        target.fire_pointer(&event);
    }
}
