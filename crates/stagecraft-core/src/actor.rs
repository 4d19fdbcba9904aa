//! # Actor
//!
//! The leaf drawable of the scene graph.
//!
//! ## Responsibilities
//! - **Geometry**: position, size, rotation and scale (each with a fractional
//!   anchor), composed into a local model-view matrix every frame.
//! - **Lifetime window**: `start_time` / `duration` decide whether the actor
//!   takes part in a frame; past its window it becomes expired.
//! - **Animation**: applies its behaviors and keyframes, then sweeps out
//!   discardable entries that expired during the pass.
//! - **Leaf paint**: fill color and image region, or a user paint hook.
//!
//! Containers and scenes wrap an `Actor` in a [`SceneNode`](crate::graph::SceneNode);
//! hierarchy lives in the arena, not in the actor.

use crate::behavior::{Behavior, BehaviorId};
use crate::input::{PointerEvent, PointerHandler};
use crate::keyframes::KeyframesContainer;
use crate::matrix::Matrix;
use crate::systems::dirty::DirtyRegions;
use crate::systems::renderer::RenderSurface;
use crate::types::{Color, ImageTransform, Point, Property, Rect};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Custom leaf paint. Replaces the default fill and image drawing.
pub type PaintHook = Rc<dyn Fn(&Actor, &mut dyn RenderSurface, f64)>;

/// A sub-rectangle of a named image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRegion {
    pub image: String,
    pub src: Rect,
}

impl ImageRegion {
    pub fn new(image: impl Into<String>, src: Rect) -> Self {
        Self {
            image: image.into(),
            src,
        }
    }
}

/// State compared between frames to decide whether the actor needs a repaint.
#[derive(Clone, Debug, PartialEq)]
struct VisualState {
    world: Matrix,
    width: f32,
    height: f32,
    alpha: f32,
    fill: Option<Color>,
    image: Option<ImageRegion>,
    image_transform: ImageTransform,
}

pub struct Actor {
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub scale_anchor_x: f32,
    pub scale_anchor_y: f32,
    /// Radians, clockwise on screen.
    pub rotation_angle: f32,
    pub rotation_anchor_x: f32,
    pub rotation_anchor_y: f32,
    pub alpha: f32,
    /// When set, children inherit this actor's alpha.
    pub is_global_alpha: bool,
    pub visible: bool,
    pub mouse_enabled: bool,
    pub fill_color: Option<Color>,
    pub image: Option<ImageRegion>,
    pub image_transform: ImageTransform,

    pub start_time: f64,
    pub duration: f64,
    expired: bool,
    /// Destroy once expired.
    pub discardable: bool,
    pub time: f64,

    behaviors: Vec<Behavior>,
    keyframes: Vec<KeyframesContainer>,
    pointer_handlers: Vec<PointerHandler>,
    pub paint_hook: Option<PaintHook>,
    /// Runs after a container has painted its children.
    pub post_paint: Option<PaintHook>,

    model_view: Matrix,
    world_model_view: Matrix,
    aabb: Rect,
    frame_alpha: f32,
    in_frame: bool,
    last_visual: Option<VisualState>,
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("bounds", &Rect::new(self.x, self.y, self.width, self.height))
            .field("alpha", &self.alpha)
            .field("visible", &self.visible)
            .field("expired", &self.expired)
            .field("behaviors", &self.behaviors.len())
            .field("keyframes", &self.keyframes.len())
            .finish()
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor {
    pub fn new() -> Self {
        Self {
            name: None,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            scale_anchor_x: 0.5,
            scale_anchor_y: 0.5,
            rotation_angle: 0.0,
            rotation_anchor_x: 0.5,
            rotation_anchor_y: 0.5,
            alpha: 1.0,
            is_global_alpha: false,
            visible: true,
            mouse_enabled: true,
            fill_color: None,
            image: None,
            image_transform: ImageTransform::None,
            start_time: 0.0,
            duration: f64::MAX,
            expired: false,
            discardable: false,
            time: 0.0,
            behaviors: Vec::new(),
            keyframes: Vec::new(),
            pointer_handlers: Vec::new(),
            paint_hook: None,
            post_paint: None,
            model_view: Matrix::identity(),
            world_model_view: Matrix::identity(),
            aabb: Rect::default(),
            frame_alpha: 1.0,
            in_frame: false,
            last_visual: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.set_bounds(x, y, width, height);
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    pub fn with_image(mut self, region: ImageRegion) -> Self {
        self.image = Some(region);
        self
    }

    pub fn with_frame_time(mut self, start_time: f64, duration: f64) -> Self {
        self.set_frame_time(start_time, duration);
        self
    }

    pub fn set_location(&mut self, x: f32, y: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn set_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn set_bounds(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.set_location(x, y).set_size(width, height)
    }

    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) -> &mut Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    pub fn set_scale_anchored(&mut self, scale_x: f32, scale_y: f32, anchor_x: f32, anchor_y: f32) -> &mut Self {
        self.scale_anchor_x = anchor_x;
        self.scale_anchor_y = anchor_y;
        self.set_scale(scale_x, scale_y)
    }

    pub fn set_rotation(&mut self, angle: f32) -> &mut Self {
        self.rotation_angle = angle;
        self
    }

    pub fn set_rotation_anchored(&mut self, angle: f32, anchor_x: f32, anchor_y: f32) -> &mut Self {
        self.rotation_anchor_x = anchor_x;
        self.rotation_anchor_y = anchor_y;
        self.set_rotation(angle)
    }

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.alpha = alpha;
        self
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }

    pub fn set_discardable(&mut self, discardable: bool) -> &mut Self {
        self.discardable = discardable;
        self
    }

    pub fn property(&self, property: Property) -> f32 {
        match property {
            Property::X => self.x,
            Property::Y => self.y,
            Property::Width => self.width,
            Property::Height => self.height,
            Property::Rotation => self.rotation_angle,
            Property::ScaleX => self.scale_x,
            Property::ScaleY => self.scale_y,
            Property::Alpha => self.alpha,
        }
    }

    pub fn set_property(&mut self, property: Property, value: f32) {
        match property {
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::Width => self.width = value,
            Property::Height => self.height = value,
            Property::Rotation => self.rotation_angle = value,
            Property::ScaleX => self.scale_x = value,
            Property::ScaleY => self.scale_y = value,
            Property::Alpha => self.alpha = value,
        }
    }

    /// Sets the lifetime window and clears any previous expiry.
    pub fn set_frame_time(&mut self, start_time: f64, duration: f64) -> &mut Self {
        self.start_time = start_time;
        self.duration = duration;
        self.expired = false;
        self
    }

    /// Removes the actor from every future frame.
    pub fn set_out_of_frame_time(&mut self) -> &mut Self {
        self.set_frame_time(-1.0, 0.0)
    }

    pub fn set_expired(&mut self, time: f64) {
        if !self.expired {
            self.expired = true;
            debug!(actor = ?self.name, time, "actor expired");
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Checks the lifetime window, marking the actor expired once it has passed.
    pub fn is_in_animation_frame(&mut self, time: f64) -> bool {
        if self.expired {
            return false;
        }
        if self.duration != f64::MAX && time >= self.start_time + self.duration {
            self.set_expired(time);
            return false;
        }
        self.start_time >= 0.0 && self.start_time <= time
    }

    pub fn is_in_frame(&self) -> bool {
        self.in_frame
    }

    pub fn add_behavior(&mut self, behavior: Behavior) -> BehaviorId {
        let id = behavior.id();
        self.behaviors.push(behavior);
        id
    }

    pub fn remove_behavior(&mut self, id: BehaviorId) -> Option<Behavior> {
        let index = self.behaviors.iter().position(|b| b.id() == id)?;
        Some(self.behaviors.remove(index))
    }

    pub fn behavior(&self, id: BehaviorId) -> Option<&Behavior> {
        self.behaviors.iter().find(|b| b.id() == id)
    }

    pub fn behavior_mut(&mut self, id: BehaviorId) -> Option<&mut Behavior> {
        self.behaviors.iter_mut().find(|b| b.id() == id)
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    pub fn empty_behavior_list(&mut self) {
        self.behaviors.clear();
    }

    pub fn add_keyframes(&mut self, keyframes: KeyframesContainer) {
        self.keyframes.push(keyframes);
    }

    pub fn keyframes(&self) -> &[KeyframesContainer] {
        &self.keyframes
    }

    pub fn empty_keyframes_list(&mut self) {
        self.keyframes.clear();
    }

    pub fn add_pointer_handler(&mut self, handler: impl FnMut(&PointerEvent) + 'static) {
        self.pointer_handlers.push(Box::new(handler));
    }

    pub(crate) fn fire_pointer(&mut self, event: &PointerEvent) {
        for handler in self.pointer_handlers.iter_mut() {
            handler(event);
        }
    }

    /// True when the local point lies inside the actor's own bounds.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        Rect::from_wh(self.width, self.height).contains(x, y)
    }

    pub fn model_view(&self) -> &Matrix {
        &self.model_view
    }

    pub fn world_model_view(&self) -> &Matrix {
        &self.world_model_view
    }

    /// Screen-space bounding box of the transformed actor, as of the last animate.
    pub fn aabb(&self) -> Rect {
        self.aabb
    }

    pub fn frame_alpha(&self) -> f32 {
        self.frame_alpha
    }

    /// Alpha handed down to children.
    pub(crate) fn children_alpha(&self, parent_alpha: f32) -> f32 {
        if self.is_global_alpha {
            self.frame_alpha
        } else {
            parent_alpha
        }
    }

    /// Converts a screen point into local coordinates, or `None` if the
    /// world transform is singular.
    pub fn screen_to_local(&self, point: Point) -> Option<Point> {
        let inverse = self.world_model_view.get_inverse()?;
        Some(inverse.transform_point(point))
    }

    /// Runs one frame for this actor.
    ///
    /// Returns true when the actor is alive and should be painted this frame.
    pub(crate) fn animate(&mut self, time: f64, parent_world: &Matrix, parent_alpha: f32, dirty: &mut DirtyRegions) -> bool {
        self.time = time;
        if !self.visible {
            return false;
        }
        if !self.is_in_animation_frame(time) {
            if self.in_frame {
                dirty.add(self.aabb);
                self.last_visual = None;
            }
            self.in_frame = false;
            return false;
        }

        self.apply_behaviors(time);
        self.apply_keyframes(time);
        self.update_model_view(parent_world);
        self.frame_alpha = parent_alpha * self.alpha;

        let old_aabb = self.aabb;
        self.aabb = self.compute_aabb();
        let visual = self.visual_state();
        if self.last_visual.as_ref() != Some(&visual) {
            dirty.add(old_aabb);
            dirty.add(self.aabb);
            self.last_visual = Some(visual);
        }

        self.in_frame = true;
        true
    }

    fn apply_behaviors(&mut self, time: f64) {
        if self.behaviors.is_empty() {
            return;
        }
        let mut behaviors = std::mem::take(&mut self.behaviors);
        for behavior in behaviors.iter_mut() {
            behavior.apply(time, self);
        }
        behaviors.retain(|b| {
            let keep = !(b.discardable && b.is_expired());
            if !keep {
                debug!(behavior = b.id(), "discardable behavior removed");
            }
            keep
        });
        // Keep anything a callback attached while the list was taken.
        behaviors.append(&mut self.behaviors);
        self.behaviors = behaviors;
    }

    fn apply_keyframes(&mut self, time: f64) {
        if self.keyframes.is_empty() {
            return;
        }
        let mut keyframes = std::mem::take(&mut self.keyframes);
        for k in keyframes.iter_mut() {
            k.apply(time, self);
        }
        keyframes.retain(|k| !(k.discardable && k.is_expired()));
        keyframes.append(&mut self.keyframes);
        self.keyframes = keyframes;
    }

    /// `T(x, y) * [T(ra) R T(-ra)] * [T(sa) S T(-sa)]`, then composed under the parent.
    pub(crate) fn update_model_view(&mut self, parent_world: &Matrix) {
        let mut mv = Matrix::translate(self.x, self.y);
        if self.rotation_angle != 0.0 {
            let rx = self.rotation_anchor_x * self.width;
            let ry = self.rotation_anchor_y * self.height;
            mv.multiply(&Matrix::translate(rx, ry))
                .multiply(&Matrix::rotate(self.rotation_angle))
                .multiply(&Matrix::translate(-rx, -ry));
        }
        if self.scale_x != 1.0 || self.scale_y != 1.0 {
            let sx = self.scale_anchor_x * self.width;
            let sy = self.scale_anchor_y * self.height;
            mv.multiply(&Matrix::translate(sx, sy))
                .multiply(&Matrix::scale(self.scale_x, self.scale_y))
                .multiply(&Matrix::translate(-sx, -sy));
        }
        self.model_view = mv;

        let mut world = *parent_world;
        world.multiply(&mv);
        self.world_model_view = world;
    }

    fn compute_aabb(&self) -> Rect {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(self.width, 0.0),
            Point::new(self.width, self.height),
            Point::new(0.0, self.height),
        ]
        .map(|p| self.world_model_view.transform_point(p));
        Rect::from_points(&corners)
    }

    fn visual_state(&self) -> VisualState {
        VisualState {
            world: self.world_model_view,
            width: self.width,
            height: self.height,
            alpha: self.frame_alpha,
            fill: self.fill_color,
            image: self.image.clone(),
            image_transform: self.image_transform,
        }
    }

    /// Leaf paint in local coordinates. `world` is the transform currently set on the surface.
    pub fn paint(&self, surface: &mut dyn RenderSurface, world: &Matrix, time: f64) {
        if let Some(hook) = &self.paint_hook {
            hook(self, surface, time);
            return;
        }
        let bounds = Rect::from_wh(self.width, self.height);
        if let Some(color) = self.fill_color {
            surface.fill_rect(bounds, color);
        }
        let Some(region) = &self.image else {
            return;
        };

        let mirror = match self.image_transform {
            ImageTransform::None => None,
            ImageTransform::FlipHorizontal => Some((self.width, 0.0, -1.0, 1.0)),
            ImageTransform::FlipVertical => Some((0.0, self.height, 1.0, -1.0)),
            ImageTransform::FlipAll => Some((self.width, self.height, -1.0, -1.0)),
        };
        if let Some((tx, ty, sx, sy)) = mirror {
            let mut m = *world;
            m.multiply(&Matrix::translate(tx, ty)).multiply(&Matrix::scale(sx, sy));
            surface.set_transform(&m);
        }
        if let Err(e) = surface.draw_image(&region.image, region.src, bounds) {
            warn!(actor = ?self.name, image = %region.image, error = %e, "image draw skipped");
        }
        if mirror.is_some() {
            surface.set_transform(world);
        }
    }
}
