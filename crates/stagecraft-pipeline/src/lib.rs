use anyhow::{bail, Context, Result};
use stagecraft_core::behavior::{
    ColorBehavior, ContainerBehavior, GenericBehavior, PathBehavior, RotateBehavior,
    Scale1Behavior, ScaleBehavior,
};
use stagecraft_core::interpolator::parse_interpolator;
use stagecraft_core::keyframes::KeyframeTrack;
use stagecraft_core::path::MotionPath;
use stagecraft_core::systems::{FlexLayout, RasterSurface, RenderSurface};
use stagecraft_core::{
    Actor, ActorId, AssetLoader, Behavior, ConfigError, Director, FrameStats, ImageRegion,
    Interpolator, Keyframes, KeyframesContainer, Point, Rect,
};
use stagecraft_schema::{
    ActorDef, ActorKind, BehaviorDef, BehaviorKindDef, ColorValue, EasingDef, ImageAsset,
    KeyframesDef, LayoutDef, SceneSwitch, StageDocument,
};
use taffy::style::{AlignItems, FlexDirection, JustifyContent};
use tracing::{debug, info, instrument, warn};

/// A director built from a document, plus the document's switch schedule.
#[derive(Debug)]
pub struct Stage {
    pub director: Director,
    pub images: Vec<ImageAsset>,
    switches: Vec<SceneSwitch>,
    next_switch: usize,
}

impl Stage {
    /// Loads every document image into `surface`. Failures are logged and skipped.
    pub fn load_images(&self, surface: &mut RasterSurface, loader: &dyn AssetLoader) -> usize {
        let mut loaded = 0;
        for image in &self.images {
            match surface.load_image_with(loader, image.name.clone(), &image.src) {
                Ok(()) => loaded += 1,
                Err(e) => warn!(image = %image.name, src = %image.src, error = %e, "image skipped"),
            }
        }
        loaded
    }

    /// Applies every switch scheduled at or before the current stage time.
    pub fn apply_due_switches(&mut self) -> Result<()> {
        while let Some(switch) = self.switches.get(self.next_switch) {
            if switch.at > self.director.time() {
                break;
            }
            debug!(at = switch.at, scene = switch.scene, "scheduled switch");
            self.director.switch_to_scene(switch.scene, switch.transition)?;
            self.next_switch += 1;
        }
        Ok(())
    }

    /// Renders one fixed-step frame at the configured frame rate.
    pub fn step(&mut self, surface: &mut dyn RenderSurface) -> Result<FrameStats> {
        self.apply_due_switches()?;
        let delta = self.director.config.frame_duration();
        Ok(self.director.render(delta, surface)?)
    }

    pub fn pending_switches(&self) -> usize {
        self.switches.len() - self.next_switch
    }
}

/// Reads a document through `loader` and builds it.
#[instrument(level = "info", skip(loader))]
pub fn load_document(path: &str, loader: &dyn AssetLoader) -> Result<Stage> {
    let bytes = loader.load_bytes(path)?;
    let json = String::from_utf8(bytes).with_context(|| format!("{path} is not UTF-8"))?;
    parse_document(&json).with_context(|| format!("failed to load {path}"))
}

pub fn parse_document(json: &str) -> Result<Stage> {
    let document = StageDocument::from_json(json).context("malformed stage document")?;
    load_stage(document)
}

/// Converts a schema document into a runnable stage.
pub fn load_stage(document: StageDocument) -> Result<Stage> {
    document.config.validate()?;
    let mut director = Director::new(document.config);

    // Keyframe sets first, so actors can attach them by name.
    for def in &document.keyframes {
        let keyframes = build_keyframes(def)?;
        director.keyframes.register(def.name.clone(), keyframes);
    }

    for (index, scene_def) in document.scenes.iter().enumerate() {
        let scene = director.create_scene();
        if let Some(actor) = director.graph.actor_mut(scene) {
            actor.name = scene_def.name.clone();
            actor.fill_color = scene_def.background.as_ref().and_then(resolve_color);
        }
        for actor_def in &scene_def.actors {
            let id = build_actor_recursive(&mut director, actor_def)?;
            director.graph.add_child(scene, id)?;
        }
        director.set_time_scale(index, scene_def.time_scale)?;
        if scene_def.paused {
            director.pause_scene(index)?;
        }
    }

    let mut switches = document.switches;
    for switch in &switches {
        if switch.scene >= director.scene_count() {
            bail!("switch at {} ms targets unknown scene {}", switch.at, switch.scene);
        }
        if let Some(transition) = &switch.transition {
            transition.validate()?;
        }
    }
    switches.sort_by(|a, b| a.at.total_cmp(&b.at));

    info!(
        scenes = director.scene_count(),
        actors = director.graph.len(),
        switches = switches.len(),
        "stage loaded"
    );

    Ok(Stage {
        director,
        images: document.images,
        switches,
        next_switch: 0,
    })
}

fn build_actor_recursive(director: &mut Director, def: &ActorDef) -> Result<ActorId> {
    // 1. Geometry and appearance
    let mut actor = Actor::new().with_bounds(def.x, def.y, def.width, def.height);
    actor.name = def.name.clone();
    actor.alpha = def.alpha;
    actor.rotation_angle = def.rotation;
    actor.set_scale(def.scale_x, def.scale_y);
    actor.fill_color = def.fill.as_ref().and_then(resolve_color);
    if let Some(image) = &def.image {
        let src = def.image_rect.unwrap_or(Rect::from_wh(def.width, def.height));
        actor.image = Some(ImageRegion::new(image.clone(), src));
    }
    actor.image_transform = def.image_transform;
    actor.is_global_alpha = def.global_alpha;
    actor.mouse_enabled = def.mouse_enabled;
    actor.set_discardable(def.discardable);
    if def.start_time.is_some() || def.duration.is_some() {
        actor.set_frame_time(def.start_time.unwrap_or(0.0), def.duration.unwrap_or(f64::MAX));
    }

    // 2. Add to the arena
    let id = match &def.kind {
        ActorKind::Actor => director.graph.add_actor(actor),
        ActorKind::Container {
            add_hint,
            layout,
            children,
        } => {
            let id = director.graph.add_container(actor);
            if let Some(container) = director.graph.container_mut(id) {
                container.add_hint = *add_hint;
            }
            // Layout before children so each child registers with it.
            if let Some(layout) = layout {
                director.graph.set_layout(id, Box::new(build_layout(layout)))?;
            }
            for child_def in children {
                let child = build_actor_recursive(director, child_def)?;
                director.graph.add_child(id, child)?;
            }
            id
        }
    };

    // 3. Animation
    for behavior_def in &def.behaviors {
        director.graph.add_behavior(id, build_behavior(behavior_def)?);
    }
    for name in &def.keyframes {
        if !director.attach_keyframes(id, name) {
            warn!(actor = id, keyframes = %name, "unknown keyframes skipped");
        }
    }

    Ok(id)
}

fn build_behavior(def: &BehaviorDef) -> Result<Behavior> {
    if !def.duration.is_finite() || def.duration < 0.0 {
        return Err(ConfigError::InvalidDuration(def.duration).into());
    }

    let behavior = match &def.kind {
        BehaviorKindDef::Alpha { from, to } => Behavior::alpha(*from, *to),
        BehaviorKindDef::Rotate { from, to, anchor } => {
            let (ax, ay) = anchor.fraction();
            Behavior::new(RotateBehavior::new(*from, *to).with_anchor(ax, ay))
        }
        BehaviorKindDef::Scale {
            from_x,
            to_x,
            from_y,
            to_y,
            anchor,
        } => {
            let (ax, ay) = anchor.fraction();
            Behavior::new(ScaleBehavior::new(*from_x, *to_x, *from_y, *to_y).with_anchor(ax, ay))
        }
        BehaviorKindDef::Scale1 {
            from,
            to,
            axis,
            anchor,
        } => {
            let (ax, ay) = anchor.fraction();
            Behavior::new(Scale1Behavior::new(*from, *to, *axis).with_anchor(ax, ay))
        }
        BehaviorKindDef::Path {
            points,
            closed,
            auto_rotate,
            facing,
        } => {
            if points.len() < 2 {
                bail!("path behavior needs at least two points, got {}", points.len());
            }
            let points: Vec<Point> = points.iter().map(|[x, y]| Point::new(*x, *y)).collect();
            let path = MotionPath::polyline(&points, *closed);
            Behavior::new(PathBehavior::new(path).with_auto_rotate(*auto_rotate, *facing))
        }
        BehaviorKindDef::Color { from, to } => {
            let (Some(start), Some(end)) = (resolve_color(from), resolve_color(to)) else {
                return Err(ConfigError::Invalid(format!("bad color in {:?} -> {:?}", from, to)).into());
            };
            Behavior::new(ColorBehavior::new(start, end))
        }
        BehaviorKindDef::Property { property, from, to } => {
            Behavior::new(GenericBehavior::property(*from, *to, *property))
        }
        BehaviorKindDef::Container { behaviors } => {
            let mut container = ContainerBehavior::new();
            for child in behaviors {
                container.add_behavior(build_behavior(child)?);
            }
            Behavior::new(container)
        }
    };

    Ok(behavior
        .with_frame_time(def.start_time, def.duration)
        .with_cycle(def.cycle)
        .with_discardable(def.discardable)
        .with_interpolator(resolve_easing(def.interpolator.as_ref())?))
}

fn build_keyframes(def: &KeyframesDef) -> Result<KeyframesContainer> {
    let mut keyframes = Keyframes::new(def.name.clone(), 0.0, def.duration);
    for track_def in &def.tracks {
        let mut track = KeyframeTrack::new(track_def.property);
        for stop in &track_def.stops {
            track.add_stop(stop.at, stop.value, resolve_easing(stop.easing.as_ref())?);
        }
        keyframes.add_track(track);
    }
    let mut container = KeyframesContainer::new(def.name.clone(), def.start_time, def.duration)
        .with_keyframes(keyframes)
        .with_cycle(def.cycle);
    container.discardable = def.discardable;
    Ok(container)
}

fn build_layout(def: &LayoutDef) -> FlexLayout {
    let direction = match def.direction.as_deref() {
        Some("column") => FlexDirection::Column,
        _ => FlexDirection::Row,
    };
    let mut layout = FlexLayout::new(direction);
    if let Some(gap) = def.gap {
        layout = layout.with_gap(gap);
    }
    if let Some(padding) = def.padding {
        layout = layout.with_padding(padding);
    }
    if let Some(j) = &def.justify_content {
        layout = layout.with_justify(match j.as_str() {
            "center" => JustifyContent::Center,
            "space_between" => JustifyContent::SpaceBetween,
            "flex_end" => JustifyContent::FlexEnd,
            _ => JustifyContent::FlexStart,
        });
    }
    if let Some(a) = &def.align_items {
        layout = layout.with_align(match a.as_str() {
            "center" => AlignItems::Center,
            "stretch" => AlignItems::Stretch,
            "flex_end" => AlignItems::FlexEnd,
            _ => AlignItems::FlexStart,
        });
    }
    layout
}

fn resolve_easing(def: Option<&EasingDef>) -> Result<Interpolator, ConfigError> {
    match def {
        None => Ok(Interpolator::linear()),
        Some(EasingDef::Name(name)) => parse_interpolator(name),
        Some(EasingDef::Curve(interpolator)) => Ok(*interpolator),
    }
}

fn resolve_color(value: &ColorValue) -> Option<stagecraft_core::Color> {
    let color = value.resolve();
    if color.is_none() {
        warn!(?value, "malformed color ignored");
    }
    color
}
