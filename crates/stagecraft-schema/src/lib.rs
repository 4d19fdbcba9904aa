use serde::{Deserialize, Serialize};
use stagecraft_core::behavior::{Axis, Facing};
use stagecraft_core::systems::{Anchor, SceneTransition};
use stagecraft_core::types::{ImageTransform, Property};
use stagecraft_core::{AddHint, Color, DirectorConfig, Interpolator, Rect};

/// A complete declarative stage: viewport settings, shared assets, scenes
/// and a schedule of scene switches.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StageDocument {
    #[serde(flatten)]
    pub config: DirectorConfig,
    /// Images available to actors, keyed by name.
    #[serde(default)]
    pub images: Vec<ImageAsset>,
    /// Named keyframe sets registered on the director.
    #[serde(default)]
    pub keyframes: Vec<KeyframesDef>,
    pub scenes: Vec<SceneDef>,
    /// Scene switches, applied when the stage clock reaches `at`.
    #[serde(default)]
    pub switches: Vec<SceneSwitch>,
}

impl StageDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub name: String,
    /// Path handed to the asset loader.
    pub src: String,
}

/// A color given either as `"#RRGGBB[AA]"` or as float channels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ColorValue {
    Hex(String),
    Rgba(Color),
}

impl ColorValue {
    /// `None` for malformed hex strings.
    pub fn resolve(&self) -> Option<Color> {
        match self {
            ColorValue::Hex(hex) => Color::from_hex(hex),
            ColorValue::Rgba(color) => Some(*color),
        }
    }
}

/// An easing curve given by name (`"bounce_out"`) or as a full object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum EasingDef {
    Name(String),
    Curve(Interpolator),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SceneDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub background: Option<ColorValue>,
    /// Multiplier applied to the scene clock (default: 1.0)
    #[serde(default = "default_one_f64")]
    pub time_scale: f64,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub actors: Vec<ActorDef>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ActorDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default = "default_one")]
    pub alpha: f32,
    /// Radians.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_one")]
    pub scale_x: f32,
    #[serde(default = "default_one")]
    pub scale_y: f32,
    #[serde(default)]
    pub fill: Option<ColorValue>,
    /// Name of an entry in the document's `images`.
    #[serde(default)]
    pub image: Option<String>,
    /// Source region inside the image; defaults to the actor's size.
    #[serde(default)]
    pub image_rect: Option<Rect>,
    #[serde(default)]
    pub image_transform: ImageTransform,
    /// Children inherit this actor's alpha.
    #[serde(default)]
    pub global_alpha: bool,
    #[serde(default)]
    pub discardable: bool,
    #[serde(default = "default_true")]
    pub mouse_enabled: bool,
    /// Lifetime window in milliseconds; unbounded when omitted.
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub behaviors: Vec<BehaviorDef>,
    /// Names of keyframe sets to attach.
    #[serde(default)]
    pub keyframes: Vec<String>,

    // Leaf or container
    #[serde(flatten)]
    pub kind: ActorKind,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActorKind {
    /// A leaf actor painting its fill or image.
    Actor,
    /// An actor holding children, painted in list order.
    Container {
        #[serde(default)]
        add_hint: AddHint,
        #[serde(default)]
        layout: Option<LayoutDef>,
        #[serde(default)]
        children: Vec<ActorDef>,
    },
}

/// Flexbox settings for a container's children.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LayoutDef {
    /// "row" or "column"
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub gap: Option<f32>,
    #[serde(default)]
    pub padding: Option<f32>,
    /// "flex_start", "center", "flex_end", "space_between"
    #[serde(default)]
    pub justify_content: Option<String>,
    /// "flex_start", "center", "flex_end", "stretch"
    #[serde(default)]
    pub align_items: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BehaviorDef {
    /// Milliseconds on the owner's scene clock.
    #[serde(default)]
    pub start_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub cycle: bool,
    #[serde(default)]
    pub discardable: bool,
    /// Easing function (default: linear)
    #[serde(default)]
    pub interpolator: Option<EasingDef>,

    #[serde(flatten)]
    pub kind: BehaviorKindDef,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorKindDef {
    Alpha {
        from: f32,
        to: f32,
    },
    /// Angles in radians.
    Rotate {
        from: f32,
        to: f32,
        #[serde(default)]
        anchor: Anchor,
    },
    Scale {
        from_x: f32,
        to_x: f32,
        from_y: f32,
        to_y: f32,
        #[serde(default)]
        anchor: Anchor,
    },
    Scale1 {
        from: f32,
        to: f32,
        #[serde(default)]
        axis: Axis,
        #[serde(default)]
        anchor: Anchor,
    },
    /// Travels a polyline through `points`.
    Path {
        points: Vec<[f32; 2]>,
        #[serde(default)]
        closed: bool,
        #[serde(default)]
        auto_rotate: bool,
        #[serde(default)]
        facing: Facing,
    },
    Color {
        from: ColorValue,
        to: ColorValue,
    },
    /// Drives a named actor property between two values.
    Property {
        property: Property,
        from: f32,
        to: f32,
    },
    /// Children run on the container's local timeline.
    Container {
        #[serde(default)]
        behaviors: Vec<BehaviorDef>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct KeyframesDef {
    pub name: String,
    #[serde(default)]
    pub start_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub cycle: bool,
    #[serde(default)]
    pub discardable: bool,
    pub tracks: Vec<TrackDef>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrackDef {
    pub property: Property,
    pub stops: Vec<StopDef>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StopDef {
    /// Normalized position in `[0, 1]`.
    pub at: f64,
    pub value: f32,
    #[serde(default)]
    pub easing: Option<EasingDef>,
}

/// Switch to `scene` once the stage clock reaches `at` milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SceneSwitch {
    pub at: f64,
    pub scene: usize,
    #[serde(default)]
    pub transition: Option<SceneTransition>,
}

fn default_one() -> f32 {
    1.0
}

fn default_one_f64() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}
