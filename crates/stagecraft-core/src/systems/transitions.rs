//! # Transitions System
//!
//! Scene switching effects.
//!
//! ## Key Types
//! - `Anchor`: the nine edge/corner/center reference points, as 0..1 fractions.
//! - `TransitionKind`: translate, scale or rotate.
//! - `SceneTransition`: an outgoing and an incoming leg sharing a duration.

use crate::errors::ConfigError;
use crate::interpolator::Interpolator;
use serde::{Deserialize, Serialize};

/// Reference point on a scene or actor box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Every anchor, in index order.
    pub const ALL: [Anchor; 9] = [
        Anchor::Center,
        Anchor::Top,
        Anchor::Bottom,
        Anchor::Left,
        Anchor::Right,
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];

    pub fn from_index(index: usize) -> Result<Self, ConfigError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| ConfigError::UnknownAnchor(index.to_string()))
    }

    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| ConfigError::UnknownAnchor(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Anchor::Center => "center",
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Right => "right",
            Anchor::TopLeft => "top_left",
            Anchor::TopRight => "top_right",
            Anchor::BottomLeft => "bottom_left",
            Anchor::BottomRight => "bottom_right",
        }
    }

    /// Position as a fraction of the box size.
    pub fn fraction(self) -> (f32, f32) {
        match self {
            Anchor::Center => (0.5, 0.5),
            Anchor::Top => (0.5, 0.0),
            Anchor::Bottom => (0.5, 1.0),
            Anchor::Left => (0.0, 0.5),
            Anchor::Right => (1.0, 0.5),
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }

    pub fn is_edge(self) -> bool {
        matches!(self, Anchor::Top | Anchor::Bottom | Anchor::Left | Anchor::Right)
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Anchor::TopLeft | Anchor::TopRight | Anchor::BottomLeft | Anchor::BottomRight
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Translate,
    Scale,
    Rotate,
}

/// One side of a scene switch.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionLeg {
    pub kind: TransitionKind,
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(default)]
    pub interpolator: Interpolator,
}

impl TransitionLeg {
    pub fn new(kind: TransitionKind, anchor: Anchor) -> Self {
        Self {
            kind,
            anchor,
            interpolator: Interpolator::linear(),
        }
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Translation only slides along an edge.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kind == TransitionKind::Translate && !self.anchor.is_edge() {
            return Err(ConfigError::UnsupportedAnchor {
                anchor: self.anchor.name().to_string(),
                operation: "translate",
            });
        }
        Ok(())
    }
}

/// Outgoing and incoming scene animations run in parallel.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneTransition {
    /// Milliseconds.
    pub duration: f64,
    /// Fade the outgoing scene out and the incoming scene in.
    #[serde(default)]
    pub alpha: bool,
    pub outgoing: TransitionLeg,
    pub incoming: TransitionLeg,
}

impl SceneTransition {
    pub fn new(duration: f64, outgoing: TransitionLeg, incoming: TransitionLeg) -> Self {
        Self {
            duration,
            alpha: false,
            outgoing,
            incoming,
        }
    }

    /// Slides the old scene out towards `out_anchor` and the new one in from `in_anchor`.
    pub fn translate(duration: f64, out_anchor: Anchor, in_anchor: Anchor) -> Self {
        Self::new(
            duration,
            TransitionLeg::new(TransitionKind::Translate, out_anchor),
            TransitionLeg::new(TransitionKind::Translate, in_anchor),
        )
    }

    pub fn scale(duration: f64, out_anchor: Anchor, in_anchor: Anchor) -> Self {
        Self::new(
            duration,
            TransitionLeg::new(TransitionKind::Scale, out_anchor),
            TransitionLeg::new(TransitionKind::Scale, in_anchor),
        )
    }

    pub fn rotate(duration: f64, out_anchor: Anchor, in_anchor: Anchor) -> Self {
        Self::new(
            duration,
            TransitionLeg::new(TransitionKind::Rotate, out_anchor),
            TransitionLeg::new(TransitionKind::Rotate, in_anchor),
        )
    }

    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    /// Checks both legs and the duration before anything is installed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        self.outgoing.validate()?;
        self.incoming.validate()
    }
}
