//! # Interpolators
//!
//! Pure functions mapping normalized time `[0, 1]` to an eased value.
//!
//! An [`Interpolator`] is a small `Copy` value, so any number of behaviors
//! can share the same curve without coordination. Two modifiers are applied
//! to the input before the curve runs:
//! - **ping-pong**: `2t` for `t <= 0.5`, `2(1 - t)` afterwards, clamped to `[0, 1]`.
//! - **inverse**: `1 - t`.

use crate::errors::ConfigError;
use keyframe::EasingFunction;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Result of sampling an interpolator.
///
/// `x` echoes the normalized input, `y` carries the eased output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// The shape of an easing curve.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Curve {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    ExponentialIn { exponent: f32 },
    ExponentialOut { exponent: f32 },
    ExponentialInOut { exponent: f32 },
    ElasticIn { amplitude: f32, period: f32 },
    ElasticOut { amplitude: f32, period: f32 },
    ElasticInOut { amplitude: f32, period: f32 },
    BounceIn,
    BounceOut,
    BounceInOut,
}

/// An easing curve plus its input modifiers.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interpolator {
    #[serde(flatten)]
    pub curve: Curve,
    #[serde(default)]
    pub ping_pong: bool,
    #[serde(default)]
    pub inverse: bool,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::linear()
    }
}

impl Interpolator {
    pub const fn new(curve: Curve) -> Self {
        Self {
            curve,
            ping_pong: false,
            inverse: false,
        }
    }

    pub const fn linear() -> Self {
        Self::new(Curve::Linear)
    }

    /// Linear ramp up to 1 at `t = 0.5` and back down to 0.
    pub const fn ping_pong() -> Self {
        Self::new(Curve::Linear).with_ping_pong(true)
    }

    pub const fn exponential_in(exponent: f32) -> Self {
        Self::new(Curve::ExponentialIn { exponent })
    }

    pub const fn exponential_out(exponent: f32) -> Self {
        Self::new(Curve::ExponentialOut { exponent })
    }

    pub const fn exponential_in_out(exponent: f32) -> Self {
        Self::new(Curve::ExponentialInOut { exponent })
    }

    pub const fn elastic_out(amplitude: f32, period: f32) -> Self {
        Self::new(Curve::ElasticOut { amplitude, period })
    }

    pub const fn bounce_out() -> Self {
        Self::new(Curve::BounceOut)
    }

    pub const fn with_ping_pong(mut self, ping_pong: bool) -> Self {
        self.ping_pong = ping_pong;
        self
    }

    pub const fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    /// Samples the curve at normalized time `time`.
    ///
    /// Inputs outside `[0, 1]` are only meaningful for ping-pong interpolators.
    pub fn get_position(&self, time: f32) -> Position {
        let mut t = time;
        if self.ping_pong {
            t = if t <= 0.5 { t * 2.0 } else { (1.0 - t) * 2.0 };
            t = t.clamp(0.0, 1.0);
        }
        if self.inverse {
            t = 1.0 - t;
        }
        Position {
            x: time,
            y: self.curve.eval(t),
        }
    }

    /// Samples `steps + 1` evenly spaced points, useful for plotting a curve.
    pub fn contour(&self, steps: usize) -> Vec<Position> {
        let steps = steps.max(1);
        (0..=steps)
            .map(|i| self.get_position(i as f32 / steps as f32))
            .collect()
    }
}

impl EasingFunction for Interpolator {
    fn y(&self, x: f64) -> f64 {
        self.get_position(x as f32).y as f64
    }
}

impl Curve {
    fn eval(&self, t: f32) -> f32 {
        match *self {
            Curve::Linear => t,
            Curve::EaseIn => keyframe::functions::EaseIn.y(t as f64) as f32,
            Curve::EaseOut => keyframe::functions::EaseOut.y(t as f64) as f32,
            Curve::EaseInOut => keyframe::functions::EaseInOut.y(t as f64) as f32,
            Curve::ExponentialIn { exponent } => t.powf(exponent),
            Curve::ExponentialOut { exponent } => 1.0 - (1.0 - t).powf(exponent),
            Curve::ExponentialInOut { exponent } => {
                if t * 2.0 < 1.0 {
                    (t * 2.0).powf(exponent) / 2.0
                } else {
                    1.0 - (2.0 - t * 2.0).powf(exponent) / 2.0
                }
            }
            Curve::ElasticIn { amplitude, period } => elastic_in(t, amplitude, period),
            Curve::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
            Curve::ElasticInOut { amplitude, period } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let (a, s) = elastic_phase(amplitude, period);
                let t2 = t * 2.0 - 1.0;
                let wave = ((t2 - s) * (2.0 * PI) / period).sin();
                if t2 < 0.0 {
                    -0.5 * a * 2f32.powf(10.0 * t2) * wave
                } else {
                    1.0 + 0.5 * a * 2f32.powf(-10.0 * t2) * wave
                }
            }
            Curve::BounceIn => 1.0 - bounce_out(1.0 - t),
            Curve::BounceOut => bounce_out(t),
            Curve::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - t * 2.0)) * 0.5
                } else {
                    bounce_out(t * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
        }
    }
}

/// Amplitudes below 1 make `asin(1 / a)` undefined; fall back to a unit
/// amplitude with a quarter-period phase shift.
fn elastic_phase(amplitude: f32, period: f32) -> (f32, f32) {
    if amplitude < 1.0 {
        (1.0, period / 4.0)
    } else {
        (amplitude, period / (2.0 * PI) * (1.0 / amplitude).asin())
    }
}

fn elastic_in(t: f32, amplitude: f32, period: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let (a, s) = elastic_phase(amplitude, period);
    let t1 = t - 1.0;
    -(a * 2f32.powf(10.0 * t1) * ((t1 - s) * (2.0 * PI) / period).sin())
}

fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let (a, s) = elastic_phase(amplitude, period);
    a * 2f32.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / period).sin() + 1.0
}

fn bounce_out(t: f32) -> f32 {
    const K: f32 = 7.5625;
    if t < 1.0 / 2.75 {
        K * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        K * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        K * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        K * t * t + 0.984375
    }
}

/// Parses an interpolator by name, as used in scene documents.
///
/// Parametric curves get their conventional defaults (exponent 2,
/// elastic amplitude 1.1 and period 0.4).
pub fn parse_interpolator(name: &str) -> Result<Interpolator, ConfigError> {
    let curve = match name {
        "linear" => Curve::Linear,
        "ping_pong" => return Ok(Interpolator::ping_pong()),
        "ease_in" => Curve::EaseIn,
        "ease_out" => Curve::EaseOut,
        "ease_in_out" => Curve::EaseInOut,
        "exponential_in" => Curve::ExponentialIn { exponent: 2.0 },
        "exponential_out" => Curve::ExponentialOut { exponent: 2.0 },
        "exponential_in_out" => Curve::ExponentialInOut { exponent: 2.0 },
        "elastic_in" => Curve::ElasticIn {
            amplitude: 1.1,
            period: 0.4,
        },
        "elastic_out" => Curve::ElasticOut {
            amplitude: 1.1,
            period: 0.4,
        },
        "elastic_in_out" => Curve::ElasticInOut {
            amplitude: 1.1,
            period: 0.4,
        },
        "bounce_in" => Curve::BounceIn,
        "bounce_out" => Curve::BounceOut,
        "bounce_in_out" => Curve::BounceInOut,
        other => return Err(ConfigError::UnknownInterpolator(other.to_string())),
    };
    Ok(Interpolator::new(curve))
}
