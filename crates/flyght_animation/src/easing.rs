//! Easing functions for animations
//!
//! Curves can be named the way the site scripts name them:
//!
//! | name | curve |
//! |---|---|
//! | `none`, `linear`, `power0` | linear |
//! | `power1`, `quad` | t² |
//! | `power2`, `cubic` | t³ |
//! | `power3`, `quart` | t⁴ |
//! | `power4`, `quint`, `strong` | t⁵ |
//! | `sine` | sinusoidal |
//! | `elastic.out(amplitude, period)` | elastic overshoot |
//! | `back.out(overshoot)` | back overshoot |
//! | `cubic-bezier(x1, y1, x2, y2)` | CSS bezier |
//!
//! Power and sine families take a `.in`, `.out` or `.inOut` suffix and
//! default to `.out`.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::str::FromStr;

use crate::error::AnimationError;

/// Easing used by tweens that name none and sit on no timeline with a default
pub const FALLBACK_EASING: Easing = Easing::EaseOutQuad;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    /// Decaying oscillation past the target
    ElasticOut {
        amplitude: f32,
        period: f32,
    },
    /// Single overshoot past the target
    BackOut {
        overshoot: f32,
    },
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    pub const ELASTIC_OUT: Easing = Easing::ElasticOut {
        amplitude: 1.0,
        period: 0.3,
    };

    pub const BACK_OUT: Easing = Easing::BackOut { overshoot: 1.70158 };

    /// Apply the easing function to a progress value (0.0 to 1.0).
    ///
    /// Progress is clamped first, so every curve maps 0 to 0 and 1 to 1
    /// exactly, including the ones that overshoot in between.
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match *self {
            Easing::Linear => t,
            Easing::EaseInQuad => power_in(t, 2),
            Easing::EaseOutQuad => power_out(t, 2),
            Easing::EaseInOutQuad => power_in_out(t, 2),
            Easing::EaseInCubic => power_in(t, 3),
            Easing::EaseOutCubic => power_out(t, 3),
            Easing::EaseInOutCubic => power_in_out(t, 3),
            Easing::EaseInQuart => power_in(t, 4),
            Easing::EaseOutQuart => power_out(t, 4),
            Easing::EaseInOutQuart => power_in_out(t, 4),
            Easing::EaseInQuint => power_in(t, 5),
            Easing::EaseOutQuint => power_out(t, 5),
            Easing::EaseInOutQuint => power_in_out(t, 5),
            Easing::EaseInSine => 1.0 - (t * FRAC_PI_2).cos(),
            Easing::EaseOutSine => (t * FRAC_PI_2).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
            Easing::BackOut { overshoot } => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u * u * u + overshoot * u * u
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }

    /// Whether intermediate values may leave the 0..=1 range
    pub fn overshoots(&self) -> bool {
        match *self {
            Easing::ElasticOut { .. } | Easing::BackOut { .. } => true,
            Easing::CubicBezier(_, y1, _, y2) => !(0.0..=1.0).contains(&y1) || !(0.0..=1.0).contains(&y2),
            _ => false,
        }
    }

    fn power(degree: u32, direction: Direction) -> Easing {
        use Direction::*;
        match (degree, direction) {
            (0, _) => Easing::Linear,
            (1, In) => Easing::EaseInQuad,
            (1, Out) => Easing::EaseOutQuad,
            (1, InOut) => Easing::EaseInOutQuad,
            (2, In) => Easing::EaseInCubic,
            (2, Out) => Easing::EaseOutCubic,
            (2, InOut) => Easing::EaseInOutCubic,
            (3, In) => Easing::EaseInQuart,
            (3, Out) => Easing::EaseOutQuart,
            (3, InOut) => Easing::EaseInOutQuart,
            (_, In) => Easing::EaseInQuint,
            (_, Out) => Easing::EaseOutQuint,
            (_, InOut) => Easing::EaseInOutQuint,
        }
    }
}

fn power_in(t: f32, exponent: i32) -> f32 {
    t.powi(exponent)
}

fn power_out(t: f32, exponent: i32) -> f32 {
    1.0 - (1.0 - t).powi(exponent)
}

fn power_in_out(t: f32, exponent: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(exponent - 1) * t.powi(exponent)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(exponent) / 2.0
    }
}

/// Elastic out. Amplitudes below 1 stretch the period instead of shrinking
/// the swing.
fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    let swing = amplitude.max(1.0);
    let period = period / amplitude.min(1.0);
    let phase = period / TAU * (1.0 / swing).asin();
    swing * 2f32.powf(-10.0 * t) * ((t - phase) * TAU / period).sin() + 1.0
}

/// Cubic bezier easing calculation (matches CSS spec / browser implementations).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
/// Computes in f64 internally to avoid f32 precision jitter at 120fps.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let x = t as f64;
    let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// Evaluate cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of cubic bezier: B'(t) = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    In,
    Out,
    InOut,
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let unknown = || AnimationError::UnknownEasing(name.to_string());
        let trimmed = name.trim();

        let (head, args) = match trimmed.find('(') {
            Some(open) => {
                let inner = trimmed[open + 1..].strip_suffix(')').ok_or_else(unknown)?;
                let args = inner
                    .split(',')
                    .map(|a| a.trim().parse::<f32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| unknown())?;
                if args.iter().any(|a| !a.is_finite()) {
                    return Err(unknown());
                }
                (trimmed[..open].trim(), args)
            }
            None => (trimmed, Vec::new()),
        };

        if head == "cubic-bezier" {
            return match args.as_slice() {
                [x1, y1, x2, y2] => Ok(Easing::CubicBezier(*x1, *y1, *x2, *y2)),
                _ => Err(unknown()),
            };
        }

        let (family, direction) = match head.split_once('.') {
            Some((family, suffix)) => {
                let direction = match suffix.to_ascii_lowercase().as_str() {
                    "in" => Direction::In,
                    "out" => Direction::Out,
                    "inout" => Direction::InOut,
                    _ => return Err(unknown()),
                };
                (family, Some(direction))
            }
            None => (head, None),
        };

        let family = family.to_ascii_lowercase();
        let easing = match family.as_str() {
            "none" | "linear" if direction.is_none() && args.is_empty() => Easing::Linear,
            "power0" if args.is_empty() => Easing::Linear,
            "power1" | "quad" | "power2" | "cubic" | "power3" | "quart" | "power4" | "quint"
            | "strong"
                if args.is_empty() =>
            {
                let degree = match family.as_str() {
                    "power1" | "quad" => 1,
                    "power2" | "cubic" => 2,
                    "power3" | "quart" => 3,
                    _ => 4,
                };
                Easing::power(degree, direction.unwrap_or(Direction::Out))
            }
            "sine" if args.is_empty() => match direction.unwrap_or(Direction::Out) {
                Direction::In => Easing::EaseInSine,
                Direction::Out => Easing::EaseOutSine,
                Direction::InOut => Easing::EaseInOutSine,
            },
            "elastic" if matches!(direction, None | Some(Direction::Out)) => {
                let (amplitude, period) = match args.as_slice() {
                    [] => (1.0, 0.3),
                    [a] => (*a, 0.3),
                    [a, p] => (*a, *p),
                    _ => return Err(unknown()),
                };
                if amplitude <= 0.0 || period <= 0.0 {
                    return Err(unknown());
                }
                Easing::ElasticOut { amplitude, period }
            }
            "back" if matches!(direction, None | Some(Direction::Out)) => match args.as_slice() {
                [] => Easing::BACK_OUT,
                [overshoot] => Easing::BackOut {
                    overshoot: *overshoot,
                },
                _ => return Err(unknown()),
            },
            _ => return Err(unknown()),
        };

        Ok(easing)
    }
}
