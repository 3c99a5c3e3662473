//! Easing curves.
//!
//! Names and shapes follow the GSAP ease vocabulary the site's motion
//! was authored in (`power3.out`, `back.out(1.4)`, `elastic.out(1, 0.5)`),
//! so declarations can be written with the same strings.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vitrine_common::VitrineError;

/// Default overshoot of `back` eases.
pub const DEFAULT_BACK_OVERSHOOT: f64 = 1.70158;

/// An easing curve mapping linear progress in `[0, 1]` to eased progress.
///
/// `powerN` uses an exponent of `N + 1`; `power1` is quadratic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// `none` / `linear`.
    Linear,
    PowerIn(u8),
    PowerOut(u8),
    PowerInOut(u8),
    /// Overshoots the target then settles.
    BackOut { overshoot: f64 },
    /// Springs past the target with decaying oscillation.
    ElasticOut { amplitude: f64, period: f64 },
}

impl Default for Ease {
    fn default() -> Self {
        Ease::PowerOut(1)
    }
}

impl Ease {
    /// Map linear progress to eased progress.
    ///
    /// Input is clamped to `[0, 1]`. Endpoints are exact: `apply(0) == 0`
    /// and `apply(1) == 1` for every curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Ease::Linear => t,
            Ease::PowerIn(n) => t.powi(n as i32 + 1),
            Ease::PowerOut(n) => 1.0 - (1.0 - t).powi(n as i32 + 1),
            Ease::PowerInOut(n) => {
                let p = n as i32 + 1;
                if t < 0.5 {
                    2f64.powi(p - 1) * t.powi(p)
                } else {
                    1.0 - (2.0 - 2.0 * t).powi(p) / 2.0
                }
            }
            Ease::BackOut { overshoot } => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u.powi(3) + overshoot * u.powi(2)
            }
            Ease::ElasticOut { amplitude, period } => {
                let a = amplitude.max(1.0);
                let mut p = if period > 0.0 { period } else { 0.3 };
                if amplitude > 0.0 && amplitude < 1.0 {
                    p /= amplitude;
                }
                let shift = p / (2.0 * PI) * (1.0 / a).asin();
                a * 2f64.powf(-10.0 * t) * ((t - shift) * (2.0 * PI / p)).sin() + 1.0
            }
        }
    }
}

impl FromStr for Ease {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, args) = match s.find('(') {
            Some(open) => {
                let close = s
                    .rfind(')')
                    .filter(|close| *close > open)
                    .ok_or_else(|| VitrineError::timeline(format!("unbalanced ease: {s}")))?;
                let args = s[open + 1..close]
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(|a| {
                        a.parse::<f64>()
                            .map_err(|_| VitrineError::timeline(format!("bad ease argument: {a}")))
                    })
                    .collect::<Result<Vec<f64>, _>>()?;
                (&s[..open], args)
            }
            None => (s, Vec::new()),
        };

        let (family, kind) = name.split_once('.').unwrap_or((name, "out"));
        let power = |n: u8| match kind {
            "in" => Ok(Ease::PowerIn(n)),
            "out" => Ok(Ease::PowerOut(n)),
            "inOut" => Ok(Ease::PowerInOut(n)),
            other => Err(VitrineError::timeline(format!("unknown ease direction: {other}"))),
        };

        match family {
            "none" | "linear" => Ok(Ease::Linear),
            "power0" => Ok(Ease::Linear),
            "power1" | "quad" => power(1),
            "power2" | "cubic" => power(2),
            "power3" | "quart" => power(3),
            "power4" | "quint" | "strong" => power(4),
            "back" if kind == "out" => Ok(Ease::BackOut {
                overshoot: args.first().copied().unwrap_or(DEFAULT_BACK_OVERSHOOT),
            }),
            "elastic" if kind == "out" => Ok(Ease::ElasticOut {
                amplitude: args.first().copied().unwrap_or(1.0),
                period: args.get(1).copied().unwrap_or(0.3),
            }),
            _ => Err(VitrineError::timeline(format!("unsupported ease: {s}"))),
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Linear => write!(f, "none"),
            Ease::PowerIn(n) => write!(f, "power{n}.in"),
            Ease::PowerOut(n) => write!(f, "power{n}.out"),
            Ease::PowerInOut(n) => write!(f, "power{n}.inOut"),
            Ease::BackOut { overshoot } => write!(f, "back.out({overshoot})"),
            Ease::ElasticOut { amplitude, period } => {
                write!(f, "elastic.out({amplitude}, {period})")
            }
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = VitrineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(ease: Ease) -> Self {
        ease.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Ease; 7] = [
        Ease::Linear,
        Ease::PowerIn(2),
        Ease::PowerOut(3),
        Ease::PowerInOut(2),
        Ease::BackOut { overshoot: 2.5 },
        Ease::ElasticOut {
            amplitude: 1.0,
            period: 0.5,
        },
        Ease::PowerOut(1),
    ];

    #[test]
    fn test_endpoints_exact() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0, "{ease}");
            assert_eq!(ease.apply(1.0), 1.0, "{ease}");
            assert_eq!(ease.apply(-3.0), 0.0, "{ease}");
            assert_eq!(ease.apply(7.0), 1.0, "{ease}");
        }
    }

    #[test]
    fn test_power_out_shape() {
        // power3.out is quartic
        let v = Ease::PowerOut(3).apply(0.5);
        assert!((v - (1.0 - 0.5f64.powi(4))).abs() < 1e-12);
        assert!((Ease::PowerInOut(2).apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_back_out_overshoots() {
        let ease = Ease::BackOut { overshoot: 2.5 };
        let peak = (1..100)
            .map(|i| ease.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_elastic_starts_at_zero_and_oscillates() {
        let ease = Ease::ElasticOut {
            amplitude: 1.0,
            period: 0.5,
        };
        assert!(ease.apply(1e-9).abs() < 1e-6);
        assert!((1..100).any(|i| ease.apply(i as f64 / 100.0) > 1.0));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("power3.out".parse::<Ease>().unwrap(), Ease::PowerOut(3));
        assert_eq!("power2.inOut".parse::<Ease>().unwrap(), Ease::PowerInOut(2));
        assert_eq!("none".parse::<Ease>().unwrap(), Ease::Linear);
        assert_eq!(
            "back.out(2.5)".parse::<Ease>().unwrap(),
            Ease::BackOut { overshoot: 2.5 }
        );
        assert_eq!(
            "elastic.out(1, 0.5)".parse::<Ease>().unwrap(),
            Ease::ElasticOut {
                amplitude: 1.0,
                period: 0.5
            }
        );
        assert_eq!(
            "back.out".parse::<Ease>().unwrap(),
            Ease::BackOut {
                overshoot: DEFAULT_BACK_OVERSHOOT
            }
        );
        assert!("bounce.out".parse::<Ease>().is_err());
        assert!("power3.sideways".parse::<Ease>().is_err());
        assert!("back.out(2.5".parse::<Ease>().is_err());
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&Ease::PowerOut(3)).unwrap();
        assert_eq!(json, "\"power3.out\"");
        let parsed: Ease = serde_json::from_str("\"elastic.out(1, 0.5)\"").unwrap();
        assert!(matches!(parsed, Ease::ElasticOut { .. }));
    }

    proptest! {
        #[test]
        fn prop_power_curves_are_monotone(a in 0.0f64..=1.0, b in 0.0f64..=1.0, n in 1u8..=4) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for ease in [Ease::PowerIn(n), Ease::PowerOut(n), Ease::PowerInOut(n)] {
                prop_assert!(ease.apply(lo) <= ease.apply(hi) + 1e-12);
            }
        }
    }
}
