//! Easing curves: progress remapping and the matching speed multiplier
//!
//! `position` maps linear progress to eased progress. `speed_multiplier` is its
//! derivative, so integrating it over `[0, 1]` yields exactly 1: scaling a time
//! step by it warps *when* motion happens without changing *how far* things go.

use crate::error::ConfettiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Curve order used when no exponent is configured (quadratic)
pub const DEFAULT_EXPONENT: f64 = 2.0;

/// Shape of the shared time-dilation curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// Eased position in `[0, 1]` for `progress` (clamped to `[0, 1]`)
    pub fn position(self, progress: f64, exponent: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        let n = exponent.max(1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t.powf(n),
            Easing::EaseOut => 1.0 - (1.0 - t).powf(n),
            Easing::EaseInOut => {
                let k = 2f64.powf(n - 1.0);
                if t < 0.5 {
                    k * t.powf(n)
                } else {
                    1.0 - k * (1.0 - t).powf(n)
                }
            }
        }
    }

    /// Derivative of [`Easing::position`] with respect to progress
    pub fn speed_multiplier(self, progress: f64, exponent: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        let n = exponent.max(1.0);
        match self {
            Easing::Linear => 1.0,
            Easing::EaseIn => n * t.powf(n - 1.0),
            Easing::EaseOut => n * (1.0 - t).powf(n - 1.0),
            Easing::EaseInOut => {
                let scale = n * 2f64.powf(n - 1.0);
                if t < 0.5 {
                    scale * t.powf(n - 1.0)
                } else {
                    scale * (1.0 - t).powf(n - 1.0)
                }
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Easing {
    type Err = ConfettiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ConfettiError::UnknownEasing(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPONENTS: [f64; 5] = [1.0, 1.5, 2.0, 3.0, 5.0];

    /// Midpoint-rule integral of the speed multiplier over [0, 1]
    fn integrate_speed(easing: Easing, n: f64) -> f64 {
        let steps = 20_000;
        let h = 1.0 / steps as f64;
        (0..steps)
            .map(|i| easing.speed_multiplier((i as f64 + 0.5) * h, n) * h)
            .sum()
    }

    #[test]
    fn endpoints_are_fixed() {
        for easing in Easing::ALL {
            for n in EXPONENTS {
                assert!(easing.position(0.0, n).abs() < 1e-12, "{easing} n={n}");
                assert!((easing.position(1.0, n) - 1.0).abs() < 1e-12, "{easing} n={n}");
            }
        }
    }

    #[test]
    fn speed_integrates_to_one() {
        for easing in Easing::ALL {
            for n in EXPONENTS {
                let area = integrate_speed(easing, n);
                assert!((area - 1.0).abs() < 1e-3, "{easing} n={n}: {area}");
            }
        }
    }

    #[test]
    fn progress_is_clamped() {
        for easing in Easing::ALL {
            assert_eq!(easing.position(-3.0, 2.0), easing.position(0.0, 2.0));
            assert_eq!(easing.position(7.0, 2.0), easing.position(1.0, 2.0));
            assert_eq!(
                easing.speed_multiplier(1.5, 3.0),
                easing.speed_multiplier(1.0, 3.0)
            );
        }
    }

    #[test]
    fn ease_in_out_halves_join() {
        for n in EXPONENTS {
            let below = Easing::EaseInOut.position(0.5 - 1e-9, n);
            let above = Easing::EaseInOut.position(0.5, n);
            assert!((below - above).abs() < 1e-6, "n={n}");
            assert!((above - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn exponent_one_degenerates_to_linear() {
        for easing in Easing::ALL {
            for i in 0..=10 {
                let t = i as f64 / 10.0;
                assert!((easing.position(t, 1.0) - t).abs() < 1e-12);
                assert!((easing.speed_multiplier(t, 1.0) - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn outputs_are_finite_and_non_negative() {
        for easing in Easing::ALL {
            for n in EXPONENTS {
                for i in 0..=100 {
                    let t = i as f64 / 100.0;
                    let p = easing.position(t, n);
                    let s = easing.speed_multiplier(t, n);
                    assert!(p.is_finite() && (0.0..=1.0).contains(&p));
                    assert!(s.is_finite() && s >= 0.0);
                }
            }
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("ease-in-out".parse::<Easing>().unwrap(), Easing::EaseInOut);
        assert_eq!("linear".parse::<Easing>().unwrap(), Easing::Linear);
        assert!("bounce".parse::<Easing>().is_err());
    }
}
