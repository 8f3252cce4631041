use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

pub type Rgba = [u8; 4];

pub const INSIDE: Rgba = [0, 0, 0, 255];

/// Number of hue cycles the psychedelic palette packs into one iteration range.
const PSYCHEDELIC_REPEATS: f64 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Classic,
    Smooth,
    Psychedelic,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [ColorScheme::Classic, ColorScheme::Smooth, ColorScheme::Psychedelic];

    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Classic => "classic",
            ColorScheme::Smooth => "smooth",
            ColorScheme::Psychedelic => "psychedelic",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(ColorScheme::Classic),
            "smooth" => Ok(ColorScheme::Smooth),
            "psychedelic" => Ok(ColorScheme::Psychedelic),
            other => Err(EngineError::UnknownScheme(other.to_string())),
        }
    }
}

/// Maps an (optionally smoothed) iteration value to a color.
///
/// Anything at or beyond `max_iter` is inside the set and painted opaque black.
/// Raster output and legends both go through here so they always agree.
pub fn color_for(value: f64, max_iter: u32, scheme: ColorScheme) -> Rgba {
    let max = max_iter as f64;
    if value >= max {
        return INSIDE;
    }

    let t = value / max;
    let (hue, saturation, lightness) = match scheme {
        ColorScheme::Classic => (t * 360.0, 1.0, 0.3 + 0.4 * (PI * value / max).sin()),
        ColorScheme::Smooth => (t * 360.0, 0.9, 0.3 + 0.4 * (1.0 - value / max)),
        ColorScheme::Psychedelic => {
            let cycle = ((value * PSYCHEDELIC_REPEATS) % max) / max;
            (cycle * 360.0, 0.95, 0.3 + 0.4 * (PI * cycle).sin())
        }
    };

    hsl_to_rgb(hue, saturation, lightness)
}

/// HSL to RGBA bytes. `h` is in degrees, `s` and `l` in [0, 1].
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgba {
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h / 360.0;
        (
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    };

    [to_byte(r), to_byte(g), to_byte(b), 255]
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 { t += 1.0; }
    if t > 1.0 { t -= 1.0; }
    if t < 1.0 / 6.0 { return p + (q - p) * 6.0 * t; }
    if t < 1.0 / 2.0 { return q; }
    if t < 2.0 / 3.0 { return p + (q - p) * (2.0 / 3.0 - t) * 6.0; }
    p
}

// NaN lands on 0, like a clamped byte array would store it
fn to_byte(component: f64) -> u8 {
    (component * 255.0).round() as u8
}

/// Evenly spaced stops from 0 to `max_iter` inclusive, colored exactly like the raster.
pub fn legend(max_iter: u32, scheme: ColorScheme, steps: usize) -> Vec<Rgba> {
    match steps {
        0 => Vec::new(),
        1 => vec![color_for(0.0, max_iter, scheme)],
        _ => (0..steps)
            .map(|i| {
                let value = max_iter as f64 * i as f64 / (steps - 1) as f64;
                color_for(value, max_iter, scheme)
            })
            .collect(),
    }
}

/// Tint used when plotting bifurcation points: hue follows r across [0, 4].
pub fn attractor_color(r: f64) -> Rgba {
    hsl_to_rgb(r / 4.0 * 360.0, 1.0, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_is_black_for_every_scheme() {
        for scheme in ColorScheme::ALL {
            assert_eq!(color_for(50.0, 50, scheme), [0, 0, 0, 255]);
            assert_eq!(color_for(51.5, 50, scheme), [0, 0, 0, 255]);
        }
    }

    #[test]
    fn classic_at_zero_is_dark_red() {
        // hue 0, lightness 0.3, saturation 1 → (0.6, 0, 0)
        assert_eq!(color_for(0.0, 100, ColorScheme::Classic), [153, 0, 0, 255]);
    }

    #[test]
    fn smooth_at_zero_is_light_red() {
        // lightness 0.7, saturation 0.9 → q = 0.97, p = 0.43
        assert_eq!(color_for(0.0, 100, ColorScheme::Smooth), [247, 110, 110, 255]);
    }

    #[test]
    fn psychedelic_cycles_five_times() {
        let a = color_for(3.0, 100, ColorScheme::Psychedelic);
        let b = color_for(23.0, 100, ColorScheme::Psychedelic);
        assert_eq!(a, b);
    }

    #[test]
    fn primary_hues() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), [255, 0, 0, 255]);
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), [0, 255, 0, 255]);
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), [0, 0, 255, 255]);
        assert_eq!(hsl_to_rgb(42.0, 0.0, 0.5), [128, 128, 128, 255]);
    }

    #[test]
    fn nan_value_does_not_panic() {
        let c = color_for(f64::NAN, 100, ColorScheme::Classic);
        assert_eq!(c[3], 255);
    }

    #[test]
    fn legend_reuses_color_for() {
        let stops = legend(80, ColorScheme::Smooth, 5);
        assert_eq!(stops.len(), 5);
        assert_eq!(stops[0], color_for(0.0, 80, ColorScheme::Smooth));
        assert_eq!(stops[2], color_for(40.0, 80, ColorScheme::Smooth));
        assert_eq!(stops[4], INSIDE);
    }

    #[test]
    fn scheme_names_round_trip() {
        for scheme in ColorScheme::ALL {
            assert_eq!(scheme.name().parse::<ColorScheme>().unwrap(), scheme);
        }
        assert!("rainbow".parse::<ColorScheme>().is_err());
    }
}
