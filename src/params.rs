use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::ColorScheme;
use crate::error::EngineError;

/// Sampling density shared by the point cloud and the bifurcation sampler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Low,
    #[default]
    Medium,
    High,
}

impl Resolution {
    /// Grid density multiplier for the point cloud.
    pub fn density(&self) -> f64 {
        match self {
            Resolution::Low => 0.5,
            Resolution::Medium => 1.0,
            Resolution::High => 2.0,
        }
    }

    /// Step size multiplier for the bifurcation sweep; larger means coarser.
    pub fn step_multiplier(&self) -> f64 {
        match self {
            Resolution::Low => 4.0,
            Resolution::Medium => 2.0,
            Resolution::High => 1.0,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resolution::Low => "low",
            Resolution::Medium => "medium",
            Resolution::High => "high",
        })
    }
}

impl FromStr for Resolution {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Resolution::Low),
            "medium" => Ok(Resolution::Medium),
            "high" => Ok(Resolution::High),
            other => Err(EngineError::UnknownResolution(other.to_string())),
        }
    }
}

/// Raster width presets; `Custom` takes its width from `RasterParams::custom_resolution`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterResolution {
    #[default]
    Low,
    Medium,
    High,
    Custom,
}

impl RasterResolution {
    pub fn preset_width(&self) -> Option<u32> {
        match self {
            RasterResolution::Low => Some(2048),
            RasterResolution::Medium => Some(4096),
            RasterResolution::High => Some(5120),
            RasterResolution::Custom => None,
        }
    }
}

impl fmt::Display for RasterResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RasterResolution::Low => "low",
            RasterResolution::Medium => "medium",
            RasterResolution::High => "high",
            RasterResolution::Custom => "custom",
        })
    }
}

impl FromStr for RasterResolution {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(RasterResolution::Custom),
            other => match other.parse::<Resolution>()? {
                Resolution::Low => Ok(RasterResolution::Low),
                Resolution::Medium => Ok(RasterResolution::Medium),
                Resolution::High => Ok(RasterResolution::High),
            },
        }
    }
}

/// Point-cloud sampling of the Mandelbrot set around a center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleParams {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
    pub resolution: Resolution,
    pub max_iterations: u32,
    pub escape_radius: f64,
}

impl Default for SampleParams {
    fn default() -> Self {
        SampleParams {
            center_x: -0.5,
            center_y: 0.0,
            zoom: 1.0,
            resolution: Resolution::Medium,
            max_iterations: 100,
            escape_radius: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomRegion {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle of the complex plane mapped onto a raster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    pub const DEFAULT_VIEW: Bounds = Bounds { x_min: -2.5, x_max: 1.5, y_min: -2.0, y_max: 2.0 };
}

impl From<ZoomRegion> for Bounds {
    fn from(z: ZoomRegion) -> Self {
        Bounds {
            x_min: z.center_x - z.width / 2.0,
            x_max: z.center_x + z.width / 2.0,
            y_min: z.center_y - z.height / 2.0,
            y_max: z.center_y + z.height / 2.0,
        }
    }
}

/// Full-image Mandelbrot render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RasterParams {
    pub max_iterations: u32,
    pub resolution: RasterResolution,
    pub custom_resolution: Option<u32>,
    pub color_scheme: ColorScheme,
    pub escape_radius: f64,
    pub zoom_region: Option<ZoomRegion>,
}

impl Default for RasterParams {
    fn default() -> Self {
        RasterParams {
            max_iterations: 100,
            resolution: RasterResolution::Low,
            custom_resolution: None,
            color_scheme: ColorScheme::Classic,
            escape_radius: 2.0,
            zoom_region: None,
        }
    }
}

impl RasterParams {
    pub fn width(&self) -> u32 {
        self.resolution.preset_width().unwrap_or(self.custom_resolution.unwrap_or(0))
    }

    /// Height keeps a fixed 3:2 aspect ratio.
    pub fn height(&self) -> u32 {
        (self.width() as f64 * (2.0 / 3.0)).round() as u32
    }

    pub fn bounds(&self) -> Bounds {
        self.zoom_region.map(Bounds::from).unwrap_or(Bounds::DEFAULT_VIEW)
    }
}

/// Logistic-map bifurcation sweep over [start_r, end_r).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BifurcationParams {
    pub start_r: f64,
    pub end_r: f64,
    pub resolution: Resolution,
    /// Convergence tolerance for the cycle check.
    pub accuracy_value: f64,
    /// Post-warmup iteration budget.
    pub max_iterations: u32,
    pub warmup_iterations: u32,
}

impl Default for BifurcationParams {
    fn default() -> Self {
        BifurcationParams {
            start_r: 1.1,
            end_r: 4.0,
            resolution: Resolution::Medium,
            accuracy_value: 0.0001,
            max_iterations: 300,
            warmup_iterations: 100,
        }
    }
}
