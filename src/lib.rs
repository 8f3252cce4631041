pub mod math;
pub mod fractal;
pub mod color;
pub mod params;
pub mod stream;
pub mod raster;
pub mod cloud;
pub mod bifurcation;
pub mod session;
pub mod config;
pub mod export;
pub mod error;

pub use math::{C, logistic};
pub use fractal::{Escape, evaluate, escapes};
pub use color::{ColorScheme, Rgba, color_for, hsl_to_rgb, legend, attractor_color};
pub use params::{
    Resolution, RasterResolution, SampleParams, RasterParams, BifurcationParams,
    ZoomRegion, Bounds
};
pub use stream::{Message, ChunkSource, Chunked};
pub use raster::{RasterFrame, render_region, render_all};
pub use cloud::{Sample, sample_region};
pub use bifurcation::{sample_bifurcation, settle};
pub use session::{Session, Job, Event, Envelope, SESSION_BACKLOG};
pub use config::{load_job, parse_job};
pub use error::{EngineError, EngineResult};
