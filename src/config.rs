use std::fs;
use std::path::Path;

use crate::error::EngineResult;
use crate::session::Job;

/// Parses a job description such as `{"engine": "raster", "maxIterations": 200}`.
///
/// Fields left out take the engine's defaults. Unknown engines, resolutions or
/// color schemes are rejected.
pub fn parse_job(text: &str) -> EngineResult<Job> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_job<P: AsRef<Path>>(path: P) -> EngineResult<Job> {
    let text = fs::read_to_string(path.as_ref())?;
    let job = parse_job(&text)?;
    log::info!("loaded {} job from {}", job.name(), path.as_ref().display());
    Ok(job)
}
