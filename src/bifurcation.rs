//! Logistic-map bifurcation sampling.
//!
//! For each r the sampler seeds many orbits of x ← r·x·(1−x), lets them settle,
//! and keeps the settled value when the orbit comes back within `accuracy_value`
//! of it inside the iteration budget. This is a heuristic: orbits with a period
//! longer than the budget, or chaotic ones, are reported as "no cycle" and
//! dropped, so parts of the chaotic region come out sparse.

use crate::cloud::Sample;
use crate::math::logistic;
use crate::params::{BifurcationParams, Resolution};
use crate::stream::{ChunkSource, Chunked};

/// Width in r of one emitted band.
pub const BIFURCATION_BAND: f64 = 0.1;

/// (r step, x step) at `r`. Sampling is finer in r around the first
/// period doublings and in the chaotic region.
pub fn step_sizes(resolution: Resolution, r: f64) -> (f64, f64) {
    let mult = resolution.step_multiplier();

    let r_step = if r > 3.0 {
        0.0002 * mult
    } else if r > 2.8 {
        0.0001 * mult
    } else {
        0.0005 * mult
    };

    let x_step = if r > 3.0 { 0.0002 * mult } else { 0.0003 * mult };

    (r_step, x_step)
}

/// Where seeds are centered: the stable fixed point (r−1)/r up to r = 3, mid-interval beyond.
pub fn initial_guess(r: f64) -> f64 {
    if r <= 3.0 { (r - 1.0) / r } else { 0.5 }
}

/// Runs one seed: warmup, then look for a return to the settled value.
///
/// Returns the settled value with the number of post-warmup steps it took to
/// come back, or `None` if it never did. Diverging or NaN orbits always fail
/// the tolerance check and end up as `None`.
pub fn settle(r: f64, seed: f64, params: &BifurcationParams) -> Option<Sample> {
    let mut x = seed;
    for _ in 0..params.warmup_iterations {
        x = logistic(r, x);
    }

    let base = x;
    let mut current = logistic(r, base);
    let mut iterations = 1;

    if (current - base).abs() < params.accuracy_value {
        return Some(Sample { x: r, y: base, iterations });
    }

    for _ in 0..params.max_iterations {
        current = logistic(r, current);
        iterations += 1;
        if (current - base).abs() < params.accuracy_value {
            return Some(Sample { x: r, y: base, iterations });
        }
    }

    None
}

pub struct BifurcationSource {
    params: BifurcationParams,
    band_start: f64,
}

impl BifurcationSource {
    pub fn new(params: BifurcationParams) -> Self {
        let band_start = params.start_r;
        if !params.start_r.is_finite() || !params.end_r.is_finite() {
            log::warn!("non-finite r range [{}, {}); nothing to sample", params.start_r, params.end_r);
        }
        log::info!(
            "bifurcation over r in [{}, {}) at {} resolution, warmup {}, budget {}, tolerance {}",
            params.start_r, params.end_r, params.resolution,
            params.warmup_iterations, params.max_iterations, params.accuracy_value
        );

        BifurcationSource { params, band_start }
    }

    fn sample_band(&self, start: f64, end: f64) -> Vec<Sample> {
        let mut points = Vec::new();
        let mut r = start;

        loop {
            let (r_step, x_step) = step_sizes(self.params.resolution, r);
            let next = r + r_step;
            // the step is below one ulp of r this far out
            if next <= r || next >= end {
                break;
            }
            r = next;

            let guess = initial_guess(r);
            let x_range = if r > 3.0 { 0.4 } else { 0.2 };

            let mut offset = -x_range;
            while offset <= x_range {
                let seed = guess + offset;
                offset += x_step;

                if seed <= 0.0 || seed >= 1.0 {
                    continue;
                }
                if let Some(sample) = settle(r, seed, &self.params) {
                    points.push(sample);
                }
            }
        }

        points
    }
}

impl ChunkSource for BifurcationSource {
    type Payload = Vec<Sample>;

    fn next_chunk(&mut self) -> Option<(Vec<Sample>, f64)> {
        let BifurcationParams { start_r, end_r, .. } = self.params;
        if !start_r.is_finite() || !end_r.is_finite() || !(self.band_start < end_r) {
            return None;
        }

        let start = self.band_start;
        if start + BIFURCATION_BAND <= start {
            log::warn!("r = {} is too large to advance by {}, stopping", start, BIFURCATION_BAND);
            return None;
        }
        let end = (start + BIFURCATION_BAND).min(end_r);
        let points = self.sample_band(start, end);
        self.band_start += BIFURCATION_BAND;

        log::debug!("r band [{:.4}, {:.4}): {} points", start, end, points.len());
        Some((points, (end - start_r) / (end_r - start_r)))
    }
}

/// Streams attractor samples in bands of `BIFURCATION_BAND` in r.
pub fn sample_bifurcation(params: BifurcationParams) -> Chunked<BifurcationSource> {
    Chunked::new(BifurcationSource::new(params))
}
