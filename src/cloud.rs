use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::fractal::escapes;
use crate::math::C;
use crate::params::SampleParams;
use crate::stream::{ChunkSource, Chunked};

/// Grid cells per axis at density 1.
pub const CLOUD_GRID: f64 = 400.0;
/// Side length of one emitted block of cells.
pub const CLOUD_CHUNK: usize = 100;

/// A sampled point. Its coordinates are engine specific: normalized grid
/// position for the point cloud, (r, attractor value) for bifurcation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub iterations: u32,
}

pub struct CloudSource {
    params: SampleParams,
    cells: usize,
    step: f64,
    chunks_per_axis: usize,
    next: usize,
}

impl CloudSource {
    pub fn new(params: SampleParams) -> Self {
        let cells = (CLOUD_GRID * params.resolution.density()) as usize;
        let step = (4.0 / params.zoom) / cells as f64;
        let chunks_per_axis = cells.div_ceil(CLOUD_CHUNK);
        log::info!(
            "point cloud around ({}, {}) zoom {}: {}x{} cells in {} chunks",
            params.center_x, params.center_y, params.zoom, cells, cells, chunks_per_axis * chunks_per_axis
        );

        CloudSource { params, cells, step, chunks_per_axis, next: 0 }
    }

    pub fn total_chunks(&self) -> usize {
        self.chunks_per_axis * self.chunks_per_axis
    }

    fn sample_block(&self, chunk_x: usize, chunk_y: usize) -> Vec<Sample> {
        let p = &self.params;
        let half = (self.cells / 2) as f64;
        let grid = self.cells as f64;
        let span_x = CLOUD_CHUNK.min(self.cells - chunk_x);
        let span_y = CLOUD_CHUNK.min(self.cells - chunk_y);
        let mut points = Vec::with_capacity(span_x * span_y);

        for x in 0..span_x {
            for y in 0..span_y {
                let gx = (chunk_x + x) as f64;
                let gy = (chunk_y + y) as f64;
                let c = C::new(
                    p.center_x + (gx - half) * self.step,
                    p.center_y + (gy - half) * self.step,
                );

                points.push(Sample {
                    x: gx / grid,
                    y: gy / grid,
                    iterations: escapes(c, p.max_iterations, p.escape_radius),
                });
            }
        }

        points
    }
}

impl ChunkSource for CloudSource {
    type Payload = Vec<Sample>;

    fn next_chunk(&mut self) -> Option<(Vec<Sample>, f64)> {
        let total = self.total_chunks();
        if self.next >= total {
            return None;
        }

        // columns of blocks: chunk_x outer, chunk_y inner
        let chunk_x = (self.next / self.chunks_per_axis) * CLOUD_CHUNK;
        let chunk_y = (self.next % self.chunks_per_axis) * CLOUD_CHUNK;
        let points = self.sample_block(chunk_x, chunk_y);
        self.next += 1;

        Some((points, self.next as f64 / total as f64))
    }
}

/// Streams the point cloud one 100×100 block at a time.
pub fn sample_region(params: SampleParams) -> Chunked<CloudSource> {
    Chunked::new(CloudSource::new(params))
}
