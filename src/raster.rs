use std::ops::Range;

use crate::color::color_for;
use crate::fractal::evaluate;
use crate::math::C;
use crate::params::{Bounds, RasterParams};
use crate::stream::{ChunkSource, Chunked};

pub const RASTER_BAND_ROWS: u32 = 50;

/// RGBA snapshot of a raster run.
///
/// Rows not yet computed are zero. `rows` names the band written just before
/// this snapshot; for the final frame it covers the whole image.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub rows: Range<u32>,
    pub buffer: Vec<u8>,
}

impl RasterFrame {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        [self.buffer[i], self.buffer[i + 1], self.buffer[i + 2], self.buffer[i + 3]]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

pub struct RasterSource {
    params: RasterParams,
    bounds: Bounds,
    width: u32,
    height: u32,
    next_row: u32,
    buffer: Vec<u8>,
}

impl RasterSource {
    pub fn new(params: RasterParams) -> Self {
        let width = params.width();
        let height = params.height();
        let bounds = params.bounds();
        if width == 0 {
            log::warn!("raster resolves to zero width ({}); nothing to render", params.resolution);
        }
        log::info!(
            "raster {}x{} over re [{}, {}] im [{}, {}], {} iterations, {} colors",
            width, height, bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max,
            params.max_iterations, params.color_scheme
        );

        RasterSource {
            buffer: vec![0; width as usize * height as usize * 4],
            params,
            bounds,
            width,
            height,
            next_row: 0,
        }
    }

    fn render_rows(&mut self, rows: Range<u32>) {
        let Bounds { x_min, x_max, y_min, y_max } = self.bounds;
        let (w, h) = (self.width as f64, self.height as f64);

        for y in rows {
            for x in 0..self.width {
                let cx = x_min + (x as f64 / w) * (x_max - x_min);
                let cy = y_min + (y as f64 / h) * (y_max - y_min);

                let escape = evaluate(C::new(cx, cy), self.params.max_iterations, self.params.escape_radius);
                let color = color_for(escape.smoothed, self.params.max_iterations, self.params.color_scheme);

                let i = (y as usize * self.width as usize + x as usize) * 4;
                self.buffer[i..i + 4].copy_from_slice(&color);
            }
        }
    }

    fn snapshot(&self, rows: Range<u32>) -> RasterFrame {
        RasterFrame { width: self.width, height: self.height, rows, buffer: self.buffer.clone() }
    }
}

impl ChunkSource for RasterSource {
    type Payload = RasterFrame;

    fn next_chunk(&mut self) -> Option<(RasterFrame, f64)> {
        // zero width still has rows but no pixels; treat it as empty
        if self.width == 0 || self.next_row >= self.height {
            return None;
        }

        let start = self.next_row;
        let end = (start + RASTER_BAND_ROWS).min(self.height);
        self.render_rows(start..end);
        self.next_row = end;

        Some((self.snapshot(start..end), end as f64 / self.height as f64))
    }

    fn finish(&mut self) -> Option<RasterFrame> {
        let buffer = std::mem::take(&mut self.buffer);
        Some(RasterFrame { width: self.width, height: self.height, rows: 0..self.height, buffer })
    }
}

/// Streams a Mandelbrot raster in bands of `RASTER_BAND_ROWS` rows.
pub fn render_region(params: RasterParams) -> Chunked<RasterSource> {
    Chunked::new(RasterSource::new(params))
}

/// Renders the whole raster in one pass, without chunking.
pub fn render_all(params: RasterParams) -> RasterFrame {
    let mut source = RasterSource::new(params);
    let height = source.height;
    if source.width > 0 {
        source.render_rows(0..height);
    }
    RasterFrame { width: source.width, height, rows: 0..height, buffer: source.buffer }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorScheme, INSIDE};
    use crate::params::{RasterResolution, ZoomRegion};
    use crate::stream::Message;

    fn small(width: u32) -> RasterParams {
        RasterParams {
            max_iterations: 40,
            resolution: RasterResolution::Custom,
            custom_resolution: Some(width),
            color_scheme: ColorScheme::Smooth,
            escape_radius: 2.0,
            zoom_region: None,
        }
    }

    #[test]
    fn bands_of_fifty_rows() {
        // 180 wide → 120 tall → bands 0..50, 50..100, 100..120
        let messages: Vec<_> = render_region(small(180)).collect();
        assert_eq!(messages.len(), 4);

        let rows: Vec<_> = messages[..3]
            .iter()
            .map(|m| m.payload().unwrap().rows.clone())
            .collect();
        assert_eq!(rows, vec![0..50, 50..100, 100..120]);
        assert_eq!(messages[0].progress(), 50.0 / 120.0);
        assert_eq!(messages[2].progress(), 1.0);

        for m in &messages {
            assert_eq!(m.payload().unwrap().buffer.len(), 180 * 120 * 4);
        }
    }

    #[test]
    fn unwritten_rows_stay_zero() {
        let mut stream = render_region(small(180));
        let first = stream.next().unwrap().into_payload().unwrap();
        let written = 50 * 180 * 4;
        assert!(first.buffer[..written].chunks(4).all(|px| px[3] == 255));
        assert!(first.buffer[written..].iter().all(|&b| b == 0));
    }

    #[test]
    fn complete_matches_unchunked_render() {
        let params = small(150);
        let last = render_region(params.clone()).last().unwrap();
        assert!(last.is_complete());
        assert_eq!(last.into_payload().unwrap(), render_all(params));
    }

    #[test]
    fn deterministic_across_runs() {
        let a = render_all(small(96));
        let b = render_all(small(96));
        assert_eq!(a.buffer, b.buffer);
    }

    #[test]
    fn zoom_into_the_cardioid_is_black() {
        let params = RasterParams {
            zoom_region: Some(ZoomRegion { center_x: -0.2, center_y: 0.0, width: 0.1, height: 0.1 }),
            ..small(30)
        };
        let frame = render_all(params);
        assert!(frame.buffer.chunks(4).all(|px| px == INSIDE));
    }

    #[test]
    fn empty_raster_only_completes() {
        let params = RasterParams { custom_resolution: None, ..small(0) };
        let messages: Vec<_> = render_region(params).collect();
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            Message::Complete { payload: Some(frame) } => assert!(frame.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }
}
