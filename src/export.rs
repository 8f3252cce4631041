// Output helpers for the driver binary: images, binary sample dumps and JSON lines.

use std::fs;
use std::io::Write;
use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::cloud::Sample;
use crate::color::{ColorScheme, attractor_color, legend};
use crate::error::{EngineError, EngineResult};
use crate::raster::RasterFrame;

pub fn frame_image(frame: &RasterFrame) -> EngineResult<RgbaImage> {
    if frame.is_empty() {
        return Err(EngineError::EmptyRaster { width: frame.width, height: frame.height });
    }
    let expected = frame.width as usize * frame.height as usize * 4;
    RgbaImage::from_raw(frame.width, frame.height, frame.buffer.clone())
        .ok_or(EngineError::BufferSize { expected, actual: frame.buffer.len() })
}

/// Scatter plot of attractor samples: r across, x up, tinted by r.
pub fn bifurcation_image(samples: &[Sample], width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    if samples.is_empty() || width == 0 || height == 0 {
        return img;
    }

    let (r_min, r_max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s.x), hi.max(s.x)));
    let span = (r_max - r_min).max(f64::EPSILON);

    for s in samples {
        if !(0.0..=1.0).contains(&s.y) {
            continue;
        }
        let px = (((s.x - r_min) / span) * (width - 1) as f64).round() as u32;
        let py = ((1.0 - s.y) * (height - 1) as f64).round() as u32;
        img.put_pixel(px.min(width - 1), py.min(height - 1), Rgba(attractor_color(s.x)));
    }

    img
}

/// Horizontal strip of the palette from 0 iterations (left) to inside the set (right).
pub fn legend_image(max_iter: u32, scheme: ColorScheme, width: u32, height: u32) -> RgbaImage {
    let stops = legend(max_iter, scheme, width as usize);
    RgbaImage::from_fn(width, height, |x, _| Rgba(stops[x as usize]))
}

pub fn save_image<P: AsRef<Path>>(img: &RgbaImage, path: P) -> EngineResult<()> {
    img.save(path.as_ref())?;
    log::info!("wrote {}x{} image to {}", img.width(), img.height(), path.as_ref().display());
    Ok(())
}

pub fn save_samples<P: AsRef<Path>>(samples: &[Sample], path: P) -> EngineResult<()> {
    let cfg = bincode::config::standard();
    let encoded = bincode::encode_to_vec(samples, cfg)?;
    fs::write(path.as_ref(), encoded)?;
    log::info!("saved {} samples to {}", samples.len(), path.as_ref().display());
    Ok(())
}

pub fn load_samples<P: AsRef<Path>>(path: P) -> EngineResult<Vec<Sample>> {
    let data = fs::read(path)?;
    let cfg = bincode::config::standard();
    let (samples, _len): (Vec<Sample>, usize) = bincode::decode_from_slice(&data, cfg)?;
    Ok(samples)
}

pub fn write_json_lines<W: Write>(mut out: W, samples: &[Sample]) -> EngineResult<()> {
    for s in samples {
        serde_json::to_writer(&mut out, s)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::INSIDE;

    #[test]
    fn empty_frame_is_an_error() {
        let frame = RasterFrame { width: 0, height: 0, rows: 0..0, buffer: Vec::new() };
        assert!(matches!(frame_image(&frame), Err(EngineError::EmptyRaster { .. })));

        let short = RasterFrame { width: 2, height: 2, rows: 0..2, buffer: vec![0; 4] };
        assert!(matches!(frame_image(&short), Err(EngineError::BufferSize { expected: 16, actual: 4 })));
    }

    #[test]
    fn legend_strip_ends_black() {
        let img = legend_image(64, ColorScheme::Classic, 32, 4);
        assert_eq!(img.get_pixel(31, 3).0, INSIDE);
        assert_eq!(img.get_pixel(0, 0).0, crate::color::color_for(0.0, 64, ColorScheme::Classic));
    }

    #[test]
    fn bifurcation_plot_places_points() {
        let samples = [
            Sample { x: 2.0, y: 0.5, iterations: 1 },
            Sample { x: 3.0, y: 1.0, iterations: 2 },
            Sample { x: 2.5, y: f64::NAN, iterations: 1 },
        ];
        let img = bifurcation_image(&samples, 11, 11);
        assert_eq!(img.get_pixel(0, 5).0, attractor_color(2.0));
        assert_eq!(img.get_pixel(10, 0).0, attractor_color(3.0));
        assert_eq!(img.get_pixel(5, 5).0, [0, 0, 0, 255]);
    }

    #[test]
    fn json_lines() {
        let mut out = Vec::new();
        write_json_lines(&mut out, &[Sample { x: 0.25, y: 0.5, iterations: 7 }]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"x\":0.25,\"y\":0.5,\"iterations\":7}\n");
    }
}
