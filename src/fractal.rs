use crate::math::C;
use std::f64::consts::LN_2;

/// Escape-time result for a single point of the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Escape {
    pub iterations: u32,
    /// Continuous escape time; equals `iterations` for points that never escaped.
    pub smoothed: f64,
}

impl Escape {
    pub fn escaped(&self, max_iter: u32) -> bool {
        self.iterations < max_iter
    }
}

/// Iterates z ← z² + c from z = 0 until |z| leaves `escape_radius` or
/// `max_iter` steps have run.
///
/// Total over all inputs: a non-positive radius escapes at iteration 0 and
/// its smoothed value is NaN, which the color mapper renders as black.
pub fn evaluate(c: C, max_iter: u32, escape_radius: f64) -> Escape {
    let max_radius = escape_radius * escape_radius;
    let mut z = C::new(0.0, 0.0);
    let mut iter = 0;

    while z.abs_sq() <= max_radius && iter < max_iter {
        z = z.mul(z).add(c);
        iter += 1;
    }

    if iter < max_iter {
        let log_zn = z.abs_sq().ln() / 2.0;
        let nu = (log_zn / LN_2).ln() / LN_2;
        return Escape { iterations: iter, smoothed: iter as f64 + 1.0 - nu };
    }

    Escape { iterations: iter, smoothed: iter as f64 }
}

pub fn escapes(c: C, max_iter: u32, escape_radius: f64) -> u32 {
    evaluate(c, max_iter, escape_radius).iterations
}
