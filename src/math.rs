#[derive(Clone, Copy, Debug, PartialEq)]
pub struct C {
    pub re: f64,
    pub im: f64,
}

impl C {
    pub fn new(re: f64, im: f64) -> Self {
        C { re, im }
    }

    pub fn from_polar(radius: f64, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        C::new(radius * c, radius * s)
    }

    pub fn abs_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn add(&self, other: C) -> C {
        C::new(self.re + other.re, self.im + other.im)
    }

    pub fn mul(&self, other: C) -> C {
        C::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re
        )
    }
}

/// One step of the logistic map, r·x·(1−x).
pub fn logistic(r: f64, x: f64) -> f64 {
    r * x * (1.0 - x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_matches_expanded_form() {
        let z = C::new(0.37, -1.21);
        let sq = z.mul(z);
        assert_eq!(sq.re, z.re * z.re - z.im * z.im);
        assert_eq!(sq.im, 2.0 * z.re * z.im);
    }

    #[test]
    fn logistic_fixed_point() {
        let r = 2.5;
        let x = (r - 1.0) / r;
        assert!((logistic(r, x) - x).abs() < 1e-15);
    }
}
