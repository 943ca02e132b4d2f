//! Unit conversion primitives and small geometric helpers.
//!
//! Every metric computation in the crate goes through [`pixels_to_meters`]
//! and [`meters_to_pixels`].

use nalgebra as na;
use num_traits::Float;

use crate::error::{Error, Result};

/// Converts a pixel distance to meters, given a reference object of
/// `ref_meters` real size measured as `ref_pixels` on screen.
#[inline]
pub fn pixels_to_meters<F: Float>(pixel_distance: F, ref_meters: F, ref_pixels: F) -> Result<F> {
    if ref_pixels.is_zero() || !ref_pixels.is_finite() {
        return Err(Error::ZeroReference("reference pixel size"));
    }

    Ok(pixel_distance * (ref_meters / ref_pixels))
}

/// Converts a metric distance to pixels, given a reference object of
/// `ref_meters` real size measured as `ref_pixels` on screen.
#[inline]
pub fn meters_to_pixels<F: Float>(meters_distance: F, ref_meters: F, ref_pixels: F) -> Result<F> {
    if ref_meters.is_zero() || !ref_meters.is_finite() {
        return Err(Error::ZeroReference("reference meter size"));
    }

    Ok(meters_distance * (ref_pixels / ref_meters))
}

/// A known physical quantity paired with its measured pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceScale {
    pub meters: f32,
    pub pixels: f32,
}

impl ReferenceScale {
    #[inline]
    pub fn new(meters: f32, pixels: f32) -> Self {
        Self { meters, pixels }
    }

    #[inline]
    pub fn to_meters(&self, pixels: f32) -> Result<f32> {
        pixels_to_meters(pixels, self.meters, self.pixels)
    }

    #[inline]
    pub fn to_pixels(&self, meters: f32) -> Result<f32> {
        meters_to_pixels(meters, self.meters, self.pixels)
    }

    /// Pixels per meter. Fails on a zero meter reference.
    #[inline]
    pub fn pixels_per_meter(&self) -> Result<f32> {
        self.to_pixels(1.0)
    }

    /// Maps a pixel-space vector measured at this scale into pixel space at `target` scale.
    pub fn rescale(&self, v: na::Vector2<f32>, target: &ReferenceScale) -> Result<na::Vector2<f32>> {
        Ok(na::Vector2::new(
            target.to_pixels(self.to_meters(v.x)?)?,
            target.to_pixels(self.to_meters(v.y)?)?,
        ))
    }
}

#[inline]
pub fn measure_distance(a: &na::Point2<f32>, b: &na::Point2<f32>) -> f32 {
    na::distance(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixels_to_meters() {
        assert_relative_eq!(pixels_to_meters(100.0f32, 1.88, 200.0).unwrap(), 0.94, epsilon = 1e-6);
        assert_relative_eq!(pixels_to_meters(0.0f64, 10.97, 210.0).unwrap(), 0.0);
    }

    #[test]
    fn test_meters_to_pixels() {
        assert_relative_eq!(meters_to_pixels(10.97f64, 10.97, 210.0).unwrap(), 210.0, epsilon = 1e-9);
        assert_relative_eq!(meters_to_pixels(1.37f32, 10.97, 210.0).unwrap(), 26.226_07, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_reference_fails() {
        assert!(matches!(
            pixels_to_meters(10.0f32, 1.0, 0.0),
            Err(Error::ZeroReference(_))
        ));
        assert!(matches!(
            meters_to_pixels(10.0f32, 0.0, 100.0),
            Err(Error::ZeroReference(_))
        ));
        assert!(meters_to_pixels(10.0f32, f32::NAN, 100.0).is_err());
    }

    #[test]
    fn test_round_trip() {
        for &(p, m, px) in &[(1.0f64, 1.0, 1.0), (123.4, 1.91, 87.0), (0.5, 10.97, 210.0)] {
            let meters = pixels_to_meters(p, m, px).unwrap();
            assert_relative_eq!(meters_to_pixels(meters, m, px).unwrap(), p, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rescale() {
        let src = ReferenceScale::new(2.0, 100.0);
        let dst = ReferenceScale::new(10.0, 200.0);
        let v = src.rescale(na::Vector2::new(50.0, -25.0), &dst).unwrap();

        // 50px -> 1m -> 20px
        assert_relative_eq!(v.x, 20.0, epsilon = 1e-5);
        assert_relative_eq!(v.y, -10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_measure_distance() {
        let d = measure_distance(&na::Point2::new(0.0, 0.0), &na::Point2::new(3.0, 4.0));
        assert_relative_eq!(d, 5.0);
    }
}
