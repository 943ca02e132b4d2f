//! Canonical tennis court geometry.
//!
//! A court is described by 14 keypoints with fixed roles. Indices, as seen
//! from the top of the drawing:
//!
//! ```text
//!  0 --- 4 --------------- 6 --- 1     far baseline
//!  |     |                 |     |
//!  |     8 ------ 12 ----- 9     |     far service line
//!  |     |        |        |     |
//!  |    10 ------ 13 ---- 11     |     near service line
//!  |     |                 |     |
//!  2 --- 5 --------------- 7 --- 3     near baseline
//! ```

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::{measure_distance, ReferenceScale};

pub const KEYPOINT_COUNT: usize = 14;

/// Index pairs of the court line segments drawn between keypoints.
pub const COURT_LINES: [(usize, usize); 8] = [
    (0, 2),
    (4, 5),
    (6, 7),
    (1, 3),
    (0, 1),
    (8, 9),
    (10, 11),
    (2, 3),
];

/// Real-world court measurements, in meters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CourtMeasurements {
    pub single_line_width: f32,
    pub double_line_width: f32,
    pub half_court_line_height: f32,
    pub service_line_width: f32,
    pub double_alley_difference: f32,
    pub no_mans_land_height: f32,
    pub ball_diameter: f32,
}

impl Default for CourtMeasurements {
    fn default() -> Self {
        Self {
            single_line_width: 8.23,
            double_line_width: 10.97,
            half_court_line_height: 11.88,
            service_line_width: 6.4,
            double_alley_difference: 1.37,
            no_mans_land_height: 5.48,
            ball_diameter: 0.067,
        }
    }
}

impl CourtMeasurements {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("single_line_width", self.single_line_width),
            ("double_line_width", self.double_line_width),
            ("half_court_line_height", self.half_court_line_height),
            ("service_line_width", self.service_line_width),
            ("double_alley_difference", self.double_alley_difference),
            ("no_mans_land_height", self.no_mans_land_height),
            ("ball_diameter", self.ball_diameter),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "court measurement {} must be positive, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Scale that maps the doubles width onto `width_px` pixels.
    #[inline]
    pub fn scale_for_width(&self, width_px: f32) -> ReferenceScale {
        ReferenceScale::new(self.double_line_width, width_px)
    }
}

/// The 14 court landmarks of one frame or drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtKeypoints([na::Point2<f32>; KEYPOINT_COUNT]);

impl CourtKeypoints {
    #[inline]
    pub fn new(points: [na::Point2<f32>; KEYPOINT_COUNT]) -> Self {
        Self(points)
    }

    /// Builds keypoints from the flat `[x0, y0, x1, y1, ...]` layout regressors produce.
    pub fn from_flat(values: &[f32]) -> Result<Self> {
        if values.len() != KEYPOINT_COUNT * 2 {
            return Err(Error::InvalidKeypoints(values.len()));
        }

        let mut points = [na::Point2::origin(); KEYPOINT_COUNT];
        for (point, xy) in points.iter_mut().zip(values.chunks_exact(2)) {
            *point = na::Point2::new(xy[0], xy[1]);
        }

        Ok(Self(points))
    }

    /// Derives the canonical layout for a doubles court whose top-left corner
    /// sits at `anchor` and whose doubles width spans `width` pixels.
    ///
    /// One conversion factor, doubles width over `width`, scales every offset.
    pub fn derive(
        anchor: na::Point2<f32>,
        width: f32,
        court: &CourtMeasurements,
    ) -> Result<Self> {
        let scale = court.scale_for_width(width);
        let px = scale.pixels_per_meter()?;
        let m = |meters: f32| meters * px;

        let alley = m(court.double_alley_difference);
        let no_mans_land = m(court.no_mans_land_height);
        let single = m(court.single_line_width);

        let mut k = [na::Point2::origin(); KEYPOINT_COUNT];

        k[0] = anchor;
        k[1] = na::Point2::new(anchor.x + width, anchor.y);
        k[2] = na::Point2::new(anchor.x, anchor.y + m(court.half_court_line_height * 2.0));
        k[3] = na::Point2::new(k[0].x + width, k[2].y);

        k[4] = na::Point2::new(k[0].x + alley, k[0].y);
        k[5] = na::Point2::new(k[2].x + alley, k[2].y);
        k[6] = na::Point2::new(k[1].x - alley, k[1].y);
        k[7] = na::Point2::new(k[3].x - alley, k[3].y);

        k[8] = na::Point2::new(k[4].x, k[4].y + no_mans_land);
        k[9] = na::Point2::new(k[8].x + single, k[8].y);
        k[10] = na::Point2::new(k[5].x, k[5].y - no_mans_land);
        k[11] = na::Point2::new(k[10].x + single, k[10].y);

        k[12] = na::Point2::new((k[8].x + k[9].x) / 2.0, k[8].y);
        k[13] = na::Point2::new((k[10].x + k[11].x) / 2.0, k[10].y);

        Ok(Self(k))
    }

    #[inline]
    pub fn points(&self) -> &[na::Point2<f32>; KEYPOINT_COUNT] {
        &self.0
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&na::Point2<f32>> {
        self.0.get(idx)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &na::Point2<f32>> {
        self.0.iter()
    }

    pub fn to_flat(&self) -> [f32; KEYPOINT_COUNT * 2] {
        let mut flat = [0.0; KEYPOINT_COUNT * 2];
        for (xy, p) in flat.chunks_exact_mut(2).zip(self.0.iter()) {
            xy[0] = p.x;
            xy[1] = p.y;
        }
        flat
    }

    /// Index and distance of the keypoint closest to `p`. The first one wins on ties.
    pub fn nearest(&self, p: &na::Point2<f32>) -> (usize, f32) {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, kp)| (idx, measure_distance(kp, p)))
            .fold((0, f32::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
    }

    /// End points of every segment in [`COURT_LINES`].
    pub fn lines(&self) -> impl Iterator<Item = (na::Point2<f32>, na::Point2<f32>)> + '_ {
        COURT_LINES.iter().map(move |&(a, b)| (self.0[a], self.0[b]))
    }
}
