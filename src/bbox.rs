use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::error::{Error, Result};

pub trait BBoxFormat: std::fmt::Debug + Copy + PartialEq {}

/// Left-top-right-bottom format, contains left top and right bottom corners
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Ltrb;
impl BBoxFormat for Ltrb {}

/// Serialized as its four raw values.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(transparent, bound = "")]
pub struct BBox<F: BBoxFormat>([f32; 4], #[serde(skip)] PhantomData<F>);

impl<F: BBoxFormat> BBox<F> {
    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.0
    }
}

impl BBox<Ltrb> {
    #[inline]
    pub fn ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        BBox([left, top, right, bottom], Default::default())
    }

    /// Checked constructor: all values finite, `left <= right` and `top <= bottom`.
    pub fn try_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Result<Self> {
        let values = [left, top, right, bottom];

        if values.iter().any(|v| !v.is_finite()) || left > right || top > bottom {
            return Err(Error::InvalidBoundingBox(values));
        }

        Ok(Self::ltrb(left, top, right, bottom))
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.0[3]
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.0[2] - self.0[0]
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.0[3] - self.0[1]
    }

    #[inline]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new((self.0[0] + self.0[2]) / 2.0, (self.0[1] + self.0[3]) / 2.0)
    }

    /// Bottom-center point, where the object touches the ground plane.
    #[inline]
    pub fn foot(&self) -> na::Point2<f32> {
        na::Point2::new((self.0[0] + self.0[2]) / 2.0, self.0[3])
    }

    /// Box of the given size standing on `foot`.
    pub fn from_foot(foot: na::Point2<f32>, width: f32, height: f32) -> Self {
        let half = width / 2.0;

        Self::ltrb(foot.x - half, foot.y - height, foot.x + half, foot.y)
    }
}
