//! Top-down mini-court overlay and the projection of detections into it.

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::bbox::{BBox, Ltrb};
use crate::court::{CourtKeypoints, CourtMeasurements};
use crate::error::{Error, Result};
use crate::frame::{DetectionSequence, FrameDetections, TrackId};
use crate::math::{self, ReferenceScale};

/// Size and placement of the overlay canvas, in output frame pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MiniCourtConfig {
    pub width: f32,
    pub height: f32,
    /// Gap between the canvas and the top/right edges of the frame.
    pub buffer: f32,
    /// Gap between the canvas border and the court drawing.
    pub padding: f32,
}

impl Default for MiniCourtConfig {
    fn default() -> Self {
        Self {
            width: 250.0,
            height: 450.0,
            buffer: 50.0,
            padding: 20.0,
        }
    }
}

impl MiniCourtConfig {
    pub fn validate(&self) -> Result<()> {
        let sizes = [self.width, self.height, self.buffer, self.padding];
        if sizes.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(Error::InvalidConfig(format!(
                "mini-court sizes must be non-negative, got {:?}",
                self
            )));
        }

        if self.width <= self.padding * 2.0 || self.height <= self.padding * 2.0 {
            return Err(Error::InvalidConfig(format!(
                "mini-court {}x{} leaves no room inside padding {}",
                self.width, self.height, self.padding
            )));
        }

        Ok(())
    }
}

/// Axis-aligned rectangle given by its start (top-left) and end (bottom-right) corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub start: na::Point2<f32>,
    pub end: na::Point2<f32>,
}

impl Rect {
    #[inline]
    pub fn new(start: na::Point2<f32>, end: na::Point2<f32>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.end.x - self.start.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.end.y - self.start.y
    }

    /// Same rectangle shrunk by `padding` on every side.
    #[inline]
    pub fn inset(&self, padding: f32) -> Self {
        let pad = na::Vector2::new(padding, padding);
        Self::new(self.start + pad, self.end - pad)
    }
}

/// Everything a renderer needs to draw the mini-court.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniCourtOverlay {
    pub canvas: Rect,
    pub court: Rect,
    pub keypoints: CourtKeypoints,
    pub lines: Vec<(na::Point2<f32>, na::Point2<f32>)>,
}

/// Mini-court projector. Its geometry is fixed at construction.
#[derive(Debug, Clone)]
pub struct MiniCourt {
    canvas: Rect,
    court: Rect,
    keypoints: CourtKeypoints,
    measurements: CourtMeasurements,
}

impl MiniCourt {
    /// Places the mini-court in the top-right corner of a `frame_dims` (width, height) frame.
    pub fn new(
        frame_dims: (u32, u32),
        config: &MiniCourtConfig,
        measurements: &CourtMeasurements,
    ) -> Result<Self> {
        config.validate()?;
        measurements.validate()?;

        let fw = frame_dims.0 as f32;

        let end = na::Point2::new(fw - config.buffer, config.buffer + config.height);
        let start = na::Point2::new(end.x - config.width, end.y - config.height);

        if start.x < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "mini-court {}px wide with buffer {} does not fit a {}px wide frame",
                config.width, config.buffer, frame_dims.0
            )));
        }

        let canvas = Rect::new(start, end);
        let court = canvas.inset(config.padding);
        let keypoints = CourtKeypoints::derive(court.start, court.width(), measurements)?;

        debug!(
            "mini-court canvas {:?}..{:?}, court width {}px",
            canvas.start,
            canvas.end,
            court.width()
        );

        Ok(Self {
            canvas,
            court,
            keypoints,
            measurements: *measurements,
        })
    }

    #[inline]
    pub fn canvas(&self) -> &Rect {
        &self.canvas
    }

    #[inline]
    pub fn court(&self) -> &Rect {
        &self.court
    }

    #[inline]
    pub fn keypoints(&self) -> &CourtKeypoints {
        &self.keypoints
    }

    #[inline]
    pub fn court_drawing_width(&self) -> f32 {
        self.court.width()
    }

    /// Reference scale of the drawing: the doubles width against the court drawing width.
    #[inline]
    pub fn scale(&self) -> ReferenceScale {
        self.measurements.scale_for_width(self.court_drawing_width())
    }

    pub fn meters_to_pixels(&self, meters: f32) -> Result<f32> {
        math::meters_to_pixels(
            meters,
            self.measurements.double_line_width,
            self.court_drawing_width(),
        )
    }

    /// Mini-court position of the foot point of `bbox`.
    ///
    /// The foot is anchored to the closest keypoint of `frame_keypoints` and the
    /// offset from it is carried over in meters, using `height_m` against
    /// the bbox pixel height as the local scale.
    pub fn project_position(
        &self,
        bbox: &BBox<Ltrb>,
        frame_keypoints: &CourtKeypoints,
        height_m: f32,
    ) -> Result<na::Point2<f32>> {
        let foot = bbox.foot();
        let (idx, _) = frame_keypoints.nearest(&foot);
        let offset = foot - frame_keypoints.points()[idx];

        let local = ReferenceScale::new(height_m, bbox.height());
        let offset = local.rescale(offset, &self.scale())?;

        Ok(self.keypoints.points()[idx] + offset)
    }

    /// Maps a source frame detection into mini-court pixel space.
    ///
    /// The resulting box stands on the projected foot point and keeps the
    /// object's real-world proportions at mini-court scale.
    pub fn project_bbox(
        &self,
        bbox: &BBox<Ltrb>,
        frame_keypoints: &CourtKeypoints,
        height_m: f32,
    ) -> Result<BBox<Ltrb>> {
        let foot = self.project_position(bbox, frame_keypoints, height_m)?;

        let local = ReferenceScale::new(height_m, bbox.height());
        let width = self.meters_to_pixels(local.to_meters(bbox.width())?)?;
        let height = self.meters_to_pixels(height_m)?;

        Ok(BBox::from_foot(foot, width, height))
    }

    /// Projects every object of every frame.
    ///
    /// `keypoints` holds either one set per frame or a single set shared by all frames.
    /// An object with a zero-sized reference (e.g. a flat bbox) is left out of its frame.
    pub fn project_sequence(
        &self,
        detections: &[FrameDetections],
        keypoints: &[CourtKeypoints],
        heights: &HashMap<TrackId, f32>,
    ) -> Result<DetectionSequence> {
        if keypoints.len() != 1 && keypoints.len() != detections.len() {
            return Err(Error::FrameCountMismatch {
                expected: detections.len(),
                got: keypoints.len(),
            });
        }

        let mut projected = DetectionSequence::with_capacity(detections.len());

        for (idx, frame) in detections.iter().enumerate() {
            let frame_keypoints = keypoints.get(idx).unwrap_or(&keypoints[0]);
            let mut mini = FrameDetections::new();

            for (track_id, bbox) in frame.iter() {
                let height = heights
                    .get(&track_id)
                    .copied()
                    .ok_or(Error::MissingReferenceHeight(track_id))?;

                match self.project_bbox(bbox, frame_keypoints, height) {
                    Ok(mini_bbox) => {
                        mini.insert(track_id, mini_bbox);
                    }
                    Err(Error::ZeroReference(what)) => {
                        warn!(
                            "frame {}: track {} not projected, zero {}",
                            idx, track_id, what
                        );
                    }
                    Err(err) => return Err(err),
                }
            }

            projected.push(mini);
        }

        Ok(projected)
    }

    pub fn overlay(&self) -> MiniCourtOverlay {
        MiniCourtOverlay {
            canvas: self.canvas,
            court: self.court,
            keypoints: self.keypoints,
            lines: self.keypoints.lines().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mini_court() -> MiniCourt {
        MiniCourt::new(
            (1280, 720),
            &MiniCourtConfig::default(),
            &CourtMeasurements::default(),
        )
        .unwrap()
    }

    /// Keypoints of the source frame: the mini-court layout scaled by 4.
    fn source_keypoints() -> CourtKeypoints {
        CourtKeypoints::derive(na::Point2::new(100.0, 50.0), 840.0, &CourtMeasurements::default())
            .unwrap()
    }

    #[test]
    fn test_region_layout() {
        let mc = mini_court();

        assert_eq!(mc.canvas().start, na::Point2::new(980.0, 50.0));
        assert_eq!(mc.canvas().end, na::Point2::new(1230.0, 500.0));
        assert_eq!(mc.court().start, na::Point2::new(1000.0, 70.0));
        assert_eq!(mc.court().end, na::Point2::new(1210.0, 480.0));
        assert_relative_eq!(mc.court_drawing_width(), 210.0);
        assert_eq!(mc.keypoints().points()[0], mc.court().start);
    }

    #[test]
    fn test_frame_too_small() {
        let res = MiniCourt::new(
            (200, 720),
            &MiniCourtConfig::default(),
            &CourtMeasurements::default(),
        );
        assert!(matches!(res, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_short_frame_keeps_top_right_placement() {
        let mc = MiniCourt::new(
            (854, 480),
            &MiniCourtConfig::default(),
            &CourtMeasurements::default(),
        )
        .unwrap();

        assert_eq!(mc.canvas().start, na::Point2::new(554.0, 50.0));
        assert_eq!(mc.canvas().end, na::Point2::new(804.0, 500.0));
        assert_relative_eq!(mc.court_drawing_width(), 210.0);
    }

    #[test]
    fn test_meters_to_pixels() {
        let mc = mini_court();

        assert_relative_eq!(mc.meters_to_pixels(10.97).unwrap(), 210.0, epsilon = 1e-4);
        assert_relative_eq!(mc.meters_to_pixels(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_foot_on_keypoint_lands_on_mini_keypoint() {
        let mc = mini_court();
        let kp = source_keypoints().points()[9];
        let bbox = BBox::ltrb(kp.x - 20.0, kp.y - 100.0, kp.x + 20.0, kp.y);

        let pos = mc.project_position(&bbox, &source_keypoints(), 1.88).unwrap();

        assert_relative_eq!(pos.x, mc.keypoints().points()[9].x, epsilon = 1e-3);
        assert_relative_eq!(pos.y, mc.keypoints().points()[9].y, epsilon = 1e-3);
    }

    #[test]
    fn test_offset_scaled_by_player_height() {
        let mc = mini_court();
        let kp = source_keypoints().points()[0];

        // player 188px tall standing 47px right of keypoint 0, i.e. 0.47m
        let bbox = BBox::ltrb(kp.x + 37.0, kp.y - 188.0, kp.x + 57.0, kp.y);
        let pos = mc.project_position(&bbox, &source_keypoints(), 1.88).unwrap();

        let expected = mc.meters_to_pixels(0.47).unwrap();
        let anchor = mc.keypoints().points()[0];

        assert_relative_eq!(pos.x - anchor.x, expected, epsilon = 1e-3);
        assert_relative_eq!(pos.y, anchor.y, epsilon = 1e-3);
        assert!((pos.x - anchor.x - 47.0).abs() > 1.0);
    }

    #[test]
    fn test_project_bbox_shape() {
        let mc = mini_court();
        let kp = source_keypoints().points()[13];
        let bbox = BBox::ltrb(kp.x - 50.0, kp.y - 188.0, kp.x + 50.0, kp.y);

        let mini = mc.project_bbox(&bbox, &source_keypoints(), 1.88).unwrap();

        assert_relative_eq!(mini.height(), mc.meters_to_pixels(1.88).unwrap(), epsilon = 1e-3);
        assert_relative_eq!(mini.width(), mc.meters_to_pixels(1.0).unwrap(), epsilon = 1e-3);
        assert_relative_eq!(mini.foot().x, mc.keypoints().points()[13].x, epsilon = 1e-3);
    }

    #[test]
    fn test_project_zero_height_bbox_fails() {
        let mc = mini_court();
        let bbox = BBox::ltrb(10.0, 10.0, 20.0, 10.0);

        assert!(matches!(
            mc.project_bbox(&bbox, &source_keypoints(), 1.88),
            Err(Error::ZeroReference(_))
        ));
    }

    #[test]
    fn test_project_sequence() {
        let mc = mini_court();
        let kp = source_keypoints().points()[5];
        let bbox = BBox::ltrb(kp.x - 10.0, kp.y - 100.0, kp.x + 10.0, kp.y);

        let seq = vec![
            FrameDetections::single(4, bbox),
            FrameDetections::new(),
            FrameDetections::single(4, bbox),
        ];
        let heights: HashMap<TrackId, f32> = vec![(4, 1.91)].into_iter().collect();

        let projected = mc.project_sequence(&seq, &[source_keypoints()], &heights).unwrap();

        assert_eq!(projected.len(), 3);
        assert!(projected[1].is_empty());
        assert_eq!(projected[0], projected[2]);
        assert!(projected[0].contains(4));

        assert!(matches!(
            mc.project_sequence(&seq, &[source_keypoints(), source_keypoints()], &heights),
            Err(Error::FrameCountMismatch { .. })
        ));
        assert!(matches!(
            mc.project_sequence(&seq, &[source_keypoints()], &HashMap::new()),
            Err(Error::MissingReferenceHeight(4))
        ));
    }

    #[test]
    fn test_project_sequence_skips_flat_bbox() {
        let mc = mini_court();
        let kp = source_keypoints().points()[5];
        let standing = BBox::ltrb(kp.x - 10.0, kp.y - 100.0, kp.x + 10.0, kp.y);
        let flat = BBox::ltrb(kp.x - 10.0, kp.y, kp.x + 10.0, kp.y);

        let seq = vec![
            FrameDetections::single(4, standing),
            vec![(4, flat), (5, standing)].into_iter().collect(),
            FrameDetections::single(4, standing),
        ];
        let heights: HashMap<TrackId, f32> = vec![(4, 1.91), (5, 1.88)].into_iter().collect();

        let projected = mc.project_sequence(&seq, &[source_keypoints()], &heights).unwrap();

        assert_eq!(projected.len(), 3);
        assert!(projected[0].contains(4));
        assert!(!projected[1].contains(4));
        assert!(projected[1].contains(5));
        assert!(projected[2].contains(4));
    }

    #[test]
    fn test_overlay() {
        let overlay = mini_court().overlay();

        assert_eq!(overlay.lines.len(), 8);
        assert_eq!(overlay.lines[0].0, overlay.keypoints.points()[0]);
        assert_eq!(overlay.lines[0].1, overlay.keypoints.points()[2]);
    }
}
