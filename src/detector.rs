//! Detector and tracker collaborators, and the per-frame detection loop.
//!
//! The neural models live outside this crate. They are reached through the
//! narrow traits below, generic over the caller's frame type `I`.

use rayon::prelude::*;
use tracing::warn;

use crate::bbox::{BBox, Ltrb};
use crate::config::{BallConfig, PlayerConfig};
use crate::court::CourtKeypoints;
use crate::detection::Detection;
use crate::error::{Error, Result};
use crate::frame::{DetectionSequence, FrameDetections};

/// Detector with persistent track identities across calls.
pub trait ObjectTracker<I> {
    fn track(&mut self, frame: &I) -> Result<Vec<Detection>>;
}

/// Stateless single-frame detector.
pub trait ObjectDetector<I> {
    fn detect(&self, frame: &I) -> Result<Vec<Detection>>;
}

/// Court keypoint regressor. Points come back in the fixed court order.
pub trait KeypointRegressor<I> {
    fn predict(&mut self, frame: &I) -> Result<CourtKeypoints>;
}

pub trait FrameDetector<I> {
    fn detect_frame(&mut self, frame: &I) -> Result<FrameDetections>;
}

/// Keeps the tracked people of a frame.
pub struct PlayerTracker<T> {
    tracker: T,
    config: PlayerConfig,
}

impl<T> PlayerTracker<T> {
    pub fn new(tracker: T, config: PlayerConfig) -> Self {
        Self { tracker, config }
    }
}

impl<I, T: ObjectTracker<I>> FrameDetector<I> for PlayerTracker<T> {
    fn detect_frame(&mut self, frame: &I) -> Result<FrameDetections> {
        let mut players = FrameDetections::new();

        for det in self.tracker.track(frame)? {
            if !det.is_class(&self.config.class_name) {
                continue;
            }

            if let Some(track_id) = det.track_id {
                players.insert(track_id, checked(&det)?);
            }
        }

        Ok(players)
    }
}

/// Reduces a frame to at most one ball under a fixed synthetic id.
#[derive(Clone)]
pub struct BallTracker<D> {
    detector: D,
    config: BallConfig,
}

impl<D> BallTracker<D> {
    pub fn new(detector: D, config: BallConfig) -> Self {
        Self { detector, config }
    }
}

impl<I, D: ObjectDetector<I>> FrameDetector<I> for BallTracker<D> {
    fn detect_frame(&mut self, frame: &I) -> Result<FrameDetections> {
        let mut ball = FrameDetections::new();

        // the last confident box wins
        for det in self.detector.detect(frame)? {
            if det.confidence >= self.config.confidence_threshold {
                ball.insert(self.config.track_id, checked(&det)?);
            }
        }

        Ok(ball)
    }
}

fn checked(det: &Detection) -> Result<BBox<Ltrb>> {
    let [l, t, r, b] = *det.bbox.as_slice();
    BBox::try_ltrb(l, t, r, b)
}

/// Runs `detector` over all frames in order. A failing frame yields no detections.
pub fn detect_frames<I, D: FrameDetector<I>>(detector: &mut D, frames: &[I]) -> DetectionSequence {
    frames
        .iter()
        .enumerate()
        .map(|(idx, frame)| detector.detect_frame(frame).unwrap_or_else(|err| skip(idx, err)))
        .collect()
}

/// Same as [`detect_frames`] on the rayon pool, one detector clone per worker.
///
/// Only for detectors without cross-frame state. Output is in frame order.
pub fn detect_frames_parallel<I, D>(detector: &D, frames: &[I]) -> DetectionSequence
where
    I: Sync,
    D: FrameDetector<I> + Clone + Send + Sync,
{
    frames
        .par_iter()
        .enumerate()
        .map_init(
            || detector.clone(),
            |detector, (idx, frame)| {
                detector
                    .detect_frame(frame)
                    .unwrap_or_else(|err| skip(idx, err))
            },
        )
        .collect()
}

fn skip(idx: usize, err: Error) -> FrameDetections {
    warn!("detection failed on frame {}: {}", idx, err);
    FrameDetections::new()
}
