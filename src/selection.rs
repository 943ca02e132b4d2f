//! Picks the two players among everyone the tracker follows.

use tracing::info;

use crate::court::CourtKeypoints;
use crate::error::{Error, Result};
use crate::frame::{DetectionSequence, FrameDetections, TrackId};

/// The two tracks whose bbox centers are closest to any court keypoint,
/// closest first. Equal distances keep the frame's iteration order.
pub fn choose_players(keypoints: &CourtKeypoints, frame: &FrameDetections) -> Result<[TrackId; 2]> {
    if frame.len() < 2 {
        return Err(Error::NotEnoughPlayers { found: frame.len() });
    }

    let mut distances: Vec<(TrackId, f32)> = frame
        .iter()
        .map(|(track_id, bbox)| (track_id, keypoints.nearest(&bbox.center()).1))
        .collect();

    // stable sort
    distances.sort_by(|a, b| a.1.total_cmp(&b.1));

    Ok([distances[0].0, distances[1].0])
}

/// Chooses the players on `reference_frame` and drops every other track from all frames.
pub fn choose_and_filter_players(
    keypoints: &CourtKeypoints,
    detections: &[FrameDetections],
    reference_frame: usize,
) -> Result<(DetectionSequence, [TrackId; 2])> {
    if detections.is_empty() {
        return Err(Error::EmptySequence);
    }

    let frame = detections
        .get(reference_frame)
        .ok_or(Error::FrameCountMismatch {
            expected: reference_frame + 1,
            got: detections.len(),
        })?;

    let chosen = choose_players(keypoints, frame)?;
    info!("chosen players: {:?}", chosen);

    let filtered = detections
        .iter()
        .map(|frame| frame.filtered(|id| chosen.contains(&id)))
        .collect();

    Ok((filtered, chosen))
}
