use ndarray::{Array2, ArrayView1, ArrayViewMut1};
use tracing::debug;

use crate::bbox::BBox;
use crate::error::{Error, Result};
use crate::frame::{DetectionSequence, FrameDetections, TrackId};

/// Fills every missing frame of a single-track sequence.
///
/// Interior gaps are interpolated linearly, leading and trailing gaps copy
/// the nearest detection. A sequence without any detection stays empty.
pub fn interpolate_positions(detections: &[FrameDetections]) -> Result<DetectionSequence> {
    let track_id = match single_track_id(detections)? {
        Some(id) => id,
        None => {
            debug!("no detections in {} frames, nothing to interpolate", detections.len());
            return Ok(detections.to_vec());
        }
    };

    let mut table = Array2::from_elem((detections.len(), 4), f32::NAN);
    for (mut row, frame) in table.rows_mut().into_iter().zip(detections) {
        if let Some(bbox) = frame.get(track_id) {
            row.assign(&ArrayView1::from(&bbox.as_slice()[..]));
        }
    }

    for column in table.columns_mut() {
        fill_column(column);
    }

    let missing = detections.iter().filter(|f| f.is_empty()).count();
    debug!(
        "filled {} of {} frames for track {}",
        missing,
        detections.len(),
        track_id
    );

    Ok(table
        .rows()
        .into_iter()
        .map(|row| {
            FrameDetections::single(track_id, BBox::ltrb(row[0], row[1], row[2], row[3]))
        })
        .collect())
}

/// The id shared by all non-empty frames, if any frame has a detection.
fn single_track_id(detections: &[FrameDetections]) -> Result<Option<TrackId>> {
    let mut found: Option<TrackId> = None;

    for (frame, dets) in detections.iter().enumerate() {
        if dets.len() > 1 {
            return Err(Error::MultipleDetections {
                frame,
                found: dets.len(),
            });
        }

        for id in dets.track_ids() {
            match found {
                Some(expected) if expected != id => {
                    return Err(Error::InconsistentTrackId {
                        frame,
                        expected,
                        found: id,
                    })
                }
                _ => found = Some(id),
            }
        }
    }

    Ok(found)
}

/// Replaces NaN cells of `column` in place. Known cells are never touched.
fn fill_column(mut column: ArrayViewMut1<'_, f32>) {
    let known: Vec<usize> = (0..column.len())
        .filter(|&idx| !column[idx].is_nan())
        .collect();

    let (first, last) = match (known.first(), known.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return,
    };

    for idx in 0..first {
        column[idx] = column[first];
    }

    for pair in known.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (va, vb) = (column[a], column[b]);
        let span = (b - a) as f32;

        for idx in a + 1..b {
            column[idx] = va + (vb - va) * (idx - a) as f32 / span;
        }
    }

    for idx in last + 1..column.len() {
        column[idx] = column[last];
    }
}
