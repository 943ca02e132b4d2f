use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltrb};
use crate::error::Error;

/// Stable identifier assigned by the external tracker.
pub type TrackId = u32;

/// Per-frame detections in temporal order, one entry per video frame.
pub type DetectionSequence = Vec<FrameDetections>;

/// Anything that knows its pixel size, typically a decoded video frame.
pub trait FrameDims {
    /// (width, height) in pixels.
    fn dims(&self) -> (u32, u32);
}

/// Track id to bbox mapping for a single frame.
///
/// Keys are unique. Iteration follows insertion order, which is what
/// makes tie-breaking in player selection deterministic.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(into = "Vec<(TrackId, BBox<Ltrb>)>", try_from = "Vec<(TrackId, BBox<Ltrb>)>")]
pub struct FrameDetections {
    entries: Vec<(TrackId, BBox<Ltrb>)>,
}

impl FrameDetections {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame holding a single object.
    pub fn single(track_id: TrackId, bbox: BBox<Ltrb>) -> Self {
        Self {
            entries: vec![(track_id, bbox)],
        }
    }

    /// Inserts or replaces the bbox of `track_id`. A replaced entry keeps its position.
    pub fn insert(&mut self, track_id: TrackId, bbox: BBox<Ltrb>) -> Option<BBox<Ltrb>> {
        match self.entries.iter_mut().find(|(id, _)| *id == track_id) {
            Some((_, old)) => Some(std::mem::replace(old, bbox)),
            None => {
                self.entries.push((track_id, bbox));
                None
            }
        }
    }

    #[inline]
    pub fn get(&self, track_id: TrackId) -> Option<&BBox<Ltrb>> {
        self.entries
            .iter()
            .find(|(id, _)| *id == track_id)
            .map(|(_, bbox)| bbox)
    }

    #[inline]
    pub fn contains(&self, track_id: TrackId) -> bool {
        self.get(track_id).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &BBox<Ltrb>)> {
        self.entries.iter().map(|(id, bbox)| (*id, bbox))
    }

    #[inline]
    pub fn track_ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Copy of this frame keeping only entries for which `keep` returns true.
    pub fn filtered<P: FnMut(TrackId) -> bool>(&self, mut keep: P) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(id, _)| keep(*id))
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<(TrackId, BBox<Ltrb>)> for FrameDetections {
    fn from_iter<I: IntoIterator<Item = (TrackId, BBox<Ltrb>)>>(iter: I) -> Self {
        let mut frame = FrameDetections::new();
        for (id, bbox) in iter {
            frame.insert(id, bbox);
        }
        frame
    }
}

impl IntoIterator for FrameDetections {
    type Item = (TrackId, BBox<Ltrb>);
    type IntoIter = std::vec::IntoIter<(TrackId, BBox<Ltrb>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<FrameDetections> for Vec<(TrackId, BBox<Ltrb>)> {
    fn from(frame: FrameDetections) -> Self {
        frame.entries
    }
}

impl TryFrom<Vec<(TrackId, BBox<Ltrb>)>> for FrameDetections {
    type Error = Error;

    fn try_from(entries: Vec<(TrackId, BBox<Ltrb>)>) -> Result<Self, Self::Error> {
        for (idx, (id, bbox)) in entries.iter().enumerate() {
            if entries[..idx].iter().any(|(other, _)| other == id) {
                return Err(Error::DuplicateTrackId(*id));
            }

            let [l, t, r, b] = *bbox.as_slice();
            BBox::try_ltrb(l, t, r, b)?;
        }

        Ok(Self { entries })
    }
}
