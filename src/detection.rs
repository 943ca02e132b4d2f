use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltrb};
use crate::frame::TrackId;

/// Raw output of a detector or tracker for one object in one frame.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BBox<Ltrb>,
    #[serde(rename = "p")]
    pub confidence: f32,
    #[serde(rename = "c")]
    pub class: String,
    /// Present only when a tracker assigned a persistent identity.
    pub track_id: Option<TrackId>,
}

impl Detection {
    pub fn new(bbox: BBox<Ltrb>, confidence: f32, class: impl Into<String>) -> Self {
        Self {
            bbox,
            confidence,
            class: class.into(),
            track_id: None,
        }
    }

    #[inline]
    pub fn with_track_id(mut self, track_id: TrackId) -> Self {
        self.track_id = Some(track_id);
        self
    }

    #[inline]
    pub fn is_class(&self, name: &str) -> bool {
        self.class == name
    }
}
