use std::path::PathBuf;

use thiserror::Error;

use crate::frame::TrackId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Zero reference measurement: {0}")]
    ZeroReference(&'static str),

    #[error("Invalid bounding box: {0:?}")]
    InvalidBoundingBox([f32; 4]),

    #[error("Duplicate track id {0} in one frame")]
    DuplicateTrackId(TrackId),

    #[error("Invalid court keypoints: expected 14 points (28 values), got {0} values")]
    InvalidKeypoints(usize),

    #[error("Player selection needs at least 2 candidates, found {found}")]
    NotEnoughPlayers { found: usize },

    #[error("Frame {frame} has {found} detections, expected at most one")]
    MultipleDetections { frame: usize, found: usize },

    #[error("Frame {frame} carries track id {found}, expected {expected}")]
    InconsistentTrackId {
        frame: usize,
        expected: TrackId,
        found: TrackId,
    },

    #[error("Frame count mismatch: expected {expected}, got {got}")]
    FrameCountMismatch { expected: usize, got: usize },

    #[error("No reference height for track {0}")]
    MissingReferenceHeight(TrackId),

    #[error("Empty detection sequence")]
    EmptySequence,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Detector error: {0}")]
    Detector(String),

    #[error("Cache error at {path:?}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
