//! Court geometry and mini-court projection for broadcast tennis video.
//!
//! Detection models, video decoding and drawing stay outside the crate and
//! plug in through the traits in [`detector`] and [`render`].

pub mod bbox;
pub mod cache;
pub mod config;
pub mod court;
pub mod detection;
pub mod detector;
pub mod error;
pub mod frame;
pub mod interpolation;
pub mod math;
pub mod mini_court;
pub mod pipeline;
pub mod render;
pub mod selection;

pub use bbox::{BBox, Ltrb};
pub use config::AnalysisConfig;
pub use court::{CourtKeypoints, CourtMeasurements, COURT_LINES};
pub use detection::Detection;
pub use error::{Error, Result};
pub use frame::{DetectionSequence, FrameDetections, FrameDims, TrackId};
pub use mini_court::MiniCourt;
pub use pipeline::{Analysis, Analyzer};
