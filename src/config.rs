//! Analysis configuration.
//!
//! Built once at startup and shared by reference. Every section falls back
//! to its defaults, so an empty JSON object is a valid configuration.

use serde_derive::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::court::CourtMeasurements;
use crate::error::{Error, Result};
use crate::frame::TrackId;
use crate::mini_court::MiniCourtConfig;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Detector class name that marks a person.
    pub class_name: String,
    /// Real heights of the two chosen players, in selection order.
    pub heights_m: [f32; 2],
    /// Frame on which the players are chosen.
    pub reference_frame: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            class_name: "person".to_string(),
            heights_m: [1.88, 1.91],
            reference_frame: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub confidence_threshold: f32,
    pub track_id: TrackId,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.15,
            track_id: 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub player_path: Option<PathBuf>,
    pub ball_path: Option<PathBuf>,
    /// Load detections from the paths instead of running the detectors.
    pub read: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub court: CourtMeasurements,
    pub mini_court: MiniCourtConfig,
    pub players: PlayerConfig,
    pub ball: BallConfig,
    pub cache: CacheConfig,
}

impl AnalysisConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.court.validate()?;
        self.mini_court.validate()?;

        if self
            .players
            .heights_m
            .iter()
            .any(|h| !h.is_finite() || *h <= 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "player heights must be positive, got {:?}",
                self.players.heights_m
            )));
        }

        if !(0.0..=1.0).contains(&self.ball.confidence_threshold) {
            return Err(Error::InvalidConfig(format!(
                "ball confidence threshold {} outside [0, 1]",
                self.ball.confidence_threshold
            )));
        }

        if self.cache.read && self.cache.player_path.is_none() && self.cache.ball_path.is_none() {
            return Err(Error::InvalidConfig(
                "cache read requested without any cache path".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = AnalysisConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.court.double_line_width, 10.97);
        assert_eq!(config.mini_court.width, 250.0);
        assert_eq!(config.players.heights_m, [1.88, 1.91]);
        assert_eq!(config.ball.track_id, 1);
    }

    #[test]
    fn test_partial_override() {
        let config = AnalysisConfig::from_json_str(
            r#"{
                "mini_court": { "padding": 10 },
                "players": { "heights_m": [1.8, 1.7] },
                "cache": { "ball_path": "stubs/ball.json", "read": true }
            }"#,
        )
        .unwrap();

        assert_eq!(config.mini_court.padding, 10.0);
        assert_eq!(config.mini_court.height, 450.0);
        assert_eq!(config.players.heights_m, [1.8, 1.7]);
        assert_eq!(config.players.class_name, "person");
        assert_eq!(config.cache.ball_path, Some(PathBuf::from("stubs/ball.json")));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AnalysisConfig::from_json_str(r#"{ "court": { "double_line_width": 0 } }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json_str(r#"{ "players": { "heights_m": [1.8, -1] } }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json_str(r#"{ "mini_court": { "width": 30 } }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json_str(r#"{ "cache": { "read": true } }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json_str("not json"),
            Err(Error::Json(_))
        ));
    }
}
