//! End-to-end analysis of a fully decoded video.

use std::collections::HashMap;
use tracing::info;

use crate::cache::CachePolicy;
use crate::config::AnalysisConfig;
use crate::court::CourtKeypoints;
use crate::detector::{detect_frames, detect_frames_parallel, FrameDetector, KeypointRegressor};
use crate::error::{Error, Result};
use crate::frame::{DetectionSequence, FrameDims, TrackId};
use crate::interpolation::interpolate_positions;
use crate::mini_court::MiniCourt;
use crate::render::{ObjectKind, Renderer};
use crate::selection::choose_and_filter_players;

/// Result of analysing one video.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub court_keypoints: CourtKeypoints,
    pub chosen_players: [TrackId; 2],
    /// Detections of the two chosen players, in source frame pixels.
    pub players: DetectionSequence,
    /// Gap-filled ball detections, in source frame pixels.
    pub ball: DetectionSequence,
    pub mini_court: MiniCourt,
    pub mini_players: DetectionSequence,
    pub mini_ball: DetectionSequence,
}

impl Analysis {
    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Draws every result onto its frame.
    pub fn annotate<I, R: Renderer<I>>(&self, frames: &mut [I], renderer: &mut R) -> Result<()> {
        if frames.len() != self.len() {
            return Err(Error::FrameCountMismatch {
                expected: self.len(),
                got: frames.len(),
            });
        }

        let overlay = self.mini_court.overlay();

        for (idx, frame) in frames.iter_mut().enumerate() {
            renderer.draw_boxes(frame, &self.players[idx], ObjectKind::Player);
            renderer.draw_boxes(frame, &self.ball[idx], ObjectKind::Ball);
            renderer.draw_keypoints(frame, &self.court_keypoints);
            renderer.draw_mini_court(frame, &overlay);
            renderer.draw_mini_positions(frame, &self.mini_players[idx], ObjectKind::Player);
            renderer.draw_mini_positions(frame, &self.mini_ball[idx], ObjectKind::Ball);
            renderer.draw_frame_number(frame, idx);
        }

        Ok(())
    }
}

pub struct Analyzer<P, B, K> {
    config: AnalysisConfig,
    players: P,
    ball: B,
    regressor: K,
}

impl<P, B, K> Analyzer<P, B, K> {
    pub fn new(config: AnalysisConfig, players: P, ball: B, regressor: K) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            players,
            ball,
            regressor,
        })
    }

    #[inline]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze<I>(&mut self, frames: &[I]) -> Result<Analysis>
    where
        I: FrameDims,
        P: FrameDetector<I>,
        B: FrameDetector<I>,
        K: KeypointRegressor<I>,
    {
        self.run(frames, |ball, frames| detect_frames(ball, frames))
    }

    /// Like [`Analyzer::analyze`], with ball detection spread over the rayon pool.
    pub fn analyze_parallel<I>(&mut self, frames: &[I]) -> Result<Analysis>
    where
        I: FrameDims + Sync,
        P: FrameDetector<I>,
        B: FrameDetector<I> + Clone + Send + Sync,
        K: KeypointRegressor<I>,
    {
        self.run(frames, |ball, frames| detect_frames_parallel(&*ball, frames))
    }

    fn run<I, F>(&mut self, frames: &[I], detect_ball: F) -> Result<Analysis>
    where
        I: FrameDims,
        P: FrameDetector<I>,
        K: KeypointRegressor<I>,
        F: FnOnce(&mut B, &[I]) -> DetectionSequence,
    {
        let first = frames.first().ok_or(Error::EmptySequence)?;
        info!("analysing {} frames", frames.len());

        let cache = &self.config.cache;
        let players = &mut self.players;
        let ball = &mut self.ball;

        let player_detections = CachePolicy::new(cache.player_path.clone(), cache.read)
            .resolve(|| Ok(detect_frames(players, frames)))?;
        let ball_detections = CachePolicy::new(cache.ball_path.clone(), cache.read)
            .resolve(|| Ok(detect_ball(ball, frames)))?;

        for seq in [&player_detections, &ball_detections] {
            if seq.len() != frames.len() {
                return Err(Error::FrameCountMismatch {
                    expected: frames.len(),
                    got: seq.len(),
                });
            }
        }

        let ball_detections = interpolate_positions(&ball_detections)?;

        let court_keypoints = self.regressor.predict(first)?;

        let (player_detections, chosen_players) = choose_and_filter_players(
            &court_keypoints,
            &player_detections,
            self.config.players.reference_frame,
        )?;

        let mini_court = MiniCourt::new(first.dims(), &self.config.mini_court, &self.config.court)?;

        let player_heights: HashMap<TrackId, f32> = chosen_players
            .iter()
            .copied()
            .zip(self.config.players.heights_m.iter().copied())
            .collect();
        let ball_heights: HashMap<TrackId, f32> =
            std::iter::once((self.config.ball.track_id, self.config.court.ball_diameter)).collect();

        let keypoints = [court_keypoints];
        let mini_players =
            mini_court.project_sequence(&player_detections, &keypoints, &player_heights)?;
        let mini_ball = mini_court.project_sequence(&ball_detections, &keypoints, &ball_heights)?;

        Ok(Analysis {
            court_keypoints,
            chosen_players,
            players: player_detections,
            ball: ball_detections,
            mini_court,
            mini_players,
            mini_ball,
        })
    }
}
