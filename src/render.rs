use crate::court::CourtKeypoints;
use crate::frame::FrameDetections;
use crate::mini_court::MiniCourtOverlay;

/// What a set of boxes stands for, so the renderer can pick labels and colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Player,
    Ball,
}

impl ObjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Player => "Player",
            ObjectKind::Ball => "Ball",
        }
    }
}

pub trait Renderer<I> {
    fn draw_boxes(&mut self, frame: &mut I, detections: &FrameDetections, kind: ObjectKind);

    fn draw_keypoints(&mut self, frame: &mut I, keypoints: &CourtKeypoints);

    /// Background, court lines and keypoints of the mini-court.
    fn draw_mini_court(&mut self, frame: &mut I, overlay: &MiniCourtOverlay);

    /// Positions already projected into mini-court pixel space.
    fn draw_mini_positions(&mut self, frame: &mut I, positions: &FrameDetections, kind: ObjectKind);

    fn draw_frame_number(&mut self, frame: &mut I, index: usize);
}
