use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapFeedbackKind {
    /// The tap resumed playback.
    Playing,
    /// The tap paused playback.
    Paused,
}

/// Transient play/pause indicator shown after a tap. Cosmetic only; it never
/// gates a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapFeedback {
    pub id: u64,
    pub index: usize,
    pub kind: TapFeedbackKind,
    pub shown_at: Instant,
}
