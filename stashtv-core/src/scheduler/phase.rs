use serde::Serialize;

/// Scheduler-visible lifecycle of one feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPhase {
    Inactive,
    ActivePlaying,
    ActivePaused,
}

impl ItemPhase {
    pub fn is_active(self) -> bool {
        !matches!(self, ItemPhase::Inactive)
    }
}

/// Active index before and after handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

impl Transition {
    pub fn between(previous: Option<usize>, current: Option<usize>) -> Self {
        Self { previous, current }
    }

    pub fn unchanged(active: Option<usize>) -> Self {
        Self::between(active, active)
    }

    pub fn is_change(&self) -> bool {
        self.previous != self.current
    }

    /// The index that just became active, if any.
    pub fn activated(&self) -> Option<usize> {
        if self.is_change() { self.current } else { None }
    }
}

/// Session-wide display toggles. These are not per item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DisplayFlags {
    pub fullscreen: bool,
    pub letterbox: bool,
}
