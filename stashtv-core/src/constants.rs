//! Compiled defaults. Runtime overrides live in [`crate::FeedTuning`].

pub mod visibility {
    /// Fraction of an item's box that must sit inside the viewport.
    pub const THRESHOLD: f32 = 0.8;
}

pub mod loader {
    /// Items before the end of the window at which the next page is requested.
    pub const PREFETCH_MARGIN: usize = 2;
    pub const PAGE_SIZE: usize = 20;
}

pub mod feedback {
    use std::time::Duration;

    /// How long the play/pause tap indicator stays up.
    pub const TAP_FEEDBACK: Duration = Duration::from_millis(1200);
}

pub mod runtime {
    pub const NOTICE_CAPACITY: usize = 64;
}

pub mod normalize {
    /// Container tag assumed when the server omits the file format.
    pub const DEFAULT_FORMAT: &str = "mp4";
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}
