//! Trait surfaces the feed core uses to talk to the world around it.
//!
//! Each seam is small on purpose: the backing store only needs to page raw
//! scenes, the visibility layer only needs to start and stop observing, and
//! the embedded player only needs the handful of controls the scheduler
//! drives.

pub mod player;
pub mod source;
pub mod visibility;

/// Frequently used imports for crates implementing or consuming the seams.
pub mod prelude {
    pub use super::player::PlayerAdapter;
    pub use super::source::{SceneSource, SourceError};
    pub use super::visibility::VisibilitySource;
}
