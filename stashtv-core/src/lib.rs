//! Viewport-driven playback scheduling for the stashtv vertical feed.
//!
//! The crate turns visibility reports into a single active player, keeps
//! per-scene playback state across scroll-aways and grows the scene window
//! one page at a time as the viewer nears its end. Everything here is plain
//! state machinery except [`runtime`], which drives a [`FeedSession`] from a
//! tokio task.
#![allow(missing_docs)]

pub mod constants;
pub mod error;
pub mod events;
pub mod loader;
pub mod normalize;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod source;
pub mod store;
pub mod tracker;
pub mod tuning;
pub mod window;

pub use error::{FeedError, Result};
pub use events::{FeedNotice, NoticeBus};
pub use loader::{BatchOutcome, FetchCursor, FetchRequest, WindowedFeedLoader};
pub use normalize::{normalize_batch, normalize_scene};
pub use runtime::{FeedHandle, FeedRuntime};
pub use scheduler::{
    ActivePlayer, DisplayFlags, ItemPhase, Scheduler, TapFeedback,
    TapFeedbackKind, Transition,
};
pub use session::{
    FeedCommand, FeedSession, ItemSnapshot, SessionOutput, SessionSnapshot,
};
pub use source::VecSceneSource;
pub use store::PlaybackStore;
pub use tracker::{
    IntersectionTracker, ManualVisibility, Rect, VisibilityChanged,
    visible_fraction,
};
pub use tuning::FeedTuning;
pub use window::FeedWindow;

pub use stashtv_contracts as contracts;
pub use stashtv_model as model;
