//! Configuration for a stashtv feed session.
//!
//! A [`FeedConfig`] bundles the host plugin settings with the session tuning
//! knobs. It can come from an environment-provided file, inline JSON, a
//! well-known file in the working directory or the compiled defaults, and is
//! checked by [`apply_guard_rails`] before a session is built from it.
#![allow(missing_docs)]

pub mod models;
pub mod validation;

pub use models::{FeedConfig, FeedConfigSource};
pub use validation::{ConfigGuardRailError, ConfigWarning, apply_guard_rails};
