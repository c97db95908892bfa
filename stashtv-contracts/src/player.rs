use stashtv_model::Caption;

/// Shim around the embedded video player.
///
/// Whatever the vendor player needs to behave (patched seeking, deferred
/// play promises, ...) stays behind this trait. Time updates flow the other
/// way: the shim forwards them to the session as commands.
pub trait PlayerAdapter: Send + std::fmt::Debug {
    fn play(&mut self);

    fn pause(&mut self);

    fn seek(&mut self, seconds: f64);

    fn current_time(&self) -> f64;

    fn set_muted(&mut self, muted: bool);

    fn set_looping(&mut self, looping: bool);

    /// Select a caption track, or hide captions with `None`.
    fn set_caption(&mut self, caption: Option<&Caption>);
}
