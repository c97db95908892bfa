use stashtv_model::Caption;

/// Stand-in media element that logs the controls it receives.
#[derive(Debug)]
pub struct SimPlayer {
    index: usize,
    position: f64,
}

impl SimPlayer {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            position: 0.0,
        }
    }
}

impl stashtv_core::contracts::player::PlayerAdapter for SimPlayer {
    fn play(&mut self) {
        tracing::debug!(index = self.index, at = self.position, "play");
    }

    fn pause(&mut self) {
        tracing::debug!(index = self.index, at = self.position, "pause");
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds;
        tracing::debug!(index = self.index, to = seconds, "seek");
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_muted(&mut self, muted: bool) {
        tracing::debug!(index = self.index, muted, "mute");
    }

    fn set_looping(&mut self, looping: bool) {
        tracing::debug!(index = self.index, looping, "loop");
    }

    fn set_caption(&mut self, caption: Option<&Caption>) {
        tracing::debug!(
            index = self.index,
            lang = caption.map(|c| c.lang.as_str()),
            "caption"
        );
    }
}
