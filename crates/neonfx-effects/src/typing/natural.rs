//! Plain typing, with natural or terminal pacing.

use neonfx_config::TypingConfig;
use rand::RngCore;

use super::{Glyph, GlyphStyle, Reveal, Sequencer, TypingView, reveal_delay};

/// Reveals one character per step.
///
/// In natural mode the delay depends on the character just revealed. In
/// terminal mode the text follows a prompt and every delay is the base delay.
#[derive(Debug, Clone)]
pub struct NaturalTyping {
    reveal: Reveal,
    prompt: Option<String>,
}

impl NaturalTyping {
    pub fn new(config: &TypingConfig) -> Self {
        Self {
            reveal: Reveal::new(config),
            prompt: None,
        }
    }

    /// Prompt-prefixed variant with a fixed pace.
    pub fn terminal(config: &TypingConfig) -> Self {
        Self {
            reveal: Reveal::new(config),
            prompt: Some(config.prompt.clone()),
        }
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }
}

impl Sequencer for NaturalTyping {
    fn start(&mut self, text: &str, base_delay_ms: u64, now_ms: u64) {
        self.reveal.start(text, base_delay_ms, now_ms, true);
    }

    fn step(&mut self, due_ms: u64, rng: &mut dyn RngCore) {
        let r = &mut self.reveal;
        if r.complete {
            r.retire();
            return;
        }

        match r.advance() {
            Some(ch) => {
                let delay = if self.prompt.is_some() {
                    r.base_delay_ms
                } else {
                    reveal_delay(ch, r.base_delay_ms, rng)
                };
                r.schedule(due_ms, delay);
            }
            None => r.finish(due_ms),
        }
    }

    fn reset(&mut self) {
        self.reveal.reset();
    }

    fn view(&self, now_ms: u64) -> TypingView {
        let mut glyphs = Vec::new();
        // The prompt shows from start until reset
        let shown = self.reveal.lifecycle.is_running() || self.reveal.complete;
        if let Some(prompt) = self.prompt.as_ref().filter(|_| shown) {
            glyphs.extend(prompt.chars().map(|ch| Glyph::new(ch, GlyphStyle::Prompt)));
        }
        glyphs.extend(self.reveal.plain_glyphs());

        TypingView {
            glyphs,
            cursor: self.reveal.cursor_lit(now_ms),
        }
    }

    fn reveal(&self) -> &Reveal {
        &self.reveal
    }

    fn reveal_mut(&mut self) -> &mut Reveal {
        &mut self.reveal
    }
}
