//! Shuffled reveal: characters appear in random order at their final
//! positions, each flashing the accent colour briefly.

use neonfx_config::TypingConfig;
use rand::RngCore;
use rand::seq::SliceRandom;

use super::{Glyph, GlyphStyle, Reveal, Sequencer, TypingView};

#[derive(Debug, Clone)]
pub struct ShuffledTyping {
    reveal: Reveal,
    flash_ms: u64,
    /// Position revealed by each step, fixed at start.
    order: Vec<usize>,
    /// Reveal time of each position.
    revealed_at: Vec<Option<u64>>,
    /// The permutation is drawn by the first step, which is due at start.
    needs_shuffle: bool,
}

impl ShuffledTyping {
    pub fn new(config: &TypingConfig) -> Self {
        Self {
            reveal: Reveal::new(config),
            flash_ms: config.flash_ms,
            order: Vec::new(),
            revealed_at: Vec::new(),
            needs_shuffle: false,
        }
    }

    /// The reveal order, fixed once the first step has run.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_revealed(&self, position: usize) -> bool {
        self.revealed_at.get(position).is_some_and(Option::is_some)
    }
}

impl Sequencer for ShuffledTyping {
    fn start(&mut self, text: &str, base_delay_ms: u64, now_ms: u64) {
        self.reveal.start(text, base_delay_ms, now_ms, false);
        let len = self.reveal.text.len();
        self.order = (0..len).collect();
        self.revealed_at = vec![None; len];
        self.needs_shuffle = true;
    }

    fn step(&mut self, due_ms: u64, rng: &mut dyn RngCore) {
        if self.needs_shuffle {
            self.order.shuffle(rng);
            self.needs_shuffle = false;
        }

        let r = &mut self.reveal;
        if r.complete {
            r.retire();
            return;
        }

        // The cursor counts reveals; positions come from the permutation
        match self.order.get(r.cursor).copied() {
            Some(position) => {
                self.revealed_at[position] = Some(due_ms);
                r.cursor += 1;
                let delay = r.base_delay_ms;
                r.schedule(due_ms, delay);
            }
            None => r.finish(due_ms),
        }
    }

    fn reset(&mut self) {
        self.revealed_at.fill(None);
        self.needs_shuffle = false;
        self.reveal.reset();
    }

    fn view(&self, now_ms: u64) -> TypingView {
        if !self.reveal.lifecycle.is_running() && !self.reveal.complete {
            return TypingView::default();
        }

        let glyphs = self
            .reveal
            .text
            .iter()
            .zip(&self.revealed_at)
            .map(|(&ch, at)| match at {
                None => Glyph::new(ch, GlyphStyle::Hidden),
                Some(t) if now_ms < t.saturating_add(self.flash_ms) => {
                    Glyph::new(ch, GlyphStyle::Accent)
                }
                Some(_) => Glyph::new(ch, GlyphStyle::Plain),
            })
            .collect();

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
