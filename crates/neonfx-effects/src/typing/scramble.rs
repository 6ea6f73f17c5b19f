//! Scramble reveal: each character cycles through random glyphs, then settles.

use neonfx_config::TypingConfig;
use rand::RngCore;
use rand::seq::IndexedRandom;

use super::{Glyph, GlyphStyle, Reveal, Sequencer, TypingView};
use crate::chars::MATRIX_CHARS;

#[derive(Debug, Clone)]
pub struct ScrambleTyping {
    reveal: Reveal,
    cycles: u32,
    interval_ms: u64,
    /// Random glyphs shown so far for the current character.
    shown: u32,
    /// Glyph currently standing in for the next character.
    glyph: Option<char>,
}

impl ScrambleTyping {
    pub fn new(config: &TypingConfig) -> Self {
        Self {
            reveal: Reveal::new(config),
            cycles: config.scramble_cycles,
            interval_ms: config.scramble_interval_ms,
            shown: 0,
            glyph: None,
        }
    }
}

impl Sequencer for ScrambleTyping {
    fn start(&mut self, text: &str, base_delay_ms: u64, now_ms: u64) {
        self.shown = 0;
        self.glyph = None;
        self.reveal.start(text, base_delay_ms, now_ms, false);
    }

    fn step(&mut self, due_ms: u64, rng: &mut dyn RngCore) {
        let r = &mut self.reveal;
        if r.complete {
            r.retire();
            return;
        }
        if !r.remaining() {
            r.finish(due_ms);
            return;
        }

        if self.shown < self.cycles {
            self.shown += 1;
            self.glyph = MATRIX_CHARS.choose(rng).copied();
            r.timer.arm(due_ms, self.interval_ms);
        } else {
            self.shown = 0;
            self.glyph = None;
            r.advance();
            let delay = r.base_delay_ms;
            r.schedule(due_ms, delay);
        }
    }

    fn reset(&mut self) {
        self.shown = 0;
        self.glyph = None;
        self.reveal.reset();
    }

    fn view(&self, now_ms: u64) -> TypingView {
        let mut glyphs = self.reveal.plain_glyphs();
        if let Some(ch) = self.glyph {
            glyphs.push(Glyph::new(ch, GlyphStyle::Scramble));
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_scrambles_before_settling() {
        let mut rng = StdRng::seed_from_u64(8);
        let config = TypingConfig::default();
        let mut typing = ScrambleTyping::new(&config);
        typing.start("AB", 50, 0);

        // Ten random glyphs at 50ms, the character settles on the eleventh step
        for i in 0..config.scramble_cycles as u64 {
            typing.tick(i * 50, &mut rng);
            let view = typing.view(i * 50);
            assert_eq!(view.glyphs.len(), 1);
            assert_eq!(view.glyphs[0].style, GlyphStyle::Scramble);
            assert!(MATRIX_CHARS.contains(&view.glyphs[0].ch));
            assert_eq!(typing.reveal().cursor(), 0);
        }

        typing.tick(500, &mut rng);
        assert_eq!(typing.reveal().committed(), "A");
        assert_eq!(typing.view(500).text(), "A");
        assert_eq!(typing.reveal().next_due_ms(), Some(550));
    }

    #[test]
    fn test_zero_cycles_settles_immediately() {
        let mut rng = StdRng::seed_from_u64(8);
        let config = TypingConfig {
            scramble_cycles: 0,
            ..TypingConfig::default()
        };
        let mut typing = ScrambleTyping::new(&config);
        typing.start("xyz", 10, 0);
        typing.tick(20, &mut rng);
        assert_eq!(typing.reveal().committed(), "xyz");
    }

    #[test]
    fn test_no_cursor() {
        let mut typing = ScrambleTyping::new(&TypingConfig::default());
        typing.start("abc", 50, 0);
        assert!(!typing.view(0).cursor);
    }
}
