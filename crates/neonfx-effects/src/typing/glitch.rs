//! Glitch typing: occasional transient glitch glyphs between reveals.

use neonfx_config::TypingConfig;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use super::{Glyph, GlyphStyle, Reveal, Sequencer, TypingView};
use crate::chars::GLITCH_CHARS;

#[derive(Debug, Clone)]
pub struct GlitchTyping {
    reveal: Reveal,
    chance: f64,
    max_glitches: u32,
    hold_ms: u64,
    glitches: u32,
    /// Glitch glyph on screen after the committed text.
    pending: Option<char>,
}

impl GlitchTyping {
    pub fn new(config: &TypingConfig) -> Self {
        Self {
            reveal: Reveal::new(config),
            chance: config.glitch_chance,
            max_glitches: config.max_glitches,
            hold_ms: config.glitch_hold_ms,
            glitches: 0,
            pending: None,
        }
    }

    /// Glitches shown so far this session.
    pub fn glitches(&self) -> u32 {
        self.glitches
    }
}

impl Sequencer for GlitchTyping {
    fn start(&mut self, text: &str, base_delay_ms: u64, now_ms: u64) {
        self.glitches = 0;
        self.pending = None;
        self.reveal.start(text, base_delay_ms, now_ms, true);
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

        let glitch_now = self.pending.is_none()
            && self.glitches < self.max_glitches
            && rng.random::<f64>() < self.chance;

        if glitch_now {
            self.pending = GLITCH_CHARS.choose(rng).copied();
            self.glitches += 1;
            r.timer.arm(due_ms, self.hold_ms);
        } else {
            // Drop any glitch glyph, then commit the real character
            self.pending = None;
            r.advance();
            let delay = r.base_delay_ms;
            r.schedule(due_ms, delay);
        }
    }

    fn reset(&mut self) {
        self.glitches = 0;
        self.pending = None;
        self.reveal.reset();
    }

    fn view(&self, now_ms: u64) -> TypingView {
        let mut glyphs = self.reveal.plain_glyphs();
        if let Some(ch) = self.pending {
            glyphs.push(Glyph::new(ch, GlyphStyle::Glitch));
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

    fn always_glitch() -> TypingConfig {
        TypingConfig {
            glitch_chance: 1.0,
            ..TypingConfig::default()
        }
    }

    #[test]
    fn test_glitch_is_transient() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = always_glitch();
        let mut typing = GlitchTyping::new(&config);
        typing.start("abc", 50, 0);

        typing.tick(0, &mut rng);
        let view = typing.view(0);
        assert_eq!(typing.reveal().cursor(), 0);
        assert_eq!(view.glyphs.len(), 1);
        assert_eq!(view.glyphs[0].style, GlyphStyle::Glitch);
        assert!(GLITCH_CHARS.contains(&view.glyphs[0].ch));

        // After the hold the glitch is gone and the real character is in
        typing.tick(config.glitch_hold_ms, &mut rng);
        assert_eq!(typing.view(100).text(), "a");
        assert_eq!(typing.reveal().committed(), "a");
    }

    #[test]
    fn test_glitches_are_capped() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = always_glitch();
        let mut typing = GlitchTyping::new(&config);
        typing.start("abcdefghij", 10, 0);

        let mut glitch_frames = 0;
        while !typing.reveal().is_complete() {
            let due = typing.reveal().next_due_ms().unwrap();
            typing.tick(due, &mut rng);
            if typing.view(due).glyphs.iter().any(|g| g.style == GlyphStyle::Glitch) {
                glitch_frames += 1;
            }
            assert!(typing.reveal().text()[..typing.reveal().cursor()]
                .iter()
                .all(|ch| ch.is_ascii_lowercase()));
        }

        assert_eq!(typing.glitches(), config.max_glitches);
        assert_eq!(glitch_frames, config.max_glitches);
        assert_eq!(typing.reveal().committed(), "abcdefghij");
    }

    #[test]
    fn test_never_glitches_at_zero_chance() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = TypingConfig {
            glitch_chance: 0.0,
            ..TypingConfig::default()
        };
        let mut typing = GlitchTyping::new(&config);
        typing.start("abcdefghij", 10, 0);
        typing.tick(10_000, &mut rng);
        assert_eq!(typing.glitches(), 0);
        assert!(typing.reveal().is_complete());
    }
}
