//! Typing animations.
//!
//! Every variant reveals a fixed target string one unit per step on a
//! [`Timer`]. They share the [`Sequencer`] interface and are selected at
//! construction through [`TypingEffect`].

mod glitch;
mod natural;
mod scramble;
mod shuffled;

use neonfx_config::TypingConfig;
use neonfx_core::{Lifecycle, Timer};
use rand::{Rng, RngCore};

pub use glitch::GlitchTyping;
pub use natural::NaturalTyping;
pub use scramble::ScrambleTyping;
pub use shuffled::ShuffledTyping;

/// Delay after revealing `ch`: long pauses after sentence punctuation,
/// shorter after clause punctuation and spaces, jittered otherwise.
pub fn reveal_delay<R: Rng + ?Sized>(ch: char, base_delay_ms: u64, rng: &mut R) -> u64 {
    match ch {
        '.' | '!' | '?' => base_delay_ms.saturating_mul(8),
        ',' | ';' => base_delay_ms.saturating_mul(4),
        ' ' => base_delay_ms.saturating_mul(2),
        _ => {
            let jitter = rng.random::<f64>() * base_delay_ms as f64 * 0.5;
            base_delay_ms.saturating_add(jitter as u64)
        }
    }
}

/// How a glyph of a typing view is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphStyle {
    /// Committed target text.
    Plain,
    /// Prompt prefix of terminal-style text.
    Prompt,
    /// A freshly revealed character still flashing.
    Accent,
    /// A transient glitch glyph.
    Glitch,
    /// A random glyph cycling before the true character settles.
    Scramble,
    /// A position not revealed yet; drawn as blank space.
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: GlyphStyle,
}

impl Glyph {
    pub const fn new(ch: char, style: GlyphStyle) -> Self {
        Self { ch, style }
    }
}

/// What a typing effect shows at a given instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingView {
    pub glyphs: Vec<Glyph>,
    /// Whether the blinking cursor is lit right now.
    pub cursor: bool,
}

impl TypingView {
    /// The visible text, with hidden positions as spaces.
    pub fn text(&self) -> String {
        self.glyphs
            .iter()
            .map(|g| if g.style == GlyphStyle::Hidden { ' ' } else { g.ch })
            .collect()
    }
}

/// Reveal bookkeeping shared by every variant.
#[derive(Debug, Clone, Default)]
pub struct Reveal {
    text: Vec<char>,
    cursor: usize,
    base_delay_ms: u64,
    timer: Timer,
    lifecycle: Lifecycle,
    complete: bool,
    cursor_shown: bool,
    started_ms: u64,
    last_delay_ms: Option<u64>,
    cursor_grace_ms: u64,
    cursor_blink_ms: u64,
}

impl Reveal {
    fn new(config: &TypingConfig) -> Self {
        Self {
            cursor_grace_ms: config.cursor_grace_ms,
            cursor_blink_ms: config.cursor_blink_ms,
            ..Default::default()
        }
    }

    /// Begin revealing `text`; the first step is due immediately.
    fn start(&mut self, text: &str, base_delay_ms: u64, now_ms: u64, with_cursor: bool) {
        self.text = text.chars().collect();
        self.cursor = 0;
        self.base_delay_ms = base_delay_ms;
        self.lifecycle = Lifecycle::Running;
        self.complete = false;
        self.cursor_shown = with_cursor;
        self.started_ms = now_ms;
        self.last_delay_ms = None;
        self.timer.arm(now_ms, 0);
    }

    fn reset(&mut self) {
        self.cursor = 0;
        self.timer.cancel();
        self.lifecycle = Lifecycle::Idle;
        self.complete = false;
        self.cursor_shown = false;
        self.last_delay_ms = None;
    }

    /// Commit the character under the cursor and return it.
    fn advance(&mut self) -> Option<char> {
        let ch = self.text.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(ch)
    }

    fn remaining(&self) -> bool {
        self.cursor < self.text.len()
    }

    /// Schedule the next reveal `delay_ms` after `due_ms`.
    fn schedule(&mut self, due_ms: u64, delay_ms: u64) {
        self.last_delay_ms = Some(delay_ms);
        self.timer.arm(due_ms, delay_ms);
    }

    /// Mark the text complete; the cursor goes after the grace delay.
    fn finish(&mut self, due_ms: u64) {
        self.complete = true;
        self.timer.arm(due_ms, self.cursor_grace_ms);
        log::debug!("typing complete: {:?}", self.committed());
    }

    /// Final step after completion.
    fn retire(&mut self) {
        self.cursor_shown = false;
        self.lifecycle = Lifecycle::Idle;
    }

    fn cursor_lit(&self, now_ms: u64) -> bool {
        if !self.cursor_shown {
            return false;
        }
        let period = self.cursor_blink_ms.max(1);
        now_ms.saturating_sub(self.started_ms) % period < period / 2
    }

    fn plain_glyphs(&self) -> Vec<Glyph> {
        self.text[..self.cursor]
            .iter()
            .map(|&ch| Glyph::new(ch, GlyphStyle::Plain))
            .collect()
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    /// Committed prefix of the target text.
    pub fn committed(&self) -> String {
        self.text[..self.cursor].iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn base_delay_ms(&self) -> u64 {
        self.base_delay_ms
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Delay chosen by the most recent reveal.
    pub fn last_delay_ms(&self) -> Option<u64> {
        self.last_delay_ms
    }

    /// When the next step is due, if one is pending.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.timer.due_ms()
    }
}

/// The interface every typing variant implements.
pub trait Sequencer {
    /// Reset and begin revealing `text`.
    fn start(&mut self, text: &str, base_delay_ms: u64, now_ms: u64);

    /// Perform the step that was due at `due_ms`.
    fn step(&mut self, due_ms: u64, rng: &mut dyn RngCore);

    /// Clear the displayed text and cancel pending steps.
    fn reset(&mut self);

    fn view(&self, now_ms: u64) -> TypingView;

    fn reveal(&self) -> &Reveal;

    fn reveal_mut(&mut self) -> &mut Reveal;

    /// Run every step due by `now_ms`.
    fn tick(&mut self, now_ms: u64, rng: &mut dyn RngCore) {
        while let Some(due) = self.reveal_mut().timer.fire(now_ms) {
            self.step(due, rng);
        }
    }
}

/// Which typing variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingStyle {
    Natural,
    Terminal,
    Scramble,
    Shuffled,
    Glitch,
}

/// A typing effect of any variant.
#[derive(Debug, Clone)]
pub enum TypingEffect {
    Natural(NaturalTyping),
    Scramble(ScrambleTyping),
    Shuffled(ShuffledTyping),
    Glitch(GlitchTyping),
}

impl TypingEffect {
    pub fn new(style: TypingStyle, config: &TypingConfig) -> Self {
        match style {
            TypingStyle::Natural => Self::Natural(NaturalTyping::new(config)),
            TypingStyle::Terminal => Self::Natural(NaturalTyping::terminal(config)),
            TypingStyle::Scramble => Self::Scramble(ScrambleTyping::new(config)),
            TypingStyle::Shuffled => Self::Shuffled(ShuffledTyping::new(config)),
            TypingStyle::Glitch => Self::Glitch(GlitchTyping::new(config)),
        }
    }

    fn sequencer(&self) -> &dyn Sequencer {
        match self {
            Self::Natural(t) => t,
            Self::Scramble(t) => t,
            Self::Shuffled(t) => t,
            Self::Glitch(t) => t,
        }
    }

    fn sequencer_mut(&mut self) -> &mut dyn Sequencer {
        match self {
            Self::Natural(t) => t,
            Self::Scramble(t) => t,
            Self::Shuffled(t) => t,
            Self::Glitch(t) => t,
        }
    }

    pub fn start(&mut self, text: &str, base_delay_ms: u64, now_ms: u64) {
        log::debug!("typing start: {text:?} every {base_delay_ms}ms");
        self.sequencer_mut().start(text, base_delay_ms, now_ms);
    }

    pub fn tick(&mut self, now_ms: u64, rng: &mut dyn RngCore) {
        self.sequencer_mut().tick(now_ms, rng);
    }

    pub fn reset(&mut self) {
        self.sequencer_mut().reset();
    }

    pub fn view(&self, now_ms: u64) -> TypingView {
        self.sequencer().view(now_ms)
    }

    pub fn reveal(&self) -> &Reveal {
        self.sequencer().reveal()
    }

    /// Prompt drawn ahead of the text, for terminal-style typing.
    pub fn prompt(&self) -> Option<&str> {
        match self {
            Self::Natural(t) => t.prompt(),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.reveal().lifecycle().is_running()
    }

    pub fn is_complete(&self) -> bool {
        self.reveal().is_complete()
    }
}
