//! Static noise overlay and text corruption.

use neonfx_config::{GlitchConfig, NoiseConfig};
use neonfx_core::{FrameClock, Lifecycle, PixelBuffer, Surface, Timer};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::chars::CORRUPTION_CHARS;

/// Full-surface analog static.
///
/// While running, every frame refills the buffer with independent uniform
/// luminance per pixel (R = G = B, fully opaque).
#[derive(Debug, Clone)]
pub struct NoiseOverlay {
    buffer: PixelBuffer,
    clock: FrameClock,
    opacity: f32,
    lifecycle: Lifecycle,
    frames_written: u64,
}

impl NoiseOverlay {
    pub fn new(config: &NoiseConfig) -> Self {
        Self {
            buffer: PixelBuffer::default(),
            clock: FrameClock::new(config.frame_interval_ms),
            opacity: config.opacity,
            lifecycle: Lifecycle::Idle,
            frames_written: 0,
        }
    }

    /// Match the buffer to the surface size in pixels.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.buffer.width(), self.buffer.height()) {
            self.buffer.resize(width, height);
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.lifecycle.is_running() {
            return;
        }
        self.lifecycle = Lifecycle::Running;
        self.clock.start(now_ms);
        log::debug!("noise overlay started");
    }

    /// Halt the loop and blank the buffer. No frame is written afterwards.
    pub fn stop(&mut self) {
        self.lifecycle = Lifecycle::Idle;
        self.clock.stop();
        self.buffer.clear();
        log::debug!("noise overlay stopped after {} frames", self.frames_written);
    }

    pub fn toggle(&mut self, now_ms: u64) {
        if self.lifecycle.is_running() {
            self.stop();
        } else {
            self.start(now_ms);
        }
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Frames written since creation.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Write a new frame of static if one is due.
    pub fn tick<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        if !self.lifecycle.is_running() || !self.clock.poll(now_ms) {
            return;
        }

        for pixel in self.buffer.pixels_mut() {
            let v: u8 = rng.random();
            *pixel = [v, v, v, 255];
        }
        self.frames_written += 1;
    }

    /// Blend the static over the surface.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.lifecycle.is_running() {
            surface.composite(&self.buffer, self.opacity);
        }
    }
}

/// Replace each non-space character with a random glyph with probability
/// `chance`.
pub fn corrupt_text<R: Rng + ?Sized>(text: &str, chance: f64, rng: &mut R) -> String {
    text.chars()
        .map(|ch| {
            if ch == ' ' {
                ' '
            } else if rng.random::<f64>() < chance {
                CORRUPTION_CHARS.choose(rng).copied().unwrap_or(ch)
            } else {
                ch
            }
        })
        .collect()
}

/// A piece of text that can be corrupted for a short window and then
/// restored to exactly what it was.
#[derive(Debug, Clone)]
pub struct CorruptibleText {
    original: String,
    shown: String,
    chance: f64,
    window_ms: u64,
    restore: Timer,
}

impl CorruptibleText {
    pub fn new(text: impl Into<String>, config: &GlitchConfig) -> Self {
        let original = text.into();
        Self {
            shown: original.clone(),
            original,
            chance: config.corruption_chance,
            window_ms: config.corruption_ms,
            restore: Timer::new(),
        }
    }

    /// Show a corrupted copy until the window closes.
    ///
    /// Corrupting again while corrupted re-rolls from the original.
    pub fn corrupt(&mut self, now_ms: u64, rng: &mut dyn RngCore) {
        self.shown = corrupt_text(&self.original, self.chance, rng);
        self.restore.arm(now_ms, self.window_ms);
    }

    /// Restore the original once the window has passed.
    pub fn tick(&mut self, now_ms: u64) {
        if self.restore.fire(now_ms).is_some() {
            self.restore_now();
        }
    }

    pub fn restore_now(&mut self) {
        self.restore.cancel();
        self.shown.clone_from(&self.original);
    }

    pub fn is_corrupted(&self) -> bool {
        self.restore.is_armed()
    }

    pub fn text(&self) -> &str {
        &self.shown
    }

    pub fn original(&self) -> &str {
        &self.original
    }
}
