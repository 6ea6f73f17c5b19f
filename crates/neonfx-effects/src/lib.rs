//! Decorative effects for the neonfx terminal page.
//!
//! This crate provides the particle starfield and its vignette, the typing
//! sequencers, the static overlay with text corruption, glitch pulses and
//! screen distortion, plus the matrix rain and nebula backdrops. Effects draw
//! either onto the virtual-pixel [`neonfx_core::Surface`] (rasterized by
//! [`CellSurface`]) or straight into a Ratatui buffer.

mod chars;
mod color;
pub mod glitch;
mod matrix;
mod nebula;
pub mod noise;
pub mod particles;
mod state;
mod surface;
pub mod typing;
mod vignette;

pub use color::{hsl_to_rgb, hue_rotate, rgb_to_hsl};
pub use glitch::{ColorFilter, GlitchKind, GlitchPulse, GlitchPulses, ScreenDistortion};
pub use matrix::MatrixRain;
pub use nebula::Nebula;
pub use noise::{CorruptibleText, NoiseOverlay, corrupt_text};
pub use particles::ParticleField;
pub use state::BackdropState;
pub use surface::{CellInk, CellSurface};
pub use typing::{Glyph, GlyphStyle, Sequencer, TypingEffect, TypingStyle, TypingView};
