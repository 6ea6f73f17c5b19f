//! Configuration for the neonfx effects.
//!
//! Every table and field has a default, so a partial `config.toml` (say, only
//! `[particles] count = 80`) works. All values are read once at start-up;
//! effects copy what they need at construction.

mod error;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use neonfx_core::{Backdrop, NeonColor};
use serde::{Deserialize, Serialize};

pub use error::ConfigError;

/// File name inside the platform config directory.
const CONFIG_FILE: &str = "config.toml";

/// An inclusive-exclusive `[min, max)` range for random draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "{name}: band [{}, {}) is not an ordered finite range",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Particle starfield parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of particles in the pool.
    pub count: usize,
    /// Pairs closer than this (virtual pixels) are connected by a line.
    pub connection_distance: f32,
    /// Base opacity of connection lines before distance fading.
    pub connection_alpha: f32,
    /// Pointer repulsion radius.
    pub influence_radius: f32,
    /// Displacement at zero distance from the pointer.
    pub repulsion_strength: f32,
    /// Per-tick speed range.
    pub speed: Band,
    /// Particle radius range.
    pub size: Band,
    /// Halo width drawn around each particle.
    pub glow: f32,
    /// Colours particles are drawn from uniformly.
    pub palette: Vec<NeonColor>,
    /// Chance per tick of a shooting star.
    pub shooting_star_chance: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 150,
            connection_distance: 150.0,
            connection_alpha: 0.2,
            influence_radius: 100.0,
            repulsion_strength: 2.0,
            speed: Band::new(0.1, 0.5),
            size: Band::new(1.0, 3.0),
            glow: 10.0,
            palette: NeonColor::ALL.to_vec(),
            shooting_star_chance: 0.001,
        }
    }
}

/// Typing animation timings. All durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub base_delay_ms: u64,
    /// How long the cursor lingers after the text is complete.
    pub cursor_grace_ms: u64,
    /// Full on/off period of the blinking cursor.
    pub cursor_blink_ms: u64,
    /// Random glyphs shown before each character settles.
    pub scramble_cycles: u32,
    pub scramble_interval_ms: u64,
    /// Accent flash of a character revealed out of order.
    pub flash_ms: u64,
    /// Chance per step of a transient glitch glyph.
    pub glitch_chance: f64,
    pub max_glitches: u32,
    pub glitch_hold_ms: u64,
    /// Prompt shown before terminal-style text.
    pub prompt: String,
    /// Delay between sections revealed together, by index.
    pub stagger_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 50,
            cursor_grace_ms: 1000,
            cursor_blink_ms: 1000,
            scramble_cycles: 10,
            scramble_interval_ms: 50,
            flash_ms: 200,
            glitch_chance: 0.1,
            max_glitches: 3,
            glitch_hold_ms: 100,
            prompt: "$ ".to_string(),
            stagger_ms: 200,
        }
    }
}

/// Static noise overlay parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub frame_interval_ms: u64,
    /// Opacity the static is composited at.
    pub opacity: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            opacity: 0.1,
        }
    }
}

/// Glitch text, random glitch pulses and screen distortion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitchConfig {
    /// Per-character substitution chance when text is corrupted.
    pub corruption_chance: f64,
    /// How long corrupted text stays on screen.
    pub corruption_ms: u64,
    /// Interval between random glitch rolls.
    pub pulse_interval_ms: u64,
    pub pulse_chance: f64,
    pub pulse_ms: u64,
    /// Interval between screen distortion rolls.
    pub distortion_interval_ms: u64,
    pub distortion_chance: f64,
    pub distortion_ms: u64,
    /// Length of the glitch played when the pointer enters a title.
    pub hover_ms: u64,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            corruption_chance: 0.1,
            corruption_ms: 200,
            pulse_interval_ms: 3000,
            pulse_chance: 0.1,
            pulse_ms: 500,
            distortion_interval_ms: 5000,
            distortion_chance: 0.05,
            distortion_ms: 2000,
            hover_ms: 300,
        }
    }
}

/// Terminal rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub fps: u32,
    /// Virtual pixels per terminal cell, horizontally.
    pub cell_width: f32,
    /// Virtual pixels per terminal cell, vertically.
    pub cell_height: f32,
    pub backdrop: Backdrop,
    /// Start with the static overlay running.
    pub static_on_start: bool,
    /// Colour of the typing cursor and reveal flashes.
    pub accent: NeonColor,
    /// Matrix rain step interval.
    pub rain_interval_ms: u64,
    /// Chance per step that a drop past the bottom edge restarts at the top.
    pub rain_restart_chance: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            cell_width: 8.0,
            cell_height: 16.0,
            backdrop: Backdrop::default(),
            static_on_start: false,
            accent: NeonColor::ElectricBlue,
            rain_interval_ms: 33,
            rain_restart_chance: 0.025,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub particles: ParticleConfig,
    pub typing: TypingConfig,
    pub noise: NoiseConfig,
    pub glitch: GlitchConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "neonfx", "neonfx").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                log::info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                log::warn!("no platform config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific file. Missing fields use defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to a specific file (pretty-printed).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content)?;
        log::info!("saved config to {}", path.display());
        Ok(())
    }

    /// Reject values the effects cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.particles;
        p.speed.validate("particles.speed")?;
        p.size.validate("particles.size")?;
        if p.size.min < 0.0 {
            return Err(ConfigError::Invalid("particles.size must not be negative".into()));
        }
        positive("particles.connection_distance", p.connection_distance)?;
        positive("particles.influence_radius", p.influence_radius)?;
        unit("particles.connection_alpha", f64::from(p.connection_alpha))?;
        unit("particles.shooting_star_chance", p.shooting_star_chance)?;
        if p.palette.is_empty() {
            return Err(ConfigError::Invalid("particles.palette must not be empty".into()));
        }

        unit("typing.glitch_chance", self.typing.glitch_chance)?;
        unit("noise.opacity", f64::from(self.noise.opacity))?;

        let g = &self.glitch;
        unit("glitch.corruption_chance", g.corruption_chance)?;
        unit("glitch.pulse_chance", g.pulse_chance)?;
        unit("glitch.distortion_chance", g.distortion_chance)?;

        positive("display.cell_width", self.display.cell_width)?;
        positive("display.cell_height", self.display.cell_height)?;
        unit("display.rain_restart_chance", self.display.rain_restart_chance)?;
        if self.display.fps == 0 {
            return Err(ConfigError::Invalid("display.fps must be at least 1".into()));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
    }
}

fn unit(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be within 0..=1, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.particles.count, 150);
        assert_eq!(config.particles.palette.len(), 5);
        assert_eq!(config.typing.base_delay_ms, 50);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [particles]
            count = 80

            [display]
            backdrop = "matrix-rain"
            "#,
        )
        .unwrap();
        assert_eq!(config.particles.count, 80);
        assert_eq!(config.particles.connection_distance, 150.0);
        assert_eq!(config.display.backdrop, Backdrop::MatrixRain);
        assert_eq!(config.typing, TypingConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_inverted_band_rejected() {
        let err = Config::from_toml("[particles]\nspeed = { min = 2.0, max = 1.0 }").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let err = Config::from_toml("[glitch]\ncorruption_chance = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = Config::from_toml("[particles\ncount = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("neonfx-config-test-{}", std::process::id()));
        let path = dir.join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.particles.count = 42;
        config.display.accent = NeonColor::Lime;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
