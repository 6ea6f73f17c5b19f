//! Backdrop selection for the page background.

use serde::{Deserialize, Serialize};

/// Which animated backdrop is drawn behind the page content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backdrop {
    /// Drifting particles with proximity connections.
    #[default]
    Starfield,
    /// Falling katakana columns.
    MatrixRain,
    /// Slow radial colour clouds under the starfield.
    Nebula,
    None,
}

impl Backdrop {
    /// Cycle to the next backdrop.
    pub fn next(self) -> Self {
        match self {
            Backdrop::Starfield => Backdrop::Nebula,
            Backdrop::Nebula => Backdrop::MatrixRain,
            Backdrop::MatrixRain => Backdrop::None,
            Backdrop::None => Backdrop::Starfield,
        }
    }

    /// Display name for the status line.
    pub fn name(self) -> &'static str {
        match self {
            Backdrop::Starfield => "starfield",
            Backdrop::MatrixRain => "matrix",
            Backdrop::Nebula => "nebula",
            Backdrop::None => "none",
        }
    }

    /// Whether the particle field is drawn for this backdrop.
    pub fn has_particles(self) -> bool {
        matches!(self, Backdrop::Starfield | Backdrop::Nebula)
    }
}
