//! Core types shared by the neonfx crates.
//!
//! Geometry on the virtual-pixel plane, the neon palette, the cooperative
//! scheduling primitives every effect is driven by, and the drawing surface
//! trait effects render onto.

mod backdrop;
mod geometry;
mod palette;
mod schedule;
mod surface;

pub use backdrop::Backdrop;
pub use geometry::{Bounds, Point};
pub use palette::{NeonColor, Rgb};
pub use schedule::{FrameClock, Lifecycle, Timer, VisibilityTrigger};
pub use surface::{Ink, PixelBuffer, Surface};
