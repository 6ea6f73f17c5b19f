//! Nebula backdrop: three soft radial glows drifting around the centre.
//!
//! Apart from a time counter the nebula is stateless; every cell colour is
//! computed from its position and the current time.

use neonfx_core::{Bounds, Point, Rgb};
use ratatui::{buffer::Buffer, layout::Rect};

/// Colour and peak opacity of each layer, innermost first.
const LAYERS: [(Rgb, f32); 3] = [
    (Rgb::new(184, 71, 255), 0.1),
    (Rgb::new(0, 212, 255), 0.05),
    (Rgb::new(255, 0, 110), 0.05),
];
const BASE_RADIUS: f32 = 200.0;
const RADIUS_STEP: f32 = 100.0;
const TIME_STEP: f32 = 0.005;

#[derive(Debug, Clone, Default)]
pub struct Nebula {
    time: f32,
}

impl Nebula {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.time += TIME_STEP;
    }

    pub fn radius(layer: usize) -> f32 {
        BASE_RADIUS + layer as f32 * RADIUS_STEP
    }

    /// Centre of a layer, drifting around the middle of `bounds`.
    pub fn layer_center(&self, layer: usize, bounds: Bounds) -> Point {
        let i = layer as f32;
        let center = bounds.center();
        Point::new(
            center.x + (self.time + i).sin() * 50.0,
            center.y + (self.time * 0.7 + i).cos() * 30.0,
        )
    }

    /// Colour at `p`, with the layers added onto the page background.
    pub fn color_at(&self, p: Point, bounds: Bounds) -> Rgb {
        let mut acc = [
            Rgb::BACKGROUND.r as f32,
            Rgb::BACKGROUND.g as f32,
            Rgb::BACKGROUND.b as f32,
        ];

        for (i, (color, alpha)) in LAYERS.iter().enumerate() {
            let radius = Self::radius(i);
            let d = self.layer_center(i, bounds).distance(p);
            if d >= radius {
                continue;
            }
            let a = alpha * (1.0 - d / radius);
            acc[0] += color.r as f32 * a;
            acc[1] += color.g as f32 * a;
            acc[2] += color.b as f32 * a;
        }

        let channel = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(acc[0]), channel(acc[1]), channel(acc[2]))
    }

    /// Paint cell backgrounds of `area`, each cell covering `cell` virtual
    /// pixels.
    pub fn render(&self, buf: &mut Buffer, area: Rect, cell: (f32, f32)) {
        let (cw, ch) = cell;
        let bounds = Bounds::new(area.width as f32 * cw, area.height as f32 * ch);
        if bounds.is_empty() {
            return;
        }

        for row in 0..area.height {
            for col in 0..area.width {
                let p = Point::new((col as f32 + 0.5) * cw, (row as f32 + 0.5) * ch);
                let color = self.color_at(p, bounds);
                if color == Rgb::BACKGROUND {
                    continue;
                }
                if let Some(c) = buf.cell_mut((area.x + col, area.y + row)) {
                    c.set_bg(color.into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_radii() {
        assert_eq!(Nebula::radius(0), 200.0);
        assert_eq!(Nebula::radius(2), 400.0);
    }

    #[test]
    fn test_layers_drift_with_time() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut nebula = Nebula::new();
        let before = nebula.layer_center(0, bounds);
        assert!((before.x - 400.0).abs() < 1e-3);
        assert!((before.y - 330.0).abs() < 1e-3);

        for _ in 0..100 {
            nebula.tick();
        }
        assert!((nebula.time() - 0.5).abs() < 1e-4);
        let after = nebula.layer_center(0, bounds);
        assert!((after.x - (400.0 + 0.5f32.sin() * 50.0)).abs() < 1e-2);
        assert_ne!(before, after);
    }

    #[test]
    fn test_glow_fades_with_distance() {
        let bounds = Bounds::new(800.0, 600.0);
        let nebula = Nebula::new();
        let center = nebula.layer_center(0, bounds);

        let near = nebula.color_at(center, bounds);
        let mid = nebula.color_at(Point::new(center.x + 150.0, center.y), bounds);
        assert!(near.r > mid.r);
        assert!(near.r > Rgb::BACKGROUND.r);

        // Beyond every layer nothing is added
        let far = nebula.color_at(Point::new(-1000.0, -1000.0), bounds);
        assert_eq!(far, Rgb::BACKGROUND);
    }

    #[test]
    fn test_render_tints_background() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        Nebula::new().render(&mut buf, area, (8.0, 16.0));
        assert_ne!(buf[(10, 5)].bg, ratatui::style::Color::Reset);
    }
}
