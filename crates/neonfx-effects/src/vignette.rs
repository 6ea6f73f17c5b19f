//! Radial vignette painted behind the starfield (stateless).
//!
//! A faint blue-grey glow at the centre fading to the page background at
//! half the screen width.

use neonfx_core::{Bounds, Point, Rgb};
use ratatui::{buffer::Buffer, layout::Rect};

/// Colour and opacity at the centre.
const INNER: (Rgb, f32) = (Rgb::new(26, 26, 46), 0.1);
/// Colour and opacity from the edge of the gradient outwards.
const OUTER: (Rgb, f32) = (Rgb::new(10, 10, 10), 0.3);

/// Vignette colour at `p` over the page background.
pub fn vignette_at(p: Point, bounds: Bounds) -> Rgb {
    let radius = bounds.width / 2.0;
    let t = if radius > 0.0 {
        (bounds.center().distance(p) / radius).min(1.0)
    } else {
        1.0
    };
    let color = INNER.0.lerp(OUTER.0, t);
    let alpha = INNER.1 + (OUTER.1 - INNER.1) * t;
    Rgb::BACKGROUND.lerp(color, alpha)
}

/// Paint cell backgrounds of `area`, each cell covering `cell` virtual pixels.
pub fn render(buf: &mut Buffer, area: Rect, cell: (f32, f32)) {
    let (cw, ch) = cell;
    let bounds = Bounds::new(area.width as f32 * cw, area.height as f32 * ch);
    if bounds.is_empty() {
        return;
    }

    for row in 0..area.height {
        for col in 0..area.width {
            let p = Point::new((col as f32 + 0.5) * cw, (row as f32 + 0.5) * ch);
            let color = vignette_at(p, bounds);
            if color == Rgb::BACKGROUND {
                continue;
            }
            if let Some(c) = buf.cell_mut((area.x + col, area.y + row)) {
                c.set_bg(color.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_center_is_lifted_edges_are_background() {
        let bounds = Bounds::new(800.0, 600.0);
        assert_eq!(vignette_at(bounds.center(), bounds), Rgb::new(12, 12, 14));
        assert_eq!(vignette_at(Point::new(0.0, 0.0), bounds), Rgb::BACKGROUND);
    }

    #[test]
    fn test_render_tints_only_the_middle() {
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        render(&mut buf, area, (8.0, 16.0));
        assert_ne!(buf[(20, 6)].bg, Color::Reset);
        assert_eq!(buf[(0, 0)].bg, Color::Reset);
    }
}
