//! Particle starfield (stateful).
//!
//! A fixed pool of point-masses drifts across the surface, wrapping at the
//! edges. Pairs closer than the connection distance are joined by a fading
//! line, and particles near the pointer are pushed away from it.

use std::f32::consts::TAU;

use neonfx_config::{Band, ParticleConfig};
use neonfx_core::{Bounds, Ink, NeonColor, Point, Rgb, Surface};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Colour of connection lines.
const CONNECTION_COLOR: NeonColor = NeonColor::ElectricBlue;

/// Horizontal spread of a shooting star's end point around its start.
const STREAK_SPREAD: f32 = 200.0;
/// Shortest vertical drop of a shooting star.
const STREAK_MIN_DROP: f32 = 50.0;

/// State for a single particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub color: NeonColor,
    pub opacity: f32,
    /// Drives the sinusoidal twinkle.
    pub phase: f32,
    /// Phase advance per tick.
    pub phase_speed: f32,
}

impl Particle {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A line to draw between two particles, by pool index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    /// `1 - distance / connection_distance`.
    pub opacity: f32,
}

/// A one-frame shooting star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Streak {
    pub from: Point,
    pub to: Point,
}

/// The particle pool and the surface size it lives on.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: ParticleConfig,
    bounds: Bounds,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Create an empty field; nothing is drawn until [`Self::initialize`].
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            bounds: Bounds::default(),
            particles: Vec::new(),
        }
    }

    /// Build a field from an explicit particle pool.
    pub fn with_particles(config: ParticleConfig, bounds: Bounds, particles: Vec<Particle>) -> Self {
        Self {
            config,
            bounds,
            particles,
        }
    }

    /// Seed `count` particles over `bounds`.
    ///
    /// An empty surface leaves the field untouched.
    pub fn initialize<R: Rng + ?Sized>(&mut self, count: usize, bounds: Bounds, rng: &mut R) {
        if bounds.is_empty() {
            log::debug!("particle field: no surface, skipping initialization");
            return;
        }

        self.bounds = bounds;
        self.particles = (0..count).map(|_| self.spawn(rng)).collect();
        log::debug!(
            "particle field: seeded {count} particles over {}x{}",
            bounds.width,
            bounds.height
        );
    }

    fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Particle {
        let heading = rng.random::<f32>() * TAU;
        let speed = sample(self.config.speed, rng);
        let color = self
            .config
            .palette
            .choose(rng)
            .copied()
            .unwrap_or_default();

        Particle {
            x: rng.random::<f32>() * self.bounds.width,
            y: rng.random::<f32>() * self.bounds.height,
            vx: heading.cos() * speed,
            vy: heading.sin() * speed,
            radius: sample(self.config.size, rng),
            color,
            opacity: sample(Band::new(0.2, 1.0), rng),
            phase: rng.random::<f32>() * TAU,
            phase_speed: sample(Band::new(0.01, 0.03), rng),
        }
    }

    /// Replace the surface size. Particles are kept where they are and are
    /// brought back into range by the next tick's wrap.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_initialized(&self) -> bool {
        !self.particles.is_empty()
    }

    /// Advance every particle by one tick.
    pub fn tick(&mut self, pointer: Option<Point>) {
        if self.bounds.is_empty() {
            return;
        }

        let influence = self.config.influence_radius;
        let strength = self.config.repulsion_strength;

        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;

            if let Some(pointer) = pointer {
                let dx = pointer.x - p.x;
                let dy = pointer.y - p.y;
                let distance = (dx * dx + dy * dy).sqrt();

                // No direction to push along when sitting exactly on the pointer
                if distance > 0.0 && distance < influence {
                    let force = (influence - distance) / influence;
                    p.x -= (dx / distance) * force * strength;
                    p.y -= (dy / distance) * force * strength;
                }
            }

            let wrapped = self.bounds.wrap(Point::new(p.x, p.y));
            p.x = wrapped.x;
            p.y = wrapped.y;

            p.phase = (p.phase + p.phase_speed) % TAU;
            p.opacity = 0.5 + p.phase.sin() * 0.3;
        }
    }

    /// Every pair closer than the connection distance.
    pub fn connections(&self) -> Vec<Connection> {
        let max = self.config.connection_distance;
        let mut out = Vec::new();

        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let distance = a.position().distance(b.position());
                if distance < max {
                    out.push(Connection {
                        a: i,
                        b: j,
                        opacity: 1.0 - distance / max,
                    });
                }
            }
        }

        out
    }

    /// Roll for a shooting star this frame.
    pub fn shooting_star<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Streak> {
        if self.bounds.is_empty() || rng.random::<f64>() >= self.config.shooting_star_chance {
            return None;
        }

        let start_x = rng.random::<f32>() * self.bounds.width;
        let end_x = start_x + rng.random::<f32>() * STREAK_SPREAD - STREAK_SPREAD / 2.0;
        let end_y = rng.random::<f32>() * STREAK_SPREAD + STREAK_MIN_DROP;

        Some(Streak {
            from: Point::new(start_x, 0.0),
            to: Point::new(end_x, end_y),
        })
    }

    /// Draw particles, connections and possibly a shooting star.
    pub fn render<S: Surface + ?Sized, R: Rng + ?Sized>(&self, surface: &mut S, rng: &mut R) {
        for p in &self.particles {
            surface.fill_circle(
                p.position(),
                p.radius,
                self.config.glow,
                Ink::new(p.color.rgb(), p.opacity),
            );
        }

        let line = CONNECTION_COLOR.rgb();
        for c in self.connections() {
            let ink = Ink::new(line, c.opacity * self.config.connection_alpha);
            surface.stroke_line(
                self.particles[c.a].position(),
                self.particles[c.b].position(),
                ink,
                ink,
            );
        }

        if let Some(streak) = self.shooting_star(rng) {
            surface.stroke_line(
                streak.from,
                streak.to,
                Ink::new(Rgb::WHITE, 1.0),
                Ink::new(Rgb::WHITE, 0.0),
            );
        }
    }
}

/// Uniform draw from `[min, max)`; a degenerate band yields `min`.
fn sample<R: Rng + ?Sized>(band: Band, rng: &mut R) -> f32 {
    band.min + (band.max - band.min) * rng.random::<f32>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use neonfx_core::PixelBuffer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Records draw calls instead of rasterizing them.
    #[derive(Default)]
    struct Recorder {
        bounds: Bounds,
        circles: Vec<(Point, Ink)>,
        lines: Vec<(Point, Point, Ink, Ink)>,
    }

    impl Surface for Recorder {
        fn bounds(&self) -> Bounds {
            self.bounds
        }

        fn clear(&mut self) {
            self.circles.clear();
            self.lines.clear();
        }

        fn fill_circle(&mut self, center: Point, _radius: f32, _glow: f32, ink: Ink) {
            self.circles.push((center, ink));
        }

        fn stroke_line(&mut self, from: Point, to: Point, start: Ink, end: Ink) {
            self.lines.push((from, to, start, end));
        }

        fn composite(&mut self, _layer: &PixelBuffer, _opacity: f32) {}
    }

    fn particle_at(x: f32, y: f32) -> Particle {
        Particle {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius: 1.0,
            color: NeonColor::Violet,
            opacity: 1.0,
            phase: 0.0,
            phase_speed: 0.0,
        }
    }

    fn quiet_config() -> ParticleConfig {
        ParticleConfig {
            shooting_star_chance: 0.0,
            ..ParticleConfig::default()
        }
    }

    #[test]
    fn test_initialize_seeds_within_bands() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = ParticleConfig::default();
        let mut field = ParticleField::new(config.clone());
        let bounds = Bounds::new(800.0, 600.0);
        field.initialize(150, bounds, &mut rng);

        assert_eq!(field.particles().len(), 150);
        for p in field.particles() {
            assert!(bounds.contains(p.position()));
            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            assert!(speed >= config.speed.min - 1e-4 && speed < config.speed.max + 1e-4);
            assert!(p.radius >= config.size.min && p.radius < config.size.max);
            assert!(config.palette.contains(&p.color));
        }
    }

    #[test]
    fn test_initialize_without_surface_is_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = ParticleField::new(ParticleConfig::default());
        field.initialize(150, Bounds::new(0.0, 0.0), &mut rng);
        assert!(!field.is_initialized());

        // Ticking and rendering an empty field does nothing
        field.tick(Some(Point::new(1.0, 1.0)));
        let mut recorder = Recorder::default();
        field.render(&mut recorder, &mut rng);
        assert!(recorder.circles.is_empty());
    }

    #[test]
    fn test_tick_wraps_to_opposite_edge() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut p = particle_at(99.5, 0.2);
        p.vx = 1.0;
        p.vy = -0.5;
        let mut field = ParticleField::with_particles(quiet_config(), bounds, vec![p]);

        field.tick(None);
        let p = &field.particles()[0];
        assert!((p.x - 0.5).abs() < 1e-4);
        assert!((p.y - 99.7).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_repels_along_connecting_vector() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let field_with = |x| ParticleField::with_particles(quiet_config(), bounds, vec![particle_at(x, 500.0)]);

        // 50px right of the pointer, radius 100, strength 2: pushed 1px further right
        let mut field = field_with(550.0);
        field.tick(Some(Point::new(500.0, 500.0)));
        let p = &field.particles()[0];
        assert!((p.x - 551.0).abs() < 1e-4);
        assert!((p.y - 500.0).abs() < 1e-4);

        // Outside the influence radius nothing happens
        let mut field = field_with(700.0);
        field.tick(Some(Point::new(500.0, 500.0)));
        assert_eq!(field.particles()[0].x, 700.0);
    }

    #[test]
    fn test_pointer_on_particle_does_not_produce_nan() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut field =
            ParticleField::with_particles(quiet_config(), bounds, vec![particle_at(50.0, 50.0)]);
        field.tick(Some(Point::new(50.0, 50.0)));
        let p = &field.particles()[0];
        assert_eq!((p.x, p.y), (50.0, 50.0));
    }

    #[test]
    fn test_opacity_follows_phase() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut p = particle_at(10.0, 10.0);
        p.phase = 0.0;
        p.phase_speed = std::f32::consts::FRAC_PI_2;
        let mut field = ParticleField::with_particles(quiet_config(), bounds, vec![p]);

        field.tick(None);
        assert!((field.particles()[0].opacity - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_connections_respect_threshold() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let particles = vec![
            particle_at(0.0, 0.0),
            particle_at(150.0, 0.0),  // exactly at the threshold from #0
            particle_at(0.0, 149.0),  // just inside from #0
            particle_at(0.0, 149.001), // nearly on top of #2
        ];
        let field = ParticleField::with_particles(quiet_config(), bounds, particles);
        let connections = field.connections();

        assert!(!connections.iter().any(|c| (c.a, c.b) == (0, 1)));
        let near = connections.iter().find(|c| (c.a, c.b) == (0, 2)).unwrap();
        assert!(near.opacity > 0.0 && near.opacity < 0.01);
        let touching = connections.iter().find(|c| (c.a, c.b) == (2, 3)).unwrap();
        assert!(touching.opacity > 0.99);

        for c in &connections {
            let d = field.particles()[c.a]
                .position()
                .distance(field.particles()[c.b].position());
            assert!(d < 150.0);
        }
    }

    #[test]
    fn test_render_draws_particles_and_lines() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = Bounds::new(1000.0, 1000.0);
        let particles = vec![particle_at(0.0, 0.0), particle_at(30.0, 40.0), particle_at(900.0, 900.0)];
        let field = ParticleField::with_particles(quiet_config(), bounds, particles);

        let mut recorder = Recorder {
            bounds,
            ..Default::default()
        };
        field.render(&mut recorder, &mut rng);

        assert_eq!(recorder.circles.len(), 3);
        assert_eq!(recorder.lines.len(), 1);
        let (_, _, start, _) = recorder.lines[0];
        // distance 50 of 150, scaled by the base line alpha
        assert!((start.alpha - (1.0 - 50.0 / 150.0) * 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_render_draws_fading_shooting_star() {
        let mut rng = StdRng::seed_from_u64(8);
        let bounds = Bounds::new(1000.0, 1000.0);
        let config = ParticleConfig {
            shooting_star_chance: 1.0,
            ..ParticleConfig::default()
        };
        let particles = vec![particle_at(0.0, 0.0), particle_at(900.0, 900.0)];
        let field = ParticleField::with_particles(config, bounds, particles);

        let mut recorder = Recorder {
            bounds,
            ..Default::default()
        };
        field.render(&mut recorder, &mut rng);

        assert_eq!(recorder.circles.len(), 2);
        assert_eq!(recorder.lines.len(), 1);
        let (from, to, start, end) = recorder.lines[0];
        assert_eq!(from.y, 0.0);
        assert!(to.y >= 50.0);
        assert_eq!(start, Ink::new(Rgb::WHITE, 1.0));
        assert_eq!(end, Ink::new(Rgb::WHITE, 0.0));
    }

    #[test]
    fn test_shooting_star_chance() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = Bounds::new(400.0, 300.0);

        let never = ParticleField::with_particles(quiet_config(), bounds, Vec::new());
        assert!((0..1000).all(|_| never.shooting_star(&mut rng).is_none()));

        let config = ParticleConfig {
            shooting_star_chance: 1.0,
            ..ParticleConfig::default()
        };
        let always = ParticleField::with_particles(config, bounds, Vec::new());
        for _ in 0..100 {
            let streak = always.shooting_star(&mut rng).unwrap();
            assert_eq!(streak.from.y, 0.0);
            assert!(streak.from.x >= 0.0 && streak.from.x < bounds.width);
            assert!((streak.to.x - streak.from.x).abs() <= 100.0);
            assert!(streak.to.y >= 50.0 && streak.to.y < 250.0);
        }
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = ParticleField::new(quiet_config());
        field.initialize(20, Bounds::new(800.0, 600.0), &mut rng);
        let before = field.particles().to_vec();

        let smaller = Bounds::new(200.0, 100.0);
        field.resize(smaller);
        assert_eq!(field.particles(), before.as_slice());

        field.tick(None);
        assert!(field.particles().iter().all(|p| smaller.contains(p.position())));
    }

    #[test]
    fn test_thousand_ticks_stay_finite_and_in_bounds() {
        let mut rng = StdRng::seed_from_u64(2024);
        let bounds = Bounds::new(1280.0, 720.0);
        let mut field = ParticleField::new(ParticleConfig::default());
        field.initialize(150, bounds, &mut rng);

        for i in 0..1000u32 {
            // Sweep the pointer around, occasionally landing on the corner
            let pointer = Point::new((i * 13 % 1280) as f32, (i * 7 % 720) as f32);
            field.tick(Some(pointer));
            for p in field.particles() {
                assert!(p.position().is_finite());
                assert!(p.opacity.is_finite());
                assert!(bounds.contains(p.position()), "{p:?} escaped after tick {i}");
            }
        }
    }
}
