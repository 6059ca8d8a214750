//! The particle field: a fixed population advanced in fixed steps.

use glam::DVec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::FieldConfig;
use crate::particle::{Bounds, Particle};
use crate::surface::Surface;

pub struct ParticleField<R = SmallRng> {
    config: FieldConfig,
    bounds: Bounds,
    particles: Vec<Particle>,
    pointer: Option<DVec2>,
    rng: R,
    /// Elapsed time not yet consumed by whole steps.
    backlog_ms: f64,
}

impl ParticleField<SmallRng> {
    pub fn seeded(config: FieldConfig, bounds: Bounds, seed: u64) -> Self {
        Self::new(config, bounds, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticleField<R> {
    pub fn new(config: FieldConfig, bounds: Bounds, mut rng: R) -> Self {
        let particles = (0..config.count)
            .map(|_| Particle::spawn(&mut rng, bounds, &config))
            .collect();
        log::debug!(
            "particle field: {} particles in {}x{}",
            config.count,
            bounds.width,
            bounds.height
        );
        Self {
            config,
            bounds,
            particles,
            pointer: None,
            rng,
            backlog_ms: 0.0,
        }
    }

    /// Build a field around hand-placed particles. Bounds are enforced on
    /// the next step, not here.
    pub fn from_particles(
        config: FieldConfig,
        bounds: Bounds,
        particles: Vec<Particle>,
        rng: R,
    ) -> Self {
        Self {
            config,
            bounds,
            particles,
            pointer: None,
            rng,
            backlog_ms: 0.0,
        }
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self) {
        let Self {
            config,
            bounds,
            particles,
            pointer,
            rng,
            ..
        } = self;
        let attraction = pointer.zip(config.interaction.as_ref());

        for p in particles.iter_mut() {
            if let Some((pointer, interaction)) = attraction {
                p.attract(pointer, interaction);
            }
            p.integrate();
            p.bounce(*bounds, config.damping);
            if p.age() {
                p.respawn(&mut *rng, *bounds, config);
            }
        }
    }

    /// Feed wall-clock time into the fixed-step loop. Returns the number of
    /// steps run.
    pub fn tick(&mut self, elapsed_ms: f64) -> u32 {
        let advanced = elapsed_ms.is_finite() && elapsed_ms > 0.0;
        let frame_ms = self.config.frame_ms;
        if !(frame_ms.is_finite() && frame_ms > 0.0) {
            // No usable step length: one step per frame that moved the clock.
            if advanced {
                self.step();
                return 1;
            }
            return 0;
        }
        if advanced {
            self.backlog_ms += elapsed_ms;
        }
        let mut steps = 0;
        while self.backlog_ms >= frame_ms && steps < self.config.max_steps_per_tick {
            self.step();
            self.backlog_ms -= frame_ms;
            steps += 1;
        }
        if steps == self.config.max_steps_per_tick && self.backlog_ms >= frame_ms {
            // Throttled tab: forget the rest instead of fast-forwarding.
            log::trace!("dropping {:.1}ms of particle backlog", self.backlog_ms);
            self.backlog_ms %= frame_ms;
        }
        steps
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) {
        surface.clear(self.bounds);
        for p in &self.particles {
            surface.fill_circle(p.position, p.radius, &self.config.fill_style(p.opacity));
        }
    }

    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        for p in &mut self.particles {
            p.position = bounds.clamp(p.position);
        }
    }

    pub fn set_pointer(&mut self, pointer: Option<DVec2>) {
        self.pointer = pointer;
    }

    pub fn pointer(&self) -> Option<DVec2> {
        self.pointer
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, RecordingSurface};

    fn field() -> ParticleField {
        ParticleField::seeded(FieldConfig::rich(), Bounds::new(400.0, 300.0), 42)
    }

    #[test]
    fn tick_runs_whole_steps_and_keeps_remainder() {
        let mut f = field();
        let frame = f.config().frame_ms;
        assert_eq!(f.tick(frame * 0.5), 0);
        assert_eq!(f.tick(frame * 0.6), 1);
        assert_eq!(f.tick(frame * 2.0), 2);
    }

    #[test]
    fn tick_caps_catch_up() {
        let mut f = field();
        assert_eq!(f.tick(10_000.0), 4);
        assert_eq!(f.tick(0.0), 0);
    }

    #[test]
    fn tick_ignores_bad_elapsed() {
        let mut f = field();
        assert_eq!(f.tick(-50.0), 0);
        assert_eq!(f.tick(f64::NAN), 0);
    }

    #[test]
    fn tick_without_step_length_still_moves() {
        let mut cfg = FieldConfig::rich();
        cfg.frame_ms = 0.0;
        let mut f = ParticleField::seeded(cfg, Bounds::new(400.0, 300.0), 3);
        let before = f.particles().to_vec();
        for _ in 0..100 {
            assert_eq!(f.tick(16.0), 1);
        }
        assert_eq!(f.tick(0.0), 0);
        assert_ne!(f.particles(), before.as_slice());
        assert!(f
            .particles()
            .iter()
            .all(|p| p.position.is_finite() && f.bounds().contains(p.position)));

        f.config.frame_ms = f64::NAN;
        assert_eq!(f.tick(16.0), 1);
    }

    #[test]
    fn draw_clears_then_paints_each_particle() {
        let f = field();
        let mut surface = RecordingSurface::default();
        f.draw(&mut surface);
        assert_eq!(surface.calls[0], DrawCall::Clear(f.bounds()));
        assert_eq!(surface.circles().count(), f.len());
    }

    #[test]
    fn resize_reclamps_positions() {
        let mut f = field();
        let small = Bounds::new(50.0, 40.0);
        f.resize(small);
        assert!(f.particles().iter().all(|p| small.contains(p.position)));
    }
}
