use std::ops::Range;

use glam::DVec2;
use rand::Rng;

use crate::config::{FieldConfig, Interaction};

/// Logical drawing extent; positions live in `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    pub fn clamp(&self, p: DVec2) -> DVec2 {
        p.clamp(DVec2::ZERO, DVec2::new(self.width, self.height))
    }

    fn random_point<R: Rng>(&self, rng: &mut R) -> DVec2 {
        DVec2::new(rng.gen::<f64>() * self.width, rng.gen::<f64>() * self.height)
    }
}

/// Axes whose velocity component was reversed by a bounce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub opacity: f64,
    /// Frames left before respawn; `None` when the preset has no lifetime.
    pub life: Option<u32>,
}

impl Particle {
    pub fn spawn<R: Rng>(rng: &mut R, bounds: Bounds, config: &FieldConfig) -> Self {
        let position = bounds.random_point(rng);
        let radius = sample(rng, &config.radius);
        let velocity = random_velocity(rng, config.speed);
        let opacity = sample(rng, &config.opacity);
        let life = config.lifetime.as_ref().map(|range| sample_life(rng, range));
        Self {
            position,
            velocity,
            radius,
            opacity,
            life,
        }
    }

    /// Reset in place; radius and opacity survive.
    pub fn respawn<R: Rng>(&mut self, rng: &mut R, bounds: Bounds, config: &FieldConfig) {
        self.position = bounds.random_point(rng);
        self.velocity = random_velocity(rng, config.speed);
        self.life = config.lifetime.as_ref().map(|range| sample_life(rng, range));
    }

    pub fn attract(&mut self, pointer: DVec2, interaction: &Interaction) {
        let delta = pointer - self.position;
        let distance = delta.length();
        if distance <= 0.0 || distance >= interaction.radius {
            return;
        }
        let force = (interaction.radius - distance) / interaction.radius;
        self.velocity += delta * (force * interaction.strength / distance);
    }

    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }

    pub fn bounce(&mut self, bounds: Bounds, damping: f64) -> Bounce {
        let mut hit = Bounce::default();
        if self.position.x < 0.0 || self.position.x > bounds.width {
            self.velocity.x *= -damping;
            hit.x = true;
        }
        if self.position.y < 0.0 || self.position.y > bounds.height {
            self.velocity.y *= -damping;
            hit.y = true;
        }
        self.position = bounds.clamp(self.position);
        hit
    }

    /// Counts one frame off the lifetime. Returns `true` once it is spent.
    pub fn age(&mut self) -> bool {
        match self.life.as_mut() {
            Some(life) => {
                *life = life.saturating_sub(1);
                *life == 0
            }
            None => false,
        }
    }
}

fn sample<R: Rng>(rng: &mut R, range: &Range<f64>) -> f64 {
    if range.is_empty() {
        range.start
    } else {
        rng.gen_range(range.clone())
    }
}

fn sample_life<R: Rng>(rng: &mut R, range: &Range<u32>) -> u32 {
    if range.is_empty() {
        range.start.max(1)
    } else {
        rng.gen_range(range.clone()).max(1)
    }
}

fn random_velocity<R: Rng>(rng: &mut R, speed: f64) -> DVec2 {
    let span = -speed..speed;
    DVec2::new(sample(rng, &span), sample(rng, &span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn dot(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle {
            position: DVec2::new(x, y),
            velocity: DVec2::new(vx, vy),
            radius: 1.0,
            opacity: 0.5,
            life: None,
        }
    }

    #[test]
    fn spawn_respects_config_ranges() {
        let mut rng = SmallRng::seed_from_u64(7);
        let cfg = FieldConfig::rich();
        let bounds = Bounds::new(400.0, 300.0);
        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, bounds, &cfg);
            assert!(bounds.contains(p.position));
            assert!(cfg.radius.contains(&p.radius));
            assert!(cfg.opacity.contains(&p.opacity));
            assert!(p.velocity.x.abs() <= cfg.speed && p.velocity.y.abs() <= cfg.speed);
            assert!((50..150).contains(&p.life.unwrap()));
        }
    }

    #[test]
    fn bounce_damps_and_clamps() {
        let mut p = dot(401.0, 150.0, 2.0, 0.0);
        let hit = p.bounce(Bounds::new(400.0, 300.0), 0.8);
        assert_eq!(hit, Bounce { x: true, y: false });
        assert_eq!(p.velocity, DVec2::new(-1.6, 0.0));
        assert_eq!(p.position, DVec2::new(400.0, 150.0));
    }

    #[test]
    fn bounce_inside_is_noop() {
        let mut p = dot(10.0, 10.0, -1.0, 1.0);
        assert_eq!(p.bounce(Bounds::new(20.0, 20.0), 0.8), Bounce::default());
        assert_eq!(p.velocity, DVec2::new(-1.0, 1.0));
    }

    #[test]
    fn attraction_pulls_toward_pointer() {
        let mut p = dot(50.0, 50.0, 0.0, 0.0);
        p.attract(DVec2::new(100.0, 50.0), &Interaction::default());
        // force = (100 - 50) / 100 = 0.5, scaled by 0.01 along +x
        assert!((p.velocity.x - 0.005).abs() < 1e-12);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn attraction_ignores_far_or_coincident_pointer() {
        let mut p = dot(0.0, 0.0, 0.1, 0.1);
        p.attract(DVec2::new(100.0, 0.0), &Interaction::default());
        p.attract(DVec2::new(0.0, 0.0), &Interaction::default());
        assert_eq!(p.velocity, DVec2::new(0.1, 0.1));
    }

    #[test]
    fn respawn_keeps_look() {
        let mut rng = SmallRng::seed_from_u64(1);
        let cfg = FieldConfig::rich();
        let mut p = dot(5.0, 5.0, 0.0, 0.0);
        p.radius = 2.0;
        p.opacity = 0.4;
        p.life = Some(0);
        p.respawn(&mut rng, Bounds::new(400.0, 300.0), &cfg);
        assert_eq!((p.radius, p.opacity), (2.0, 0.4));
        assert!((50..150).contains(&p.life.unwrap()));
    }

    #[test]
    fn age_counts_down_to_zero() {
        let mut p = dot(0.0, 0.0, 0.0, 0.0);
        p.life = Some(2);
        assert!(!p.age());
        assert!(p.age());
        assert!(!dot(0.0, 0.0, 0.0, 0.0).age());
    }
}
