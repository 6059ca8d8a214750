use ambient_fx::{Bounds, DVec2, FieldConfig, Particle, ParticleField};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn particle(position: DVec2, velocity: DVec2, life: Option<u32>) -> Particle {
    Particle {
        position,
        velocity,
        radius: 1.0,
        opacity: 0.5,
        life,
    }
}

fn single(config: FieldConfig, bounds: Bounds, p: Particle) -> ParticleField {
    ParticleField::from_particles(config, bounds, vec![p], SmallRng::seed_from_u64(3))
}

#[test]
fn thousand_frames_stay_in_bounds() {
    let bounds = Bounds::new(400.0, 300.0);
    let config = FieldConfig::rich().with_count(60);
    let mut field = ParticleField::seeded(config, bounds, 2024);
    for _ in 0..1000 {
        field.step();
        assert_eq!(field.len(), 60);
        for p in field.particles() {
            assert!(bounds.contains(p.position), "escaped: {:?}", p.position);
        }
    }
}

#[test]
fn simple_preset_stays_in_bounds_with_fixed_population() {
    let bounds = Bounds::new(320.0, 180.0);
    let mut field = ParticleField::seeded(FieldConfig::simple(), bounds, 9);
    for _ in 0..2000 {
        field.step();
    }
    assert_eq!(field.len(), 60);
    assert!(field.particles().iter().all(|p| bounds.contains(p.position)));
    assert!(field.particles().iter().all(|p| p.life.is_none()));
}

#[test]
fn pointer_near_every_particle_keeps_them_in_bounds() {
    let bounds = Bounds::new(200.0, 200.0);
    let mut field = ParticleField::seeded(FieldConfig::rich(), bounds, 11);
    field.set_pointer(Some(DVec2::new(199.0, 1.0)));
    for _ in 0..1000 {
        field.step();
    }
    assert!(field.particles().iter().all(|p| bounds.contains(p.position)));
}

#[test]
fn right_edge_bounce_damps_and_clamps() {
    let bounds = Bounds::new(400.0, 300.0);
    let p = particle(DVec2::new(399.0, 150.0), DVec2::new(2.0, 0.0), Some(100));
    let mut field = single(FieldConfig::rich(), bounds, p);
    field.step();
    let p = &field.particles()[0];
    assert_eq!(p.velocity, DVec2::new(-2.0 * 0.8, 0.0));
    assert!(p.position.x <= 400.0);
    assert_eq!(p.position.y, 150.0);
}

#[test]
fn simple_preset_reflects_exactly() {
    let bounds = Bounds::new(400.0, 300.0);
    let p = particle(DVec2::new(1.0, 299.5), DVec2::new(-2.0, 1.0), None);
    let mut field = single(FieldConfig::simple(), bounds, p);
    field.step();
    let p = &field.particles()[0];
    assert_eq!(p.velocity, DVec2::new(2.0, -1.0));
    assert_eq!(p.position, DVec2::new(0.0, 300.0));
}

#[test]
fn velocity_flips_only_on_the_crossing_step() {
    let bounds = Bounds::new(100.0, 100.0);
    let p = particle(DVec2::new(95.0, 50.0), DVec2::new(2.0, 0.0), None);
    let mut field = single(FieldConfig::simple(), bounds, p);

    field.step(); // 97
    field.step(); // 99
    assert_eq!(field.particles()[0].velocity.x, 2.0);
    field.step(); // 101 -> flip, clamp to 100
    assert_eq!(field.particles()[0].velocity.x, -2.0);
    assert_eq!(field.particles()[0].position.x, 100.0);
    field.step(); // 98
    assert_eq!(field.particles()[0].velocity.x, -2.0);
    assert_eq!(field.particles()[0].position.x, 98.0);
}

#[test]
fn motion_is_linear_between_bounces_without_pointer() {
    let bounds = Bounds::new(1000.0, 1000.0);
    let start = DVec2::new(100.0, 200.0);
    let velocity = DVec2::new(0.25, -0.125);
    let p = particle(start, velocity, Some(10_000));
    let mut field = single(FieldConfig::rich(), bounds, p);
    field.set_pointer(Some(DVec2::new(900.0, 900.0)));

    for t in 1..=500_u32 {
        field.step();
        let expected = start + velocity * f64::from(t);
        let actual = field.particles()[0].position;
        assert!((actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9);
        assert_eq!(field.particles()[0].velocity, velocity);
    }
}

#[test]
fn pointer_inside_radius_changes_velocity() {
    let bounds = Bounds::new(400.0, 300.0);
    let p = particle(DVec2::new(100.0, 100.0), DVec2::ZERO, Some(100));
    let mut field = single(FieldConfig::rich(), bounds, p);
    field.set_pointer(Some(DVec2::new(150.0, 100.0)));
    field.step();
    assert!(field.particles()[0].velocity.x > 0.0);

    // Attraction is a rich-preset feature.
    let p = particle(DVec2::new(100.0, 100.0), DVec2::ZERO, None);
    let mut field = single(FieldConfig::simple(), bounds, p);
    field.set_pointer(Some(DVec2::new(150.0, 100.0)));
    field.step();
    assert_eq!(field.particles()[0].velocity, DVec2::ZERO);
}

#[test]
fn expired_particle_respawns_in_place() {
    let bounds = Bounds::new(400.0, 300.0);
    let p = particle(DVec2::new(10.0, 10.0), DVec2::ZERO, Some(1));
    let mut field = single(FieldConfig::rich(), bounds, p);
    field.step();

    let p = &field.particles()[0];
    assert_eq!(field.len(), 1);
    let life = p.life.expect("rich particles carry a lifetime");
    assert!((50..150).contains(&life));
    assert!(bounds.contains(p.position));
    assert!(p.velocity.x.abs() <= 0.25 && p.velocity.y.abs() <= 0.25);
    assert_eq!((p.radius, p.opacity), (1.0, 0.5));
}

#[test]
fn same_seed_same_trajectories() {
    let bounds = Bounds::new(400.0, 300.0);
    let mut a = ParticleField::seeded(FieldConfig::rich(), bounds, 77);
    let mut b = ParticleField::seeded(FieldConfig::rich(), bounds, 77);
    for _ in 0..300 {
        a.step();
        b.step();
    }
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn tick_at_sixty_hz_matches_step() {
    let bounds = Bounds::new(400.0, 300.0);
    let mut ticked = ParticleField::seeded(FieldConfig::rich(), bounds, 5);
    let mut stepped = ParticleField::seeded(FieldConfig::rich(), bounds, 5);
    let frame = ticked.config().frame_ms;
    // A hair over one frame so float drift never skips a step.
    let mut steps = 0;
    for _ in 0..120 {
        steps += ticked.tick(frame + 1e-6);
    }
    for _ in 0..steps {
        stepped.step();
    }
    assert_eq!(steps, 120);
    assert_eq!(ticked.particles(), stepped.particles());
}

#[test]
fn draw_paints_every_particle_with_its_opacity() {
    use ambient_fx::surface::{DrawCall, RecordingSurface};

    let bounds = Bounds::new(400.0, 300.0);
    let mut field = ParticleField::seeded(FieldConfig::rich(), bounds, 8);
    field.step();
    let mut surface = RecordingSurface::default();
    field.draw(&mut surface);

    assert_eq!(surface.calls.len(), field.len() + 1);
    assert_eq!(surface.calls[0], DrawCall::Clear(bounds));
    for (call, p) in surface.calls[1..].iter().zip(field.particles()) {
        assert_eq!(
            call,
            &DrawCall::Circle {
                center: p.position,
                radius: p.radius,
                fill: format!("rgba(255, 255, 255, {})", p.opacity),
            }
        );
    }
}
