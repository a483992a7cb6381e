use rand::{rngs::StdRng, SeedableRng};
use solarsim::command::{Command, Outcome};
use solarsim::error::CommandError;
use solarsim::model::{Body, SolarSystem, SpinRates};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::f64::consts::TAU;

fn single(radius: f32, speed: f32) -> SolarSystem {
    SolarSystem::from_bodies(
        vec![Body::central("Sun", 0.5), Body::orbiting("Earth", radius, speed, 0.0, 2.0)],
        0.01,
    )
}

fn assert_near(a: impl Into<f64>, b: impl Into<f64>, eps: f64) {
    let (a, b) = (a.into(), b.into());
    assert!((a - b).abs() <= eps, "{a} vs {b}");
}

#[test]
fn doubled_multiplier_covers_a_quarter_orbit_in_half_the_time() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut sys = single(16.0, 1.0);
    Command::SetSpeedMultiplier { body: "earth".into(), value: 2.0 }
        .apply(&mut sys, &mut rng)
        .unwrap();
    sys.update(FRAC_PI_4);
    let p = sys.body("Earth").unwrap().position();
    assert_near(p.x, 0.0, 1e-4);
    assert_near(p.z, 16.0, 1e-4);
}

#[test]
fn many_small_steps_match_one_big_step() {
    let mut stepped = single(20.0, 0.6);
    let mut whole = stepped.clone();
    for _ in 0..600 {
        stepped.update(1.0 / 60.0);
    }
    whole.update(10.0);
    let a = stepped.body("Earth").unwrap();
    let b = whole.body("Earth").unwrap();
    assert_near(a.angle(), b.angle(), 1e-3);
    assert!((a.position() - b.position()).length() < 1e-2);
}

#[test]
fn planets_stay_on_their_circles() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut sys = SolarSystem::from_catalog(SpinRates::default(), &mut rng);
    for i in 0..500 {
        sys.update(0.016 + (i % 7) as f32 * 0.003);
    }
    for b in sys.planets() {
        let p = b.position();
        assert_eq!(p.y, 0.0);
        assert_near(p.length(), b.orbital_radius(), 1e-3);
    }
    let sun = sys.body("Sun").unwrap();
    assert_eq!(sun.position(), glam::Vec3::ZERO);
    assert!(sun.axial_spin() > 0.0);
}

#[test]
fn paused_system_ignores_time() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut sys = SolarSystem::from_catalog(SpinRates::default(), &mut rng);
    assert_eq!(
        Command::TogglePause.apply(&mut sys, &mut rng),
        Ok(Outcome::Running(false))
    );
    let frozen = sys.clone();
    for _ in 0..100 {
        sys.update(0.1);
    }
    assert_eq!(sys, frozen);

    Command::SetRunning(true).apply(&mut sys, &mut rng).unwrap();
    sys.update(0.1);
    assert_ne!(sys, frozen);
}

#[test]
fn reset_rerolls_phases_and_clears_multipliers() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut sys = SolarSystem::from_catalog(SpinRates::default(), &mut rng);
    for name in ["Mercury", "Jupiter", "Neptune"] {
        Command::SetSpeedMultiplier { body: name.into(), value: 4.5 }
            .apply(&mut sys, &mut rng)
            .unwrap();
    }
    sys.update(3.0);
    let radii: Vec<f32> = sys.planets().map(|b| b.orbital_radius()).collect();

    assert_eq!(Command::Reset.apply(&mut sys, &mut rng), Ok(Outcome::Reset));
    assert!(sys.is_running());
    for (b, r) in sys.planets().zip(radii) {
        assert_eq!(b.speed_multiplier(), 1.0);
        assert_eq!(b.orbital_radius(), r);
        assert!((0.0..TAU).contains(&b.angle()));
        assert_near(b.position().length(), r, 1e-3);
    }
}

#[test]
fn rejected_commands_leave_state_alone() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut sys = SolarSystem::from_catalog(SpinRates::default(), &mut rng);
    let before = sys.clone();

    let err = Command::SetSpeedMultiplier { body: "Pluto".into(), value: 1.0 }
        .apply(&mut sys, &mut rng)
        .unwrap_err();
    assert_eq!(err, CommandError::UnknownBody("Pluto".into()));

    let err = Command::SetSpeedMultiplier { body: "Mars".into(), value: 5.5 }
        .apply(&mut sys, &mut rng)
        .unwrap_err();
    assert!(matches!(err, CommandError::MultiplierOutOfRange { .. }));

    let err = Command::SetSpeedMultiplier { body: "Sun".into(), value: 2.0 }
        .apply(&mut sys, &mut rng)
        .unwrap_err();
    assert!(matches!(err, CommandError::Stationary(_)));

    assert_eq!(sys, before);
}

#[test]
fn quarter_turn_from_rest() {
    let mut sys = single(16.0, 1.0);
    sys.update(FRAC_PI_2);
    let e = sys.body("Earth").unwrap();
    assert_near(e.angle(), FRAC_PI_2, 1e-5);
    assert_near(e.position().z, 16.0, 1e-4);
}

#[test]
fn hours_into_a_run_the_orbit_keeps_its_rate() {
    let mut sys = SolarSystem::from_bodies(
        vec![Body::central("Sun", 0.5), Body::orbiting("Earth", 16.0, 1.0, 300_000.0, 2.0)],
        0.01,
    );
    for _ in 0..60 {
        sys.update(1.0 / 60.0);
    }
    let earth = sys.body("Earth").unwrap();
    assert_near(earth.angle() - 300_000.0, 1.0, 1e-5);
    assert_near(earth.position().length(), 16.0, 1e-3);
}
