//! Orbital motion model.
//!
//! Every planet moves on a fixed-radius circle in the XZ plane at
//! `base_angular_speed * speed_multiplier` rad/s. The sun sits at the origin
//! and only spins. Nothing here can fail except command validation.
//!
//! Phases and clocks accumulate in `f64` so long runs keep their rate.

use crate::catalog::{BodySpec, PLANETS, SUN};
use crate::error::{CommandError, CommandResult};
use glam::Vec3;
use rand::Rng;
use std::f64::consts::TAU;

pub const SPEED_MULTIPLIER_MIN: f32 = 0.1;
pub const SPEED_MULTIPLIER_MAX: f32 = 5.0;

/// Self-rotation rates, rad/s. One shared rate for every planet regardless of
/// its orbital speed, a slower one for the sun, and the ambient starfield drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinRates {
    pub planet: f32,
    pub sun: f32,
    pub starfield: f32,
}

impl Default for SpinRates {
    fn default() -> Self {
        Self {
            planet: 2.0,
            sun: 0.5,
            starfield: 0.01,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    name: &'static str,
    orbital_radius: f32,
    base_angular_speed: f32,
    speed_multiplier: f32,
    angle: f64,
    axial_spin: f64,
    spin_rate: f32,
    position: Vec3,
}

impl Body {
    pub fn orbiting(
        name: &'static str,
        orbital_radius: f32,
        base_angular_speed: f32,
        angle: f64,
        spin_rate: f32,
    ) -> Self {
        let mut b = Self {
            name,
            orbital_radius: orbital_radius.max(0.0),
            base_angular_speed,
            speed_multiplier: 1.0,
            angle,
            axial_spin: 0.0,
            spin_rate,
            position: Vec3::ZERO,
        };
        b.place();
        b
    }

    /// A body pinned to the origin.
    pub fn central(name: &'static str, spin_rate: f32) -> Self {
        Self::orbiting(name, 0.0, 0.0, 0.0, spin_rate)
    }

    fn from_spec(spec: &BodySpec, angle: f64, spin_rate: f32) -> Self {
        Self::orbiting(spec.name, spec.distance, spec.speed, angle, spin_rate)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn orbital_radius(&self) -> f32 {
        self.orbital_radius
    }
    pub fn base_angular_speed(&self) -> f32 {
        self.base_angular_speed
    }
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }
    pub fn angle(&self) -> f64 {
        self.angle
    }
    pub fn axial_spin(&self) -> f64 {
        self.axial_spin
    }
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orbits(&self) -> bool {
        self.orbital_radius > 0.0
    }

    /// Effective angular rate after the user multiplier.
    pub fn angular_speed(&self) -> f32 {
        self.base_angular_speed * self.speed_multiplier
    }

    fn advance(&mut self, dt: f64) {
        if self.orbits() {
            self.angle += self.base_angular_speed as f64 * self.speed_multiplier as f64 * dt;
            self.place();
        }
        self.axial_spin += dt * self.spin_rate as f64;
    }

    fn place(&mut self) {
        let (s, c) = self.angle.sin_cos();
        let r = self.orbital_radius as f64;
        self.position = Vec3::new((c * r) as f32, 0.0, (s * r) as f32);
    }
}

/// The single owned simulation state. Index 0 is always the central body.
#[derive(Clone, Debug, PartialEq)]
pub struct SolarSystem {
    bodies: Vec<Body>,
    starfield_rotation: f64,
    starfield_rate: f32,
    sim_time: f64,
    running: bool,
}

impl SolarSystem {
    /// Sun plus the eight catalog planets, each at a random phase.
    pub fn from_catalog<R: Rng + ?Sized>(rates: SpinRates, rng: &mut R) -> Self {
        let mut bodies = Vec::with_capacity(PLANETS.len() + 1);
        bodies.push(Body::from_spec(&SUN, 0.0, rates.sun));
        for p in PLANETS.iter() {
            bodies.push(Body::from_spec(p, rng.gen_range(0.0..TAU), rates.planet));
        }
        Self::from_bodies(bodies, rates.starfield)
    }

    pub fn from_bodies(bodies: Vec<Body>, starfield_rate: f32) -> Self {
        Self {
            bodies,
            starfield_rotation: 0.0,
            starfield_rate,
            sim_time: 0.0,
            running: true,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name.eq_ignore_ascii_case(name))
    }

    pub fn planets(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.orbits())
    }

    pub fn starfield_rotation(&self) -> f64 {
        self.starfield_rotation
    }

    /// Simulated seconds spent running.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Flips run/pause and returns the new running state.
    pub fn toggle_pause(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    pub fn update(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        let dt = dt as f64;
        for b in &mut self.bodies {
            b.advance(dt);
        }
        self.starfield_rotation += dt * self.starfield_rate as f64;
        self.sim_time += dt;
    }

    /// New random phase for each orbiting body, multipliers back to 1.0.
    /// Radii, base speeds, spin and the pause flag are kept.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for b in &mut self.bodies {
            if b.orbits() {
                b.angle = rng.gen_range(0.0..TAU);
            }
            b.speed_multiplier = 1.0;
            b.place();
        }
    }

    pub fn set_speed_multiplier(&mut self, name: &str, value: f32) -> CommandResult<()> {
        let body = self
            .bodies
            .iter_mut()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CommandError::UnknownBody(name.to_string()))?;
        if !body.orbits() {
            return Err(CommandError::Stationary(body.name.to_string()));
        }
        if !value.is_finite() || !(SPEED_MULTIPLIER_MIN..=SPEED_MULTIPLIER_MAX).contains(&value) {
            return Err(CommandError::MultiplierOutOfRange {
                body: body.name.to_string(),
                value,
                min: SPEED_MULTIPLIER_MIN,
                max: SPEED_MULTIPLIER_MAX,
            });
        }
        body.speed_multiplier = value;
        Ok(())
    }
}
