use glam::{Mat3, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Half the edge length of the cube the stars are scattered in.
const EXTENT: f32 = 1000.0;

#[derive(Clone, Copy, Debug)]
pub struct Star {
    pub pos: Vec3,
    /// Base brightness, 0..1.
    pub mag: f32,
}

pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5A17_5A17);
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec3::new(
                    rng.gen_range(-EXTENT..EXTENT),
                    rng.gen_range(-EXTENT..EXTENT),
                    rng.gen_range(-EXTENT..EXTENT),
                ),
                mag: rng.gen_range(0.35..1.0),
            })
            .collect();
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Star positions after the field's ambient rotation about Y.
    pub fn rotated(&self, rotation: f32) -> impl Iterator<Item = Star> + '_ {
        let m = Mat3::from_rotation_y(rotation);
        self.stars.iter().map(move |s| Star { pos: m * s.pos, mag: s.mag })
    }
}
