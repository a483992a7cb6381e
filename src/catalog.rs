//! Static body catalog: the sun plus eight planets.

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn hex(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    pub fn to_color(self) -> Color {
        Color::Rgb { r: self.r, g: self.g, b: self.b }
    }

    pub fn scale(self, t: f32) -> Rgb {
        let t = t.max(0.0);
        Rgb {
            r: (self.r as f32 * t).clamp(0.0, 255.0) as u8,
            g: (self.g as f32 * t).clamp(0.0, 255.0) as u8,
            b: (self.b as f32 * t).clamp(0.0, 255.0) as u8,
        }
    }

    pub fn mix(self, o: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let l = |a: u8, b: u8| -> u8 {
            (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgb { r: l(self.r, o.r), g: l(self.g, o.g), b: l(self.b, o.b) }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BodySpec {
    pub name: &'static str,
    /// Display radius in scene units.
    pub size: f32,
    /// Orbital radius; zero for the sun.
    pub distance: f32,
    /// Base angular speed, rad per second.
    pub speed: f32,
    pub color: Rgb,
    pub info: &'static str,
}

pub const SUN: BodySpec = BodySpec {
    name: "Sun",
    size: 2.0,
    distance: 0.0,
    speed: 0.0,
    color: Rgb::hex(0xFFFF00),
    info: "The center of our solar system. Surface temperature: 5,778K",
};

pub const PLANETS: [BodySpec; 8] = [
    BodySpec {
        name: "Mercury",
        size: 0.8,
        distance: 8.0,
        speed: 4.15,
        color: Rgb::hex(0x8C7853),
        info: "Closest planet to the Sun. Surface temperature: 427°C",
    },
    BodySpec {
        name: "Venus",
        size: 1.2,
        distance: 12.0,
        speed: 1.62,
        color: Rgb::hex(0xFFA500),
        info: "Hottest planet in our solar system. Thick toxic atmosphere.",
    },
    BodySpec {
        name: "Earth",
        size: 1.3,
        distance: 16.0,
        speed: 1.0,
        color: Rgb::hex(0x6B93D6),
        info: "Our home planet. 71% of surface covered by water.",
    },
    BodySpec {
        name: "Mars",
        size: 1.0,
        distance: 20.0,
        speed: 0.53,
        color: Rgb::hex(0xCD5C5C),
        info: "The Red Planet. Has the largest volcano in the solar system.",
    },
    BodySpec {
        name: "Jupiter",
        size: 3.2,
        distance: 28.0,
        speed: 0.084,
        color: Rgb::hex(0xD8CA9D),
        info: "Largest planet. Has over 80 moons including Europa and Io.",
    },
    BodySpec {
        name: "Saturn",
        size: 2.8,
        distance: 36.0,
        speed: 0.034,
        color: Rgb::hex(0xFAD5A5),
        info: "Famous for its prominent ring system. Less dense than water.",
    },
    BodySpec {
        name: "Uranus",
        size: 2.2,
        distance: 44.0,
        speed: 0.012,
        color: Rgb::hex(0x4FD0E3),
        info: "Tilted on its side. Coldest planetary atmosphere in solar system.",
    },
    BodySpec {
        name: "Neptune",
        size: 2.1,
        distance: 52.0,
        speed: 0.006,
        color: Rgb::hex(0x4B70DD),
        info: "Windiest planet. Winds can reach speeds of 2,100 km/h.",
    },
];

/// Catalog entry for `name`, sun included. Case-insensitive.
pub fn lookup(name: &str) -> Option<&'static BodySpec> {
    std::iter::once(&SUN)
        .chain(PLANETS.iter())
        .find(|b| b.name.eq_ignore_ascii_case(name))
}
