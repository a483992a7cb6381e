use crate::model::SpinRates;
use crate::ui::Theme;
use anyhow::{ensure, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "solarsim")]
#[command(about = "Animated 3D solar system for the terminal", long_about = None)]
pub struct Args {
    /// settings file (JSON); defaults to the platform config dir
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// frame rate cap
    #[arg(long)]
    pub fps: Option<u32>,

    /// RNG seed for starting phases and the starfield
    #[arg(long)]
    pub seed: Option<u64>,

    /// number of background stars
    #[arg(long)]
    pub stars: Option<usize>,

    /// colour theme
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// write logs here (nothing is logged otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// hide orbit rings on start
    #[arg(long, default_value_t = false)]
    pub no_orbits: bool,

    /// hide body labels on start
    #[arg(long, default_value_t = false)]
    pub no_labels: bool,

    /// slowly orbit the camera on its own
    #[arg(long, default_value_t = false)]
    pub auto_rotate: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps_cap: u32,
    pub seed: Option<u64>,
    pub star_count: usize,
    pub planet_spin_rate: f32,
    pub sun_spin_rate: f32,
    pub starfield_rate: f32,
    /// Longest frame delta fed to the model, seconds.
    pub max_frame_dt: f32,
    pub theme: Theme,
    pub show_orbits: bool,
    pub show_labels: bool,
    pub auto_rotate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let rates = SpinRates::default();
        Self {
            fps_cap: 60,
            seed: None,
            star_count: 1500,
            planet_spin_rate: rates.planet,
            sun_spin_rate: rates.sun,
            starfield_rate: rates.starfield,
            max_frame_dt: 0.1,
            theme: Theme::Light,
            show_orbits: true,
            show_labels: true,
            auto_rotate: false,
        }
    }
}

impl Settings {
    pub fn spin_rates(&self) -> SpinRates {
        SpinRates {
            planet: self.planet_spin_rate,
            sun: self.sun_spin_rate,
            starfield: self.starfield_rate,
        }
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(fps) = args.fps {
            self.fps_cap = fps;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(n) = args.stars {
            self.star_count = n;
        }
        if let Some(t) = args.theme {
            self.theme = t;
        }
        if args.no_orbits {
            self.show_orbits = false;
        }
        if args.no_labels {
            self.show_labels = false;
        }
        if args.auto_rotate {
            self.auto_rotate = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!((1..=240).contains(&self.fps_cap), "fps_cap must be 1..=240, got {}", self.fps_cap);
        ensure!(
            self.star_count <= 100_000,
            "star_count {} is too large (max 100000)",
            self.star_count
        );
        for (name, v) in [
            ("planet_spin_rate", self.planet_spin_rate),
            ("sun_spin_rate", self.sun_spin_rate),
            ("starfield_rate", self.starfield_rate),
        ] {
            ensure!(
                v.is_finite() && v >= 0.0,
                "{name} must be a finite non-negative number, got {v}"
            );
        }
        ensure!(
            self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0,
            "max_frame_dt must be positive, got {}",
            self.max_frame_dt
        );
        Ok(())
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "solarsim", "solarsim").map(|p| p.config_dir().join("settings.json"))
}

/// Read settings from `path`. A missing file yields defaults unless
/// `required` is set; a malformed one is always an error.
pub fn load_settings(path: &Path, required: bool) -> Result<Settings> {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s)
            .with_context(|| format!("parsing settings file {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => Ok(Settings::default()),
        Err(e) => Err(e).with_context(|| format!("reading settings file {}", path.display())),
    }
}

/// Settings file (if any) overlaid with command-line flags, validated.
pub fn resolve(args: &Args) -> Result<Settings> {
    let mut settings = match (&args.config, default_settings_path()) {
        (Some(p), _) => load_settings(p, true)?,
        (None, Some(p)) => load_settings(&p, false)?,
        (None, None) => Settings::default(),
    };
    settings.apply_args(args);
    settings.validate()?;
    Ok(settings)
}
