//! Control panel, theme, hover tooltip and picking.

use crate::catalog::Rgb;
use crate::model::{SPEED_MULTIPLIER_MAX, SPEED_MULTIPLIER_MIN};
use serde::{Deserialize, Serialize};

pub const SLIDER_STEP: f32 = 0.1;
pub const PANEL_WIDTH: u16 = 34;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                space: Rgb::hex(0x000011),
                panel_bg: Rgb::hex(0xE8ECF4),
                panel_fg: Rgb::hex(0x1E2433),
                dim: Rgb::hex(0x6A7285),
                accent: Rgb::hex(0x3D6FD8),
                track: Rgb::hex(0xB8C0D0),
                orbit: Rgb::hex(0x444444),
                label: Rgb::hex(0xC8CCD8),
                tip_bg: Rgb::hex(0xF6F7FB),
                tip_fg: Rgb::hex(0x1E2433),
            },
            Theme::Dark => Palette {
                space: Rgb::hex(0x000008),
                panel_bg: Rgb::hex(0x151A26),
                panel_fg: Rgb::hex(0xDCE1EC),
                dim: Rgb::hex(0x7A8294),
                accent: Rgb::hex(0xF0B429),
                track: Rgb::hex(0x2E3547),
                orbit: Rgb::hex(0x3A3F4D),
                label: Rgb::hex(0x9AA3B8),
                tip_bg: Rgb::hex(0x222A3A),
                tip_fg: Rgb::hex(0xEEF1F7),
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub space: Rgb,
    pub panel_bg: Rgb,
    pub panel_fg: Rgb,
    pub dim: Rgb,
    pub accent: Rgb,
    pub track: Rgb,
    pub orbit: Rgb,
    pub label: Rgb,
    pub tip_bg: Rgb,
    pub tip_fg: Rgb,
}

/// Where things sit on screen for the current terminal size. Shared by the
/// renderer and mouse hit-testing so both agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub cols: u16,
    pub rows: u16,
    pub scene_w: u16,
    pub scene_h: u16,
    pub panel_x: u16,
    pub panel_w: u16,
    pub first_slider_row: u16,
    pub track_x: u16,
    pub track_w: u16,
    pub collapsed: bool,
}

impl Layout {
    pub fn new(cols: u16, rows: u16, collapsed: bool) -> Self {
        if collapsed {
            return Self {
                cols,
                rows,
                scene_w: cols,
                scene_h: rows.saturating_sub(1),
                panel_x: cols,
                panel_w: 0,
                first_slider_row: 0,
                track_x: 0,
                track_w: 0,
                collapsed,
            };
        }
        let panel_w = PANEL_WIDTH.min(cols / 2);
        let panel_x = cols.saturating_sub(panel_w);
        // "Mercury  " label, track, " 1.0x"
        let track_x = panel_x + 11;
        let track_w = panel_w.saturating_sub(11 + 7);
        Self {
            cols,
            rows,
            scene_w: panel_x,
            scene_h: rows,
            panel_x,
            panel_w,
            first_slider_row: 3,
            track_x,
            track_w,
            collapsed,
        }
    }

    /// Slider index and the value under a click, if the click landed on a track.
    pub fn slider_hit(&self, col: u16, row: u16, sliders: usize) -> Option<(usize, f32)> {
        if self.collapsed || self.track_w < 2 || row < self.first_slider_row {
            return None;
        }
        let idx = (row - self.first_slider_row) as usize;
        if idx >= sliders || col < self.track_x || col >= self.track_x + self.track_w {
            return None;
        }
        let t = (col - self.track_x) as f32 / (self.track_w - 1) as f32;
        let v = SPEED_MULTIPLIER_MIN + t * (SPEED_MULTIPLIER_MAX - SPEED_MULTIPLIER_MIN);
        Some((idx, snap(v)))
    }

    /// Fraction of the track a value fills.
    pub fn track_fill(&self, value: f32) -> u16 {
        let t = (value - SPEED_MULTIPLIER_MIN) / (SPEED_MULTIPLIER_MAX - SPEED_MULTIPLIER_MIN);
        let last = self.track_w.saturating_sub(1);
        ((t.clamp(0.0, 1.0) * last as f32).round() as u16).min(last)
    }
}

/// Round to the slider's step and clamp into range.
pub fn snap(v: f32) -> f32 {
    let stepped = (v / SLIDER_STEP).round() * SLIDER_STEP;
    stepped.clamp(SPEED_MULTIPLIER_MIN, SPEED_MULTIPLIER_MAX)
}

/// Value after moving a slider `steps` notches.
pub fn step_slider(value: f32, steps: i32) -> f32 {
    snap(value + steps as f32 * SLIDER_STEP)
}

pub fn speed_label(value: f32) -> String {
    format!("{:.1}x", value)
}

#[derive(Clone, Debug)]
pub struct UiState {
    pub theme: Theme,
    pub panel_collapsed: bool,
    pub cursor: usize,
    pub hover: Option<(u16, u16)>,
    pub show_orbits: bool,
    pub show_labels: bool,
}

impl UiState {
    pub fn new(theme: Theme, show_orbits: bool, show_labels: bool) -> Self {
        Self {
            theme,
            panel_collapsed: false,
            cursor: 0,
            hover: None,
            show_orbits,
            show_labels,
        }
    }

    pub fn move_cursor(&mut self, delta: i32, len: usize) {
        if len == 0 {
            return;
        }
        let len = len as i32;
        self.cursor = (self.cursor as i32 + delta).rem_euclid(len) as usize;
    }
}

/// A body's on-screen footprint, as produced by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub body: usize,
    pub cx: f32,
    pub cy: f32,
    /// Radius in columns.
    pub rx: f32,
    /// Radius in rows.
    pub ry: f32,
    pub depth: f32,
}

impl Footprint {
    fn covers(&self, col: u16, row: u16) -> bool {
        let dx = (col as f32 + 0.5 - self.cx) / self.rx.max(0.75);
        let dy = (row as f32 + 0.5 - self.cy) / self.ry.max(0.75);
        dx * dx + dy * dy <= 1.0
    }
}

/// Front-most body under the mouse cell.
pub fn pick(footprints: &[Footprint], col: u16, row: u16) -> Option<usize> {
    footprints
        .iter()
        .filter(|f| f.covers(col, row))
        .min_by(|a, b| a.depth.total_cmp(&b.depth))
        .map(|f| f.body)
}
