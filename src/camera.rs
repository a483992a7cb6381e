//! Orbit camera and terminal projection.

use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// Width over height of one terminal cell.
pub const CELL_ASPECT: f32 = 0.5;

const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 2500.0;
const MIN_DISTANCE: f32 = 10.0;
const MAX_DISTANCE: f32 = 200.0;
const PITCH_LIMIT: f32 = 1.55;
const DAMPING: f32 = 0.05;
const INITIAL_EYE: Vec3 = Vec3::new(0.0, 30.0, 60.0);

/// Screen rectangle, in cells, that the scene is projected into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        (self.w as f32 * CELL_ASPECT) / (self.h.max(1) as f32)
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x
            && col < self.x.saturating_add(self.w)
            && row >= self.y
            && row < self.y.saturating_add(self.h)
    }
}

/// A world point mapped into the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Cell column, fractional.
    pub x: f32,
    /// Cell row, fractional.
    pub y: f32,
    /// Distance along the view axis.
    pub depth: f32,
    /// Rows covered by one world unit at this depth.
    pub rows_per_unit: f32,
}

impl Projected {
    pub fn cols_per_unit(&self) -> f32 {
        self.rows_per_unit / CELL_ASPECT
    }
}

#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: Vec3,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        let horiz = (INITIAL_EYE.x * INITIAL_EYE.x + INITIAL_EYE.z * INITIAL_EYE.z).sqrt();
        Self {
            target: Vec3::ZERO,
            yaw: INITIAL_EYE.x.atan2(INITIAL_EYE.z),
            pitch: INITIAL_EYE.y.atan2(horiz),
            distance: INITIAL_EYE.length(),
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: Vec3::ZERO,
            auto_rotate: false,
            auto_rotate_speed: 0.5,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn eye(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y, aspect.max(1e-3), NEAR, FAR)
    }

    /// Queue an orbit; it is eased in over the following frames.
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.pending_yaw += d_yaw;
        self.pending_pitch += d_pitch;
    }

    /// Queue a pan in the camera's ground plane. `right` and `forward` are in
    /// world units scaled by the current distance.
    pub fn pan(&mut self, right: f32, forward: f32) {
        let (s, c) = self.yaw.sin_cos();
        let right_v = Vec3::new(c, 0.0, -s);
        let forward_v = Vec3::new(-s, 0.0, -c);
        let scale = self.distance * 0.05;
        self.pending_pan += (right_v * right + forward_v * forward) * scale;
    }

    /// `factor` > 1 moves closer.
    pub fn zoom(&mut self, factor: f32) {
        if factor > 0.0 {
            self.distance = (self.distance / factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    pub fn reset(&mut self) {
        let auto = self.auto_rotate;
        *self = Self::new();
        self.auto_rotate = auto;
    }

    pub fn update(&mut self, dt: f32) {
        let k = 1.0 - (1.0 - DAMPING).powf(dt * 60.0);
        let dy = self.pending_yaw * k;
        let dp = self.pending_pitch * k;
        let dpan = self.pending_pan * k;
        self.pending_yaw -= dy;
        self.pending_pitch -= dp;
        self.pending_pan -= dpan;

        self.yaw += dy;
        self.pitch = (self.pitch + dp).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.target += dpan;

        if self.auto_rotate {
            self.yaw += TAU / 60.0 * self.auto_rotate_speed * dt;
        }
    }

    /// Map a world point into `vp`. `None` when behind the camera or past the
    /// far plane.
    pub fn project(&self, p: Vec3, vp: Viewport) -> Option<Projected> {
        let view = self.view_matrix();
        let v = view.transform_point3(p);
        let depth = -v.z;
        if depth < NEAR || depth > FAR {
            return None;
        }
        let ndc = self.projection_matrix(vp.aspect()).project_point3(v);
        let half_w = vp.w as f32 * 0.5;
        let half_h = vp.h as f32 * 0.5;
        let f = 1.0 / (FOV_Y * 0.5).tan();
        Some(Projected {
            x: vp.x as f32 + (ndc.x + 1.0) * half_w,
            y: vp.y as f32 + (1.0 - ndc.y) * half_h,
            depth,
            rows_per_unit: half_h * f / depth,
        })
    }

    pub fn to_view(&self, p: Vec3) -> Vec3 {
        self.view_matrix().transform_point3(p)
    }

    /// Rotate a view-space direction back into world space.
    pub fn dir_to_world(&self, d: Vec3) -> Vec3 {
        self.view_matrix().inverse().transform_vector3(d)
    }
}
