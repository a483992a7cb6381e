//! Projects the solar system into the scene viewport.

use crate::camera::{OrbitCamera, Projected, Viewport};
use crate::catalog::{self, Rgb};
use crate::model::{Body, SolarSystem};
use crate::render::{overlay_text, Cell, CellBuffer};
use crate::starfield::Starfield;
use crate::ui::{Footprint, Palette, UiState};
use glam::Vec3;
use std::f32::consts::TAU;

const AMBIENT: f32 = 0.2;
const RING_SAMPLES: usize = 180;
const SUN_CORONA: Rgb = Rgb::hex(0xFFAA00);

pub struct SceneView<'a> {
    pub sys: &'a SolarSystem,
    pub cam: &'a OrbitCamera,
    pub stars: &'a Starfield,
    pub ui: &'a UiState,
    pub palette: Palette,
    pub viewport: Viewport,
    /// Body currently under the mouse.
    pub hovered: Option<usize>,
}

/// Draw stars, orbit rings and bodies. Returns each visible body's on-screen
/// footprint for hover picking.
pub fn draw_scene(buf: &mut CellBuffer, v: &SceneView) -> Vec<Footprint> {
    let vp = v.viewport;
    let space = v.palette.space.to_color();
    buf.fill_rect(vp.x, vp.y, vp.w, vp.h, space);
    if vp.w == 0 || vp.h == 0 {
        return Vec::new();
    }

    draw_stars(buf, v);
    if v.ui.show_orbits {
        for b in v.sys.planets() {
            draw_ring(buf, v, b.orbital_radius());
        }
    }

    let mut visible: Vec<(usize, &Body, Projected)> = v
        .sys
        .bodies()
        .iter()
        .enumerate()
        .filter_map(|(i, b)| v.cam.project(b.position(), vp).map(|p| (i, b, p)))
        .collect();
    // painter's order: far first
    visible.sort_by(|a, b| b.2.depth.total_cmp(&a.2.depth));

    let mut footprints = Vec::with_capacity(visible.len());
    for &(i, body, p) in &visible {
        let Some(spec) = catalog::lookup(body.name()) else {
            continue;
        };
        let fp = Footprint {
            body: i,
            cx: p.x,
            cy: p.y,
            rx: spec.size * p.cols_per_unit(),
            ry: spec.size * p.rows_per_unit,
            depth: p.depth,
        };
        draw_body(buf, v, body, spec.color, &fp);
        footprints.push(fp);
    }

    if v.ui.show_labels {
        for fp in &footprints {
            let name = v.sys.bodies()[fp.body].name();
            let hovered = v.hovered == Some(fp.body);
            let fg = if hovered { v.palette.accent } else { v.palette.label };
            let x = ((fp.cx - name.chars().count() as f32 * 0.5).round() as i32).max(vp.x as i32);
            let y = (fp.cy + fp.ry.max(0.5) + 0.5).round() as i32;
            let room = (vp.x + vp.w) as i32 - x;
            if room <= 0 || !inside(vp, x, y) {
                continue;
            }
            let shown: String = name.chars().take(room as usize).collect();
            overlay_text(buf, x, y, &shown, fg.to_color(), hovered);
        }
    }

    footprints
}

fn draw_stars(buf: &mut CellBuffer, v: &SceneView) {
    let vp = v.viewport;
    let bg = v.palette.space.to_color();
    let rotation = v.sys.starfield_rotation().rem_euclid(std::f64::consts::TAU) as f32;
    for s in v.stars.rotated(rotation) {
        let Some(p) = v.cam.project(s.pos, vp) else {
            continue;
        };
        let (cx, cy) = (p.x.floor() as i32, p.y.floor() as i32);
        if !inside(vp, cx, cy) {
            continue;
        }
        let fade = (1.0 - p.depth / 2500.0).clamp(0.15, 1.0);
        let lum = s.mag * fade;
        let ch = if lum > 0.75 {
            '*'
        } else if lum > 0.45 {
            '·'
        } else {
            '.'
        };
        let g = (90.0 + 165.0 * lum) as u8;
        let fg = Rgb { r: g, g, b: g }.to_color();
        buf.set(cx as u16, cy as u16, Cell { ch, fg, bg, bold: false });
    }
}

fn draw_ring(buf: &mut CellBuffer, v: &SceneView, radius: f32) {
    let vp = v.viewport;
    let bg = v.palette.space.to_color();
    let fg = v.palette.orbit.to_color();
    for k in 0..RING_SAMPLES {
        let a = k as f32 / RING_SAMPLES as f32 * TAU;
        let (s, c) = a.sin_cos();
        let Some(p) = v.cam.project(Vec3::new(c * radius, 0.0, s * radius), vp) else {
            continue;
        };
        let (cx, cy) = (p.x.floor() as i32, p.y.floor() as i32);
        if inside(vp, cx, cy) {
            buf.set(cx as u16, cy as u16, Cell { ch: '·', fg, bg, bold: false });
        }
    }
}

fn draw_body(buf: &mut CellBuffer, v: &SceneView, body: &Body, base: Rgb, fp: &Footprint) {
    let vp = v.viewport;
    let is_sun = !body.orbits();

    if fp.ry < 0.6 || fp.rx < 0.6 {
        let (cx, cy) = (fp.cx.floor() as i32, fp.cy.floor() as i32);
        if inside(vp, cx, cy) {
            let under = buf
                .get(cx as u16, cy as u16)
                .map(|c| c.bg)
                .unwrap_or(v.palette.space.to_color());
            let ch = if fp.ry < 0.3 { '•' } else { '●' };
            buf.set(cx as u16, cy as u16, Cell { ch, fg: base.to_color(), bg: under, bold: false });
        }
        return;
    }

    // light travels from the sun at the origin toward the body
    let light = (v.cam.to_view(Vec3::ZERO) - v.cam.to_view(body.position())).normalize_or_zero();
    let spin = body.axial_spin().rem_euclid(std::f64::consts::TAU) as f32;

    let y0 = (fp.cy - fp.ry).floor() as i32;
    let y1 = (fp.cy + fp.ry).ceil() as i32;
    let x0 = (fp.cx - fp.rx).floor() as i32;
    let x1 = (fp.cx + fp.rx).ceil() as i32;
    for row in y0..=y1 {
        for col in x0..=x1 {
            if !inside(vp, col, row) {
                continue;
            }
            let u = (col as f32 + 0.5 - fp.cx) / fp.rx;
            let w = (row as f32 + 0.5 - fp.cy) / fp.ry;
            let d2 = u * u + w * w;
            if d2 > 1.0 {
                continue;
            }
            let nz = (1.0 - d2).sqrt();
            let normal = Vec3::new(u, -w, nz);
            let world_n = v.cam.dir_to_world(normal);
            let lon = world_n.x.atan2(world_n.z) + spin;

            let color = if is_sun {
                let limb = SUN_CORONA.mix(base, nz);
                limb.scale(0.92 + 0.08 * (lon * 5.0).sin())
            } else {
                let lambert = normal.dot(light).max(0.0);
                let band = 0.88 + 0.12 * (lon * 3.0).sin();
                base.scale((AMBIENT + (1.0 - AMBIENT) * lambert) * band)
            };
            let c = color.to_color();
            buf.set(col as u16, row as u16, Cell { ch: '█', fg: c, bg: c, bold: false });
        }
    }
}

fn inside(vp: Viewport, x: i32, y: i32) -> bool {
    match (u16::try_from(x), u16::try_from(y)) {
        (Ok(x), Ok(y)) => vp.contains(x, y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpinRates;
    use crate::ui::Theme;
    use rand::{rngs::StdRng, SeedableRng};

    fn fixture() -> (SolarSystem, OrbitCamera, Starfield, UiState) {
        let mut rng = StdRng::seed_from_u64(2);
        (
            SolarSystem::from_catalog(SpinRates::default(), &mut rng),
            OrbitCamera::new(),
            Starfield::new(200, 2),
            UiState::new(Theme::Dark, true, true),
        )
    }

    #[test]
    fn sun_is_drawn_at_center_and_pickable() {
        let (sys, cam, stars, mut ui) = fixture();
        ui.show_labels = false;
        let vp = Viewport { x: 0, y: 0, w: 100, h: 40 };
        let mut buf = CellBuffer::new(100, 40);
        let view = SceneView {
            sys: &sys,
            cam: &cam,
            stars: &stars,
            ui: &ui,
            palette: Theme::Dark.palette(),
            viewport: vp,
            hovered: None,
        };
        let fps = draw_scene(&mut buf, &view);
        assert_eq!(fps.len(), 9);
        assert_eq!(crate::ui::pick(&fps, 50, 20), Some(0));
        assert_eq!(buf.get(50, 20).map(|c| c.ch), Some('█'));
    }

    #[test]
    fn nothing_leaks_outside_viewport() {
        let (sys, cam, stars, ui) = fixture();
        let vp = Viewport { x: 0, y: 0, w: 60, h: 20 };
        let mut buf = CellBuffer::new(80, 20);
        let view = SceneView {
            sys: &sys,
            cam: &cam,
            stars: &stars,
            ui: &ui,
            palette: Theme::Light.palette(),
            viewport: vp,
            hovered: None,
        };
        draw_scene(&mut buf, &view);
        for y in 0..20 {
            for x in 60..80 {
                assert_eq!(buf.get(x, y), Some(Cell::default()));
            }
        }
    }

    #[test]
    fn inside_rejects_negative_and_far_cells() {
        let vp = Viewport { x: 4, y: 2, w: 10, h: 5 };
        assert!(inside(vp, 4, 2));
        assert!(inside(vp, 13, 6));
        assert!(!inside(vp, 14, 6));
        assert!(!inside(vp, -1, 3));
        assert!(!inside(vp, 5, i32::MAX));
    }
}
