//! Status line, control panel and hover tooltip.

use crate::catalog;
use crate::model::SolarSystem;
use crate::render::{box_draw, draw_text, draw_text_styled, wrap_text, Cell, CellBuffer};
use crate::ui::{speed_label, Layout, Palette, UiState};
use chrono::Local;
use crossterm::style::Color;

pub struct HudView<'a> {
    pub sys: &'a SolarSystem,
    pub ui: &'a UiState,
    pub palette: Palette,
    pub layout: Layout,
    pub fps: f32,
    pub auto_rotate: bool,
}

pub fn draw_status(buf: &mut CellBuffer, v: &HudView) {
    let bg = v.palette.space.to_color();
    let (mark, state, color) = if v.sys.is_running() {
        ('▶', "RUNNING", Color::Rgb { r: 120, g: 220, b: 140 })
    } else {
        ('‖', "PAUSED", Color::Rgb { r: 240, g: 180, b: 60 })
    };
    let line = format!(
        " {} {}  t={:.1}s  {:>3.0} fps  {} ",
        mark,
        state,
        v.sys.sim_time(),
        v.fps,
        Local::now().format("%H:%M:%S")
    );
    let max = v.layout.scene_w as usize;
    let shown: String = line.chars().take(max).collect();
    draw_text_styled(buf, 0, 0, &shown, color, bg, true);
}

pub fn draw_panel(buf: &mut CellBuffer, v: &HudView) {
    let l = v.layout;
    let p = v.palette;
    let bg = p.panel_bg.to_color();
    let fg = p.panel_fg.to_color();
    let dim = p.dim.to_color();
    let accent = p.accent.to_color();

    if l.collapsed {
        let y = l.rows.saturating_sub(1);
        buf.fill_rect(0, y, l.cols, 1, bg);
        let pause = if v.sys.is_running() { "pause" } else { "resume" };
        let bar = format!(" ▲ Controls [Tab] │ [Space] {pause} │ [R] reset │ [T] theme │ [Q] quit");
        let shown: String = bar.chars().take(l.cols as usize).collect();
        draw_text(buf, 0, y, &shown, fg, bg);
        return;
    }
    if l.panel_w < 20 {
        return;
    }

    buf.fill_rect(l.panel_x, 0, l.panel_w, l.rows, bg);
    for y in 0..l.rows {
        buf.set(l.panel_x, y, Cell { ch: '│', fg: dim, bg, bold: false });
    }

    let x = l.panel_x + 2;
    draw_text_styled(buf, x, 1, "Solar System Controls", fg, bg, true);
    draw_text(buf, x, 2, "Orbital speed", dim, bg);

    for (i, body) in v.sys.planets().enumerate() {
        let y = l.first_slider_row + i as u16;
        if y >= l.rows {
            break;
        }
        let selected = v.ui.cursor == i;
        if selected {
            draw_text(buf, l.panel_x + 1, y, "▶", accent, bg);
        }
        draw_text_styled(buf, x, y, &format!("{:<8}", body.name()), fg, bg, selected);

        let fill = l.track_fill(body.speed_multiplier());
        for k in 0..l.track_w {
            let (ch, c) = if k == fill {
                ('●', accent)
            } else if k < fill {
                ('━', accent)
            } else {
                ('─', p.track.to_color())
            };
            buf.set(l.track_x + k, y, Cell { ch, fg: c, bg, bold: false });
        }
        draw_text(buf, l.track_x + l.track_w + 1, y, &speed_label(body.speed_multiplier()), fg, bg);
    }

    let mut y = l.first_slider_row + v.sys.planets().count() as u16 + 1;
    let pause = if v.sys.is_running() { "[Space] Pause" } else { "[Space] Resume" };
    let lines = [
        (pause.to_string(), fg),
        ("[R] Reset".to_string(), fg),
        (format!("[T] Theme: {}", v.ui.theme.name()), fg),
        ("[Tab] Hide panel".to_string(), fg),
        (String::new(), fg),
        ("[←/→] speed  [↑/↓] planet".to_string(), dim),
        ("[W/A/S/D] orbit  [+/-] zoom".to_string(), dim),
        ("[I/J/K/L] pan  [C] camera reset".to_string(), dim),
        (
            format!(
                "[M] auto-rotate {}  [O] orbits {}",
                on_off(v.auto_rotate),
                on_off(v.ui.show_orbits)
            ),
            dim,
        ),
        (format!("[N] labels {}", on_off(v.ui.show_labels)), dim),
        ("Mouse: drag orbit, wheel zoom".to_string(), dim),
        ("[Q] Quit".to_string(), dim),
    ];
    let width = l.panel_w.saturating_sub(3) as usize;
    for (text, color) in lines {
        if y >= l.rows {
            break;
        }
        let shown: String = text.chars().take(width).collect();
        draw_text(buf, x, y, &shown, color, bg);
        y += 1;
    }
}

fn on_off(b: bool) -> &'static str {
    if b {
        "on"
    } else {
        "off"
    }
}

/// Tooltip box for the body under the mouse, kept inside the scene area.
pub fn draw_tooltip(buf: &mut CellBuffer, v: &HudView, body: usize, mouse: (u16, u16)) {
    let Some(b) = v.sys.bodies().get(body) else {
        return;
    };
    let Some(spec) = catalog::lookup(b.name()) else {
        return;
    };
    let l = v.layout;
    let max_w = 36u16.min(l.scene_w.saturating_sub(2));
    if max_w < 12 {
        return;
    }
    let lines = wrap_text(spec.info, (max_w - 4) as usize);
    let bw = lines
        .iter()
        .map(|s| s.chars().count())
        .chain(std::iter::once(spec.name.chars().count()))
        .max()
        .unwrap_or(0) as u16
        + 4;
    let bh = lines.len() as u16 + 4;

    let mut x0 = mouse.0.saturating_add(2);
    let mut y0 = mouse.1.saturating_add(1);
    if x0 + bw > l.scene_w {
        x0 = mouse.0.saturating_sub(bw + 1);
    }
    if y0 + bh > l.scene_h {
        y0 = l.scene_h.saturating_sub(bh);
    }

    let bg = v.palette.tip_bg.to_color();
    let fg = v.palette.tip_fg.to_color();
    buf.fill_rect(x0, y0, bw, bh, bg);
    box_draw(buf, x0, y0, bw, bh, v.palette.accent.to_color(), bg);
    draw_text_styled(buf, x0 + 2, y0 + 1, spec.name, fg, bg, true);
    for (i, line) in lines.iter().enumerate() {
        draw_text(buf, x0 + 2, y0 + 2 + i as u16, line, fg, bg);
    }
}

pub fn draw_too_small(buf: &mut CellBuffer, cols: u16, rows: u16) {
    let msg = "Terminal too small for solarsim";
    let x = cols.saturating_sub(msg.len() as u16) / 2;
    draw_text(buf, x, rows / 2, msg, Color::White, Color::Black);
}
