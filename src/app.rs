use crate::camera::{OrbitCamera, Viewport};
use crate::clock::{FpsMeter, FrameClock, FramePacer};
use crate::command::{Command, Outcome};
use crate::config::Settings;
use crate::hud::{self, HudView};
use crate::input::{collect_input_nonblocking, map_event, Action};
use crate::model::SolarSystem;
use crate::render::{CellBuffer, Terminal};
use crate::scene::{self, SceneView};
use crate::starfield::Starfield;
use crate::ui::{pick, step_slider, Footprint, Layout, UiState};
use anyhow::ensure;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::{self, IsTerminal};
use std::time::Instant;

const MIN_COLS: u16 = 40;
const MIN_ROWS: u16 = 12;
const DRAG_YAW_PER_COL: f32 = 0.02;
const DRAG_PITCH_PER_ROW: f32 = 0.04;

/// Everything the frame loop mutates apart from the terminal itself.
pub struct Session {
    pub sys: SolarSystem,
    pub cam: OrbitCamera,
    pub ui: UiState,
    pub stars: Starfield,
    rng: StdRng,
    drag: Option<(u16, u16)>,
    footprints: Vec<Footprint>,
    pub should_quit: bool,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sys = SolarSystem::from_catalog(settings.spin_rates(), &mut rng);
        let stars = Starfield::new(settings.star_count, rng.gen());
        let mut cam = OrbitCamera::new();
        cam.auto_rotate = settings.auto_rotate;
        Self {
            sys,
            cam,
            ui: UiState::new(settings.theme, settings.show_orbits, settings.show_labels),
            stars,
            rng,
            drag: None,
            footprints: Vec::new(),
            should_quit: false,
        }
    }

    pub fn layout(&self, cols: u16, rows: u16) -> Layout {
        Layout::new(cols, rows, self.ui.panel_collapsed)
    }

    /// Name and current multiplier of the `index`th planet.
    fn planet_at(&self, index: usize) -> Option<(String, f32)> {
        let b = self.sys.planets().nth(index)?;
        Some((b.name().to_string(), b.speed_multiplier()))
    }

    /// Run a command against the model, logging what it did.
    pub fn dispatch(&mut self, cmd: Command) {
        match cmd.apply(&mut self.sys, &mut self.rng) {
            Ok(Outcome::SpeedChanged { body, value }) => {
                log::debug!("{body} speed multiplier -> {value:.1}")
            }
            Ok(Outcome::Running(true)) => log::info!("resumed at t={:.2}s", self.sys.sim_time()),
            Ok(Outcome::Running(false)) => log::info!("paused at t={:.2}s", self.sys.sim_time()),
            Ok(Outcome::Reset) => log::info!("simulation reset"),
            Err(e) => log::warn!("command rejected: {e}"),
        }
    }

    /// Apply one input action. Resizes are the caller's business.
    pub fn handle(&mut self, action: Action) {
        let planets = self.sys.planets().count();
        match action {
            Action::Sim(cmd) => self.dispatch(cmd),
            Action::Reset => {
                self.dispatch(Command::Reset);
                self.cam.reset();
            }
            Action::MoveCursor(d) => self.ui.move_cursor(d, planets),
            Action::NudgeSpeed(steps) => {
                if let Some((body, current)) = self.planet_at(self.ui.cursor) {
                    let value = step_slider(current, steps);
                    self.dispatch(Command::SetSpeedMultiplier { body, value });
                }
            }
            Action::SliderClick { index, value } => {
                if let Some((body, _)) = self.planet_at(index) {
                    self.ui.cursor = index;
                    self.dispatch(Command::SetSpeedMultiplier { body, value });
                }
            }
            Action::Orbit { yaw, pitch } => self.cam.rotate(yaw, pitch),
            Action::Zoom(f) => self.cam.zoom(f),
            Action::Pan { right, forward } => self.cam.pan(right, forward),
            Action::DragStart(c, r) => self.drag = Some((c, r)),
            Action::DragTo(c, r) => {
                if let Some((pc, pr)) = self.drag {
                    let dx = c as f32 - pc as f32;
                    let dy = r as f32 - pr as f32;
                    self.cam.rotate(-dx * DRAG_YAW_PER_COL, dy * DRAG_PITCH_PER_ROW);
                    self.drag = Some((c, r));
                }
                self.ui.hover = Some((c, r));
            }
            Action::DragEnd => self.drag = None,
            Action::Hover(c, r) => self.ui.hover = Some((c, r)),
            Action::HoverLeave => self.ui.hover = None,
            Action::ToggleTheme => {
                self.ui.theme = self.ui.theme.toggled();
                log::info!("theme -> {}", self.ui.theme.name());
            }
            Action::TogglePanel => self.ui.panel_collapsed = !self.ui.panel_collapsed,
            Action::ToggleOrbits => self.ui.show_orbits = !self.ui.show_orbits,
            Action::ToggleLabels => self.ui.show_labels = !self.ui.show_labels,
            Action::ToggleAutoRotate => self.cam.auto_rotate = !self.cam.auto_rotate,
            Action::ResetCamera => self.cam.reset(),
            Action::Resize(..) => {}
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.sys.update(dt);
        self.cam.update(dt);
    }

    /// Body under the mouse, using the footprints from the last draw.
    pub fn hovered(&self, layout: &Layout) -> Option<usize> {
        let (c, r) = self.ui.hover?;
        if c >= layout.scene_w || r >= layout.scene_h {
            return None;
        }
        pick(&self.footprints, c, r)
    }

    pub fn draw(&mut self, buf: &mut CellBuffer, fps: f32) {
        let (cols, rows) = (buf.w, buf.h);
        if cols < MIN_COLS || rows < MIN_ROWS {
            hud::draw_too_small(buf, cols, rows);
            self.footprints.clear();
            return;
        }
        let layout = self.layout(cols, rows);
        let palette = self.ui.theme.palette();
        let hovered = self.hovered(&layout);

        let view = SceneView {
            sys: &self.sys,
            cam: &self.cam,
            stars: &self.stars,
            ui: &self.ui,
            palette,
            viewport: Viewport { x: 0, y: 0, w: layout.scene_w, h: layout.scene_h },
            hovered,
        };
        self.footprints = scene::draw_scene(buf, &view);

        let hud = HudView {
            sys: &self.sys,
            ui: &self.ui,
            palette,
            layout,
            fps,
            auto_rotate: self.cam.auto_rotate,
        };
        hud::draw_status(buf, &hud);
        hud::draw_panel(buf, &hud);
        if let (Some(mouse), Some(body)) = (self.ui.hover, self.hovered(&layout)) {
            hud::draw_tooltip(buf, &hud, body, mouse);
        }
    }
}

pub struct App {
    settings: Settings,
    session: Session,
    term: Terminal,
    clock: FrameClock,
    pacer: FramePacer,
    fps: FpsMeter,
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        ensure!(io::stdout().is_terminal(), "solarsim needs an interactive terminal on stdout");
        let session = Session::new(&settings);
        let term = Terminal::begin()?;
        log::info!(
            "started {}x{} fps_cap={} stars={} theme={}",
            term.cols,
            term.rows,
            settings.fps_cap,
            session.stars.len(),
            settings.theme.name()
        );
        Ok(Self {
            clock: FrameClock::new(settings.max_frame_dt),
            pacer: FramePacer::new(settings.fps_cap),
            fps: FpsMeter::default(),
            settings,
            session,
            term,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        while !self.session.should_quit {
            let frame_start = Instant::now();
            if self.term.resize_if_needed()? {
                log::debug!("terminal resized to {}x{}", self.term.cols, self.term.rows);
            }

            let layout = self.session.layout(self.term.cols, self.term.rows);
            let sliders = self.session.sys.planets().count();
            for ev in collect_input_nonblocking(self.pacer.frame())? {
                let Some(action) = map_event(&ev, &layout, sliders) else {
                    continue;
                };
                if let Action::Resize(c, r) = action {
                    self.term.resize(c, r)?;
                    log::debug!("terminal resized to {c}x{r}");
                    continue;
                }
                self.session.handle(action);
                if self.session.should_quit {
                    break;
                }
            }

            // ticks while paused too, so a resume never sees the paused span
            let dt = self.clock.tick();
            self.fps.record(dt);
            self.session.step(dt);

            let bg = self.session.ui.theme.palette().space.to_color();
            self.term.cur.clear(bg);
            self.session.draw(&mut self.term.cur, self.fps.fps());
            self.term.present()?;

            self.pacer.wait(frame_start);
        }
        log::info!(
            "exiting after {} frames, sim time {:.1}s (fps cap {})",
            self.clock.frames(),
            self.session.sys.sim_time(),
            self.settings.fps_cap
        );
        Ok(())
    }
}

pub fn run(settings: Settings) -> anyhow::Result<()> {
    let mut app = App::init(settings)?;
    let result = app.run();
    let ended = app.term.end();
    result?;
    ended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Theme;

    fn session() -> Session {
        let settings = Settings { seed: Some(11), star_count: 100, ..Settings::default() };
        Session::new(&settings)
    }

    #[test]
    fn nudge_changes_selected_planet_only() {
        let mut s = session();
        s.handle(Action::MoveCursor(2));
        s.handle(Action::NudgeSpeed(3));
        let earth = s.sys.body("Earth").unwrap();
        assert!((earth.speed_multiplier() - 1.3).abs() < 1e-4);
        assert_eq!(s.sys.body("Venus").unwrap().speed_multiplier(), 1.0);
    }

    #[test]
    fn nudge_saturates_at_bounds() {
        let mut s = session();
        s.handle(Action::NudgeSpeed(-100));
        assert!((s.sys.body("Mercury").unwrap().speed_multiplier() - 0.1).abs() < 1e-4);
        s.handle(Action::NudgeSpeed(1000));
        assert!((s.sys.body("Mercury").unwrap().speed_multiplier() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn speed_input_for_missing_planet_is_ignored() {
        let mut s = session();
        let before = s.sys.clone();
        s.ui.cursor = 20;
        s.handle(Action::NudgeSpeed(1));
        s.handle(Action::SliderClick { index: 8, value: 2.0 });
        assert_eq!(s.sys, before);
        assert_eq!(s.ui.cursor, 20);
    }

    #[test]
    fn slider_click_selects_and_sets() {
        let mut s = session();
        s.handle(Action::SliderClick { index: 7, value: 4.2 });
        assert_eq!(s.ui.cursor, 7);
        assert!((s.sys.body("Neptune").unwrap().speed_multiplier() - 4.2).abs() < 1e-4);
    }

    #[test]
    fn pause_freezes_and_reset_restores_multipliers() {
        let mut s = session();
        s.handle(Action::SliderClick { index: 0, value: 3.0 });
        s.handle(Action::Sim(Command::TogglePause));
        let before = s.sys.clone();
        s.step(0.05);
        assert_eq!(s.sys, before);

        s.handle(Action::Reset);
        assert!(!s.sys.is_running());
        assert!(s.sys.planets().all(|b| b.speed_multiplier() == 1.0));
    }

    #[test]
    fn drag_orbits_only_while_held() {
        let mut s = session();
        let eye = s.cam.eye();
        s.handle(Action::DragTo(30, 10));
        s.step(0.1);
        assert!((s.cam.eye() - eye).length() < 1e-4);

        s.handle(Action::DragStart(10, 10));
        s.handle(Action::DragTo(30, 10));
        s.handle(Action::DragEnd);
        for _ in 0..10 {
            s.cam.update(0.1);
        }
        assert!((s.cam.eye() - eye).length() > 1.0);
    }

    #[test]
    fn toggles_flip_view_state() {
        let mut s = session();
        s.handle(Action::ToggleTheme);
        assert_eq!(s.ui.theme, Theme::Dark);
        s.handle(Action::ToggleTheme);
        assert_eq!(s.ui.theme, Theme::Light);
        s.handle(Action::TogglePanel);
        assert!(s.ui.panel_collapsed);
        s.handle(Action::ToggleAutoRotate);
        assert!(s.cam.auto_rotate);
        s.handle(Action::Quit);
        assert!(s.should_quit);
    }

    #[test]
    fn hovering_the_sun_shows_its_tooltip() {
        let mut s = session();
        s.ui.show_labels = false;
        let mut buf = CellBuffer::new(120, 40);
        s.draw(&mut buf, 60.0);
        let layout = s.layout(120, 40);
        let (cx, cy) = (layout.scene_w / 2, layout.scene_h / 2);
        s.handle(Action::Hover(cx, cy));
        assert_eq!(s.hovered(&layout), Some(0));

        let mut buf = CellBuffer::new(120, 40);
        s.draw(&mut buf, 60.0);
        let text: String = buf.cells.iter().map(|c| c.ch).collect();
        assert!(text.contains("center of our solar system"));

        s.handle(Action::HoverLeave);
        assert_eq!(s.hovered(&layout), None);
    }

    #[test]
    fn tiny_terminal_gets_a_notice() {
        let mut s = session();
        let mut buf = CellBuffer::new(30, 8);
        s.draw(&mut buf, 0.0);
        let text: String = buf.cells.iter().map(|c| c.ch).collect();
        assert!(text.contains("too small"));
    }
}
