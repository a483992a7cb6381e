use crate::command::Command;
use crate::ui::Layout;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

const ORBIT_STEP: f32 = 0.15;
const ZOOM_STEP: f32 = 1.1;
const PAN_STEP: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Sim(Command),
    /// Reset the model and the camera together.
    Reset,
    MoveCursor(i32),
    NudgeSpeed(i32),
    SliderClick { index: usize, value: f32 },
    Orbit { yaw: f32, pitch: f32 },
    Zoom(f32),
    Pan { right: f32, forward: f32 },
    DragStart(u16, u16),
    DragTo(u16, u16),
    DragEnd,
    Hover(u16, u16),
    HoverLeave,
    ToggleTheme,
    TogglePanel,
    ToggleOrbits,
    ToggleLabels,
    ToggleAutoRotate,
    ResetCamera,
    Resize(u16, u16),
    Quit,
}

pub fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Event>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        out.push(event::read()?);
        if out.len() >= 64 {
            break;
        }
    }
    Ok(out)
}

pub fn map_event(ev: &Event, layout: &Layout, sliders: usize) -> Option<Action> {
    match ev {
        Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
            map_key(k)
        }
        Event::Mouse(m) => map_mouse(m, layout, sliders),
        Event::Resize(w, h) => Some(Action::Resize(*w, *h)),
        Event::FocusLost => Some(Action::HoverLeave),
        _ => None,
    }
}

fn map_key(k: &KeyEvent) -> Option<Action> {
    if k.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Action::Quit);
    }
    let action = match k.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
            Action::Sim(Command::TogglePause)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Reset,
        KeyCode::Char('t') | KeyCode::Char('T') => Action::ToggleTheme,
        KeyCode::Tab => Action::TogglePanel,
        KeyCode::Up => Action::MoveCursor(-1),
        KeyCode::Down => Action::MoveCursor(1),
        KeyCode::Left => Action::NudgeSpeed(-1),
        KeyCode::Right => Action::NudgeSpeed(1),
        KeyCode::Char('a') | KeyCode::Char('A') => Action::Orbit { yaw: -ORBIT_STEP, pitch: 0.0 },
        KeyCode::Char('d') | KeyCode::Char('D') => Action::Orbit { yaw: ORBIT_STEP, pitch: 0.0 },
        KeyCode::Char('w') | KeyCode::Char('W') => Action::Orbit { yaw: 0.0, pitch: ORBIT_STEP },
        KeyCode::Char('s') | KeyCode::Char('S') => Action::Orbit { yaw: 0.0, pitch: -ORBIT_STEP },
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Zoom(ZOOM_STEP),
        KeyCode::Char('-') | KeyCode::Char('_') => Action::Zoom(1.0 / ZOOM_STEP),
        KeyCode::Char('i') | KeyCode::Char('I') => Action::Pan { right: 0.0, forward: PAN_STEP },
        KeyCode::Char('k') | KeyCode::Char('K') => Action::Pan { right: 0.0, forward: -PAN_STEP },
        KeyCode::Char('j') | KeyCode::Char('J') => Action::Pan { right: -PAN_STEP, forward: 0.0 },
        KeyCode::Char('l') | KeyCode::Char('L') => Action::Pan { right: PAN_STEP, forward: 0.0 },
        KeyCode::Char('m') | KeyCode::Char('M') => Action::ToggleAutoRotate,
        KeyCode::Char('o') | KeyCode::Char('O') => Action::ToggleOrbits,
        KeyCode::Char('n') | KeyCode::Char('N') => Action::ToggleLabels,
        KeyCode::Char('c') | KeyCode::Char('C') => Action::ResetCamera,
        _ => return None,
    };
    Some(action)
}

fn map_mouse(m: &MouseEvent, layout: &Layout, sliders: usize) -> Option<Action> {
    match m.kind {
        MouseEventKind::Moved => Some(Action::Hover(m.column, m.row)),
        MouseEventKind::Down(MouseButton::Left) => {
            if layout.collapsed && m.row + 1 >= layout.rows {
                return Some(Action::TogglePanel);
            }
            if let Some((index, value)) = layout.slider_hit(m.column, m.row, sliders) {
                return Some(Action::SliderClick { index, value });
            }
            if m.column < layout.scene_w {
                return Some(Action::DragStart(m.column, m.row));
            }
            None
        }
        MouseEventKind::Drag(MouseButton::Left) => Some(Action::DragTo(m.column, m.row)),
        MouseEventKind::Up(MouseButton::Left) => Some(Action::DragEnd),
        MouseEventKind::ScrollUp => Some(Action::Zoom(ZOOM_STEP)),
        MouseEventKind::ScrollDown => Some(Action::Zoom(1.0 / ZOOM_STEP)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    fn layout() -> Layout {
        Layout::new(120, 40, false)
    }

    #[test]
    fn keys_map_to_commands() {
        let l = layout();
        assert_eq!(
            map_event(&key(KeyCode::Char(' ')), &l, 8),
            Some(Action::Sim(Command::TogglePause))
        );
        assert_eq!(map_event(&key(KeyCode::Char('r')), &l, 8), Some(Action::Reset));
        assert_eq!(map_event(&key(KeyCode::Char('t')), &l, 8), Some(Action::ToggleTheme));
        assert_eq!(map_event(&key(KeyCode::Esc), &l, 8), Some(Action::Quit));
        assert_eq!(map_event(&key(KeyCode::Right), &l, 8), Some(Action::NudgeSpeed(1)));
        assert_eq!(map_event(&key(KeyCode::Char('z')), &l, 8), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let ev = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(map_event(&ev, &layout(), 8), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ev, &layout(), 8), Some(Action::Quit));
    }

    #[test]
    fn click_on_track_sets_slider() {
        let l = layout();
        let ev = mouse(MouseEventKind::Down(MouseButton::Left), l.track_x, l.first_slider_row + 1);
        assert_eq!(map_event(&ev, &l, 8), Some(Action::SliderClick { index: 1, value: 0.1 }));
    }

    #[test]
    fn click_in_scene_starts_drag() {
        let l = layout();
        let ev = mouse(MouseEventKind::Down(MouseButton::Left), 10, 10);
        assert_eq!(map_event(&ev, &l, 8), Some(Action::DragStart(10, 10)));
        let ev = mouse(MouseEventKind::Moved, 11, 12);
        assert_eq!(map_event(&ev, &l, 8), Some(Action::Hover(11, 12)));
    }

    #[test]
    fn click_on_collapsed_bar_expands() {
        let l = Layout::new(120, 40, true);
        let ev = mouse(MouseEventKind::Down(MouseButton::Left), 3, 39);
        assert_eq!(map_event(&ev, &l, 8), Some(Action::TogglePanel));
    }

    #[test]
    fn resize_and_focus() {
        let l = layout();
        assert_eq!(map_event(&Event::Resize(80, 24), &l, 8), Some(Action::Resize(80, 24)));
        assert_eq!(map_event(&Event::FocusLost, &l, 8), Some(Action::HoverLeave));
    }
}
