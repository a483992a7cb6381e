use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Cell {
    pub fn blank(bg: Color) -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg,
            bold: false,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Color::Black)
    }
}

pub struct CellBuffer {
    pub w: u16,
    pub h: u16,
    pub cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x < self.w && y < self.h {
            Some(self.cells[self.idx(x, y)])
        } else {
            None
        }
    }
    pub fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell::blank(bg));
    }
    pub fn fill_rect(&mut self, x0: u16, y0: u16, w: u16, h: u16, bg: Color) {
        for y in y0..y0.saturating_add(h).min(self.h) {
            for x in x0..x0.saturating_add(w).min(self.w) {
                self.set(x, y, Cell::blank(bg));
            }
        }
    }
}

pub fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    draw_text_styled(buf, x, y, s, fg, bg, false);
}

pub fn draw_text_styled(
    buf: &mut CellBuffer,
    x: u16,
    y: u16,
    s: &str,
    fg: Color,
    bg: Color,
    bold: bool,
) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg, bold });
    }
}

/// Like `draw_text` but keeps whatever background is already in each cell.
pub fn overlay_text(buf: &mut CellBuffer, x: i32, y: i32, s: &str, fg: Color, bold: bool) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x + i as i32;
        if xx < 0 || y < 0 {
            continue;
        }
        if let Some(under) = buf.get(xx as u16, y as u16) {
            buf.set(xx as u16, y as u16, Cell { ch, fg, bg: under.bg, bold });
        }
    }
}

pub fn box_draw(buf: &mut CellBuffer, x0: u16, y0: u16, bw: u16, bh: u16, fg: Color, bg: Color) {
    if bw < 2 || bh < 2 {
        return;
    }
    let x1 = x0.saturating_add(bw - 1);
    let y1 = y0.saturating_add(bh - 1);
    let c = |ch| Cell { ch, fg, bg, bold: false };
    for x in x0 + 1..x1 {
        buf.set(x, y0, c('─'));
        buf.set(x, y1, c('─'));
    }
    for y in y0 + 1..y1 {
        buf.set(x0, y, c('│'));
        buf.set(x1, y, c('│'));
    }
    buf.set(x0, y0, c('┌'));
    buf.set(x1, y0, c('┐'));
    buf.set(x0, y1, c('└'));
    buf.set(x1, y1, c('┘'));
}

/// Greedy word wrap; words longer than `width` are split.
pub fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }
    let mut line = String::new();
    for word in s.split_whitespace() {
        let mut word: &str = word;
        while word.chars().count() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let cut = word.char_indices().nth(width).map(|(i, _)| i).unwrap_or(word.len());
            lines.push(word[..cut].to_string());
            word = &word[cut..];
        }
        let need = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if need > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Owns the terminal for the life of the app: raw mode, alternate screen,
/// mouse capture and the double buffer used for diffed output.
pub struct Terminal {
    out: io::Stdout,
    pub cols: u16,
    pub rows: u16,
    pub prev: CellBuffer,
    pub cur: CellBuffer,
    active: bool,
}

impl Terminal {
    /// Take over the terminal. Any failure part way through drops the
    /// half-built `Terminal`, which restores whatever was already switched.
    pub fn begin() -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let mut term = Self {
            out: io::stdout(),
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            active: true,
        };
        execute!(
            term.out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            EnableFocusChange,
            Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        Ok(term)
    }

    pub fn end(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(
            self.out,
            ResetColor,
            SetAttribute(Attribute::Reset),
            Clear(ClearType::All),
            DisableFocusChange,
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize(&mut self, c: u16, r: u16) -> anyhow::Result<()> {
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        // stale glyphs outside the new prev buffer would otherwise survive
        execute!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    pub fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.resize(c, r)?;
        Ok(true)
    }

    pub fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = false;
        let mut last_pos: Option<(u16, u16)> = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                if last_pos != Some((x, y)) {
                    queue!(self.out, cursor::MoveTo(x, y))?;
                }
                if c.bold != last_bold {
                    let attr = if c.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = c.bold;
                }
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
                last_pos = Some((x.saturating_add(1), y));
            }
        }

        queue!(
            self.out,
            SetAttribute(Attribute::NormalIntensity),
            ResetColor,
            EndSynchronizedUpdate
        )?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut b = CellBuffer::new(4, 2);
        b.set(4, 0, Cell::blank(Color::Red));
        b.set(0, 2, Cell::blank(Color::Red));
        assert!(b.cells.iter().all(|c| c.bg == Color::Black));
        b.set(3, 1, Cell::blank(Color::Red));
        assert_eq!(b.get(3, 1).map(|c| c.bg), Some(Color::Red));
    }

    #[test]
    fn text_clips_at_edge() {
        let mut b = CellBuffer::new(5, 1);
        draw_text(&mut b, 2, 0, "hello", Color::White, Color::Black);
        let s: String = b.cells.iter().map(|c| c.ch).collect();
        assert_eq!(s, "  hel");
    }

    #[test]
    fn overlay_keeps_background() {
        let mut b = CellBuffer::new(3, 1);
        b.fill_rect(0, 0, 3, 1, Color::Blue);
        overlay_text(&mut b, -1, 0, "abc", Color::White, true);
        assert_eq!(b.get(0, 0).map(|c| (c.ch, c.bg, c.bold)), Some(('b', Color::Blue, true)));
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("Our home planet. 71% of surface covered by water.", 16);
        assert!(lines.iter().all(|l| l.chars().count() <= 16));
        assert_eq!(lines.join(" "), "Our home planet. 71% of surface covered by water.");
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert!(wrap_text("x", 0).is_empty());
    }

    #[test]
    fn failed_begin_leaves_cooked_mode() {
        // without a tty, begin fails and nothing may stay switched on
        if Terminal::begin().is_err() {
            assert!(!terminal::is_raw_mode_enabled().unwrap_or(false));
        }
    }
}
