/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Layout (rows):
///   0        HUD: score, high score, tick interval
///   1        board top border
///   2..2+h   board, 2 terminal columns per grid cell
///   2+h      bottom border
///   3+h      message bar
///   4+h      help bar
///
/// Rendering reads the session only; it never changes game state.

use std::io::{self, BufWriter, Write};
use std::time::Instant;

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Cell as GridCell;
use crate::sim::save::HighScoreStore;
use crate::sim::session::{GameSession, Phase};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell outside the board.
    ///
    /// Using the same RGB for `Clear(ClearType::All)` and each cell keeps
    /// the inter-row gap on VTE terminals the same colour as the cells.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, x0: usize, x1: usize, bg: Color) {
        for x in x0..x1.min(self.width) {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Palette ──

const BOARD_BG: Color = Color::Rgb { r: 235, g: 235, b: 235 };
const BORDER_FG: Color = Color::Rgb { r: 120, g: 120, b: 140 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const SNAKE_FG: Color = Color::Rgb { r: 10, g: 10, b: 10 };
const HEAD_FG: Color = Color::Rgb { r: 40, g: 90, b: 40 };
const DEAD_FG: Color = Color::Rgb { r: 220, g: 30, b: 30 };
const FOOD_FG: Color = Color::Rgb { r: 255, g: 0, b: 0 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const OVERLAY_BG: Color = Color::Rgb { r: 40, g: 40, b: 40 };

// ── Layout ──

/// Each game cell = 2 terminal columns.
const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
/// Board starts after the left border column.
const MAP_COL: usize = 1;

/// Pulse offset for a snake segment, in [-2, 2].
pub fn pulse(now_ms: u128, index: usize) -> f32 {
    let t = (now_ms % 1_000_000) as f64 / 100.0 + index as f64 * 10.0;
    (t.sin() * 2.0) as f32
}

/// Segment glyph for a pulse value: fuller block when the pulse is high.
fn segment_glyph(p: f32) -> char {
    if p > 1.0 {
        '█'
    } else if p > -1.0 {
        '▓'
    } else {
        '▒'
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    epoch: Instant,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            epoch: Instant::now(),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Repaint every cell on the next frame.
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render<S: HighScoreStore>(&mut self, s: &GameSession<S>, now: Instant) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for clean transition
        let phase = s.phase();
        if self.last_phase != Some(phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(phase);
        }

        let now_ms = now.saturating_duration_since(self.epoch).as_millis();

        self.front.clear();
        self.compose_hud(s);
        self.compose_board(s, now_ms);
        match phase {
            Phase::Idle => self.compose_idle(s),
            Phase::Paused => self.compose_pause_overlay(s, now_ms),
            Phase::Over => self.compose_game_over(s),
            Phase::Running => {}
        }
        self.compose_footer(s, now);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colours; ResetColor would fall back to the
        // terminal default, which may differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn board_cols<S: HighScoreStore>(s: &GameSession<S>) -> usize {
        s.world().grid.width.max(0) as usize * CELL_W
    }

    fn board_rows<S: HighScoreStore>(s: &GameSession<S>) -> usize {
        s.world().grid.height.max(0) as usize
    }

    fn compose_hud<S: HighScoreStore>(&mut self, s: &GameSession<S>) {
        let width = (Self::board_cols(s) + 2).max(self.front.width);
        self.front.fill_row(HUD_ROW, 0, width, HUD_BG);
        let hud = hud_text(s.score(), s.high_score(), s.world().snake.len(), s.tick_interval_ms());
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_board<S: HighScoreStore>(&mut self, s: &GameSession<S>, now_ms: u128) {
        let w = s.world();
        let cols = Self::board_cols(s);
        let rows = Self::board_rows(s);

        // Border
        let right = MAP_COL + cols;
        let bottom = MAP_ROW + rows;
        for x in MAP_COL..right {
            self.front.set(x, MAP_ROW - 1, Cell::new('─', BORDER_FG, Color::Reset));
            self.front.set(x, bottom, Cell::new('─', BORDER_FG, Color::Reset));
        }
        for y in MAP_ROW..bottom {
            self.front.set(0, y, Cell::new('│', BORDER_FG, Color::Reset));
            self.front.set(right, y, Cell::new('│', BORDER_FG, Color::Reset));
        }
        self.front.set(0, MAP_ROW - 1, Cell::new('┌', BORDER_FG, Color::Reset));
        self.front.set(right, MAP_ROW - 1, Cell::new('┐', BORDER_FG, Color::Reset));
        self.front.set(0, bottom, Cell::new('└', BORDER_FG, Color::Reset));
        self.front.set(right, bottom, Cell::new('┘', BORDER_FG, Color::Reset));

        // Background
        for y in MAP_ROW..bottom {
            self.front.fill_row(y, MAP_COL, right, BOARD_BG);
        }

        // Food
        self.put_game_cell(w.food.x, w.food.y, ('█', '▌'), FOOD_FG, s);

        // Snake, head first; the dead snake is drawn solid red
        for (index, seg) in w.snake.iter().enumerate() {
            if w.is_over {
                self.put_game_cell(seg.x, seg.y, ('█', '▌'), DEAD_FG, s);
                continue;
            }
            let g = segment_glyph(pulse(now_ms, index));
            let fg = if index == 0 { HEAD_FG } else { SNAKE_FG };
            self.put_game_cell(seg.x, seg.y, (g, g), fg, s);
        }
    }

    /// Draw grid cell (gx, gy). Off-board cells are skipped.
    fn put_game_cell<S: HighScoreStore>(
        &mut self, gx: i32, gy: i32, glyphs: (char, char), fg: Color, s: &GameSession<S>,
    ) {
        if !s.world().grid.is_in_bounds(GridCell::new(gx, gy)) {
            return;
        }
        let col = MAP_COL + gx as usize * CELL_W;
        let row = MAP_ROW + gy as usize;
        self.front.set(col, row, Cell::new(glyphs.0, fg, BOARD_BG));
        self.front.set(col + 1, row, Cell::new(glyphs.1, fg, BOARD_BG));
    }

    /// Centre `lines` in a dark box over the board.
    fn compose_box<S: HighScoreStore>(&mut self, s: &GameSession<S>, lines: &[(&str, Color)]) {
        let cols = Self::board_cols(s);
        let rows = Self::board_rows(s);
        let inner = lines.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        let box_w = (inner + 4).min(cols.max(1));
        let box_h = (lines.len() + 2).min(rows.max(1));
        let box_x = MAP_COL + cols.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + rows.saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            self.front.fill_row(y, box_x, box_x + box_w, OVERLAY_BG);
        }
        for (i, (line, fg)) in lines.iter().enumerate() {
            let len = line.chars().count();
            let x = box_x + box_w.saturating_sub(len) / 2;
            let y = box_y + 1 + i;
            if y >= box_y + box_h { break; }
            self.front.put_str(x, y, line, *fg, OVERLAY_BG);
        }
    }

    fn compose_idle<S: HighScoreStore>(&mut self, s: &GameSession<S>) {
        let high = format!("High score: {}", s.high_score());
        self.compose_box(s, &[
            ("S N A K E", Color::Rgb { r: 80, g: 255, b: 80 }),
            ("", Color::White),
            (high.as_str(), Color::White),
            ("ENTER to start", Color::Rgb { r: 100, g: 200, b: 255 }),
        ]);
    }

    fn compose_pause_overlay<S: HighScoreStore>(&mut self, s: &GameSession<S>, now_ms: u128) {
        let blink = (now_ms / 400) % 2 == 0;
        let label = if blink { "▶  PAUSED  ◀" } else { "   PAUSED   " };
        self.compose_box(s, &[
            (label, Color::Rgb { r: 255, g: 220, b: 50 }),
            ("P to resume", Color::Rgb { r: 180, g: 180, b: 180 }),
        ]);
    }

    fn compose_game_over<S: HighScoreStore>(&mut self, s: &GameSession<S>) {
        let score = format!("Score: {}", s.score());
        let high = format!("High score: {}", s.high_score());
        self.compose_box(s, &[
            ("Game Over!", DEAD_FG),
            ("", Color::White),
            (score.as_str(), Color::White),
            (high.as_str(), Color::White),
            ("ENTER: play again", Color::Rgb { r: 80, g: 255, b: 80 }),
        ]);
    }

    fn compose_footer<S: HighScoreStore>(&mut self, s: &GameSession<S>, now: Instant) {
        let msg_row = MAP_ROW + Self::board_rows(s) + 1;
        if let Some(msg) = s.message(now) {
            let width = Self::board_cols(s) + 2;
            self.front.fill_row(msg_row, 0, width, MSG_BG);
            self.front.put_str(0, msg_row, &format!(" ◈ {} ", msg), Color::Black, MSG_BG);
        }

        let help = " ←↑↓→/WASD:Move  Enter:Start  P:Pause  +/-:Speed  Q:Quit";
        self.front.put_str(0, msg_row + 1, help, Color::DarkGrey, Color::Reset);
    }
}

fn hud_text(score: u32, high: u32, length: usize, tick_ms: u64) -> String {
    format!(" Score:{:<6} High:{:<6} Length:{:<4} Speed:{}ms", score, high, length, tick_ms)
}
