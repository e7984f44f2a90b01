//! Terminal rendering: a character-cell implementation of `Surface`.
//!
//! The scene draws in logical viewport units; this module scales them onto
//! the terminal grid, buffers one frame of cells and flushes it with queued
//! crossterm commands. No game logic lives here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use space_raid::effects::EffectKind;
use space_raid::sprites::{Size, Sprite};
use space_raid::surface::{Rect, Rgba, Surface, TextAlign, Transform};

// ── Palette ───────────────────────────────────────────────────────────────────

const C_ASTEROID: Rgba = Rgba::rgb(170, 140, 100);
const C_ENEMY: Rgba = Rgba::rgb(90, 200, 90);
const C_BOSS: Rgba = Rgba::rgb(220, 60, 200);
const C_BOSS_DAMAGED: Rgba = Rgba::rgb(230, 50, 50);
const C_SHIP: Rgba = Rgba::WHITE;
const C_THRUST: Rgba = Rgba::rgb(255, 200, 60);
const C_SHIELD: Rgba = Rgba::rgb(51, 210, 206);
const C_PLAYER_SHOT: Rgba = Rgba::rgb(120, 230, 255);
const C_ENEMY_SHOT: Rgba = Rgba::rgb(255, 90, 200);
const C_CRYSTAL: Rgba = Rgba::rgb(90, 140, 255);
const C_EXPLOSION: Rgba = Rgba::rgb(255, 140, 40);
const C_HIT: Rgba = Rgba::rgb(255, 240, 120);

/// Glyphs an animation sheet fades through, first frame to last.
const FADE: [char; 5] = ['@', '#', '*', '+', '.'];

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell { ch: ' ', fg: Color::Reset };

pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    /// Cells per logical unit on each axis.
    cell_x: f64,
    cell_y: f64,
    viewport: Size,
    cells: Vec<Cell>,
    transform: Transform,
    stack: Vec<Transform>,
    fill: Rgba,
    stroke: Rgba,
    alpha: f64,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, viewport: Size) -> Self {
        let mut surface = TerminalSurface {
            cols: 0,
            rows: 0,
            cell_x: 1.0,
            cell_y: 1.0,
            viewport,
            cells: Vec::new(),
            transform: Transform::IDENTITY,
            stack: Vec::new(),
            fill: Rgba::WHITE,
            stroke: Rgba::WHITE,
            alpha: 1.0,
        };
        surface.resize(cols, rows);
        surface
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cell_x = f64::from(self.cols) / self.viewport.width;
        self.cell_y = f64::from(self.rows) / self.viewport.height;
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    /// Write the buffered frame to the terminal.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut current = Color::Reset;
        out.queue(style::ResetColor)?;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            let line = &self.cells[start..start + self.cols as usize];
            let mut run = String::with_capacity(line.len());
            for cell in line {
                if cell.fg != current && cell.ch != ' ' {
                    out.queue(Print(&run))?;
                    run.clear();
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    current = cell.fg;
                }
                run.push(cell.ch);
            }
            out.queue(Print(&run))?;
        }
        out.queue(style::ResetColor)?;
        out.flush()?;
        Ok(())
    }

    // ── Cell helpers ──────────────────────────────────────────────────────────

    fn colour(&self, rgba: Rgba) -> Color {
        let k = self.alpha.clamp(0.0, 1.0) * f64::from(rgba.a) / 255.0;
        Color::Rgb {
            r: (f64::from(rgba.r) * k) as u8,
            g: (f64::from(rgba.g) * k) as u8,
            b: (f64::from(rgba.b) * k) as u8,
        }
    }

    fn plot(&mut self, col: i64, row: i64, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= i64::from(self.cols) || row >= i64::from(self.rows) {
            return;
        }
        let index = row as usize * self.cols as usize + col as usize;
        self.cells[index] = Cell { ch, fg };
    }

    fn to_cell(&self, x: f64, y: f64) -> (i64, i64) {
        ((x * self.cell_x).floor() as i64, (y * self.cell_y).floor() as i64)
    }

    /// Cell range covered by `rect` under the current transform. Always at
    /// least one cell, so small sprites stay visible.
    fn cell_span(&self, rect: &Rect) -> (i64, i64, i64, i64) {
        let corners = [
            self.transform.apply(rect.x, rect.y),
            self.transform.apply(rect.x + rect.width, rect.y),
            self.transform.apply(rect.x, rect.y + rect.height),
            self.transform.apply(rect.x + rect.width, rect.y + rect.height),
        ];
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        let (centre_col, centre_row) = self.to_cell((min_x + max_x) * 0.5, (min_y + max_y) * 0.5);
        let (left, top) = self.to_cell(min_x, min_y);
        let (right, bottom) = self.to_cell(max_x, max_y);
        if right <= left || bottom <= top {
            return (centre_col, centre_row, centre_col, centre_row);
        }
        (left, top, right - 1, bottom - 1)
    }

    fn fill_span(&mut self, rect: &Rect, ch: char, fg: Color) {
        let (left, top, right, bottom) = self.cell_span(rect);
        for row in top..=bottom {
            for col in left..=right {
                self.plot(col, row, ch, fg);
            }
        }
    }

    fn outline_span(&mut self, rect: &Rect, ch: char, fg: Color) {
        let (left, top, right, bottom) = self.cell_span(rect);
        for row in top..=bottom {
            for col in left..=right {
                if row == top || row == bottom || col == left || col == right {
                    self.plot(col, row, ch, fg);
                }
            }
        }
    }
}

/// Glyph and colour for a whole sprite; `None` for backdrops.
fn glyph(sprite: Sprite) -> Option<(char, Rgba)> {
    let look = match sprite {
        Sprite::StartScreen | Sprite::GameOverScreen | Sprite::Background => return None,
        Sprite::Asteroid(_) => ('@', C_ASTEROID),
        Sprite::Enemy(_) => ('V', C_ENEMY),
        Sprite::Boss(tier) if tier <= 1 => ('W', C_BOSS_DAMAGED),
        Sprite::Boss(_) => ('W', C_BOSS),
        Sprite::Ship => ('A', C_SHIP),
        Sprite::ShipThrust => ('A', C_THRUST),
        Sprite::MiniShip => ('^', C_SHIP),
        Sprite::Shield => ('o', C_SHIELD),
        Sprite::MiniShield => ('o', C_SHIELD),
        Sprite::Torpedo => ('|', C_PLAYER_SHOT),
        Sprite::Rocket => ('!', C_THRUST),
        Sprite::EnemyTorpedo => ('*', C_ENEMY_SHOT),
        Sprite::EnemyBossTorpedo => ('0', C_ENEMY_SHOT),
        Sprite::Crystal => ('<', C_CRYSTAL),
        Sprite::Sheet(EffectKind::Hit | EffectKind::EnemyBossHit) => ('*', C_HIT),
        Sprite::Sheet(_) => ('#', C_EXPLOSION),
    };
    Some(look)
}

impl Surface for TerminalSurface {
    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = BLANK);
        self.transform = Transform::IDENTITY;
        self.stack.clear();
        self.alpha = 1.0;
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        self.transform = self.stack.pop().unwrap_or_default();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.translated(dx, dy);
    }

    fn rotate(&mut self, degrees: f64) {
        self.transform = self.transform.rotated(degrees);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.scaled(sx, sy);
    }

    fn draw_image(&mut self, sprite: Sprite, dest: Rect) {
        let Some((ch, rgba)) = glyph(sprite) else {
            return;
        };
        let fg = self.colour(rgba);
        match sprite {
            Sprite::Shield => self.outline_span(&dest, ch, fg),
            Sprite::Crystal => {
                let (left, top, right, bottom) = self.cell_span(&dest);
                let row = (top + bottom) / 2;
                self.plot(left, row, '<', fg);
                self.plot(right.max(left + 1), row, '>', fg);
            }
            _ => self.fill_span(&dest, ch, fg),
        }
    }

    fn draw_image_region(&mut self, sprite: Sprite, src: Rect, dest: Rect) {
        let Sprite::Sheet(kind) = sprite else {
            // The scrolling backdrop stays blank in a terminal.
            return;
        };
        let Some((_, rgba)) = glyph(sprite) else {
            return;
        };
        let (columns, rows) = kind.grid();
        let cell = (src.y / src.height.max(1.0)) * f64::from(columns) + src.x / src.width.max(1.0);
        let progress = cell / f64::from(u16::from(columns) * u16::from(rows));
        let stage = ((progress * FADE.len() as f64) as usize).min(FADE.len() - 1);
        let fg = self.colour(rgba);
        let (left, top, right, bottom) = self.cell_span(&dest);
        let (col, row) = ((left + right) / 2, (top + bottom) / 2);
        // Explosions swell, then shrink to a single spark.
        let reach = if stage < 2 { (right - left) / 2 } else { 0 };
        for c in col - reach..=col + reach {
            self.plot(c, row, FADE[stage], fg);
        }
    }

    fn fill_rect(&mut self, rect: Rect) {
        let fg = self.colour(self.fill);
        self.fill_span(&rect, '=', fg);
    }

    fn fill_oval(&mut self, rect: Rect) {
        let fg = self.colour(self.fill);
        let (x, y) = rect.centre();
        let (tx, ty) = self.transform.apply(x, y);
        let (col, row) = self.to_cell(tx, ty);
        self.plot(col, row, '.', fg);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        let fg = self.colour(self.stroke);
        self.outline_span(&rect, '+', fg);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign) {
        let fg = self.colour(self.fill);
        let (tx, ty) = self.transform.apply(x, y);
        let (mut col, row) = self.to_cell(tx, ty);
        if align == TextAlign::Center {
            col -= text.chars().count() as i64 / 2;
        }
        for (i, ch) in text.chars().enumerate() {
            self.plot(col + i as i64, row, ch, fg);
        }
    }

    fn set_fill(&mut self, colour: Rgba) {
        self.fill = colour;
    }

    fn set_stroke(&mut self, colour: Rgba) {
        self.stroke = colour;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }
}
