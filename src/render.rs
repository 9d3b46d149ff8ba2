use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthStr;

use crate::game::{Pos, Session};
use crate::maze::Tile;

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Enemy,
    Wall,
    Open,
    Exit,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

/// Diff renderer: only cells and lines that changed since the last frame
/// are redrawn. Rebuilt whenever the grid dimensions change.
pub struct Renderer {
    width: usize,
    height: usize,
    last: Vec<Cell>,
    last_hud: String,
    last_status: String,
    needs_full: bool,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            last: vec![
                Cell {
                    glyph: Glyph::Open,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_status: String::new(),
            needs_full: true,
        }
    }

    pub fn render(
        &mut self,
        stdout: &mut Stdout,
        session: &Session,
        status: &str,
    ) -> io::Result<()> {
        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
        }

        let hud = format!(
            "Level: {} - WASD to move, 'f' to attack, 'q' to quit. Reach the exit, avoid enemies!",
            session.level
        );
        if self.needs_full || hud != self.last_hud {
            stdout.queue(MoveTo(0, 0))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(&hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud;
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let cell = cell_for(session, Pos { x, y });
                let idx = y * self.width + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    draw_cell(stdout, x, y, cell)?;
                }
            }
        }

        if self.needs_full || status != self.last_status {
            stdout.queue(MoveTo(0, (self.height + 1) as u16))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(status))?;
            self.last_status = status.to_string();
        }

        self.needs_full = false;
        stdout.flush()
    }
}

fn cell_for(session: &Session, pos: Pos) -> Cell {
    if pos == session.player {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if session.enemies.iter().any(|e| *e == pos) {
        return Cell {
            glyph: Glyph::Enemy,
            color: Color::Red,
        };
    }
    match session.grid[pos.y][pos.x] {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Open => Cell {
            glyph: Glyph::Open,
            color: Color::Reset,
        },
        Tile::Exit => Cell {
            glyph: Glyph::Exit,
            color: Color::Green,
        },
    }
}

fn draw_cell(stdout: &mut Stdout, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player => "😃",
        Glyph::Enemy => "👾",
        Glyph::Wall => "██",
        Glyph::Open => "  ",
        Glyph::Exit => "🚪",
    };
    // Grid starts one row below the HUD line.
    stdout.queue(MoveTo((x * CELL_W) as u16, (y + 1) as u16))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
