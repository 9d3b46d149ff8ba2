use rand::seq::SliceRandom;
use rand::Rng;

use crate::maze::{self, Tile};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    // Attack resolution scans in this order, so it is fixed.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

/// One decoded keypress from the input port.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Attack,
    Quit,
    Unknown,
}

impl Command {
    fn dir(self) -> Option<Dir> {
        match self {
            Command::Up => Some(Dir::Up),
            Command::Down => Some(Dir::Down),
            Command::Left => Some(Dir::Left),
            Command::Right => Some(Dir::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttackOutcome {
    Defeated,
    NoTarget,
}

/// What a dispatched command did to the session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Playing,
    Attacked(AttackOutcome),
    LevelComplete,
    GameOver,
    Quit,
}

/// One level's worth of game state. Replaced wholesale on level advance;
/// player and enemy coordinates never outlive the grid they index.
pub struct Session {
    pub level: u32,
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<Tile>>,
    pub player: Pos,
    pub enemies: Vec<Pos>,
}

impl Session {
    pub fn new(level: u32, rng: &mut impl Rng) -> Self {
        let (width, height) = maze::level_dims(level);
        let mut grid = maze::create(width, height);
        maze::carve(&mut grid, width, height, rng);
        let player = Pos { x: 1, y: 1 };
        let enemies = spawn_enemies(&grid, player, level as usize, rng);
        Session {
            level,
            width,
            height,
            grid,
            player,
            enemies,
        }
    }

    /// Discard this level and build the next, one size larger.
    pub fn advance(&mut self, rng: &mut impl Rng) {
        *self = Session::new(self.level + 1, rng);
    }

    /// Dispatch one command. Quit and attack never cost an enemy turn;
    /// everything else (including unrecognized input) does.
    pub fn apply(&mut self, cmd: Command, rng: &mut impl Rng) -> Outcome {
        match cmd {
            Command::Quit => Outcome::Quit,
            Command::Attack => Outcome::Attacked(attack(self.player, &mut self.enemies)),
            _ => {
                if let Some(dir) = cmd.dir() {
                    self.player =
                        move_player(&self.grid, self.width, self.height, self.player, dir);
                }
                if self.grid[self.player.y][self.player.x] == Tile::Exit {
                    return Outcome::LevelComplete;
                }
                let caught = move_enemies(
                    &self.grid,
                    self.width,
                    self.height,
                    self.player,
                    &mut self.enemies,
                    rng,
                );
                if caught {
                    Outcome::GameOver
                } else {
                    Outcome::Playing
                }
            }
        }
    }
}

fn try_step(width: usize, height: usize, pos: Pos, dir: Dir) -> Option<Pos> {
    let (dx, dy) = dir.delta();
    let nx = pos.x as isize + dx;
    let ny = pos.y as isize + dy;
    if nx < 0 || ny < 0 {
        return None;
    }
    let (nx, ny) = (nx as usize, ny as usize);
    if nx >= width || ny >= height {
        return None;
    }
    Some(Pos { x: nx, y: ny })
}

/// One step in `dir` unless the target cell is a wall or out of bounds;
/// blocked moves are silent no-ops.
pub fn move_player(grid: &[Vec<Tile>], width: usize, height: usize, player: Pos, dir: Dir) -> Pos {
    match try_step(width, height, player, dir) {
        Some(next) if grid[next.y][next.x] != Tile::Wall => next,
        _ => player,
    }
}

/// Strike the first enemy on an orthogonally adjacent cell, scanning
/// up, down, left, right. At most one enemy is removed.
pub fn attack(player: Pos, enemies: &mut Vec<Pos>) -> AttackOutcome {
    for dir in Dir::ALL {
        let (dx, dy) = dir.delta();
        let tx = player.x as isize + dx;
        let ty = player.y as isize + dy;
        if tx < 0 || ty < 0 {
            continue;
        }
        let target = Pos {
            x: tx as usize,
            y: ty as usize,
        };
        if let Some(idx) = enemies.iter().position(|e| *e == target) {
            enemies.remove(idx);
            return AttackOutcome::Defeated;
        }
    }
    AttackOutcome::NoTarget
}

/// Shuffle every enemy one step toward a random open neighbor, never onto
/// the player's cell. Returns whether any enemy ended the sweep on the
/// player; that only happens when the player stepped onto an enemy that
/// has nowhere left to run.
pub fn move_enemies(
    grid: &[Vec<Tile>],
    width: usize,
    height: usize,
    player: Pos,
    enemies: &mut [Pos],
    rng: &mut impl Rng,
) -> bool {
    let mut caught = false;
    for enemy in enemies.iter_mut() {
        let mut moves = Vec::new();
        for dir in Dir::ALL {
            if let Some(next) = try_step(width, height, *enemy, dir) {
                if grid[next.y][next.x] != Tile::Wall && next != player {
                    moves.push(next);
                }
            }
        }
        if let Some(&next) = moves.choose(rng) {
            *enemy = next;
        }
        if *enemy == player {
            caught = true;
        }
    }
    caught
}

fn spawn_enemies(grid: &[Vec<Tile>], player: Pos, count: usize, rng: &mut impl Rng) -> Vec<Pos> {
    let mut open = Vec::new();
    for (y, row) in grid.iter().enumerate() {
        for (x, tile) in row.iter().enumerate() {
            let pos = Pos { x, y };
            if *tile == Tile::Open && pos != player {
                open.push(pos);
            }
        }
    }
    assert!(
        open.len() >= count,
        "maze has {} free cells, cannot place {} enemies",
        open.len(),
        count
    );
    open.shuffle(rng);
    open.truncate(count);
    open
}
