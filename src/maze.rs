use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    Open,
    Exit,
}

/// Maze dimensions for a level. Width stays odd; height alternates parity.
pub fn level_dims(level: u32) -> (usize, usize) {
    (15 + 2 * level as usize, 7 + level as usize)
}

/// All-wall grid with the odd/odd rooms inside the border opened.
pub fn create(width: usize, height: usize) -> Vec<Vec<Tile>> {
    assert!(width >= 3 && height >= 3, "maze needs at least a 3x3 grid");
    let mut grid = vec![vec![Tile::Wall; width]; height];
    for y in (1..height - 1).step_by(2) {
        for x in (1..width - 1).step_by(2) {
            grid[y][x] = Tile::Open;
        }
    }
    grid
}

/// Carve a perfect maze over the room lattice by iterative backtracking:
/// walk to a random unvisited neighbor room, knocking out the wall slot
/// between, and pop back when a room has none left. Every room ends up
/// connected by exactly one path.
pub fn carve(grid: &mut [Vec<Tile>], width: usize, height: usize, rng: &mut impl Rng) {
    let cells_w = (width - 1) / 2;
    let cells_h = (height - 1) / 2;
    let mut visited = vec![vec![false; cells_w]; cells_h];
    let mut stack = vec![(0usize, 0usize)];
    visited[0][0] = true;

    while let Some(&(cx, cy)) = stack.last() {
        let mut neighbors = Vec::new();
        if cy > 0 && !visited[cy - 1][cx] {
            neighbors.push((cx, cy - 1));
        }
        if cy + 1 < cells_h && !visited[cy + 1][cx] {
            neighbors.push((cx, cy + 1));
        }
        if cx > 0 && !visited[cy][cx - 1] {
            neighbors.push((cx - 1, cy));
        }
        if cx + 1 < cells_w && !visited[cy][cx + 1] {
            neighbors.push((cx + 1, cy));
        }

        match neighbors.choose(rng) {
            Some(&(nx, ny)) => {
                open_between(grid, (cx, cy), (nx, ny));
                visited[ny][nx] = true;
                stack.push((nx, ny));
            }
            None => {
                stack.pop();
            }
        }
    }

    grid[1][1] = Tile::Open;
    // On even heights this slot sits below the last room row and was never
    // carved; the room above it keeps the exit reachable either way.
    grid[height - 2][width - 2] = Tile::Exit;
}

fn open_between(grid: &mut [Vec<Tile>], (cx, cy): (usize, usize), (nx, ny): (usize, usize)) {
    let gx = cx * 2 + 1;
    let gy = cy * 2 + 1;
    let ngx = nx * 2 + 1;
    let ngy = ny * 2 + 1;
    grid[(gy + ngy) / 2][(gx + ngx) / 2] = Tile::Open;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn carved(width: usize, height: usize, seed: u64) -> Vec<Vec<Tile>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = create(width, height);
        carve(&mut grid, width, height, &mut rng);
        grid
    }

    fn reachable_from_start(grid: &[Vec<Tile>]) -> Vec<Vec<bool>> {
        let height = grid.len();
        let width = grid[0].len();
        let mut seen = vec![vec![false; width]; height];
        let mut queue = VecDeque::new();
        seen[1][1] = true;
        queue.push_back((1usize, 1usize));
        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in [(0isize, -1isize), (0, 1), (-1, 0), (1, 0)] {
                let nx = (x as isize + dx) as usize;
                let ny = (y as isize + dy) as usize;
                if nx >= width || ny >= height || seen[ny][nx] {
                    continue;
                }
                if grid[ny][nx] == Tile::Wall {
                    continue;
                }
                seen[ny][nx] = true;
                queue.push_back((nx, ny));
            }
        }
        seen
    }

    #[test]
    fn fresh_grid_opens_only_odd_rooms() {
        let grid = create(5, 5);
        for (y, row) in grid.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let room = x % 2 == 1 && y % 2 == 1 && x < 4 && y < 4;
                let expected = if room { Tile::Open } else { Tile::Wall };
                assert_eq!(*tile, expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn borders_stay_walled() {
        for level in 1..=6 {
            let (w, h) = level_dims(level);
            let grid = carved(w, h, level as u64);
            for x in 0..w {
                assert_eq!(grid[0][x], Tile::Wall);
                assert_eq!(grid[h - 1][x], Tile::Wall);
            }
            for y in 0..h {
                assert_eq!(grid[y][0], Tile::Wall);
                assert_eq!(grid[y][w - 1], Tile::Wall);
            }
        }
    }

    #[test]
    fn carving_yields_a_spanning_tree() {
        // Odd dimensions: the exit overlays a room, so the open cells are
        // exactly the rooms plus rooms - 1 carved corridors.
        for seed in 0..5 {
            let (w, h) = (17, 9);
            let grid = carved(w, h, seed);
            let rooms = ((w - 1) / 2) * ((h - 1) / 2);
            let open_count = grid.iter().flatten().filter(|t| **t != Tile::Wall).count();
            assert_eq!(open_count, 2 * rooms - 1, "seed {seed}");

            let seen = reachable_from_start(&grid);
            for y in 0..h {
                for x in 0..w {
                    if grid[y][x] != Tile::Wall {
                        assert!(seen[y][x], "unreachable cell ({x}, {y}), seed {seed}");
                    }
                }
            }
        }
    }

    #[test]
    fn four_room_maze_carves_exactly_three_corridors() {
        let grid = carved(5, 5, 42);
        let non_wall = grid.iter().flatten().filter(|t| **t != Tile::Wall).count();
        assert_eq!(non_wall, 7); // 4 rooms + 3 corridors
        assert_eq!(grid[1][1], Tile::Open);
        assert_eq!(grid[3][3], Tile::Exit);

        let seen = reachable_from_start(&grid);
        for (x, y) in [(1, 1), (1, 3), (3, 1), (3, 3)] {
            assert!(seen[y][x], "room ({x}, {y}) cut off");
        }
    }

    #[test]
    fn exit_is_reachable_for_both_height_parities() {
        for level in 1..=5 {
            let (w, h) = level_dims(level);
            for seed in 0..3 {
                let grid = carved(w, h, seed * 31 + level as u64);
                assert_eq!(grid[h - 2][w - 2], Tile::Exit);
                let seen = reachable_from_start(&grid);
                assert!(seen[h - 2][w - 2], "exit cut off at level {level}");
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_maze() {
        let a = carved(17, 8, 7);
        let b = carved(17, 8, 7);
        assert_eq!(a, b);
        let c = carved(17, 8, 8);
        assert_ne!(a, c);
    }

    #[test]
    fn dimensions_scale_linearly_with_level() {
        assert_eq!(level_dims(1), (17, 8));
        assert_eq!(level_dims(3), (21, 10));
    }

    #[test]
    #[should_panic(expected = "3x3")]
    fn rejects_degenerate_dimensions() {
        create(2, 5);
    }
}
