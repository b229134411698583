use crate::types::{Cell, CollectibleKind, GhostName};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Wall,
    Open,
    Dot,
    Power,
}

/// Immutable maze for one level: cell grid, player spawn slots and the ghost
/// den. Pure lookups only; nothing here mutates after construction.
#[derive(Clone, Debug)]
pub struct Maze {
    grid: Vec<Vec<CellKind>>,
    rows: i32,
    cols: i32,
    spawn_points: Vec<Cell>,
    den: Cell,
}

impl Maze {
    /// Parses a character-art maze: `#` wall, `.` dot, `o` power pellet,
    /// space open floor. Returns `None` for an empty or ragged grid, or when
    /// a spawn point or ghost start lands on a wall.
    pub fn parse(rows: &[&str], spawn_points: Vec<Cell>, den: Cell) -> Option<Maze> {
        if rows.is_empty() || spawn_points.is_empty() {
            return None;
        }
        let width = rows[0].chars().count();
        if width == 0 {
            return None;
        }

        let mut grid = Vec::with_capacity(rows.len());
        for row in rows {
            if row.chars().count() != width {
                return None;
            }
            let mut cells = Vec::with_capacity(width);
            for ch in row.chars() {
                cells.push(match ch {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Dot,
                    'o' => CellKind::Power,
                    ' ' => CellKind::Open,
                    _ => return None,
                });
            }
            grid.push(cells);
        }

        let maze = Maze {
            rows: grid.len() as i32,
            cols: width as i32,
            grid,
            spawn_points,
            den,
        };

        if !maze.spawn_points.iter().all(|cell| maze.is_walkable(*cell)) {
            return None;
        }
        for name in GhostName::ALL {
            if !maze.is_walkable(maze.ghost_start(name)) {
                return None;
            }
        }
        Some(maze)
    }

    /// The built-in level: a bordered pillar maze with a central den, four
    /// power pellets in the corners and dots everywhere else.
    pub fn default_level() -> Maze {
        const ROWS: [&str; 15] = [
            "###################",
            "#o...............o#",
            "#.#.#.#.#...#.#.#.#",
            "#.................#",
            "#.#.#.#.#...#.#.#.#",
            "#.................#",
            "#.#.#.#.#...#.#.#.#",
            "#........   ......#",
            "#.#.#.#.#...#.#.#.#",
            "#.................#",
            "#.#.#.#.#...#.#.#.#",
            "#.................#",
            "#.#.#.#.#...#.#.#.#",
            "#o...............o#",
            "###################",
        ];
        let spawn_points = vec![(3, 1), (3, 17), (11, 1), (11, 17)];
        Maze::parse(&ROWS, spawn_points, (7, 10)).expect("built-in level should parse")
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn cell(&self, cell: Cell) -> Option<CellKind> {
        let (row, col) = cell;
        if row < 0 || col < 0 || row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.grid[row as usize][col as usize])
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        matches!(
            self.cell(cell),
            Some(CellKind::Open | CellKind::Dot | CellKind::Power)
        )
    }

    /// Spawn slot for the given join index. Indexes past the end of the
    /// spawn list fall back to slot 0 rather than erroring.
    pub fn spawn_point(&self, index: usize) -> Cell {
        self.spawn_points
            .get(index)
            .copied()
            .unwrap_or(self.spawn_points[0])
    }

    pub fn spawn_count(&self) -> usize {
        self.spawn_points.len()
    }

    /// Ghost starting cells fan out from the den cell.
    pub fn ghost_start(&self, name: GhostName) -> Cell {
        let (row, col) = self.den;
        match name {
            GhostName::Blinky => (row, col),
            GhostName::Pinky => (row, col + 1),
            GhostName::Inky => (row - 1, col),
            GhostName::Clyde => (row + 1, col),
        }
    }

    /// Fixed scatter target per ghost: one distinct corner each.
    pub fn scatter_corner(&self, name: GhostName) -> Cell {
        match name {
            GhostName::Blinky => (0, self.cols - 1),
            GhostName::Pinky => (0, 0),
            GhostName::Inky => (self.rows - 1, self.cols - 1),
            GhostName::Clyde => (self.rows - 1, 0),
        }
    }

    /// All collectible-bearing cells, row-major order.
    pub fn collectible_cells(&self) -> Vec<(Cell, CollectibleKind)> {
        let mut out = Vec::new();
        for (row, cells) in self.grid.iter().enumerate() {
            for (col, kind) in cells.iter().enumerate() {
                let cell = (row as i32, col as i32);
                match kind {
                    CellKind::Dot => out.push((cell, CollectibleKind::Dot)),
                    CellKind::Power => out.push((cell, CollectibleKind::Power)),
                    CellKind::Wall | CellKind::Open => {}
                }
            }
        }
        out
    }
}
