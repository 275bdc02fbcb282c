use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn delta_to(&self, other: &Position) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }
}

/// One-cell moves on the grid. The y axis grows southward, matching the
/// canvas coordinates the workspace layouts are authored in.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
        }
    }

    pub fn from_delta(delta: (i32, i32)) -> Option<Direction> {
        match delta {
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            _ => None,
        }
    }
}

/// Per-edge traversal cost, keyed by the direction of the step. Uniform
/// grids use the same cost on every edge; directional grids (conveyor
/// lanes, one-way aisles) charge each heading separately.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct EdgeCosts {
    pub east: i32,
    pub west: i32,
    pub north: i32,
    pub south: i32,
}

impl EdgeCosts {
    pub fn uniform(cost: i32) -> Self {
        Self {
            east: cost,
            west: cost,
            north: cost,
            south: cost,
        }
    }

    pub fn step(&self, direction: Direction) -> i32 {
        match direction {
            Direction::East => self.east,
            Direction::West => self.west,
            Direction::North => self.north,
            Direction::South => self.south,
        }
    }

    pub fn min_step(&self) -> i32 {
        self.east.min(self.west).min(self.north).min(self.south)
    }
}

/// Obstacle layout of the workspace. Cells are indexed `[x][y]`;
/// anything outside the bounds counts as blocked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    layout: Vec<Vec<bool>>,
}

impl Grid {
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            layout: vec![vec![false; height]; width],
        }
    }

    pub fn from_layout(layout: Vec<Vec<bool>>) -> Result<Self> {
        let width = layout.len();
        let height = layout.first().map(|column| column.len()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(anyhow!("grid layout must have at least one cell"));
        }
        if layout.iter().any(|column| column.len() != height) {
            return Err(anyhow!("grid layout columns must all have equal height"));
        }
        Ok(Self {
            width,
            height,
            layout,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn is_blocked(&self, pos: Position) -> bool {
        !self.in_bounds(pos) || self.layout[pos.x as usize][pos.y as usize]
    }

    pub fn set_blocked(&mut self, pos: Position, blocked: bool) {
        if self.in_bounds(pos) {
            self.layout[pos.x as usize][pos.y as usize] = blocked;
        }
    }

    /// Open 4-connected neighbours, probed east, west, north, south. The
    /// probe order is fixed so equal-cost searches expand deterministically.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::ALL
            .iter()
            .map(|&direction| pos.step(direction))
            .filter(|&next| !self.is_blocked(next))
            .collect()
    }

    pub fn open_cells(&self) -> usize {
        self.layout
            .iter()
            .flatten()
            .filter(|&&blocked| !blocked)
            .count()
    }
}
