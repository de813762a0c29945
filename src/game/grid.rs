//! Grid geometry: coordinates, directions, terrain, and the square map

use serde::{Deserialize, Serialize};

/// A position on the grid.
///
/// Components are signed so that a proposed move one step outside the grid
/// is representable while the bounds check rejects it; committed player
/// positions are always in-bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this coordinate by a relative (dx, dy), returning a new value.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Movement directions. North points towards y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Unit vector for one step in this direction.
    pub fn unit(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }
}

/// Terrain a square can hold. Assigned by the layout builder at world
/// construction and static afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Terrain {
    #[default]
    Empty,
    Wall,
}

/// A single cell of the grid.
#[derive(Debug, Clone)]
pub struct MapSquare {
    pub coord: Coord,
    pub terrain: Terrain,
}

/// The 2D square map. Owns exactly one `MapSquare` per in-bounds coordinate.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major, index = y * width + x
    squares: Vec<MapSquare>,
}

impl Grid {
    /// Create a grid of the given extents with every square `Terrain::Empty`.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid extents must be positive");

        let mut squares = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                squares.push(MapSquare {
                    coord: Coord::new(x, y),
                    terrain: Terrain::Empty,
                });
            }
        }

        Self {
            width,
            height,
            squares,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Single source of truth for containment.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    fn index_of(&self, coord: Coord) -> usize {
        (coord.y * self.width + coord.x) as usize
    }

    /// Look up the square at `coord`, or `None` when out of bounds.
    pub fn square_at(&self, coord: Coord) -> Option<&MapSquare> {
        if !self.is_in_bounds(coord) {
            return None;
        }
        Some(&self.squares[self.index_of(coord)])
    }

    pub fn square_at_mut(&mut self, coord: Coord) -> Option<&mut MapSquare> {
        if !self.is_in_bounds(coord) {
            return None;
        }
        let idx = self.index_of(coord);
        Some(&mut self.squares[idx])
    }

    /// Iterate every square, y outer, x inner. Each call starts a fresh
    /// traversal.
    pub fn iter_squares(&self) -> impl Iterator<Item = &MapSquare> {
        self.squares.iter()
    }

    /// Mutable traversal in the same order, for layout builders.
    pub fn iter_squares_mut(&mut self) -> impl Iterator<Item = &mut MapSquare> {
        self.squares.iter_mut()
    }
}
