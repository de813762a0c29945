//! Layout strategies that populate a grid's terrain before the world goes live

use std::str::FromStr;

use super::grid::{Coord, Grid, Terrain};

/// A terrain-generation strategy. `build_layout` runs exactly once, during
/// world construction, before any player joins.
pub trait LayoutBuilder {
    fn build_layout(&self, grid: &mut Grid);

    /// Candidate neighbor coordinates at offset ±2 per axis, filtered to
    /// in-bounds. Surface for maze-style generators; the shipped strategies
    /// do not consume it.
    fn neighbor_candidates(&self, grid: &Grid, coord: Coord) -> Vec<Coord> {
        const OFFSETS: [(i32, i32); 4] = [(-2, 0), (0, -2), (2, 0), (0, 2)];
        OFFSETS
            .iter()
            .map(|&(dx, dy)| coord.offset(dx, dy))
            .filter(|&c| grid.is_in_bounds(c))
            .collect()
    }
}

/// Default strategy: every square empty.
pub struct EmptyLayout;

impl LayoutBuilder for EmptyLayout {
    fn build_layout(&self, grid: &mut Grid) {
        for sq in grid.iter_squares_mut() {
            sq.terrain = Terrain::Empty;
        }
    }
}

/// Walls along the border ring, empty interior. Walls are render-only;
/// movement is constrained by grid bounds, not terrain.
pub struct PerimeterLayout;

impl LayoutBuilder for PerimeterLayout {
    fn build_layout(&self, grid: &mut Grid) {
        let (w, h) = (grid.width(), grid.height());
        for sq in grid.iter_squares_mut() {
            let Coord { x, y } = sq.coord;
            sq.terrain = if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                Terrain::Wall
            } else {
                Terrain::Empty
            };
        }
    }
}

/// Strategy selector, chosen by configuration rather than subclassing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutKind {
    #[default]
    Empty,
    Perimeter,
}

impl LayoutKind {
    pub fn builder(self) -> Box<dyn LayoutBuilder + Send + Sync> {
        match self {
            LayoutKind::Empty => Box::new(EmptyLayout),
            LayoutKind::Perimeter => Box::new(PerimeterLayout),
        }
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(LayoutKind::Empty),
            "perimeter" => Ok(LayoutKind::Perimeter),
            other => Err(format!("unknown layout kind: {other}")),
        }
    }
}
