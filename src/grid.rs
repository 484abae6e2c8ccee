//! Structured cavity grid and point classification.
//!
//! The cavity interior is discretized as a `px` x `py` row-major point set
//! (x-index runs fastest, row stride `px`). All four walls lie just outside
//! the point set, so every point is an unknown degree of freedom and wall
//! velocities enter only as known boundary constants in the stencils.

use anyhow::{Result, ensure};

/// Category of a grid point, derived from its position relative to the walls.
///
/// Edge categories exclude the corners; each corner is its own variant because
/// it borders two walls at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCategory {
    Interior,
    LeftEdge,
    RightEdge,
    BottomEdge,
    /// Adjacent to the moving lid.
    TopEdge,
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl PointCategory {
    /// True when the western neighbor of a point in this category lies on a wall.
    pub fn wall_west(self) -> bool {
        matches!(
            self,
            Self::LeftEdge | Self::BottomLeft | Self::TopLeft
        )
    }

    /// True when the eastern neighbor lies on a wall.
    pub fn wall_east(self) -> bool {
        matches!(
            self,
            Self::RightEdge | Self::BottomRight | Self::TopRight
        )
    }

    /// True when the southern neighbor lies on a wall.
    pub fn wall_south(self) -> bool {
        matches!(
            self,
            Self::BottomEdge | Self::BottomLeft | Self::BottomRight
        )
    }

    /// True when the northern neighbor lies on the lid.
    pub fn wall_north(self) -> bool {
        matches!(self, Self::TopEdge | Self::TopLeft | Self::TopRight)
    }
}

/// Uniform structured grid covering a rectangular cavity.
///
/// Immutable once constructed; every operator builder derives its index
/// bookkeeping from this type.
#[derive(Debug, Clone)]
pub struct CavityGrid {
    px: usize,
    py: usize,
    dx: f64,
    dy: f64,
}

impl CavityGrid {
    /// Creates a grid with `px` points across and `py` points up over a
    /// `width` x `height` cavity.
    ///
    /// At least 3 points are required in each direction, otherwise there is
    /// no interior/edge distinction to classify.
    pub fn new(px: usize, py: usize, width: f64, height: f64) -> Result<Self> {
        ensure!(px >= 3, "Grid needs at least 3 points in x, got {px}");
        ensure!(py >= 3, "Grid needs at least 3 points in y, got {py}");
        ensure!(
            width > 0.0 && height > 0.0,
            "Cavity dimensions must be positive, got {width} x {height}"
        );
        // Spacing between a point and the nearest wall equals the spacing
        // between points: px points split the width into px + 1 intervals.
        let dx = width / (px as f64 + 1.0);
        let dy = height / (py as f64 + 1.0);
        Ok(Self { px, py, dx, dy })
    }

    /// Number of points across (x direction, row stride).
    pub fn px(&self) -> usize {
        self.px
    }

    /// Number of points up (y direction).
    pub fn py(&self) -> usize {
        self.py
    }

    /// Total number of grid points.
    pub fn num_points(&self) -> usize {
        self.px * self.py
    }

    /// Number of velocity degrees of freedom (u and v per point).
    pub fn num_dof(&self) -> usize {
        2 * self.num_points()
    }

    /// Grid spacing in x.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Grid spacing in y.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Flat index of the point in column `i`, row `j`.
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.px + i
    }

    /// Classifies point `m` by its position relative to the walls.
    pub fn category(&self, m: usize) -> PointCategory {
        let i = m % self.px;
        let j = m / self.px;
        let west = i == 0;
        let east = i == self.px - 1;
        let south = j == 0;
        let north = j == self.py - 1;
        match (west, east, south, north) {
            (true, _, true, _) => PointCategory::BottomLeft,
            (_, true, true, _) => PointCategory::BottomRight,
            (true, _, _, true) => PointCategory::TopLeft,
            (_, true, _, true) => PointCategory::TopRight,
            (true, ..) => PointCategory::LeftEdge,
            (_, true, ..) => PointCategory::RightEdge,
            (_, _, true, _) => PointCategory::BottomEdge,
            (_, _, _, true) => PointCategory::TopEdge,
            _ => PointCategory::Interior,
        }
    }

    /// The four corner indices: bottom-left, bottom-right, top-left, top-right.
    pub fn corners(&self) -> [usize; 4] {
        [
            self.index(0, 0),
            self.index(self.px - 1, 0),
            self.index(0, self.py - 1),
            self.index(self.px - 1, self.py - 1),
        ]
    }

    /// Ordered left-edge indices, corners excluded (south to north).
    pub fn left_edge(&self) -> Vec<usize> {
        (1..self.py - 1).map(|j| self.index(0, j)).collect()
    }

    /// Ordered right-edge indices, corners excluded (south to north).
    pub fn right_edge(&self) -> Vec<usize> {
        (1..self.py - 1).map(|j| self.index(self.px - 1, j)).collect()
    }

    /// Ordered bottom-edge indices, corners excluded (west to east).
    pub fn bottom_edge(&self) -> Vec<usize> {
        (1..self.px - 1).map(|i| self.index(i, 0)).collect()
    }

    /// Ordered top-edge indices, corners excluded (west to east).
    pub fn top_edge(&self) -> Vec<usize> {
        (1..self.px - 1).map(|i| self.index(i, self.py - 1)).collect()
    }

    /// Interior indices in row-major order.
    pub fn interior(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity((self.px - 2) * (self.py - 2));
        for j in 1..self.py - 1 {
            for i in 1..self.px - 1 {
                out.push(self.index(i, j));
            }
        }
        out
    }
}
