//! Regular lattice of patch seeds

use std::iter::FusedIterator;

/// Regular lattice over a 2D shape
///
/// Yields `(row, col)` for rows `0, step, 2*step, ...` strictly below
/// `step * (rows / step)`, crossed with the analogous columns, in row-major
/// order. Iteration is lazy and can be restarted any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegularSeed {
    rows: u32,
    cols: u32,
    step: u32,
}

impl RegularSeed {
    /// Lattice over `shape = (rows, cols)` with spacing `step`
    ///
    /// A zero `step` produces an empty lattice.
    pub fn new(shape: (u32, u32), step: u32) -> Self {
        Self {
            rows: shape.0,
            cols: shape.1,
            step,
        }
    }

    /// Lattice points along the row axis
    pub fn row_count(&self) -> u32 {
        self.rows.checked_div(self.step).unwrap_or(0)
    }

    /// Lattice points along the column axis
    pub fn col_count(&self) -> u32 {
        self.cols.checked_div(self.step).unwrap_or(0)
    }

    /// Total number of lattice points
    pub fn len(&self) -> usize {
        self.row_count() as usize * self.col_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> SeedIter {
        SeedIter {
            step: self.step,
            cols: self.col_count() as usize,
            next: 0,
            end: self.len(),
        }
    }
}

impl IntoIterator for RegularSeed {
    type Item = (u32, u32);
    type IntoIter = SeedIter;

    fn into_iter(self) -> SeedIter {
        self.iter()
    }
}

impl IntoIterator for &RegularSeed {
    type Item = (u32, u32);
    type IntoIter = SeedIter;

    fn into_iter(self) -> SeedIter {
        self.iter()
    }
}

/// Iterator over [`RegularSeed`] lattice points
#[derive(Debug, Clone)]
pub struct SeedIter {
    step: u32,
    cols: usize,
    next: usize,
    end: usize,
}

impl Iterator for SeedIter {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let row = (index / self.cols) as u32 * self.step;
        let col = (index % self.cols) as u32 * self.step;
        Some((row, col))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SeedIter {}

impl FusedIterator for SeedIter {}
