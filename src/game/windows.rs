//! Geometry tables derived from the fixed board shape: every four-cell
//! window and the center-biased positional weights.

use std::sync::LazyLock;

use super::board::{COLS, ROWS};

/// Number of cells in a connecting line.
pub const WINDOW_LEN: usize = 4;

/// Four `(row, col)` coordinates forming one straight line.
pub type Window = [(usize, usize); WINDOW_LEN];

/// Positional weights, row 0 being the top row. Central cells take part in
/// the most windows and are weighted accordingly.
pub const POSITIONAL_WEIGHTS: [[i32; COLS]; ROWS] = [
    [3, 4, 5, 7, 5, 4, 3],
    [4, 6, 8, 10, 8, 6, 4],
    [5, 8, 11, 13, 11, 8, 5],
    [5, 8, 11, 13, 11, 8, 5],
    [4, 6, 8, 10, 8, 6, 4],
    [3, 4, 5, 7, 5, 4, 3],
];

static STANDARD: LazyLock<WindowSet> = LazyLock::new(|| WindowSet::generate(ROWS, COLS));

/// Number of windows on a `rows` x `cols` grid.
pub const fn window_count(rows: usize, cols: usize) -> usize {
    let span = WINDOW_LEN - 1;
    if rows < span || cols < span {
        return 0;
    }
    rows * (cols - span) + cols * (rows - span) + 2 * (rows - span) * (cols - span)
}

/// The immutable set of all windows for one board geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSet {
    windows: Vec<Window>,
}

impl WindowSet {
    /// The shared table for the 6x7 board.
    pub fn standard() -> &'static WindowSet {
        &STANDARD
    }

    /// Enumerate windows in a fixed order: horizontal, vertical, then the
    /// two diagonal directions.
    pub fn generate(rows: usize, cols: usize) -> Self {
        let mut windows = Vec::with_capacity(window_count(rows, cols));
        let span = WINDOW_LEN - 1;
        if rows < span || cols < span {
            return WindowSet { windows };
        }

        for r in 0..rows {
            for c in 0..cols - span {
                windows.push(std::array::from_fn(|i| (r, c + i)));
            }
        }
        for c in 0..cols {
            for r in 0..rows - span {
                windows.push(std::array::from_fn(|i| (r + i, c)));
            }
        }
        for r in 0..rows - span {
            for c in 0..cols - span {
                windows.push(std::array::from_fn(|i| (r + i, c + i)));
            }
        }
        for r in 0..rows - span {
            for c in span..cols {
                windows.push(std::array::from_fn(|i| (r + i, c - i)));
            }
        }

        WindowSet { windows }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Window> {
        self.windows.iter()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl<'a> IntoIterator for &'a WindowSet {
    type Item = &'a Window;
    type IntoIter = std::slice::Iter<'a, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.iter()
    }
}
