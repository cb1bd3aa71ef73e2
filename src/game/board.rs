use std::fmt;
use std::str::FromStr;

use crate::error::{BoardParseError, MoveError};

use super::player::Player;
use super::windows::WindowSet;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Ai,
    Human,
}

impl Cell {
    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Ai => 'X',
            Cell::Human => 'O',
        }
    }

    fn from_symbol(ch: char) -> Option<Cell> {
        match ch {
            '.' => Some(Cell::Empty),
            'X' | 'x' | 'A' | 'a' => Some(Cell::Ai),
            'O' | 'o' | 'H' | 'h' => Some(Cell::Human),
            _ => None,
        }
    }
}

/// A 6x7 grid. Row 0 is the top, row 5 is the bottom.
///
/// Boards are plain `Copy` values: every move produces a new board and the
/// board it was derived from stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Columns whose top cell is empty, in ascending order.
    pub fn playable_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..COLS).filter(move |&col| !self.is_column_full(col))
    }

    /// Lowest empty row of a column, scanning up from the bottom.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Drop a piece and return the resulting board. `self` is left untouched.
    pub fn with_piece(&self, col: usize, cell: Cell) -> Result<Board, MoveError> {
        let mut next = *self;
        next.place(col, cell)?;
        Ok(next)
    }

    /// Every board reachable by dropping `cell`, paired with its column,
    /// in ascending column order.
    pub fn successors(&self, cell: Cell) -> impl Iterator<Item = (usize, Board)> + '_ {
        (0..COLS).filter_map(move |col| self.with_piece(col, cell).ok().map(|next| (col, next)))
    }

    fn place(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }
        let row = self.landing_row(col).ok_or(MoveError::ColumnFull(col))?;
        self.cells[row][col] = cell;
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// The game ends only once every column is full; an earlier
    /// four-in-a-row does not end it.
    pub fn is_terminal(&self) -> bool {
        self.is_full()
    }

    /// Number of windows completely occupied by `player`.
    pub fn count_fours(&self, player: Player) -> usize {
        let cell = player.to_cell();
        WindowSet::standard()
            .iter()
            .filter(|window| window.iter().all(|&(r, c)| self.cells[r][c] == cell))
            .count()
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parse six lines of seven cells, top row first. Blank lines and
    /// surrounding whitespace are ignored; anything else malformed is
    /// rejected rather than repaired.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() != ROWS {
            return Err(BoardParseError::RowCount(lines.len()));
        }

        let mut board = Board::new();
        for (row, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != COLS {
                return Err(BoardParseError::RowWidth { row, width });
            }
            for (col, ch) in line.chars().enumerate() {
                board.cells[row][col] =
                    Cell::from_symbol(ch).ok_or(BoardParseError::UnknownCell { row, col, ch })?;
            }
        }

        for col in 0..COLS {
            for row in 0..ROWS - 1 {
                if board.cells[row][col] != Cell::Empty && board.cells[row + 1][col] == Cell::Empty
                {
                    return Err(BoardParseError::FloatingPiece { row, col });
                }
            }
        }

        Ok(board)
    }
}
