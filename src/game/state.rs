use crate::error::MoveError;

use super::{Board, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Four-in-a-row tallies for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinalScores {
    pub ai: usize,
    pub human: usize,
}

impl FinalScores {
    pub fn of(board: &Board) -> Self {
        FinalScores {
            ai: board.count_fours(Player::Ai),
            human: board.count_fours(Player::Human),
        }
    }

    pub fn outcome(self) -> GameOutcome {
        match self.ai.cmp(&self.human) {
            std::cmp::Ordering::Greater => GameOutcome::Winner(Player::Ai),
            std::cmp::Ordering::Less => GameOutcome::Winner(Player::Human),
            std::cmp::Ordering::Equal => GameOutcome::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameState {
    board: Board,
    current_player: Player,
}

impl GameState {
    /// Create initial game state with `first` to move
    pub fn initial(first: Player) -> Self {
        GameState {
            board: Board::new(),
            current_player: first,
        }
    }

    /// Resume from an arbitrary position
    pub fn from_board(board: Board, to_move: Player) -> Self {
        GameState {
            board,
            current_player: to_move,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The game is over only once the board is full.
    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.is_terminal()
            .then(|| FinalScores::of(&self.board).outcome())
    }

    /// Get list of legal columns (not full)
    pub fn legal_actions(&self) -> Vec<usize> {
        self.board.playable_columns().collect()
    }

    /// Apply a move for the current player and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        let board = self
            .board
            .with_piece(column, self.current_player.to_cell())?;
        Ok(GameState {
            board,
            current_player: self.current_player.other(),
        })
    }

    /// Install a board produced elsewhere (e.g. a stochastic drop) and hand
    /// the turn over.
    pub fn advance(&self, board: Board) -> GameState {
        GameState {
            board,
            current_player: self.current_player.other(),
        }
    }

    /// Hand the turn over without changing the board.
    pub fn pass(&self) -> GameState {
        self.advance(self.board)
    }
}
