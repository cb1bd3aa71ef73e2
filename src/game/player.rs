use super::board::Cell;

/// The two sides of the game. Scores are always reported from the AI's
/// point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Ai,
    Human,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Ai => Player::Human,
            Player::Human => Player::Ai,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Ai => Cell::Ai,
            Player::Human => Cell::Human,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Ai => "AI",
            Player::Human => "Human",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_player() {
        assert_eq!(Player::Ai.other(), Player::Human);
        assert_eq!(Player::Human.other(), Player::Ai);
    }

    #[test]
    fn test_player_cells() {
        assert_eq!(Player::Ai.to_cell(), Cell::Ai);
        assert_eq!(Player::Human.to_cell(), Cell::Human);
    }

    #[test]
    fn test_player_name() {
        assert_eq!(Player::Ai.name(), "AI");
        assert_eq!(Player::Human.name(), "Human");
    }
}
