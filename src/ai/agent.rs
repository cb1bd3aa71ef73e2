use crate::ai::heuristic::{BoardEvaluator, Heuristic};
use crate::ai::search::{find_best_move_with, SearchConfig, SearchOutcome};
use crate::game::GameState;

/// Anything that can pick a column to play.
pub trait Agent {
    /// Select a column for the player to move, or `None` when there is no
    /// playable column.
    fn select_action(&mut self, state: &GameState) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// Agent backed by the game-tree search. It always plays the AI side: the
/// search maximizes for the AI whoever is to move in `state`.
pub struct SearchAgent {
    config: SearchConfig,
    evaluator: Box<dyn Heuristic>,
    last_outcome: Option<SearchOutcome>,
}

impl SearchAgent {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_evaluator(config, Box::new(BoardEvaluator::new()))
    }

    pub fn with_evaluator(config: SearchConfig, evaluator: Box<dyn Heuristic>) -> Self {
        SearchAgent {
            config,
            evaluator,
            last_outcome: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Result of the most recent successful search.
    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }
}

impl Agent for SearchAgent {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        match find_best_move_with(state.board(), &self.config, self.evaluator.as_ref(), None) {
            Ok(outcome) => {
                self.last_outcome = Some(outcome);
                Some(outcome.column)
            }
            Err(err) => {
                log::warn!("search agent has no move: {err}");
                self.last_outcome = None;
                None
            }
        }
    }

    fn name(&self) -> &str {
        "Search"
    }
}
