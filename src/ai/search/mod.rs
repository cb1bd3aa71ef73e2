//! Game-tree search over the AI's moves.
//!
//! Three interchangeable strategies share one recursive pattern:
//!
//! - [`Algorithm::NoPruning`]: plain minimax, full width.
//! - [`Algorithm::AlphaBeta`]: minimax with alpha-beta cutoffs. Returns the
//!   same score and column as plain minimax, only cheaper.
//! - [`Algorithm::Expectiminimax`]: every AI move goes through a chance node
//!   that follows the slip model in [`crate::ai::chance`].
//!
//! [`find_best_move`] is the entry point. The AI is always the maximizing
//! side.
//!
//! # Example
//!
//! ```
//! use connect_four_search::ai::search::{find_best_move, Algorithm, SearchConfig};
//! use connect_four_search::game::Board;
//!
//! let config = SearchConfig::new(Algorithm::AlphaBeta, 1).unwrap();
//! let outcome = find_best_move(&Board::new(), &config).unwrap();
//! assert_eq!(outcome.column, 3);
//! ```

mod expectiminimax;
mod minimax;

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::ai::heuristic::{BoardEvaluator, Heuristic, ScoringMode};
use crate::ai::observer::{NodeId, NodeKind, NodeVisit, SearchObserver};
use crate::error::{ConfigError, SearchError};
use crate::game::{Board, Cell, FinalScores};

/// Value of a decided game (more fours on a full board).
pub const WIN_SCORE: f64 = 10_000_000.0;
/// Contribution of a chance outcome whose column is already full.
pub const FULL_COLUMN_PENALTY: f64 = -WIN_SCORE * 0.5;

/// Search strategy.
///
/// Names are read case-insensitively, with `-` and `_` interchangeable, in
/// the config file as well as on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    NoPruning,
    AlphaBeta,
    Expectiminimax,
}

impl Algorithm {
    /// Evaluation mode used at the leaves unless overridden. The chance
    /// nodes multiply the tree, so expectiminimax gets the cheap mode.
    pub fn default_scoring(self) -> ScoringMode {
        match self {
            Algorithm::NoPruning | Algorithm::AlphaBeta => ScoringMode::Full,
            Algorithm::Expectiminimax => ScoringMode::Lite,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::NoPruning => f.write_str("NO_PRUNING"),
            Algorithm::AlphaBeta => f.write_str("ALPHA_BETA"),
            Algorithm::Expectiminimax => f.write_str("EXPECTIMINIMAX"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "NO_PRUNING" | "MINIMAX_NO_PRUNING" | "MINIMAX" => Ok(Algorithm::NoPruning),
            "ALPHA_BETA" | "MINIMAX_ALPHA_BETA" | "ALPHABETA" => Ok(Algorithm::AlphaBeta),
            "EXPECTIMINIMAX" => Ok(Algorithm::Expectiminimax),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Algorithm> for String {
    fn from(algorithm: Algorithm) -> String {
        algorithm.to_string()
    }
}

/// What to search and how deep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// Plies to look ahead, counting both sides' moves.
    pub depth: u32,
    /// Leaf evaluation mode; `None` picks the algorithm's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringMode>,
    /// Deepest level reported to an observer.
    pub trace_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            algorithm: Algorithm::AlphaBeta,
            depth: 5,
            scoring: None,
            trace_depth: 3,
        }
    }
}

impl SearchConfig {
    pub fn new(algorithm: Algorithm, depth: u32) -> Result<Self, ConfigError> {
        let config = SearchConfig {
            algorithm,
            depth,
            ..SearchConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = Some(scoring);
        self
    }

    pub fn with_trace_depth(mut self, trace_depth: usize) -> Self {
        self.trace_depth = trace_depth;
        self
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.scoring.unwrap_or_else(|| self.algorithm.default_scoring())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::Validation("search.depth must be > 0".into()));
        }
        Ok(())
    }
}

/// Result of a root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub score: f64,
    pub column: usize,
    pub elapsed: Duration,
    pub stats: SearchStats,
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// MAX and MIN nodes entered.
    pub nodes: u64,
    /// Chance nodes entered.
    pub chance_nodes: u64,
    /// Alpha-beta cutoffs taken.
    pub cutoffs: u64,
}

/// Read-only parameters shared by every node of one search.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub evaluator: &'a dyn Heuristic,
    pub mode: ScoringMode,
    pub pruning: bool,
    pub trace_depth: usize,
}

/// Mutable side of a search: counters and the optional observer.
pub(crate) struct Searcher<'a, 'o> {
    ctx: SearchContext<'a>,
    stats: SearchStats,
    observer: Option<&'o mut dyn SearchObserver>,
}

impl<'a, 'o> Searcher<'a, 'o> {
    fn new(ctx: SearchContext<'a>, observer: Option<&'o mut dyn SearchObserver>) -> Self {
        Searcher {
            ctx,
            stats: SearchStats::default(),
            observer,
        }
    }

    /// Static value of a leaf. On a full board the side with more
    /// four-in-a-rows wins outright; a tie falls back to the evaluator.
    fn leaf_value(&self, board: &Board) -> f64 {
        if board.is_terminal() {
            let scores = FinalScores::of(board);
            if scores.ai > scores.human {
                return WIN_SCORE;
            }
            if scores.human > scores.ai {
                return -WIN_SCORE;
            }
        }
        self.ctx.evaluator.evaluate(board, self.ctx.mode)
    }

    /// Id for child `index` of `parent`, or `None` when the child will not
    /// be reported.
    fn child_id(
        &self,
        parent: Option<&NodeId>,
        index: usize,
        child_level: usize,
    ) -> Option<NodeId> {
        match parent {
            Some(id) if self.observer.is_some() && child_level <= self.ctx.trace_depth => {
                Some(id.child(index))
            }
            _ => None,
        }
    }

    fn notify_visit(
        &mut self,
        id: Option<&NodeId>,
        level: usize,
        kind: NodeKind,
        alpha: f64,
        beta: f64,
    ) {
        if let (Some(observer), Some(id)) = (self.observer.as_deref_mut(), id) {
            observer.on_visit(&NodeVisit {
                id,
                level,
                kind,
                alpha,
                beta,
            });
        }
    }

    fn notify_bounds(&mut self, id: Option<&NodeId>, alpha: f64, beta: f64, value: f64) {
        if let (Some(observer), Some(id)) = (self.observer.as_deref_mut(), id) {
            observer.on_bounds(id, alpha, beta, value);
        }
    }

    fn notify_prune(&mut self, id: Option<&NodeId>) {
        if let (Some(observer), Some(id)) = (self.observer.as_deref_mut(), id) {
            observer.on_prune(id);
        }
    }

    fn notify_return(&mut self, id: Option<&NodeId>, value: f64) {
        if let (Some(observer), Some(id)) = (self.observer.as_deref_mut(), id) {
            observer.on_return(id, value);
        }
    }
}

/// Pick the AI's best column with the default evaluator and no observer.
pub fn find_best_move(board: &Board, config: &SearchConfig) -> Result<SearchOutcome, SearchError> {
    find_best_move_with(board, config, &BoardEvaluator::new(), None)
}

/// Pick the AI's best column.
///
/// Every playable column is scored in ascending order and the first one
/// with a strictly higher score than all before it wins. The configuration
/// is validated and the board checked for a playable column before any
/// search work starts.
pub fn find_best_move_with(
    board: &Board,
    config: &SearchConfig,
    evaluator: &dyn Heuristic,
    observer: Option<&mut dyn SearchObserver>,
) -> Result<SearchOutcome, SearchError> {
    config.validate()?;
    let columns: Vec<usize> = board.playable_columns().collect();
    let Some(&first) = columns.first() else {
        return Err(SearchError::NoLegalMoves);
    };

    let start = Instant::now();
    let ctx = SearchContext {
        evaluator,
        mode: config.scoring_mode(),
        pruning: config.algorithm == Algorithm::AlphaBeta,
        trace_depth: config.trace_depth,
    };
    let mut searcher = Searcher::new(ctx, observer);
    let root = searcher.observer.is_some().then(NodeId::root);
    let depth = config.depth - 1;

    searcher.notify_visit(root.as_ref(), 0, NodeKind::Max, f64::NEG_INFINITY, f64::INFINITY);

    let mut best_score = f64::NEG_INFINITY;
    let mut best_column = first;
    for (i, &col) in columns.iter().enumerate() {
        let child_id = searcher.child_id(root.as_ref(), i, 1);
        let score = match config.algorithm {
            Algorithm::Expectiminimax => searcher.chance(board, depth, col, 0, child_id.as_ref()),
            Algorithm::NoPruning | Algorithm::AlphaBeta => {
                let Ok(child) = board.with_piece(col, Cell::Ai) else {
                    continue;
                };
                searcher.minimax(
                    &child,
                    depth,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                    false,
                    1,
                    child_id.as_ref(),
                )
            }
        };
        log::debug!("option column {} -> {score:.1}", col + 1);

        if score > best_score {
            best_score = score;
            best_column = col;
        }
        searcher.notify_bounds(root.as_ref(), f64::NEG_INFINITY, f64::INFINITY, best_score);
    }

    searcher.notify_return(root.as_ref(), best_score);

    let elapsed = start.elapsed();
    let stats = searcher.stats;
    log::info!(
        "{} depth {}: column {} score {:.0} in {:.4}s ({} nodes, {} chance, {} cutoffs)",
        config.algorithm,
        config.depth,
        best_column + 1,
        best_score,
        elapsed.as_secs_f64(),
        stats.nodes,
        stats.chance_nodes,
        stats.cutoffs,
    );

    Ok(SearchOutcome {
        score: best_score,
        column: best_column,
        elapsed,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::heuristic::EVAL_WIN;
    use crate::ai::observer::{NodeEvent, TraceRecorder};
    use crate::game::{COLS, ROWS};

    fn board(rows: &str) -> Board {
        rows.parse().unwrap()
    }

    /// Fill the board column by column with a pattern that leaves no
    /// four-in-a-row for either side, except in `skip` columns.
    fn drawn_board_except(skip: &[usize]) -> Board {
        // Pairs of rows alternate so no line of four forms in any direction.
        let pattern = [
            "XXOOXXO", "OOXXOOX", "XXOOXXO", "OOXXOOX", "XXOOXXO", "OOXXOOX",
        ];
        let rows: Vec<String> = pattern
            .iter()
            .map(|row| {
                row.chars()
                    .enumerate()
                    .map(|(col, ch)| if skip.contains(&col) { '.' } else { ch })
                    .collect()
            })
            .collect();
        rows.join("\n").parse().unwrap()
    }

    #[test]
    fn algorithm_parses_all_names() {
        for (name, expected) in [
            ("NO_PRUNING", Algorithm::NoPruning),
            ("minimax_no_pruning", Algorithm::NoPruning),
            ("alpha-beta", Algorithm::AlphaBeta),
            ("MINIMAX_ALPHA_BETA", Algorithm::AlphaBeta),
            ("Expectiminimax", Algorithm::Expectiminimax),
        ] {
            assert_eq!(name.parse::<Algorithm>().unwrap(), expected, "{name}");
        }
        assert!(matches!(
            "greedy".parse::<Algorithm>(),
            Err(ConfigError::UnknownAlgorithm(name)) if name == "greedy"
        ));
    }

    #[test]
    fn default_scoring_per_algorithm() {
        for algorithm in [Algorithm::NoPruning, Algorithm::AlphaBeta] {
            let config = SearchConfig::new(algorithm, 2).unwrap();
            assert_eq!(config.scoring_mode(), ScoringMode::Full);
        }
        let expecti = SearchConfig::new(Algorithm::Expectiminimax, 2).unwrap();
        assert_eq!(expecti.scoring_mode(), ScoringMode::Lite);
        assert_eq!(expecti.with_scoring(ScoringMode::Full).scoring_mode(), ScoringMode::Full);
    }

    #[test]
    fn zero_depth_fails_before_searching() {
        assert!(SearchConfig::new(Algorithm::AlphaBeta, 0).is_err());
        let config = SearchConfig {
            depth: 0,
            ..SearchConfig::default()
        };
        let mut recorder = TraceRecorder::new();
        let evaluator = BoardEvaluator::new();
        let err = find_best_move_with(&Board::new(), &config, &evaluator, Some(&mut recorder))
            .unwrap_err();
        assert!(matches!(err, SearchError::Config(ConfigError::Validation(_))));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn full_board_is_rejected() {
        let full = drawn_board_except(&[]);
        assert!(full.is_full());
        let config = SearchConfig::new(Algorithm::NoPruning, 1).unwrap();
        assert!(matches!(find_best_move(&full, &config), Err(SearchError::NoLegalMoves)));
    }

    #[test]
    fn drawn_pattern_has_no_fours() {
        let full = drawn_board_except(&[]);
        assert_eq!(FinalScores::of(&full), FinalScores { ai: 0, human: 0 });
    }

    #[test]
    fn terminal_leaf_uses_four_counts() {
        let evaluator = BoardEvaluator::new();
        let ctx = SearchContext {
            evaluator: &evaluator,
            mode: ScoringMode::Full,
            pruning: false,
            trace_depth: 0,
        };
        let searcher = Searcher::new(ctx, None);

        let drawn = drawn_board_except(&[]);
        assert_eq!(searcher.leaf_value(&drawn), evaluator.evaluate(&drawn, ScoringMode::Full));
        assert!(searcher.leaf_value(&drawn).abs() < EVAL_WIN);

        // Swap one column for a solid AI column: three vertical AI fours.
        let mut ai_ahead = drawn_board_except(&[0]);
        for _ in 0..ROWS {
            ai_ahead = ai_ahead.with_piece(0, Cell::Ai).unwrap();
        }
        assert_eq!(searcher.leaf_value(&ai_ahead), WIN_SCORE);

        let mut human_ahead = drawn_board_except(&[COLS - 1]);
        for _ in 0..ROWS {
            human_ahead = human_ahead.with_piece(COLS - 1, Cell::Human).unwrap();
        }
        assert_eq!(searcher.leaf_value(&human_ahead), -WIN_SCORE);
    }

    #[test]
    fn last_empty_column_is_only_choice() {
        let nearly_full = drawn_board_except(&[5]);
        for algorithm in [Algorithm::NoPruning, Algorithm::AlphaBeta, Algorithm::Expectiminimax] {
            let config = SearchConfig::new(algorithm, 4).unwrap();
            let outcome = find_best_move(&nearly_full, &config).unwrap();
            assert_eq!(outcome.column, 5, "{algorithm}");
        }
    }

    #[test]
    fn observer_sees_root_and_children() {
        let mut recorder = TraceRecorder::new();
        let config = SearchConfig::new(Algorithm::AlphaBeta, 2)
            .unwrap()
            .with_trace_depth(1);
        let evaluator = BoardEvaluator::new();
        let with_observer =
            find_best_move_with(&Board::new(), &config, &evaluator, Some(&mut recorder)).unwrap();
        let without = find_best_move(&Board::new(), &config).unwrap();
        assert_eq!(with_observer.score, without.score);
        assert_eq!(with_observer.column, without.column);

        let events = recorder.into_events();
        assert!(matches!(
            &events[0],
            NodeEvent::Visit { id, level: 0, kind: NodeKind::Max, .. } if id.is_root()
        ));
        assert!(matches!(
            events.last(),
            Some(NodeEvent::Return { id, score }) if id.is_root() && *score == without.score
        ));
        // Seven root children at level 1, nothing deeper.
        let child_visits = events
            .iter()
            .filter(|e| matches!(e, NodeEvent::Visit { level: 1, kind: NodeKind::Min, .. }))
            .count();
        assert_eq!(child_visits, 7);
        assert!(!events
            .iter()
            .any(|e| matches!(e, NodeEvent::Visit { level, .. } if *level > 1)));
    }

    #[test]
    fn expectiminimax_reports_chance_nodes() {
        let mut recorder = TraceRecorder::new();
        let config = SearchConfig::new(Algorithm::Expectiminimax, 1).unwrap();
        let evaluator = BoardEvaluator::new();
        let outcome =
            find_best_move_with(&Board::new(), &config, &evaluator, Some(&mut recorder)).unwrap();
        let chance_visits = recorder
            .events()
            .iter()
            .filter(|e| matches!(e, NodeEvent::Visit { kind: NodeKind::Chance, level: 0, .. }))
            .count();
        assert_eq!(chance_visits, 7);
        assert_eq!(outcome.stats.chance_nodes, 7);
        // 2 + 5 * 3 + 2 landing outcomes, each a depth-0 MIN leaf.
        assert_eq!(outcome.stats.nodes, 19);
    }

    #[test]
    fn empty_board_depth_one_plays_center() {
        let config = SearchConfig::new(Algorithm::AlphaBeta, 1).unwrap();
        let outcome = find_best_move(&Board::new(), &config).unwrap();
        assert_eq!(outcome.column, 3);
        assert_eq!(outcome.score, 7.0);
    }

    #[test]
    fn tied_root_options_keep_first_column() {
        // Columns 1-5 are full and mirror-symmetric, so columns 0 and 6
        // score the same in every algorithm.
        let position = board(
            "
            .XOXOX.
            .XOXOX.
            .OXOXO.
            .OXOXO.
            .XOXOX.
            .XOXOX.",
        );
        assert_eq!(position.playable_columns().collect::<Vec<_>>(), vec![0, 6]);
        assert_eq!(FinalScores::of(&position), FinalScores { ai: 0, human: 0 });

        let evaluator = BoardEvaluator::new();
        for algorithm in [Algorithm::NoPruning, Algorithm::AlphaBeta, Algorithm::Expectiminimax] {
            for depth in 1..=3 {
                let config = SearchConfig::new(algorithm, depth).unwrap();
                let mut recorder = TraceRecorder::new();
                let outcome =
                    find_best_move_with(&position, &config, &evaluator, Some(&mut recorder))
                        .unwrap();
                assert_eq!(outcome.column, 0, "{algorithm} depth {depth}");

                let root_children: Vec<f64> = recorder
                    .events()
                    .iter()
                    .filter_map(|e| match e {
                        NodeEvent::Return { id, score } if id.path().len() == 1 => Some(*score),
                        _ => None,
                    })
                    .collect();
                assert_eq!(root_children.len(), 2);
                assert_eq!(root_children[0], root_children[1], "{algorithm} depth {depth}");
                assert_eq!(outcome.score, root_children[0]);
            }
        }
    }
}
