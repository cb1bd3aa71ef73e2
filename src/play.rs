//! Whole games between two agents.
//!
//! The match runner exercises the engine end to end: the search agent plays
//! the AI side, any other [`Agent`] plays the human side, and the game runs
//! until the board is full. When drops are stochastic, AI moves go through
//! [`resolve_drop`] and a move that slips into a full column passes the turn.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ai::chance::{resolve_drop, DropResolution};
use crate::ai::{Agent, Algorithm, RandomAgent, SearchAgent, SearchConfig};
use crate::error::{ConfigError, MoveError, PlayError};
use crate::game::{Board, FinalScores, GameOutcome, GameState, Player, COLS};

/// Match settings, the `[matches]` section of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub games: usize,
    /// Seed for the opponent and the drops; `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub ai_first: bool,
    /// Force stochastic AI drops on or off; `None` enables them only for
    /// expectiminimax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stochastic: Option<bool>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            games: 10,
            seed: None,
            ai_first: true,
            stochastic: None,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.games == 0 {
            return Err(ConfigError::Validation("matches.games must be > 0".into()));
        }
        Ok(())
    }

    /// Per-game options for an AI searching with `algorithm`.
    pub fn options(&self, algorithm: Algorithm) -> MatchOptions {
        MatchOptions {
            ai_first: self.ai_first,
            stochastic: self
                .stochastic
                .unwrap_or(algorithm == Algorithm::Expectiminimax),
        }
    }
}

/// How a single game is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub ai_first: bool,
    pub stochastic: bool,
}

/// One turn of a match. `landed` is `None` when the piece slipped into a
/// full column and the turn passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: Player,
    pub intended: usize,
    pub landed: Option<usize>,
}

/// Everything that happened in one game.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub moves: Vec<MoveRecord>,
    pub skips: usize,
    pub final_board: Board,
    pub scores: FinalScores,
    pub outcome: GameOutcome,
}

/// Play one game to a full board. `ai` moves for [`Player::Ai`] and
/// `opponent` for [`Player::Human`].
pub fn play_match<R: Rng + ?Sized>(
    ai: &mut dyn Agent,
    opponent: &mut dyn Agent,
    options: MatchOptions,
    rng: &mut R,
) -> Result<MatchRecord, PlayError> {
    let first = if options.ai_first { Player::Ai } else { Player::Human };
    let mut state = GameState::initial(first);
    let mut moves = Vec::new();
    let mut skips = 0;

    while !state.is_terminal() {
        let player = state.current_player();
        let agent: &mut dyn Agent = match player {
            Player::Ai => &mut *ai,
            Player::Human => &mut *opponent,
        };
        let intended = agent.select_action(&state).ok_or_else(|| PlayError::NoAction {
            agent: agent.name().to_string(),
        })?;
        check_playable(state.board(), intended)?;

        if player == Player::Ai && options.stochastic {
            match resolve_drop(state.board(), intended, player, rng) {
                DropResolution::Landed { column, board, .. } => {
                    moves.push(MoveRecord {
                        player,
                        intended,
                        landed: Some(column),
                    });
                    state = state.advance(board);
                }
                DropResolution::Skipped { .. } => {
                    skips += 1;
                    moves.push(MoveRecord {
                        player,
                        intended,
                        landed: None,
                    });
                    state = state.pass();
                }
            }
        } else {
            state = state.apply_move(intended)?;
            moves.push(MoveRecord {
                player,
                intended,
                landed: Some(intended),
            });
        }
    }

    let final_board = *state.board();
    let scores = FinalScores::of(&final_board);
    Ok(MatchRecord {
        moves,
        skips,
        final_board,
        scores,
        outcome: scores.outcome(),
    })
}

fn check_playable(board: &Board, column: usize) -> Result<(), MoveError> {
    if column >= COLS {
        return Err(MoveError::InvalidColumn(column));
    }
    if board.is_column_full(column) {
        return Err(MoveError::ColumnFull(column));
    }
    Ok(())
}

/// Win/loss/draw counts over a series of games, from the AI's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchTally {
    pub ai_wins: usize,
    pub human_wins: usize,
    pub draws: usize,
    pub skips: usize,
}

impl MatchTally {
    pub fn record(&mut self, record: &MatchRecord) {
        match record.outcome {
            GameOutcome::Winner(Player::Ai) => self.ai_wins += 1,
            GameOutcome::Winner(Player::Human) => self.human_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
        self.skips += record.skips;
    }

    pub fn total(&self) -> usize {
        self.ai_wins + self.human_wins + self.draws
    }

    pub fn ai_win_rate(&self) -> f32 {
        if self.total() == 0 {
            return 0.0;
        }
        self.ai_wins as f32 / self.total() as f32
    }
}

/// Play `matches.games` games of the search agent against a random
/// opponent. A fixed seed makes the whole series reproducible.
pub fn run_matches(search: &SearchConfig, matches: &MatchConfig) -> Result<MatchTally, PlayError> {
    search.validate()?;
    matches.validate()?;

    let mut rng = match matches.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let options = matches.options(search.algorithm);
    let mut ai = SearchAgent::new(*search);
    let mut tally = MatchTally::default();

    for game in 0..matches.games {
        let mut opponent = RandomAgent::with_seed(rng.random());
        let record = play_match(&mut ai, &mut opponent, options, &mut rng)?;
        let result = match record.outcome {
            GameOutcome::Winner(player) => format!("{} wins", player.name()),
            GameOutcome::Draw => "draw".to_string(),
        };
        log::info!(
            "game {}: {result} ({} AI fours, {} human fours, {} skipped)",
            game + 1,
            record.scores.ai,
            record.scores.human,
            record.skips,
        );
        tally.record(&record);
    }

    log::info!(
        "{} games: {} AI wins, {} human wins, {} draws",
        tally.total(),
        tally.ai_wins,
        tally.human_wins,
        tally.draws,
    );
    Ok(tally)
}
