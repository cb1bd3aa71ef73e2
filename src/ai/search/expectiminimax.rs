use crate::ai::chance::landing_distribution;
use crate::ai::observer::{NodeId, NodeKind};
use crate::game::{Board, Cell};

use super::{Searcher, FULL_COLUMN_PENALTY};

impl Searcher<'_, '_> {
    /// Value of a MAX or MIN node in the stochastic game. AI moves go
    /// through [`Self::chance`]; human moves land where they are aimed.
    pub(super) fn expectiminimax(
        &mut self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        level: usize,
        id: Option<&NodeId>,
    ) -> f64 {
        self.stats.nodes += 1;
        let kind = if maximizing { NodeKind::Max } else { NodeKind::Min };
        self.notify_visit(id, level, kind, f64::NEG_INFINITY, f64::INFINITY);

        if depth == 0 || board.is_terminal() {
            let value = self.leaf_value(board);
            self.notify_return(id, value);
            return value;
        }

        let value = if maximizing {
            let mut best = f64::NEG_INFINITY;
            for (i, col) in board.playable_columns().enumerate() {
                // The chance node shares its parent's level.
                let child_id = self.child_id(id, i, level);
                let expected = self.chance(board, depth - 1, col, level, child_id.as_ref());
                if expected > best {
                    best = expected;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for (i, (_col, child)) in board.successors(Cell::Human).enumerate() {
                let child_id = self.child_id(id, i, level + 1);
                let score =
                    self.expectiminimax(&child, depth - 1, true, level + 1, child_id.as_ref());
                if score < best {
                    best = score;
                }
            }
            best
        };

        self.notify_return(id, value);
        value
    }

    /// Expected value of the AI aiming at `intended`: each landing column
    /// is weighted by its probability, and a full landing column costs
    /// [`FULL_COLUMN_PENALTY`] instead of being searched. Does not consume
    /// depth.
    pub(super) fn chance(
        &mut self,
        board: &Board,
        depth: u32,
        intended: usize,
        level: usize,
        id: Option<&NodeId>,
    ) -> f64 {
        self.stats.chance_nodes += 1;
        self.notify_visit(id, level, NodeKind::Chance, f64::NEG_INFINITY, f64::INFINITY);

        let mut expected = 0.0;
        for (i, landing) in landing_distribution(intended).iter().enumerate() {
            match board.with_piece(landing.column, Cell::Ai) {
                Ok(child) => {
                    let child_id = self.child_id(id, i, level + 1);
                    let value =
                        self.expectiminimax(&child, depth, false, level + 1, child_id.as_ref());
                    expected += landing.probability * value;
                }
                Err(_) => expected += landing.probability * FULL_COLUMN_PENALTY,
            }
        }

        self.notify_return(id, expected);
        expected
    }
}
