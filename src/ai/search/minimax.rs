use crate::ai::observer::{NodeId, NodeKind};
use crate::game::{Board, Cell};

use super::Searcher;

impl Searcher<'_, '_> {
    /// Minimax value of `board`, with alpha-beta cutoffs when the context
    /// asks for pruning.
    ///
    /// Children are tried in ascending column order and only a strictly
    /// better child replaces the running best, so ties go to the earliest
    /// column. With pruning on, the bound is raised after every child and
    /// the remaining siblings are skipped once `alpha >= beta`.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        level: usize,
        id: Option<&NodeId>,
    ) -> f64 {
        self.stats.nodes += 1;
        let kind = if maximizing { NodeKind::Max } else { NodeKind::Min };
        self.notify_visit(id, level, kind, alpha, beta);

        if depth == 0 || board.is_terminal() {
            let value = self.leaf_value(board);
            self.notify_return(id, value);
            return value;
        }

        let (cell, mut value) = if maximizing {
            (Cell::Ai, f64::NEG_INFINITY)
        } else {
            (Cell::Human, f64::INFINITY)
        };

        for (i, (_col, child)) in board.successors(cell).enumerate() {
            let child_id = self.child_id(id, i, level + 1);
            let score = self.minimax(
                &child,
                depth - 1,
                alpha,
                beta,
                !maximizing,
                level + 1,
                child_id.as_ref(),
            );

            if maximizing {
                if score > value {
                    value = score;
                }
            } else if score < value {
                value = score;
            }

            if self.ctx.pruning {
                if maximizing {
                    alpha = alpha.max(value);
                } else {
                    beta = beta.min(value);
                }
                self.notify_bounds(id, alpha, beta, value);

                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    self.notify_prune(id);
                    break;
                }
            }
        }

        self.notify_return(id, value);
        value
    }
}
