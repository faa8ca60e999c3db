use std::time::Instant;

use tracing::info_span;

use super::{
    SearchConfig, SearchLimits, SearchResult, format_score,
    move_ordering::{order_moves, promote_to_front},
    stats::SearchStats,
    tt::{Bound, TranspositionTable},
};
use crate::prelude::*;

/// Iterative deepening alpha-beta searcher.
///
/// Owns its transposition table, which persists across iterations and across
/// calls to [`Searcher::think`] until [`Searcher::clear`].
#[derive(Debug, Clone)]
pub struct Searcher<E: Evaluator> {
    evaluator: E,
    tt: TranspositionTable,
    config: SearchConfig,
    limits: SearchLimits,
    stats: SearchStats,
}

impl<E: Evaluator> Searcher<E> {
    /// Allocates a table of `config.hash_size_mb` when the table is in use.
    pub fn new(evaluator: E, config: SearchConfig) -> Self {
        let tt = if config.use_tt {
            TranspositionTable::new(config.hash_size_mb)
        } else {
            TranspositionTable::with_capacity(1)
        };
        Self::with_table(evaluator, tt, config)
    }

    /// Uses a caller-provided table, e.g. a small one in tests.
    pub fn with_table(evaluator: E, tt: TranspositionTable, config: SearchConfig) -> Self {
        Self {
            evaluator,
            tt,
            config,
            limits: SearchLimits::default(),
            stats: SearchStats::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn set_limits(&mut self, limits: SearchLimits) {
        self.limits = limits;
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    #[cfg(test)]
    pub(crate) fn tt_mut(&mut self) -> &mut TranspositionTable {
        &mut self.tt
    }

    /// Stats of the most recent search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Forgets everything learned so far, e.g. for a new game.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.stats = SearchStats::default();
    }

    #[inline(always)]
    fn evaluate<P: Position>(&mut self, pos: &P) -> i32 {
        self.stats.positions_evaluated += 1;
        self.evaluator.evaluate(pos)
    }

    /// Searches `depth` plies deep regardless of time.
    pub fn search_depth<P: Position>(&mut self, pos: &mut P, depth: u16) -> SearchResult<P::Move> {
        let saved = self.limits;
        self.limits = SearchLimits::depth(depth);
        let result = self.think(pos, &Timer::unbounded());
        self.limits = saved;
        result
    }

    /// Deepens one ply at a time until the depth limit, or until the time
    /// spent exceeds `remaining / time_divisor`. Time is only checked between
    /// depths, so a started depth always finishes and the result comes from
    /// the deepest completed iteration.
    pub fn think<P: Position>(&mut self, pos: &mut P, clock: &dyn Clock) -> SearchResult<P::Move> {
        let span = info_span!("think", evaluator = self.evaluator.name());
        let _guard = span.enter();

        let start = Instant::now();
        self.stats = SearchStats::default();
        let mut result = SearchResult::default();

        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            debug!("No legal moves at the root");
            result.score = if pos.is_checkmate() {
                -MATE_SCORE
            } else {
                DRAW_SCORE
            };
            return result;
        }
        order_moves(pos, &mut moves);

        let max_depth = self.limits.depth_cap();
        let divisor = self.config.time_divisor.max(1);

        for depth in 1..=max_depth {
            if let Some(prev_best) = result.best_move {
                promote_to_front(&mut moves, prev_best);
            }

            let Some((best_move, score)) = self.search_root(pos, &moves, depth) else {
                break;
            };
            result.best_move = Some(best_move);
            result.score = score;
            result.depth = depth;

            self.stats.depth_reached = depth;
            self.stats.current_eval = score;
            trace!(
                "depth {depth} best {best_move} score {score} nodes {}",
                self.stats.nodes_searched
            );

            if self.config.emit_info {
                let elapsed = start.elapsed();
                let ms = elapsed.as_millis().max(1) as u64;
                println!(
                    "info depth {depth} score {} nodes {} nps {} time {} pv {best_move}",
                    format_score(score, depth),
                    self.stats.nodes_searched,
                    self.stats.nodes_searched * 1000 / ms,
                    elapsed.as_millis(),
                );
            }

            if clock.elapsed_ms() > clock.remaining_ms() / divisor {
                debug!(
                    "Stopping after depth {depth}: {}ms spent, {}ms left",
                    clock.elapsed_ms(),
                    clock.remaining_ms()
                );
                break;
            }
        }

        self.stats.time_elapsed = start.elapsed();
        self.stats.calculate_nps();
        if self.config.collect_stats {
            if self.config.use_tt {
                self.stats.hash_full = self.tt.hash_full();
            }
            self.stats.log_summary();
        }

        result.nodes_searched = self.stats.nodes_searched;
        result.time_taken = self.stats.time_elapsed;
        result
    }

    /// Full-window search of the root moves in the given order. Returns the
    /// best move and its score, or `None` for an empty move list.
    pub fn search_root<P: Position>(
        &mut self,
        pos: &mut P,
        moves: &[P::Move],
        depth: u16,
    ) -> Option<(P::Move, i32)> {
        let depth = depth.max(1);
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(P::Move, i32)> = None;

        self.stats.nodes_searched += 1;
        for &mv in moves {
            let score = {
                let mut child = pos.play(mv);
                -self.negamax(&mut *child, depth - 1, -beta, -alpha)
            };
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        if let Some((_, score)) = best {
            if self.config.use_tt {
                self.tt.store(pos.zobrist_key(), depth, score, Bound::Exact);
            }
        }
        best
    }

    /// Fail-soft negamax. The score is from the point of view of the side to
    /// move at `pos`.
    pub(crate) fn negamax<P: Position>(
        &mut self,
        pos: &mut P,
        depth: u16,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.stats.nodes_searched += 1;
        let key = pos.zobrist_key();

        if self.config.use_tt {
            self.stats.tt_probes += 1;
            if let Some((score, bound)) = self.tt.lookup(key, depth) {
                self.stats.tt_hits += 1;
                match bound {
                    Bound::Exact => {
                        self.stats.tt_cutoffs += 1;
                        return score;
                    }
                    Bound::LowerBound => alpha = alpha.max(score),
                    Bound::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    self.stats.tt_cutoffs += 1;
                    return score;
                }
            }
        }

        if pos.is_checkmate() {
            self.stats.mate_returns += 1;
            // Sooner mates are worse for the mated side
            return -(MATE_SCORE + depth as i32);
        }
        if pos.is_draw() {
            self.stats.draw_returns += 1;
            return DRAW_SCORE;
        }
        if depth == 0 {
            return self.evaluate(pos);
        }

        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            debug_assert!(
                false,
                "no legal moves in a position that is neither checkmate nor draw"
            );
            error!(
                "Position oracle reported no legal moves for a non-terminal position (key {key:#018x})"
            );
            return self.evaluate(pos);
        }
        order_moves(pos, &mut moves);

        let alpha_start = alpha;
        let mut best = -INFINITY;
        for (i, &mv) in moves.iter().enumerate() {
            let score = {
                let mut child = pos.play(mv);
                -self.negamax(&mut *child, depth - 1, -beta, -alpha)
            };
            best = best.max(score);
            alpha = alpha.max(best);
            if alpha >= beta {
                self.stats.branches_pruned += 1;
                self.stats.record_cutoff(i);
                break;
            }
        }

        if self.config.use_tt {
            let bound = if best <= alpha_start {
                Bound::UpperBound
            } else if best >= beta {
                Bound::LowerBound
            } else {
                Bound::Exact
            };
            self.tt.store(key, depth, best, bound);
        }
        best
    }
}
