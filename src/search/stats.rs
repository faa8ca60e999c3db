use tracing::debug_span;

use crate::prelude::*;
use std::{ops::Add, time::Duration};

/// Cutoffs are bucketed by move index, the last bucket catches the rest.
pub const CUTOFF_SLOTS: usize = 32;

/// Counters written by the search as a side channel. The search never reads
/// them back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    // Basic stats
    pub nodes_searched: u64,
    pub positions_evaluated: u64,
    pub depth_reached: u16,
    pub current_eval: i32,
    pub time_elapsed: Duration,
    pub nps: u64,
    pub hash_full: u16, // per-mille

    // Early exit tracking
    pub draw_returns: u64, // Returned due to draw detection
    pub mate_returns: u64, // Returned a checkmate score

    // Alpha-Beta window
    pub branches_pruned: u64, // Times alpha >= beta inside the move loop

    // Transposition table stats
    pub tt_probes: u64,  // TT probe attempts
    pub tt_hits: u64,    // Probes that found a deep enough entry
    pub tt_cutoffs: u64, // Times the TT answered the node outright

    // Move ordering stats
    pub cutoff_at_move: [u64; CUTOFF_SLOTS],
}

impl Add for SearchStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let mut cutoff_at_move = [0u64; CUTOFF_SLOTS];
        for (i, slot) in cutoff_at_move.iter_mut().enumerate() {
            *slot = self.cutoff_at_move[i] + rhs.cutoff_at_move[i];
        }

        let mut combined = Self {
            nodes_searched: self.nodes_searched + rhs.nodes_searched,
            positions_evaluated: self.positions_evaluated + rhs.positions_evaluated,
            depth_reached: self.depth_reached.max(rhs.depth_reached),
            current_eval: rhs.current_eval,
            time_elapsed: self.time_elapsed + rhs.time_elapsed,
            nps: 0,
            hash_full: rhs.hash_full,

            draw_returns: self.draw_returns + rhs.draw_returns,
            mate_returns: self.mate_returns + rhs.mate_returns,

            branches_pruned: self.branches_pruned + rhs.branches_pruned,

            tt_probes: self.tt_probes + rhs.tt_probes,
            tt_hits: self.tt_hits + rhs.tt_hits,
            tt_cutoffs: self.tt_cutoffs + rhs.tt_cutoffs,

            cutoff_at_move,
        };
        combined.calculate_nps();
        combined
    }
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn percent(numerator: u64, denominator: u64) -> f64 {
        if denominator == 0 {
            0.0
        } else {
            100.0 * numerator as f64 / denominator as f64
        }
    }

    #[inline(always)]
    pub fn record_cutoff(&mut self, move_index: usize) {
        self.cutoff_at_move[move_index.min(CUTOFF_SLOTS - 1)] += 1;
    }

    pub fn calculate_nps(&mut self) {
        let time_ms = self.time_elapsed.as_millis().max(1) as u64;
        self.nps = (self.nodes_searched * 1000) / time_ms;
    }

    pub fn avg_cutoff_index(&self) -> f64 {
        let total_cutoffs: u64 = self.cutoff_at_move.iter().sum();
        if total_cutoffs == 0 {
            0.0
        } else {
            let weighted_sum: u64 = self
                .cutoff_at_move
                .iter()
                .enumerate()
                .map(|(i, &count)| i as u64 * count)
                .sum();
            weighted_sum as f64 / total_cutoffs as f64
        }
    }

    pub fn log_summary(&self) {
        let _span = debug_span!("search_stats").entered();
        debug!("=> SEARCH STATISTICS (depth {})", self.depth_reached);
        debug!(
            "NODES total={} evaluated={} time={:?} nps={}",
            self.nodes_searched, self.positions_evaluated, self.time_elapsed, self.nps
        );
        debug!("EVAL current={}", self.current_eval);

        debug!("");
        debug!("==> Early Exits");
        debug!(
            "  - Draws:            {:>9} ({:>6.2}%)",
            self.draw_returns,
            Self::percent(self.draw_returns, self.nodes_searched)
        );
        debug!(
            "  - Mates:            {:>9} ({:>6.2}%)",
            self.mate_returns,
            Self::percent(self.mate_returns, self.nodes_searched)
        );

        debug!("");
        debug!("==> Pruning & TT");
        debug!(
            "  - Branches Pruned:  {:>9} ({:>6.2}% of nodes)",
            self.branches_pruned,
            Self::percent(self.branches_pruned, self.nodes_searched)
        );
        debug!(
            "  - TT Hits:          {:>9} ({:>6.2}% of probes), hash_full: {}/1000",
            self.tt_hits,
            Self::percent(self.tt_hits, self.tt_probes),
            self.hash_full
        );
        debug!(
            "    - TT Cutoffs:     {:>9} ({:>6.2}% of hits)",
            self.tt_cutoffs,
            Self::percent(self.tt_cutoffs, self.tt_hits)
        );

        let total_cutoffs: u64 = self.cutoff_at_move.iter().sum();
        if total_cutoffs > 0 {
            debug!("");
            debug!("==> Move Ordering");
            debug!("  - Total Beta Cutoffs: {}", total_cutoffs);
            debug!("  - Avg. Cutoff Index:  {:.2}", self.avg_cutoff_index());

            let histogram: Vec<String> = self
                .cutoff_at_move
                .iter()
                .take(10) // Limit to first 10 for readability
                .enumerate()
                .filter(|&(_, &count)| count > 0)
                .map(|(i, count)| format!("{}:{}", i, count))
                .collect();

            if !histogram.is_empty() {
                debug!(
                    "  - Cutoff Histogram (move index:count): [{}]",
                    histogram.join(", ")
                );
            }
        }
    }
}
