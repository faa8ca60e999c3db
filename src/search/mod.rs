//! Iterative deepening negamax with alpha-beta pruning and a transposition
//! table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

pub mod move_ordering;
pub mod negamax;
pub mod stats;
pub mod tt;


pub use negamax::Searcher;
pub use tt::{Bound, TranspositionTable};

/// Configuration for search behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Probe and store the transposition table
    pub use_tt: bool,
    pub hash_size_mb: usize,
    /// Stop deepening once `elapsed > remaining / time_divisor`
    pub time_divisor: u64,
    /// Print a UCI `info` line after every completed depth
    pub emit_info: bool,
    /// Fill in hash usage and log the stats summary after each search
    pub collect_stats: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            use_tt: true,
            hash_size_mb: 256,
            time_divisor: 120,
            emit_info: false,
            collect_stats: true,
        }
    }
}

/// Search limits on top of the clock
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: Option<u16>,
}

impl SearchLimits {
    pub fn depth(depth: u16) -> Self {
        Self {
            max_depth: Some(depth),
        }
    }

    pub fn infinite() -> Self {
        Self::default()
    }

    /// Deepest iteration to start, within `1..=MAX_DEPTH`.
    pub fn depth_cap(&self) -> u16 {
        self.max_depth.unwrap_or(MAX_DEPTH).clamp(1, MAX_DEPTH)
    }
}

/// Result of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<M> {
    /// `None` only when the root has no legal moves
    pub best_move: Option<M>,
    pub score: i32,
    /// Deepest completed iteration
    pub depth: u16,
    pub nodes_searched: u64,
    pub time_taken: Duration,
}

impl<M> Default for SearchResult<M> {
    fn default() -> Self {
        Self {
            best_move: None,
            score: 0,
            depth: 0,
            nodes_searched: 0,
            time_taken: Duration::ZERO,
        }
    }
}

impl<M> SearchResult<M> {
    pub fn nps(&self) -> u64 {
        let time_ms = self.time_taken.as_millis().max(1) as u64;
        (self.nodes_searched * 1000) / time_ms
    }

    pub fn is_mate(&self) -> bool {
        is_mate_score(self.score)
    }

    /// Moves until mate, negative when the mover is getting mated.
    pub fn mate_in(&self) -> Option<i32> {
        mate_in(self.score, self.depth)
    }
}

#[inline(always)]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_SCORE
}

/// A mate found with `d` plies of depth left scores `MATE_SCORE + d`, so
/// from a search of `depth` the mate is `depth - d` plies away.
pub fn mate_in(score: i32, depth: u16) -> Option<i32> {
    if !is_mate_score(score) {
        return None;
    }
    let remaining = score.abs() - MATE_SCORE;
    let plies = (depth as i32 - remaining).max(1);
    let moves = (plies + 1) / 2;
    Some(if score > 0 { moves } else { -moves })
}

/// Score the way UCI `info` wants it: `cp <n>` or `mate <n>`.
pub fn format_score(score: i32, depth: u16) -> String {
    match mate_in(score, depth) {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {score}"),
    }
}
