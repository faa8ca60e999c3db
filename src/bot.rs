//! Bots as a match host sees them: one `think` call per turn.

use chess::ChessMove;
use clap::ValueEnum;

use crate::prelude::*;

/// Depth the baseline opponent always searches to
pub const BASELINE_DEPTH: u16 = 4;

pub trait Bot: Send {
    fn name(&self) -> &str;

    /// Picks a move for the side to move. `board` is left as it was found.
    /// `None` only when there is no legal move.
    fn think(&mut self, board: &mut Board, clock: &dyn Clock) -> Option<ChessMove>;

    /// Stats of the last `think`.
    fn stats(&self) -> &SearchStats;

    /// Drops anything remembered from earlier games.
    fn new_game(&mut self) {}
}

/// A [`Searcher`] behind the [`Bot`] interface, either time-managed or
/// searching to a fixed depth.
#[derive(Debug, Clone)]
pub struct SearchBot<E: Evaluator> {
    name: String,
    searcher: Searcher<E>,
    fixed_depth: Option<u16>,
    last: Option<SearchResult<ChessMove>>,
}

impl<E: Evaluator> SearchBot<E> {
    pub fn new(name: impl Into<String>, searcher: Searcher<E>) -> Self {
        Self {
            name: name.into(),
            searcher,
            fixed_depth: None,
            last: None,
        }
    }

    /// Ignores the clock and always searches exactly `depth` plies.
    pub fn with_fixed_depth(mut self, depth: u16) -> Self {
        self.fixed_depth = Some(depth);
        self
    }

    pub fn searcher(&self) -> &Searcher<E> {
        &self.searcher
    }

    pub fn searcher_mut(&mut self) -> &mut Searcher<E> {
        &mut self.searcher
    }

    pub fn last_result(&self) -> Option<&SearchResult<ChessMove>> {
        self.last.as_ref()
    }
}

impl<E: Evaluator + Send> Bot for SearchBot<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn think(&mut self, board: &mut Board, clock: &dyn Clock) -> Option<ChessMove> {
        let result = match self.fixed_depth {
            Some(depth) => self.searcher.search_depth(board, depth),
            None => self.searcher.think(board, clock),
        };
        debug!(
            "{} chose {:?} (score {}, depth {}, {} nodes)",
            self.name,
            result.best_move.map(|m| m.to_string()),
            result.score,
            result.depth,
            result.nodes_searched
        );
        let best = result.best_move;
        self.last = Some(result);
        best
    }

    fn stats(&self) -> &SearchStats {
        self.searcher.stats()
    }

    fn new_game(&mut self) {
        self.searcher.clear();
        self.last = None;
    }
}

/// Full engine: phased evaluation, transposition table, time-managed.
pub fn engine(cfg: &EngineConfig) -> SearchBot<PhasedEvaluator> {
    let searcher = Searcher::new(PhasedEvaluator::new(cfg.eval.clone()), cfg.search);
    SearchBot::new("Tempo", searcher)
}

/// Reference opponent: material only, fixed depth, no table.
pub fn baseline(cfg: &EngineConfig) -> SearchBot<MaterialEvaluator> {
    let config = SearchConfig {
        use_tt: false,
        emit_info: false,
        ..cfg.search
    };
    SearchBot::new("Baseline", Searcher::new(MaterialEvaluator::new(), config))
        .with_fixed_depth(BASELINE_DEPTH)
}

/// Bots selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BotKind {
    Engine,
    Baseline,
}

impl BotKind {
    pub fn build(&self, cfg: &EngineConfig) -> Box<dyn Bot> {
        match self {
            BotKind::Engine => Box::new(engine(cfg)),
            BotKind::Baseline => Box::new(baseline(cfg)),
        }
    }
}

impl Display for BotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotKind::Engine => write!(f, "engine"),
            BotKind::Baseline => write!(f, "baseline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::timer::FixedClock;

    fn small_config() -> EngineConfig {
        let mut cfg = EngineConfig::default();
        cfg.search.hash_size_mb = 1;
        cfg.search.collect_stats = false;
        cfg
    }

    #[test]
    fn engine_returns_a_legal_move_and_restores_the_board() {
        let mut bot = engine(&small_config());
        let mut board = Board::from_fen(KIWIPETE).unwrap();
        let fen = board.to_fen();
        // Out of time right away: one iteration only
        let clock = FixedClock {
            elapsed_ms: 10,
            remaining_ms: 10,
        };
        let mv = bot.think(&mut board, &clock).expect("kiwipete has moves");
        assert!(board.is_legal(mv));
        assert_eq!(board.to_fen(), fen);
        assert_eq!(bot.stats().depth_reached, 1);
    }

    #[test]
    fn baseline_ignores_the_clock() {
        let mut bot = baseline(&small_config());
        let mut board = Board::new();
        let clock = FixedClock {
            elapsed_ms: 10,
            remaining_ms: 10,
        };
        assert!(bot.think(&mut board, &clock).is_some());
        assert_eq!(bot.stats().depth_reached, BASELINE_DEPTH);
        assert_eq!(bot.last_result().map(|r| r.depth), Some(BASELINE_DEPTH));
    }

    #[test]
    fn baseline_takes_a_hanging_queen() {
        let mut bot = BotKind::Baseline.build(&small_config());
        let mut board = Board::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").unwrap();
        let mv = bot.think(&mut board, &FixedClock::default());
        assert_eq!(mv.map(|m| m.to_string()), Some("d2d5".into()));
        assert_eq!(bot.name(), "Baseline");
    }

    #[test]
    fn no_move_when_mated() {
        let mut bot = engine(&small_config());
        let mut board =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert_eq!(bot.think(&mut board, &Timer::unbounded()), None);
    }
}
