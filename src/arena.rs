//! Bot-vs-bot matches with per-side game clocks.

use std::fmt;
use std::time::Duration;

use crate::board::chess_board::GameOutcome;
use crate::bot::BotKind;
use crate::prelude::*;

#[cfg(feature = "parallel")]
use {
    indicatif::{ProgressBar, ProgressStyle},
    rayon::prelude::*,
};

/// Start positions for match games. Each one is played twice, once with
/// either bot on White.
pub const OPENINGS: &[&str] = &[
    START_FEN,
    "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
    "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
    "rnbqkbnr/pppp1ppp/4p3/8/3PP3/8/PPP2PPP/RNBQKBNR b KQkq - 0 2",
    "rnbqkb1r/pppppppp/5n2/8/3P4/8/PPP1PPPP/RNBQKBNR w KQkq - 1 2",
    "rnbqkbnr/ppp1pppp/8/3p4/2PP4/8/PP2PPPP/RNBQKBNR b KQkq - 0 2",
    "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
    "rnbqkbnr/pp2pppp/2p5/3p4/3PP3/8/PPP2PPP/RNBQKBNR w KQkq - 0 3",
    "rnbqkb1r/pppp1ppp/4pn2/8/2PP4/8/PP2PPPP/RNBQKBNR w KQkq - 0 3",
    "rnbqkbnr/pppppp1p/6p1/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
    "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    "rnbqk2r/pppp1ppp/4pn2/8/1bPP4/2N5/PP2PPPP/R1BQKBNR w KQkq - 2 4",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    pub games: usize,
    /// Clock per side per game
    pub time_ms: u64,
    /// Plies after which the game is adjudicated a draw
    pub max_plies: usize,
    /// Table size for each engine; games in parallel each get their own
    pub hash_size_mb: usize,
    pub parallel: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: 10,
            time_ms: 30_000,
            max_plies: 400,
            hash_size_mb: 16,
            parallel: true,
        }
    }
}

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Finished(GameOutcome),
    Timeout { loser: Side },
    IllegalMove { loser: Side },
    PlyCap,
}

impl GameEnd {
    pub fn winner(&self) -> Option<Side> {
        match *self {
            GameEnd::Finished(GameOutcome::Checkmate { winner }) => Some(winner),
            GameEnd::Timeout { loser } | GameEnd::IllegalMove { loser } => Some(loser.flip()),
            GameEnd::Finished(_) | GameEnd::PlyCap => None,
        }
    }
}

impl fmt::Display for GameEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEnd::Finished(outcome) => write!(f, "{outcome}"),
            GameEnd::Timeout { loser } => write!(f, "{loser} lost on time"),
            GameEnd::IllegalMove { loser } => write!(f, "{loser} played an illegal move"),
            GameEnd::PlyCap => write!(f, "draw by ply cap"),
        }
    }
}

/// One finished game, seen from the board's two sides.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub end: GameEnd,
    pub plies: usize,
    pub final_fen: String,
    /// Search stats summed over every move, indexed by [`Side`]
    pub stats: [SearchStats; NUM_SIDES],
    pub think_time: [Duration; NUM_SIDES],
}

/// Plays one game from `start_fen`. Each side starts with `time_ms` on its
/// clock; the time a `think` takes is deducted and an empty clock loses.
pub fn play_game(
    white: &mut dyn Bot,
    black: &mut dyn Bot,
    start_fen: &str,
    time_ms: u64,
    max_plies: usize,
) -> miette::Result<GameRecord> {
    let mut board = Board::from_fen(start_fen)?;
    let mut remaining = [time_ms; NUM_SIDES];
    let mut stats = [SearchStats::default(), SearchStats::default()];
    let mut think_time = [Duration::ZERO; NUM_SIDES];
    white.new_game();
    black.new_game();

    let mut plies = 0;
    let end = loop {
        if let Some(outcome) = board.outcome() {
            break GameEnd::Finished(outcome);
        }
        if plies >= max_plies {
            break GameEnd::PlyCap;
        }

        let side = board.side_to_move();
        let bot: &mut dyn Bot = match side {
            Side::White => &mut *white,
            Side::Black => &mut *black,
        };

        let clock = Timer::new(remaining[side.index()]);
        let mv = bot.think(&mut board, &clock);
        let spent = clock.elapsed();

        think_time[side.index()] += spent;
        stats[side.index()] = std::mem::take(&mut stats[side.index()]) + bot.stats().clone();

        let spent_ms = spent.as_millis() as u64;
        remaining[side.index()] = remaining[side.index()].saturating_sub(spent_ms);
        if remaining[side.index()] == 0 {
            break GameEnd::Timeout { loser: side };
        }

        match mv {
            Some(mv) if board.is_legal(mv) => {
                trace!("{} played {mv}", bot.name());
                board.make_move(mv);
                plies += 1;
            }
            other => {
                warn!(
                    "{} returned {:?} in {}",
                    bot.name(),
                    other.map(|m| m.to_string()),
                    board.to_fen()
                );
                break GameEnd::IllegalMove { loser: side };
            }
        }
    };

    debug!("Game over after {plies} plies: {end}");
    Ok(GameRecord {
        end,
        plies,
        final_fen: board.to_fen(),
        stats,
        think_time,
    })
}

/// Running totals for one bot over a match.
#[derive(Debug, Clone, Default)]
pub struct BotMatchStats {
    pub name: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub timeouts: u32,
    pub illegal_moves: u32,
    pub think_time: Duration,
    pub search: SearchStats,
}

impl BotMatchStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn record(&mut self, game: &GameRecord, side: Side) {
        match game.end.winner() {
            Some(winner) if winner == side => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
        match game.end {
            GameEnd::Timeout { loser } if loser == side => self.timeouts += 1,
            GameEnd::IllegalMove { loser } if loser == side => self.illegal_moves += 1,
            _ => {}
        }
        self.think_time += game.think_time[side.index()];
        self.search = std::mem::take(&mut self.search) + game.stats[side.index()].clone();
    }

    pub fn games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// Points per game, a draw counting half.
    pub fn score(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (self.wins as f64 + self.draws as f64 / 2.0) / games as f64
    }
}

impl fmt::Display for BotMatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        writeln!(
            f,
            "  Score: +{} ={} -{} ({:.1}%)",
            self.wins,
            self.draws,
            self.losses,
            self.score() * 100.0
        )?;
        writeln!(f, "  Timeouts: {}", self.timeouts)?;
        writeln!(f, "  Illegal moves: {}", self.illegal_moves)?;
        writeln!(f, "  Think time: {:.2?}", self.think_time)?;
        writeln!(f, "  Nodes: {}", self.search.nodes_searched)?;
        write!(f, "  Branches pruned: {}", self.search.branches_pruned)
    }
}

#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub bot_a: BotMatchStats,
    pub bot_b: BotMatchStats,
    pub games: Vec<GameRecord>,
}

/// Opening and colours for the `index`th game: openings are used in order,
/// each twice, bot A taking White on even games.
pub fn schedule(index: usize) -> (&'static str, bool) {
    (OPENINGS[(index / 2) % OPENINGS.len()], index % 2 == 0)
}

/// Plays `cfg.games` games between two freshly built bots per game.
pub fn run_match(
    cfg: &ArenaConfig,
    engine_cfg: &EngineConfig,
    bot_a: BotKind,
    bot_b: BotKind,
) -> miette::Result<MatchSummary> {
    info!(
        "Arena: {bot_a} vs {bot_b}, {} games, {}ms per side",
        cfg.games, cfg.time_ms
    );
    let mut engine_cfg = engine_cfg.clone();
    engine_cfg.search.hash_size_mb = cfg.hash_size_mb.max(1);
    let engine_cfg = &engine_cfg;

    let play_one = |index: usize| -> miette::Result<(bool, GameRecord)> {
        let (fen, a_is_white) = schedule(index);
        let mut a = bot_a.build(engine_cfg);
        let mut b = bot_b.build(engine_cfg);
        let record = if a_is_white {
            play_game(a.as_mut(), b.as_mut(), fen, cfg.time_ms, cfg.max_plies)?
        } else {
            play_game(b.as_mut(), a.as_mut(), fen, cfg.time_ms, cfg.max_plies)?
        };
        Ok((a_is_white, record))
    };

    #[cfg(feature = "parallel")]
    let results: Vec<miette::Result<(bool, GameRecord)>> = if cfg.parallel {
        let pb = ProgressBar::new(cfg.games as u64);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games")
                .into_diagnostic()?
                .progress_chars("#>-"),
        );
        let results = (0..cfg.games)
            .into_par_iter()
            .map(|i| {
                let result = play_one(i);
                pb.inc(1);
                result
            })
            .collect();
        pb.finish_and_clear();
        results
    } else {
        (0..cfg.games).map(play_one).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results: Vec<miette::Result<(bool, GameRecord)>> = (0..cfg.games).map(play_one).collect();

    let mut summary = MatchSummary {
        bot_a: BotMatchStats::new(bot_a.to_string()),
        bot_b: BotMatchStats::new(bot_b.to_string()),
        games: Vec::with_capacity(cfg.games),
    };
    for (index, result) in results.into_iter().enumerate() {
        let (a_is_white, record) = result?;
        let (a_side, b_side) = if a_is_white {
            (Side::White, Side::Black)
        } else {
            (Side::Black, Side::White)
        };
        summary.bot_a.record(&record, a_side);
        summary.bot_b.record(&record, b_side);
        info!(
            "Game {} of {}: {} ({} plies)",
            index + 1,
            cfg.games,
            record.end,
            record.plies
        );
        summary.games.push(record);
    }

    Ok(summary)
}
