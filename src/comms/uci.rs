use std::io::{BufRead, Write};

use crate::{
    bot::{self, Bot, SearchBot},
    comms::uci_parser::{GoParams, UciCommand, parse_line},
    prelude::*,
};

/// Depth used for `go infinite` or a bare `go`, since a running search
/// cannot be interrupted.
pub const UNTIMED_DEPTH: u16 = 6;

pub struct UciState {
    board: Board,
    config: EngineConfig,
    bot: SearchBot<PhasedEvaluator>,
    session_stats: SearchStats,
}

impl UciState {
    pub fn new(mut config: EngineConfig) -> Self {
        config.search.emit_info = true;
        let bot = bot::engine(&config);
        Self {
            board: Board::new(),
            config,
            bot,
            session_stats: SearchStats::default(),
        }
    }

    fn reset(&mut self) {
        trace!("Resetting UciState");
        self.board = Board::new();
        self.bot.new_game();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

/// Reads UCI commands from stdin until `quit` or end of input.
pub fn play(config: EngineConfig) -> miette::Result<()> {
    let mut state = UciState::new(config);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(&mut state, stdin.lock(), stdout.lock())
}

pub fn run<R: BufRead, W: Write>(state: &mut UciState, input: R, mut out: W) -> miette::Result<()> {
    for line in input.lines() {
        let line = line.into_diagnostic().context("Reading UCI input")?;
        match parse_line(&line) {
            UciCommand::Uci => cmd_uci(&mut out)?,
            UciCommand::IsReady => writeln!(out, "readyok").into_diagnostic()?,
            UciCommand::UciNewGame => state.reset(),
            UciCommand::Position {
                startpos,
                fen,
                moves,
            } => {
                if let Err(e) = cmd_position(state, startpos, fen, moves) {
                    warn!("Error processing position command: {:?}", e);
                }
            }
            UciCommand::Go(go_params) => cmd_go(state, go_params, &mut out)?,
            // Searches run to completion before the next command is read
            UciCommand::Stop => {}
            UciCommand::Quit => break,
            UciCommand::Unknown(cmd) => {
                if !cmd.trim().is_empty() {
                    info!("Received unknown command: {cmd}");
                }
            }
            UciCommand::SetOption { name, value } => {
                if let Err(e) = cmd_setoption(state, &name, &value) {
                    warn!("Error setting option: {e:?}");
                }
            }
        }
        out.flush().into_diagnostic()?;
    }

    state.session_stats.log_summary();
    Ok(())
}

fn cmd_position(
    state: &mut UciState,
    startpos: bool,
    fen: Option<String>,
    moves: Vec<String>,
) -> miette::Result<()> {
    let mut board = if startpos {
        Board::new()
    } else if let Some(fen_str) = fen {
        Board::from_fen(&fen_str)?
    } else {
        miette::bail!("position needs either startpos or fen");
    };

    for move_uci in moves {
        board.play_uci(&move_uci)?;
    }

    state.board = board;
    Ok(())
}

fn cmd_go<W: Write>(state: &mut UciState, params: GoParams, out: &mut W) -> miette::Result<()> {
    let divisor = state.config.search.time_divisor;
    let time_remaining = match state.board.side_to_move() {
        Side::White => params.wtime,
        Side::Black => params.btime,
    };

    let (clock, limits) = if let Some(move_time) = params.move_time {
        (
            Timer::for_move_time(move_time, divisor),
            SearchLimits {
                max_depth: params.depth,
            },
        )
    } else if let Some(time) = time_remaining {
        info!(
            "Time Management: Remaining={time}ms, budget about {}ms",
            time / divisor.max(1)
        );
        (
            Timer::new(time),
            SearchLimits {
                max_depth: params.depth,
            },
        )
    } else {
        let depth = params.depth.unwrap_or(UNTIMED_DEPTH);
        if params.infinite {
            warn!("go infinite cannot be stopped, searching to depth {depth}");
        }
        (Timer::unbounded(), SearchLimits::depth(depth))
    };

    state.bot.searcher_mut().set_limits(limits);
    let best = state.bot.think(&mut state.board, &clock);
    state.session_stats = state.session_stats.clone() + state.bot.stats().clone();

    match best {
        Some(mv) => writeln!(out, "bestmove {mv}"),
        None => writeln!(out, "bestmove 0000"),
    }
    .into_diagnostic()
}

fn cmd_setoption(state: &mut UciState, name: &str, value: &str) -> miette::Result<()> {
    match name {
        "LogFile" => {
            let enable = value.eq_ignore_ascii_case("true");
            toggle_file_logging(enable)?;
            info!("Set file logging to {enable}");
        }
        "Hash" => {
            let size_mb: usize = value
                .trim()
                .parse()
                .into_diagnostic()
                .with_context(|| format!("Invalid Hash size '{value}'"))?;
            state.config.search.hash_size_mb = size_mb.max(1);
            state.bot = bot::engine(&state.config);
            info!("Resized hash to {size_mb}MB");
        }
        "Clear Hash" => {
            state.bot.new_game();
            info!("Cleared hash");
        }
        _ => {
            info!("Unknown option: {name} = {value}");
        }
    }
    Ok(())
}

fn cmd_uci<W: Write>(out: &mut W) -> miette::Result<()> {
    writeln!(out, "id name {}", env!("CARGO_PKG_NAME")).into_diagnostic()?;
    writeln!(out, "id author {}", env!("CARGO_PKG_AUTHORS")).into_diagnostic()?;
    writeln!(out).into_diagnostic()?;
    writeln!(out, "option name Hash type spin default 256 min 1 max 4096").into_diagnostic()?;
    writeln!(out, "option name Clear Hash type button").into_diagnostic()?;
    writeln!(out, "option name LogFile type check default false").into_diagnostic()?;
    writeln!(out, "uciok").into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> UciState {
        let mut cfg = EngineConfig::default();
        cfg.search.hash_size_mb = 1;
        cfg.search.collect_stats = false;
        UciState::new(cfg)
    }

    fn run_script(state: &mut UciState, script: &str) -> String {
        let mut out = Vec::new();
        run(state, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn handshake() {
        let out = run_script(&mut test_state(), "uci\nisready\nquit\n");
        assert!(out.contains("id name tempo"));
        assert!(out.contains("uciok"));
        assert!(out.ends_with("readyok\n"));
    }

    #[test]
    fn position_then_go_depth() {
        let mut state = test_state();
        let out = run_script(&mut state, "position startpos moves e2e4 e7e5\ngo depth 2\n");
        assert_eq!(state.board().history_len(), 2);

        let line = out.lines().find(|l| l.starts_with("bestmove")).unwrap();
        let uci = line.trim_start_matches("bestmove ");
        assert!(state.board().parse_move(uci).is_ok(), "{uci} is not legal");
    }

    #[test]
    fn bad_moves_leave_the_position_alone() {
        let mut state = test_state();
        run_script(&mut state, "position startpos moves e2e4\n");
        run_script(&mut state, "position startpos moves e2e5\n");
        assert_eq!(state.board().history_len(), 1);
    }

    #[test]
    fn mated_position_reports_null_move() {
        let mut state = test_state();
        let out = run_script(
            &mut state,
            "position fen rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3\ngo movetime 50\n",
        );
        assert!(out.contains("bestmove 0000"));
    }
}
