//! Human vs engine in the terminal.

use std::io::{BufRead, Write};

use clap::Parser;

use crate::bot::SearchBot;
use crate::prelude::*;
use crate::search::format_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Game {
    board: Board,
    start_fen: String,
    human: Side,
    bot: SearchBot<PhasedEvaluator>,
    move_time: u64,
    time_divisor: u64,
}

impl Game {
    pub fn new(fen: &str, human: Side, cfg: &EngineConfig, move_time: u64) -> miette::Result<Self> {
        Ok(Self {
            board: Board::from_fen(fen)?,
            start_fen: fen.to_string(),
            human,
            bot: bot::engine(cfg),
            move_time,
            time_divisor: cfg.search.time_divisor,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    fn engine_to_move(&self) -> bool {
        self.board.side_to_move() != self.human && self.board.outcome().is_none()
    }

    /// Lets the engine move if it is its turn and the game is not over.
    pub fn engine_move<W: Write>(&mut self, out: &mut W) -> miette::Result<()> {
        if !self.engine_to_move() {
            return Ok(());
        }
        let clock = Timer::for_move_time(self.move_time, self.time_divisor);
        let Some(mv) = self.bot.think(&mut self.board, &clock) else {
            return Ok(());
        };
        self.board.make_move(mv);

        if let Some(result) = self.bot.last_result() {
            writeln!(
                out,
                "Engine plays {mv} ({}, depth {})",
                format_score(result.score, result.depth),
                result.depth
            )
            .into_diagnostic()?;
        }
        self.show(out)
    }

    fn show<W: Write>(&self, out: &mut W) -> miette::Result<()> {
        writeln!(out, "{}", self.board).into_diagnostic()?;
        if let Some(outcome) = self.board.outcome() {
            writeln!(out, "Game over: {outcome}").into_diagnostic()?;
        }
        Ok(())
    }

    /// Takes back moves until it is the human's turn again.
    fn undo(&mut self) -> bool {
        let mut undone = false;
        while let Some(mv) = self.board.last_move() {
            self.board.undo_move(mv);
            undone = true;
            if self.board.side_to_move() == self.human {
                break;
            }
        }
        undone
    }

    /// Runs one line of input.
    pub fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> miette::Result<Flow> {
        let words = shell_words::split(line)
            .into_diagnostic()
            .context("Splitting command")?;
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let cmd = match GameCommand::try_parse_from(words) {
            Ok(cmd) => cmd.cmd,
            Err(e) => {
                writeln!(out, "{e}").into_diagnostic()?;
                return Ok(Flow::Continue);
            }
        };
        trace!("Game command: {cmd:?}");

        match cmd {
            GameSubcommand::Move { mv } => {
                if self.board.outcome().is_some() {
                    writeln!(out, "The game is over, restart or undo").into_diagnostic()?;
                    return Ok(Flow::Continue);
                }
                if self.board.side_to_move() != self.human {
                    writeln!(out, "Not your turn").into_diagnostic()?;
                    return Ok(Flow::Continue);
                }
                match self.board.play_uci(&mv) {
                    Ok(_) => {
                        self.show(out)?;
                        self.engine_move(out)?;
                    }
                    Err(e) => writeln!(out, "{e}").into_diagnostic()?,
                }
            }
            GameSubcommand::Print => self.show(out)?,
            GameSubcommand::Undo => {
                if self.undo() {
                    self.show(out)?;
                } else {
                    writeln!(out, "Nothing to undo").into_diagnostic()?;
                }
            }
            GameSubcommand::Eval => {
                let evaluator = self.bot.searcher().evaluator();
                let trace = evaluator.trace(&self.board);
                writeln!(out, "{trace}").into_diagnostic()?;
                writeln!(
                    out,
                    "Side to move: {}",
                    evaluator.evaluate(&self.board)
                )
                .into_diagnostic()?;
            }
            GameSubcommand::Think => {
                let clock = Timer::for_move_time(self.move_time, self.time_divisor);
                match self.bot.think(&mut self.board, &clock) {
                    Some(mv) => {
                        let (score, depth) = self
                            .bot
                            .last_result()
                            .map(|r| (r.score, r.depth))
                            .unwrap_or_default();
                        writeln!(
                            out,
                            "Suggested: {mv} ({}, depth {depth})",
                            format_score(score, depth)
                        )
                        .into_diagnostic()?;
                    }
                    None => writeln!(out, "No legal moves").into_diagnostic()?,
                }
            }
            GameSubcommand::Fen { set } => match set {
                Some(fen) => match Board::from_fen(&fen) {
                    Ok(board) => {
                        self.board = board;
                        self.start_fen = fen;
                        self.bot.new_game();
                        self.show(out)?;
                        self.engine_move(out)?;
                    }
                    Err(e) => writeln!(out, "{e:?}").into_diagnostic()?,
                },
                None => writeln!(out, "{}", self.board.to_fen()).into_diagnostic()?,
            },
            GameSubcommand::Depth { depth } => {
                let limits = if depth == 0 {
                    SearchLimits::infinite()
                } else {
                    SearchLimits::depth(depth)
                };
                self.bot.searcher_mut().set_limits(limits);
                writeln!(out, "Depth cap: {}", limits.depth_cap()).into_diagnostic()?;
            }
            GameSubcommand::Clear => utils::clear_screen()?,
            GameSubcommand::Restart => {
                self.board = Board::from_fen(&self.start_fen)?;
                self.bot.new_game();
                self.show(out)?;
                self.engine_move(out)?;
            }
            GameSubcommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

pub fn run<R: BufRead, W: Write>(game: &mut Game, input: R, mut out: W) -> miette::Result<()> {
    game.show(&mut out)?;
    game.engine_move(&mut out)?;

    for line in input.lines() {
        let line = line.into_diagnostic().context("Reading input")?;
        if game.handle(&line, &mut out)? == Flow::Quit {
            break;
        }
        out.flush().into_diagnostic()?;
    }
    Ok(())
}

/// Plays on stdin/stdout until `quit`.
pub fn game_loop(fen: &str, human: Side, cfg: &EngineConfig, move_time: u64) -> miette::Result<()> {
    info!("Starting game as {human}, engine has {move_time}ms per move");
    let mut game = Game::new(fen, human, cfg, move_time)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(&mut game, stdin.lock(), stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(fen: &str, human: Side) -> Game {
        let mut cfg = EngineConfig::default();
        cfg.search.hash_size_mb = 1;
        cfg.search.collect_stats = false;
        let mut game = Game::new(fen, human, &cfg, 1000).unwrap();
        game.bot.searcher_mut().set_limits(SearchLimits::depth(2));
        game
    }

    fn send(game: &mut Game, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = game.handle(line, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn human_move_gets_an_answer() {
        let mut g = game(START_FEN, Side::White);
        let (_, out) = send(&mut g, "move e2e4");
        assert!(out.contains("Engine plays"));
        assert_eq!(g.board().history_len(), 2);
        assert_eq!(g.board().side_to_move(), Side::White);
    }

    #[test]
    fn illegal_move_is_reported_not_played() {
        let mut g = game(START_FEN, Side::White);
        let (flow, _) = send(&mut g, "m e2e5");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(g.board().history_len(), 0);
    }

    #[test]
    fn undo_takes_back_a_full_move() {
        let mut g = game(START_FEN, Side::White);
        send(&mut g, "m d2d4");
        send(&mut g, "undo");
        assert_eq!(g.board().to_fen(), Board::new().to_fen());
        let (_, out) = send(&mut g, "u");
        assert!(out.contains("Nothing to undo"));
    }

    #[test]
    fn fen_and_depth_commands() {
        let mut g = game(START_FEN, Side::White);
        let (_, out) = send(&mut g, "fen");
        assert!(out.contains(START_FEN));

        send(&mut g, "fen \"6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1\"");
        assert_eq!(g.board().history_len(), 0);
        let (_, out) = send(&mut g, "think");
        assert!(out.contains("a1a8"), "{out}");
        assert!(out.contains("mate 1"), "{out}");

        let (_, out) = send(&mut g, "d 0");
        assert!(out.contains(&format!("Depth cap: {MAX_DEPTH}")));
    }

    #[test]
    fn engine_moves_first_when_human_is_black() {
        let mut g = game(START_FEN, Side::Black);
        let mut out = Vec::new();
        run(&mut g, "print\nquit\nprint\n".as_bytes(), &mut out).unwrap();
        assert_eq!(g.board().history_len(), 1);
    }

    #[test]
    fn eval_and_unknown_commands() {
        let mut g = game(START_FEN, Side::White);
        let (_, out) = send(&mut g, "eval");
        assert!(out.contains("Side to move: 0"), "{out}");
        let (flow, _) = send(&mut g, "castle everything");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(send(&mut g, "q").0, Flow::Quit);
    }
}
