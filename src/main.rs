use clap::Parser;
use tempo::arena::{self, ArenaConfig};
use tempo::comms::uci;
use tempo::game;
use tempo::prelude::*;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> miette::Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    init()?;

    let span = span!(Level::DEBUG, "main");
    let _guard = span.enter();

    let cli = Cli::parse();
    let config = EngineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Think {
            fen,
            depth,
            movetime,
        }) => {
            trace!("Thinking on {fen} for {movetime}ms, depth {depth:?}");
            let mut board = Board::from_fen(&fen)?;
            let limits = SearchLimits { max_depth: depth };
            let mut searcher = Searcher::new(PhasedEvaluator::new(config.eval), config.search)
                .with_limits(limits);
            let clock = Timer::for_move_time(movetime, config.search.time_divisor);
            let result = searcher.think(&mut board, &clock);

            println!("{board}");
            match result.best_move {
                Some(mv) => println!(
                    "bestmove {mv} score {} depth {} nodes {} nps {}",
                    search::format_score(result.score, result.depth),
                    result.depth,
                    result.nodes_searched,
                    result.nps()
                ),
                None => println!("No legal moves"),
            }
        }
        Some(Commands::Eval { fen }) => {
            let board = Board::from_fen(&fen)?;
            let evaluator = PhasedEvaluator::new(config.eval);
            println!("{board}");
            println!("{}", evaluator.trace(&board));
            println!("Side to move: {}", evaluator.evaluate(&board));
        }
        Some(Commands::Play {
            fen,
            black,
            movetime,
        }) => {
            let human = if black { Side::Black } else { Side::White };
            game::game_loop(&fen, human, &config, movetime)?;
        }
        Some(Commands::Uci) | None => {
            trace!("Running UCI loop");
            uci::play(config)?;
        }
        Some(Commands::Arena {
            games,
            time_ms,
            bot_a,
            bot_b,
            max_plies,
            hash_mb,
            sequential,
        }) => {
            let arena_cfg = ArenaConfig {
                games,
                time_ms,
                max_plies,
                hash_size_mb: hash_mb,
                parallel: !sequential,
            };
            let summary = arena::run_match(&arena_cfg, &config, bot_a, bot_b)?;
            println!("{}", summary.bot_a);
            println!("{}", summary.bot_b);
        }
        Some(Commands::DumpConfig { path }) => {
            config.save_to_file(&path)?;
            println!("Wrote config to {}", path.display());
        }
    }
    Ok(())
}
