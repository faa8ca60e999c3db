use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::bot::BotKind;
use crate::consts::START_FEN;

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION") )]
pub struct Cli {
    /// TOML file with search and evaluation settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a position and print the best move
    Think {
        /// FEN string for the position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// Stop after this depth
        #[arg(short, long)]
        depth: Option<u16>,
        /// Time to spend in milliseconds
        #[arg(short = 't', long, default_value = "1000")]
        movetime: u64,
    },

    /// Print the static evaluation of a position, term by term
    Eval {
        /// FEN string for the position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
    },

    /// Play against the engine in the terminal
    Play {
        /// FEN string for starting position
        #[arg(short, long, default_value = START_FEN)]
        fen: String,
        /// Let the engine play White
        #[arg(long, default_value = "false")]
        black: bool,
        /// Engine time per move in milliseconds
        #[arg(short = 't', long, default_value = "1000")]
        movetime: u64,
    },

    /// Run as a UCI engine on stdin/stdout
    Uci,

    /// Play a match between two bots
    Arena {
        /// Number of games; colours alternate
        #[arg(short = 'n', long, default_value = "10")]
        games: usize,
        /// Clock per side per game in milliseconds
        #[arg(short = 't', long, default_value = "30000")]
        time_ms: u64,
        #[arg(long, value_enum, default_value_t = BotKind::Engine)]
        bot_a: BotKind,
        #[arg(long, value_enum, default_value_t = BotKind::Baseline)]
        bot_b: BotKind,
        /// Plies after which a game is adjudicated a draw
        #[arg(long, default_value = "400")]
        max_plies: usize,
        /// Transposition table size per engine in MB
        #[arg(long, default_value = "16")]
        hash_mb: usize,
        /// Play the games one after another
        #[arg(long, default_value = "false")]
        sequential: bool,
    },

    /// Write the default configuration to a TOML file
    DumpConfig {
        /// Where to write it
        path: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "game_cmd", no_binary_name = true)]
pub struct GameCommand {
    #[command(subcommand)]
    pub cmd: GameSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum GameSubcommand {
    /// Make a move on the board, e.g. `move e2e4`
    #[clap(visible_alias = "m")]
    Move { mv: String },

    /// Print the current board state
    #[clap(visible_alias = "p")]
    Print,

    /// Undo the last full move (yours and the engine's)
    #[clap(visible_alias = "u")]
    Undo,

    /// Show the current evaluation, term by term
    #[clap(visible_alias = "e")]
    Eval,

    /// Let the engine suggest a move without playing it
    #[clap(visible_alias = "t")]
    Think,

    /// Show the current fen of the board, or set a new one
    #[clap(visible_alias = "f")]
    Fen { set: Option<String> },

    /// Cap the engine's search depth (0 removes the cap)
    #[clap(visible_alias = "d")]
    Depth { depth: u16 },

    /// Clear screen
    #[clap(visible_alias = "c")]
    Clear,

    /// Restart game with same fen
    #[clap(visible_alias = "r")]
    Restart,

    /// Quit game
    #[clap(visible_alias = "q")]
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_config_and_subcommand() {
        let cli = Cli::try_parse_from(["tempo", "think", "-d", "6", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.command {
            Some(Commands::Think {
                depth, movetime, ..
            }) => {
                assert_eq!(depth, Some(6));
                assert_eq!(movetime, 1000);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn arena_defaults() {
        let cli = Cli::try_parse_from(["tempo", "arena", "-n", "4"]).unwrap();
        match cli.command {
            Some(Commands::Arena {
                games,
                bot_a,
                bot_b,
                ..
            }) => {
                assert_eq!(games, 4);
                assert_eq!(bot_a, BotKind::Engine);
                assert_eq!(bot_b, BotKind::Baseline);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn game_commands_accept_aliases() {
        let cmd = GameCommand::try_parse_from(["m", "e2e4"]).unwrap();
        assert!(matches!(cmd.cmd, GameSubcommand::Move { ref mv } if mv == "e2e4"));
        let cmd = GameCommand::try_parse_from(["d", "5"]).unwrap();
        assert!(matches!(cmd.cmd, GameSubcommand::Depth { depth: 5 }));
    }
}
