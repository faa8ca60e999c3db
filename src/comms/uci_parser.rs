use tracing::trace;

#[derive(Debug, PartialEq)]
pub enum UciCommand {
    /// "uci" cmd, sent at startup
    Uci,
    /// "isready" cmd, to check if engine is ready
    IsReady,
    /// "ucinewgame" cmd, to setup a new game state
    UciNewGame,
    /// "position" cmd, to setup the board
    Position {
        startpos: bool,
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// "go" cmd, to start search + time controlls
    Go(GoParams),
    /// "stop" cmd, to stop search
    Stop,
    /// "setoption" cmd, to configure engine options
    SetOption { name: String, value: String },
    /// "quit" cmd, to exit game
    Quit,
    /// unknown or unsupported cmd
    Unknown(String),
}

#[derive(Debug, PartialEq, Default)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub moves_to_go: Option<u64>,
    pub move_time: Option<u64>,
    pub depth: Option<u16>,
    pub infinite: bool,
}

pub fn parse_line(line: &str) -> UciCommand {
    trace!("UCI: {line}");
    let parts: Vec<&str> = line.split_ascii_whitespace().collect();
    let Some(&first) = parts.first() else {
        return UciCommand::Unknown(line.to_string());
    };

    match first {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        "position" => parse_position(&parts[1..]),
        "go" => parse_go(&parts[1..]),
        "ucinewgame" => UciCommand::UciNewGame,
        "setoption" => parse_setoption(&parts[1..]),
        _ => UciCommand::Unknown(line.to_string()),
    }
}

fn parse_position(parts: &[&str]) -> UciCommand {
    let mut fen: Option<String> = None;
    let mut startpos = false;

    let moves_idx = parts.iter().position(|&p| p == "moves");
    let position_parts = match moves_idx {
        Some(idx) => &parts[..idx],
        None => parts,
    };

    match position_parts.first() {
        Some(&"startpos") => startpos = true,
        Some(&"fen") => fen = Some(position_parts[1..].join(" ")),
        _ => {}
    }

    let moves = match moves_idx {
        Some(idx) => parts[idx + 1..].iter().map(|s| s.to_string()).collect(),
        None => Vec::new(),
    };

    UciCommand::Position {
        startpos,
        fen,
        moves,
    }
}

fn parse_go(parts: &[&str]) -> UciCommand {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < parts.len() {
        let value = parts.get(i + 1);
        let takes_value = match parts[i] {
            "wtime" => {
                params.wtime = value.and_then(|v| v.parse().ok());
                true
            }
            "btime" => {
                params.btime = value.and_then(|v| v.parse().ok());
                true
            }
            "winc" => {
                params.winc = value.and_then(|v| v.parse().ok());
                true
            }
            "binc" => {
                params.binc = value.and_then(|v| v.parse().ok());
                true
            }
            "movestogo" => {
                params.moves_to_go = value.and_then(|v| v.parse().ok());
                true
            }
            "movetime" => {
                params.move_time = value.and_then(|v| v.parse().ok());
                true
            }
            "depth" => {
                params.depth = value.and_then(|v| v.parse().ok());
                true
            }
            "infinite" => {
                params.infinite = true;
                false
            }
            _ => false,
        };
        i += if takes_value { 2 } else { 1 };
    }

    UciCommand::Go(params)
}

fn parse_setoption(parts: &[&str]) -> UciCommand {
    // setoption name <name> [value <value>]
    let value_idx = parts.iter().position(|&p| p == "value");
    let name_parts = match value_idx {
        Some(idx) => &parts[..idx],
        None => parts,
    };
    let name = name_parts
        .iter()
        .skip_while(|&&p| p != "name")
        .skip(1)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let value = value_idx
        .map(|idx| parts[idx + 1..].join(" "))
        .unwrap_or_default();

    UciCommand::SetOption { name, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_commands() {
        assert_eq!(parse_line("uci"), UciCommand::Uci);
        assert_eq!(parse_line("  isready  "), UciCommand::IsReady);
        assert_eq!(parse_line("ucinewgame"), UciCommand::UciNewGame);
        assert_eq!(parse_line("stop"), UciCommand::Stop);
        assert_eq!(parse_line("quit"), UciCommand::Quit);
        assert_eq!(parse_line(""), UciCommand::Unknown(String::new()));
        assert_eq!(
            parse_line("register later"),
            UciCommand::Unknown("register later".into())
        );
    }

    #[test]
    fn position_startpos_with_moves() {
        assert_eq!(
            parse_line("position startpos moves e2e4 e7e5"),
            UciCommand::Position {
                startpos: true,
                fen: None,
                moves: vec!["e2e4".into(), "e7e5".into()],
            }
        );
    }

    #[test]
    fn position_fen_without_moves() {
        assert_eq!(
            parse_line("position fen 8/8/8/4k3/8/8/8/4K2R w K - 0 1"),
            UciCommand::Position {
                startpos: false,
                fen: Some("8/8/8/4k3/8/8/8/4K2R w K - 0 1".into()),
                moves: vec![],
            }
        );
    }

    #[test]
    fn go_with_clock() {
        let cmd = parse_line("go wtime 60000 btime 55000 winc 1000 binc 1000 movestogo 20");
        assert_eq!(
            cmd,
            UciCommand::Go(GoParams {
                wtime: Some(60000),
                btime: Some(55000),
                winc: Some(1000),
                binc: Some(1000),
                moves_to_go: Some(20),
                ..Default::default()
            })
        );
    }

    #[test]
    fn go_depth_movetime_and_infinite() {
        assert_eq!(
            parse_line("go depth 7"),
            UciCommand::Go(GoParams {
                depth: Some(7),
                ..Default::default()
            })
        );
        assert_eq!(
            parse_line("go movetime 2500"),
            UciCommand::Go(GoParams {
                move_time: Some(2500),
                ..Default::default()
            })
        );
        assert_eq!(
            parse_line("go infinite"),
            UciCommand::Go(GoParams {
                infinite: true,
                ..Default::default()
            })
        );
    }

    #[test]
    fn setoption_name_and_value() {
        assert_eq!(
            parse_line("setoption name LogFile value true"),
            UciCommand::SetOption {
                name: "LogFile".into(),
                value: "true".into()
            }
        );
        assert_eq!(
            parse_line("setoption name Clear Hash"),
            UciCommand::SetOption {
                name: "Clear Hash".into(),
                value: String::new()
            }
        );
    }
}
