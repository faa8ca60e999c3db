pub use crate::board::{
    self, Board, MadeMove, Position,
    components::{Piece, Side},
};
pub use crate::bot::{self, Bot};
pub use crate::comms::*;
pub use crate::config::EngineConfig;
pub use crate::consts::*;
pub use crate::evaluation::{
    self, Evaluator, MaterialEvaluator, PhasedEvaluator,
    params::EvalParams,
    score::{Phase, Score},
};
pub use crate::search::{
    self, SearchConfig, SearchLimits, SearchResult, Searcher, stats::SearchStats,
};
pub use crate::utils::{
    self,
    cli::*,
    log::*,
    timer::{Clock, Timer},
};
pub use miette::{self, Context, IntoDiagnostic, Result};
pub use std::fmt::Display;
pub use std::str::FromStr;
pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
