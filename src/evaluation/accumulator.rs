use crate::prelude::*;

/// Which evaluation term a contribution belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Material,
    PieceSquare,
    PawnStructure,
    Development,
    KingActivity,
}

impl Term {
    pub const ALL: [Term; 5] = [
        Term::Material,
        Term::PieceSquare,
        Term::PawnStructure,
        Term::Development,
        Term::KingActivity,
    ];

    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Term::Material => "Material",
            Term::PieceSquare => "PieceSquare",
            Term::PawnStructure => "PawnStructure",
            Term::Development => "Development",
            Term::KingActivity => "KingActivity",
        };
        f.pad(name)
    }
}

/// Lets the terms stay ignorant of whether they are being summed for search
/// or broken down for display.
pub trait EvalAccumulator {
    fn params(&self) -> &EvalParams;

    /// Adds `score` for `side`. White's contributions count positive.
    fn add(&mut self, term: Term, score: Score, side: Side);

    /// Piece-square contribution. White reads `[sq]`, Black reads `[sq ^ 56]`.
    #[inline(always)]
    fn add_pst(&mut self, piece: Piece, side: Side, sq: usize) {
        let actual_sq = if side == Side::White { sq } else { sq ^ 56 };
        let weight = self.params().pst(piece, actual_sq);
        self.add(Term::PieceSquare, weight, side);
    }
}

/// Score Accumulator - For Playing
pub struct ScoreAccumulator<'a> {
    pub params: &'a EvalParams,
    pub score: Score,
}

impl<'a> ScoreAccumulator<'a> {
    pub fn new(params: &'a EvalParams) -> Self {
        Self {
            params,
            score: Score::default(),
        }
    }
}

impl EvalAccumulator for ScoreAccumulator<'_> {
    #[inline(always)]
    fn params(&self) -> &EvalParams {
        self.params
    }

    #[inline(always)]
    fn add(&mut self, _term: Term, score: Score, side: Side) {
        if side == Side::White {
            self.score += score;
        } else {
            self.score -= score;
        }
    }
}

/// Per-term totals, White-relative and untapered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalTrace {
    pub terms: [Score; Term::ALL.len()],
    pub phase: Phase,
}

impl EvalTrace {
    pub fn total(&self) -> Score {
        self.terms.iter().fold(Score::default(), |acc, &s| acc + s)
    }

    pub fn term(&self, term: Term) -> Score {
        self.terms[term.index()]
    }
}

impl Display for EvalTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<14} {:>6} {:>6} {:>6}", "Term", "MG", "EG", "Final")?;
        for term in Term::ALL {
            let s = self.term(term);
            writeln!(
                f,
                "{:<14} {:>6} {:>6} {:>6}",
                term,
                s.mg,
                s.eg,
                s.taper(self.phase)
            )?;
        }
        let total = self.total();
        write!(
            f,
            "{:<14} {:>6} {:>6} {:>6}  (phase {}/{ENDGAME_PHASE}, White's view)",
            "Total",
            total.mg,
            total.eg,
            total.taper(self.phase),
            self.phase.0
        )
    }
}

/// Trace Accumulator - For Display
pub struct TraceAccumulator<'a> {
    pub params: &'a EvalParams,
    pub trace: &'a mut EvalTrace,
}

impl EvalAccumulator for TraceAccumulator<'_> {
    #[inline(always)]
    fn params(&self) -> &EvalParams {
        self.params
    }

    fn add(&mut self, term: Term, score: Score, side: Side) {
        let slot = &mut self.trace.terms[term.index()];
        if side == Side::White {
            *slot += score;
        } else {
            *slot -= score;
        }
    }
}
