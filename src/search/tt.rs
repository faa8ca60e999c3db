#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Bound {
    /// Score is the exact evaluation [alpha < score < beta]
    #[default]
    Exact,
    /// Score is at least this value, i.e, beta cutoff [score >= beta]
    LowerBound,
    /// Score is at most this value, i.e, alpha not improved [score <= alpha]
    UpperBound,
}

/// One slot. Only the low 32 bits of the hash are kept, so two positions that
/// share both the slot and the truncated key are treated as the same.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TtEntry {
    pub key: u32,
    /// Remaining depth the score was computed at. Zero means the slot is empty.
    pub depth: u16,
    pub score: i32,
    pub bound: Bound,
}

impl TtEntry {
    #[inline(always)]
    pub fn is_occupied(&self) -> bool {
        self.depth > 0
    }
}

/// Fixed-size, always-replace transposition table.
#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<TtEntry>,
}

impl TranspositionTable {
    /// Table sized to roughly `size_mb` megabytes.
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<TtEntry>();
        Self::with_capacity((size_mb * 1024 * 1024) / entry_size)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: vec![TtEntry::default(); capacity.max(1)],
        }
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    fn index(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    /// Cached score and bound for `hash`, if one was computed at least
    /// `required_depth` deep.
    #[inline]
    pub fn lookup(&self, hash: u64, required_depth: u16) -> Option<(i32, Bound)> {
        let entry = &self.entries[self.index(hash)];
        if entry.is_occupied() && entry.key == hash as u32 && entry.depth >= required_depth {
            Some((entry.score, entry.bound))
        } else {
            None
        }
    }

    /// Always replaces, even a deeper entry for another position.
    #[inline]
    pub fn store(&mut self, hash: u64, depth: u16, score: i32, bound: Bound) {
        let index = self.index(hash);
        self.entries[index] = TtEntry {
            key: hash as u32,
            depth,
            score,
            bound,
        };
    }

    pub fn clear(&mut self) {
        self.entries.fill(TtEntry::default());
    }

    /// Occupied slots per mille, sampled over the first thousand slots.
    pub fn hash_full(&self) -> u16 {
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample]
            .iter()
            .filter(|e| e.is_occupied())
            .count();
        (used * 1000 / sample) as u16
    }
}
