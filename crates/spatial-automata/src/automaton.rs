//! Automaton update engine
//!
//! A ring of `cols` cells evolves over `rows` generations. Row `r` of the
//! grid holds generation `r`; each step scores row `r` against the payoff
//! table and lets every cell copy the best-scoring of its left neighbour,
//! itself and its right neighbour into row `r + 1`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::{ConfigError, Result, StepError};
use crate::payoff::PayoffTable;
use crate::random::SeededRng;
use crate::strategy::Strategy;

/// Largest grid (`rows * cols` cells) an automaton will allocate
pub const MAX_CELLS: usize = 1 << 28;

/// Lifecycle of an automaton, derived from its row cursor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No row written yet
    Uninitialized,
    /// Row 0 written
    Ready,
    /// Some generations computed, more to go
    Running,
    /// Every row written
    Complete,
}

/// Cell a position ends up copying
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Left,
    Keep,
    Right,
}

/// Imitation rule
///
/// The branch order matters: a cell only looks at its left neighbour when it
/// is strictly beaten by it, and then settles left against right without
/// comparing back to itself. `tie_break` is consulted only when
/// `mid < left == right` and returns `true` for left.
pub fn imitation_choice(
    left: f64,
    mid: f64,
    right: f64,
    tie_break: impl FnOnce() -> bool,
) -> Choice {
    if mid < left {
        if left < right {
            Choice::Right
        } else if left > right {
            Choice::Left
        } else if tie_break() {
            Choice::Left
        } else {
            Choice::Right
        }
    } else if mid < right {
        Choice::Right
    } else {
        Choice::Keep
    }
}

/// Data products of a finished (or partial) run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub rows: usize,
    pub cols: usize,
    /// Strategy bits, one vector per generation
    pub grid: Vec<Vec<u8>>,
    /// Payoffs per generation; rows not yet scored are zero
    pub payoffs: Vec<Vec<f64>>,
    /// Number of cells playing strategy 1 in each generation
    pub defectors: Vec<usize>,
}

/// One-dimensional spatial game automaton
#[derive(Clone, Debug)]
pub struct SpatialAutomaton {
    table: PayoffTable,
    rows: usize,
    cols: usize,
    grid: Vec<Strategy>,
    payoffs: Vec<f64>,
    next: usize,
    rng: SeededRng,
}

impl SpatialAutomaton {
    /// Ring size used when none is given: wide enough that a single seed in
    /// the centre never meets itself around the ring within `rows` steps.
    /// `None` when that width does not fit in a `usize`.
    pub fn default_cols(rows: usize) -> Option<usize> {
        rows.checked_mul(2)?.checked_add(1)
    }

    /// Allocate an automaton with an entropy-seeded tie-break source
    pub fn new(table: PayoffTable, rows: usize, cols: Option<usize>) -> Result<Self, ConfigError> {
        Self::with_rng(table, rows, cols, SeededRng::from_entropy())
    }

    /// Allocate an automaton whose random draws replay from `seed`
    pub fn with_seed(
        table: PayoffTable,
        rows: usize,
        cols: Option<usize>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(table, rows, cols, SeededRng::from_seed(seed))
    }

    pub fn with_rng(
        table: PayoffTable,
        rows: usize,
        cols: Option<usize>,
        rng: SeededRng,
    ) -> Result<Self, ConfigError> {
        if rows < 1 {
            return Err(ConfigError::InvalidRows { rows });
        }
        let cols = match cols.or_else(|| Self::default_cols(rows)) {
            Some(cols) => cols,
            None => return Err(ConfigError::TooLarge { rows, cols: None }),
        };
        if cols < 3 {
            return Err(ConfigError::InvalidCols { cols });
        }
        let cells = match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_CELLS => cells,
            _ => return Err(ConfigError::TooLarge { rows, cols: Some(cols) }),
        };

        debug!(rows, cols, "allocating spatial automaton");
        Ok(Self {
            table,
            rows,
            cols,
            grid: vec![Strategy::Cooperate; cells],
            payoffs: vec![0.0; cells],
            next: 0,
            rng,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Index of the next row to be written
    pub fn next_row(&self) -> usize {
        self.next
    }

    pub fn phase(&self) -> Phase {
        if self.next == 0 {
            Phase::Uninitialized
        } else if self.next == self.rows {
            Phase::Complete
        } else if self.next == 1 {
            Phase::Ready
        } else {
            Phase::Running
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }

    fn ensure_uninitialized(&self) -> Result<(), StepError> {
        if self.next != 0 {
            return Err(StepError::AlreadyInitialized { next: self.next });
        }
        Ok(())
    }

    /// Single strategy-1 cell in the middle of an all-0 ring
    pub fn init_single(&mut self) -> Result<(), StepError> {
        self.ensure_uninitialized()?;
        let center = self.cols / 2;
        self.grid[center] = Strategy::Defect;
        self.next = 1;
        debug!(center, "initialised single seed");
        Ok(())
    }

    /// Independent fair coin per cell of row 0
    pub fn init_random(&mut self) -> Result<(), StepError> {
        self.ensure_uninitialized()?;
        for cell in &mut self.grid[..self.cols] {
            *cell = Strategy::from_bit(self.rng.coin_flip());
        }
        self.next = 1;
        debug!(defectors = self.count_defectors(0), "initialised random row");
        Ok(())
    }

    /// Caller-supplied row 0
    pub fn init_with(&mut self, row: &[Strategy]) -> Result<()> {
        self.ensure_uninitialized()?;
        if row.len() != self.cols {
            return Err(ConfigError::RowLength { expected: self.cols, got: row.len() }.into());
        }
        self.grid[..self.cols].copy_from_slice(row);
        self.next = 1;
        debug!(defectors = self.count_defectors(0), "initialised explicit row");
        Ok(())
    }

    /// Score row `next - 1`, then derive row `next` from it
    pub fn step(&mut self) -> Result<(), StepError> {
        match self.phase() {
            Phase::Uninitialized => return Err(StepError::NotInitialized),
            Phase::Complete => return Err(StepError::Complete { rows: self.rows }),
            Phase::Ready | Phase::Running => {}
        }

        let cols = self.cols;
        let row = self.next - 1;
        let base = row * cols;
        let left_of = |c: usize| (c + cols - 1) % cols;
        let right_of = |c: usize| (c + 1) % cols;

        for c in 0..cols {
            let left = self.grid[base + left_of(c)];
            let mid = self.grid[base + c];
            let right = self.grid[base + right_of(c)];
            self.payoffs[base + c] = self.table.get(left, mid, right);
        }

        let mut ties = 0usize;
        for c in 0..cols {
            let (l, r) = (left_of(c), right_of(c));
            let choice = imitation_choice(
                self.payoffs[base + l],
                self.payoffs[base + c],
                self.payoffs[base + r],
                || {
                    ties += 1;
                    self.rng.coin_flip()
                },
            );
            let source = match choice {
                Choice::Left => l,
                Choice::Keep => c,
                Choice::Right => r,
            };
            self.grid[base + cols + c] = self.grid[base + source];
        }

        self.next += 1;
        trace!(row = self.next - 1, ties, "stepped generation");
        Ok(())
    }

    /// Step until every row is filled
    ///
    /// From `Ready` this is exactly `rows - 1` steps. The payoffs of the last
    /// generation are never scored and stay zero. Returns the number of
    /// steps taken.
    pub fn run(&mut self) -> Result<usize, StepError> {
        match self.phase() {
            Phase::Uninitialized => return Err(StepError::NotInitialized),
            Phase::Complete => return Err(StepError::Complete { rows: self.rows }),
            Phase::Ready | Phase::Running => {}
        }

        let mut steps = 0;
        while self.next < self.rows {
            self.step()?;
            steps += 1;
        }
        info!(
            rows = self.rows,
            cols = self.cols,
            defectors = self.count_defectors(self.rows - 1),
            "automaton complete"
        );
        Ok(steps)
    }

    pub fn strategy(&self, row: usize, col: usize) -> Strategy {
        self.grid[row * self.cols + col]
    }

    pub fn payoff(&self, row: usize, col: usize) -> f64 {
        self.payoffs[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[Strategy] {
        &self.grid[row * self.cols..(row + 1) * self.cols]
    }

    pub fn payoff_row(&self, row: usize) -> &[f64] {
        &self.payoffs[row * self.cols..(row + 1) * self.cols]
    }

    pub fn count_defectors(&self, row: usize) -> usize {
        self.row(row).iter().filter(|s| **s == Strategy::Defect).count()
    }

    /// Strategy grid as a `rows x cols` matrix of 0/1
    pub fn grid_bits(&self) -> Vec<Vec<u8>> {
        self.grid
            .chunks_exact(self.cols)
            .map(|row| row.iter().map(|s| s.bit()).collect())
            .collect()
    }

    pub fn payoff_grid(&self) -> Vec<Vec<f64>> {
        self.payoffs.chunks_exact(self.cols).map(<[f64]>::to_vec).collect()
    }

    pub fn to_result(&self) -> SimulationResult {
        SimulationResult {
            rows: self.rows,
            cols: self.cols,
            grid: self.grid_bits(),
            payoffs: self.payoff_grid(),
            defectors: (0..self.rows).map(|r| self.count_defectors(r)).collect(),
        }
    }
}

impl fmt::Display for SpatialAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.chunks_exact(self.cols) {
            for cell in row {
                write!(f, "{}", cell.bit())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
