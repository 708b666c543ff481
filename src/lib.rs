#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod types;

/// Board parameters supplied at new-game time, validated on construction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Result<Self> {
        if size_x == 0 || size_y == 0 || mines >= mult(size_x, size_y) {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(Self::new_unchecked((size_x, size_y), mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    /// Whether this outcome requires a redraw of the board.
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome requires a redraw of the board.
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Result of a single reveal call: the outcome plus every cell whose
/// `revealed` flag flipped, in uncover order. Renderers redraw from this
/// batch rather than per cell.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub cells: Vec<Coord2>,
}

impl RevealReport {
    pub(crate) const fn unchanged() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            cells: Vec::new(),
        }
    }

    pub fn has_update(&self) -> bool {
        self.outcome.has_update()
    }
}
