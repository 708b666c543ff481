use serde::{Deserialize, Serialize};

use crate::Coord2;

/// What a grid position holds, fixed at board generation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Number(u8),
    Mine,
}

impl CellKind {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Adjacent-mine count carried by `Number` cells, zero otherwise.
    pub const fn adjacent_mines(self) -> u8 {
        match self {
            Self::Number(count) => count,
            Self::Empty | Self::Mine => 0,
        }
    }
}

/// One board position together with its player-visible markers.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: Coord2,
    kind: CellKind,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub(crate) const fn new(position: Coord2, kind: CellKind) -> Self {
        Self {
            position,
            kind,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn position(&self) -> Coord2 {
        self.position
    }

    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    pub const fn is_mine(&self) -> bool {
        self.kind.is_mine()
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Marks the cell revealed and drops any flag. There is no inverse:
    /// cells never return to hidden within a game.
    pub(crate) fn mark_revealed(&mut self) {
        self.revealed = true;
        self.flagged = false;
    }

    pub(crate) fn toggle_flag(&mut self) {
        self.flagged = !self.flagged;
    }
}
