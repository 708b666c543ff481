use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions: Ready -> Active on the first reveal, and any
/// non-final state -> Won | Lost. Won and Lost are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    Ready,
    Active,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Owns the grid of cells for one game session and applies the reveal and
/// flag rules to it. Starting a new game means replacing the whole value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    grid: Array2<Cell>,
    mine_count: CellCount,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Minefield {
    /// Builds a board from an explicit mine mask, deriving every cell's
    /// kind from its surrounding mines.
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();

        let grid = Array2::from_shape_fn(mine_mask.raw_dim(), |(x, y)| {
            let position = (x.try_into().unwrap(), y.try_into().unwrap());
            Cell::new(position, Self::kind_at(mine_mask, position))
        });

        Self {
            grid,
            mine_count,
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        }
    }

    /// Fixture constructor with mines at exactly the given coordinates.
    pub fn with_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    fn kind_at(mine_mask: &Array2<bool>, position: Coord2) -> CellKind {
        if mine_mask[position.to_nd_index()] {
            return CellKind::Mine;
        }

        let count: u8 = mine_mask
            .iter_adjacent(position)
            .filter(|&pos| mine_mask[pos.to_nd_index()])
            .count()
            .try_into()
            .unwrap();

        match count {
            0 => CellKind::Empty,
            count => CellKind::Number(count),
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.grid.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn total_cells(&self) -> CellCount {
        self.grid.len().try_into().unwrap()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    /// How many mines are not flagged yet, negative with excess flags.
    pub fn mines_left(&self) -> isize {
        (self.mine_count as isize) - (self.flagged_count.0 as isize)
    }

    /// The mine that ended the game, if it ended by revealing one.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid[coords.to_nd_index()]
    }

    /// Full board snapshot for renderers.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> {
        self.grid
            .indexed_iter()
            .map(|((x, y), &cell)| ((x.try_into().unwrap(), y.try_into().unwrap()), cell))
    }

    /// First guard of every operation: both axes within the board.
    pub fn in_bounds(&self, (x, y): Coord2) -> bool {
        let (size_x, size_y) = self.size();
        x < size_x && y < size_y
    }

    /// Reveals the cell at `coords`, flood-filling through empty regions.
    /// Out-of-bounds, flagged, already-revealed, and post-game calls leave
    /// the board untouched.
    pub fn reveal(&mut self, coords: Coord2) -> RevealReport {
        use CellKind::*;

        if !self.in_bounds(coords) || self.state.is_finished() {
            return RevealReport::unchanged();
        }

        let cell = self.cell_at(coords);
        if cell.is_revealed() || cell.is_flagged() {
            return RevealReport::unchanged();
        }

        match cell.kind() {
            Mine => {
                self.reveal_cell(coords);
                self.triggered_mine = Some(coords);
                self.end_game(false);
                RevealReport {
                    outcome: RevealOutcome::HitMine,
                    cells: Vec::from([coords]),
                }
            }
            Number(_) => {
                self.reveal_cell(coords);
                RevealReport {
                    outcome: self.after_safe_reveal(),
                    cells: Vec::from([coords]),
                }
            }
            Empty => {
                let cells = self.flood_reveal(coords);
                log::debug!("flood from {:?} revealed {} cells", coords, cells.len());
                RevealReport {
                    outcome: self.after_safe_reveal(),
                    cells,
                }
            }
        }
    }

    /// Toggles the flag marker on a hidden cell. Revealed cells,
    /// out-of-bounds coordinates, and finished games are left untouched.
    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        use FlagOutcome::*;

        if !self.in_bounds(coords) || self.state.is_finished() {
            return NoChange;
        }

        let cell = &mut self.grid[coords.to_nd_index()];
        if cell.is_revealed() {
            return NoChange;
        }

        cell.toggle_flag();
        if cell.is_flagged() {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        Changed
    }

    /// Work-list traversal over 4-connected neighbors. The `revealed` flag
    /// is the visited marker, so no cell is processed twice.
    fn flood_reveal(&mut self, start: Coord2) -> Vec<Coord2> {
        let mut revealed = Vec::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let cell = self.cell_at(coords);
            if cell.is_revealed() || cell.is_mine() {
                continue;
            }

            self.reveal_cell(coords);
            revealed.push(coords);

            // numbered cells border the region and stop the fill
            if matches!(cell.kind(), CellKind::Empty) {
                to_visit.extend(self.grid.iter_orthogonal(coords));
            }
        }

        revealed
    }

    fn reveal_cell(&mut self, coords: Coord2) {
        if self.grid[coords.to_nd_index()].is_flagged() {
            self.flagged_count -= 1;
        }
        self.grid[coords.to_nd_index()].mark_revealed();
        self.revealed_count += 1;
    }

    fn after_safe_reveal(&mut self) -> RevealOutcome {
        if self.revealed_count == Saturating(self.safe_cell_count()) {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            self.mark_started();
            RevealOutcome::Revealed
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, GameState::Ready) {
            self.state = GameState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won { GameState::Won } else { GameState::Lost };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;

    fn board(size: Coord2, mines: &[Coord2]) -> Minefield {
        Minefield::with_mines(size, mines).unwrap()
    }

    #[test]
    fn cells_know_their_position_and_kind() {
        let field = board((4, 3), &[(1, 2)]);

        assert!(field.iter().all(|(coords, cell)| cell.position() == coords));
        assert_eq!(field.game_config(), GameConfig::new_unchecked((4, 3), 1));
        assert!(field.cell_at((1, 2)).is_mine());
        assert_eq!(field.cell_at((3, 0)).kind(), CellKind::Empty);
    }

    #[test]
    fn fixture_rejects_mines_outside_the_board() {
        assert_eq!(
            Minefield::with_mines((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn single_empty_cell_board_wins_on_first_reveal() {
        let mut field = board((1, 1), &[]);

        let report = field.reveal((0, 0));

        assert_eq!(report.outcome, RevealOutcome::Won);
        let cell = field.cell_at((0, 0));
        assert_eq!(cell.kind(), CellKind::Empty);
        assert!(cell.is_revealed());
    }

    #[test]
    fn reveal_stops_at_the_numbered_border() {
        let mut field = board((3, 3), &[(1, 1)]);

        let report = field.reveal((0, 0));

        assert_eq!(report.outcome, RevealOutcome::Revealed);
        assert_eq!(report.cells, [(0, 0)]);
        assert_eq!(field.cell_at((0, 0)).kind(), CellKind::Number(1));
        assert_eq!(field.cell_at((0, 0)).kind().adjacent_mines(), 1);
        assert!(!field.cell_at((0, 1)).is_revealed());
        assert!(!field.cell_at((1, 0)).is_revealed());

        // a second click on the same cell changes nothing
        assert_eq!(field.reveal((0, 0)).outcome, RevealOutcome::NoChange);
    }

    #[test]
    fn flood_fill_does_not_cross_diagonal_gaps() {
        // the empty region around (1, 1) touches the lower-right empty
        // region only diagonally through (2, 2)
        let mut field = board((4, 4), &[(3, 0), (0, 3)]);

        let report = field.reveal((1, 1));

        assert_eq!(report.outcome, RevealOutcome::Revealed);
        assert_eq!(report.cells.len(), 8);
        assert!(field.cell_at((0, 0)).is_revealed());
        assert_eq!(field.cell_at((2, 2)).kind(), CellKind::Empty);
        assert!(!field.cell_at((2, 2)).is_revealed());
    }

    #[test]
    fn flood_fill_skips_mines_and_never_revisits() {
        let mut field = board((8, 8), &[(4, 4), (6, 1), (0, 7)]);

        let report = field.reveal((0, 0));

        assert!(report.outcome.has_update());
        assert!(
            report
                .cells
                .iter()
                .all(|&coords| !field.cell_at(coords).is_mine())
        );
        let unique: BTreeSet<_> = report.cells.iter().copied().collect();
        assert_eq!(unique.len(), report.cells.len());
        assert!(report.cells.len() <= field.total_cells() as usize);
    }

    #[test]
    fn flood_fill_reveals_flagged_cells_in_its_path() {
        let mut field = board((2, 2), &[]);
        field.toggle_flag((0, 1));
        assert_eq!(field.mines_left(), -1);

        let report = field.reveal((0, 0));

        assert_eq!(report.outcome, RevealOutcome::Won);
        assert_eq!(report.cells.len(), 4);
        assert!(!field.cell_at((0, 1)).is_flagged());
        assert!(field.cell_at((0, 1)).is_revealed());
        assert_eq!(field.mines_left(), 0);
    }

    #[test]
    fn reveal_on_a_flagged_cell_is_a_noop() {
        let mut field = board((2, 2), &[(1, 1)]);

        assert_eq!(field.toggle_flag((0, 0)), FlagOutcome::Changed);
        let report = field.reveal((0, 0));

        assert_eq!(report.outcome, RevealOutcome::NoChange);
        assert!(!report.has_update());
        assert!(report.cells.is_empty());
        assert!(!field.cell_at((0, 0)).is_revealed());
        assert!(field.cell_at((0, 0)).is_flagged());
    }

    #[test]
    fn flag_toggle_restores_the_original_state() {
        let mut field = board((3, 3), &[(2, 2)]);
        assert_eq!(field.mines_left(), 1);

        assert_eq!(field.toggle_flag((0, 0)), FlagOutcome::Changed);
        assert!(field.cell_at((0, 0)).is_flagged());
        assert_eq!(field.mines_left(), 0);
        assert!(field.state().is_ready());

        assert_eq!(field.toggle_flag((0, 0)), FlagOutcome::Changed);
        assert!(!field.cell_at((0, 0)).is_flagged());
        assert_eq!(field.mines_left(), 1);
    }

    #[test]
    fn flag_on_a_revealed_cell_is_a_noop() {
        let mut field = board((3, 3), &[(1, 1)]);

        field.reveal((0, 0));

        assert_eq!(field.toggle_flag((0, 0)), FlagOutcome::NoChange);
        assert!(!field.cell_at((0, 0)).is_flagged());
    }

    #[test]
    fn out_of_bounds_operations_leave_the_board_unchanged() {
        let mut field = board((3, 2), &[(1, 1)]);
        let before = field.clone();

        for coords in [(3, 0), (0, 2), (3, 2), (Coord::MAX, Coord::MAX)] {
            assert!(!field.in_bounds(coords));
            assert_eq!(field.reveal(coords).outcome, RevealOutcome::NoChange);
            assert_eq!(field.toggle_flag(coords), FlagOutcome::NoChange);
        }

        assert_eq!(field, before);
    }

    #[test]
    fn revealing_a_mine_loses_and_freezes_the_board() {
        let mut field = board((2, 2), &[(0, 0)]);

        let report = field.reveal((0, 0));

        assert_eq!(report.outcome, RevealOutcome::HitMine);
        assert_eq!(report.cells, [(0, 0)]);
        assert_eq!(field.state(), GameState::Lost);
        assert!(field.is_finished());
        assert_eq!(field.triggered_mine(), Some((0, 0)));
        assert!(field.cell_at((0, 0)).is_revealed());

        assert_eq!(field.reveal((1, 1)).outcome, RevealOutcome::NoChange);
        assert_eq!(field.toggle_flag((1, 0)), FlagOutcome::NoChange);
    }

    #[test]
    fn revealing_every_safe_cell_wins() {
        let mut field = board((2, 1), &[(0, 0)]);

        let report = field.reveal((1, 0));

        assert_eq!(report.outcome, RevealOutcome::Won);
        assert_eq!(field.state(), GameState::Won);
        assert_eq!(field.triggered_mine(), None);
        assert_eq!(field.cell_at((1, 0)).kind(), CellKind::Number(1));
    }

    #[test]
    fn game_state_survives_serialization() {
        let mut field = board((3, 3), &[(2, 2)]);
        field.toggle_flag((2, 2));
        field.reveal((0, 0));

        let json = serde_json::to_string(&field).unwrap();
        let restored: Minefield = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, field);
    }
}
