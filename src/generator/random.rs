use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Places a uniformly random subset of cells as mines, reproducible from
/// the seed. Each draw indexes into the still-free cells, so placement
/// terminates after exactly `config.mines` draws even on dense boards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Minefield {
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let mut free_cells = config.total_cells();
        let mut mines_placed: CellCount = 0;

        {
            let cells = mine_mask.as_slice_mut().expect("layout should be standard");
            while mines_placed < config.mines {
                let mut place = rng.random_range(0..free_cells);
                for cell in cells.iter_mut() {
                    if *cell {
                        continue;
                    }
                    if place == 0 {
                        *cell = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                    place -= 1;
                }
            }
        }

        log::debug!(
            "placed {} mines on a {:?} board from seed {}",
            mines_placed,
            config.size,
            self.seed
        );

        Minefield::from_mine_mask(&mine_mask)
    }
}
