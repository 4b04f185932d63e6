use std::collections::HashSet;

use rand::Rng;

/// What a grid cell holds once revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellContent {
    Mine,
    /// Number of mines in the in-bounds 3x3 block around the cell.
    Clue(u8),
}

/// The hidden board: mine positions plus precomputed clue numbers.
#[derive(Debug, Clone)]
pub struct Grid {
    length: usize,
    width: usize,
    mines: HashSet<(usize, usize)>,
    clues: Vec<Vec<u8>>,
}

impl Grid {
    /// Builds a board with `num_mines` mines placed uniformly at random
    /// without replacement.
    pub fn random(length: usize, width: usize, num_mines: usize, rng: &mut impl Rng) -> Self {
        assert!(num_mines <= length * width, "more mines than cells");
        let mut mines: HashSet<(usize, usize)> = HashSet::with_capacity(num_mines);
        while mines.len() < num_mines {
            mines.insert((rng.gen_range(0..length), rng.gen_range(0..width)));
        }
        Self::from_mine_set(length, width, mines)
    }

    /// Builds a board with the given mine positions, for deterministic games.
    /// Duplicate positions collapse to one mine.
    pub fn with_mines(length: usize, width: usize, mines: Vec<(usize, usize)>) -> Self {
        Self::from_mine_set(length, width, mines.into_iter().collect())
    }

    fn from_mine_set(length: usize, width: usize, mines: HashSet<(usize, usize)>) -> Self {
        assert!(length > 0 && width > 0, "board must have a positive area");
        let mut clues = vec![vec![0u8; width]; length];
        for (x, row) in clues.iter_mut().enumerate() {
            for (y, clue) in row.iter_mut().enumerate() {
                *clue = neighborhood(length, width, x, y)
                    .into_iter()
                    .filter(|pos| mines.contains(pos))
                    .count() as u8;
            }
        }
        Self {
            length,
            width,
            mines,
            clues,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn num_mines(&self) -> usize {
        self.mines.len()
    }

    pub fn content(&self, x: usize, y: usize) -> CellContent {
        if self.mines.contains(&(x, y)) {
            CellContent::Mine
        } else {
            CellContent::Clue(self.clues[x][y])
        }
    }
}

/// All in-bounds positions of the 3x3 block centred on `(x, y)`, the centre
/// included. The clue encoding sums over the whole block; the centre's own
/// fixed value contributes nothing when it is safe.
pub fn neighborhood(length: usize, width: usize, x: usize, y: usize) -> Vec<(usize, usize)> {
    let mut positions = Vec::with_capacity(9);
    for nx in x.saturating_sub(1)..=(x + 1).min(length.saturating_sub(1)) {
        for ny in y.saturating_sub(1)..=(y + 1).min(width.saturating_sub(1)) {
            positions.push((nx, ny));
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn clues_count_adjacent_mines() {
        // . * .
        // . . .
        // * . .
        let grid = Grid::with_mines(3, 3, vec![(0, 1), (2, 0)]);
        assert_eq!(grid.content(0, 0), CellContent::Clue(1));
        assert_eq!(grid.content(1, 1), CellContent::Clue(2));
        assert_eq!(grid.content(2, 2), CellContent::Clue(0));
        assert_eq!(grid.content(0, 1), CellContent::Mine);
    }

    #[test]
    fn neighborhood_clips_to_board_edges() {
        let corner = neighborhood(3, 3, 0, 0);
        assert_eq!(corner, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(neighborhood(3, 3, 1, 1).len(), 9);
        assert_eq!(neighborhood(1, 1, 0, 0), vec![(0, 0)]);
    }

    #[test]
    fn random_board_places_the_requested_mines() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = Grid::random(5, 4, 6, &mut rng);
        assert_eq!(grid.num_mines(), 6);
        let mines = (0..5)
            .flat_map(|x| (0..4).map(move |y| (x, y)))
            .filter(|&(x, y)| grid.content(x, y) == CellContent::Mine)
            .count();
        assert_eq!(mines, 6);
    }

    #[test]
    fn duplicate_mine_positions_collapse() {
        let grid = Grid::with_mines(2, 2, vec![(1, 1), (1, 1)]);
        assert_eq!(grid.num_mines(), 1);
        assert_eq!(grid.content(0, 0), CellContent::Clue(1));
    }

    #[test]
    #[should_panic(expected = "positive area")]
    fn zero_area_board_is_rejected() {
        Grid::with_mines(0, 3, vec![]);
    }
}
