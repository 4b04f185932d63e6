use serde::Serialize;

use crate::game::grid::{CellContent, Grid};

/// What the player currently knows about a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TileView {
    Hidden,
    Mine,
    Clue(u8),
}

/// The two moves a deduction can force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Click the tile, expecting it to be safe.
    Reveal,
    /// Mark the tile as a mine.
    Flag,
}

/// The player's view of a board, with move application and scoring.
///
/// Every move on a hidden tile reveals it; the game ends once every tile has
/// been acted on. Reward schedule:
/// revealing a safe tile is worth +1, revealing a mine -20, flagging a mine
/// pays out proportionally to how early it was found, and a wrong flag
/// costs -5. Acting on an already-known tile costs -50 and wastes the move.
#[derive(Debug, Clone)]
pub struct Player {
    grid: Grid,
    view: Vec<Vec<TileView>>,
    num_moves: usize,
    score: i64,
    mines_found: usize,
    correct_reveals: usize,
    correct_flags: usize,
}

impl Player {
    pub fn new(grid: Grid) -> Self {
        let view = vec![vec![TileView::Hidden; grid.width()]; grid.length()];
        Self {
            grid,
            view,
            num_moves: 0,
            score: 0,
            mines_found: 0,
            correct_reveals: 0,
            correct_flags: 0,
        }
    }

    pub fn length(&self) -> usize {
        self.grid.length()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn num_mines(&self) -> usize {
        self.grid.num_mines()
    }

    pub fn view(&self, x: usize, y: usize) -> TileView {
        self.view[x][y]
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    /// Mines revealed so far, by click or by flag.
    pub fn mines_found(&self) -> usize {
        self.mines_found
    }

    pub fn correct_reveals(&self) -> usize {
        self.correct_reveals
    }

    pub fn correct_flags(&self) -> usize {
        self.correct_flags
    }

    pub fn remaining_hidden(&self) -> usize {
        self.grid.length() * self.grid.width() - self.num_moves
    }

    pub fn is_over(&self) -> bool {
        self.num_moves == self.grid.length() * self.grid.width()
    }

    /// Applies a move and returns its reward.
    pub fn apply(&mut self, action: Action, x: usize, y: usize) -> i64 {
        if self.view[x][y] != TileView::Hidden {
            self.score -= 50;
            return -50;
        }
        // The flag payout uses the move count before this move.
        let area = self.grid.length() * self.grid.width();
        let flag_mine_reward = (area - self.num_moves + 30) as i64;

        let content = self.grid.content(x, y);
        self.view[x][y] = match content {
            CellContent::Mine => TileView::Mine,
            CellContent::Clue(c) => TileView::Clue(c),
        };
        self.num_moves += 1;
        if content == CellContent::Mine {
            self.mines_found += 1;
        }

        let reward = match (action, content) {
            (Action::Reveal, CellContent::Mine) => -20,
            (Action::Reveal, CellContent::Clue(_)) => {
                self.correct_reveals += 1;
                1
            }
            (Action::Flag, CellContent::Mine) => {
                self.correct_flags += 1;
                flag_mine_reward
            }
            (Action::Flag, CellContent::Clue(_)) => -5,
        };
        self.score += reward;
        reward
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn single_mine_board() -> Grid {
        Grid::with_mines(2, 2, vec![(1, 1)])
    }

    #[test]
    fn rewards_follow_the_schedule() {
        let mut player = Player::new(single_mine_board());
        assert_eq!(player.apply(Action::Reveal, 0, 0), 1);
        assert_eq!(player.apply(Action::Flag, 0, 1), -5);
        // Third move on the mine: flag payout is area - moves + 30.
        assert_eq!(player.apply(Action::Flag, 1, 1), 4 - 2 + 30);
        assert_eq!(player.apply(Action::Reveal, 1, 0), 1);
        assert!(player.is_over());
        assert_eq!(player.score(), 1 - 5 + 32 + 1);
        assert_eq!(player.correct_flags(), 1);
        assert_eq!(player.correct_reveals(), 2);
    }

    #[test]
    fn acting_on_a_known_tile_is_penalized_and_wastes_no_progress() {
        let mut player = Player::new(single_mine_board());
        player.apply(Action::Reveal, 0, 0);
        assert_eq!(player.apply(Action::Reveal, 0, 0), -50);
        assert_eq!(player.num_moves(), 1);
        assert!(!player.is_over());
    }

    #[test]
    fn revealing_a_mine_updates_the_view() {
        let mut player = Player::new(single_mine_board());
        player.apply(Action::Reveal, 1, 1);
        assert_eq!(player.view(1, 1), TileView::Mine);
        assert_eq!(player.mines_found(), 1);
        assert_eq!(player.score(), -20);
    }
}
