//! The deduction driver: plays a game by incrementally building a constraint
//! model from revealed tiles and turning the solver's tally into moves.

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::Result,
    game::{
        grid::{neighborhood, Grid},
        player::{Action, Player, TileView},
    },
    solver::{
        model::Model,
        search::{BacktrackingSearch, SearchOutcome, SearchStats},
        sum::add_sum_variable,
        variable::{Value, Variable},
    },
};

/// Per-game result, serializable for the simulator's JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub score: i64,
    pub moves: usize,
    pub correct_reveals: usize,
    pub correct_flags: usize,
    pub solver_invocations: u64,
    /// Cumulative counters over every solver invocation of the game.
    pub search: SearchStats,
}

/// Plays one game to completion by constraint deduction.
///
/// After every move the acted tile's value is fixed with a unary factor, its
/// unseen neighbours are registered with domain `{0, 1}`, and a revealed clue
/// is encoded as a sum constraint over the whole in-bounds 3x3 block. The
/// solver is re-invoked only when the queue of pending deductions runs dry;
/// an empty tally falls back to an unbiased random pick weighted by the
/// estimated remaining hazard density.
pub struct CspPlayer {
    player: Player,
    rng: ChaCha8Rng,
    search: BacktrackingSearch,
}

impl CspPlayer {
    /// MCV off, AC-3 on by default: the deduction models are shallow but
    /// wide, and look-ahead pruning dominates.
    pub fn new(grid: Grid, seed: u64) -> Self {
        Self::with_search(grid, seed, BacktrackingSearch::new(false, true))
    }

    pub fn with_search(grid: Grid, seed: u64, search: BacktrackingSearch) -> Self {
        Self {
            player: Player::new(grid),
            rng: ChaCha8Rng::seed_from_u64(seed),
            search,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn run(&mut self) -> Result<GameSummary> {
        let length = self.player.length();
        let width = self.player.width();
        let area = length * width;
        let num_mines = self.player.num_mines();

        let mut model = Model::new();
        let mut registered: HashSet<(usize, usize)> = HashSet::new();
        let mut queue: VecDeque<((usize, usize), i64)> = VecDeque::new();
        let mut queued: HashSet<(usize, usize)> = HashSet::new();
        let mut total_added = false;
        let mut solver_invocations = 0u64;
        let mut search_stats = SearchStats::default();

        // The first move is always (0, 0), flagged with probability equal to
        // the board's mine density.
        let hazard_density = num_mines as f64 / area as f64;
        let first = if self.rng.gen::<f64>() < hazard_density {
            Action::Flag
        } else {
            Action::Reveal
        };
        let mut target = (0, 0);
        self.player.apply(first, target.0, target.1);

        while !self.player.is_over() {
            let (x, y) = target;
            let revealed = self.player.view(x, y);
            debug!(x, y, ?revealed, "processing move");

            let hood = neighborhood(length, width, x, y);
            for &(nx, ny) in &hood {
                if registered.insert((nx, ny)) {
                    model.add_variable(Variable::cell(nx, ny), [Value::Int(0), Value::Int(1)])?;
                }
            }

            let cell = Variable::cell(x, y);
            match revealed {
                TileView::Mine => {
                    model.add_unary_predicate(&cell, |v| *v == Value::Int(1))?;
                }
                TileView::Clue(clue) => {
                    model.add_unary_predicate(&cell, |v| *v == Value::Int(0))?;
                    let terms: Vec<Variable> =
                        hood.iter().map(|&(nx, ny)| Variable::cell(nx, ny)).collect();
                    let total =
                        add_sum_variable(&mut model, format!("clue({x},{y})"), &terms, clue as i64)?;
                    model.add_unary_predicate(&total, move |v| *v == Value::Int(clue as i64))?;
                }
                TileView::Hidden => unreachable!("acted tile is always revealed"),
            }

            if registered.len() == area && !total_added {
                let terms: Vec<Variable> = (0..length)
                    .flat_map(|cx| (0..width).map(move |cy| Variable::cell(cx, cy)))
                    .collect();
                let total = add_sum_variable(&mut model, "total", &terms, num_mines as i64)?;
                model.add_unary_predicate(&total, move |v| *v == Value::Int(num_mines as i64))?;
                total_added = true;
            }

            if queue.is_empty() {
                let outcome = self.search.solve(&model);
                solver_invocations += 1;
                search_stats.absorb(&outcome.stats);
                for (pos, val) in self.most_occurred(&outcome) {
                    if queued.insert(pos) {
                        queue.push_back((pos, val));
                    }
                }
            }

            let (pos, deduced) = match queue.pop_front() {
                Some(entry) => {
                    queued.remove(&entry.0);
                    entry
                }
                None => self.random_fallback(),
            };
            let action = if deduced == 1 {
                Action::Flag
            } else {
                Action::Reveal
            };
            target = pos;
            self.player.apply(action, pos.0, pos.1);
        }

        let summary = GameSummary {
            score: self.player.score(),
            moves: self.player.num_moves(),
            correct_reveals: self.player.correct_reveals(),
            correct_flags: self.player.correct_flags(),
            solver_invocations,
            search: search_stats,
        };
        info!(
            score = summary.score,
            invocations = summary.solver_invocations,
            "game over"
        );
        Ok(summary)
    }

    /// The `(position, value)` pairs with the maximum tally count, restricted
    /// to grid cells the player still sees as hidden.
    fn most_occurred(&self, outcome: &SearchOutcome) -> Vec<((usize, usize), i64)> {
        let candidates: Vec<((usize, usize), i64, u64)> = outcome
            .tally
            .iter()
            .filter_map(|((var, val), count)| {
                let (x, y) = var.as_cell()?;
                if self.player.view(x, y) != TileView::Hidden {
                    return None;
                }
                Some(((x, y), val.as_int()?, *count))
            })
            .collect();
        let Some(max) = candidates.iter().map(|&(_, _, count)| count).max() else {
            return Vec::new();
        };
        let mut best: Vec<((usize, usize), i64)> = candidates
            .into_iter()
            .filter(|&(_, _, count)| count == max)
            .map(|(pos, val, _)| (pos, val))
            .collect();
        // Tally iteration order is not stable; sort so the drain order is.
        best.sort();
        best
    }

    /// Uninformed choice: a uniformly random hidden tile, flagged with
    /// probability equal to the estimated remaining hazard density.
    fn random_fallback(&mut self) -> ((usize, usize), i64) {
        let hidden: Vec<(usize, usize)> = (0..self.player.length())
            .flat_map(|x| (0..self.player.width()).map(move |y| (x, y)))
            .filter(|&(x, y)| self.player.view(x, y) == TileView::Hidden)
            .collect();
        let &pos = hidden
            .choose(&mut self.rng)
            .expect("fallback only runs while tiles remain hidden");

        let remaining_mines = self.player.num_mines() - self.player.mines_found();
        let remaining_hidden = self.player.remaining_hidden();
        let hazard = remaining_mines as f64 / (remaining_mines + remaining_hidden) as f64;
        let value = i64::from(self.rng.gen::<f64>() < hazard);
        debug!(?pos, value, "no deduction available, choosing at random");
        (pos, value)
    }
}
