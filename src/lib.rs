//! Minefield is a weighted constraint-satisfaction solver applied to
//! minesweeper-style grid deduction.
//!
//! The engine is problem-agnostic at its core: a [`Model`] of variables,
//! domains, and unary/binary weight tables; an AC-3 propagator; and a
//! backtracking search that enumerates every consistent assignment while
//! tallying how often each `(variable, value)` pair occurs. N-ary sum
//! constraints ("these cells contain exactly K hazards") are lowered to
//! chains of binary factors by the encoder in [`solver::sum`], which is what
//! lets standard arc consistency enforce them.
//!
//! The [`game`] module is the consumer: it builds a model incrementally from
//! revealed tiles and turns the solver's tally into forced moves.
//!
//! # Example: exactly one of three cells is hazardous
//!
//! ```
//! use minefield::solver::model::Model;
//! use minefield::solver::search::BacktrackingSearch;
//! use minefield::solver::sum::add_sum_variable;
//! use minefield::solver::variable::{Value, Variable};
//!
//! let mut model = Model::new();
//! let cells: Vec<Variable> = (0..3).map(|y| Variable::cell(0, y)).collect();
//! for cell in &cells {
//!     model
//!         .add_variable(cell.clone(), [Value::Int(0), Value::Int(1)])
//!         .unwrap();
//! }
//! let total = add_sum_variable(&mut model, "clue", &cells, 3).unwrap();
//! model
//!     .add_unary_predicate(&total, |v| *v == Value::Int(1))
//!     .unwrap();
//!
//! let outcome = BacktrackingSearch::new(false, true).solve(&model);
//! assert_eq!(outcome.stats.num_assignments, 3);
//! // Each cell is hazardous in exactly one of the three solutions.
//! assert_eq!(outcome.tally_for(&cells[0], &Value::Int(1)), 1);
//! assert_eq!(outcome.tally_for(&cells[0], &Value::Int(0)), 2);
//! ```
//!
//! [`Model`]: solver::model::Model

pub mod error;
pub mod game;
pub mod solver;
