//! Backtracking search over a weighted constraint model.
//!
//! The engine enumerates every fully consistent assignment, multiplying the
//! partial-assignment weight by each step's factor contribution, and tallies
//! per `(variable, value)` pair how many solutions commit to that value. The
//! tally is what downstream deduction ranks its moves by.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::solver::{
    model::Model,
    propagate::{enforce_arc_consistency, DomainMap},
    variable::{Value, Variable, Weight},
};

/// A complete mapping from variable to committed value.
pub type Assignment = HashMap<Variable, Value>;

/// Diagnostic counters for one solve invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    /// Number of `backtrack` calls, successful or not.
    pub operations: u64,
    /// Value of `operations` when the first full assignment was recorded.
    pub first_solution_operations: u64,
    /// Candidate values exhausted without completing the search below them.
    pub backtracks: u64,
    /// Full consistent assignments found.
    pub num_assignments: u64,
    /// Assignments tied for the highest weight seen.
    pub num_optimal: u64,
    pub optimal_weight: Weight,
}

impl SearchStats {
    /// Folds another invocation's counters into a running total, for callers
    /// that solve repeatedly and report one cumulative set of diagnostics.
    pub fn absorb(&mut self, other: &SearchStats) {
        self.operations += other.operations;
        self.backtracks += other.backtracks;
        self.num_assignments += other.num_assignments;
        self.num_optimal += other.num_optimal;
        if self.first_solution_operations == 0 {
            self.first_solution_operations = other.first_solution_operations;
        }
        self.optimal_weight = self.optimal_weight.max(other.optimal_weight);
    }
}

/// Everything one solve invocation produces.
///
/// An empty tally means the model has no full assignment; that is an expected
/// outcome, not an error, and callers fall back to an uninformed policy.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Every fully consistent assignment, in discovery order.
    pub assignments: Vec<Assignment>,
    /// Occurrence count per `(variable, value)` across all assignments.
    pub tally: HashMap<(Variable, Value), u64>,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn is_satisfiable(&self) -> bool {
        self.stats.num_assignments > 0
    }

    pub fn tally_for(&self, var: &Variable, val: &Value) -> u64 {
        self.tally
            .get(&(var.clone(), *val))
            .copied()
            .unwrap_or(0)
    }
}

/// Depth-first backtracking search with optional most-constrained-variable
/// ordering and optional AC-3 look-ahead.
#[derive(Debug, Clone, Copy)]
pub struct BacktrackingSearch {
    pub use_mcv: bool,
    pub use_ac3: bool,
}

impl BacktrackingSearch {
    pub fn new(use_mcv: bool, use_ac3: bool) -> Self {
        Self { use_mcv, use_ac3 }
    }

    /// Enumerates every fully consistent assignment of `model`.
    ///
    /// All per-invocation state is reset at entry; the model's registered
    /// domains are copied into a working-domain map owned exclusively by this
    /// invocation.
    pub fn solve(&self, model: &Model) -> SearchOutcome {
        let mut ctx = SearchContext {
            model,
            use_mcv: self.use_mcv,
            use_ac3: self.use_ac3,
            domains: model.domains().clone(),
            outcome: SearchOutcome::default(),
        };
        let mut assignment = Assignment::new();
        ctx.backtrack(&mut assignment, 0, 1.0);
        debug!(
            assignments = ctx.outcome.stats.num_assignments,
            operations = ctx.outcome.stats.operations,
            "search finished"
        );
        ctx.outcome
    }
}

struct SearchContext<'a> {
    model: &'a Model,
    use_mcv: bool,
    use_ac3: bool,
    domains: DomainMap,
    outcome: SearchOutcome,
}

impl SearchContext<'_> {
    fn backtrack(&mut self, assignment: &mut Assignment, num_assigned: usize, weight: Weight) {
        self.outcome.stats.operations += 1;

        if num_assigned == self.model.num_variables() {
            self.record(assignment, weight);
            return;
        }

        let Some(var) = self.select_unassigned(assignment) else {
            return;
        };
        let values = self.domains.get(&var).cloned().unwrap_or_default();

        for val in &values {
            let delta = self.delta_weight(assignment, &var, val);
            if delta == 0.0 {
                continue;
            }
            assignment.insert(var.clone(), *val);
            if self.use_ac3 {
                // Snapshot before the look-ahead mutates the working domains;
                // the persistent map makes this a cheap handle copy.
                let snapshot = self.domains.clone();
                self.domains.insert(var.clone(), im::vector![*val]);
                if enforce_arc_consistency(self.model, &mut self.domains, &var) {
                    self.backtrack(assignment, num_assigned + 1, weight * delta);
                }
                self.domains = snapshot;
            } else {
                self.backtrack(assignment, num_assigned + 1, weight * delta);
            }
            assignment.remove(&var);
            self.outcome.stats.backtracks += 1;
        }
    }

    fn record(&mut self, assignment: &Assignment, weight: Weight) {
        let stats = &mut self.outcome.stats;
        stats.num_assignments += 1;
        for var in self.model.variables() {
            let val = assignment[var];
            *self.outcome.tally.entry((var.clone(), val)).or_insert(0) += 1;
        }
        self.outcome.assignments.push(assignment.clone());

        let stats = &mut self.outcome.stats;
        if stats.num_assignments == 1 || weight >= stats.optimal_weight {
            if stats.num_assignments > 1 && weight == stats.optimal_weight {
                stats.num_optimal += 1;
            } else {
                stats.num_optimal = 1;
            }
            stats.optimal_weight = weight;
        }
        if stats.first_solution_operations == 0 {
            stats.first_solution_operations = stats.operations;
        }
    }

    /// Registration order, or with MCV the unassigned variable with the
    /// fewest values of non-zero delta weight, ties to earliest registration.
    fn select_unassigned(&self, assignment: &Assignment) -> Option<Variable> {
        if !self.use_mcv {
            return self
                .model
                .variables()
                .iter()
                .find(|v| !assignment.contains_key(v))
                .cloned();
        }

        let mut best: Option<(usize, &Variable)> = None;
        for var in self.model.variables() {
            if assignment.contains_key(var) {
                continue;
            }
            let viable = self
                .domains
                .get(var)
                .map(|domain| {
                    domain
                        .iter()
                        .filter(|val| self.delta_weight(assignment, var, val) > 0.0)
                        .count()
                })
                .unwrap_or(0);
            match best {
                Some((fewest, _)) if viable >= fewest => {}
                _ => best = Some((viable, var)),
            }
        }
        best.map(|(_, var)| var.clone())
    }

    /// The multiplier contributed by committing `var = val`: the unary weight
    /// times the binary weight against every already-assigned neighbour,
    /// short-circuiting on the first zero.
    fn delta_weight(&self, assignment: &Assignment, var: &Variable, val: &Value) -> Weight {
        let mut w = self.model.unary_weight(var, val);
        if w == 0.0 {
            return 0.0;
        }
        for neighbor in self.model.neighbors(var) {
            let Some(committed) = assignment.get(neighbor) else {
                continue;
            };
            w *= self.model.binary_weight(var, val, neighbor, committed);
            if w == 0.0 {
                return 0.0;
            }
        }
        w
    }
}
