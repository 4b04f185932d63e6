//! AC-3 arc-consistency propagation over a working-domain map.

use std::collections::VecDeque;

use tracing::trace;

use crate::solver::{
    model::Model,
    variable::{Domain, Variable},
};

/// The per-search working copy of every variable's candidate set.
///
/// Persistent maps make the snapshot/restore discipline around a tentative
/// commit an O(1) handle clone.
pub type DomainMap = im::HashMap<Variable, Domain>;

/// Re-establishes arc consistency after the working domain of `seed` was
/// restricted.
///
/// Maintains a FIFO worklist: popping a variable `v` revises every neighbour
/// `v2`, removing values of `v2` with no positive-weight support left in
/// `v`'s current domain; an actual shrink re-enqueues `v2`. The operation
/// only ever shrinks domains; it never assigns variables or touches factors.
///
/// Returns `false` if any domain was emptied, meaning the current branch of
/// the search is infeasible and the caller should backtrack.
pub fn enforce_arc_consistency(model: &Model, domains: &mut DomainMap, seed: &Variable) -> bool {
    let mut consistent = true;
    let mut queue: VecDeque<Variable> = VecDeque::new();
    queue.push_back(seed.clone());

    while let Some(v) = queue.pop_front() {
        let v_domain = domains.get(&v).cloned().unwrap_or_default();
        for v2 in model.neighbors(&v) {
            let old = domains.get(v2).cloned().unwrap_or_default();
            let pruned: Domain = old
                .iter()
                .filter(|b| {
                    v_domain
                        .iter()
                        .any(|a| model.binary_weight(&v, a, v2, b) > 0.0)
                })
                .cloned()
                .collect();
            if pruned.len() < old.len() {
                trace!(%v2, removed = old.len() - pruned.len(), "pruned domain");
                if pruned.is_empty() {
                    consistent = false;
                }
                domains.insert(v2.clone(), pruned);
                queue.push_back(v2.clone());
            }
        }
    }
    consistent
}
