//! Encodes an n-ary sum constraint as a chain of binary factors.
//!
//! The propagator and the weight model only understand unary and binary
//! factors, so "the values of these variables sum to K" is rewritten as a
//! chain of auxiliary running-total variables, each carrying a
//! `(before, after)` pair, linked pairwise.

use crate::{
    error::Result,
    solver::{
        model::Model,
        variable::{Value, Variable},
    },
};

/// Adds a variable whose value equals the sum of `terms` in every satisfying
/// assignment, and returns it.
///
/// For `k` terms, `k` auxiliary chain variables `A_0 .. A_{k-1}` are created
/// with domain all pairs `(before, after)` in `[0, max_sum]²`. `A_i` is bound
/// to `terms[i]` by `after = before + value`, consecutive auxiliaries by
/// `before(A_i) = after(A_{i-1})`, and `before(A_0)` is seeded to zero. The
/// returned result variable has domain `[0, max_sum]` and equals
/// `after(A_{k-1})`.
///
/// With no terms the result variable is fixed to zero directly; no
/// auxiliaries are created.
pub fn add_sum_variable(
    model: &mut Model,
    scope: impl Into<String>,
    terms: &[Variable],
    max_sum: i64,
) -> Result<Variable> {
    let scope = scope.into();
    let result = Variable::Total {
        scope: scope.clone(),
    };
    model.add_variable(result.clone(), (0..=max_sum).map(Value::Int))?;

    if terms.is_empty() {
        model.add_unary_predicate(&result, |v| *v == Value::Int(0))?;
        return Ok(result);
    }

    for (index, term) in terms.iter().enumerate() {
        let aux = Variable::Chain {
            scope: scope.clone(),
            index,
        };
        let pairs = (0..=max_sum)
            .flat_map(|before| (0..=max_sum).map(move |after| Value::Pair(before, after)));
        model.add_variable(aux.clone(), pairs)?;

        model.add_binary_predicate(term, &aux, |tv, av| match (tv, av) {
            (Value::Int(x), Value::Pair(before, after)) => *after == *before + *x,
            _ => false,
        })?;

        if index == 0 {
            model.add_unary_predicate(&aux, |v| matches!(v, Value::Pair(0, _)))?;
        } else {
            let prev = Variable::Chain {
                scope: scope.clone(),
                index: index - 1,
            };
            model.add_binary_predicate(&prev, &aux, |pv, av| match (pv, av) {
                (Value::Pair(_, prev_after), Value::Pair(before, _)) => prev_after == before,
                _ => false,
            })?;
        }
    }

    let last = Variable::Chain {
        scope,
        index: terms.len() - 1,
    };
    model.add_binary_predicate(&last, &result, |av, rv| match (av, rv) {
        (Value::Pair(_, after), Value::Int(total)) => after == total,
        _ => false,
    })?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::search::BacktrackingSearch;

    fn binary_cells(model: &mut Model, n: usize) -> Vec<Variable> {
        (0..n)
            .map(|y| {
                let var = Variable::cell(0, y);
                model
                    .add_variable(var.clone(), [Value::Int(0), Value::Int(1)])
                    .unwrap();
                var
            })
            .collect()
    }

    #[test]
    fn empty_term_list_fixes_result_to_zero() {
        let mut model = Model::new();
        let total = add_sum_variable(&mut model, "t", &[], 3).unwrap();

        let outcome = BacktrackingSearch::new(false, false).solve(&model);
        assert_eq!(outcome.stats.num_assignments, 1);
        assert_eq!(outcome.assignments[0][&total], Value::Int(0));
    }

    #[test]
    fn result_equals_sum_of_terms_in_every_assignment() {
        let mut model = Model::new();
        let cells = binary_cells(&mut model, 3);
        let total = add_sum_variable(&mut model, "t", &cells, 3).unwrap();

        let outcome = BacktrackingSearch::new(false, false).solve(&model);
        // Unconstrained terms: all 8 combinations survive.
        assert_eq!(outcome.stats.num_assignments, 8);
        for assignment in &outcome.assignments {
            let sum: i64 = cells
                .iter()
                .map(|c| assignment[c].as_int().unwrap())
                .sum();
            assert_eq!(assignment[&total], Value::Int(sum));
        }
    }

    #[test]
    fn fixing_the_result_restricts_the_terms() {
        let mut model = Model::new();
        let cells = binary_cells(&mut model, 4);
        let total = add_sum_variable(&mut model, "t", &cells, 4).unwrap();
        model
            .add_unary_predicate(&total, |v| *v == Value::Int(2))
            .unwrap();

        let outcome = BacktrackingSearch::new(false, false).solve(&model);
        // C(4, 2) ways to pick the two hazardous terms.
        assert_eq!(outcome.stats.num_assignments, 6);
        for assignment in &outcome.assignments {
            let sum: i64 = cells
                .iter()
                .map(|c| assignment[c].as_int().unwrap())
                .sum();
            assert_eq!(sum, 2);
        }
    }
}
