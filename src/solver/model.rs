use std::collections::HashMap;

use crate::{
    error::{ModelError, Result},
    solver::variable::{Domain, Value, Variable, Weight},
};

/// A two-level weight table for one ordered pair of variables, keyed first by
/// this variable's value and then by the other variable's value.
type FactorTable = HashMap<Value, HashMap<Value, Weight>>;

/// A weighted constraint model: variables, their domains, and unary/binary
/// factor tables.
///
/// Factors are materialized over the registered domains at the time they are
/// added, and multiple factors over the same scope compose by pointwise
/// multiplication, so a zero contributed by any one factor permanently
/// excludes a combination. The absence of a factor between two variables
/// means "no constraint", i.e. an implicit weight of 1 for every value pair.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Registration order, used for deterministic variable selection.
    order: Vec<Variable>,
    domains: im::HashMap<Variable, Domain>,
    unary: HashMap<Variable, HashMap<Value, Weight>>,
    binary: HashMap<Variable, HashMap<Variable, FactorTable>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a variable with its initial domain.
    ///
    /// Re-adding a variable with an identical domain is a no-op, since
    /// incremental model assembly re-touches variables as new neighbours are
    /// discovered. Re-adding with a different domain is a caller bug.
    pub fn add_variable(
        &mut self,
        var: Variable,
        domain: impl IntoIterator<Item = Value>,
    ) -> Result<()> {
        let domain: Domain = domain.into_iter().collect();
        if let Some(existing) = self.domains.get(&var) {
            if *existing == domain {
                return Ok(());
            }
            return Err(ModelError::DomainConflict(var.to_string()).into());
        }
        self.order.push(var.clone());
        self.domains.insert(var, domain);
        Ok(())
    }

    /// Variables in registration order.
    pub fn variables(&self) -> &[Variable] {
        &self.order
    }

    pub fn num_variables(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.domains.contains_key(var)
    }

    pub fn domain(&self, var: &Variable) -> Option<&Domain> {
        self.domains.get(var)
    }

    /// The full domain map, cloned cheaply by the search engine into its
    /// per-invocation working domains.
    pub fn domains(&self) -> &im::HashMap<Variable, Domain> {
        &self.domains
    }

    /// Multiplies a unary factor into the table for `var`.
    pub fn add_unary_factor(
        &mut self,
        var: &Variable,
        factor: impl Fn(&Value) -> Weight,
    ) -> Result<()> {
        let domain = self
            .domains
            .get(var)
            .cloned()
            .ok_or_else(|| ModelError::UnknownVariable(var.to_string()))?;
        let table = self.unary.entry(var.clone()).or_default();
        for value in &domain {
            let entry = table.entry(*value).or_insert(1.0);
            *entry *= factor(value);
        }
        Ok(())
    }

    /// Boolean convenience wrapper over [`Model::add_unary_factor`].
    pub fn add_unary_predicate(
        &mut self,
        var: &Variable,
        predicate: impl Fn(&Value) -> bool,
    ) -> Result<()> {
        self.add_unary_factor(var, |v| if predicate(v) { 1.0 } else { 0.0 })
    }

    /// Multiplies a binary factor into the tables for `(a, b)`.
    ///
    /// Both the `(a, b)` table and the transposed `(b, a)` table are
    /// populated, so neighbour lookups work from either endpoint.
    pub fn add_binary_factor(
        &mut self,
        a: &Variable,
        b: &Variable,
        factor: impl Fn(&Value, &Value) -> Weight,
    ) -> Result<()> {
        let domain_a = self
            .domains
            .get(a)
            .cloned()
            .ok_or_else(|| ModelError::UnknownVariable(a.to_string()))?;
        let domain_b = self
            .domains
            .get(b)
            .cloned()
            .ok_or_else(|| ModelError::UnknownVariable(b.to_string()))?;

        let forward = self
            .binary
            .entry(a.clone())
            .or_default()
            .entry(b.clone())
            .or_default();
        for va in &domain_a {
            let row = forward.entry(*va).or_default();
            for vb in &domain_b {
                let entry = row.entry(*vb).or_insert(1.0);
                *entry *= factor(va, vb);
            }
        }

        let transposed = self
            .binary
            .entry(b.clone())
            .or_default()
            .entry(a.clone())
            .or_default();
        for vb in &domain_b {
            let row = transposed.entry(*vb).or_default();
            for va in &domain_a {
                let entry = row.entry(*va).or_insert(1.0);
                *entry *= factor(va, vb);
            }
        }
        Ok(())
    }

    /// Boolean convenience wrapper over [`Model::add_binary_factor`].
    pub fn add_binary_predicate(
        &mut self,
        a: &Variable,
        b: &Variable,
        predicate: impl Fn(&Value, &Value) -> bool,
    ) -> Result<()> {
        self.add_binary_factor(a, b, |va, vb| if predicate(va, vb) { 1.0 } else { 0.0 })
    }

    /// Variables sharing a binary factor with `var`.
    pub fn neighbors<'a>(&'a self, var: &Variable) -> impl Iterator<Item = &'a Variable> {
        self.binary.get(var).into_iter().flat_map(|m| m.keys())
    }

    /// The composed unary weight for `val`, defaulting to 1 when `var` has no
    /// unary factor.
    pub fn unary_weight(&self, var: &Variable, val: &Value) -> Weight {
        match self.unary.get(var) {
            Some(table) => table.get(val).copied().unwrap_or(0.0),
            None => 1.0,
        }
    }

    /// The composed binary weight for `(va, vb)`, defaulting to 1 when no
    /// factor links `a` and `b`.
    pub fn binary_weight(&self, a: &Variable, va: &Value, b: &Variable, vb: &Value) -> Weight {
        match self.binary.get(a).and_then(|m| m.get(b)) {
            Some(table) => table
                .get(va)
                .and_then(|row| row.get(vb))
                .copied()
                .unwrap_or(0.0),
            None => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bool_domain() -> [Value; 2] {
        [Value::Int(0), Value::Int(1)]
    }

    #[test]
    fn re_adding_identical_domain_is_a_noop() {
        let mut model = Model::new();
        let a = Variable::cell(0, 0);
        model.add_variable(a.clone(), bool_domain()).unwrap();
        model.add_variable(a.clone(), bool_domain()).unwrap();
        assert_eq!(model.num_variables(), 1);
        assert_eq!(model.domain(&a).unwrap().len(), 2);
    }

    #[test]
    fn re_adding_different_domain_fails() {
        let mut model = Model::new();
        let a = Variable::cell(0, 0);
        model.add_variable(a.clone(), bool_domain()).unwrap();
        let result = model.add_variable(a, [Value::Int(0)]);
        assert!(result.is_err());
    }

    #[test]
    fn factor_on_unregistered_variable_fails() {
        let mut model = Model::new();
        let a = Variable::cell(0, 0);
        let b = Variable::cell(0, 1);
        model.add_variable(a.clone(), bool_domain()).unwrap();
        assert!(model.add_unary_predicate(&b, |_| true).is_err());
        assert!(model.add_binary_predicate(&a, &b, |_, _| true).is_err());
    }

    #[test]
    fn unary_factors_compose_by_pointwise_multiplication() {
        let mut model = Model::new();
        let a = Variable::cell(0, 0);
        model.add_variable(a.clone(), bool_domain()).unwrap();

        model.add_unary_factor(&a, |_| 0.5).unwrap();
        model
            .add_unary_predicate(&a, |v| *v == Value::Int(1))
            .unwrap();

        // The zero from the predicate permanently excludes 0.
        assert_eq!(model.unary_weight(&a, &Value::Int(0)), 0.0);
        assert_eq!(model.unary_weight(&a, &Value::Int(1)), 0.5);

        model.add_unary_predicate(&a, |_| true).unwrap();
        assert_eq!(model.unary_weight(&a, &Value::Int(0)), 0.0);
    }

    #[test]
    fn binary_factor_populates_transposed_table() {
        let mut model = Model::new();
        let a = Variable::cell(0, 0);
        let b = Variable::cell(0, 1);
        model.add_variable(a.clone(), bool_domain()).unwrap();
        model.add_variable(b.clone(), bool_domain()).unwrap();

        // a != b
        model.add_binary_predicate(&a, &b, |va, vb| va != vb).unwrap();

        assert_eq!(
            model.binary_weight(&a, &Value::Int(0), &b, &Value::Int(0)),
            0.0
        );
        assert_eq!(
            model.binary_weight(&b, &Value::Int(0), &a, &Value::Int(1)),
            1.0
        );
        assert_eq!(model.neighbors(&a).collect::<Vec<_>>(), vec![&b]);
        assert_eq!(model.neighbors(&b).collect::<Vec<_>>(), vec![&a]);
    }

    #[test]
    fn absent_factor_means_no_constraint() {
        let mut model = Model::new();
        let a = Variable::cell(0, 0);
        let b = Variable::cell(0, 1);
        model.add_variable(a.clone(), bool_domain()).unwrap();
        model.add_variable(b.clone(), bool_domain()).unwrap();

        assert_eq!(model.unary_weight(&a, &Value::Int(1)), 1.0);
        assert_eq!(
            model.binary_weight(&a, &Value::Int(0), &b, &Value::Int(1)),
            1.0
        );
        assert_eq!(model.neighbors(&a).count(), 0);
    }
}
