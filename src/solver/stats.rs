use prettytable::{Cell, Row, Table};

use crate::solver::search::SearchStats;

/// Renders one solve invocation's counters as a text table, for diagnostics
/// output from the simulator.
pub fn render_stats_table(stats: &SearchStats) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Counter"), Cell::new("Value")]));
    table.add_row(Row::new(vec![
        Cell::new("Operations"),
        Cell::new(&stats.operations.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Ops to first solution"),
        Cell::new(&stats.first_solution_operations.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Backtracks"),
        Cell::new(&stats.backtracks.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Assignments"),
        Cell::new(&stats.num_assignments.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Optimal assignments"),
        Cell::new(&stats.num_optimal.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Optimal weight"),
        Cell::new(&format!("{:.2}", stats.optimal_weight)),
    ]));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_table_lists_every_counter() {
        let stats = SearchStats {
            operations: 42,
            first_solution_operations: 7,
            backtracks: 5,
            num_assignments: 3,
            num_optimal: 2,
            optimal_weight: 1.0,
        };
        let rendered = render_stats_table(&stats);

        for label in [
            "Operations",
            "Ops to first solution",
            "Backtracks",
            "Assignments",
            "Optimal assignments",
            "Optimal weight",
        ] {
            assert!(rendered.contains(label), "missing row: {label}");
        }
        assert!(rendered.contains("42"));
        assert!(rendered.contains("1.00"));
    }
}
