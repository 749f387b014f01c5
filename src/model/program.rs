// src/model/program.rs

//! Solver-neutral description of the reorder linear program.
//!
//! Every item contributes one decision bundle (reorder, surplus, stockout) and one
//! balance row:
//!
//! `surplus - stockout - reorder = stock_level - forecasted_demand`
//!
//! The objective minimises `holding * surplus + stockout_cost * stockout` summed over items.
//! Variables are addressed by index only; the item identifier lives on the bundle.

use crate::model::item::{Item, ItemId};
use crate::optimization::config::CostParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarIndex(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowIndex(pub usize);

/// A continuous variable bounded below, with its objective coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpec {
    pub lower_bound: f64,
    pub cost: f64,
}

/// `sum(coefficient * variable) == rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct EqualityRow {
    pub terms: Vec<(VarIndex, f64)>,
    pub rhs: f64,
}

/// The three decision variables and the balance row owned by one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionBundle {
    pub item: ItemId,
    pub reorder: VarIndex,
    pub surplus: VarIndex,
    pub stockout: VarIndex,
    pub balance: RowIndex,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearProgram {
    pub variables: Vec<VariableSpec>,
    pub rows: Vec<EqualityRow>,
    pub bundles: Vec<DecisionBundle>,
}

impl LinearProgram {
    /// Declares 3 variables and 1 balance row per item, in input order.
    ///
    /// An empty item slice yields an empty program, which every solver treats as
    /// trivially optimal.
    pub fn build(items: &[Item], costs: &CostParameters) -> Self {
        let mut program = LinearProgram {
            variables: Vec::with_capacity(items.len() * 3),
            rows: Vec::with_capacity(items.len()),
            bundles: Vec::with_capacity(items.len()),
        };

        for item in items {
            let reorder = program.add_variable(0.0);
            let surplus = program.add_variable(costs.holding_cost_per_unit);
            let stockout = program.add_variable(costs.stockout_cost_per_unit);

            let balance = program.add_row(EqualityRow {
                terms: vec![(surplus, 1.0), (stockout, -1.0), (reorder, -1.0)],
                rhs: item.net_position(),
            });

            program.bundles.push(DecisionBundle {
                item: item.id,
                reorder,
                surplus,
                stockout,
                balance,
            });
        }

        program
    }

    fn add_variable(&mut self, cost: f64) -> VarIndex {
        self.variables.push(VariableSpec {
            lower_bound: 0.0,
            cost,
        });
        VarIndex(self.variables.len() - 1)
    }

    fn add_row(&mut self, row: EqualityRow) -> RowIndex {
        self.rows.push(row);
        RowIndex(self.rows.len() - 1)
    }

    /// True when the only rows are the per-item balance rows, i.e. items are not coupled.
    pub fn is_separable(&self) -> bool {
        self.rows.len() == self.bundles.len()
            && self
                .bundles
                .iter()
                .enumerate()
                .all(|(i, bundle)| bundle.balance.0 == i)
    }

    /// Objective value of a full assignment (one value per variable).
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(spec, value)| spec.cost * value)
            .sum()
    }

    /// `lhs - rhs` of a row under the given assignment.
    pub fn row_residual(&self, row: RowIndex, values: &[f64]) -> f64 {
        let row = &self.rows[row.0];
        let lhs: f64 = row
            .terms
            .iter()
            .map(|(var, coefficient)| coefficient * values[var.0])
            .sum();
        lhs - row.rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn costs() -> CostParameters {
        CostParameters {
            holding_cost_per_unit: 2.0,
            stockout_cost_per_unit: 10.0,
        }
    }

    #[test]
    fn test_build_declares_three_variables_and_one_row_per_item() {
        let items = vec![
            Item::new(ItemId(0), "Kolkata", "cosmetics", 5.0, 20.0),
            Item::new(ItemId(3), "Chennai", "skincare", 30.0, 12.0),
        ];
        let program = LinearProgram::build(&items, &costs());

        assert_eq!(program.variables.len(), 6);
        assert_eq!(program.rows.len(), 2);
        assert_eq!(program.bundles.len(), 2);
        assert_eq!(program.bundles[1].item, ItemId(3));
        assert!(program.variables.iter().all(|v| v.lower_bound == 0.0));
        assert!(program.is_separable());

        let second = program.bundles[1];
        assert_eq!(program.variables[second.reorder.0].cost, 0.0);
        assert_eq!(program.variables[second.surplus.0].cost, 2.0);
        assert_eq!(program.variables[second.stockout.0].cost, 10.0);
        assert_eq!(program.rows[second.balance.0].rhs, 18.0);
    }

    #[test]
    fn test_empty_items_build_empty_program() {
        let program = LinearProgram::build(&[], &costs());
        assert!(program.bundles.is_empty());
        assert!(program.rows.is_empty());
        assert_eq!(program.objective_value(&[]), 0.0);
    }

    #[test]
    fn test_residual_and_objective() {
        let items = vec![Item::new(ItemId(0), "Delhi", "haircare", 5.0, 20.0)];
        let program = LinearProgram::build(&items, &costs());
        // reorder 15, surplus 0, stockout 0 balances the row
        let values = vec![15.0, 0.0, 0.0];
        assert_eq!(program.row_residual(RowIndex(0), &values), 0.0);
        assert_eq!(program.objective_value(&values), 0.0);

        // nothing reordered: 15 units short
        let values = vec![0.0, 0.0, 15.0];
        assert_eq!(program.row_residual(RowIndex(0), &values), 0.0);
        assert_eq!(program.objective_value(&values), 150.0);
    }

    #[test]
    fn test_extra_row_breaks_separability() {
        let items = vec![Item::new(ItemId(0), "Delhi", "haircare", 5.0, 20.0)];
        let mut program = LinearProgram::build(&items, &costs());
        program.rows.push(EqualityRow {
            terms: vec![(VarIndex(0), 1.0)],
            rhs: 3.0,
        });
        assert!(!program.is_separable());
    }
}
