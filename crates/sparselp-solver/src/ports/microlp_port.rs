use std::time::Duration;

use ::microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};

use super::one_based;
use crate::coordinate::CoordinateList;
use crate::error::SolveError;
use crate::port::{Bound, BoundKind, Direction, SolverPort, VariableKind};
use crate::solution::SolveStatus;

#[derive(Debug, Clone, Default)]
struct Column {
    name: String,
    objective: f64,
    bound: Bound,
    kind: VariableKind,
}

#[derive(Debug, Clone, Default)]
struct Row {
    name: String,
    bound: Bound,
}

/// Port backed by the pure-Rust `microlp` engine.
///
/// The problem is buffered as it is described and handed to `microlp` in one piece
/// when a solve entry point is called.
#[derive(Debug, Clone)]
pub struct MicrolpPort {
    direction: Direction,
    columns: Vec<Column>,
    rows: Vec<Row>,
    matrix: CoordinateList,
    time_limit: Option<Duration>,
    values: Vec<f64>,
    objective_value: f64,
}

impl Default for MicrolpPort {
    fn default() -> Self {
        Self::new()
    }
}

impl MicrolpPort {
    pub fn new() -> Self {
        Self {
            direction: Direction::Maximize,
            columns: Vec::new(),
            rows: Vec::new(),
            matrix: CoordinateList::default(),
            time_limit: None,
            values: Vec::new(),
            objective_value: 0.0,
        }
    }

    fn run(&mut self, integral: bool) -> Result<SolveStatus, SolveError> {
        let direction = match self.direction {
            Direction::Minimize => OptimizationDirection::Minimize,
            Direction::Maximize => OptimizationDirection::Maximize,
        };
        if let Some(limit) = self.time_limit {
            tracing::debug!(
                component = "microlp",
                limit_secs = limit.as_secs_f64(),
                "Engine has no time limit, solving to completion"
            );
        }

        let mut problem = Problem::new(direction);
        let mut vars: Vec<Variable> = Vec::with_capacity(self.columns.len());
        for (index, column) in self.columns.iter().enumerate() {
            let (lower, upper) = column.bound.limits();
            let var = if integral && column.kind == VariableKind::Integer {
                match (integer_limit(lower.ceil()), integer_limit(upper.floor())) {
                    (Some(min), Some(max)) => problem.add_integer_var(column.objective, (min, max)),
                    _ => {
                        return Err(SolveError::InvalidBounds {
                            index,
                            lower,
                            upper,
                        });
                    }
                }
            } else {
                problem.add_var(column.objective, (lower, upper))
            };
            vars.push(var);
        }

        let mut terms: Vec<Vec<(Variable, f64)>> = vec![Vec::new(); self.rows.len()];
        for (row, col, value) in self.matrix.iter() {
            terms[row - 1].push((vars[col - 1], value));
        }

        for (row, expr) in self.rows.iter().zip(terms) {
            let (lower, upper) = row.bound.limits();
            match row.bound.kind {
                BoundKind::Free => {}
                BoundKind::Lower => problem.add_constraint(expr, ComparisonOp::Ge, lower),
                BoundKind::Upper => problem.add_constraint(expr, ComparisonOp::Le, upper),
                BoundKind::Fixed => problem.add_constraint(expr, ComparisonOp::Eq, lower),
                BoundKind::Double => {
                    problem.add_constraint(expr.clone(), ComparisonOp::Ge, lower);
                    problem.add_constraint(expr, ComparisonOp::Le, upper);
                }
            }
        }

        match problem.solve() {
            Ok(solution) => {
                self.values = vars.iter().map(|&var| solution[var]).collect();
                self.objective_value = solution.objective();
                Ok(SolveStatus::Optimal)
            }
            Err(::microlp::Error::Infeasible) => Ok(SolveStatus::Infeasible),
            Err(::microlp::Error::Unbounded) => Ok(SolveStatus::Unbounded),
            #[allow(unreachable_patterns)]
            Err(error) => {
                tracing::warn!(component = "microlp", error = ?error, "Engine failure");
                Ok(SolveStatus::Fault)
            }
        }
    }
}

/// A rounded integer bound in the engine's `i32` range. Infinities saturate; finite
/// values past the range and NaN have no representation.
fn integer_limit(value: f64) -> Option<i32> {
    if value == f64::INFINITY {
        Some(i32::MAX)
    } else if value == f64::NEG_INFINITY {
        Some(i32::MIN)
    } else if value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

impl SolverPort for MicrolpPort {
    fn name(&self) -> &str {
        "microlp"
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.time_limit = Some(limit);
    }

    fn add_cols(&mut self, n: usize) {
        self.columns
            .resize(self.columns.len() + n, Column::default());
    }

    fn add_rows(&mut self, n: usize) {
        self.rows.resize(self.rows.len() + n, Row::default());
    }

    fn set_col_name(&mut self, j: usize, name: &str) {
        if let Some(column) = one_based(&mut self.columns, j) {
            column.name = name.to_string();
        }
    }

    fn set_row_name(&mut self, i: usize, name: &str) {
        if let Some(row) = one_based(&mut self.rows, i) {
            row.name = name.to_string();
        }
    }

    fn set_col_bound(&mut self, j: usize, kind: BoundKind, lower: f64, upper: f64) {
        if let Some(column) = one_based(&mut self.columns, j) {
            column.bound = Bound { kind, lower, upper };
        }
    }

    fn set_col_kind(&mut self, j: usize, kind: VariableKind) {
        if let Some(column) = one_based(&mut self.columns, j) {
            column.kind = kind;
        }
    }

    fn set_row_bound(&mut self, i: usize, kind: BoundKind, lower: f64, upper: f64) {
        if let Some(row) = one_based(&mut self.rows, i) {
            row.bound = Bound { kind, lower, upper };
        }
    }

    fn set_objective_coefficient(&mut self, j: usize, value: f64) {
        if let Some(column) = one_based(&mut self.columns, j) {
            column.objective = value;
        }
    }

    fn load_matrix(&mut self, matrix: &CoordinateList) -> Result<(), SolveError> {
        matrix.validate(self.rows.len(), self.columns.len())?;
        self.matrix = matrix.clone();
        Ok(())
    }

    fn solve_linear(&mut self) -> Result<SolveStatus, SolveError> {
        self.run(false)
    }

    fn solve_mixed_integer(&mut self) -> Result<SolveStatus, SolveError> {
        self.run(true)
    }

    fn primal_value(&self, j: usize) -> f64 {
        j.checked_sub(1)
            .and_then(|k| self.values.get(k))
            .copied()
            .unwrap_or(0.0)
    }

    fn objective_value(&self) -> f64 {
        self.objective_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Assembler, LinearProgram, Relation};

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-6, "x{} = {} (expected {})", i, a, e);
        }
    }

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        //   x, y >= 0
        // Optimal: x=3, y=1, obj=11
        let mut lp = LinearProgram::new(&[3.0, 2.0]);
        lp.set_lower_bounds(vec![0.0, 0.0]).unwrap();
        lp.add_constraint("sum", vec![1.0, 1.0], Relation::Le, 4.0).unwrap();
        lp.add_constraint("x_max", vec![1.0, 0.0], Relation::Le, 3.0).unwrap();
        lp.add_constraint("y_max", vec![0.0, 1.0], Relation::Le, 3.0).unwrap();

        let solution = Assembler::new(MicrolpPort::new()).solve(&lp).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_close(&solution.values, &[3.0, 1.0]);
        assert!((solution.objective_value - 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounded_integer_program() {
        // Taken from Fourer, Gay, Kernighan, "AMPL"
        let mut lp = LinearProgram::new(&[25.0, 30.0]);
        lp.add_constraint("Time", vec![1.0 / 200.0, 1.0 / 140.0], Relation::Le, 40.0)
            .unwrap();
        lp.set_lower_bounds(vec![0.0, 0.0]).unwrap();
        lp.set_upper_bounds(vec![6000.0, 4000.0]).unwrap();
        lp.set_integer(0).unwrap();
        lp.set_integer(1).unwrap();

        let values = lp.solve(MicrolpPort::new()).unwrap();
        assert_close(&values, &[6000.0, 1400.0]);
    }

    #[test]
    fn test_diet_minimization() {
        let mut lp = LinearProgram::new(&[3.19, 2.59, 2.29, 2.89, 1.89, 1.99, 1.99, 2.49]);
        lp.set_minimize(true);
        lp.add_constraint(
            "Vitamin A",
            vec![60.0, 8.0, 8.0, 40.0, 15.0, 70.0, 25.0, 60.0],
            Relation::Ge,
            700.0,
        )
        .unwrap();
        lp.add_constraint(
            "Vitamin C",
            vec![20.0, 0.0, 10.0, 40.0, 35.0, 30.0, 50.0, 20.0],
            Relation::Ge,
            700.0,
        )
        .unwrap();
        lp.add_constraint(
            "Vitamin B1",
            vec![10.0, 20.0, 15.0, 35.0, 15.0, 15.0, 25.0, 15.0],
            Relation::Ge,
            700.0,
        )
        .unwrap();
        lp.add_constraint(
            "Vitamin B2",
            vec![15.0, 20.0, 10.0, 10.0, 15.0, 15.0, 15.0, 10.0],
            Relation::Ge,
            700.0,
        )
        .unwrap();
        lp.set_lower_bounds(vec![0.0; 8]).unwrap();

        let solution = Assembler::new(MicrolpPort::new()).solve(&lp).unwrap();
        assert!((solution.objective_value - 88.2).abs() < 1e-4);
        assert!((solution.values[4] - 46.66667).abs() < 1e-4);
        for constraint in lp.constraints() {
            let lhs = constraint.lhs(&solution.values).unwrap();
            assert!(lhs >= constraint.rhs() - 1e-6, "{} violated", constraint.name());
        }
    }

    #[test]
    fn test_small_integer_program_free_variables() {
        let mut lp = LinearProgram::new(&[1.0, 1.0, 1.0]);
        lp.set_minimize(true);
        lp.add_constraint("x_1 >= 5", vec![1.0, 0.0, 0.0], Relation::Ge, 5.0)
            .unwrap();
        lp.add_constraint("x_2 >= 3", vec![0.0, 1.0, 0.0], Relation::Ge, 3.0)
            .unwrap();
        lp.add_constraint("x_3 >= 4", vec![0.0, 0.0, 1.0], Relation::Ge, 4.0)
            .unwrap();
        lp.set_integers(&[true, true, true]).unwrap();

        let values = lp.solve(MicrolpPort::new()).unwrap();
        assert_close(&values, &[5.0, 3.0, 4.0]);
    }

    #[test]
    fn test_integer_program_with_lower_bounds() {
        let mut lp = LinearProgram::new(&[2.0, 0.0, 1.0, 0.5, 0.5]);
        lp.set_minimize(true);
        lp.set_lower_bounds(vec![1.0; 5]).unwrap();
        lp.add_constraint(
            "x_1 + x_4 >= 2",
            vec![0.5, 0.0, 0.0, 2.0, 0.0],
            Relation::Ge,
            2.0,
        )
        .unwrap();
        lp.add_constraint(
            "2 + x_4 + 0.5*x_5 <= 5",
            vec![0.0, 2.0, 0.0, 2.0, 1.0],
            Relation::Le,
            5.0,
        )
        .unwrap();
        lp.add_constraint(
            "3*x_3 + 10*x_5 >= 16",
            vec![0.0, 0.0, 3.0, 0.0, 10.0],
            Relation::Ge,
            16.0,
        )
        .unwrap();
        for j in 0..lp.dimension() {
            lp.set_integer(j).unwrap();
        }

        let values = lp.solve(MicrolpPort::new()).unwrap();
        assert_close(&values, &[1.0, 1.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_binary_program() {
        let mut lp = LinearProgram::new(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        lp.add_constraint("set at least 3", vec![1.0; 5], Relation::Ge, 3.0)
            .unwrap();
        lp.add_constraint(
            "one of the first three",
            vec![1.0, 1.0, 1.0, 0.0, 0.0],
            Relation::Ge,
            1.0,
        )
        .unwrap();
        lp.add_constraint(
            "one of the last three",
            vec![0.0, 0.0, 1.0, 1.0, 1.0],
            Relation::Ge,
            1.0,
        )
        .unwrap();
        lp.add_constraint(
            "weight",
            vec![1.0, 5.0, 3.0, 2.0, 4.0],
            Relation::Le,
            9.0,
        )
        .unwrap();
        for j in 0..lp.dimension() {
            lp.set_binary(j).unwrap();
        }

        let solution = Assembler::new(MicrolpPort::new()).solve(&lp).unwrap();
        assert_eq!(solution.integer_values(), vec![0, 0, 1, 1, 1]);
        assert!((solution.objective_value - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_equality_row() {
        let mut lp = LinearProgram::new(&[1.0, 2.0]);
        lp.set_minimize(true);
        lp.set_lower_bounds(vec![0.0, 0.0]).unwrap();
        lp.add_constraint("total", vec![1.0, 1.0], Relation::Eq, 10.0)
            .unwrap();

        let values = lp.solve(MicrolpPort::new()).unwrap();
        assert_close(&values, &[10.0, 0.0]);
    }

    #[test]
    fn test_infeasible_is_failure() {
        let mut lp = LinearProgram::new(&[1.0]);
        lp.set_minimize(true);
        lp.add_constraint("lower", vec![1.0], Relation::Ge, 5.0).unwrap();
        lp.add_constraint("upper", vec![1.0], Relation::Le, 3.0).unwrap();

        assert_eq!(
            lp.solve(MicrolpPort::new()),
            Err(SolveError::Failure {
                status: SolveStatus::Infeasible
            })
        );
    }

    #[test]
    fn test_unbounded_is_failure() {
        let mut lp = LinearProgram::new(&[1.0, 1.0]);
        lp.set_lower_bounds(vec![0.0, 0.0]).unwrap();
        lp.add_constraint("floor", vec![1.0, 1.0], Relation::Ge, 1.0)
            .unwrap();

        assert_eq!(
            lp.solve(MicrolpPort::new()),
            Err(SolveError::Failure {
                status: SolveStatus::Unbounded
            })
        );
    }

    #[test]
    fn test_integer_limit_saturates_only_infinities() {
        assert_eq!(integer_limit(f64::NEG_INFINITY), Some(i32::MIN));
        assert_eq!(integer_limit(f64::INFINITY), Some(i32::MAX));
        assert_eq!(integer_limit(3.0), Some(3));
        assert_eq!(integer_limit(-2_147_483_648.0), Some(i32::MIN));
        assert_eq!(integer_limit(3e9), None);
        assert_eq!(integer_limit(-3e9), None);
        assert_eq!(integer_limit(f64::NAN), None);
    }

    #[test]
    fn test_integer_bound_past_engine_range_is_rejected() {
        let mut lp = LinearProgram::new(&[1.0]);
        lp.set_lower_bounds(vec![0.0]).unwrap();
        lp.set_upper_bounds(vec![3e9]).unwrap();
        lp.set_integer(0).unwrap();

        let result = Assembler::new(MicrolpPort::new()).solve(&lp);
        assert_eq!(
            result,
            Err(SolveError::InvalidBounds {
                index: 0,
                lower: 0.0,
                upper: 3e9,
            })
        );

        // The same range is fine for a continuous column
        let mut relaxed = LinearProgram::new(&[1.0]);
        relaxed.set_lower_bounds(vec![0.0]).unwrap();
        relaxed.set_upper_bounds(vec![3e9]).unwrap();
        let values = relaxed.solve(MicrolpPort::new()).unwrap();
        assert!((values[0] - 3e9).abs() < 1e-3);
    }
}
