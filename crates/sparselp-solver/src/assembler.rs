use std::time::Duration;

use crate::coordinate::CoordinateList;
use crate::error::SolveError;
use crate::port::{Bound, BoundKind, Direction, SolverPort, VariableKind};
use crate::problem::{Constraint, LinearProgram, Relation};
use crate::solution::Solution;

/// Settings applied to the port before each solve
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Forwarded to the engine; the assembler itself never interrupts a solve
    pub time_limit: Option<Duration>,
    /// Let the engine print its own progress output
    pub verbose: bool,
}

/// Translates a [`LinearProgram`] into calls on a [`SolverPort`] and maps the
/// engine's answer back to model order
pub struct Assembler<P> {
    port: P,
    options: SolveOptions,
}

impl<P: SolverPort> Assembler<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            options: SolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.options.time_limit = Some(limit);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = verbose;
        self
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    /// Describes `problem` to the port without solving it.
    ///
    /// Structure pass first (direction, columns with objective, bounds and kinds, rows
    /// with bounds), then the coefficient matrix in a single bulk load.
    pub fn assemble(&mut self, problem: &LinearProgram) -> Result<(), SolveError> {
        // Bound errors must surface before the port sees anything
        let columns = (0..problem.dimension())
            .map(|j| column_bound(problem, j))
            .collect::<Result<Vec<_>, _>>()?;
        let objective = problem.objective().to_dense();

        let port = &mut self.port;
        port.reset();
        port.set_message_output(self.options.verbose);
        port.set_direction(if problem.is_minimize() {
            Direction::Minimize
        } else {
            Direction::Maximize
        });

        port.add_cols(columns.len());
        for (j, (bound, kind)) in columns.iter().enumerate() {
            let col = j + 1;
            port.set_col_name(col, &problem.variables()[j]);
            port.set_objective_coefficient(col, objective[j]);
            port.set_col_bound(col, bound.kind, bound.lower, bound.upper);
            port.set_col_kind(col, *kind);
        }

        port.add_rows(problem.num_constraints());
        for (i, constraint) in problem.constraints().iter().enumerate() {
            let row = i + 1;
            let bound = row_bound(constraint);
            port.set_row_name(row, constraint.name());
            port.set_row_bound(row, bound.kind, bound.lower, bound.upper);
        }

        tracing::debug!(
            component = "assembler",
            operation = "structure",
            port = port.name(),
            cols = columns.len(),
            rows = problem.num_constraints(),
            "Described problem structure"
        );

        let matrix = coordinate_list(problem);
        port.load_matrix(&matrix)?;

        tracing::debug!(
            component = "assembler",
            operation = "load_matrix",
            nonzeros = matrix.len(),
            "Loaded constraint matrix"
        );
        Ok(())
    }

    /// Assembles `problem`, runs the engine, and returns the value of every variable
    /// in model order. Failure statuses come back as [`SolveError::Failure`].
    pub fn solve(&mut self, problem: &LinearProgram) -> Result<Solution, SolveError> {
        self.assemble(problem)?;

        if let Some(limit) = self.options.time_limit {
            self.port.set_time_limit(limit);
        }

        let status = if problem.is_mip() {
            self.port.solve_mixed_integer()?
        } else {
            self.port.solve_linear()?
        };

        if !status.is_success() {
            tracing::warn!(
                component = "assembler",
                operation = "solve",
                port = self.port.name(),
                %status,
                "Solve failed"
            );
            return Err(SolveError::Failure { status });
        }

        let values = (1..=problem.dimension())
            .map(|col| self.port.primal_value(col))
            .collect();

        Ok(Solution {
            status,
            values,
            objective_value: self.port.objective_value(),
        })
    }
}

/// Number of exactly-nonzero coefficients over all constraints
pub fn count_nonzeros(problem: &LinearProgram) -> usize {
    problem
        .constraints()
        .iter()
        .map(|c| c.coefficients().values().iter().filter(|&&v| v != 0.0).count())
        .sum()
}

/// Builds the coordinate list for every constraint.
///
/// The nonzeros are counted first so the arrays are allocated once at their final
/// size. Rows follow constraint order and columns ascend within a row, both 1-based.
pub fn coordinate_list(problem: &LinearProgram) -> CoordinateList {
    let nonzeros = count_nonzeros(problem);
    let mut matrix = CoordinateList::with_capacity(nonzeros);

    for (i, constraint) in problem.constraints().iter().enumerate() {
        let coefficients = constraint.coefficients();
        let mut entries: Vec<(usize, f64)> = coefficients
            .indices()
            .iter()
            .copied()
            .zip(coefficients.values().iter().copied())
            .filter(|&(_, value)| value != 0.0)
            .collect();
        entries.sort_unstable_by_key(|&(col, _)| col);

        tracing::trace!(row = i + 1, entries = entries.len(), "Emitting constraint row");
        for (col, value) in entries {
            matrix.push(i + 1, col + 1, value);
        }
    }

    debug_assert_eq!(matrix.len(), nonzeros);
    matrix
}

/// Row bound for a constraint: `<=` bounds above, `>=` below, `=` fixes the row
pub fn row_bound(constraint: &Constraint) -> Bound {
    let t = constraint.rhs();
    match constraint.relation() {
        Relation::Le => Bound {
            kind: BoundKind::Upper,
            lower: f64::NEG_INFINITY,
            upper: t,
        },
        Relation::Ge => Bound {
            kind: BoundKind::Lower,
            lower: t,
            upper: f64::INFINITY,
        },
        Relation::Eq => Bound {
            kind: BoundKind::Fixed,
            lower: t,
            upper: t,
        },
    }
}

/// Column bound and kind for variable `j`. Binary variables become integers on [0, 1].
pub fn column_bound(
    problem: &LinearProgram,
    j: usize,
) -> Result<(Bound, VariableKind), SolveError> {
    if problem.is_binary(j) {
        return Ok((Bound::new(0.0, 1.0), VariableKind::Integer));
    }

    let (lower, upper) = problem.bounds(j)?;
    // An infinite side pointing inward leaves nothing to choose from
    if lower.is_nan()
        || upper.is_nan()
        || lower > upper
        || lower == f64::INFINITY
        || upper == f64::NEG_INFINITY
    {
        return Err(SolveError::InvalidBounds {
            index: j,
            lower,
            upper,
        });
    }

    let kind = if problem.is_integer(j) {
        VariableKind::Integer
    } else {
        VariableKind::Continuous
    };
    Ok((Bound::new(lower, upper), kind))
}
