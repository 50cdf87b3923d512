use std::time::Duration;

use super::one_based;
use crate::coordinate::CoordinateList;
use crate::error::SolveError;
use crate::port::{Bound, BoundKind, Direction, SolverPort, VariableKind};
use crate::solution::SolveStatus;

/// One call received by a [`RecordingPort`], with the index or count it carried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortCall {
    Reset,
    SetDirection(Direction),
    SetTimeLimit(Duration),
    SetMessageOutput(bool),
    AddCols(usize),
    AddRows(usize),
    SetColName(usize),
    SetRowName(usize),
    SetColBound(usize),
    SetColKind(usize),
    SetRowBound(usize),
    SetObjectiveCoefficient(usize),
    /// Number of triples loaded
    LoadMatrix(usize),
    SolveLinear,
    SolveMixedInteger,
}

#[derive(Debug, Clone)]
enum Outcome {
    Solved {
        status: SolveStatus,
        values: Vec<f64>,
        objective_value: f64,
    },
    Unavailable(String),
}

/// In-memory port that keeps everything it is told and answers solves with a
/// scripted result. Used to inspect an assembled problem without an engine.
#[derive(Debug, Clone)]
pub struct RecordingPort {
    pub calls: Vec<PortCall>,
    pub direction: Option<Direction>,
    pub time_limit: Option<Duration>,
    pub message_output: bool,
    pub col_names: Vec<String>,
    pub col_bounds: Vec<Bound>,
    pub col_kinds: Vec<VariableKind>,
    pub objective: Vec<f64>,
    pub row_names: Vec<String>,
    pub row_bounds: Vec<Bound>,
    pub matrix: CoordinateList,
    outcome: Outcome,
}

impl Default for RecordingPort {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPort {
    /// A port whose solves report `Undefined`
    pub fn new() -> Self {
        Self::with_result(SolveStatus::Undefined, Vec::new(), 0.0)
    }

    /// A port whose solves report `status` with the given column values
    pub fn with_result(status: SolveStatus, values: Vec<f64>, objective_value: f64) -> Self {
        Self::with_outcome(Outcome::Solved {
            status,
            values,
            objective_value,
        })
    }

    /// A port whose solves fail with [`SolveError::Unavailable`]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Unavailable(reason.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            calls: Vec::new(),
            direction: None,
            time_limit: None,
            message_output: false,
            col_names: Vec::new(),
            col_bounds: Vec::new(),
            col_kinds: Vec::new(),
            objective: Vec::new(),
            row_names: Vec::new(),
            row_bounds: Vec::new(),
            matrix: CoordinateList::default(),
            outcome,
        }
    }

    fn finish_solve(&self) -> Result<SolveStatus, SolveError> {
        match &self.outcome {
            Outcome::Solved { status, .. } => Ok(*status),
            Outcome::Unavailable(reason) => Err(SolveError::Unavailable(reason.clone())),
        }
    }
}

impl SolverPort for RecordingPort {
    fn name(&self) -> &str {
        "recording"
    }

    fn reset(&mut self) {
        let outcome = self.outcome.clone();
        *self = Self::with_outcome(outcome);
        self.calls.push(PortCall::Reset);
    }

    fn set_direction(&mut self, direction: Direction) {
        self.calls.push(PortCall::SetDirection(direction));
        self.direction = Some(direction);
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.calls.push(PortCall::SetTimeLimit(limit));
        self.time_limit = Some(limit);
    }

    fn set_message_output(&mut self, enabled: bool) {
        self.calls.push(PortCall::SetMessageOutput(enabled));
        self.message_output = enabled;
    }

    fn add_cols(&mut self, n: usize) {
        self.calls.push(PortCall::AddCols(n));
        let total = self.col_names.len() + n;
        self.col_names.resize(total, String::new());
        self.col_bounds.resize(total, Bound::free());
        self.col_kinds.resize(total, VariableKind::Continuous);
        self.objective.resize(total, 0.0);
    }

    fn add_rows(&mut self, n: usize) {
        self.calls.push(PortCall::AddRows(n));
        let total = self.row_names.len() + n;
        self.row_names.resize(total, String::new());
        self.row_bounds.resize(total, Bound::free());
    }

    fn set_col_name(&mut self, j: usize, name: &str) {
        self.calls.push(PortCall::SetColName(j));
        if let Some(slot) = one_based(&mut self.col_names, j) {
            *slot = name.to_string();
        }
    }

    fn set_row_name(&mut self, i: usize, name: &str) {
        self.calls.push(PortCall::SetRowName(i));
        if let Some(slot) = one_based(&mut self.row_names, i) {
            *slot = name.to_string();
        }
    }

    fn set_col_bound(&mut self, j: usize, kind: BoundKind, lower: f64, upper: f64) {
        self.calls.push(PortCall::SetColBound(j));
        if let Some(slot) = one_based(&mut self.col_bounds, j) {
            *slot = Bound { kind, lower, upper };
        }
    }

    fn set_col_kind(&mut self, j: usize, kind: VariableKind) {
        self.calls.push(PortCall::SetColKind(j));
        if let Some(slot) = one_based(&mut self.col_kinds, j) {
            *slot = kind;
        }
    }

    fn set_row_bound(&mut self, i: usize, kind: BoundKind, lower: f64, upper: f64) {
        self.calls.push(PortCall::SetRowBound(i));
        if let Some(slot) = one_based(&mut self.row_bounds, i) {
            *slot = Bound { kind, lower, upper };
        }
    }

    fn set_objective_coefficient(&mut self, j: usize, value: f64) {
        self.calls.push(PortCall::SetObjectiveCoefficient(j));
        if let Some(slot) = one_based(&mut self.objective, j) {
            *slot = value;
        }
    }

    fn load_matrix(&mut self, matrix: &CoordinateList) -> Result<(), SolveError> {
        self.calls.push(PortCall::LoadMatrix(matrix.len()));
        matrix.validate(self.row_bounds.len(), self.col_bounds.len())?;
        self.matrix = matrix.clone();
        Ok(())
    }

    fn solve_linear(&mut self) -> Result<SolveStatus, SolveError> {
        self.calls.push(PortCall::SolveLinear);
        self.finish_solve()
    }

    fn solve_mixed_integer(&mut self) -> Result<SolveStatus, SolveError> {
        self.calls.push(PortCall::SolveMixedInteger);
        self.finish_solve()
    }

    fn primal_value(&self, j: usize) -> f64 {
        match &self.outcome {
            Outcome::Solved { values, .. } => j
                .checked_sub(1)
                .and_then(|k| values.get(k))
                .copied()
                .unwrap_or(0.0),
            Outcome::Unavailable(_) => 0.0,
        }
    }

    fn objective_value(&self) -> f64 {
        match &self.outcome {
            Outcome::Solved {
                objective_value, ..
            } => *objective_value,
            Outcome::Unavailable(_) => 0.0,
        }
    }
}
