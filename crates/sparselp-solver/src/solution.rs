use std::fmt;

/// The result of a successful solve
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Status reported by the engine (always a success status)
    pub status: SolveStatus,
    /// Value of each variable, in model order
    pub values: Vec<f64>,
    /// Objective value reported by the engine
    pub objective_value: f64,
}

impl Solution {
    pub fn value(&self, j: usize) -> Option<f64> {
        self.values.get(j).copied()
    }

    /// Values rounded to the nearest integer, for integer and binary programs
    pub fn integer_values(&self) -> Vec<i64> {
        self.values.iter().map(|v| v.round() as i64).collect()
    }
}

/// Status reported by the external engine after a solve
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// An optimal solution was found
    Optimal,
    /// A feasible, possibly suboptimal, solution was found
    Feasible,
    /// The problem has no feasible solution
    Infeasible,
    /// The engine proved that no feasible solution exists for the relaxation
    NoFeasible,
    /// The objective is unbounded
    Unbounded,
    /// Iteration limit reached before a solution was found
    IterationLimit,
    /// Time limit reached before a solution was found
    TimeLimit,
    /// The engine did not determine a status
    Undefined,
    /// The engine failed
    Fault,
}

impl SolveStatus {
    pub fn is_success(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::NoFeasible => "NO FEASIBLE",
            SolveStatus::Unbounded => "UNBOUNDED",
            SolveStatus::IterationLimit => "ITERATION LIMIT",
            SolveStatus::TimeLimit => "TIME LIMIT",
            SolveStatus::Undefined => "UNDEFINED",
            SolveStatus::Fault => "FAULT",
        };
        f.write_str(text)
    }
}
