use std::fmt;

use sparselp_linalg::{LinalgError, Orientation, Shape, SparseVector};

use crate::assembler::Assembler;
use crate::error::SolveError;
use crate::port::SolverPort;

/// Absolute tolerance used when checking a point against constraints and bounds
pub const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Represents a linear program.
///
/// The objective fixes the dimension. Constraints keep their insertion order, which
/// becomes the row numbering when the program is assembled.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    /// Variable names, `x0..` unless replaced
    variables: Vec<String>,
    /// Objective function coefficients
    objective: SparseVector,
    /// Minimize instead of maximize
    minimize: bool,
    lower_bounds: Option<Vec<f64>>,
    upper_bounds: Option<Vec<f64>>,
    is_integer: Vec<bool>,
    is_binary: Vec<bool>,
    constraints: Vec<Constraint>,
}

#[derive(Debug, Clone)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    name: String,
    /// Coefficients for each variable
    coefficients: SparseVector,
    /// Comparison operator
    relation: Relation,
    /// Right-hand side value
    rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(alias = "<="))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(alias = ">="))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(alias = "="))]
    Eq,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Le => write!(f, "<="),
            Relation::Ge => write!(f, ">="),
            Relation::Eq => write!(f, "="),
        }
    }
}

impl Constraint {
    pub fn new(
        name: impl Into<String>,
        coefficients: impl Into<SparseVector>,
        relation: Relation,
        rhs: f64,
    ) -> Self {
        Self {
            name: name.into(),
            coefficients: coefficients.into().with_orientation(Orientation::Row),
            relation,
            rhs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coefficients(&self) -> &SparseVector {
        &self.coefficients
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Left-hand side value at `x`
    pub fn lhs(&self, x: &[f64]) -> Result<f64, LinalgError> {
        self.coefficients.dot_dense(x)
    }

    pub fn is_satisfied_by(&self, x: &[f64]) -> Result<bool, LinalgError> {
        let lhs = self.lhs(x)?;
        Ok(match self.relation {
            Relation::Le => lhs <= self.rhs + FEASIBILITY_TOLERANCE,
            Relation::Ge => lhs >= self.rhs - FEASIBILITY_TOLERANCE,
            Relation::Eq => (lhs - self.rhs).abs() <= FEASIBILITY_TOLERANCE,
        })
    }
}

impl LinearProgram {
    /// A maximization problem with a dense objective and no constraints
    pub fn new(objective: &[f64]) -> Self {
        Self::from_objective(SparseVector::from_dense(objective))
    }

    pub fn from_objective(objective: SparseVector) -> Self {
        let n = objective.size();
        Self {
            variables: (0..n).map(|j| format!("x{j}")).collect(),
            objective: objective.with_orientation(Orientation::Row),
            minimize: false,
            lower_bounds: None,
            upper_bounds: None,
            is_integer: vec![false; n],
            is_binary: vec![false; n],
            constraints: Vec::new(),
        }
    }

    /// A problem with `n` variables and an all-zero objective
    pub fn with_dimension(n: usize) -> Self {
        Self::from_objective(SparseVector::new(n))
    }

    pub fn with_variable_names(mut self, names: Vec<String>) -> Result<Self, LinalgError> {
        self.check_length("variable names", names.len())?;
        self.variables = names;
        Ok(self)
    }

    fn check_length(&self, op: &'static str, len: usize) -> Result<(), LinalgError> {
        if len == self.dimension() {
            Ok(())
        } else {
            Err(LinalgError::DimensionMismatch {
                op,
                left: Shape::new(1, self.dimension()),
                right: Shape::new(1, len),
            })
        }
    }

    fn check_variable(&self, j: usize) -> Result<(), LinalgError> {
        if j < self.dimension() {
            Ok(())
        } else {
            Err(LinalgError::IndexOutOfRange {
                index: j,
                size: self.dimension(),
            })
        }
    }

    pub fn dimension(&self) -> usize {
        self.objective.size()
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn objective(&self) -> &SparseVector {
        &self.objective
    }

    pub fn set_objective(&mut self, coefficients: impl Into<SparseVector>) -> Result<(), LinalgError> {
        let coefficients = coefficients.into();
        self.check_length("objective", coefficients.size())?;
        self.objective = coefficients.with_orientation(Orientation::Row);
        Ok(())
    }

    pub fn is_minimize(&self) -> bool {
        self.minimize
    }

    pub fn set_minimize(&mut self, minimize: bool) {
        self.minimize = minimize;
    }

    pub fn has_bounds(&self) -> bool {
        self.lower_bounds.is_some() || self.upper_bounds.is_some()
    }

    pub fn lower_bounds(&self) -> Option<&[f64]> {
        self.lower_bounds.as_deref()
    }

    pub fn upper_bounds(&self) -> Option<&[f64]> {
        self.upper_bounds.as_deref()
    }

    pub fn set_lower_bounds(&mut self, bounds: Vec<f64>) -> Result<(), LinalgError> {
        self.check_length("lower bounds", bounds.len())?;
        self.lower_bounds = Some(bounds);
        Ok(())
    }

    pub fn set_upper_bounds(&mut self, bounds: Vec<f64>) -> Result<(), LinalgError> {
        self.check_length("upper bounds", bounds.len())?;
        self.upper_bounds = Some(bounds);
        Ok(())
    }

    /// Sets one lower bound; the other variables stay unbounded below
    pub fn set_lower_bound(&mut self, j: usize, value: f64) -> Result<(), LinalgError> {
        self.check_variable(j)?;
        let n = self.dimension();
        self.lower_bounds
            .get_or_insert_with(|| vec![f64::NEG_INFINITY; n])[j] = value;
        Ok(())
    }

    /// Sets one upper bound; the other variables stay unbounded above
    pub fn set_upper_bound(&mut self, j: usize, value: f64) -> Result<(), LinalgError> {
        self.check_variable(j)?;
        let n = self.dimension();
        self.upper_bounds
            .get_or_insert_with(|| vec![f64::INFINITY; n])[j] = value;
        Ok(())
    }

    /// Declared `(lower, upper)` for variable `j`, infinite where nothing was set.
    /// Binary forcing is applied at assembly, not here.
    pub fn bounds(&self, j: usize) -> Result<(f64, f64), LinalgError> {
        self.check_variable(j)?;
        let lower = self.lower_bounds.as_ref().map_or(f64::NEG_INFINITY, |b| b[j]);
        let upper = self.upper_bounds.as_ref().map_or(f64::INFINITY, |b| b[j]);
        Ok((lower, upper))
    }

    pub fn set_integer(&mut self, j: usize) -> Result<(), LinalgError> {
        self.check_variable(j)?;
        self.is_integer[j] = true;
        Ok(())
    }

    pub fn set_integers(&mut self, flags: &[bool]) -> Result<(), LinalgError> {
        self.check_length("integer flags", flags.len())?;
        self.is_integer.copy_from_slice(flags);
        Ok(())
    }

    /// Marks `j` as binary: integer with bounds forced to [0, 1]
    pub fn set_binary(&mut self, j: usize) -> Result<(), LinalgError> {
        self.check_variable(j)?;
        self.is_binary[j] = true;
        Ok(())
    }

    /// True for integer and binary variables
    pub fn is_integer(&self, j: usize) -> bool {
        self.is_integer.get(j).copied().unwrap_or(false) || self.is_binary(j)
    }

    pub fn is_binary(&self, j: usize) -> bool {
        self.is_binary.get(j).copied().unwrap_or(false)
    }

    /// True when any variable is integer or binary
    pub fn is_mip(&self) -> bool {
        self.is_integer.iter().chain(&self.is_binary).any(|&flag| flag)
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        coefficients: impl Into<SparseVector>,
        relation: Relation,
        rhs: f64,
    ) -> Result<(), LinalgError> {
        self.push_constraint(Constraint::new(name, coefficients, relation, rhs))
    }

    pub fn push_constraint(&mut self, constraint: Constraint) -> Result<(), LinalgError> {
        self.check_length("constraint", constraint.coefficients.size())?;
        tracing::debug!(
            component = "model",
            operation = "add_constraint",
            row = self.constraints.len() + 1,
            name = constraint.name(),
            relation = %constraint.relation,
            rhs = constraint.rhs,
            "Added constraint to model"
        );
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, i: usize) -> Option<&Constraint> {
        self.constraints.get(i)
    }

    pub fn num_variables(&self) -> usize {
        self.dimension()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value at `x`
    pub fn evaluate(&self, x: &[f64]) -> Result<f64, LinalgError> {
        self.objective.dot_dense(x)
    }

    /// Whether `x` satisfies every constraint, every bound and every integrality
    /// requirement. Binary variables are held to [0, 1] whatever bounds were declared.
    pub fn is_feasible(&self, x: &[f64]) -> Result<bool, LinalgError> {
        self.check_length("point", x.len())?;
        for (j, &value) in x.iter().enumerate() {
            let (lower, upper) = if self.is_binary(j) {
                (0.0, 1.0)
            } else {
                self.bounds(j)?
            };
            if value.is_nan()
                || value < lower - FEASIBILITY_TOLERANCE
                || value > upper + FEASIBILITY_TOLERANCE
            {
                return Ok(false);
            }
            if self.is_integer(j) && (value - value.round()).abs() > FEASIBILITY_TOLERANCE {
                return Ok(false);
            }
        }
        for constraint in &self.constraints {
            if !constraint.is_satisfied_by(x)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Solves with `port` under default options and returns the value of each variable
    pub fn solve<P: SolverPort>(&self, port: P) -> Result<Vec<f64>, SolveError> {
        Assembler::new(port).solve(self).map(|solution| solution.values)
    }
}
