use serde::Deserialize;
use sparselp_linalg::LinalgError;
use sparselp_solver::{LinearProgram, Relation};

/// A linear program as read from a JSON file.
///
/// Bound entries may be `null` for an unbounded side. Omitted bound arrays leave every
/// variable free on that side.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemFile {
    #[serde(default)]
    pub minimize: bool,
    pub objective: Vec<f64>,
    #[serde(default)]
    pub variables: Option<Vec<String>>,
    #[serde(default)]
    pub lower_bounds: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub upper_bounds: Option<Vec<Option<f64>>>,
    /// Indices of integer variables
    #[serde(default)]
    pub integer: Vec<usize>,
    /// Indices of binary variables
    #[serde(default)]
    pub binary: Vec<usize>,
    #[serde(default)]
    pub constraints: Vec<ConstraintEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub coefficients: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

impl ProblemFile {
    pub fn parse(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn into_program(self) -> Result<LinearProgram, LinalgError> {
        let mut lp = LinearProgram::new(&self.objective);
        if let Some(names) = self.variables {
            lp = lp.with_variable_names(names)?;
        }
        lp.set_minimize(self.minimize);

        if let Some(lower) = self.lower_bounds {
            lp.set_lower_bounds(fill(lower, f64::NEG_INFINITY))?;
        }
        if let Some(upper) = self.upper_bounds {
            lp.set_upper_bounds(fill(upper, f64::INFINITY))?;
        }
        for j in self.integer {
            lp.set_integer(j)?;
        }
        for j in self.binary {
            lp.set_binary(j)?;
        }

        for (i, entry) in self.constraints.into_iter().enumerate() {
            let name = entry.name.unwrap_or_else(|| format!("c{}", i + 1));
            lp.add_constraint(name, entry.coefficients, entry.relation, entry.rhs)?;
        }
        Ok(lp)
    }
}

fn fill(bounds: Vec<Option<f64>>, missing: f64) -> Vec<f64> {
    bounds.into_iter().map(|b| b.unwrap_or(missing)).collect()
}
