use sparselp_linalg::LinalgError;
use sparselp_solver::{Assembler, LinearProgram, MicrolpPort, Relation, SolveError, Solution};

/// A sample program with the values it is expected to reach, if known
pub struct DemoProgram {
    pub title: &'static str,
    pub program: LinearProgram,
    pub expected: Option<Vec<f64>>,
}

/// Outcome of one sample program
pub struct DemoReport {
    pub title: &'static str,
    pub solution: Result<Solution, SolveError>,
    /// Per-variable check against the expected values
    pub checks: Vec<bool>,
}

impl DemoReport {
    pub fn passed(&self) -> bool {
        self.solution.is_ok() && self.checks.iter().all(|&ok| ok)
    }
}

const CHECK_TOLERANCE: f64 = 0.01;

pub fn programs() -> Result<Vec<DemoProgram>, LinalgError> {
    let mut production = LinearProgram::new(&[10.0, 6.0, 4.0]);
    production.add_constraint("p", vec![1.0, 1.0, 1.0], Relation::Le, 320.0)?;
    production.add_constraint("q", vec![10.0, 4.0, 5.0], Relation::Le, 650.0)?;
    production.add_constraint("r1", vec![2.0, 2.0, 6.0], Relation::Ge, 100.0)?;
    production.set_lower_bounds(vec![30.0, 0.0, 0.0])?;
    production.set_integers(&[true, true, true])?;

    let mut mip = LinearProgram::new(&[2.0, 0.0, 1.0, 0.5, 0.5]);
    mip.set_minimize(true);
    mip.set_lower_bounds(vec![1.0; 5])?;
    mip.add_constraint("x_1 + x_4 >= 2", vec![0.5, 0.0, 0.0, 2.0, 0.0], Relation::Ge, 2.0)?;
    mip.add_constraint(
        "2 + x_4 + 0.5*x_5 <= 5",
        vec![0.0, 2.0, 0.0, 2.0, 1.0],
        Relation::Le,
        5.0,
    )?;
    mip.add_constraint(
        "3*x_3 + 10*x_5 >= 16",
        vec![0.0, 0.0, 3.0, 0.0, 10.0],
        Relation::Ge,
        16.0,
    )?;
    for j in 0..mip.dimension() {
        mip.set_integer(j)?;
    }

    let mut free = LinearProgram::new(&[1.0, 1.0, 1.0]);
    free.set_minimize(true);
    free.add_constraint("x_1 >= 5", vec![1.0, 0.0, 0.0], Relation::Ge, 5.0)?;
    free.add_constraint("x_2 >= 3", vec![0.0, 1.0, 0.0], Relation::Ge, 3.0)?;
    free.add_constraint("x_3 >= 4", vec![0.0, 0.0, 1.0], Relation::Ge, 4.0)?;
    free.set_integers(&[true, true, true])?;

    Ok(vec![
        DemoProgram {
            title: "production plan",
            program: production,
            expected: None,
        },
        DemoProgram {
            title: "small MIP",
            program: mip,
            expected: Some(vec![1.0, 1.0, 2.0, 1.0, 1.0]),
        },
        DemoProgram {
            title: "free integer variables",
            program: free,
            expected: Some(vec![5.0, 3.0, 4.0]),
        },
    ])
}

/// Solves every sample program with one reused assembler
pub fn run(programs: &[DemoProgram]) -> Vec<DemoReport> {
    let mut assembler = Assembler::new(MicrolpPort::new());
    programs
        .iter()
        .map(|demo| {
            let solution = assembler.solve(&demo.program);
            let checks = match (&solution, &demo.expected) {
                (Ok(solution), Some(expected)) => {
                    if solution.values.len() != expected.len() {
                        vec![false]
                    } else {
                        solution
                            .values
                            .iter()
                            .zip(expected)
                            .map(|(v, e)| (v - e).abs() < CHECK_TOLERANCE)
                            .collect()
                    }
                }
                _ => Vec::new(),
            };
            DemoReport {
                title: demo.title,
                solution,
                checks,
            }
        })
        .collect()
}

pub fn print(reports: &[DemoReport]) {
    for report in reports {
        println!("== {} ==", report.title);
        match &report.solution {
            Ok(solution) => {
                println!("Status: {}", solution.status);
                println!("Objective: {:.4}", solution.objective_value);
                for (j, value) in solution.values.iter().enumerate() {
                    let verdict = match report.checks.get(j) {
                        Some(true) => "found",
                        Some(false) => "MISMATCH",
                        None => "",
                    };
                    println!("  x{:<4} {:12.4}  {}", j, value, verdict);
                }
            }
            Err(e) => println!("Solve error: {}", e),
        }
        println!();
    }
}
