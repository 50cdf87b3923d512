mod assembler;
mod coordinate;
mod error;
mod port;
mod ports;
mod problem;
mod solution;

pub use assembler::{
    Assembler, SolveOptions, column_bound, coordinate_list, count_nonzeros, row_bound,
};
pub use coordinate::CoordinateList;
pub use error::SolveError;
pub use port::{Bound, BoundKind, Direction, SolverPort, VariableKind};
pub use ports::{MicrolpPort, PortCall, RecordingPort};
pub use problem::{Constraint, FEASIBILITY_TOLERANCE, LinearProgram, Relation};
pub use solution::{Solution, SolveStatus};
