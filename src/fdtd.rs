pub mod losses;

mod leapfrog;
mod line;
mod terminal;

pub use leapfrog::{LeapfrogSolver, LeapfrogSolverDescriptor};
pub use line::{Line, LineDescriptor, COURANT_MARGIN, SPATIAL_STEP};
pub use terminal::Termination;
