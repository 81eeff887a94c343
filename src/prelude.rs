//! Includes commonly used library components.

pub use crate::fdtd::losses::{ConstantLoss, DispersiveLoss, FrequencyModel, LossModel, Lossless};
pub use crate::fdtd::{
    LeapfrogSolver, LeapfrogSolverDescriptor, Line, LineDescriptor, Termination,
};
pub use crate::{
    solve_constant_loss, solve_dispersive_loss, solve_lossless, solve_single_conductor,
    ComputeDescriptor, Error, RunDescriptor, Simulation, SimulationParameters, Solver,
};
