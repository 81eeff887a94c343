//! A framework for simulating signal propagation on coupled multiconductor
//! transmission lines with a finite-difference time-domain leapfrog solver.
//!
//! To get started, refer to the `demos` directory in the main repository.

mod simulation;

pub mod fdtd;
pub mod prelude;

pub use simulation::{
    solve_constant_loss, solve_dispersive_loss, solve_lossless, solve_single_conductor,
    RunDescriptor, Simulation, SimulationParameters,
};

/// Represents an error in the simulation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{matrix} matrix must be square ( {rows}x{cols} given )")]
    NotSquare {
        matrix: &'static str,
        rows: usize,
        cols: usize,
    },
    #[error("{matrix} is {rows}x{cols} but the line has {expected} conductors")]
    DimensionMismatch {
        matrix: &'static str,
        rows: usize,
        cols: usize,
        expected: usize,
    },
    #[error("{matrix}[{index}][{index}] = {value}; \
        per-unit-length diagonal entries must be positive")]
    NonPositiveDiagonal {
        matrix: &'static str,
        index: usize,
        value: f64,
    },
    #[error("the {matrix} matrix is singular")]
    Singular { matrix: &'static str },
    #[error("{name} must be at least 1")]
    EmptyGrid { name: &'static str },
    #[error("{name} must be positive ( {value} given )")]
    InvalidFrequency { name: &'static str, value: f64 },
}

/// Manages actual computations.
pub trait Solver {
    /// Generates voltage and current data for a number of time steps.
    ///
    /// Both returned arrays have one row per conductor and one column per
    /// spatial cell.
    fn compute(
        &mut self,
        desc: ComputeDescriptor,
    ) -> Result<(ndarray::Array2<f64>, ndarray::Array2<f64>), Error>;

    fn dim(&self) -> usize;

    fn zsteps(&self) -> usize;
}

/// Describes how a `Solver` should do computations.
pub struct ComputeDescriptor<'a> {
    pub tsteps: usize,
    pub bar: &'a Option<indicatif::ProgressBar>,
}
