use indicatif::ProgressBar;
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

use crate::fdtd::losses::{ConstantLoss, DispersiveLoss, LossModel, Lossless};
use crate::fdtd::{LeapfrogSolver, LeapfrogSolverDescriptor, Line, LineDescriptor, Termination};
use crate::{ComputeDescriptor, Error, Solver};

/// Simulation specific parameters.
#[derive(Copy, Clone, Debug)]
pub struct SimulationParameters {
    /// The physical size of each spatial step along the line [m].
    pub delta_z: f64,
    /// The length of each temporal step in the simulation [s].
    pub delta_t: f64,
}

/// Describes a simulation run.
pub struct RunDescriptor {
    /// The number of leapfrog time steps to march.
    pub tsteps: usize,
    /// Whether or not to print information to the console.
    pub verbose: bool,
}

/// The main `struct` of the framework.
pub struct Simulation<S: Solver> {
    solver: S,
}

impl<S: Solver> Simulation<S> {
    /// Creates a new `Simulation` instance.
    #[inline]
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    /// Does a computational run.
    ///
    /// Returns the voltage and current fields after the last time step,
    /// one row per conductor and one column per spatial cell.
    #[inline]
    pub fn run(&mut self, desc: RunDescriptor) -> Result<(Array2<f64>, Array2<f64>), Error> {
        let bar = if desc.verbose {
            println!("# of time steps: {}", desc.tsteps);
            Some(ProgressBar::new(desc.tsteps as u64))
        } else {
            None
        };

        let fields = self.solver.compute(ComputeDescriptor {
            tsteps: desc.tsteps,
            bar: &bar,
        })?;

        if let Some(ref bar) = bar {
            bar.finish();
        }

        Ok(fields)
    }
}

fn run_matched<M: LossModel>(
    line: Line,
    losses: M,
    tsteps: usize,
    source_amplitude: f64,
) -> Result<(Array2<f64>, Array2<f64>), Error> {
    let dim = line.dim();
    let solver = LeapfrogSolver::new(LeapfrogSolverDescriptor {
        line,
        source: Termination::step(dim, source_amplitude),
        load: Termination::passive(dim),
        losses,
    })?;

    Simulation::new(solver).run(RunDescriptor {
        tsteps,
        verbose: false,
    })
}

/// Solves a lossless N-conductor line, stepped to `source_amplitude` on
/// every conductor at t = 0 into matched terminations at both ends.
pub fn solve_lossless(
    zsteps: usize,
    tsteps: usize,
    inductance: DMatrix<f64>,
    capacitance: DMatrix<f64>,
    source_amplitude: f64,
) -> Result<(Array2<f64>, Array2<f64>), Error> {
    let line = Line::new(LineDescriptor {
        zsteps,
        inductance,
        capacitance,
        resistance: None,
        conductance: None,
    })?;

    run_matched(line, Lossless, tsteps, source_amplitude)
}

/// Solves an N-conductor line with frequency-independent series resistance
/// and shunt conductance.
pub fn solve_constant_loss(
    zsteps: usize,
    tsteps: usize,
    inductance: DMatrix<f64>,
    capacitance: DMatrix<f64>,
    resistance: DMatrix<f64>,
    conductance: DMatrix<f64>,
    source_amplitude: f64,
) -> Result<(Array2<f64>, Array2<f64>), Error> {
    let line = Line::new(LineDescriptor {
        zsteps,
        inductance,
        capacitance,
        resistance: Some(resistance),
        conductance: Some(conductance),
    })?;

    run_matched(line, ConstantLoss, tsteps, source_amplitude)
}

/// Solves an N-conductor line whose losses follow the frequency scaling
/// law selected by `losses`.
#[allow(clippy::too_many_arguments)]
pub fn solve_dispersive_loss(
    zsteps: usize,
    tsteps: usize,
    inductance: DMatrix<f64>,
    capacitance: DMatrix<f64>,
    resistance: DMatrix<f64>,
    conductance: DMatrix<f64>,
    losses: DispersiveLoss,
    source_amplitude: f64,
) -> Result<(Array2<f64>, Array2<f64>), Error> {
    let line = Line::new(LineDescriptor {
        zsteps,
        inductance,
        capacitance,
        resistance: Some(resistance),
        conductance: Some(conductance),
    })?;

    run_matched(line, losses, tsteps, source_amplitude)
}

/// Solves the two-conductor case: one signal conductor against its
/// reference, lossless and matched.
///
/// This is the N = 1 specialization of [`solve_lossless`] and shares its
/// code path through 1×1 parameter matrices.
pub fn solve_single_conductor(
    zsteps: usize,
    tsteps: usize,
    inductance: f64,
    capacitance: f64,
    source_amplitude: f64,
) -> Result<(Array1<f64>, Array1<f64>), Error> {
    let (voltages, currents) = solve_lossless(
        zsteps,
        tsteps,
        DMatrix::from_element(1, 1, inductance),
        DMatrix::from_element(1, 1, capacitance),
        source_amplitude,
    )?;

    Ok((voltages.row(0).to_owned(), currents.row(0).to_owned()))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::{dmatrix, DMatrix};

    use crate::fdtd::losses::FrequencyModel;

    use super::*;

    #[test]
    fn matched_step_settles_at_half_the_drive() {
        // 50 Ω PCB trace: l = 250 nH/m, c = 100 pF/m
        let (volt, curr) = solve_single_conductor(100, 50, 2.5e-7, 1e-10, 25.0).unwrap();

        // source node settles near vs/2; the implicit boundary rings for
        // the first few steps before the reflectionless plateau forms
        assert_abs_diff_eq!(volt[0], 12.5, epsilon = 0.5);
        for k in 0..=30 {
            assert_abs_diff_eq!(volt[k], 12.5, epsilon = 2.0);
        }

        // nothing beyond the causal front, nothing above the drive
        for k in 55..100 {
            assert_eq!(volt[k], 0.0);
        }
        assert!(volt.iter().all(|v| v.abs() <= 25.0));

        // plateau current is vs / (2 Z0)
        assert_abs_diff_eq!(curr[0], 0.25, epsilon = 5e-3);
    }

    #[test]
    fn wave_propagates_at_the_line_velocity() {
        let (volt, _) = solve_single_conductor(100, 50, 2.5e-7, 1e-10, 25.0).unwrap();

        // v = 2e8 m/s and dT = 0.95 dZ / v, so the front advances 0.95
        // cells per step: after 50 steps it sits near node 47
        assert!(volt[40] > 6.0);
        assert_eq!(volt[52], 0.0);
    }

    #[test]
    fn single_conductor_matches_the_matrix_entry_point() {
        let (volt_s, curr_s) = solve_single_conductor(40, 30, 2.5e-7, 1e-10, 25.0).unwrap();
        let (volt_m, curr_m) = solve_lossless(
            40,
            30,
            DMatrix::from_element(1, 1, 2.5e-7),
            DMatrix::from_element(1, 1, 1e-10),
            25.0,
        )
        .unwrap();

        for k in 0..40 {
            assert_eq!(volt_s[k], volt_m[(0, k)]);
            assert_eq!(curr_s[k], curr_m[(0, k)]);
        }
    }

    #[test]
    fn zero_losses_round_trip_to_the_lossless_solver() {
        let (volt_ideal, curr_ideal) = solve_lossless(
            100,
            50,
            DMatrix::from_element(1, 1, 2.5e-7),
            DMatrix::from_element(1, 1, 1e-10),
            25.0,
        )
        .unwrap();
        let (volt_lossy, curr_lossy) = solve_constant_loss(
            100,
            50,
            DMatrix::from_element(1, 1, 2.5e-7),
            DMatrix::from_element(1, 1, 1e-10),
            DMatrix::zeros(1, 1),
            DMatrix::zeros(1, 1),
            25.0,
        )
        .unwrap();

        for k in 0..100 {
            assert_abs_diff_eq!(volt_ideal[(0, k)], volt_lossy[(0, k)], epsilon = 1e-8);
            assert_abs_diff_eq!(curr_ideal[(0, k)], curr_lossy[(0, k)], epsilon = 1e-11);
        }
    }

    #[test]
    fn losses_attenuate_the_wave_down_the_line() {
        let (ideal, _) = solve_single_conductor(100, 120, 2.5e-7, 1e-10, 25.0).unwrap();
        let (lossy, _) = solve_constant_loss(
            100,
            120,
            DMatrix::from_element(1, 1, 2.5e-7),
            DMatrix::from_element(1, 1, 1e-10),
            DMatrix::from_element(1, 1, 200.0),
            DMatrix::from_element(1, 1, 1e-3),
            25.0,
        )
        .unwrap();

        // far down the line the series loss has eaten a visible part of
        // the wave (≈ 1.4 V at 80 mm for 200 Ω/m on a 50 Ω trace)
        assert_abs_diff_eq!(ideal[80], 12.5, epsilon = 2.0);
        assert!(lossy[(0, 80)] < ideal[80] - 1.0);
        assert!(lossy[(0, 80)] > 0.0);
    }

    #[test]
    fn dispersive_solver_runs_and_stays_bounded() {
        let losses = DispersiveLoss {
            model: FrequencyModel::SkinEffect,
            frequency: 4e9,
            reference_frequency: 1e9,
        };
        let (volt, _) = solve_dispersive_loss(
            60,
            80,
            DMatrix::from_element(1, 1, 2.5e-7),
            DMatrix::from_element(1, 1, 1e-10),
            DMatrix::from_element(1, 1, 5.0),
            DMatrix::from_element(1, 1, 1e-3),
            losses,
            25.0,
        )
        .unwrap();

        assert!(volt.iter().all(|v| v.abs() <= 25.0));
        assert!(volt[(0, 0)] > 10.0);
    }

    #[test]
    fn invalid_inputs_are_rejected_at_the_entry_points() {
        let result = solve_lossless(
            0,
            50,
            DMatrix::from_element(1, 1, 2.5e-7),
            DMatrix::from_element(1, 1, 1e-10),
            25.0,
        );
        assert!(matches!(result, Err(Error::EmptyGrid { name: "zsteps" })));

        let result = solve_single_conductor(100, 0, 2.5e-7, 1e-10, 25.0);
        assert!(matches!(result, Err(Error::EmptyGrid { name: "tsteps" })));

        let result = solve_single_conductor(100, 50, 2.5e-7, -1e-10, 25.0);
        assert!(matches!(
            result,
            Err(Error::NonPositiveDiagonal {
                matrix: "capacitance",
                ..
            })
        ));

        // a coupled capacitance matrix with identical rows cannot be
        // inverted for the interior update
        let result = solve_lossless(
            10,
            10,
            dmatrix![2.5e-7, 0.0; 0.0, 2.5e-7],
            dmatrix![1e-10, 1e-10; 1e-10, 1e-10],
            25.0,
        );
        assert!(matches!(result, Err(Error::Singular { matrix: "C" })));
    }
}
