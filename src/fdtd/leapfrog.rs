use nalgebra::{DMatrix, DVector};

use crate::fdtd::losses::LossModel;
use crate::fdtd::terminal::{LineEnd, TerminalUpdate};
use crate::fdtd::{Line, Termination};
use crate::{ComputeDescriptor, Error, Solver};

/// Describes the composition of a `LeapfrogSolver`.
pub struct LeapfrogSolverDescriptor<M: LossModel> {
    pub line: Line,
    pub source: Termination,
    pub load: Termination,
    pub losses: M,
}

/// Marches the voltage and current fields in lockstep on the CPU.
///
/// Every matrix the update recurrences need is derived and inverted once,
/// at construction; the time loop performs matrix-vector products only.
pub struct LeapfrogSolver {
    dim: usize,
    zsteps: usize,
    source: TerminalUpdate,
    load: TerminalUpdate,
    volt_gradient: DMatrix<f64>,
    volt_decay: DMatrix<f64>,
    curr_gradient: DMatrix<f64>,
    curr_decay: DMatrix<f64>,
}

impl LeapfrogSolver {
    #[inline]
    pub fn new<M: LossModel>(desc: LeapfrogSolverDescriptor<M>) -> Result<Self, Error> {
        let line = desc.line;
        let dim = line.dim();
        let zsteps = line.zsteps();
        let params = line.simulation_parameters();
        let matched = line.matched_resistance();

        let (volt_gradient, volt_decay) =
            desc.losses
                .update_matrices(line.capacitance(), line.conductance(), &params, "C")?;
        let (curr_gradient, curr_decay) =
            desc.losses
                .update_matrices(line.inductance(), line.resistance(), &params, "L")?;

        let source_pair = desc.losses.terminal_matrices(
            line.capacitance(),
            line.conductance(),
            &matched,
            &params,
            "source terminal",
        )?;
        let load_pair = desc.losses.terminal_matrices(
            line.capacitance(),
            line.conductance(),
            &matched,
            &params,
            "load terminal",
        )?;

        Ok(Self {
            dim,
            zsteps,
            source: TerminalUpdate::new(
                LineEnd::Source,
                desc.source,
                matched.clone(),
                source_pair,
                dim,
            )?,
            load: TerminalUpdate::new(LineEnd::Load, desc.load, matched, load_pair, dim)?,
            volt_gradient,
            volt_decay,
            curr_gradient,
            curr_decay,
        })
    }
}

impl Solver for LeapfrogSolver {
    #[inline]
    fn compute(
        &mut self,
        desc: ComputeDescriptor,
    ) -> Result<(ndarray::Array2<f64>, ndarray::Array2<f64>), Error> {
        if desc.tsteps < 1 {
            return Err(Error::EmptyGrid { name: "tsteps" });
        }

        let (dim, zsteps) = (self.dim, self.zsteps);

        // fresh fields for this solve only; voltage carries one extra node
        // for the load terminal
        let mut volt = DMatrix::<f64>::zeros(dim, zsteps + 1);
        let mut curr = DMatrix::<f64>::zeros(dim, zsteps);
        let mut diff = DVector::<f64>::zeros(dim);
        let mut next = DVector::<f64>::zeros(dim);

        for _ in 0..desc.tsteps {
            // Voltage phase. Both terminals and every interior node read
            // the pre-step current generation and only their own voltage
            // column, so the in-place column writes cannot leak a new
            // value into a later read.
            let first = self.source.next_voltage(volt.column(0), curr.column(0));
            volt.set_column(0, &first);

            for k in 1..zsteps {
                diff.copy_from(&curr.column(k));
                diff.axpy(-1.0, &curr.column(k - 1), 1.0);
                next.gemv(1.0, &self.volt_decay, &volt.column(k), 0.0);
                next.gemv(-1.0, &self.volt_gradient, &diff, 1.0);
                volt.set_column(k, &next);
            }

            let last = self
                .load
                .next_voltage(volt.column(zsteps), curr.column(zsteps - 1));
            volt.set_column(zsteps, &last);

            // Current phase, reading only the voltage generation updated
            // above.
            for k in 0..zsteps {
                diff.copy_from(&volt.column(k + 1));
                diff.axpy(-1.0, &volt.column(k), 1.0);
                next.gemv(1.0, &self.curr_decay, &curr.column(k), 0.0);
                next.gemv(-1.0, &self.curr_gradient, &diff, 1.0);
                curr.set_column(k, &next);
            }

            if let Some(ref bar) = desc.bar {
                bar.inc(1);
            }
        }

        // the trailing voltage node is a terminal artifact, not one of the
        // returned spatial samples
        let voltages = ndarray::Array2::from_shape_fn((dim, zsteps), |(n, k)| volt[(n, k)]);
        let currents = ndarray::Array2::from_shape_fn((dim, zsteps), |(n, k)| curr[(n, k)]);

        Ok((voltages, currents))
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn zsteps(&self) -> usize {
        self.zsteps
    }
}
