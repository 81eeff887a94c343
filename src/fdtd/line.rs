use nalgebra::{DMatrix, DVector};

use crate::{Error, SimulationParameters};

/// Fixed spatial step of the discretized line [m].
pub const SPATIAL_STEP: f64 = 1e-3;

/// Safety factor applied to the Courant limit when deriving the timestep.
pub const COURANT_MARGIN: f64 = 0.95;

/// Describes the composition of a `Line`.
pub struct LineDescriptor {
    /// Number of spatial cells along the line.
    pub zsteps: usize,
    /// Per-unit-length inductance matrix [H/m].
    pub inductance: DMatrix<f64>,
    /// Per-unit-length capacitance matrix [F/m].
    pub capacitance: DMatrix<f64>,
    /// Per-unit-length series resistance matrix [Ω/m].
    pub resistance: Option<DMatrix<f64>>,
    /// Per-unit-length shunt conductance matrix [S/m].
    pub conductance: Option<DMatrix<f64>>,
}

/// A uniform multiconductor transmission line.
///
/// All per-unit-length matrices are N×N, where N is the number of signal
/// conductors counted against the common reference conductor. Construction
/// validates shapes and the physical invariants the grid derivation relies
/// on, so the derived quantities below are infallible.
pub struct Line {
    zsteps: usize,
    inductance: DMatrix<f64>,
    capacitance: DMatrix<f64>,
    resistance: DMatrix<f64>,
    conductance: DMatrix<f64>,
}

impl Line {
    /// Creates a new `Line` instance.
    ///
    /// Omitted resistance/conductance matrices default to zero. Rejects an
    /// empty grid, inconsistent matrix shapes, and non-positive diagonal
    /// entries of L or C (which would leave the propagation velocity
    /// undefined) before any matrix is inverted.
    pub fn new(desc: LineDescriptor) -> Result<Self, Error> {
        if desc.zsteps < 1 {
            return Err(Error::EmptyGrid { name: "zsteps" });
        }

        let dim = check_square("inductance", &desc.inductance)?;
        if dim < 1 {
            return Err(Error::EmptyGrid { name: "conductor count" });
        }
        check_dim("capacitance", &desc.capacitance, dim)?;
        check_positive_diagonal("inductance", &desc.inductance)?;
        check_positive_diagonal("capacitance", &desc.capacitance)?;

        let resistance = match desc.resistance {
            Some(resistance) => {
                check_dim("resistance", &resistance, dim)?;
                resistance
            }
            None => DMatrix::zeros(dim, dim),
        };
        let conductance = match desc.conductance {
            Some(conductance) => {
                check_dim("conductance", &conductance, dim)?;
                conductance
            }
            None => DMatrix::zeros(dim, dim),
        };

        Ok(Self {
            zsteps: desc.zsteps,
            inductance: desc.inductance,
            capacitance: desc.capacitance,
            resistance,
            conductance,
        })
    }

    /// Number of signal conductors.
    #[inline]
    pub fn dim(&self) -> usize {
        self.inductance.nrows()
    }

    /// Number of spatial cells.
    #[inline]
    pub fn zsteps(&self) -> usize {
        self.zsteps
    }

    #[inline]
    pub fn inductance(&self) -> &DMatrix<f64> {
        &self.inductance
    }

    #[inline]
    pub fn capacitance(&self) -> &DMatrix<f64> {
        &self.capacitance
    }

    #[inline]
    pub fn resistance(&self) -> &DMatrix<f64> {
        &self.resistance
    }

    #[inline]
    pub fn conductance(&self) -> &DMatrix<f64> {
        &self.conductance
    }

    /// Fastest per-conductor propagation velocity along the line.
    ///
    /// Taken across the diagonal entries only; on strongly coupled lines
    /// the fastest propagating mode can exceed this bound and eat into the
    /// Courant margin.
    #[inline]
    pub fn max_phase_velocity(&self) -> f64 {
        (0..self.dim())
            .map(|k| f64::sqrt(self.inductance[(k, k)] * self.capacitance[(k, k)]).recip())
            .fold(0.0, f64::max)
    }

    /// Per-conductor matched termination resistance, on the diagonal.
    ///
    /// Terminations are decoupled even when the line itself is coupled, so
    /// the off-diagonal entries are zero.
    pub fn matched_resistance(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&DVector::from_fn(self.dim(), |k, _| {
            f64::sqrt(self.inductance[(k, k)] / self.capacitance[(k, k)])
        }))
    }

    /// Derives the grid parameters satisfying the Courant stability margin.
    pub fn simulation_parameters(&self) -> SimulationParameters {
        let delta_z = SPATIAL_STEP;

        SimulationParameters {
            delta_z,
            delta_t: COURANT_MARGIN * delta_z / self.max_phase_velocity(),
        }
    }
}

fn check_square(matrix: &'static str, m: &DMatrix<f64>) -> Result<usize, Error> {
    if m.nrows() != m.ncols() {
        return Err(Error::NotSquare {
            matrix,
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }

    Ok(m.nrows())
}

fn check_dim(matrix: &'static str, m: &DMatrix<f64>, expected: usize) -> Result<(), Error> {
    if m.nrows() != expected || m.ncols() != expected {
        return Err(Error::DimensionMismatch {
            matrix,
            rows: m.nrows(),
            cols: m.ncols(),
            expected,
        });
    }

    Ok(())
}

fn check_positive_diagonal(matrix: &'static str, m: &DMatrix<f64>) -> Result<(), Error> {
    for index in 0..m.nrows() {
        let value = m[(index, index)];
        if !(value > 0.0) {
            return Err(Error::NonPositiveDiagonal {
                matrix,
                index,
                value,
            });
        }
    }

    Ok(())
}
