use nalgebra::DMatrix;

use crate::fdtd::losses::{invert, LossModel};
use crate::{Error, SimulationParameters};

/// Provider for an ideal line with no series or shunt loss.
///
/// The loss matrices are assumed to be zero and are ignored; the pairs
/// reduce to the plain leapfrog coefficients, with an identity decay
/// factor on the interior updates.
pub struct Lossless;

impl LossModel for Lossless {
    fn terminal_matrices(
        &self,
        capacitance: &DMatrix<f64>,
        _conductance: &DMatrix<f64>,
        termination: &DMatrix<f64>,
        params: &SimulationParameters,
        system: &'static str,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), Error> {
        let dim = capacitance.nrows();
        let identity = DMatrix::identity(dim, dim);
        let reactive = (params.delta_z / params.delta_t) * (termination * capacitance);

        let implicit = invert(&reactive + &identity, system)?;
        Ok((implicit, reactive - identity))
    }

    fn update_matrices(
        &self,
        reactive: &DMatrix<f64>,
        _dissipative: &DMatrix<f64>,
        params: &SimulationParameters,
        system: &'static str,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), Error> {
        let dim = reactive.nrows();
        let inverse = invert(reactive.clone(), system)?;

        Ok((
            (params.delta_t / params.delta_z) * inverse,
            DMatrix::identity(dim, dim),
        ))
    }
}
