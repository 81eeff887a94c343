use nalgebra::DMatrix;

use crate::fdtd::losses::{invert, LossModel};
use crate::{Error, SimulationParameters};

/// Provider folding frequency-independent series and shunt losses.
///
/// Each loss term enters through a trapezoidal discretization: half of it
/// is taken at the old time level and half at the new one. With zero loss
/// matrices the pairs coincide with the [`Lossless`](super::Lossless) ones
/// up to round-off.
pub struct ConstantLoss;

impl LossModel for ConstantLoss {
    fn terminal_matrices(
        &self,
        capacitance: &DMatrix<f64>,
        conductance: &DMatrix<f64>,
        termination: &DMatrix<f64>,
        params: &SimulationParameters,
        system: &'static str,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), Error> {
        let dim = capacitance.nrows();
        let identity = DMatrix::identity(dim, dim);
        let reactive = (params.delta_z / params.delta_t) * (termination * capacitance);
        let dissipative = (0.5 * params.delta_z) * (termination * conductance);

        let implicit = invert(&reactive + &identity + &dissipative, system)?;
        Ok((implicit, reactive - identity - dissipative))
    }

    fn update_matrices(
        &self,
        reactive: &DMatrix<f64>,
        dissipative: &DMatrix<f64>,
        params: &SimulationParameters,
        system: &'static str,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), Error> {
        let stiffness = (params.delta_z / params.delta_t) * reactive;
        let damping = (0.5 * params.delta_z) * dissipative;

        let gradient = invert(&stiffness + &damping, system)?;
        let decay = &gradient * (stiffness - damping);
        Ok((gradient, decay))
    }
}
