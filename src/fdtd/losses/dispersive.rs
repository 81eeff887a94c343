use nalgebra::DMatrix;

use crate::fdtd::losses::{ConstantLoss, LossModel};
use crate::{Error, SimulationParameters};

/// Frequency scaling law applied to the per-unit-length loss matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyModel {
    /// Loss growing with the square root of frequency, as for the skin
    /// depth of a good conductor.
    SkinEffect,
    /// Loss growing linearly with frequency, as for a dielectric with a
    /// constant loss tangent.
    DielectricLossTangent,
}

/// Provider for frequency-dependent losses.
///
/// The supplied loss matrices are scaled from `reference_frequency` to
/// `frequency` according to the selected model, then folded exactly like
/// [`ConstantLoss`]. The pairs are built once, before marching begins, so
/// a single run sees no dispersion; the evaluation frequency stands in for
/// the dominant frequency content of the excitation.
pub struct DispersiveLoss {
    pub model: FrequencyModel,
    /// Frequency the loss matrices are evaluated at [Hz].
    pub frequency: f64,
    /// Frequency the supplied R and G were measured at [Hz].
    pub reference_frequency: f64,
}

impl DispersiveLoss {
    fn scale(&self) -> Result<f64, Error> {
        if !(self.frequency > 0.0) {
            return Err(Error::InvalidFrequency {
                name: "frequency",
                value: self.frequency,
            });
        }
        if !(self.reference_frequency > 0.0) {
            return Err(Error::InvalidFrequency {
                name: "reference_frequency",
                value: self.reference_frequency,
            });
        }

        let ratio = self.frequency / self.reference_frequency;
        Ok(match self.model {
            FrequencyModel::SkinEffect => ratio.sqrt(),
            FrequencyModel::DielectricLossTangent => ratio,
        })
    }
}

impl LossModel for DispersiveLoss {
    fn terminal_matrices(
        &self,
        capacitance: &DMatrix<f64>,
        conductance: &DMatrix<f64>,
        termination: &DMatrix<f64>,
        params: &SimulationParameters,
        system: &'static str,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), Error> {
        let scaled = conductance * self.scale()?;
        ConstantLoss.terminal_matrices(capacitance, &scaled, termination, params, system)
    }

    fn update_matrices(
        &self,
        reactive: &DMatrix<f64>,
        dissipative: &DMatrix<f64>,
        params: &SimulationParameters,
        system: &'static str,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), Error> {
        let scaled = dissipative * self.scale()?;
        ConstantLoss.update_matrices(reactive, &scaled, params, system)
    }
}
