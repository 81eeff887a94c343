//! Loss-matrix providers.
//!
//! A [`LossModel`] folds the per-unit-length loss matrices into the pairs
//! of precomputed matrices consumed by the leapfrog recurrences: one pair
//! per interior field update and one pair per terminal. The field engine
//! treats every pair as an opaque algebraic relation, so any substitute
//! implementation of the trait is a valid provider.

mod constant;
mod dispersive;
mod lossless;

pub use constant::ConstantLoss;
pub use dispersive::{DispersiveLoss, FrequencyModel};
pub use lossless::Lossless;

use nalgebra::DMatrix;

use crate::{Error, SimulationParameters};

/// Produces the precomputed matrix pairs for one physical loss model.
///
/// Both methods run once per solve, before time marching begins.
pub trait LossModel {
    /// Pair `(M1, M2)` for the boundary update
    /// `v' = M1 (M2 v ± 2 R i + 2 drive)`.
    ///
    /// `system` names the boundary being factored and appears in error
    /// reports.
    fn terminal_matrices(
        &self,
        capacitance: &DMatrix<f64>,
        conductance: &DMatrix<f64>,
        termination: &DMatrix<f64>,
        params: &SimulationParameters,
        system: &'static str,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), Error>;

    /// Pair `(A1, A2)` for the interior update `f' = A2 f − A1 Δg`, where
    /// `(reactive, dissipative)` is `(C, G)` for the voltage field and
    /// `(L, R)` for the current field.
    fn update_matrices(
        &self,
        reactive: &DMatrix<f64>,
        dissipative: &DMatrix<f64>,
        params: &SimulationParameters,
        system: &'static str,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), Error>;
}

pub(crate) fn invert(matrix: DMatrix<f64>, system: &'static str) -> Result<DMatrix<f64>, Error> {
    matrix
        .try_inverse()
        .ok_or(Error::Singular { matrix: system })
}
