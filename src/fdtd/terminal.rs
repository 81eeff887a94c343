use nalgebra::{DMatrix, DVector, DVectorView};

use crate::Error;

/// Thevenin drive attached to one end of the line.
///
/// Each conductor sees its own drive voltage behind the matched termination
/// resistance derived from the line parameters.
pub struct Termination {
    /// Per-conductor drive voltage [V].
    pub drive: DVector<f64>,
}

impl Termination {
    /// A source stepping every conductor to `amplitude` at t = 0.
    pub fn step(dim: usize, amplitude: f64) -> Self {
        Self {
            drive: DVector::from_element(dim, amplitude),
        }
    }

    /// A passive, undriven end.
    pub fn passive(dim: usize) -> Self {
        Self {
            drive: DVector::zeros(dim),
        }
    }
}

/// Which end of the line a terminal update acts on.
#[derive(Clone, Copy)]
pub(crate) enum LineEnd {
    Source,
    Load,
}

impl LineEnd {
    /// Sign of the adjacent current's contribution to the boundary balance:
    /// current flows out of the source cell and into the load cell.
    fn orientation(self) -> f64 {
        match self {
            LineEnd::Source => -1.0,
            LineEnd::Load => 1.0,
        }
    }

    fn drive_name(self) -> &'static str {
        match self {
            LineEnd::Source => "source drive",
            LineEnd::Load => "load drive",
        }
    }
}

/// Precomputed implicit update for one boundary node.
///
/// Couples the new boundary voltage to its own previous value, the current
/// in the adjacent half cell, and the terminal drive, through the matrix
/// pair produced by the loss model. Built once per solve and read-only
/// during time marching.
pub(crate) struct TerminalUpdate {
    implicit: DMatrix<f64>,
    explicit: DMatrix<f64>,
    resistance: DMatrix<f64>,
    drive: DVector<f64>,
    end: LineEnd,
}

impl TerminalUpdate {
    pub(crate) fn new(
        end: LineEnd,
        termination: Termination,
        resistance: DMatrix<f64>,
        pair: (DMatrix<f64>, DMatrix<f64>),
        dim: usize,
    ) -> Result<Self, Error> {
        if termination.drive.len() != dim {
            return Err(Error::DimensionMismatch {
                matrix: end.drive_name(),
                rows: termination.drive.len(),
                cols: 1,
                expected: dim,
            });
        }

        let (implicit, explicit) = pair;
        Ok(Self {
            implicit,
            explicit,
            resistance,
            drive: termination.drive,
            end,
        })
    }

    /// New boundary voltage from the previous boundary voltage and the
    /// pre-step current in the adjacent half cell.
    #[inline]
    pub(crate) fn next_voltage(
        &self,
        last_volt: DVectorView<f64>,
        last_curr: DVectorView<f64>,
    ) -> DVector<f64> {
        let mut rhs = &self.explicit * last_volt;
        rhs.gemv(
            2.0 * self.end.orientation(),
            &self.resistance,
            &last_curr,
            1.0,
        );
        rhs.axpy(2.0, &self.drive, 1.0);

        &self.implicit * rhs
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    use super::*;

    fn update(end: LineEnd) -> TerminalUpdate {
        TerminalUpdate::new(
            end,
            Termination {
                drive: dvector![3.0],
            },
            DMatrix::from_element(1, 1, 2.0),
            (DMatrix::identity(1, 1), DMatrix::identity(1, 1)),
            1,
        )
        .unwrap()
    }

    #[test]
    fn adjacent_current_flows_out_of_the_source_cell() {
        let volt = dvector![1.0];
        let curr = dvector![0.5];

        // 1*1 - 2*2*0.5 + 2*3 = 5
        let next = update(LineEnd::Source).next_voltage(volt.column(0), curr.column(0));
        assert_relative_eq!(next[0], 5.0);

        // 1*1 + 2*2*0.5 + 2*3 = 9
        let next = update(LineEnd::Load).next_voltage(volt.column(0), curr.column(0));
        assert_relative_eq!(next[0], 9.0);
    }

    #[test]
    fn rejects_a_misshapen_drive_vector() {
        let result = TerminalUpdate::new(
            LineEnd::Load,
            Termination::passive(3),
            DMatrix::identity(2, 2),
            (DMatrix::identity(2, 2), DMatrix::identity(2, 2)),
            2,
        );

        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                matrix: "load drive",
                rows: 3,
                expected: 2,
                ..
            })
        ));
    }
}
