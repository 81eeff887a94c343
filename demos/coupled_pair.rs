use mtline::prelude::*;

use nalgebra::{dmatrix, dvector, DMatrix};
use physical_constants::SPEED_OF_LIGHT_IN_VACUUM;

fn main() {
    // per-unit-length parameters of a 50 Ω trace pair in FR-4, derived
    // from the vacuum wave velocity
    let epsilon_r = 4.3;
    let velocity = SPEED_OF_LIGHT_IN_VACUUM / f64::sqrt(epsilon_r);
    let z0 = 50.0; // [Ω]

    let inductance = z0 / velocity; // [H / m]
    let capacitance = 1.0 / (z0 * velocity); // [F / m]

    // 2 % inductive and 0.5 % capacitive coupling between the traces
    let l = dmatrix![
        inductance, 0.02 * inductance;
        0.02 * inductance, inductance
    ];
    let c = dmatrix![
        capacitance, -0.005 * capacitance;
        -0.005 * capacitance, capacitance
    ];

    // copper and dielectric losses
    let r = DMatrix::from_diagonal(&dvector![5.0, 5.0]); // [Ω / m]
    let g = DMatrix::from_diagonal(&dvector![1e-4, 1e-4]); // [S / m]

    let zsteps = 200;

    let line = Line::new(LineDescriptor {
        zsteps,
        inductance: l,
        capacitance: c,
        resistance: Some(r),
        conductance: Some(g),
    })
    .unwrap();

    let sim_params = line.simulation_parameters();
    println!(
        "\n-- General Simulation Info --\n\
        # of cells:   {}\n\
        Δz:           {:<9.2e} m\n\
        Δt:           {:<9.2e} s\n",
        zsteps, sim_params.delta_z, sim_params.delta_t,
    );

    let mut simulation = Simulation::new(
        LeapfrogSolver::new(LeapfrogSolverDescriptor {
            line,
            // drive the aggressor trace only, with a 3.3 V step
            source: Termination {
                drive: dvector![3.3, 0.0],
            },
            load: Termination::passive(2),
            losses: ConstantLoss,
        })
        .unwrap(),
    );

    let (voltages, _) = simulation
        .run(RunDescriptor {
            tsteps: 150,
            verbose: true,
        })
        .unwrap();

    println!("\n-- Crosstalk Profile --");
    for k in (0..zsteps).step_by(20) {
        println!(
            "z = {:>5.1} mm   aggressor = {:>7.4} V   victim = {:>8.5} V",
            k as f64 * sim_params.delta_z * 1e3,
            voltages[(0, k)],
            voltages[(1, k)],
        );
    }
}
