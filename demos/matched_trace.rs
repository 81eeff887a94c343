use mtline::prelude::*;

use nalgebra::DMatrix;

fn main() {
    let inductance = 2.5e-7; // [H / m]
    let capacitance = 1e-10; // [F / m]

    let zsteps = 100;
    let tsteps = 50;

    // a matched 50 Ω PCB trace driven by a 25 V step
    let line = Line::new(LineDescriptor {
        zsteps,
        inductance: DMatrix::from_element(1, 1, inductance),
        capacitance: DMatrix::from_element(1, 1, capacitance),
        resistance: None,
        conductance: None,
    })
    .unwrap();

    let sim_params = line.simulation_parameters();
    println!(
        "\n-- General Simulation Info --\n\
        # of cells:   {}\n\
        Δz:           {:<9.2e} m\n\
        Δt:           {:<9.2e} s\n\
        Z0:           {:<9.2} Ω\n",
        zsteps,
        sim_params.delta_z,
        sim_params.delta_t,
        line.matched_resistance()[(0, 0)],
    );

    let mut simulation = Simulation::new(
        LeapfrogSolver::new(LeapfrogSolverDescriptor {
            line,
            source: Termination::step(1, 25.0),
            load: Termination::passive(1),
            losses: Lossless,
        })
        .unwrap(),
    );

    let (voltages, currents) = simulation
        .run(RunDescriptor {
            tsteps,
            verbose: true,
        })
        .unwrap();

    println!("\n-- Fields After {} Steps --", tsteps);
    for k in (0..zsteps).step_by(10) {
        println!(
            "z = {:>5.1} mm   v = {:>7.3} V   i = {:>7.4} A",
            k as f64 * sim_params.delta_z * 1e3,
            voltages[(0, k)],
            currents[(0, k)],
        );
    }
}
