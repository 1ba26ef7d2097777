use hooke::nalgebra as na;
use hooke::{Function, OptimizerDriver, Problem, Termination};
use na::{Dyn, IsContiguous};

// Woods function from "Testing Unconstrained Optimization Software" by Moré,
// Garbow and Hillstrom. The minimum is f(1, 1, 1, 1) = 0.
struct Woods;

impl Problem for Woods {
    type Field = f64;

    fn dim(&self) -> usize {
        4
    }
}

impl Function for Woods {
    fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
    {
        let s1 = x[1] - x[0] * x[0];
        let s2 = 1.0 - x[0];
        let s3 = x[1] - 1.0;
        let t1 = x[3] - x[2] * x[2];
        let t2 = 1.0 - x[2];
        let t3 = x[3] - 1.0;
        let t4 = s3 + t3;
        let t5 = s3 - t3;

        100.0 * (s1 * s1)
            + s2 * s2
            + 90.0 * (t1 * t1)
            + t2 * t2
            + 10.0 * (t4 * t4)
            + t5 * t5 / 10.0
    }
}

fn main() -> Result<(), String> {
    let f = Woods;

    // Larger shrink factors (such as 0.6) get stuck near a saddle point of this
    // function.
    let mut optimizer = OptimizerDriver::builder(&f)
        .with_initial(vec![-3.0, -1.0, -3.0, -1.0])
        .with_rho(0.5)
        .with_epsilon(1e-6)
        .with_max_iters(5000)
        .build()
        .map_err(|error| format!("{error}"))?;

    let fx = optimizer.init().map_err(|error| format!("{error}"))?;
    println!(
        "initial\tevals = {}\tf(x) = {:e}\tx = {:?}",
        optimizer.evals(),
        fx,
        optimizer.x()
    );

    let report = optimizer
        .run(|state| {
            println!(
                "iter = {}\tevals = {}\tf(x) = {:e}\tx = {:?}",
                state.iter(),
                state.evals(),
                state.fx(),
                state.x()
            );
        })
        .map_err(|error| format!("{error}"))?;

    println!(
        "HOOKE USED {} ITERATIONS, AND RETURNED\nx = {:?}\tf(x) = {:e}",
        report.iters(),
        report.x(),
        report.fx()
    );

    if report.termination() == Termination::Converged && report.fx() <= 1e-6 {
        Ok(())
    } else {
        Err("did not converge".to_string())
    }
}
