use hooke::nalgebra as na;
use hooke::{Function, OptimizerDriver, Problem, Termination};
use na::{Dyn, IsContiguous};

// https://en.wikipedia.org/wiki/Rosenbrock_function
struct Rosenbrock {
    a: f64,
    b: f64,
}

impl Problem for Rosenbrock {
    type Field = f64;

    fn dim(&self) -> usize {
        2
    }
}

impl Function for Rosenbrock {
    fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
    {
        (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
    }
}

fn main() -> Result<(), String> {
    let f = Rosenbrock { a: 1.0, b: 100.0 };
    let mut optimizer = OptimizerDriver::builder(&f)
        .with_initial(vec![-1.2, 1.0])
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
                "iter = {}\tevals = {}\tstep = {:e}\tf(x) = {:e}\tx = {:?}",
                state.iter(),
                state.evals(),
                state.step_length(),
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

    match report.termination() {
        Termination::Converged => Ok(()),
        Termination::MaxIterationsReached => Err("did not converge".to_string()),
    }
}
