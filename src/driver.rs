//! High-level API for optimization.
//!
//! This module contains the driver that encapsulates all internal state and
//! provides a simple API to run the iterative process, enforcing the
//! termination policy of the [Hooke-Jeeves](crate::algo::hooke_jeeves)
//! method: the process stops when the step length drops to or below
//! `epsilon` or when the maximum number of iterations is reached.
//!
//! The simplest way of using the driver is to initialize it with the defaults:
//!
//! ```rust
//! use hooke::{from_fn, OptimizerDriver};
//!
//! let f = from_fn(2, |x: &[f64]| x[0].powi(2) + x[1].powi(2));
//!
//! let mut optimizer = OptimizerDriver::new(&f).expect("valid problem");
//! ```
//!
//! If you need to specify additional settings, use the builder:
//!
//! ```rust
//! use hooke::{from_fn, OptimizerDriver};
//!
//! let f = from_fn(2, |x: &[f64]| x[0].powi(2) + x[1].powi(2));
//!
//! let mut optimizer = OptimizerDriver::builder(&f)
//!     .with_initial(vec![10.0, -10.0])
//!     .with_rho(0.6)
//!     .with_epsilon(1e-8)
//!     .with_max_iters(1000)
//!     .build()
//!     .expect("valid settings");
//! ```
//!
//! Once you have the optimizer, you can run it until termination, observing
//! every iteration:
//!
//! ```rust
//! # use hooke::{from_fn, OptimizerDriver};
//! #
//! # let f = from_fn(2, |x: &[f64]| x[0].powi(2) + x[1].powi(2));
//! #
//! # let mut optimizer = OptimizerDriver::builder(&f)
//! #     .with_initial(vec![10.0, -10.0])
//! #     .build()
//! #     .unwrap();
//! #
//! let report = optimizer
//!     .run(|state| println!("evals = {}\tf(x) = {}", state.evals(), state.fx()))
//!     .expect("no optimizer error");
//!
//! println!("{} iterations, x = {:?}", report.iters(), report.x());
//! ```
//!
//! If you need more control over the iteration process, you can do the
//! iterations manually:
//!
//! ```rust
//! # use hooke::{from_fn, OptimizerDriver};
//! #
//! # let f = from_fn(2, |x: &[f64]| x[0].powi(2) + x[1].powi(2));
//! #
//! # let mut optimizer = OptimizerDriver::new(&f).unwrap();
//! #
//! while optimizer.status().is_none() {
//!     let (x, fx) = optimizer.next().expect("no optimizer error");
//!     // ...
//! #   break;
//! }
//! ```

use getset::{CopyGetters, Getters};
use log::debug;
use nalgebra::{convert, DimName, Dyn, OVector, U1};
use thiserror::Error;

use crate::{
    algo::{
        hooke_jeeves::{HookeJeevesError, HookeJeevesOptions, OptionsError},
        HookeJeeves,
    },
    check_dim, DimensionError, Function, Optimizer, Problem,
};

/// Default maximum number of iterations.
pub const DEFAULT_MAX_ITERS: usize = 5000;

/// Error caused by invalid settings of the driver.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// Invalid dimensionality of the problem or the initial point.
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    /// Invalid options of the algorithm.
    #[error(transparent)]
    Options(#[from] OptionsError),
    /// The maximum number of iterations is zero.
    #[error("maximum number of iterations must be positive")]
    InvalidMaxIters,
}

/// Error returned from [`minimize`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Invalid settings.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// Error during the optimization.
    #[error(transparent)]
    Optimizer(#[from] HookeJeevesError),
}

/// Reason of the optimization process termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The step length dropped to or below `epsilon`.
    Converged,
    /// The maximum number of iterations was reached before convergence.
    MaxIterationsReached,
}

/// Builder for the [`OptimizerDriver`].
pub struct OptimizerBuilder<'a, F: Problem> {
    f: &'a F,
    x0: Vec<F::Field>,
    options: HookeJeevesOptions<F>,
    max_iters: usize,
}

impl<'a, F: Problem> OptimizerBuilder<'a, F> {
    fn new(f: &'a F) -> Self {
        Self {
            f,
            x0: vec![convert(0.0); f.dim()],
            options: HookeJeevesOptions::default(),
            max_iters: DEFAULT_MAX_ITERS,
        }
    }

    /// Sets the initial point from which the iterative process starts.
    pub fn with_initial(mut self, x0: Vec<F::Field>) -> Self {
        self.x0 = x0;
        self
    }

    /// Sets all options of the algorithm at once.
    pub fn with_options(mut self, options: HookeJeevesOptions<F>) -> Self {
        self.options = options;
        self
    }

    /// Sets the geometric shrink factor of the steps.
    pub fn with_rho(mut self, rho: F::Field) -> Self {
        self.options.set_rho(rho);
        self
    }

    /// Sets the tolerance of the step length for convergence.
    pub fn with_epsilon(mut self, epsilon: F::Field) -> Self {
        self.options.set_epsilon(epsilon);
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Validates the settings and builds the [`OptimizerDriver`].
    pub fn build(self) -> Result<OptimizerDriver<'a, F>, BuildError> {
        let Self {
            f,
            x0,
            options,
            max_iters,
        } = self;

        let dim = f.dim();
        check_dim(dim)?;

        if x0.len() != dim {
            return Err(DimensionError::Mismatch {
                expected: dim,
                actual: x0.len(),
            }
            .into());
        }

        options.validate()?;

        if max_iters == 0 {
            return Err(BuildError::InvalidMaxIters);
        }

        let algo = HookeJeeves::with_options(f, options);

        Ok(OptimizerDriver {
            f,
            algo,
            x: OVector::from_vec_generic(Dyn(dim), U1::name(), x0),
            fx: convert(f64::INFINITY),
            iter: 0,
            max_iters,
        })
    }
}

/// The driver for the process of minimizing a function.
///
/// For default settings, use [`OptimizerDriver::new`]. For more flexibility,
/// use [`OptimizerDriver::builder`]. For the usage of the driver, see
/// [module](self) documentation.
pub struct OptimizerDriver<'a, F: Problem> {
    f: &'a F,
    algo: HookeJeeves<F>,
    x: OVector<F::Field, Dyn>,
    fx: F::Field,
    iter: usize,
    max_iters: usize,
}

impl<'a, F: Problem> OptimizerDriver<'a, F> {
    /// Returns the builder for specifying additional settings.
    pub fn builder(f: &'a F) -> OptimizerBuilder<'a, F> {
        OptimizerBuilder::new(f)
    }

    /// Initializes the driver with the default settings.
    pub fn new(f: &'a F) -> Result<Self, BuildError> {
        OptimizerDriver::builder(f).build()
    }

    /// Returns reference to the current point.
    pub fn x(&self) -> &[F::Field] {
        self.x.as_slice()
    }

    /// Returns the current function value.
    ///
    /// Before the first evaluation, the value is infinity.
    pub fn fx(&self) -> F::Field {
        self.fx
    }

    /// Returns the number of iterations done.
    pub fn iter(&self) -> usize {
        self.iter
    }

    /// Returns the number of function evaluations done.
    pub fn evals(&self) -> usize {
        self.algo.evals()
    }

    /// Returns the current step length.
    pub fn step_length(&self) -> F::Field {
        self.algo.step_length()
    }

    /// Returns the reason of termination if the process is over.
    pub fn status(&self) -> Option<Termination> {
        if self.algo.is_converged() {
            Some(Termination::Converged)
        } else if self.iter >= self.max_iters {
            Some(Termination::MaxIterationsReached)
        } else {
            None
        }
    }

    fn state(&self) -> OptimizerIterState<'_, F> {
        OptimizerIterState {
            x: &self.x,
            fx: self.fx,
            iter: self.iter,
            evals: self.algo.evals(),
            step_length: self.algo.step_length(),
        }
    }
}

impl<'a, F: Function> OptimizerDriver<'a, F> {
    /// Evaluates the function in the initial point and returns the value.
    ///
    /// Called automatically by the other methods running the process. Calling
    /// it again after the initialization only returns the current value.
    pub fn init(&mut self) -> Result<F::Field, HookeJeevesError> {
        if !self.algo.is_initialized() {
            self.fx = self.algo.init(self.f, &self.x)?;
        }

        Ok(self.fx)
    }

    /// Does one iteration of the process, returning the current point and its
    /// function value in case of no error.
    ///
    /// The iteration is done even if the process is already terminated (see
    /// [`status`](OptimizerDriver::status)).
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<(&[F::Field], F::Field), HookeJeevesError> {
        self.init()?;
        self.fx = self.algo.opt_next(self.f, &mut self.x)?;
        self.iter += 1;
        Ok((self.x.as_slice(), self.fx))
    }

    /// Runs the iterative process until termination or until given stopping
    /// criterion is satisfied, whatever comes first.
    pub fn find<C>(&mut self, stop: C) -> Result<(&[F::Field], F::Field), HookeJeevesError>
    where
        C: Fn(OptimizerIterState<'_, F>) -> bool,
    {
        self.init()?;

        while self.status().is_none() {
            self.next()?;

            if stop(self.state()) {
                debug!("stopped by the caller after {} iterations", self.iter);
                break;
            }
        }

        Ok((self.x.as_slice(), self.fx))
    }

    /// Returns the name of the used optimizer.
    pub fn name(&self) -> &str {
        <HookeJeeves<F> as Optimizer<F>>::NAME
    }

    /// Runs the iterative process until termination, calling the `observer`
    /// after every iteration.
    pub fn run<O>(&mut self, mut observer: O) -> Result<Report<F::Field>, HookeJeevesError>
    where
        O: FnMut(OptimizerIterState<'_, F>),
    {
        self.init()?;

        let termination = loop {
            if let Some(termination) = self.status() {
                break termination;
            }

            self.next()?;
            observer(self.state());
        };

        debug!(
            "terminated ({:?}) after {} iterations and {} evaluations,\tfx = {}",
            termination,
            self.iter,
            self.algo.evals(),
            self.fx
        );

        Ok(Report {
            x: self.x.as_slice().to_vec(),
            fx: self.fx,
            iters: self.iter,
            evals: self.algo.evals(),
            termination,
        })
    }
}

/// State of the current iteration.
pub struct OptimizerIterState<'a, F: Problem> {
    x: &'a OVector<F::Field, Dyn>,
    fx: F::Field,
    iter: usize,
    evals: usize,
    step_length: F::Field,
}

impl<'a, F: Problem> OptimizerIterState<'a, F> {
    /// Returns reference to the current point.
    pub fn x(&self) -> &[F::Field] {
        self.x.as_slice()
    }

    /// Returns the current function value.
    pub fn fx(&self) -> F::Field {
        self.fx
    }

    /// Returns the number of iterations done, including the current one.
    pub fn iter(&self) -> usize {
        self.iter
    }

    /// Returns the number of function evaluations done so far.
    pub fn evals(&self) -> usize {
        self.evals
    }

    /// Returns the current step length.
    pub fn step_length(&self) -> F::Field {
        self.step_length
    }
}

/// Result of a finished optimization process.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Report<T: Copy> {
    /// The final point.
    #[getset(get = "pub")]
    x: Vec<T>,
    /// Function value in the final point.
    #[getset(get_copy = "pub")]
    fx: T,
    /// Number of iterations done.
    #[getset(get_copy = "pub")]
    iters: usize,
    /// Number of function evaluations done.
    #[getset(get_copy = "pub")]
    evals: usize,
    /// Reason of the termination.
    #[getset(get_copy = "pub")]
    termination: Termination,
}

/// Minimizes the function starting from `x0` with the Hooke-Jeeves method.
///
/// This is a shortcut for building the [`OptimizerDriver`] and calling
/// [`run`](OptimizerDriver::run) without an observer.
///
/// ```rust
/// use hooke::{driver::minimize, from_fn};
///
/// let f = from_fn(2, |x: &[f64]| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2));
/// let report = minimize(&f, vec![0.0, 0.0], 0.5, 1e-6, 5000).expect("valid problem");
///
/// assert!((report.x()[0] - 1.0).abs() < 1e-3);
/// assert!((report.x()[1] + 2.0).abs() < 1e-3);
/// ```
pub fn minimize<F: Function>(
    f: &F,
    x0: Vec<F::Field>,
    rho: F::Field,
    epsilon: F::Field,
    max_iters: usize,
) -> Result<Report<F::Field>, Error> {
    let mut optimizer = OptimizerDriver::builder(f)
        .with_initial(x0)
        .with_rho(rho)
        .with_epsilon(epsilon)
        .with_max_iters(max_iters)
        .build()?;

    Ok(optimizer.run(|_| {})?)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        from_fn,
        testing::{Rosenbrock, Sphere, Woods},
    };

    use super::*;

    #[test]
    fn optimizer_basic_use_case() {
        let f = Sphere::new(4);
        let mut optimizer = OptimizerDriver::builder(&f)
            // Zeros are the minimum for sphere, there would be no point is
            // such test.
            .with_initial(vec![10.0; 4])
            .build()
            .unwrap();

        let report = optimizer.run(|_| {}).unwrap();

        assert_eq!(report.termination(), Termination::Converged);
        assert!(report.fx() <= 1e-6);
    }

    #[test]
    fn rosenbrock() {
        let f = Rosenbrock::new();
        let report = minimize(&f, vec![-1.2, 1.0], 0.5, 1e-6, 5000).unwrap();

        assert!(report.iters() < 5000);
        assert_eq!(report.termination(), Termination::Converged);
        assert_abs_diff_eq!(report.x()[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(report.x()[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn woods() {
        let f = Woods::new();
        let report = minimize(&f, vec![-3.0, -1.0, -3.0, -1.0], 0.5, 1e-6, 5000).unwrap();

        assert!(report.iters() < 5000);
        for xi in report.x() {
            assert_abs_diff_eq!(*xi, 1.0, epsilon = 1e-2);
        }
        assert_abs_diff_eq!(report.fx(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn woods_large_shrink_factor() {
        let f = Woods::new();
        let report = minimize(&f, vec![-3.0, -1.0, -3.0, -1.0], 0.6, 1e-6, 5000).unwrap();

        // Stuck away from the minimum.
        assert_eq!(report.termination(), Termination::Converged);
        assert_eq!(report.iters(), 27);
        assert_abs_diff_eq!(report.x()[0], 0.353189007820154, epsilon = 1e-8);
        assert_abs_diff_eq!(report.x()[1], 0.10273156570881904, epsilon = 1e-8);
        assert_abs_diff_eq!(report.x()[2], 1.3737258899053117, epsilon = 1e-8);
        assert_abs_diff_eq!(report.x()[3], 1.8886364878696866, epsilon = 1e-8);
        assert_abs_diff_eq!(report.fx(), 0.92638, epsilon = 1e-4);
    }

    #[test]
    fn explicit_initialization() {
        let f = Rosenbrock::new();
        let mut optimizer = OptimizerDriver::builder(&f)
            .with_initial(vec![-1.2, 1.0])
            .build()
            .unwrap();

        assert_eq!(optimizer.fx(), f64::INFINITY);

        let fx = optimizer.init().unwrap();
        assert_abs_diff_eq!(fx, 24.2, epsilon = 1e-12);
        assert_eq!(optimizer.fx(), fx);
        assert_eq!(optimizer.evals(), 1);
        assert_eq!(optimizer.iter(), 0);

        // No more evaluations once initialized.
        assert_eq!(optimizer.init().unwrap(), fx);
        assert_eq!(optimizer.evals(), 1);
    }

    #[test]
    fn monotonic_progress() {
        let f = Woods::new();
        let rho = 0.6;
        let mut optimizer = OptimizerDriver::builder(&f)
            .with_initial(vec![-3.0, -1.0, -3.0, -1.0])
            .with_rho(rho)
            .build()
            .unwrap();

        let mut history = Vec::new();
        let report = optimizer
            .run(|state| history.push((state.fx(), state.step_length())))
            .unwrap();

        assert_eq!(history.len(), report.iters());

        for pair in history.windows(2) {
            let (fx, step_length) = pair[0];
            let (fx_next, step_length_next) = pair[1];

            assert!(fx_next <= fx);
            assert!(step_length_next == step_length || step_length_next == step_length * rho);
        }
    }

    #[test]
    fn observer_does_not_change_result() {
        let f = Rosenbrock::new();

        let build = || {
            OptimizerDriver::builder(&f)
                .with_initial(vec![-1.2, 1.0])
                .build()
                .unwrap()
        };

        let mut calls = 0;
        let observed = build().run(|_| calls += 1).unwrap();
        let silent = build().run(|_| {}).unwrap();

        assert_eq!(calls, observed.iters());
        assert_eq!(observed.x(), silent.x());
        assert_eq!(observed.fx(), silent.fx());
        assert_eq!(observed.evals(), silent.evals());
    }

    #[test]
    fn max_iterations_reached() {
        let f = Rosenbrock::new();
        let mut optimizer = OptimizerDriver::builder(&f)
            .with_initial(vec![-1.2, 1.0])
            .with_max_iters(3)
            .build()
            .unwrap();

        let report = optimizer.run(|_| {}).unwrap();

        assert_eq!(report.iters(), 3);
        assert_eq!(report.termination(), Termination::MaxIterationsReached);
        assert!(report.fx() < f.apply(&nalgebra::dvector![-1.2, 1.0]));
    }

    #[test]
    fn converged_before_first_iteration() {
        let f = Sphere::new(2);
        let mut optimizer = OptimizerDriver::builder(&f)
            .with_initial(vec![1.0, 2.0])
            .with_rho(0.1)
            .with_epsilon(0.5)
            .build()
            .unwrap();

        let report = optimizer.run(|_| {}).unwrap();

        assert_eq!(report.iters(), 0);
        assert_eq!(report.termination(), Termination::Converged);
        assert_eq!(report.x(), &[1.0, 2.0]);
        assert_eq!(report.fx(), 5.0);
        assert_eq!(report.evals(), 1);
    }

    #[test]
    fn stop_by_caller() {
        let f = Rosenbrock::new();
        let mut optimizer = OptimizerDriver::builder(&f)
            .with_initial(vec![-1.2, 1.0])
            .build()
            .unwrap();

        optimizer.find(|state| state.iter() >= 2).unwrap();

        assert_eq!(optimizer.iter(), 2);
        assert_eq!(optimizer.status(), None);
    }

    #[test]
    fn manual_iterations() {
        let f = Sphere::new(2);
        let mut optimizer = OptimizerDriver::builder(&f)
            .with_initial(vec![3.0, -4.0])
            .build()
            .unwrap();

        let mut fx = f64::INFINITY;

        while optimizer.status().is_none() {
            let (_, fx_next) = optimizer.next().unwrap();
            assert!(fx_next <= fx);
            fx = fx_next;
        }

        assert_eq!(optimizer.status(), Some(Termination::Converged));
        assert_eq!(optimizer.name(), "Hooke-Jeeves");
    }

    #[test]
    fn optimizer_initial() {
        let x0 = vec![10.0; 4];

        let f = Sphere::new(4);
        let optimizer = OptimizerDriver::builder(&f)
            .with_initial(x0.clone())
            .build()
            .unwrap();

        assert_eq!(optimizer.x(), &x0);
        assert_eq!(optimizer.iter(), 0);
        assert_eq!(optimizer.evals(), 0);
    }

    #[test]
    fn invalid_settings() {
        let f = Sphere::new(2);

        assert!(matches!(
            OptimizerDriver::builder(&f).with_initial(vec![1.0]).build(),
            Err(BuildError::Dimension(DimensionError::Mismatch {
                expected: 2,
                actual: 1
            }))
        ));

        assert!(matches!(
            OptimizerDriver::builder(&f).with_rho(1.5).build(),
            Err(BuildError::Options(OptionsError::InvalidRho))
        ));

        assert!(matches!(
            OptimizerDriver::builder(&f).with_epsilon(-1.0).build(),
            Err(BuildError::Options(OptionsError::InvalidEpsilon))
        ));

        assert!(matches!(
            OptimizerDriver::builder(&f).with_max_iters(0).build(),
            Err(BuildError::InvalidMaxIters)
        ));

        let empty = from_fn(0, |_: &[f64]| 0.0);
        assert!(matches!(
            OptimizerDriver::new(&empty),
            Err(BuildError::Dimension(DimensionError::OutOfRange { dim: 0 }))
        ));

        let huge = from_fn(crate::MAX_DIM + 1, |x: &[f64]| x[0]);
        assert!(matches!(
            OptimizerDriver::new(&huge),
            Err(BuildError::Dimension(DimensionError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn invalid_value() {
        let f = from_fn(1, |x: &[f64]| if x[0] > 2.0 { f64::INFINITY } else { -x[0] });

        assert!(matches!(
            minimize(&f, vec![1.0], 0.5, 1e-6, 100),
            Err(Error::Optimizer(HookeJeevesError::InvalidValue { .. }))
        ));
    }
}
