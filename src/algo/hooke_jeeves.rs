//! Hooke-Jeeves (pattern search) optimization method.
//!
//! [Hooke-Jeeves](https://en.wikipedia.org/wiki/Pattern_search_(optimization))
//! direct search is a derivative-free optimization algorithm that does not
//! need the function to be continuous or differentiable. Every iteration
//! consists of an *exploratory move*, which probes each coordinate in turn with
//! a per-variable step, followed by *pattern moves*, which extrapolate along
//! the direction of the confirmed improvement for as long as it keeps paying
//! off. When neither helps, all steps are shrunk geometrically by factor
//! `rho` and the search continues on a finer scale until the step length
//! drops to `epsilon`.
//!
//! # References
//!
//! \[1\] [Direct Search Solution of Numerical and Statistical
//! Problems](https://dl.acm.org/doi/10.1145/321062.321069)
//!
//! \[2\] [Algorithm 178: Direct
//! Search](https://dl.acm.org/doi/10.1145/366573.366632)
//!
//! \[3\] [Testing Unconstrained Optimization
//! Software](https://dl.acm.org/doi/10.1145/355934.355936)

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{
    convert,
    storage::{Storage, StorageMut},
    ComplexField, DimName, Dyn, IsContiguous, OVector, RealField, Vector, U1,
};
use thiserror::Error;

use crate::core::{DimensionError, Function, Optimizer, Problem};

/// Options for [`HookeJeeves`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct HookeJeevesOptions<P: Problem> {
    /// Geometric shrink factor of the steps, must be in `(0, 1)`. It is also
    /// the initial step length and the initial step of variables that start
    /// at zero. Default: `0.5`.
    rho: P::Field,
    /// The search converges once the step length drops to or below this
    /// value. Default: `1e-6`.
    epsilon: P::Field,
}

impl<P: Problem> Default for HookeJeevesOptions<P> {
    fn default() -> Self {
        Self {
            rho: convert(0.5),
            epsilon: convert(1e-6),
        }
    }
}

impl<P: Problem> HookeJeevesOptions<P> {
    /// Checks that the options describe a terminating search.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let zero: P::Field = convert(0.0);
        let one: P::Field = convert(1.0);

        // Negated comparisons reject NaN as well.
        if !(self.rho > zero && self.rho < one) {
            return Err(OptionsError::InvalidRho);
        }

        if !(self.epsilon > zero) {
            return Err(OptionsError::InvalidEpsilon);
        }

        Ok(())
    }
}

/// Error returned from [`HookeJeevesOptions::validate`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OptionsError {
    /// The shrink factor is not in the open interval `(0, 1)`.
    #[error("shrink factor rho must be in (0, 1)")]
    InvalidRho,
    /// The convergence tolerance is not positive.
    #[error("tolerance epsilon must be positive")]
    InvalidEpsilon,
}

/// Error returned from [`HookeJeeves`] optimizer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HookeJeevesError {
    /// The objective function returned an invalid value (NaN, positive or
    /// negative infinity).
    #[error("invalid value encountered in evaluation {evals}")]
    InvalidValue {
        /// Number of evaluations including the failed one.
        evals: usize,
    },
    /// The point does not match the dimensionality of the problem.
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

/// Hooke-Jeeves optimizer.
///
/// One call to [`opt_next`](Optimizer::opt_next) performs one outer iteration
/// of the method. The optimizer does not stop by itself, check
/// [`is_converged`](HookeJeeves::is_converged) or use the
/// [`OptimizerDriver`](crate::OptimizerDriver) which does so.
///
/// See [module](self) documentation for more details.
pub struct HookeJeeves<P: Problem> {
    options: HookeJeevesOptions<P>,
    base: OVector<P::Field, Dyn>,
    trial: OVector<P::Field, Dyn>,
    delta: OVector<P::Field, Dyn>,
    fx: P::Field,
    step_length: P::Field,
    evals: usize,
    initialized: bool,
}

impl<P: Problem> HookeJeeves<P> {
    /// Initializes Hooke-Jeeves optimizer with default options.
    pub fn new(p: &P) -> Self {
        Self::with_options(p, HookeJeevesOptions::default())
    }

    /// Initializes Hooke-Jeeves optimizer with given options.
    pub fn with_options(p: &P, options: HookeJeevesOptions<P>) -> Self {
        let dim = Dyn(p.dim());
        let step_length = options.rho;

        Self {
            options,
            base: OVector::zeros_generic(dim, U1::name()),
            trial: OVector::zeros_generic(dim, U1::name()),
            delta: OVector::zeros_generic(dim, U1::name()),
            fx: convert(f64::INFINITY),
            step_length,
            evals: 0,
            initialized: false,
        }
    }

    /// Resets the internal state of the optimizer.
    pub fn reset(&mut self) {
        // Causes the steps to be initialized again from the next point.
        self.initialized = false;
        self.step_length = self.options.rho;
        self.fx = convert(f64::INFINITY);
        self.evals = 0;
    }

    /// Returns the options of the optimizer.
    pub fn options(&self) -> &HookeJeevesOptions<P> {
        &self.options
    }

    /// Returns the current step length.
    pub fn step_length(&self) -> P::Field {
        self.step_length
    }

    /// Returns the current per-variable steps.
    pub fn delta(&self) -> &[P::Field] {
        self.delta.as_slice()
    }

    /// Returns the number of function evaluations since the initialization.
    pub fn evals(&self) -> usize {
        self.evals
    }

    /// Returns whether the steps were initialized from a starting point.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns whether the step length dropped to or below `epsilon`.
    pub fn is_converged(&self) -> bool {
        self.step_length <= self.options.epsilon
    }
}

impl<F: Function> HookeJeeves<F> {
    /// Initializes the search from the starting point `x` and returns the
    /// function value in it.
    ///
    /// Called automatically by the first [`opt_next`](Optimizer::opt_next)
    /// after construction or [`reset`](HookeJeeves::reset).
    pub fn init<Sx>(
        &mut self,
        f: &F,
        x: &Vector<F::Field, Dyn, Sx>,
    ) -> Result<F::Field, HookeJeevesError>
    where
        Sx: Storage<F::Field, Dyn> + IsContiguous,
    {
        let n = self.base.nrows();

        if x.nrows() != n {
            return Err(DimensionError::Mismatch {
                expected: n,
                actual: x.nrows(),
            }
            .into());
        }

        let rho = self.options.rho;
        let zero: F::Field = convert(0.0);

        self.base.copy_from(x);
        self.trial.copy_from(x);

        // A variable starting at zero would never move with a relative step.
        self.delta
            .iter_mut()
            .zip(x.iter())
            .for_each(|(di, xi)| {
                let step = (*xi * rho).abs();
                *di = if step == zero { rho } else { step };
            });

        self.step_length = rho;
        self.evals = 0;
        self.fx = eval(f, &self.base, &mut self.evals)?;
        self.initialized = true;

        debug!(
            "initialized steps: {:?},\tfx = {}",
            self.delta.as_slice(),
            self.fx
        );

        Ok(self.fx)
    }

    fn next_inner<Sx>(
        &mut self,
        f: &F,
        x: &mut Vector<F::Field, Dyn, Sx>,
    ) -> Result<F::Field, HookeJeevesError>
    where
        Sx: StorageMut<F::Field, Dyn> + IsContiguous,
    {
        if !self.initialized {
            self.init(f, x)?;
        } else if x.nrows() != self.base.nrows() {
            return Err(DimensionError::Mismatch {
                expected: self.base.nrows(),
                actual: x.nrows(),
            }
            .into());
        }

        let HookeJeevesOptions { rho, epsilon } = self.options;

        let Self {
            base,
            trial,
            delta,
            fx,
            step_length,
            evals,
            ..
        } = self;

        #[derive(Debug, Clone, Copy, PartialEq)]
        enum Outcome {
            Improvement,
            Shrinkage,
            Stagnation,
        }

        impl Outcome {
            fn as_str(&self) -> &str {
                match self {
                    Outcome::Improvement => "improvement",
                    Outcome::Shrinkage => "shrinkage",
                    Outcome::Stagnation => "stagnation",
                }
            }
        }

        // Find a better point nearby, one variable at a time.
        trial.copy_from(base);
        let mut trial_fx = explore(f, trial, delta, *fx, evals)?;
        debug!("exploration from base: {} -> {}", *fx, trial_fx);

        let mut pattern_moves = 0usize;

        while trial_fx < *fx {
            for i in 0..base.nrows() {
                let bi = base[i];
                let ti = trial[i];

                // Steps point in the direction of the last movement.
                delta[i] = if ti <= bi {
                    -delta[i].abs()
                } else {
                    delta[i].abs()
                };

                // Accept the trial and go twice as far along the movement.
                base[i] = ti;
                trial[i] = ti + ti - bi;
            }

            *fx = trial_fx;
            pattern_moves += 1;

            trial_fx = explore(f, trial, delta, *fx, evals)?;

            if trial_fx >= *fx {
                debug!(
                    "pattern move {} did not improve: {} >= {}",
                    pattern_moves, trial_fx, *fx
                );
                break;
            }

            // An improvement without an actual displacement can be just a
            // roundoff error.
            if !is_displaced(trial, base, delta) {
                debug!(
                    "pattern move {} improved without displacement, stopping",
                    pattern_moves
                );
                break;
            }
        }

        let outcome = if trial_fx >= *fx && *step_length >= epsilon {
            *step_length *= rho;
            *delta *= rho;
            Outcome::Shrinkage
        } else if pattern_moves > 0 {
            Outcome::Improvement
        } else {
            Outcome::Stagnation
        };

        debug!(
            "performed {} after {} pattern moves,\tfx = {},\tstep length = {}",
            outcome.as_str(),
            pattern_moves,
            *fx,
            *step_length
        );

        x.copy_from(base);
        Ok(*fx)
    }
}

impl<F: Function> Optimizer<F> for HookeJeeves<F> {
    const NAME: &'static str = "Hooke-Jeeves";

    type Error = HookeJeevesError;

    fn opt_next<Sx>(
        &mut self,
        f: &F,
        x: &mut Vector<F::Field, Dyn, Sx>,
    ) -> Result<F::Field, Self::Error>
    where
        Sx: StorageMut<F::Field, Dyn> + IsContiguous,
    {
        self.next_inner(f, x)
    }
}

/// Exploratory move of the Hooke-Jeeves method.
///
/// Given point `x` with function value `fx`, probes each variable in order by
/// adding its step from `delta` and, if that does not improve on the best
/// value found so far, by subtracting it. An improving probe is kept and the
/// following variables are probed from there; otherwise the variable is
/// restored. The step of a variable whose first probe failed stays negated, so
/// the next exploration starts from the other direction.
///
/// On return, `x` holds the best point found and the returned value is its
/// function value, which is never greater than `fx`. Each evaluation of `f`
/// increments `evals`.
pub fn explore<F, Sx, Sd>(
    f: &F,
    x: &mut Vector<F::Field, Dyn, Sx>,
    delta: &mut Vector<F::Field, Dyn, Sd>,
    fx: F::Field,
    evals: &mut usize,
) -> Result<F::Field, HookeJeevesError>
where
    F: Function,
    Sx: StorageMut<F::Field, Dyn> + IsContiguous,
    Sd: StorageMut<F::Field, Dyn>,
{
    let mut best = fx;

    for i in 0..x.nrows() {
        let xi = x[i];

        x[i] = xi + delta[i];
        let value = eval(f, x, evals)?;

        if value < best {
            best = value;
            continue;
        }

        delta[i] = -delta[i];
        x[i] = xi + delta[i];
        let value = eval(f, x, evals)?;

        if value < best {
            best = value;
        } else {
            x[i] = xi;
        }
    }

    Ok(best)
}

/// Whether some variable of `trial` moved away from `base` by more than half
/// of its step.
fn is_displaced<T, S1, S2, S3>(
    trial: &Vector<T, Dyn, S1>,
    base: &Vector<T, Dyn, S2>,
    delta: &Vector<T, Dyn, S3>,
) -> bool
where
    T: RealField + Copy,
    S1: Storage<T, Dyn>,
    S2: Storage<T, Dyn>,
    S3: Storage<T, Dyn>,
{
    let half: T = convert(0.5);

    trial
        .iter()
        .zip(base.iter())
        .zip(delta.iter())
        .any(|((ti, bi), di)| (*ti - *bi).abs() > half * di.abs())
}

fn eval<F, Sx>(
    f: &F,
    x: &Vector<F::Field, Dyn, Sx>,
    evals: &mut usize,
) -> Result<F::Field, HookeJeevesError>
where
    F: Function,
    Sx: Storage<F::Field, Dyn> + IsContiguous,
{
    *evals += 1;
    let value = f.apply(x);

    if value.is_finite() {
        Ok(value)
    } else {
        debug!(
            "function value {} in {:?} is not finite, returning error",
            value,
            x.as_slice()
        );
        Err(HookeJeevesError::InvalidValue { evals: *evals })
    }
}
