//! Testing functions and utilities useful for benchmarking, debugging and
//! smoke testing.
//!
//! [`Rosenbrock`] and [`Sphere`] are recommended for first tests. [`Woods`] is
//! a harder, four-variable problem sensitive to the choice of the shrink
//! factor.
//!
//! # References
//!
//! \[1\] [A Literature Survey of Benchmark Functions For Global Optimization
//! Problems](https://arxiv.org/abs/1308.4008)
//!
//! \[2\] [Testing Unconstrained Optimization
//! Software](https://dl.acm.org/doi/10.1145/355934.355936)

#![allow(unused)]

use std::error::Error as StdError;

use nalgebra::{
    dvector,
    storage::{Storage, StorageMut},
    DVector, Dyn, IsContiguous, OVector, Vector,
};
use thiserror::Error;

use crate::core::{Function, Optimizer, Problem};

/// Extension of the [`Problem`] trait that provides additional information
/// that is useful for testing optimizers.
pub trait TestProblem: Problem {
    /// Standard initial values for the problem. Using the same initial values is
    /// essential for fair comparison of methods.
    fn initials(&self) -> Vec<OVector<Self::Field, Dyn>>;
}

/// Extension of the [`Function`] trait that provides additional information
/// that is useful for testing optimizers.
pub trait TestFunction: Function + TestProblem {
    /// A set of global optima (if known and finite). This is mostly just for
    /// information, for example to know how close an optimizer got even if it
    /// failed.
    fn optima(&self) -> Vec<OVector<Self::Field, Dyn>> {
        Vec::new()
    }

    /// Tests if given point is within `eps` of a global optimum in every
    /// variable.
    fn is_optimum<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>, eps: Self::Field) -> bool
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
    {
        self.optima().iter().any(|optimum| {
            optimum
                .iter()
                .zip(x.iter())
                .all(|(oi, xi)| approx::abs_diff_eq!(*oi, *xi, epsilon = eps))
        })
    }
}

/// Rosenbrock's classic parabolic valley ("banana") function \[1\].
///
/// ```text
/// f(x, y) = 100 (y - x^2)^2 + (1 - x)^2
/// ```
///
/// The global minimum `f(1, 1) = 0` is inside a long, narrow, parabolic shaped
/// flat valley. Finding the valley is trivial, converging to the minimum is
/// not.
///
/// # References
///
/// \[1\] [A Literature Survey of Benchmark Functions For Global Optimization
/// Problems](https://arxiv.org/abs/1308.4008)
#[derive(Debug, Clone, Copy, Default)]
pub struct Rosenbrock;

impl Rosenbrock {
    /// Initializes the function.
    pub fn new() -> Self {
        Self
    }
}

impl Problem for Rosenbrock {
    type Field = f64;

    fn dim(&self) -> usize {
        2
    }
}

impl Function for Rosenbrock {
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
    {
        let a = x[0];
        let b = x[1];

        let c = 100.0 * (b - a * a) * (b - a * a);
        c + (1.0 - a) * (1.0 - a)
    }
}

impl TestProblem for Rosenbrock {
    fn initials(&self) -> Vec<OVector<Self::Field, Dyn>> {
        vec![dvector![-1.2, 1.0]]
    }
}

impl TestFunction for Rosenbrock {
    fn optima(&self) -> Vec<OVector<Self::Field, Dyn>> {
        vec![dvector![1.0, 1.0]]
    }
}

/// Woods function \[2\] (also known as Colville function).
///
/// A four-variable function with the global minimum `f(1, 1, 1, 1) = 0`. It
/// has a saddle point that attracts local methods, which makes pattern search
/// sensitive to the choice of the shrink factor.
///
/// # References
///
/// \[2\] [Testing Unconstrained Optimization
/// Software](https://dl.acm.org/doi/10.1145/355934.355936)
#[derive(Debug, Clone, Copy, Default)]
pub struct Woods;

impl Woods {
    /// Initializes the function.
    pub fn new() -> Self {
        Self
    }
}

impl Problem for Woods {
    type Field = f64;

    fn dim(&self) -> usize {
        4
    }
}

impl Function for Woods {
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
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

impl TestProblem for Woods {
    fn initials(&self) -> Vec<OVector<Self::Field, Dyn>> {
        vec![dvector![-3.0, -1.0, -3.0, -1.0]]
    }
}

impl TestFunction for Woods {
    fn optima(&self) -> Vec<OVector<Self::Field, Dyn>> {
        vec![dvector![1.0, 1.0, 1.0, 1.0]]
    }
}

/// [Sphere
/// function](https://en.wikipedia.org/wiki/Test_functions_for_optimization)
/// \[1\].
///
/// This is a simple paraboloid which can be used in early development and
/// sanity checking as it can be considered a trivial problem.
///
/// # References
///
/// \[1\] [A Literature Survey of Benchmark Functions For Global Optimization
/// Problems](https://arxiv.org/abs/1308.4008)
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    n: usize,
}

impl Sphere {
    /// Initializes the function with given dimension.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "n must be greater than zero");
        Self { n }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Problem for Sphere {
    type Field = f64;

    fn dim(&self) -> usize {
        self.n
    }
}

impl Function for Sphere {
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
    {
        x.iter().map(|xi| xi.powi(2)).sum()
    }
}

impl TestProblem for Sphere {
    fn initials(&self) -> Vec<OVector<Self::Field, Dyn>> {
        let init1 = DVector::from_element(self.n, 10.0);
        let init2 = DVector::from_element(self.n, -5.0);

        vec![init1, init2]
    }
}

impl TestFunction for Sphere {
    fn optima(&self) -> Vec<OVector<Self::Field, Dyn>> {
        vec![DVector::zeros(self.n)]
    }
}

/// Optimization error of the testing optimizer driver (see [`optimize`]).
#[derive(Debug, Error)]
pub enum TestingError<E: StdError + 'static> {
    /// Error of the optimizer used.
    #[error("{0}")]
    Inner(#[from] E),
    /// Optimizer did not terminate.
    #[error("optimizer did not terminate")]
    Termination,
}

/// A simple optimizer driver that can be used in tests.
pub fn optimize<F: Function, O: Optimizer<F>>(
    f: &F,
    mut optimizer: O,
    mut x: OVector<F::Field, Dyn>,
    min: F::Field,
    max_iters: usize,
    tolerance: F::Field,
) -> Result<OVector<F::Field, Dyn>, TestingError<O::Error>>
where
    O::Error: StdError,
{
    let mut iter = 0;

    loop {
        let fx = optimizer.opt_next(f, &mut x)?;

        if fx <= min + tolerance {
            // Converged.
            return Ok(x);
        }

        if iter == max_iters {
            return Err(TestingError::Termination);
        } else {
            iter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optima_have_zero_value() {
        assert_eq!(Rosenbrock::new().apply(&dvector![1.0, 1.0]), 0.0);
        assert_eq!(Woods::new().apply(&dvector![1.0, 1.0, 1.0, 1.0]), 0.0);
        assert_eq!(Sphere::new(3).apply(&DVector::zeros(3)), 0.0);
    }

    #[test]
    fn rosenbrock_value() {
        // 100 * (1 - 1.44)^2 + (2.2)^2
        let fx = Rosenbrock::new().apply(&dvector![-1.2, 1.0]);
        approx::assert_relative_eq!(fx, 24.2, max_relative = 1e-12);
    }

    #[test]
    fn is_optimum() {
        let f = Woods::new();

        assert!(f.is_optimum(&dvector![1.001, 0.999, 1.0, 1.0], 1e-2));
        assert!(!f.is_optimum(&dvector![1.1, 1.0, 1.0, 1.0], 1e-2));
    }
}
