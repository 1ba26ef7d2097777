use std::marker::PhantomData;

use nalgebra::{storage::Storage, Dyn, IsContiguous, RealField, Vector};

use super::base::Problem;

/// Definition of an objective function.
///
/// ## Defining a function
///
/// A function is any type that implements [`Function`] and [`Problem`] traits.
///
/// ```rust
/// use hooke::nalgebra as na;
/// use hooke::{Function, Problem};
/// use na::{Dyn, IsContiguous};
///
/// struct Rosenbrock {
///     a: f64,
///     b: f64,
/// }
///
/// impl Problem for Rosenbrock {
///     type Field = f64;
///
///     fn dim(&self) -> usize {
///         2
///     }
/// }
///
/// impl Function for Rosenbrock {
///     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
///     where
///         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
///     {
///         // Compute the function value.
///         (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
///     }
/// }
/// ```
///
/// The function is expected to be pure. Any instrumentation on the side (such
/// as counting the calls) must not influence the returned value.
pub trait Function: Problem {
    /// Calculates the function value in given point.
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous;
}

/// Function defined by a closure. See [`from_fn`].
pub struct FromFn<T, G> {
    dim: usize,
    g: G,
    _field: PhantomData<fn(&[T]) -> T>,
}

/// Wraps a closure taking a slice of variables into a [`Function`] of given
/// dimension.
///
/// ```rust
/// use hooke::from_fn;
///
/// let sphere = from_fn(3, |x: &[f64]| x.iter().map(|xi| xi * xi).sum());
/// ```
pub fn from_fn<T, G>(dim: usize, g: G) -> FromFn<T, G>
where
    T: RealField + Copy,
    G: Fn(&[T]) -> T,
{
    FromFn {
        dim,
        g,
        _field: PhantomData,
    }
}

impl<T, G> Problem for FromFn<T, G>
where
    T: RealField + Copy,
    G: Fn(&[T]) -> T,
{
    type Field = T;

    fn dim(&self) -> usize {
        self.dim
    }
}

impl<T, G> Function for FromFn<T, G>
where
    T: RealField + Copy,
    G: Fn(&[T]) -> T,
{
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
    {
        (self.g)(x.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dvector;

    use super::*;

    #[test]
    fn closure_function() {
        let f = from_fn(2, |x: &[f64]| x[0] - 2.0 * x[1]);

        assert_eq!(f.dim(), 2);
        assert_eq!(f.apply(&dvector![3.0, 1.0]), 1.0);
    }
}
