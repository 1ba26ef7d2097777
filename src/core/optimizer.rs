use nalgebra::{storage::StorageMut, Dyn, IsContiguous, Vector};

use super::function::Function;

/// Interface of an optimizer.
///
/// An optimizer is an iterative algorithm which takes a point _x_ and computes
/// the next step in the optimization process. Repeated calls to the next step
/// should eventually converge into a minimum _x'_.
///
/// ## Implementing an optimizer
///
/// Here is an implementation of a "coordinate halving" optimizer which moves
/// each variable halfway towards zero whenever it helps.
///
/// ```rust
/// use hooke::nalgebra as na;
/// use hooke::{Function, Optimizer};
/// use na::{storage::StorageMut, Dyn, IsContiguous, Vector};
///
/// struct Halving;
///
/// impl<F: Function> Optimizer<F> for Halving {
///     const NAME: &'static str = "Halving";
///     type Error = std::convert::Infallible;
///
///     fn opt_next<Sx>(
///         &mut self,
///         f: &F,
///         x: &mut Vector<F::Field, Dyn, Sx>,
///     ) -> Result<F::Field, Self::Error>
///     where
///         Sx: StorageMut<F::Field, Dyn> + IsContiguous,
///     {
///         let half: F::Field = na::convert(0.5);
///         let mut fx = f.apply(x);
///
///         for i in 0..x.nrows() {
///             let xi = x[i];
///             x[i] = xi * half;
///
///             let candidate = f.apply(x);
///             if candidate < fx {
///                 fx = candidate;
///             } else {
///                 x[i] = xi;
///             }
///         }
///
///         // We must return the value of the returned point.
///         Ok(fx)
///     }
/// }
/// ```
pub trait Optimizer<F: Function> {
    /// Name of the optimizer.
    const NAME: &'static str;

    /// Error while computing the next step.
    type Error;

    /// Computes the next step in the optimization process.
    ///
    /// The value of `x` is the current point. After the method returns, `x`
    /// should hold the variable values of the performed step and the return
    /// value _must_ be the function value of that step as computed by
    /// [`Function::apply`].
    ///
    /// The implementations _can_ assume that subsequent calls to `opt_next`
    /// pass the value of `x` as was returned in the previous iteration.
    fn opt_next<Sx>(
        &mut self,
        f: &F,
        x: &mut Vector<F::Field, Dyn, Sx>,
    ) -> Result<F::Field, Self::Error>
    where
        Sx: StorageMut<F::Field, Dyn> + IsContiguous;
}
