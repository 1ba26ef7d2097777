#![allow(clippy::many_single_char_names)]
#![warn(missing_docs)]

//! # Hooke
//!
//! A pure Rust implementation of the Hooke-Jeeves method for derivative-free
//! unconstrained minimization.
//!
//! The method only needs to evaluate the objective function pointwise. It does
//! not use gradients, nor does it estimate them, so it works for functions
//! which are non-smooth or even discontinuous. It is a historically-proven
//! numerical method which is simple, robust and well suited for problems of
//! moderate dimension.
//!
//! ## Algorithm
//!
//! * [Hooke-Jeeves](algo::hooke_jeeves) -- Pattern search which combines
//!   coordinate-wise exploration, extrapolation along the directions of
//!   improvement and geometric shrinking of the steps.
//!
//! ## Problem
//!
//! The problem of unconstrained minimization is about finding values of *n*
//! variables for which the value of a function is minimal:
//!
//! ```text
//! min f(x),
//!
//! where x = { x1, ..., xn }
//! ```
//!
//! When it comes to code, the problem is any type that implements the
//! [`Function`] and [`Problem`] traits.
//!
//! ```rust
//! // Hooke is based on `nalgebra` crate.
//! use hooke::nalgebra as na;
//! use hooke::{Function, Problem};
//! use na::{Dyn, IsContiguous};
//!
//! // A problem is represented by a type.
//! struct Rosenbrock {
//!     a: f64,
//!     b: f64,
//! }
//!
//! impl Problem for Rosenbrock {
//!     // The numeric type. Usually f64 or f32.
//!     type Field = f64;
//!
//!     // The number of variables.
//!     fn dim(&self) -> usize {
//!         2
//!     }
//! }
//!
//! impl Function for Rosenbrock {
//!     // Evaluate the function in a trial point.
//!     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
//!     where
//!         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
//!     {
//!         (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
//!     }
//! }
//! ```
//!
//! For quick experiments, a closure can be used instead:
//!
//! ```rust
//! let f = hooke::from_fn(2, |x: &[f64]| (1.0 - x[0]).powi(2) + (x[1] - x[0]).powi(2));
//! ```
//!
//! ## Optimizing
//!
//! When you have your function available, you can use the [`OptimizerDriver`]
//! to run the iteration process until it converges or the maximum number of
//! iterations is reached.
//!
//! ```rust
//! use hooke::{OptimizerDriver, Termination};
//! # use hooke::nalgebra as na;
//! # use hooke::{Function, Problem};
//! # use na::{Dyn, IsContiguous};
//! #
//! # struct Rosenbrock {
//! #     a: f64,
//! #     b: f64,
//! # }
//! #
//! # impl Problem for Rosenbrock {
//! #     type Field = f64;
//! #
//! #     fn dim(&self) -> usize {
//! #         2
//! #     }
//! # }
//! #
//! # impl Function for Rosenbrock {
//! #     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
//! #     where
//! #         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
//! #     {
//! #         (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
//! #     }
//! # }
//!
//! let f = Rosenbrock { a: 1.0, b: 100.0 };
//! let mut optimizer = OptimizerDriver::builder(&f)
//!     .with_initial(vec![-1.2, 1.0])
//!     .with_rho(0.5)
//!     .with_epsilon(1e-6)
//!     .with_max_iters(5000)
//!     .build()
//!     .expect("invalid settings");
//!
//! let report = optimizer
//!     .run(|state| {
//!         println!(
//!             "iter = {}\tevals = {}\tf(x) = {}\tx = {:?}",
//!             state.iter(),
//!             state.evals(),
//!             state.fx(),
//!             state.x()
//!         );
//!     })
//!     .expect("optimizer encountered an error");
//!
//! match report.termination() {
//!     Termination::Converged => println!("converged"),
//!     Termination::MaxIterationsReached => println!("maximum number of iterations exceeded"),
//! }
//! ```
//!
//! ## Logging
//!
//! The algorithm reports its progress through the [`log`](https://docs.rs/log)
//! facade on the debug level. Install any logger implementation to see it.
//!
//! ## License
//!
//! Licensed under MIT.

pub mod algo;
mod core;
pub mod driver;

pub use core::*;
pub use driver::{OptimizerDriver, Report, Termination};

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
