//! Core abstractions and types for hooke.
//!
//! *Users* are mainly interested in implementing the [`Function`] and
//! [`Problem`] traits, or in wrapping a closure with [`from_fn`].
//!
//! Algorithms *developers* are interested in implementing the [`Optimizer`]
//! trait.

mod base;
mod function;
mod optimizer;

pub use base::*;
pub use function::*;
pub use optimizer::*;
