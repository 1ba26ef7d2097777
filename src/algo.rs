//! The collection of implemented algorithms.

pub mod hooke_jeeves;

pub use hooke_jeeves::HookeJeeves;
