//! Systems - logic that operates on components

mod wandering;

pub use wandering::*;
