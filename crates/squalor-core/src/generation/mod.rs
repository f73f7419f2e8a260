//! Generation - turns placement plans into entities

mod dressing;

pub use dressing::*;
