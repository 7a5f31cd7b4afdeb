pub mod algo;
pub mod core;
pub mod io;
pub mod prelude;

pub use crate::algo::*;
pub use crate::core::*;
