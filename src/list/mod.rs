//! Generic list support shared by every listable resource.

mod params;
mod sort;
pub use params::*;
pub use sort::*;
