//! Schema module - Configuration, probability map and result types.

mod config;
mod grid;
mod placement;
mod search;

pub use config::*;
pub use grid::*;
pub use placement::*;
pub use search::*;
