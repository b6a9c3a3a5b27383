//! Error types for the Pull2Sheet protocol layer.

mod extraction;
mod model;
mod panel;

pub use extraction::*;
pub use model::*;
pub use panel::*;
