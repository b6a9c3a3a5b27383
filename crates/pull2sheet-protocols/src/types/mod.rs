//! Data model shared by the extraction core and the panel.

mod field;
mod input;
mod result;

pub use field::*;
pub use input::*;
pub use result::*;
