//! Language model capability protocol.
//!
//! The capability is provided by the host (an on-device model runtime); the
//! extraction core only depends on these traits.

mod availability;
mod prompt;
mod traits;

pub use availability::*;
pub use prompt::*;
pub use traits::*;
