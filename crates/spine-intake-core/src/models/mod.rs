//! Domain models for spine clinic intake.

mod payload;
mod record;

pub use payload::*;
pub use record::*;
