//! Domain models for the clinic worklist.

mod record;
mod row;
mod state;

pub use record::*;
pub use row::*;
pub use state::*;
