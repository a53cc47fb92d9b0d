//! Domain models for the prescription guide.

mod language;
mod medicine_info;
mod prescription;
mod reminder;

pub use language::*;
pub use medicine_info::*;
pub use prescription::*;
pub use reminder::*;
