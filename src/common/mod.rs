//! Common types, errors and traits shared across the crate

pub mod channels;
pub mod errors;
pub mod traits;
pub mod types;
