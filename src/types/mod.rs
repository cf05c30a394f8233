mod common;
pub use common::*;

mod positions;
pub use positions::*;

pub mod config;
pub mod contracts;
pub mod errors;
pub mod policies;
