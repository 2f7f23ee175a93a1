#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod random;
pub mod sampling;

pub use error::ValidationError;
pub use random::Randomness;
