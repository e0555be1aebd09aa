//! Request handlers.

pub mod describe;
pub mod health;

pub use describe::*;
pub use health::*;
