//! Deterministic description templater.
//!
//! This crate turns a [`picdesc_models::VisionAnnotations`] value into one
//! English paragraph. It is pure: no I/O, no shared state, byte-identical
//! output for identical input.

pub mod color;
pub mod describe;

pub use color::color_name;
pub use describe::{generate_description, EMPTY_FALLBACK, FAULT_FALLBACK};
