//! Built-in store backends.

pub mod filesystem;
pub mod postgres;
