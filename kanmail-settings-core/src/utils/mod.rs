//! Shared helpers

pub mod nullable;
