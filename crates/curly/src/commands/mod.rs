//! CLI command implementations

pub mod inspect;
pub mod render;
pub mod symbols;
