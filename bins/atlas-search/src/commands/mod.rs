//! CLI command implementations

pub mod health;
pub mod search;
pub mod stats;
pub mod suggest;
pub mod synonyms;
