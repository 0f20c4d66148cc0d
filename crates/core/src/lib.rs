//! Domain logic for suspect composite generation.
//!
//! Everything in this crate is pure: no database, no network. The API and
//! image-generation crates build on these types.

pub mod attributes;
pub mod case;
pub mod error;
pub mod features;
pub mod generation;
pub mod metadata;
pub mod prompt;
pub mod types;
