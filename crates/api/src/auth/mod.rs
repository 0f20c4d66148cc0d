//! Authentication primitives.
//!
//! - [`jwt`] -- validation of session-provider access tokens.

pub mod jwt;
