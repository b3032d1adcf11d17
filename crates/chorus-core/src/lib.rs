//! Core domain types for Chorus: the requirements store, the category table
//! and spec builder, persona utterances, the shared error type, and the port
//! traits the orchestrator drives its external collaborators through.

pub mod error;
pub mod persona;
pub mod ports;
pub mod requirements;
pub mod spec;

pub use error::{ChorusError, Result};
