//! Source-to-entity pipeline stages.
//!
//! # Responsibility
//! - `source`: stream raw items out of the XML dump.
//! - `exceptions`: default cleaning plus per-record corrections.
//! - `transform`: turn one raw item into validated entities.

pub mod exceptions;
pub mod source;
pub mod transform;
