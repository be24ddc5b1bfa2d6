//! Dictionary domain model.
//!
//! # Responsibility
//! - Define validated entities: words, senses, hanja, usages, categories.
//! - Keep label/code mappings for closed enumerations next to their types.
//!
//! # Invariants
//! - Every identifier is supplied by the source; nothing is auto-generated.
//! - Entities validate on construction and are immutable afterwards.

pub mod category;
pub mod hanja;
pub mod sense;
pub mod validation;
pub mod word;
