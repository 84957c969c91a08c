//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model mutations and blob persistence into the public
//!   store API consumed by the presentation layer.
//! - Keep UI shells decoupled from storage details.

pub mod farm_store;
pub mod stats;
