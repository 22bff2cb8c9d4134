//! ISMS Common - Shared types for the ISO 27001 compliance engine
//!
//! This crate provides the data contracts every other crate agrees on:
//! - Annex-A controls and their identities
//! - The five-level conformity scale and the closed category set
//! - Error handling
//!
//! # Domain Model
//!
//! - **Value Objects**: `ControlId`, `ControlCode` (validated, naturally ordered)
//! - **Closed enumerations**: `ConformityStatus`, `Category`
//! - **Entities**: `Control`, with `NewControl` and `Evaluation` as inputs

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::*;
