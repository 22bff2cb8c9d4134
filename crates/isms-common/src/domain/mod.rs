//! ISMS Domain Model
//!
//! - **Value Objects**: `ControlId`, `ControlCode`
//! - **Enumerations**: `ConformityStatus`, `Category` (closed sets)
//! - **Entities**: `Control`

pub mod value_objects;
pub mod status;
pub mod control;

pub use value_objects::*;
pub use status::*;
pub use control::*;
