//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) where the row is mutable

pub mod audit;
pub mod marking;
pub mod public_dashboard;
pub mod settings;
pub mod user;
pub mod workspace;
