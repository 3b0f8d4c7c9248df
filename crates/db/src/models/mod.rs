//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` + `Validate` request DTOs that reject unknown fields

pub mod category;
pub mod dashboard;
pub mod owner;
pub mod product;
