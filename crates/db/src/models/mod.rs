//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize`/plain create DTOs for inserts and updates

pub mod scan_session;
pub mod user_wine;
pub mod wine;
