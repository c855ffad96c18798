//! Domain model structs and DTOs.

pub mod tracked_email;
