//! Data models shared between the API layer and the repository.

mod admin;
mod employee;

pub use admin::*;
pub use employee::*;
