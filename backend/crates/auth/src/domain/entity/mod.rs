//! Domain Entities

pub mod credential;
pub mod user;
