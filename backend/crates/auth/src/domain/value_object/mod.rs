//! Value Object Module

pub mod login;
pub mod token_identity;
pub mod user_id;
