//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Typed identifiers shared by every store adapter
//! - The transport-agnostic error envelope handed to the boundary layer
//!
//! Only things that are hard to change and carry the same meaning in
//! every crate belong here.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;
