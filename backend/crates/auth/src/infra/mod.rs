//! Infrastructure Layer
//!
//! Store implementations: MongoDB for users and session state, PostgreSQL
//! for credentials, and in-memory stand-ins for both.

pub mod memory;
pub mod mongo;
pub mod postgres;

pub use memory::{MemoryCredentialRepository, MemorySessionRepository};
pub use mongo::MongoSessionRepository;
pub use postgres::PgCredentialRepository;
