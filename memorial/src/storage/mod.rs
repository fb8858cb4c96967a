//! Storage module
//!
//! Local fallback persistence used when the remote store is unavailable.

pub mod local_store;

pub use local_store::LocalStore;
