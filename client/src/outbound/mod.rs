//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed access to the remote vehicle collection
//!
//! Adapters are thin translators that convert between domain types and wire
//! representations. They contain no business logic.

pub mod http;
