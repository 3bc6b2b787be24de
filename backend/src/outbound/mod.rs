//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-process store for development and tests
//! - **cache**: in-process TTL cache for catalogue snapshots
//! - **queue**: Tokio channel notification sink
//!
//! Adapters translate between domain types and infrastructure types. They
//! hold no business rules.

pub mod cache;
pub mod memory;
pub mod persistence;
pub mod queue;
