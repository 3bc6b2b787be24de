//! XP and achievement engine for a gamified fitness tracker.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the rules,
//! services, and ports; [`outbound`] the storage, cache, and queue
//! adapters; [`inbound`] the HTTP surface.

pub mod composition;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
