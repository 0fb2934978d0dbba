//! Capability-provider implementations.
//!
//! The messaging-analytics provider bridges the orchestration core to the
//! text-analytics cascade; the in-memory message source and the mock
//! provider exist so workflows can be exercised end to end without external
//! collaborators.

/// Messaging-analytics provider over a message source.
pub mod messaging;
/// Mock provider for testing orchestration workflows.
pub mod mock;
/// In-memory message source.
pub mod static_source;

pub use messaging::MessagingAnalyticsProvider;
pub use mock::MockCapabilityProvider;
pub use static_source::StaticMessageSource;
