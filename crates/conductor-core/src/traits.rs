use async_trait::async_trait;
use serde_json::Value;

use crate::types::{InvocationOutcome, MessagePage, MessageQuery};
use crate::Result;

/// Trait for pluggable capability providers reachable through the uniform
/// invocation contract.
///
/// Providers are registered by key with the orchestrator's registry; new
/// providers register without changing the scheduler.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Returns the registry key for this provider.
    fn key(&self) -> &'static str;

    /// Checks whether this provider is currently able to process requests.
    async fn is_available(&self) -> bool;

    /// Invokes one action with a parameter bag.
    ///
    /// Failures that belong to the action itself (bad input, empty results)
    /// are reported through [`InvocationOutcome`]; transport-level failures
    /// are returned as errors so the scheduler can retry them.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable or the action is not
    /// recognized.
    async fn invoke(&self, action: &str, params: &Value) -> Result<InvocationOutcome>;
}

/// Trait for collaborators that deliver conversational messages to the
/// text-analytics cascade.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Loads messages for one context, oldest first, honoring the query
    /// filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be reached.
    async fn load(&self, context_id: &str, query: &MessageQuery) -> Result<MessagePage>;
}
