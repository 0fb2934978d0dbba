//! Capability registry: uniform invocation over named providers.
//!
//! The registry is owned by the orchestrator instance that receives it and
//! is immutable after construction, so no cross-request shared mutable
//! state exists. New providers register without changing the scheduler.

use std::collections::HashMap;
use std::sync::Arc;

use conductor_core::CapabilityProvider;

use crate::error::{OrchestratorError, Result};

/// Immutable map from provider key to provider instance.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    providers: HashMap<&'static str, Arc<dyn CapabilityProvider>>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its own key.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn CapabilityProvider>) -> Self {
        self.providers.insert(provider.key(), provider);
        self
    }

    /// Resolves a provider by key.
    ///
    /// # Errors
    /// Returns [`OrchestratorError::UnknownProvider`] for unregistered keys;
    /// a configuration error, not a runtime panic.
    pub fn get(&self, key: &str) -> Result<Arc<dyn CapabilityProvider>> {
        self.providers
            .get(key)
            .map(Arc::clone)
            .ok_or_else(|| OrchestratorError::UnknownProvider(key.to_owned()))
    }

    /// Registered provider keys.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.providers.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl core::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter
            .debug_struct("CapabilityRegistry")
            .field("providers", &self.keys())
            .finish()
    }
}
