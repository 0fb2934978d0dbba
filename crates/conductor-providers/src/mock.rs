//! Mock capability provider for testing orchestration workflows.
//!
//! Allows defining canned outcomes per action, enabling end-to-end testing
//! of scheduling, retry, and aggregation behavior without real backends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{Value, json};

use conductor_core::types::InvocationOutcome;
use conductor_core::{CapabilityProvider, Error, Result};

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Invoked action name.
    pub action: String,
    /// Parameter bag the action was invoked with.
    pub params: Value,
    /// When the invocation started.
    pub started_at: Instant,
}

fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Mock provider returning pre-defined outcomes per action.
#[derive(Clone)]
pub struct MockCapabilityProvider {
    key: &'static str,
    outcomes: Arc<Mutex<HashMap<String, InvocationOutcome>>>,
    transport_failures: Arc<Mutex<usize>>,
    delay: Option<Duration>,
    call_history: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockCapabilityProvider {
    /// Creates a mock registered under the given key.
    #[must_use]
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            outcomes: Arc::new(Mutex::new(HashMap::new())),
            transport_failures: Arc::new(Mutex::new(0)),
            delay: None,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Cans a successful payload for one action.
    #[must_use]
    pub fn with_payload(self, action: impl Into<String>, payload: Value) -> Self {
        {
            let mut outcomes = lock_ignore_poison(&self.outcomes);
            outcomes.insert(action.into(), InvocationOutcome::ok(payload));
        }
        self
    }

    /// Cans a failed outcome for one action.
    #[must_use]
    pub fn with_failure(self, action: impl Into<String>, error: impl Into<String>) -> Self {
        {
            let mut outcomes = lock_ignore_poison(&self.outcomes);
            outcomes.insert(action.into(), InvocationOutcome::err(error));
        }
        self
    }

    /// Makes the first `count` invocations fail with a retryable transport
    /// error.
    #[must_use]
    pub fn with_transport_failures(self, count: usize) -> Self {
        {
            let mut failures = lock_ignore_poison(&self.transport_failures);
            *failures = count;
        }
        self
    }

    /// Adds an artificial latency to every invocation.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Recorded invocations, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock_ignore_poison(&self.call_history).clone()
    }

    /// Number of recorded invocations.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock_ignore_poison(&self.call_history).len()
    }
}

#[async_trait]
impl CapabilityProvider for MockCapabilityProvider {
    fn key(&self) -> &'static str {
        self.key
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn invoke(&self, action: &str, params: &Value) -> Result<InvocationOutcome> {
        {
            let mut history = lock_ignore_poison(&self.call_history);
            history.push(RecordedCall {
                action: action.to_owned(),
                params: params.clone(),
                started_at: Instant::now(),
            });
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail_transport = {
            let mut failures = lock_ignore_poison(&self.transport_failures);
            if *failures > 0 {
                *failures -= 1;
                true
            } else {
                false
            }
        };
        if should_fail_transport {
            return Err(Error::ProviderUnavailable(format!(
                "{} transport failure",
                self.key
            )));
        }

        let canned = {
            let outcomes = lock_ignore_poison(&self.outcomes);
            outcomes.get(action).cloned()
        };
        Ok(canned.unwrap_or_else(|| {
            InvocationOutcome::ok(json!({ "response": format!("{} handled {action}", self.key) }))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_payload_and_history() {
        let mock = MockCapabilityProvider::new("chat")
            .with_payload("chat", json!({ "response": "hello" }));

        let outcome = match mock.invoke("chat", &json!({ "message": "hi" })).await {
            Ok(outcome) => outcome,
            Err(error) => panic!("invoke failed: {error}"),
        };
        assert!(outcome.success);
        assert_eq!(outcome.data["response"], "hello");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.calls()[0].action, "chat");
    }

    #[tokio::test]
    async fn test_default_outcome_for_unmatched_action() {
        let mock = MockCapabilityProvider::new("mail");
        let outcome = match mock.invoke("search", &json!({})).await {
            Ok(outcome) => outcome,
            Err(error) => panic!("invoke failed: {error}"),
        };
        assert!(outcome.success);
        assert_eq!(outcome.data["response"], "mail handled search");
    }

    #[tokio::test]
    async fn test_transport_failures_then_recovery() {
        let mock = MockCapabilityProvider::new("files").with_transport_failures(2);

        assert!(mock.invoke("search", &json!({})).await.is_err());
        assert!(mock.invoke("search", &json!({})).await.is_err());
        assert!(mock.invoke("search", &json!({})).await.is_ok());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_canned_failure_is_outcome_not_error() {
        let mock = MockCapabilityProvider::new("issues").with_failure("create_issue", "quota hit");
        let outcome = match mock.invoke("create_issue", &json!({})).await {
            Ok(outcome) => outcome,
            Err(error) => panic!("invoke failed: {error}"),
        };
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("quota hit"));
    }
}
