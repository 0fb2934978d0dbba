//! High-level orchestrator coordinating the full request pipeline.
//!
//! One instance owns its capability registry for the lifetime of its caller;
//! nothing is shared across orchestrators. The pipeline is
//! classify → plan → schedule → aggregate, with task status transitions at
//! each phase boundary.

use std::sync::Arc;

use conductor_core::types::{Task, TaskStatus, UnifiedResult};

use crate::aggregator::ResultAggregator;
use crate::config::OrchestratorConfig;
use crate::error::Result;
use crate::intent::{IntentStrategy, KeywordIntentClassifier};
use crate::planner::TaskPlanner;
use crate::registry::CapabilityRegistry;
use crate::scheduler::DependencyScheduler;

/// Coordinates classification, planning, scheduling, and aggregation for
/// one caller.
#[derive(Clone)]
pub struct Orchestrator {
    config: OrchestratorConfig,
    classifier: Arc<dyn IntentStrategy>,
    planner: TaskPlanner,
    scheduler: DependencyScheduler,
    aggregator: ResultAggregator,
    registry: Arc<CapabilityRegistry>,
}

impl Orchestrator {
    /// Creates an orchestrator owning the given registry.
    ///
    /// The default keyword classifier seeds its timeframe from the analysis
    /// configuration.
    #[must_use]
    pub fn new(config: OrchestratorConfig, registry: CapabilityRegistry) -> Self {
        let classifier = Arc::new(KeywordIntentClassifier::new(
            crate::intent::ClassifierRules::default(),
            config.analysis.default_timeframe_days,
        ));
        let scheduler = DependencyScheduler::new(&config.execution);
        Self {
            config,
            classifier,
            planner: TaskPlanner,
            scheduler,
            aggregator: ResultAggregator,
            registry: Arc::new(registry),
        }
    }

    /// Sets a custom intent-classification strategy.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentStrategy>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Handles one user request end to end, returning the unified result.
    ///
    /// # Errors
    /// Returns an error only for fatal conditions: a cyclic subtask graph or
    /// an unresolvable provider key. Individual subtask failures are
    /// tolerated and reflected in the result instead.
    pub async fn handle_request(
        &self,
        request: &str,
        context_id: &str,
        user_id: &str,
    ) -> Result<UnifiedResult> {
        let (_, result) = self.run(request, context_id, user_id).await;
        result
    }

    /// Like [`Self::handle_request`], but also returns the finished task
    /// record with its per-subtask statuses.
    pub async fn run(
        &self,
        request: &str,
        context_id: &str,
        user_id: &str,
    ) -> (Task, Result<UnifiedResult>) {
        let mut task = Task::new(request, context_id, user_id);
        tracing::info!(task = ?task.id, "handling request");

        let intent = self.classifier.classify(request).await;
        task.category = intent.category;

        task.transition(TaskStatus::Planning);
        self.planner.plan(&mut task, &intent);
        tracing::info!(
            task = ?task.id,
            category = ?task.category,
            subtasks = task.subtasks.len(),
            "planned request"
        );

        task.transition(TaskStatus::Executing);
        if let Err(error) = self
            .scheduler
            .execute(&self.registry, &mut task.subtasks)
            .await
        {
            tracing::warn!(task = ?task.id, error = %error, "task aborted");
            task.error = Some(error.to_string());
            task.transition(TaskStatus::Failed);
            return (task, Err(error));
        }

        let result = self.aggregator.aggregate(&task);
        task.transition(if result.success {
            TaskStatus::Completed
        } else {
            TaskStatus::Failed
        });
        task.result = serde_json::to_value(&result.data).ok();
        tracing::info!(task = ?task.id, success = result.success, "request finished");

        (task, Ok(result))
    }

    /// Gets the orchestrator configuration.
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Gets a reference to the capability registry.
    #[must_use]
    pub fn registry(&self) -> Arc<CapabilityRegistry> {
        Arc::clone(&self.registry)
    }
}

impl core::fmt::Debug for Orchestrator {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter
            .debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conductor_core::CapabilityProvider;
    use conductor_core::types::InvocationOutcome;
    use serde_json::{Value, json};

    struct CannedChat;

    #[async_trait]
    impl CapabilityProvider for CannedChat {
        fn key(&self) -> &'static str {
            "chat"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn invoke(
            &self,
            _action: &str,
            params: &Value,
        ) -> conductor_core::Result<InvocationOutcome> {
            let message = params
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("nothing");
            Ok(InvocationOutcome::ok(
                json!({ "response": format!("echo: {message}") }),
            ))
        }
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let registry = CapabilityRegistry::new().with_provider(Arc::new(CannedChat));
        let orchestrator = Orchestrator::new(OrchestratorConfig::default(), registry);

        let (task, result) = orchestrator.run("good morning", "ctx-1", "user-1").await;
        let result = match result {
            Ok(result) => result,
            Err(error) => panic!("handle_request failed: {error}"),
        };

        assert!(result.success);
        assert_eq!(result.summary, "echo: good morning");
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.result.is_some());
    }

    #[tokio::test]
    async fn test_missing_provider_is_fatal() {
        let registry = CapabilityRegistry::new();
        let orchestrator = Orchestrator::new(OrchestratorConfig::default(), registry);

        let (task, result) = orchestrator.run("hello", "ctx-1", "user-1").await;
        assert!(result.is_err());
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.error.is_some());
    }
}
