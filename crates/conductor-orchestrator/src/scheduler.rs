//! Dependency scheduling: level computation and concurrent execution.
//!
//! Subtasks are grouped into ordered levels of mutually independent work.
//! Levels execute strictly in order; within a level every subtask is
//! invoked concurrently behind a semaphore cap, and the scheduler waits for
//! all of them to settle before advancing. One subtask's failure never
//! cancels its level-mates.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;

use conductor_core::CapabilityProvider;
use conductor_core::types::{InvocationOutcome, SubTask, SubTaskId, SubTaskStatus};

use crate::config::ExecutionConfig;
use crate::error::{OrchestratorError, Result};
use crate::registry::CapabilityRegistry;

/// Level-based scheduler over a subtask set.
#[derive(Debug, Clone)]
pub struct DependencyScheduler {
    max_concurrent: usize,
    invocation_timeout: Duration,
    max_retries: usize,
    retry_backoff: Duration,
}

impl Default for DependencyScheduler {
    fn default() -> Self {
        Self::new(&ExecutionConfig::default())
    }
}

impl DependencyScheduler {
    /// Creates a scheduler from execution configuration.
    #[must_use]
    pub fn new(config: &ExecutionConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent_subtasks.max(1),
            invocation_timeout: Duration::from_secs(config.subtask_timeout_seconds),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    /// Groups subtasks into ordered levels of mutually independent work.
    ///
    /// Repeatedly collects every not-yet-processed subtask whose dependencies
    /// are all processed. The returned levels partition the input exactly.
    ///
    /// # Errors
    /// Returns [`OrchestratorError::CycleDetected`] naming the stuck subtask
    /// ids when a full pass makes no progress; a dependency on a subtask
    /// outside the set is reported the same way.
    pub fn compute_levels(subtasks: &[SubTask]) -> Result<Vec<Vec<SubTaskId>>> {
        let mut levels = Vec::new();
        let mut processed: HashSet<SubTaskId> = HashSet::new();

        while processed.len() < subtasks.len() {
            let ready: Vec<SubTaskId> = subtasks
                .iter()
                .filter(|sub| !processed.contains(&sub.id))
                .filter(|sub| sub.depends_on.iter().all(|dep| processed.contains(dep)))
                .map(|sub| sub.id)
                .collect();

            if ready.is_empty() {
                let mut stuck: Vec<SubTaskId> = subtasks
                    .iter()
                    .filter(|sub| !processed.contains(&sub.id))
                    .map(|sub| sub.id)
                    .collect();
                stuck.sort_unstable();
                return Err(OrchestratorError::CycleDetected { stuck });
            }

            processed.extend(ready.iter().copied());
            levels.push(ready);
        }

        Ok(levels)
    }

    /// Fast acyclicity check over the dependency graph.
    #[must_use]
    pub fn has_cycles(subtasks: &[SubTask]) -> bool {
        let mut graph: DiGraph<SubTaskId, ()> = DiGraph::new();
        let mut nodes = HashMap::new();
        for sub in subtasks {
            nodes.insert(sub.id, graph.add_node(sub.id));
        }
        for sub in subtasks {
            for dep in &sub.depends_on {
                if let (Some(&from), Some(&to)) = (nodes.get(dep), nodes.get(&sub.id)) {
                    graph.add_edge(from, to, ());
                }
            }
        }
        is_cyclic_directed(&graph)
    }

    /// Executes a subtask set level by level, writing each outcome back onto
    /// its subtask.
    ///
    /// Every provider is resolved against the registry before anything runs,
    /// so a misconfigured plan fails fast instead of half-executing.
    ///
    /// # Errors
    /// Returns [`OrchestratorError::CycleDetected`] for cyclic graphs and
    /// [`OrchestratorError::UnknownProvider`] for unresolvable provider
    /// keys. Individual invocation failures are recorded on the subtask and
    /// never propagate.
    pub async fn execute(
        &self,
        registry: &CapabilityRegistry,
        subtasks: &mut [SubTask],
    ) -> Result<()> {
        let levels = Self::compute_levels(subtasks)?;

        let mut providers: HashMap<SubTaskId, Arc<dyn CapabilityProvider>> = HashMap::new();
        for sub in subtasks.iter() {
            providers.insert(sub.id, registry.get(&sub.provider)?);
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        for (level_index, level) in levels.iter().enumerate() {
            tracing::debug!(
                level = level_index,
                width = level.len(),
                "executing scheduling level"
            );
            let mut join_set: JoinSet<(SubTaskId, InvocationOutcome)> = JoinSet::new();

            for id in level {
                let Some(position) = subtasks.iter().position(|sub| sub.id == *id) else {
                    continue;
                };
                subtasks[position].status = SubTaskStatus::Executing;

                let provider = providers
                    .get(id)
                    .map(Arc::clone)
                    .ok_or_else(|| OrchestratorError::UnknownProvider(subtasks[position].provider.clone()))?;
                let action = subtasks[position].action.clone();
                let params = subtasks[position].params.clone();
                let semaphore = Arc::clone(&semaphore);
                let scheduler = self.clone();
                let sub_id = *id;

                join_set.spawn(async move {
                    let permit = semaphore.acquire_owned().await;
                    let outcome = scheduler.invoke_with_policy(&provider, &action, &params).await;
                    drop(permit);
                    (sub_id, outcome)
                });
            }

            // Wait for all, ignore individual failure: a level settles
            // completely before the next one starts.
            while let Some(joined) = join_set.join_next().await {
                let (id, outcome) = match joined {
                    Ok(pair) => pair,
                    Err(join_error) => {
                        return Err(OrchestratorError::ExecutionFailed(join_error.to_string()));
                    }
                };
                if let Some(sub) = subtasks.iter_mut().find(|sub| sub.id == id) {
                    if outcome.success {
                        sub.record_success(outcome.data);
                    } else {
                        let reason = outcome
                            .error
                            .unwrap_or_else(|| "provider reported failure".to_owned());
                        tracing::warn!(subtask = %id, error = %reason, "subtask failed");
                        sub.record_failure(reason);
                    }
                }
            }
        }

        Ok(())
    }

    /// One invocation wrapped with a timeout and bounded retry-with-backoff.
    ///
    /// Only transport-level errors the provider marks retryable (and
    /// timeouts) are retried; action-level failures come back as failed
    /// outcomes immediately.
    async fn invoke_with_policy(
        &self,
        provider: &Arc<dyn CapabilityProvider>,
        action: &str,
        params: &Value,
    ) -> InvocationOutcome {
        let mut attempt = 0;
        loop {
            let result = timeout(self.invocation_timeout, provider.invoke(action, params)).await;
            let error = match result {
                Ok(Ok(outcome)) => return outcome,
                Ok(Err(invoke_error)) => {
                    let retryable = invoke_error.is_retryable();
                    if !retryable || attempt >= self.max_retries {
                        return InvocationOutcome::err(invoke_error.to_string());
                    }
                    invoke_error.to_string()
                }
                Err(_) => {
                    let timeout_error =
                        OrchestratorError::Timeout(self.invocation_timeout.as_millis() as u64);
                    if attempt >= self.max_retries {
                        return InvocationOutcome::err(timeout_error.to_string());
                    }
                    timeout_error.to_string()
                }
            };

            attempt += 1;
            tracing::debug!(action, attempt, error = %error, "retrying invocation");
            tokio::time::sleep(self.retry_backoff * attempt as u32).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Instant;

    use conductor_core::types::TaskId;

    /// Test double recording invocation start/end instants.
    struct TimedProvider {
        key: &'static str,
        delay: Duration,
        spans: Arc<Mutex<Vec<(Instant, Instant)>>>,
    }

    #[async_trait]
    impl CapabilityProvider for TimedProvider {
        fn key(&self) -> &'static str {
            self.key
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn invoke(
            &self,
            _action: &str,
            _params: &Value,
        ) -> conductor_core::Result<InvocationOutcome> {
            let start = Instant::now();
            tokio::time::sleep(self.delay).await;
            if let Ok(mut spans) = self.spans.lock() {
                spans.push((start, Instant::now()));
            }
            Ok(InvocationOutcome::ok(json!({ "done": true })))
        }
    }

    /// Fails a fixed number of times with a retryable error, then succeeds.
    struct FlakyProvider {
        failures_left: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl CapabilityProvider for FlakyProvider {
        fn key(&self) -> &'static str {
            "flaky"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn invoke(
            &self,
            _action: &str,
            _params: &Value,
        ) -> conductor_core::Result<InvocationOutcome> {
            let should_fail = {
                let mut left = match self.failures_left.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                if *left > 0 {
                    *left -= 1;
                    true
                } else {
                    false
                }
            };
            if should_fail {
                return Err(conductor_core::Error::ProviderUnavailable(
                    "transient".to_owned(),
                ));
            }
            Ok(InvocationOutcome::ok(json!({ "recovered": true })))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl CapabilityProvider for FailingProvider {
        fn key(&self) -> &'static str {
            "failing"
        }

        async fn is_available(&self) -> bool {
            false
        }

        async fn invoke(
            &self,
            _action: &str,
            _params: &Value,
        ) -> conductor_core::Result<InvocationOutcome> {
            Ok(InvocationOutcome::err("backend rejected the action"))
        }
    }

    fn subtask(task_id: TaskId, provider: &str, deps: Vec<SubTaskId>) -> SubTask {
        SubTask::new(task_id, provider, "work").with_dependencies(deps)
    }

    #[test]
    fn test_levels_partition_input_exactly() {
        let task_id = TaskId::new();
        let sub_a = subtask(task_id, "p", Vec::new());
        let sub_b = subtask(task_id, "p", vec![sub_a.id]);
        let sub_c = subtask(task_id, "p", Vec::new());
        let subtasks = vec![sub_a.clone(), sub_b.clone(), sub_c.clone()];

        let levels = match DependencyScheduler::compute_levels(&subtasks) {
            Ok(levels) => levels,
            Err(error) => panic!("compute_levels failed: {error}"),
        };

        // [A(no deps), B(dep A), C(no deps)] => [{A, C}, {B}]
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].len(), 2);
        assert!(levels[0].contains(&sub_a.id));
        assert!(levels[0].contains(&sub_c.id));
        assert_eq!(levels[1], vec![sub_b.id]);

        let mut seen = HashSet::new();
        for level in &levels {
            for id in level {
                assert!(seen.insert(*id), "id appears in exactly one level");
            }
        }
        assert_eq!(seen.len(), subtasks.len());
    }

    #[test]
    fn test_cycle_detected_names_stuck_ids() {
        let task_id = TaskId::new();
        let mut sub_a = subtask(task_id, "p", Vec::new());
        let mut sub_b = subtask(task_id, "p", Vec::new());
        sub_a.depends_on = vec![sub_b.id];
        sub_b.depends_on = vec![sub_a.id];
        let root = subtask(task_id, "p", Vec::new());
        let subtasks = vec![root, sub_a.clone(), sub_b.clone()];

        assert!(DependencyScheduler::has_cycles(&subtasks));
        let error = DependencyScheduler::compute_levels(&subtasks).err();
        match error {
            Some(OrchestratorError::CycleDetected { stuck }) => {
                assert!(stuck.contains(&sub_a.id));
                assert!(stuck.contains(&sub_b.id));
                assert_eq!(stuck.len(), 2);
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn test_dependency_outside_set_is_rejected() {
        let task_id = TaskId::new();
        let ghost = SubTaskId::new();
        let sub = subtask(task_id, "p", vec![ghost]);
        let error = DependencyScheduler::compute_levels(&[sub]).err();
        assert!(matches!(
            error,
            Some(OrchestratorError::CycleDetected { .. })
        ));
    }

    #[tokio::test]
    async fn test_independent_subtasks_run_concurrently() {
        let spans = Arc::new(Mutex::new(Vec::new()));
        let provider = Arc::new(TimedProvider {
            key: "timed",
            delay: Duration::from_millis(50),
            spans: Arc::clone(&spans),
        });
        let registry = CapabilityRegistry::new().with_provider(provider);

        let task_id = TaskId::new();
        let mut subtasks: Vec<SubTask> = (0..4)
            .map(|_| subtask(task_id, "timed", Vec::new()))
            .collect();

        let scheduler = DependencyScheduler::new(&ExecutionConfig {
            max_concurrent_subtasks: 8,
            ..ExecutionConfig::default()
        });
        match scheduler.execute(&registry, &mut subtasks).await {
            Ok(()) => {}
            Err(error) => panic!("execute failed: {error}"),
        }

        assert!(
            subtasks
                .iter()
                .all(|sub| sub.status == SubTaskStatus::Completed)
        );

        // All four spans must overlap pairwise: every start precedes every
        // other span's end.
        let spans = match spans.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        assert_eq!(spans.len(), 4);
        for (index, &(start, _)) in spans.iter().enumerate() {
            for (other_index, &(_, end)) in spans.iter().enumerate() {
                if index != other_index {
                    assert!(start < end, "level-mates must execute concurrently");
                }
            }
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_cancel_level_mates() {
        let spans = Arc::new(Mutex::new(Vec::new()));
        let ok_provider = Arc::new(TimedProvider {
            key: "timed",
            delay: Duration::from_millis(5),
            spans,
        });
        let registry = CapabilityRegistry::new()
            .with_provider(ok_provider)
            .with_provider(Arc::new(FailingProvider));

        let task_id = TaskId::new();
        let mut subtasks = vec![
            subtask(task_id, "failing", Vec::new()),
            subtask(task_id, "timed", Vec::new()),
        ];

        match DependencyScheduler::default()
            .execute(&registry, &mut subtasks)
            .await
        {
            Ok(()) => {}
            Err(error) => panic!("execute failed: {error}"),
        }

        assert_eq!(subtasks[0].status, SubTaskStatus::Failed);
        assert!(subtasks[0].error.is_some());
        assert_eq!(subtasks[1].status, SubTaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_retry_recovers_transient_failures() {
        let provider = Arc::new(FlakyProvider {
            failures_left: Arc::new(Mutex::new(2)),
        });
        let registry = CapabilityRegistry::new().with_provider(provider);

        let task_id = TaskId::new();
        let mut subtasks = vec![subtask(task_id, "flaky", Vec::new())];

        let scheduler = DependencyScheduler::new(&ExecutionConfig {
            max_retries: 2,
            retry_backoff_ms: 5,
            ..ExecutionConfig::default()
        });
        match scheduler.execute(&registry, &mut subtasks).await {
            Ok(()) => {}
            Err(error) => panic!("execute failed: {error}"),
        }

        assert_eq!(subtasks[0].status, SubTaskStatus::Completed);
        assert_eq!(subtasks[0].result, Some(json!({ "recovered": true })));
    }

    #[tokio::test]
    async fn test_unknown_provider_fails_before_execution() {
        let registry = CapabilityRegistry::new();
        let task_id = TaskId::new();
        let mut subtasks = vec![subtask(task_id, "ghost", Vec::new())];

        let error = DependencyScheduler::default()
            .execute(&registry, &mut subtasks)
            .await
            .err();
        assert!(matches!(
            error,
            Some(OrchestratorError::UnknownProvider(key)) if key == "ghost"
        ));
        assert_eq!(subtasks[0].status, SubTaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_levels_execute_in_order() {
        let spans = Arc::new(Mutex::new(Vec::new()));
        let provider = Arc::new(TimedProvider {
            key: "timed",
            delay: Duration::from_millis(20),
            spans: Arc::clone(&spans),
        });
        let registry = CapabilityRegistry::new().with_provider(provider);

        let task_id = TaskId::new();
        let first = subtask(task_id, "timed", Vec::new());
        let second = subtask(task_id, "timed", vec![first.id]);
        let mut subtasks = vec![first, second];

        match DependencyScheduler::default()
            .execute(&registry, &mut subtasks)
            .await
        {
            Ok(()) => {}
            Err(error) => panic!("execute failed: {error}"),
        }

        let spans = match spans.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        assert_eq!(spans.len(), 2);
        // Level 2 must not start before level 1 fully settled.
        assert!(spans[0].1 <= spans[1].0);
    }
}
