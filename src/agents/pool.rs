use std::collections::HashMap;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::executor::{AgentExecutor, ExecutorFactory};
use crate::domain::agent::AgentType;

/// Reusable executors, kept idle per agent type
///
/// `acquire` hands out an idle executor or builds a new one; the returned
/// guard puts it back when dropped. At most `max_idle` executors are kept per
/// type; extras built under load are dropped on release. The lock is never
/// held across `.await`.
pub struct ExecutorPool {
    factory: ExecutorFactory,
    max_idle: usize,
    idle: Mutex<HashMap<AgentType, Vec<Box<dyn AgentExecutor>>>>,
    created: AtomicUsize,
}

impl ExecutorPool {
    /// Creates a pool holding `initial_per_type` idle executors for every type
    ///
    /// The same number caps the idle executors per type, with a floor of one.
    pub fn new(factory: ExecutorFactory, initial_per_type: usize) -> Arc<Self> {
        let pool = Self {
            factory,
            max_idle: initial_per_type.max(1),
            idle: Mutex::new(HashMap::new()),
            created: AtomicUsize::new(0),
        };

        {
            let mut idle = pool.idle.lock().unwrap_or_else(|e| e.into_inner());
            for agent_type in AgentType::ALL {
                let executors = (0..initial_per_type)
                    .map(|_| pool.build(agent_type))
                    .collect();
                idle.insert(agent_type, executors);
            }
        }

        Arc::new(pool)
    }

    fn build(&self, agent_type: AgentType) -> Box<dyn AgentExecutor> {
        self.created.fetch_add(1, Ordering::Relaxed);
        self.factory.build(agent_type)
    }

    /// Takes an idle executor for `agent_type`, building one if none is idle
    pub fn acquire(self: &Arc<Self>, agent_type: AgentType) -> PooledExecutor {
        let reused = self
            .idle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(&agent_type)
            .and_then(Vec::pop);

        let executor = match reused {
            Some(executor) => executor,
            None => {
                tracing::debug!(agent_type = %agent_type, "Executor pool empty, building executor");
                self.build(agent_type)
            }
        };

        PooledExecutor {
            pool: Arc::clone(self),
            agent_type,
            executor: Some(executor),
        }
    }

    fn release(&self, agent_type: AgentType, executor: Box<dyn AgentExecutor>) {
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        let executors = idle.entry(agent_type).or_default();
        if executors.len() < self.max_idle {
            executors.push(executor);
        }
    }

    /// Number of executors waiting in the pool for `agent_type`
    pub fn idle_count(&self, agent_type: AgentType) -> usize {
        self.idle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&agent_type)
            .map_or(0, Vec::len)
    }

    /// Number of executors built since the pool was created
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}

/// Executor checked out of an [`ExecutorPool`]
pub struct PooledExecutor {
    pool: Arc<ExecutorPool>,
    agent_type: AgentType,
    executor: Option<Box<dyn AgentExecutor>>,
}

impl Deref for PooledExecutor {
    type Target = dyn AgentExecutor;

    fn deref(&self) -> &Self::Target {
        // Only `drop` takes the executor out.
        match &self.executor {
            Some(executor) => &**executor,
            None => unreachable!("pooled executor used after release"),
        }
    }
}

impl Drop for PooledExecutor {
    fn drop(&mut self) {
        if let Some(executor) = self.executor.take() {
            self.pool.release(self.agent_type, executor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pool(initial: usize) -> Arc<ExecutorPool> {
        ExecutorPool::new(ExecutorFactory::new(Duration::from_secs(1)), initial)
    }

    #[test]
    fn initial_size_prefills_every_type() {
        let pool = pool(2);

        for agent_type in AgentType::ALL {
            assert_eq!(pool.idle_count(agent_type), 2);
        }
        assert_eq!(pool.created_count(), 2 * AgentType::ALL.len());
    }

    #[test]
    fn acquire_reuses_released_executor() {
        let pool = pool(1);
        let created = pool.created_count();

        let executor = pool.acquire(AgentType::Adk);
        assert_eq!(pool.idle_count(AgentType::Adk), 0);
        drop(executor);
        assert_eq!(pool.idle_count(AgentType::Adk), 1);

        let _again = pool.acquire(AgentType::Adk);
        assert_eq!(pool.created_count(), created);
    }

    #[test]
    fn acquire_builds_when_empty() {
        let pool = pool(0);

        let first = pool.acquire(AgentType::A2a);
        let second = pool.acquire(AgentType::A2a);

        assert_eq!(pool.created_count(), 2);
        assert_eq!(first.kind(), "forwarding");
        drop(first);
        drop(second);
        assert_eq!(pool.idle_count(AgentType::A2a), 1);
    }

    #[test]
    fn release_keeps_at_most_the_configured_idle() {
        let pool = pool(2);

        let burst: Vec<_> = (0..5).map(|_| pool.acquire(AgentType::Adk)).collect();
        assert_eq!(pool.idle_count(AgentType::Adk), 0);
        assert_eq!(pool.created_count(), 2 * AgentType::ALL.len() + 3);

        drop(burst);
        assert_eq!(pool.idle_count(AgentType::Adk), 2);
    }

    #[test]
    fn pools_are_separate_per_type() {
        let pool = pool(0);
        drop(pool.acquire(AgentType::Mcp));

        assert_eq!(pool.idle_count(AgentType::Mcp), 1);
        assert_eq!(pool.idle_count(AgentType::Custom), 0);
        assert_eq!(pool.acquire(AgentType::Custom).kind(), "loopback");
    }
}
