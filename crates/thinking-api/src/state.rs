//! Application state.

use std::sync::Arc;
use std::time::Instant;

use thinking_core::ToolRegistry;
use thinking_orchestration::Orchestrator;

/// Application state shared across handlers.
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub tools: Arc<ToolRegistry>,
    start_time: Instant,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            orchestrator,
            tools,
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thinking_orchestration::WorkflowRegistry;

    #[test]
    fn test_app_state_new() {
        let orchestrator = Arc::new(Orchestrator::new(Arc::new(WorkflowRegistry::new())));
        let state = AppState::new(orchestrator, Arc::new(ToolRegistry::new()));
        assert!(state.tools.is_empty());
        assert_eq!(state.orchestrator.list_workflows().count, 0);
    }

    #[test]
    fn test_uptime() {
        let orchestrator = Arc::new(Orchestrator::new(Arc::new(WorkflowRegistry::new())));
        let state = AppState::new(orchestrator, Arc::new(ToolRegistry::new()));
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(state.uptime().as_millis() >= 10);
    }
}
