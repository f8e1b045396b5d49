//! Server initialization and startup logic.
//!
//! This is the composition root: the tool registry, the workflow registry
//! and the orchestrator are built here and handed to the API layer.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use thinking_api::{ApiConfig, ApiServer, AppState};
use thinking_config::{Config, ConfigLoader, LoggingConfig, OrchestratorConfig};
use thinking_core::{EchoTool, HttpTool, HttpToolOptions, ToolRegistry};
use thinking_orchestration::{ExecutorOptions, Orchestrator, WorkflowError, WorkflowRegistry, load_workflows};
use thinking_protocols::ToolError;

/// Initialize tracing with console output and, when enabled, a daily rolling
/// log file.
///
/// Filter precedence: `level_override`, then `RUST_LOG`, then `logging.level`.
pub(crate) fn init_tracing(
    logging: &LoggingConfig,
    level_override: Option<&str>,
    with_file: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = match level_override {
        Some(level) => EnvFilter::try_new(level)?,
        None => match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&logging.level)?,
        },
    };

    let file_layer = if with_file && logging.file {
        let log_dir = PathBuf::from(ConfigLoader::expand_path(&logging.dir));
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("unified-thinking")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Dropping the guard stops the writer thread.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    Ok(())
}

pub(crate) fn executor_options(config: &OrchestratorConfig) -> ExecutorOptions {
    ExecutorOptions {
        max_concurrent_steps: config.max_concurrent_steps,
        step_timeout: Duration::from_secs(config.step_timeout_secs),
        workflow_timeout: (config.workflow_timeout_secs > 0)
            .then(|| Duration::from_secs(config.workflow_timeout_secs)),
        event_buffer: config.event_buffer,
    }
}

/// Built-in tools plus one [`HttpTool`] per `[tools.<name>]` entry.
pub(crate) fn build_tools(config: &Config) -> Result<Arc<ToolRegistry>, ToolError> {
    let registry = Arc::new(ToolRegistry::new());
    registry.register(Arc::new(EchoTool::new()))?;

    let mut remotes: Vec<_> = config.tools.iter().collect();
    remotes.sort_by(|a, b| a.0.cmp(b.0));
    for (name, remote) in remotes {
        let options = HttpToolOptions {
            url: remote.url.clone(),
            description: remote.description.clone(),
            timeout_secs: remote.timeout_secs,
            headers: remote.headers.clone(),
        };
        registry.register(Arc::new(HttpTool::new(name.as_str(), options)?))?;
        info!(tool = %name, url = %remote.url, "Registered remote tool");
    }

    Ok(registry)
}

/// Register every workflow found under `paths`. Missing paths are skipped.
pub(crate) fn preload_workflows(
    orchestrator: &Orchestrator,
    paths: &[PathBuf],
) -> Result<usize, WorkflowError> {
    let mut count = 0;
    for path in paths {
        let path = PathBuf::from(ConfigLoader::expand_path(&path.to_string_lossy()));
        if !path.exists() {
            warn!(path = %path.display(), "Workflow path does not exist, skipping");
            continue;
        }
        for workflow in load_workflows(&path)? {
            orchestrator.register(workflow)?;
            count += 1;
        }
    }
    Ok(count)
}

/// Run the server in foreground.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting unified-thinking v{}", env!("CARGO_PKG_VERSION"));

    let tools = build_tools(&config)?;
    info!("{} tool(s) registered", tools.len());

    let orchestrator = Arc::new(Orchestrator::new(Arc::new(WorkflowRegistry::new())));
    orchestrator.set_tool_executor(tools.clone(), executor_options(&config.orchestrator));

    let loaded = preload_workflows(&orchestrator, &config.workflows.paths)?;
    info!("{} workflow(s) preloaded", loaded);

    let state = Arc::new(AppState::new(orchestrator, tools));
    let server = ApiServer::new(
        ApiConfig::new(&config.server.host, config.server.port),
        state,
    );

    info!("unified-thinking ready at http://{}", server.addr());
    info!("  POST /workflows              - register workflow");
    info!("  GET  /workflows              - list workflows");
    info!("  POST /workflows/{{id}}/execute - execute workflow");

    server.run().await?;

    info!("Shutting down...");
    Ok(())
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
