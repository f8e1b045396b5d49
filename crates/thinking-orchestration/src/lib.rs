//! # Unified Thinking Orchestration
//!
//! Workflow orchestration engine: composes independent tools into multi-step
//! workflows with data dependencies between steps.
//!
//! ## Components
//!
//! - [`WorkflowRegistry`] - Validated, immutable workflow definitions
//! - [`DependencyResolver`] - Orders steps into dependency batches
//! - [`TemplateResolver`] - Substitutes `$name` / `key.field` references
//! - [`ConditionEvaluator`] - Gates steps on a prior step's result
//! - [`WorkflowExecutor`] - Runs batches against a [`ToolExecutor`] and
//!   aggregates a [`WorkflowResult`]
//! - [`Orchestrator`] - Facade used by the server
//!
//! [`ToolExecutor`]: thinking_protocols::ToolExecutor

pub mod condition;
pub mod definition;
pub mod error;
pub mod events;
pub mod executor;
pub mod files;
pub mod mock;
pub mod orchestrator;
pub mod registry;
pub mod resolver;
pub mod result;
pub mod store;
pub mod template;
pub mod transform;

pub use condition::ConditionEvaluator;
pub use definition::{
    ConditionOperator, OutputTransform, StepCondition, Workflow, WorkflowStep, WorkflowSummary,
    WorkflowType,
};
pub use error::{StepError, WorkflowError};
pub use events::WorkflowEvent;
pub use executor::{ExecutorOptions, WorkflowExecutor};
pub use files::load_workflows;
pub use mock::MockToolExecutor;
pub use orchestrator::{Orchestrator, RegistrationResponse, WorkflowList};
pub use registry::WorkflowRegistry;
pub use resolver::DependencyResolver;
pub use result::{StepResult, StepStatus, WorkflowResult, WorkflowStatus};
pub use store::ResultStore;
pub use template::TemplateResolver;
