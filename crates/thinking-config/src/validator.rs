//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// The warnings when valid, otherwise every error as one [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ConfigError::Invalid(self.errors))
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Pool sizes above this produce a warning.
const LARGE_POOL: usize = 256;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_orchestrator(config, &mut result);
        Self::validate_workflows(config, &mut result);
        Self::validate_tools(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.trim().is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_orchestrator(config: &Config, result: &mut ValidationResult) {
        let orchestrator = &config.orchestrator;

        if orchestrator.max_concurrent_steps == 0 {
            result.add_error(ValidationError::new(
                "orchestrator.max_concurrent_steps",
                "max_concurrent_steps must be greater than 0",
            ));
        } else if orchestrator.max_concurrent_steps > LARGE_POOL {
            result.add_warning(ValidationWarning::new(
                "orchestrator.max_concurrent_steps",
                format!(
                    "max_concurrent_steps is very high (>{}), wide workflows may exhaust tool backends",
                    LARGE_POOL
                ),
            ));
        }

        if orchestrator.step_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "orchestrator.step_timeout_secs",
                "step_timeout_secs must be greater than 0",
            ));
        }

        if orchestrator.workflow_timeout_secs != 0
            && orchestrator.workflow_timeout_secs < orchestrator.step_timeout_secs
        {
            result.add_warning(ValidationWarning::new(
                "orchestrator.workflow_timeout_secs",
                "workflow_timeout_secs is shorter than step_timeout_secs",
            ));
        }

        if orchestrator.event_buffer == 0 {
            result.add_error(ValidationError::new(
                "orchestrator.event_buffer",
                "event_buffer must be greater than 0",
            ));
        }
    }

    fn validate_workflows(config: &Config, result: &mut ValidationResult) {
        for path in &config.workflows.paths {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "workflows.paths",
                    format!("Workflow path does not exist: {:?}", path),
                ));
            }
        }
    }

    fn validate_tools(config: &Config, result: &mut ValidationResult) {
        for (name, tool) in &config.tools {
            if !tool.url.starts_with("http://") && !tool.url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    format!("tools.{}.url", name),
                    "url must start with http:// or https://",
                ));
            }

            if tool.timeout_secs == 0 {
                result.add_error(ValidationError::new(
                    format!("tools.{}.timeout_secs", name),
                    "timeout_secs must be greater than 0",
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "'{}' is not a plain level, it will be used as a filter directive",
                    config.logging.level
                ),
            ));
        }

        if config.logging.file && config.logging.dir.trim().is_empty() {
            result.add_error(ValidationError::new(
                "logging.dir",
                "dir cannot be empty when file logging is enabled",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
