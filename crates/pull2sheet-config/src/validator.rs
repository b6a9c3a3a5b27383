//! Configuration validation.

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

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_extraction(config, &mut result);
        Self::validate_provider(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_extraction(config: &Config, result: &mut ValidationResult) {
        let extraction = &config.extraction;

        for (path, value) in [
            ("extraction.session_timeout_ms", extraction.session_timeout_ms),
            ("extraction.field_timeout_ms", extraction.field_timeout_ms),
            ("extraction.batch_split_timeout_ms", extraction.batch_split_timeout_ms),
        ] {
            if value == 0 {
                result.add_error(ValidationError::new(path, "deadline must be greater than 0"));
            }
        }

        if extraction.max_input_length == 0 {
            result.add_error(ValidationError::new(
                "extraction.max_input_length",
                "max_input_length must be greater than 0",
            ));
        }

        if extraction.batch_max_length == 0 {
            result.add_error(ValidationError::new(
                "extraction.batch_max_length",
                "batch_max_length must be greater than 0",
            ));
        }

        if extraction.max_consecutive_failures == 0 {
            result.add_error(ValidationError::new(
                "extraction.max_consecutive_failures",
                "max_consecutive_failures must be at least 1",
            ));
        }

        if extraction.retry_count > 3 {
            result.add_warning(ValidationWarning::new(
                "extraction.retry_count",
                "retry_count above 3 can stall a pass on a degraded model",
            ));
        }

        if extraction.batch_split_timeout_ms < extraction.field_timeout_ms {
            result.add_warning(ValidationWarning::new(
                "extraction.batch_split_timeout_ms",
                "batch split deadline is shorter than a single field deadline",
            ));
        }
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        let url = &config.provider.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "provider.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if config.provider.model.trim().is_empty() {
            result.add_error(ValidationError::new("provider.model", "model cannot be empty"));
        }

        let http_timeout_ms = config.provider.request_timeout_secs.saturating_mul(1000);
        if http_timeout_ms < config.extraction.field_timeout_ms {
            result.add_warning(ValidationWarning::new(
                "provider.request_timeout_secs",
                "HTTP timeout is shorter than the field deadline",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, valid_levels
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
