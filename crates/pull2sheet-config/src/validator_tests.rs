use super::*;

#[test]
fn test_validate_default_config() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_zero_deadline() {
    let mut config = Config::default();
    config.extraction.field_timeout_ms = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "extraction.field_timeout_ms"));
}

#[test]
fn test_validate_zero_limits() {
    let mut config = Config::default();
    config.extraction.max_input_length = 0;
    config.extraction.batch_max_length = 0;

    let result = ConfigValidator::validate(&config);
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_validate_zero_failure_budget() {
    let mut config = Config::default();
    config.extraction.max_consecutive_failures = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "extraction.max_consecutive_failures"));
}

#[test]
fn test_validate_high_retry_warning() {
    let mut config = Config::default();
    config.extraction.retry_count = 10;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "extraction.retry_count"));
}

#[test]
fn test_validate_split_shorter_than_field_warning() {
    let mut config = Config::default();
    config.extraction.batch_split_timeout_ms = 1000;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(!result.warnings.is_empty());
}

#[test]
fn test_validate_bad_base_url() {
    let mut config = Config::default();
    config.provider.base_url = "localhost:11434".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "provider.base_url"));
}

#[test]
fn test_validate_empty_model() {
    let mut config = Config::default();
    config.provider.model = "  ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "provider.model"));
}

#[test]
fn test_validate_short_http_timeout_warning() {
    let mut config = Config::default();
    config.provider.request_timeout_secs = 5;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "provider.request_timeout_secs"));
}

#[test]
fn test_validate_huge_http_timeout() {
    let mut config = Config::default();
    config.provider.request_timeout_secs = u64::MAX;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(!result
        .warnings
        .iter()
        .any(|w| w.path == "provider.request_timeout_secs"));
}

#[test]
fn test_validate_unknown_log_level() {
    let mut config = Config::default();
    config.logging.level = "verbose".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "logging.level"));
}
