use crate::config::types::{FetchConfig, ScrapeConfig, MAX_DURATION_SECS};
use crate::extract::Selector;
use crate::ConfigError;
use std::collections::HashSet;

/// Upper bound on concurrent fetches
const MAX_CONCURRENCY: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &ScrapeConfig) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    validate_secs("delay", config.delay, true)?;

    if config.retries < 1 {
        return Err(ConfigError::Validation(
            "retries must be >= 1 (it counts the first attempt)".to_string(),
        ));
    }

    validate_secs("timeout-per-attempt", config.timeout_per_attempt, false)?;
    validate_secs("robots-timeout", config.robots_timeout, false)?;
    validate_secs("backoff-base", config.backoff_base, true)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks a duration setting lies in `0..=MAX_DURATION_SECS` (excluding zero unless allowed)
fn validate_secs(field: &str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if !value.is_finite() || !lower_ok || value > MAX_DURATION_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be {} and at most {} seconds, got {}",
            field,
            if allow_zero { "non-negative" } else { "positive" },
            MAX_DURATION_SECS,
            value
        )));
    }
    Ok(())
}

/// Validates selector names and checks that every query compiles
fn validate_selectors(selectors: &[Selector]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for selector in selectors {
        if selector.name.is_empty() {
            return Err(ConfigError::InvalidSelector(format!(
                "selector name cannot be empty (query '{}')",
                selector.query
            )));
        }

        if !seen.insert(selector.name.as_str()) {
            return Err(ConfigError::InvalidSelector(format!(
                "duplicate selector name '{}'",
                selector.name
            )));
        }

        selector.compile()?;
    }

    Ok(())
}
